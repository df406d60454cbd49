//! Performance benchmarks for the concession billing engine.
//!
//! Covers the pure evaluator on contracts of growing size, rule selection,
//! and a full calculate-payment request through the router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;

use concession_billing::api::{AppState, create_router};
use concession_billing::calculation::{evaluate_payment, select_applicable_rules};
use concession_billing::config::ConfigLoader;
use concession_billing::models::{
    BillingPeriod, Charge, ChargeRule, IncomeBasis, IncomeReport, PaymentConfiguration,
};

use axum::{body::Body, http::Request};
use tower::ServiceExt;

fn all_kinds_config() -> PaymentConfiguration {
    PaymentConfiguration {
        contract_id: 1,
        has_fixed_charge: true,
        has_percentage_charge: true,
        has_per_unit_charge: true,
        has_per_area_charge: true,
        has_minimum_guarantee: true,
        minimum_guarantee_amount: Some(Decimal::from(5000)),
        income_basis: IncomeBasis::Gross,
    }
}

/// Builds `count` rules cycling through every charge kind, with every fourth
/// rule's window ending before the benchmarked period.
fn create_rules(count: usize) -> Vec<ChargeRule> {
    (0..count)
        .map(|i| {
            let charge = match i % 4 {
                0 => Charge::Fixed {
                    amount: Decimal::new(25_000 + i as i64, 2),
                },
                1 => Charge::Percentage {
                    percentage: Decimal::new(250, 2),
                },
                2 => Charge::PerUnit {
                    unit_type: format!("unit_{}", i % 8),
                    per_unit_rate: Decimal::new(1_575, 2),
                },
                _ => Charge::PerArea {
                    area_m2: Decimal::new(4_250, 2),
                    per_m2_rate: Decimal::new(1_999, 2),
                },
            };
            ChargeRule {
                id: i as u64 + 1,
                name: format!("Rule {}", i + 1),
                is_active: true,
                start_date: None,
                end_date: (i % 4 == 3).then(|| NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
                charge,
            }
        })
        .collect()
}

fn create_report() -> IncomeReport {
    let units_sold: BTreeMap<String, Decimal> = (0..8)
        .map(|i| (format!("unit_{}", i), Decimal::from(40 + i)))
        .collect();
    IncomeReport {
        id: 1,
        contract_id: 1,
        month: 3,
        year: 2025,
        gross_income: Decimal::new(4_567_890, 2),
        net_income: Decimal::new(3_912_345, 2),
        units_sold,
        verified: true,
        verified_at: Some(Utc::now()),
        submitted_at: Utc::now(),
    }
}

fn period() -> BillingPeriod {
    BillingPeriod::new(3, 2025).unwrap()
}

/// Benchmark: One contract with one rule of each kind.
fn bench_single_contract(c: &mut Criterion) {
    let config = all_kinds_config();
    let rules = create_rules(4);
    let report = create_report();

    c.bench_function("evaluate_single_contract", |b| {
        b.iter(|| {
            black_box(evaluate_payment(
                black_box(&config),
                black_box(&rules),
                Some(&report),
                period(),
            ))
        })
    });
}

/// Benchmark: Month-end run over many contracts.
fn bench_month_end_batch(c: &mut Criterion) {
    let config = all_kinds_config();
    let rules = create_rules(6);
    let report = create_report();

    let mut group = c.benchmark_group("month_end");
    for contracts in [100usize, 1000] {
        group.throughput(Throughput::Elements(contracts as u64));
        group.bench_with_input(
            BenchmarkId::new("contracts", contracts),
            &contracts,
            |b, &contracts| {
                b.iter(|| {
                    let payments: Vec<_> = (0..contracts)
                        .map(|_| evaluate_payment(&config, &rules, Some(&report), period()))
                        .collect();
                    black_box(payments)
                })
            },
        );
    }
    group.finish();
}

/// Benchmark: Evaluator scaling with the number of rules on a contract.
fn bench_scaling(c: &mut Criterion) {
    let config = all_kinds_config();
    let report = create_report();

    let mut group = c.benchmark_group("scaling");
    for rule_count in [1usize, 4, 16, 64] {
        let rules = create_rules(rule_count);
        group.throughput(Throughput::Elements(rule_count as u64));
        group.bench_with_input(BenchmarkId::new("rules", rule_count), &rules, |b, rules| {
            b.iter(|| black_box(evaluate_payment(&config, rules, Some(&report), period())))
        });
    }
    group.finish();
}

/// Benchmark: Selecting the rules in force for a month.
fn bench_rule_selection(c: &mut Criterion) {
    let rules = create_rules(64);

    c.bench_function("select_applicable_rules_64", |b| {
        b.iter(|| black_box(select_applicable_rules(black_box(&rules), &period())))
    });
}

/// Benchmark: Full calculate-payment request through the router.
///
/// Each iteration gets fresh stores, since a period can only be billed once.
fn bench_http_calculate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let config = ConfigLoader::load("./config/parks").expect("Failed to load config");
    let body = r#"{"month": 3, "year": 2025}"#;

    c.bench_function("http_calculate_payment", |b| {
        b.to_async(&rt).iter_batched(
            || create_router(AppState::new(config.clone())),
            |router| async move {
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("POST")
                            .uri("/contracts/101/calculate-payment")
                            .header("Content-Type", "application/json")
                            .body(Body::from(body))
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response)
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_single_contract,
    bench_month_end_batch,
    bench_scaling,
    bench_rule_selection,
    bench_http_calculate,
);
criterion_main!(benches);
