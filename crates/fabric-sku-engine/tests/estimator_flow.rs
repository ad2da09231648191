use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fabric_sku_engine::{
    AdjustmentOrigin, AdjustmentSource, AdjustmentSourceError, DataComplexity, EstimationInput,
    Estimator, ExternalAdjustments, FixedAdjustmentSource, FormInput, RefreshFrequency,
    ValidationError, Weights, Workload,
};

struct FailingSource {
    calls: AtomicUsize,
}

#[async_trait]
impl AdjustmentSource for FailingSource {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn fetch(&self) -> Result<ExternalAdjustments, AdjustmentSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AdjustmentSourceError::Status {
            endpoint: "http://adjustments.invalid".to_string(),
            status: 500,
            body: "boom".to_string(),
        })
    }
}

struct SlowSource;

#[async_trait]
impl AdjustmentSource for SlowSource {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn fetch(&self) -> Result<ExternalAdjustments, AdjustmentSourceError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(ExternalAdjustments {
            base: 500.0,
            ..ExternalAdjustments::ZERO
        })
    }
}

fn sample_input() -> EstimationInput {
    EstimationInput {
        data_size_gb: 500.0,
        batch_cycles_per_day: 10,
        num_tables: 20,
        copilot_enabled: false,
        refresh_frequency: Some(RefreshFrequency::Daily),
        retention_period: None,
        complexity: Some(DataComplexity::Moderate),
        user_count: 50,
        workloads: Default::default(),
    }
}

#[tokio::test]
async fn failing_source_falls_back_to_zero_and_is_deterministic() {
    let source = Arc::new(FailingSource {
        calls: AtomicUsize::new(0),
    });
    let estimator = Estimator::new(source.clone(), Weights::reference());

    let first = estimator
        .estimate_detailed(&sample_input())
        .await
        .expect("valid input");
    let second = estimator
        .estimate_detailed(&sample_input())
        .await
        .expect("valid input");

    assert_eq!(first.adjustments.origin, AdjustmentOrigin::Fallback);
    assert!(first.adjustments.values.is_zero());
    assert_eq!(first.estimation.result, second.estimation.result);
    assert_eq!(first.estimation.score, second.estimation.score);
    assert_eq!(first.estimation.result.label, "F64");
    // one fetch per estimate, no retries
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn slow_source_times_out_like_a_failure() {
    let estimator = Estimator::new(Arc::new(SlowSource), Weights::reference())
        .with_fetch_timeout(Duration::from_millis(50));

    let report = estimator
        .estimate_detailed(&sample_input())
        .await
        .expect("valid input");
    assert_eq!(report.adjustments.origin, AdjustmentOrigin::Fallback);
    assert_eq!(report.source, "slow");
    assert_eq!(report.estimation.result.label, "F64");
}

#[tokio::test]
async fn fetched_adjustments_shift_the_score() {
    let values = ExternalAdjustments {
        storage: 30.0,
        ..ExternalAdjustments::ZERO
    };
    let estimator = Estimator::new(
        Arc::new(FixedAdjustmentSource::new(values)),
        Weights::reference(),
    );
    let report = estimator
        .estimate_detailed(&sample_input())
        .await
        .expect("valid input");
    assert_eq!(report.adjustments.origin, AdjustmentOrigin::Fetched);
    assert!((report.estimation.score - 75.1).abs() < 1e-9);
    assert_eq!(report.estimation.result.label, "F128");
}

#[tokio::test]
async fn copilot_results_never_drop_below_f64() {
    let estimator = Estimator::offline();
    for size in [0.0, 10.0, 100.0, 5_000.0] {
        let input = EstimationInput {
            data_size_gb: size,
            copilot_enabled: true,
            ..EstimationInput::default()
        };
        let result = estimator.estimate(&input).await.expect("valid input");
        assert!(result.capacity_units >= 64, "size {size}: {result:?}");
    }
}

#[tokio::test]
async fn more_workloads_never_lower_the_tier() {
    let estimator = Estimator::offline();
    let mut input = sample_input();
    let mut previous = estimator
        .estimate(&input)
        .await
        .expect("valid input")
        .capacity_units;
    for workload in [
        Workload::DataFactory,
        Workload::SparkJobs,
        Workload::Eventstream,
        Workload::FabricDatabases,
        Workload::RealTimeIntelligence,
    ] {
        input.workloads.insert(workload);
        let next = estimator
            .estimate(&input)
            .await
            .expect("valid input")
            .capacity_units;
        assert!(next >= previous);
        previous = next;
    }
}

#[tokio::test]
async fn form_validation_happens_before_fetch() {
    let source = Arc::new(FailingSource {
        calls: AtomicUsize::new(0),
    });
    let estimator = Estimator::new(source.clone(), Weights::reference());

    let form = FormInput {
        data_size: "abc".to_string(),
        ..FormInput::default()
    };
    let err = estimator.estimate_form(&form).await.expect_err("invalid form");
    assert!(matches!(err, ValidationError::NotANumber { .. }));
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);

    let form = FormInput {
        data_size: "500".to_string(),
        batch_cycles: "10".to_string(),
        num_tables: "20".to_string(),
        copilot_enabled: "no".to_string(),
        data_refresh_frequency: "daily".to_string(),
        data_retention_period: String::new(),
        data_complexity: "moderate".to_string(),
        user_count: "50".to_string(),
        workloads: vec![],
    };
    let report = estimator.estimate_form(&form).await.expect("valid form");
    assert_eq!(report.estimation.result.label, "F64");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unusable_sizes_are_rejected_before_fetch() {
    let source = Arc::new(FailingSource {
        calls: AtomicUsize::new(0),
    });
    let estimator = Estimator::new(source.clone(), Weights::reference());

    for size in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let input = EstimationInput {
            data_size_gb: size,
            ..sample_input()
        };
        let err = estimator.estimate(&input).await.expect_err("non-finite size");
        assert_eq!(err, ValidationError::NotFinite { field: "data_size" });
    }

    let input = EstimationInput {
        data_size_gb: -100_000.0,
        ..sample_input()
    };
    let err = estimator.estimate(&input).await.expect_err("negative size");
    assert!(matches!(err, ValidationError::Negative { field: "data_size", .. }));

    let decoded: EstimationInput =
        serde_json::from_str(r#"{"data_size_gb": -5000.0}"#).expect("parse input");
    assert!(estimator.estimate_detailed(&decoded).await.is_err());

    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}
