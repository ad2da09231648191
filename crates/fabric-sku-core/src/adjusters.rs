use crate::forecast::forecast_next;
use crate::types::{EstimationInput, ExternalAdjustments};
use crate::weights::{CopilotPolicy, DemandPolicy, Weights};

pub fn base_score(input: &EstimationInput, adj: &ExternalAdjustments, weights: &Weights) -> f64 {
    weights.base_score
        + input.data_size_gb * weights.data_size
        + f64::from(input.batch_cycles_per_day) * weights.batch_cycles
        + f64::from(input.num_tables) * weights.tables
        + adj.base
}

/// Every selected workload with a known weight adds its share, discounted
/// for overlapping compute. Workloads without a weight add nothing.
pub fn adjust_for_workloads(
    score: f64,
    input: &EstimationInput,
    adj: &ExternalAdjustments,
    weights: &Weights,
) -> f64 {
    input
        .workloads
        .iter()
        .filter_map(|workload| weights.workload_weight(*workload))
        .fold(score, |acc, weight| {
            acc + weights.workload_base * weight * weights.overlap_discount + adj.workload
        })
}

/// Never lowers the score when copilot is on; a no-op when it is off.
pub fn adjust_for_copilot(
    score: f64,
    input: &EstimationInput,
    adj: &ExternalAdjustments,
    weights: &Weights,
) -> f64 {
    if !input.copilot_enabled {
        return score;
    }
    let raised = match weights.copilot {
        CopilotPolicy::Floor { floor, increment } => score.max(floor) + increment,
        CopilotPolicy::Percentage { floor, rate } => {
            if score > floor {
                score * (1.0 + rate)
            } else {
                floor
            }
        }
    };
    (raised + adj.copilot).max(score)
}

pub fn adjust_for_additional_factors(
    score: f64,
    input: &EstimationInput,
    adj: &ExternalAdjustments,
    weights: &Weights,
) -> f64 {
    let refresh = input
        .refresh_frequency
        .and_then(|freq| weights.refresh.get(&freq).copied())
        .unwrap_or(0.0);
    let retention = input
        .retention_period
        .and_then(|period| weights.retention.get(&period).copied())
        .unwrap_or(0.0);
    let complexity = input
        .complexity
        .and_then(|level| weights.complexity.get(&level).copied())
        .unwrap_or(0.0);

    score
        + refresh
        + retention
        + complexity
        + f64::from(input.user_count) * weights.per_user
        + adj.additional_factors
}

pub fn adjust_for_storage(
    score: f64,
    input: &EstimationInput,
    adj: &ExternalAdjustments,
    weights: &Weights,
) -> f64 {
    score + input.data_size_gb * weights.storage + adj.storage
}

pub fn adjust_for_demand(score: f64, adj: &ExternalAdjustments, weights: &Weights) -> f64 {
    let demand = match &weights.demand {
        DemandPolicy::Trend { history, weight } => forecast_next(history) * weight,
        DemandPolicy::SelfReferential { rate } => score * rate,
    };
    score + demand + adj.demand
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataComplexity, RefreshFrequency, RetentionPeriod, Workload};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn base_combines_volume_cadence_and_tables() {
        let input = EstimationInput {
            data_size_gb: 500.0,
            batch_cycles_per_day: 10,
            num_tables: 20,
            ..EstimationInput::default()
        };
        let adj = ExternalAdjustments {
            base: 1.0,
            ..ExternalAdjustments::ZERO
        };
        assert!(approx(base_score(&input, &adj, &Weights::reference()), 31.5));
    }

    #[test]
    fn workloads_add_discounted_weight_each() {
        let input = EstimationInput {
            workloads: [Workload::SparkJobs, Workload::Eventstream].into_iter().collect(),
            ..EstimationInput::default()
        };
        let adj = ExternalAdjustments {
            workload: 0.5,
            ..ExternalAdjustments::ZERO
        };
        // 2 * 1.75 * 0.8 + 0.5 + 2 * 5 * 0.8 + 0.5
        let out = adjust_for_workloads(10.0, &input, &adj, &Weights::reference());
        assert!(approx(out, 10.0 + 2.8 + 0.5 + 8.0 + 0.5));
    }

    #[test]
    fn workloads_missing_from_the_table_are_ignored() {
        let mut weights = Weights::reference();
        weights.workloads.remove(&Workload::PowerBi);
        let input = EstimationInput {
            workloads: [Workload::PowerBi].into_iter().collect(),
            ..EstimationInput::default()
        };
        let adj = ExternalAdjustments {
            workload: 3.0,
            ..ExternalAdjustments::ZERO
        };
        assert!(approx(adjust_for_workloads(10.0, &input, &adj, &weights), 10.0));
    }

    #[test]
    fn copilot_floor_policy_lifts_low_scores() {
        let weights = Weights::reference();
        let on = EstimationInput {
            copilot_enabled: true,
            ..EstimationInput::default()
        };
        let adj = ExternalAdjustments {
            copilot: 2.0,
            ..ExternalAdjustments::ZERO
        };
        assert!(approx(adjust_for_copilot(30.0, &on, &adj, &weights), 66.0));
        assert!(approx(adjust_for_copilot(100.0, &on, &adj, &weights), 102.0));

        let off = EstimationInput::default();
        assert!(approx(adjust_for_copilot(30.0, &off, &adj, &weights), 30.0));
    }

    #[test]
    fn copilot_percentage_policy() {
        let weights = Weights {
            copilot: CopilotPolicy::Percentage {
                floor: 64.0,
                rate: 0.02,
            },
            ..Weights::reference()
        };
        let on = EstimationInput {
            copilot_enabled: true,
            ..EstimationInput::default()
        };
        let zero = ExternalAdjustments::ZERO;
        assert!(approx(adjust_for_copilot(100.0, &on, &zero, &weights), 102.0));
        assert!(approx(adjust_for_copilot(20.0, &on, &zero, &weights), 64.0));
    }

    #[test]
    fn copilot_never_decreases_the_score() {
        let on = EstimationInput {
            copilot_enabled: true,
            ..EstimationInput::default()
        };
        let adj = ExternalAdjustments {
            copilot: -500.0,
            ..ExternalAdjustments::ZERO
        };
        assert!(approx(
            adjust_for_copilot(90.0, &on, &adj, &Weights::reference()),
            90.0
        ));
    }

    #[test]
    fn additional_factors_use_lookup_tables() {
        let input = EstimationInput {
            refresh_frequency: Some(RefreshFrequency::Hourly),
            retention_period: Some(RetentionPeriod::FiveYears),
            complexity: Some(DataComplexity::Complex),
            user_count: 30,
            ..EstimationInput::default()
        };
        let out = adjust_for_additional_factors(
            0.0,
            &input,
            &ExternalAdjustments::ZERO,
            &Weights::reference(),
        );
        assert!(approx(out, 7.0 + 0.75 + 5.0 + 3.0));
    }

    #[test]
    fn absent_enum_values_contribute_nothing() {
        let input = EstimationInput {
            user_count: 10,
            ..EstimationInput::default()
        };
        let out = adjust_for_additional_factors(
            5.0,
            &input,
            &ExternalAdjustments::ZERO,
            &Weights::reference(),
        );
        assert!(approx(out, 6.0));
    }

    #[test]
    fn storage_is_small_relative_to_base() {
        let input = EstimationInput {
            data_size_gb: 1000.0,
            ..EstimationInput::default()
        };
        let zero = ExternalAdjustments::ZERO;
        assert!(approx(
            adjust_for_storage(0.0, &input, &zero, &Weights::reference()),
            0.5
        ));
        assert!(approx(adjust_for_storage(0.0, &input, &zero, &Weights::legacy()), 50.0));
    }

    #[test]
    fn demand_trend_and_self_referential() {
        let zero = ExternalAdjustments::ZERO;
        assert!(approx(adjust_for_demand(10.0, &zero, &Weights::reference()), 11.85));

        let weights = Weights {
            demand: DemandPolicy::SelfReferential { rate: 0.01 },
            ..Weights::reference()
        };
        let adj = ExternalAdjustments {
            demand: 1.0,
            ..ExternalAdjustments::ZERO
        };
        assert!(approx(adjust_for_demand(200.0, &adj, &weights), 203.0));
    }
}
