use serde::Serialize;
use tracing::debug;

use crate::adjusters::{
    adjust_for_additional_factors, adjust_for_copilot, adjust_for_demand, adjust_for_storage,
    adjust_for_workloads, base_score,
};
use crate::tiers::TierTable;
use crate::types::{EstimationInput, EstimationResult, ExternalAdjustments};
use crate::weights::Weights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Base,
    Workloads,
    Copilot,
    AdditionalFactors,
    Storage,
    DemandForecast,
}

impl Stage {
    pub const ORDER: [Self; 6] = [
        Self::Base,
        Self::Workloads,
        Self::Copilot,
        Self::AdditionalFactors,
        Self::Storage,
        Self::DemandForecast,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Workloads => "workloads",
            Self::Copilot => "copilot",
            Self::AdditionalFactors => "additional_factors",
            Self::Storage => "storage",
            Self::DemandForecast => "demand_forecast",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageScore {
    pub stage: Stage,
    pub score: f64,
}

/// Running score after each stage, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreTrace {
    pub stages: Vec<StageScore>,
}

impl ScoreTrace {
    pub fn score_after(&self, stage: Stage) -> Option<f64> {
        self.stages
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.score)
    }

    pub fn final_score(&self) -> f64 {
        self.stages.last().map_or(0.0, |entry| entry.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimation {
    pub result: EstimationResult,
    pub score: f64,
    /// Tier the raw score maps to before any floor.
    pub raw_label: String,
    pub floor_applied: bool,
    pub trace: ScoreTrace,
}

pub fn run_adjusters(
    input: &EstimationInput,
    adj: &ExternalAdjustments,
    weights: &Weights,
) -> ScoreTrace {
    let mut stages = Vec::with_capacity(Stage::ORDER.len());
    let mut record = |stage: Stage, score: f64| {
        debug!(stage = stage.name(), score, "stage applied");
        stages.push(StageScore { stage, score });
        score
    };

    let score = record(Stage::Base, base_score(input, adj, weights));
    let score = record(
        Stage::Workloads,
        adjust_for_workloads(score, input, adj, weights),
    );
    let score = record(Stage::Copilot, adjust_for_copilot(score, input, adj, weights));
    let score = record(
        Stage::AdditionalFactors,
        adjust_for_additional_factors(score, input, adj, weights),
    );
    let score = record(Stage::Storage, adjust_for_storage(score, input, adj, weights));
    record(Stage::DemandForecast, adjust_for_demand(score, adj, weights));

    ScoreTrace { stages }
}

/// Runs the full scoring pipeline and tier selection for one request.
pub fn estimate_with(
    input: &EstimationInput,
    adj: &ExternalAdjustments,
    weights: &Weights,
    tiers: &TierTable,
) -> Estimation {
    let adj = adj.sanitized();
    let trace = run_adjusters(input, &adj, weights);
    let score = trace.final_score();

    let raw = tiers.lookup(score);
    let (chosen, floor_applied) = match weights.floor {
        Some(floor) if floor.applies_to(input) => tiers.apply_floor(raw, floor.min_capacity_units),
        _ => (raw, false),
    };
    debug!(
        score,
        raw = %raw.label,
        chosen = %chosen.label,
        floor_applied,
        "tier selected"
    );

    Estimation {
        result: chosen.to_result(),
        score,
        raw_label: raw.label.clone(),
        floor_applied,
        trace,
    }
}
