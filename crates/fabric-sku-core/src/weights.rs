//! Weight profiles. Every constant the pipeline reads lives in [`Weights`],
//! so switching between variants never touches control flow.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::forecast::forecast_next;
use crate::types::{DataComplexity, EstimationInput, Labeled, RefreshFrequency, RetentionPeriod, Workload};

pub const COPILOT_FLOOR_SCORE: f64 = 64.0;
pub const COPILOT_FLOOR_UNITS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    #[default]
    Reference,
    Legacy,
}

impl Profile {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "reference" | "default" => Some(Self::Reference),
            "legacy" | "original" => Some(Self::Legacy),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Reference => "reference",
            Self::Legacy => "legacy",
        }
    }

    pub fn weights(&self) -> Weights {
        match self {
            Self::Reference => Weights::reference(),
            Self::Legacy => Weights::legacy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CopilotPolicy {
    /// `max(score, floor) + increment`.
    Floor { floor: f64, increment: f64 },
    /// `score * (1 + rate)` above the floor, otherwise lifted to the floor.
    Percentage { floor: f64, rate: f64 },
}

impl Default for CopilotPolicy {
    fn default() -> Self {
        Self::Floor {
            floor: COPILOT_FLOOR_SCORE,
            increment: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DemandPolicy {
    /// Linear trend over a fixed history, scaled by `weight`.
    Trend { history: Vec<f64>, weight: f64 },
    /// `score * rate`.
    SelfReferential { rate: f64 },
}

impl DemandPolicy {
    pub fn default_history() -> Vec<f64> {
        vec![100.0, 120.0, 130.0, 150.0, 170.0]
    }
}

impl Default for DemandPolicy {
    fn default() -> Self {
        Self::Trend {
            history: Self::default_history(),
            weight: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloorTrigger {
    Copilot,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierFloor {
    pub min_capacity_units: u32,
    pub trigger: FloorTrigger,
}

impl TierFloor {
    pub fn applies_to(&self, input: &EstimationInput) -> bool {
        match self.trigger {
            FloorTrigger::Copilot => input.copilot_enabled,
            FloorTrigger::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    pub profile: Profile,
    pub base_score: f64,
    pub data_size: f64,
    pub batch_cycles: f64,
    pub tables: f64,
    pub workload_base: f64,
    pub overlap_discount: f64,
    pub workloads: BTreeMap<Workload, f64>,
    pub copilot: CopilotPolicy,
    pub refresh: BTreeMap<RefreshFrequency, f64>,
    pub retention: BTreeMap<RetentionPeriod, f64>,
    pub complexity: BTreeMap<DataComplexity, f64>,
    pub per_user: f64,
    pub storage: f64,
    pub demand: DemandPolicy,
    pub floor: Option<TierFloor>,
}

impl Weights {
    pub fn reference() -> Self {
        Self {
            profile: Profile::Reference,
            base_score: 2.0,
            data_size: 0.005,
            batch_cycles: 2.5,
            tables: 0.05,
            workload_base: 2.0,
            overlap_discount: 0.8,
            workloads: BTreeMap::from([
                (Workload::DataFactory, 2.0),
                (Workload::SparkJobs, 1.75),
                (Workload::DataScience, 1.5),
                (Workload::AdHocSql, 1.25),
                (Workload::PowerBi, 1.0),
                (Workload::PowerBiEmbedded, 1.0),
                (Workload::RealTimeIntelligence, 2.0),
                (Workload::Eventstream, 5.0),
                (Workload::FabricDatabases, 2.5),
            ]),
            copilot: CopilotPolicy::default(),
            refresh: BTreeMap::from([
                (RefreshFrequency::Hourly, 7.0),
                (RefreshFrequency::Daily, 5.0),
                (RefreshFrequency::Weekly, 1.0),
            ]),
            retention: BTreeMap::from([
                (RetentionPeriod::OneYear, 0.25),
                (RetentionPeriod::FiveYears, 0.75),
                (RetentionPeriod::TenYears, 1.0),
            ]),
            complexity: BTreeMap::from([
                (DataComplexity::Simple, 1.0),
                (DataComplexity::Moderate, 2.5),
                (DataComplexity::Complex, 5.0),
            ]),
            per_user: 0.1,
            // An order of magnitude below `data_size` so stage 5 does not
            // re-count volume at full weight.
            storage: 0.0005,
            demand: DemandPolicy::default(),
            floor: Some(TierFloor {
                min_capacity_units: COPILOT_FLOOR_UNITS,
                trigger: FloorTrigger::Copilot,
            }),
        }
    }

    /// The weights of the first published calculator: storage weighs 5% of
    /// the data size and nothing is recommended below F64.
    pub fn legacy() -> Self {
        Self {
            profile: Profile::Legacy,
            storage: 0.05,
            floor: Some(TierFloor {
                min_capacity_units: COPILOT_FLOOR_UNITS,
                trigger: FloorTrigger::Always,
            }),
            ..Self::reference()
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let file: WeightsFile = toml::from_str(content)?;
        file.resolve()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn workload_weight(&self, workload: Workload) -> Option<f64> {
        self.workloads.get(&workload).copied()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("base_score", self.base_score),
            ("data_size", self.data_size),
            ("batch_cycles", self.batch_cycles),
            ("tables", self.tables),
            ("workload_base", self.workload_base),
            ("overlap_discount", self.overlap_discount),
            ("per_user", self.per_user),
            ("storage", self.storage),
        ];
        for (name, value) in scalars {
            check_finite(name, value)?;
        }
        for (workload, value) in &self.workloads {
            check_finite(workload.key(), *value)?;
        }
        for (freq, value) in &self.refresh {
            check_finite(freq.key(), *value)?;
        }
        for (period, value) in &self.retention {
            check_finite(period.key(), *value)?;
        }
        for (level, value) in &self.complexity {
            check_finite(level.key(), *value)?;
        }
        match self.copilot {
            CopilotPolicy::Floor { floor, increment } => {
                check_finite("copilot.floor", floor)?;
                check_finite("copilot.increment", increment)?;
            }
            CopilotPolicy::Percentage { floor, rate } => {
                check_finite("copilot.floor", floor)?;
                check_finite("copilot.rate", rate)?;
                if rate < 0.0 {
                    return Err(ConfigError::InvalidWeight {
                        name: "copilot.rate".to_string(),
                        reason: "must not be negative".to_string(),
                    });
                }
            }
        }
        match &self.demand {
            DemandPolicy::Trend { history, weight } => {
                check_finite("demand.weight", *weight)?;
                for value in history {
                    check_finite("demand.history", *value)?;
                }
                // finite points can still overflow the regression sums
                let demand = forecast_next(history) * weight;
                if !demand.is_finite() {
                    return Err(ConfigError::InvalidWeight {
                        name: "demand.history".to_string(),
                        reason: "forecast is not a finite number".to_string(),
                    });
                }
            }
            DemandPolicy::SelfReferential { rate } => check_finite("demand.rate", *rate)?,
        }
        Ok(())
    }
}

impl Default for Weights {
    fn default() -> Self {
        Self::reference()
    }
}

fn check_finite(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidWeight {
            name: name.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

/// On-disk weight overrides. Every field is optional and falls back to the
/// selected profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightsFile {
    pub profile: Option<String>,
    pub base_score: Option<f64>,
    pub data_size: Option<f64>,
    pub batch_cycles: Option<f64>,
    pub tables: Option<f64>,
    pub workload_base: Option<f64>,
    pub overlap_discount: Option<f64>,
    pub per_user: Option<f64>,
    pub storage: Option<f64>,
    pub workloads: Option<BTreeMap<String, f64>>,
    pub refresh: Option<BTreeMap<String, f64>>,
    pub retention: Option<BTreeMap<String, f64>>,
    pub complexity: Option<BTreeMap<String, f64>>,
    pub copilot: Option<CopilotSection>,
    pub demand: Option<DemandSection>,
    pub floor: Option<FloorSection>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopilotSection {
    pub policy: Option<String>,
    pub floor: Option<f64>,
    pub increment: Option<f64>,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DemandSection {
    pub policy: Option<String>,
    pub history: Option<Vec<f64>>,
    pub weight: Option<f64>,
    pub rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorSection {
    pub min_capacity_units: Option<u32>,
    /// `copilot`, `always` or `none`.
    pub trigger: Option<String>,
}

impl WeightsFile {
    pub fn resolve(self) -> Result<Weights, ConfigError> {
        let profile = match self.profile.as_deref() {
            Some(raw) => Profile::parse(raw).ok_or_else(|| ConfigError::InvalidWeight {
                name: "profile".to_string(),
                reason: format!("unknown profile {raw:?}"),
            })?,
            None => Profile::default(),
        };
        let mut weights = profile.weights();

        override_scalar(&mut weights.base_score, self.base_score);
        override_scalar(&mut weights.data_size, self.data_size);
        override_scalar(&mut weights.batch_cycles, self.batch_cycles);
        override_scalar(&mut weights.tables, self.tables);
        override_scalar(&mut weights.workload_base, self.workload_base);
        override_scalar(&mut weights.overlap_discount, self.overlap_discount);
        override_scalar(&mut weights.per_user, self.per_user);
        override_scalar(&mut weights.storage, self.storage);

        if let Some(table) = self.workloads {
            merge_table("workloads", &mut weights.workloads, table)?;
        }
        if let Some(table) = self.refresh {
            merge_table("refresh", &mut weights.refresh, table)?;
        }
        if let Some(table) = self.retention {
            merge_table("retention", &mut weights.retention, table)?;
        }
        if let Some(table) = self.complexity {
            merge_table("complexity", &mut weights.complexity, table)?;
        }
        if let Some(section) = self.copilot {
            weights.copilot = section.apply(weights.copilot)?;
        }
        if let Some(section) = self.demand {
            weights.demand = section.apply(weights.demand)?;
        }
        if let Some(section) = self.floor {
            weights.floor = section.apply(weights.floor)?;
        }

        weights.validate()?;
        Ok(weights)
    }
}

fn override_scalar(slot: &mut f64, value: Option<f64>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn merge_table<K: Labeled + Ord>(
    table: &'static str,
    target: &mut BTreeMap<K, f64>,
    overrides: BTreeMap<String, f64>,
) -> Result<(), ConfigError> {
    for (key, value) in overrides {
        let parsed = K::parse_label(&key).ok_or(ConfigError::UnknownKey { table, key })?;
        target.insert(parsed, value);
    }
    Ok(())
}

impl CopilotSection {
    fn apply(self, current: CopilotPolicy) -> Result<CopilotPolicy, ConfigError> {
        let (floor, increment, rate) = match current {
            CopilotPolicy::Floor { floor, increment } => (floor, increment, 0.02),
            CopilotPolicy::Percentage { floor, rate } => (floor, 0.0, rate),
        };
        let floor = self.floor.unwrap_or(floor);
        let increment = self.increment.unwrap_or(increment);
        let rate = self.rate.unwrap_or(rate);

        let use_percentage = match self.policy.as_deref().map(str::trim) {
            None => matches!(current, CopilotPolicy::Percentage { .. }),
            Some("floor") => false,
            Some("percentage") => true,
            Some(other) => {
                return Err(ConfigError::InvalidWeight {
                    name: "copilot.policy".to_string(),
                    reason: format!("unknown policy {other:?}"),
                })
            }
        };
        Ok(if use_percentage {
            CopilotPolicy::Percentage { floor, rate }
        } else {
            CopilotPolicy::Floor { floor, increment }
        })
    }
}

impl DemandSection {
    fn apply(self, current: DemandPolicy) -> Result<DemandPolicy, ConfigError> {
        let was_self_referential = matches!(current, DemandPolicy::SelfReferential { .. });
        let (history, weight, rate) = match current {
            DemandPolicy::Trend { history, weight } => (history, weight, 0.01),
            DemandPolicy::SelfReferential { rate } => {
                (DemandPolicy::default_history(), 0.01, rate)
            }
        };
        let self_referential = match self.policy.as_deref().map(str::trim) {
            None => was_self_referential,
            Some("trend") => false,
            Some("self_referential" | "self-referential") => true,
            Some(other) => {
                return Err(ConfigError::InvalidWeight {
                    name: "demand.policy".to_string(),
                    reason: format!("unknown policy {other:?}"),
                })
            }
        };
        Ok(if self_referential {
            DemandPolicy::SelfReferential {
                rate: self.rate.unwrap_or(rate),
            }
        } else {
            DemandPolicy::Trend {
                history: self.history.unwrap_or(history),
                weight: self.weight.unwrap_or(weight),
            }
        })
    }
}

impl FloorSection {
    fn apply(self, current: Option<TierFloor>) -> Result<Option<TierFloor>, ConfigError> {
        let min_capacity_units = self
            .min_capacity_units
            .or(current.map(|f| f.min_capacity_units))
            .unwrap_or(COPILOT_FLOOR_UNITS);
        let trigger = match self.trigger.as_deref().map(str::trim) {
            None => match current {
                Some(floor) => floor.trigger,
                None => FloorTrigger::Copilot,
            },
            Some("copilot") => FloorTrigger::Copilot,
            Some("always") => FloorTrigger::Always,
            Some("none") => return Ok(None),
            Some(other) => {
                return Err(ConfigError::InvalidWeight {
                    name: "floor.trigger".to_string(),
                    reason: format!("unknown trigger {other:?}"),
                })
            }
        };
        Ok(Some(TierFloor {
            min_capacity_units,
            trigger,
        }))
    }
}
