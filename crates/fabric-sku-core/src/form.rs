use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::types::{
    DataComplexity, EstimationInput, Labeled, RefreshFrequency, RetentionPeriod, Workload,
};

/// Raw values as collected from a form: every field is text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormInput {
    pub data_size: String,
    pub batch_cycles: String,
    pub num_tables: String,
    pub copilot_enabled: String,
    pub data_refresh_frequency: String,
    pub data_retention_period: String,
    pub data_complexity: String,
    pub user_count: String,
    pub workloads: Vec<String>,
}

impl FormInput {
    /// Validates numbers strictly; unknown choice values are dropped.
    pub fn parse(&self) -> Result<EstimationInput, ValidationError> {
        let data_size_gb = parse_size("data_size", &self.data_size)?;
        let batch_cycles_per_day = parse_count("batch_cycles", &self.batch_cycles)?;
        let num_tables = parse_count("num_tables", &self.num_tables)?;
        let user_count = parse_count("user_count", &self.user_count)?;

        let mut workloads = BTreeSet::new();
        for raw in &self.workloads {
            match Workload::parse_label(raw) {
                Some(workload) => {
                    workloads.insert(workload);
                }
                None => debug!(value = %raw, "ignoring unrecognized workload"),
            }
        }

        Ok(EstimationInput {
            data_size_gb,
            batch_cycles_per_day,
            num_tables,
            copilot_enabled: parse_flag(&self.copilot_enabled),
            refresh_frequency: parse_choice::<RefreshFrequency>(
                "data_refresh_frequency",
                &self.data_refresh_frequency,
            ),
            retention_period: parse_choice::<RetentionPeriod>(
                "data_retention_period",
                &self.data_retention_period,
            ),
            complexity: parse_choice::<DataComplexity>("data_complexity", &self.data_complexity),
            user_count,
            workloads,
        })
    }
}

fn parse_size(field: &'static str, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(value)
}

fn parse_count(field: &'static str, raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if value < 0 {
        return Err(ValidationError::Negative {
            field,
            value: trimmed.to_string(),
        });
    }
    u32::try_from(value).map_err(|_| ValidationError::OutOfRange {
        field,
        value: trimmed.to_string(),
    })
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "yes" | "y" | "true" | "on" | "1"
    )
}

fn parse_choice<T: Labeled>(field: &'static str, raw: &str) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    let parsed = T::parse_label(raw);
    if parsed.is_none() {
        debug!(field, value = %raw, "unrecognized choice contributes nothing");
    }
    parsed
}
