//! Ordered capacity tiers and the score → tier lookup.
//!
//! A table is a run of bounded rows in strictly ascending order followed by
//! one unbounded row, so every score (including negative ones) lands on
//! exactly one row. Upper bounds are inclusive.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::EstimationResult;

const USE_WINDOW_SECS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRow {
    /// Inclusive upper bound; `None` for the top tier.
    pub upper_bound: Option<f64>,
    pub label: String,
    pub capacity_units: u32,
    pub use_30_sec: u32,
}

impl TierRow {
    pub fn bounded(upper_bound: f64, label: impl Into<String>, capacity_units: u32) -> Self {
        Self {
            upper_bound: Some(upper_bound),
            label: label.into(),
            capacity_units,
            use_30_sec: capacity_units.saturating_mul(USE_WINDOW_SECS),
        }
    }

    pub fn unbounded(label: impl Into<String>, capacity_units: u32) -> Self {
        Self {
            upper_bound: None,
            label: label.into(),
            capacity_units,
            use_30_sec: capacity_units.saturating_mul(USE_WINDOW_SECS),
        }
    }

    pub fn contains(&self, score: f64) -> bool {
        self.upper_bound.is_none_or(|upper| score <= upper)
    }

    pub fn to_result(&self) -> EstimationResult {
        EstimationResult {
            label: self.label.clone(),
            capacity_units: self.capacity_units,
            use_30_sec: self.use_30_sec,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TierTable {
    bounded: Vec<TierRow>,
    top: TierRow,
}

impl TierTable {
    pub fn new(rows: Vec<TierRow>) -> Result<Self, ConfigError> {
        let mut rows = rows;
        let top = rows
            .pop()
            .ok_or_else(|| ConfigError::InvalidTierTable("table has no rows".to_string()))?;
        if top.upper_bound.is_some() {
            return Err(ConfigError::InvalidTierTable(format!(
                "last row {} must be unbounded",
                top.label
            )));
        }

        let mut previous: Option<f64> = None;
        for row in rows.iter().chain(std::iter::once(&top)) {
            if row.label.trim().is_empty() {
                return Err(ConfigError::InvalidTierTable(
                    "row label is empty".to_string(),
                ));
            }
            if row.capacity_units == 0 {
                return Err(ConfigError::InvalidTierTable(format!(
                    "row {} has zero capacity units",
                    row.label
                )));
            }
        }
        for row in &rows {
            let Some(upper) = row.upper_bound else {
                return Err(ConfigError::InvalidTierTable(format!(
                    "only the last row may be unbounded, found {}",
                    row.label
                )));
            };
            if !upper.is_finite() {
                return Err(ConfigError::InvalidTierTable(format!(
                    "row {} has a non-finite bound",
                    row.label
                )));
            }
            if previous.is_some_and(|prev| upper <= prev) {
                return Err(ConfigError::InvalidTierTable(format!(
                    "row {} is out of order",
                    row.label
                )));
            }
            previous = Some(upper);
        }

        Ok(Self { bounded: rows, top })
    }

    /// Microsoft Fabric F-series capacities, F2 through F2048.
    pub fn fabric() -> Self {
        let mut bounded = Vec::with_capacity(10);
        let mut units: u32 = 2;
        while units <= 1024 {
            bounded.push(TierRow::bounded(f64::from(units), format!("F{units}"), units));
            units *= 2;
        }
        Self {
            bounded,
            top: TierRow::unbounded("F2048", 2048),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &TierRow> {
        self.bounded.iter().chain(std::iter::once(&self.top))
    }

    pub fn len(&self) -> usize {
        self.bounded.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn lookup(&self, score: f64) -> &TierRow {
        self.bounded
            .iter()
            .find(|row| row.contains(score))
            .unwrap_or(&self.top)
    }

    /// Smallest row offering at least `capacity_units`, or the top row.
    pub fn at_least(&self, capacity_units: u32) -> &TierRow {
        self.rows()
            .find(|row| row.capacity_units >= capacity_units)
            .unwrap_or(&self.top)
    }

    pub fn by_label(&self, label: &str) -> Option<&TierRow> {
        self.rows().find(|row| row.label == label)
    }

    /// Raises `row` to the floor if it sits below it. Returns the chosen row
    /// and whether a substitution happened.
    pub fn apply_floor<'a>(&'a self, row: &'a TierRow, min_capacity_units: u32) -> (&'a TierRow, bool) {
        if row.capacity_units >= min_capacity_units {
            return (row, false);
        }
        (self.at_least(min_capacity_units), true)
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::fabric()
    }
}
