use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Enumerations that can be selected by a display label or a short key.
pub trait Labeled: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn key(&self) -> &'static str;

    /// Extra spellings accepted by `parse_label`, already normalized.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Case- and punctuation-insensitive lookup. Unknown values yield `None`.
    fn parse_label(raw: &str) -> Option<Self> {
        let wanted = normalize_label(raw);
        if wanted.is_empty() {
            return None;
        }
        Self::ALL.iter().copied().find(|item| {
            normalize_label(item.label()) == wanted
                || normalize_label(item.key()) == wanted
                || item.aliases().contains(&wanted.as_str())
        })
    }
}

pub(crate) fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Workload {
    DataFactory,
    SparkJobs,
    DataScience,
    AdHocSql,
    PowerBi,
    PowerBiEmbedded,
    RealTimeIntelligence,
    Eventstream,
    FabricDatabases,
}

impl Labeled for Workload {
    const ALL: &'static [Self] = &[
        Self::DataFactory,
        Self::SparkJobs,
        Self::DataScience,
        Self::AdHocSql,
        Self::PowerBi,
        Self::PowerBiEmbedded,
        Self::RealTimeIntelligence,
        Self::Eventstream,
        Self::FabricDatabases,
    ];

    fn label(&self) -> &'static str {
        match self {
            Self::DataFactory => "Data Factory",
            Self::SparkJobs => "Spark Jobs",
            Self::DataScience => "Data Science",
            Self::AdHocSql => "Ad-Hoc SQL Analytics",
            Self::PowerBi => "Power BI",
            Self::PowerBiEmbedded => "Power BI Embedded",
            Self::RealTimeIntelligence => "Real-Time Intelligence",
            Self::Eventstream => "Eventstream",
            Self::FabricDatabases => "Microsoft Fabric Databases",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::DataFactory => "data_factory",
            Self::SparkJobs => "spark_jobs",
            Self::DataScience => "data_science",
            Self::AdHocSql => "ad_hoc_sql",
            Self::PowerBi => "power_bi",
            Self::PowerBiEmbedded => "power_bi_embedded",
            Self::RealTimeIntelligence => "real_time_intelligence",
            Self::Eventstream => "eventstream",
            Self::FabricDatabases => "fabric_databases",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::SparkJobs => &["spark"],
            Self::AdHocSql => &["sql", "adhocsqlanalytics"],
            Self::RealTimeIntelligence => &["rti", "realtime"],
            Self::FabricDatabases => &["databases", "fabricdb"],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshFrequency {
    Hourly,
    Daily,
    Weekly,
}

impl Labeled for RefreshFrequency {
    const ALL: &'static [Self] = &[Self::Hourly, Self::Daily, Self::Weekly];

    fn label(&self) -> &'static str {
        match self {
            Self::Hourly => "Hourly",
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RetentionPeriod {
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
}

impl Labeled for RetentionPeriod {
    const ALL: &'static [Self] = &[Self::OneYear, Self::FiveYears, Self::TenYears];

    fn label(&self) -> &'static str {
        match self {
            Self::OneYear => "1 year",
            Self::FiveYears => "5 years",
            Self::TenYears => "10 years",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::OneYear => "1y",
            Self::FiveYears => "5y",
            Self::TenYears => "10y",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::OneYear => &["1yr", "1years", "oneyear"],
            Self::FiveYears => &["5yr", "5year", "fiveyears"],
            Self::TenYears => &["10yr", "10year", "tenyears"],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataComplexity {
    Simple,
    Moderate,
    Complex,
}

impl Labeled for DataComplexity {
    const ALL: &'static [Self] = &[Self::Simple, Self::Moderate, Self::Complex];

    fn label(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Moderate => "Moderate",
            Self::Complex => "Complex",
        }
    }

    fn key(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Moderate => "moderate",
            Self::Complex => "complex",
        }
    }
}

/// A validated estimation request. Enum fields are `None` when the caller
/// supplied nothing or a value outside the known set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimationInput {
    pub data_size_gb: f64,
    pub batch_cycles_per_day: u32,
    pub num_tables: u32,
    pub copilot_enabled: bool,
    pub refresh_frequency: Option<RefreshFrequency>,
    pub retention_period: Option<RetentionPeriod>,
    pub complexity: Option<DataComplexity>,
    pub user_count: u32,
    pub workloads: BTreeSet<Workload>,
}

impl EstimationInput {
    /// Rejects sizes a form could never produce. The counts are unsigned, so
    /// only the data size needs checking.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let field = "data_size";
        if !self.data_size_gb.is_finite() {
            return Err(ValidationError::NotFinite { field });
        }
        if self.data_size_gb < 0.0 {
            return Err(ValidationError::Negative {
                field,
                value: self.data_size_gb.to_string(),
            });
        }
        Ok(())
    }
}

/// Additive corrections applied at each pipeline stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalAdjustments {
    pub base: f64,
    pub workload: f64,
    pub copilot: f64,
    pub additional_factors: f64,
    pub storage: f64,
    pub demand: f64,
}

impl ExternalAdjustments {
    pub const ZERO: Self = Self {
        base: 0.0,
        workload: 0.0,
        copilot: 0.0,
        additional_factors: 0.0,
        storage: 0.0,
        demand: 0.0,
    };

    /// Replaces NaN and infinite fields with 0.0.
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self {
            base: clean(self.base),
            workload: clean(self.workload),
            copilot: clean(self.copilot),
            additional_factors: clean(self.additional_factors),
            storage: clean(self.storage),
            demand: clean(self.demand),
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimationResult {
    pub label: String,
    pub capacity_units: u32,
    pub use_30_sec: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workload_labels_parse_from_form_and_short_keys() {
        assert_eq!(
            Workload::parse_label("Ad-Hoc SQL Analytics"),
            Some(Workload::AdHocSql)
        );
        assert_eq!(Workload::parse_label("spark_jobs"), Some(Workload::SparkJobs));
        assert_eq!(Workload::parse_label("SPARK"), Some(Workload::SparkJobs));
        assert_eq!(
            Workload::parse_label("Microsoft Fabric Databases"),
            Some(Workload::FabricDatabases)
        );
        assert_eq!(Workload::parse_label("Mainframe"), None);
        assert_eq!(Workload::parse_label("  "), None);
    }

    #[test]
    fn retention_accepts_both_spellings() {
        assert_eq!(
            RetentionPeriod::parse_label("5 years"),
            Some(RetentionPeriod::FiveYears)
        );
        assert_eq!(
            RetentionPeriod::parse_label("10y"),
            Some(RetentionPeriod::TenYears)
        );
        assert_eq!(RetentionPeriod::parse_label("forever"), None);
    }

    #[test]
    fn sanitized_drops_non_finite_values() {
        let adj = ExternalAdjustments {
            base: f64::NAN,
            storage: f64::INFINITY,
            demand: 1.5,
            ..ExternalAdjustments::ZERO
        }
        .sanitized();
        assert_eq!(adj.base, 0.0);
        assert_eq!(adj.storage, 0.0);
        assert_eq!(adj.demand, 1.5);
    }

    #[test]
    fn input_deserializes_with_serde_names() {
        let input: EstimationInput = serde_json::from_str(
            r#"{"data_size_gb": 12.5, "refresh_frequency": "hourly",
                "retention_period": "1y", "workloads": ["spark_jobs", "power_bi"]}"#,
        )
        .expect("parse input");
        assert_eq!(input.refresh_frequency, Some(RefreshFrequency::Hourly));
        assert_eq!(input.retention_period, Some(RetentionPeriod::OneYear));
        assert_eq!(input.workloads.len(), 2);
        assert_eq!(input.user_count, 0);
    }

    #[test]
    fn validate_rejects_unusable_sizes() {
        let with_size = |data_size_gb| EstimationInput {
            data_size_gb,
            ..EstimationInput::default()
        };
        assert!(with_size(0.0).validate().is_ok());
        assert!(with_size(500.0).validate().is_ok());
        assert_eq!(
            with_size(f64::NAN).validate(),
            Err(ValidationError::NotFinite { field: "data_size" })
        );
        assert_eq!(
            with_size(f64::INFINITY).validate(),
            Err(ValidationError::NotFinite { field: "data_size" })
        );
        assert!(matches!(
            with_size(-5000.0).validate(),
            Err(ValidationError::Negative { field: "data_size", .. })
        ));

        let decoded: EstimationInput =
            serde_json::from_str(r#"{"data_size_gb": -5000.0}"#).expect("parse input");
        assert!(decoded.validate().is_err());
    }
}
