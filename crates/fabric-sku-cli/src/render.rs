use std::fmt::Write as _;

use fabric_sku_engine::{describe, AdjustmentOrigin, EstimateReport, TierTable};

pub fn text(report: &EstimateReport, explain: bool) -> String {
    let result = &report.estimation.result;
    let mut out = String::new();
    let _ = writeln!(out, "Recommended Fabric SKU: {}", result.label);
    let _ = writeln!(out, "Capacity Units (CU): {}", result.capacity_units);
    let _ = writeln!(out, "30-second CU use: {}", result.use_30_sec);
    let _ = writeln!(out, "{}", describe(&result.label));

    if explain {
        let _ = writeln!(out);
        let _ = writeln!(out, "Profile: {}", report.profile);
        let origin = match report.adjustments.origin {
            AdjustmentOrigin::Fetched => "fetched",
            AdjustmentOrigin::Fallback => "fallback (zero)",
        };
        let _ = writeln!(out, "Adjustments: {} via {}", origin, report.source);
        for entry in &report.estimation.trace.stages {
            let _ = writeln!(out, "  {:<20} {:>12.3}", entry.stage.name(), entry.score);
        }
        let _ = writeln!(out, "Score: {:.3}", report.estimation.score);
        if report.estimation.floor_applied {
            let _ = writeln!(
                out,
                "Raised from {} to {} by the capacity floor",
                report.estimation.raw_label, result.label
            );
        }
    }
    out
}

pub fn json(report: &EstimateReport, explain: bool) -> anyhow::Result<String> {
    let value = if explain {
        serde_json::to_value(report)?
    } else {
        serde_json::to_value(&report.estimation.result)?
    };
    Ok(serde_json::to_string_pretty(&value)? + "\n")
}

pub fn tiers(table: &TierTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<7} {:>10} {:>6} {:>8}  Description", "SKU", "Score <=", "CU", "CU/30s");
    for row in table.rows() {
        let bound = row
            .upper_bound
            .map_or_else(|| "-".to_string(), |upper| format!("{upper}"));
        let _ = writeln!(
            out,
            "{:<7} {:>10} {:>6} {:>8}  {}",
            row.label,
            bound,
            row.capacity_units,
            row.use_30_sec,
            describe(&row.label)
        );
    }
    out
}
