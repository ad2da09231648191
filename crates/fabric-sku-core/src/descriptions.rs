pub const DEFAULT_DESCRIPTION: &str = "No description is available for this SKU.";

#[derive(Debug, Clone, Copy)]
pub struct TierDescription {
    pub label: &'static str,
    pub text: &'static str,
}

static TIER_DESCRIPTIONS: [TierDescription; 11] = [
    TierDescription {
        label: "F2",
        text: "Entry capacity for trials, prototypes and very light reporting.",
    },
    TierDescription {
        label: "F4",
        text: "Small team capacity for occasional pipelines and a few reports.",
    },
    TierDescription {
        label: "F8",
        text: "Departmental capacity for regular refreshes of modest data volumes.",
    },
    TierDescription {
        label: "F16",
        text: "Capacity for several daily pipelines and shared semantic models.",
    },
    TierDescription {
        label: "F32",
        text: "Mid-size capacity for mixed data engineering and reporting workloads.",
    },
    TierDescription {
        label: "F64",
        text: "Production capacity that unlocks Copilot and viewer access without per-user licenses.",
    },
    TierDescription {
        label: "F128",
        text: "Large capacity for concurrent Spark jobs and heavy interactive analytics.",
    },
    TierDescription {
        label: "F256",
        text: "Enterprise capacity for organization-wide platforms with many workloads.",
    },
    TierDescription {
        label: "F512",
        text: "High-scale capacity for large real-time and batch processing estates.",
    },
    TierDescription {
        label: "F1024",
        text: "Very high-scale capacity for the largest analytics platforms.",
    },
    TierDescription {
        label: "F2048",
        text: "Maximum capacity for extreme, always-on data platform demand.",
    },
];

pub fn descriptions() -> &'static [TierDescription] {
    &TIER_DESCRIPTIONS
}

pub fn describe(label: &str) -> &'static str {
    TIER_DESCRIPTIONS
        .iter()
        .find(|entry| entry.label == label)
        .map_or(DEFAULT_DESCRIPTION, |entry| entry.text)
}
