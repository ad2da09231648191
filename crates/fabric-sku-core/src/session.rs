use crate::types::EstimationResult;

pub const STALE_MESSAGE: &str =
    "A parameter for the estimations was changed. Please click on \"Generate SKU\" again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Empty,
    Current(EstimationResult),
    Stale(EstimationResult),
}

/// Emitted whenever an input changes after (or before) an estimate was shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleNotice {
    pub message: &'static str,
    pub previous: Option<EstimationResult>,
}

/// Tracks whether the estimate on display still reflects the inputs.
#[derive(Debug, Clone)]
pub struct EstimateSession {
    status: SessionStatus,
}

impl EstimateSession {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Empty,
        }
    }

    pub fn record(&mut self, result: EstimationResult) {
        self.status = SessionStatus::Current(result);
    }

    pub fn input_changed(&mut self) -> StaleNotice {
        let previous = match std::mem::replace(&mut self.status, SessionStatus::Empty) {
            SessionStatus::Empty => None,
            SessionStatus::Current(result) | SessionStatus::Stale(result) => Some(result),
        };
        if let Some(result) = &previous {
            self.status = SessionStatus::Stale(result.clone());
        }
        StaleNotice {
            message: STALE_MESSAGE,
            previous,
        }
    }

    /// Form reset: forget everything.
    pub fn clear(&mut self) {
        self.status = SessionStatus::Empty;
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn current(&self) -> Option<&EstimationResult> {
        match &self.status {
            SessionStatus::Current(result) => Some(result),
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.status, SessionStatus::Stale(_))
    }
}

impl Default for EstimateSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(label: &str, units: u32) -> EstimationResult {
        EstimationResult {
            label: label.to_string(),
            capacity_units: units,
            use_30_sec: units * 30,
        }
    }

    #[test]
    fn change_after_estimate_marks_it_stale() {
        let mut session = EstimateSession::new();
        session.record(result("F64", 64));
        assert_eq!(session.current().map(|r| r.label.as_str()), Some("F64"));

        let notice = session.input_changed();
        assert_eq!(notice.message, STALE_MESSAGE);
        assert_eq!(notice.previous, Some(result("F64", 64)));
        assert!(session.is_stale());
        assert!(session.current().is_none());

        session.record(result("F128", 128));
        assert!(!session.is_stale());
    }

    #[test]
    fn change_before_any_estimate_still_notifies() {
        let mut session = EstimateSession::new();
        let notice = session.input_changed();
        assert!(notice.previous.is_none());
        assert_eq!(session.status(), &SessionStatus::Empty);
    }

    #[test]
    fn clear_resets_everything() {
        let mut session = EstimateSession::new();
        session.record(result("F2", 2));
        session.input_changed();
        session.clear();
        assert_eq!(session.status(), &SessionStatus::Empty);
    }
}
