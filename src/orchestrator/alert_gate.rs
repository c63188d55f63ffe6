//! Failure alert gating.
//!
//! Fetch failures alert once per failure streak; timeouts always alert.

use crate::model::{Alert, LookupError};

#[derive(Debug, Default)]
pub(crate) struct AlertGate {
    suppressed: bool,
}

impl AlertGate {
    #[cfg(test)]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// A success ends the streak; the next failure gets its own alert.
    pub fn record_success(&mut self) {
        self.suppressed = false;
    }

    /// Decide whether `err` should reach the user.
    pub fn record_failure(&mut self, err: &LookupError) -> Option<Alert> {
        match err {
            // Timeouts bypass the gate and leave the flag alone.
            LookupError::Timeout(_) => Some(Alert::TimedOut),
            e if e.is_suppressible() => {
                if self.suppressed {
                    None
                } else {
                    self.suppressed = true;
                    Some(Alert::FetchFailed)
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_alert_per_streak() {
        let mut gate = AlertGate::default();
        assert_eq!(
            gate.record_failure(&LookupError::HttpError(404)),
            Some(Alert::FetchFailed)
        );
        assert_eq!(gate.record_failure(&LookupError::HttpError(500)), None);
        assert_eq!(
            gate.record_failure(&LookupError::InvalidPayload("no name".into())),
            None
        );
        assert!(gate.is_suppressed());
    }

    #[test]
    fn success_starts_a_new_streak() {
        let mut gate = AlertGate::default();
        assert!(gate.record_failure(&LookupError::HttpError(404)).is_some());
        gate.record_success();
        assert!(!gate.is_suppressed());
        assert!(gate.record_failure(&LookupError::HttpError(404)).is_some());
    }

    #[test]
    fn timeouts_always_alert_and_do_not_arm_the_gate() {
        let mut gate = AlertGate::default();
        assert_eq!(
            gate.record_failure(&LookupError::Timeout(3000)),
            Some(Alert::TimedOut)
        );
        assert!(!gate.is_suppressed());

        gate.record_failure(&LookupError::Network("refused".into()));
        assert!(gate.is_suppressed());
        assert_eq!(
            gate.record_failure(&LookupError::Timeout(3000)),
            Some(Alert::TimedOut)
        );
        assert!(gate.is_suppressed());
    }

    #[test]
    fn superseded_lookups_are_silent() {
        let mut gate = AlertGate::default();
        assert_eq!(gate.record_failure(&LookupError::Superseded), None);
        assert!(!gate.is_suppressed());
    }
}
