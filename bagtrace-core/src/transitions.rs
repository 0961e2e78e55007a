use crate::models::BaggageStatus;
use crate::{TrackingError, TrackingResult};

/// Decide whether `proposed` is an acceptable next status given `current`.
///
/// Policy: terminal statuses absorb; `lost` is reachable from any
/// non-terminal state; forward transitions may skip checkpoints (not every
/// checkpoint is instrumented); strict regressions in the canonical order
/// are rejected.
pub fn validate_transition(current: BaggageStatus, proposed: BaggageStatus) -> TrackingResult<()> {
    if current.is_terminal() {
        return Err(TrackingError::TerminalState(current));
    }
    if proposed == BaggageStatus::Lost {
        return Ok(());
    }
    if proposed.ordinal() < current.ordinal() {
        return Err(TrackingError::InvalidTransition {
            from: current,
            to: proposed,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BaggageStatus::*;

    #[test]
    fn forward_steps_are_accepted() {
        assert!(validate_transition(CheckedIn, SecurityCleared).is_ok());
        assert!(validate_transition(SecurityCleared, LoadedOnAircraft).is_ok());
        assert!(validate_transition(ArrivedAtDestination, Delivered).is_ok());
    }

    #[test]
    fn skipping_checkpoints_is_accepted() {
        assert!(validate_transition(CheckedIn, InTransit).is_ok());
        assert!(validate_transition(SecurityCleared, Delivered).is_ok());
    }

    #[test]
    fn repeating_the_current_status_is_accepted() {
        assert!(validate_transition(InTransit, InTransit).is_ok());
    }

    #[test]
    fn regressions_are_rejected() {
        assert!(matches!(
            validate_transition(InTransit, CheckedIn),
            Err(TrackingError::InvalidTransition {
                from: InTransit,
                to: CheckedIn,
            })
        ));
        assert!(matches!(
            validate_transition(InTransit, SecurityCleared),
            Err(TrackingError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn lost_is_reachable_from_any_non_terminal_state() {
        for status in [
            CheckedIn,
            SecurityCleared,
            LoadedOnAircraft,
            InTransit,
            ArrivedAtDestination,
        ] {
            assert!(validate_transition(status, Lost).is_ok());
        }
    }

    #[test]
    fn terminal_statuses_reject_everything() {
        for terminal in [Delivered, Lost] {
            for proposed in BaggageStatus::ALL {
                assert!(matches!(
                    validate_transition(terminal, proposed),
                    Err(TrackingError::TerminalState(t)) if t == terminal
                ));
            }
        }
    }
}
