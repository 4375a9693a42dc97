//! Attempt population estimated from an assumed capture session.

use crate::domain::SessionModel;
use crate::error::MetricsError;

/// Unlock opportunities offered by `session`: `duration / interval`.
pub fn total_population(session: &SessionModel) -> Result<f64, MetricsError> {
    let SessionModel {
        duration_secs,
        unlock_interval_secs,
    } = *session;

    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return Err(MetricsError::invalid(format!(
            "session duration must be finite and > 0, got {duration_secs}"
        )));
    }
    if !(unlock_interval_secs.is_finite() && unlock_interval_secs > 0.0) {
        return Err(MetricsError::invalid(format!(
            "unlock interval must be finite and > 0, got {unlock_interval_secs}"
        )));
    }
    Ok(duration_secs / unlock_interval_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_session_offers_150_unlocks() {
        assert_eq!(total_population(&SessionModel::default()).unwrap(), 150.0);
    }

    #[test]
    fn rejects_non_positive_parameters() {
        let zero_interval = SessionModel {
            duration_secs: 300.0,
            unlock_interval_secs: 0.0,
        };
        assert!(total_population(&zero_interval).is_err());

        let negative = SessionModel {
            duration_secs: -1.0,
            unlock_interval_secs: 2.0,
        };
        assert!(total_population(&negative).is_err());
    }
}
