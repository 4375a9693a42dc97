//! Error types.
//!
//! Library code returns [`MetricsError`], which names *why* a computation was
//! refused. The binary converts it into an [`AppError`] carrying a process exit
//! code at the boundary.

/// Why a metric computation could not produce a value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsError {
    /// The inputs violate a precondition (lengths, ordering, ranges, domain).
    InvalidInput(String),
    /// The inputs are well-formed but the arithmetic has no finite answer
    /// (zero norm, zero denominator).
    NumericDegeneracy(String),
}

impl MetricsError {
    pub fn invalid(message: impl Into<String>) -> Self {
        MetricsError::InvalidInput(message.into())
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        MetricsError::NumericDegeneracy(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            MetricsError::InvalidInput(m) | MetricsError::NumericDegeneracy(m) => m,
        }
    }
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::InvalidInput(m) => write!(f, "Invalid input: {m}"),
            MetricsError::NumericDegeneracy(m) => write!(f, "Numeric degeneracy: {m}"),
        }
    }
}

impl std::error::Error for MetricsError {}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<MetricsError> for AppError {
    fn from(err: MetricsError) -> Self {
        let exit_code = match err {
            MetricsError::InvalidInput(_) => 2,
            MetricsError::NumericDegeneracy(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_errors_map_to_exit_codes() {
        let input: AppError = MetricsError::invalid("bad thresholds").into();
        assert_eq!(input.exit_code(), 2);
        assert_eq!(input.to_string(), "Invalid input: bad thresholds");

        let numeric: AppError = MetricsError::degenerate("zero norm").into();
        assert_eq!(numeric.exit_code(), 4);
    }
}
