use thiserror::Error;

/// Result type for the tortoise agent.
pub type Result<T> = std::result::Result<T, TortoiseError>;

#[derive(Debug, Error)]
pub enum TortoiseError {
    #[error("Invalid configuration '{name}': {reason}")]
    InvalidConfig { name: String, reason: String },

    /// The simulator broke the sensor contract; the tick is rejected.
    #[error("Invalid sensor snapshot: {0}")]
    InvalidSensor(String),

    #[error("Weight file holds {found} values, expected {expected}")]
    WeightCount { expected: usize, found: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_count_display() {
        let e = TortoiseError::WeightCount { expected: 7, found: 3 };
        assert_eq!(e.to_string(), "Weight file holds 3 values, expected 7");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let e: TortoiseError = io.into();
        assert!(e.to_string().contains("disk full"));
    }
}
