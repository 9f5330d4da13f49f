use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Insufficient data for {slot}: {points} observations, need at least {required}.")]
    InsufficientData {
        slot: String,
        points: usize,
        required: usize,
    },
}
