use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid parameter '{0}': {1}")]
    InvalidParameter(String, String),

    #[error("Projected amount exceeds the representable range in year {0}")]
    Overflow(u32),
}
