use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoronoiError {
    #[error("site ({x}, {y}) has a non-finite coordinate")]
    NonFiniteSite { x: f64, y: f64 },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

pub type Result<T> = std::result::Result<T, VoronoiError>;
