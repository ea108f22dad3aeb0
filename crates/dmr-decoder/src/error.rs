#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecoderError {
    #[error("max bit errors {0} out of range, at most 24")]
    InvalidMaxBitErrors(usize),

    #[error("delay {lag} must be below buffer capacity {capacity}")]
    InvalidDelay { lag: usize, capacity: usize },

    /// Writing a snapshot into the burst frame ran past its end
    #[error("burst frame overflow: {needed} bits do not fit in {capacity}")]
    FrameOverflow { needed: usize, capacity: usize },
}

pub type Result<T> = std::result::Result<T, DecoderError>;
