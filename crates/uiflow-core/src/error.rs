use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A mutation block panicked instead of returning.
    #[error("mutation panicked: {message}")]
    Panicked { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
