use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// The only failures this layer produces. Malformed or rejected patches are
/// detected by the service when the request is submitted, not here.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
