use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("Incompatible file format")]
    IncompatibleFormat,
    #[error("Incompatible data type. Expected '{expected}'")]
    IncompatibleDataType { expected: String },
    #[error(
        "Incompatible file format. This file was created with newer engine version \
         ({type_name} version {found}, supported up to {supported})"
    )]
    NewerVersion { type_name: &'static str, found: i32, supported: i32 },
    #[error("Reading from stream failed")]
    Read(#[source] io::Error),
    #[error("Writing to stream failed")]
    Write(#[source] io::Error),
    #[error("Invalid schema version {0}")]
    InvalidVersion(i32),
    #[error("Invalid length prefix {0}")]
    InvalidLength(i32),
    #[error("Sequence of {0} elements does not fit a 32-bit length prefix")]
    TooLong(usize),
    #[error("String field is not valid UTF-8")]
    InvalidString,
}

pub type Result<T, E = SerializeError> = std::result::Result<T, E>;
