use crate::{
    build::BuildError,
    codec::CodecError,
    config::ConfigError,
    model::{InterceptError, ValidationError},
    schema::SchemaError,
    statement::StatementError,
    traits::AccessError,
    transcode::TranscodeError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Umbrella error for every fallible colfam operation.
/// Each variant wraps the precise error of the concern that raised it; all of
/// them are synchronous, fail fast, and leave metadata untouched.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Intercept(#[from] InterceptError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Statement(#[from] StatementError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl Error {
    /// Stable classification, independent of message text.
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Access(_) => ErrorClass::Access,
            Self::Build(_) => ErrorClass::Build,
            Self::Codec(_) => ErrorClass::Codec,
            Self::Config(_) => ErrorClass::Config,
            Self::Intercept(_) => ErrorClass::Interceptor,
            Self::Schema(_) => ErrorClass::Schema,
            Self::Statement(err) => err.class(),
            Self::Transcode(err) => err.class(),
            Self::Validation(_) => ErrorClass::Validation,
        }
    }
}

///
/// ErrorClass
///
/// Coarse taxonomy the driver layer can match on to decide whether to abort
/// or surface an error to the end user.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorClass {
    Access,
    Build,
    Codec,
    Config,
    Decode,
    Interceptor,
    Schema,
    Unsupported,
    Validation,
}

impl ErrorClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Build => "build",
            Self::Codec => "codec",
            Self::Config => "config",
            Self::Decode => "decode",
            Self::Interceptor => "interceptor",
            Self::Schema => "schema",
            Self::Unsupported => "unsupported",
            Self::Validation => "validation",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
