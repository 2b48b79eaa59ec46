use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrefillError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Default for {path} not applied: {source}")]
    Field { path: String, source: FieldError },
}

pub type Result<T> = std::result::Result<T, PrefillError>;

/// Why a single field could not take its default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid boolean literal {0:?}")]
    InvalidBool(String),
    #[error("invalid integer literal {0:?}")]
    InvalidInt(String),
    #[error("invalid unsigned integer literal {0:?}")]
    InvalidUint(String),
    #[error("invalid float literal {0:?}")]
    InvalidFloat(String),
    #[error("{value} does not fit in {target}")]
    OutOfRange { value: String, target: &'static str },
    #[error(transparent)]
    Duration(#[from] DurationError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    #[error("sequence default {0:?} is not of the form [a,b,...]")]
    MalformedSequence(String),
    #[error("no strategy applies to a {0} slot")]
    Unsupported(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid duration {0:?}")]
    Invalid(String),
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit { unit: String, input: String },
    #[error("duration {0:?} overflows")]
    Overflow(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("invalid string: {0}")]
    MissingLayout(String),
    #[error("cannot parse {value:?} with layout {layout:?}: {reason}")]
    Layout {
        value: String,
        layout: String,
        reason: String,
    },
}

impl From<config::ConfigError> for PrefillError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
