//! Classification of field slots.

use std::fmt;

use chrono::{NaiveDateTime, TimeDelta};

use crate::record::FieldValue;

/// The closed set of value kinds strategies are registered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Uint,
    Float,
    String,
    Bytes,
    Sequence,
    Record,
}

/// Exact types whose strategy overrides the kind strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExactType {
    Duration,
    Timestamp,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Uint => "uint",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Bytes => "bytes",
            ValueKind::Sequence => "sequence",
            ValueKind::Record => "record",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for ExactType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExactType::Duration => write!(f, "duration"),
            ExactType::Timestamp => write!(f, "timestamp"),
        }
    }
}

impl FieldValue<'_> {
    /// Durations are stored as a signed count and timestamps as a compound
    /// value, so they classify as `Int` and `Record` respectively.
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::I8(_)
            | FieldValue::I16(_)
            | FieldValue::I32(_)
            | FieldValue::I64(_)
            | FieldValue::Duration(_) => ValueKind::Int,
            FieldValue::U8(_) | FieldValue::U16(_) | FieldValue::U32(_) | FieldValue::U64(_) => {
                ValueKind::Uint
            }
            FieldValue::F32(_) | FieldValue::F64(_) => ValueKind::Float,
            FieldValue::Str(_) => ValueKind::String,
            FieldValue::Bytes(_) => ValueKind::Bytes,
            FieldValue::List(_) | FieldValue::Records(_) => ValueKind::Sequence,
            FieldValue::Record(_) | FieldValue::Timestamp(_) => ValueKind::Record,
        }
    }

    pub fn exact_type(&self) -> Option<ExactType> {
        match self {
            FieldValue::Duration(_) => Some(ExactType::Duration),
            FieldValue::Timestamp(_) => Some(ExactType::Timestamp),
            _ => None,
        }
    }

    /// True when the slot holds the zero value of its type. Nested records
    /// and record sequences have no single zero value and always report true.
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Bool(v) => !**v,
            FieldValue::I8(v) => **v == 0,
            FieldValue::I16(v) => **v == 0,
            FieldValue::I32(v) => **v == 0,
            FieldValue::I64(v) => **v == 0,
            FieldValue::U8(v) => **v == 0,
            FieldValue::U16(v) => **v == 0,
            FieldValue::U32(v) => **v == 0,
            FieldValue::U64(v) => **v == 0,
            FieldValue::F32(v) => **v == 0.0,
            FieldValue::F64(v) => **v == 0.0,
            FieldValue::Str(v) => v.is_empty(),
            FieldValue::Bytes(v) => v.is_none(),
            FieldValue::Duration(v) => **v == TimeDelta::zero(),
            FieldValue::Timestamp(v) => **v == NaiveDateTime::default(),
            FieldValue::List(v) => v.is_empty(),
            FieldValue::Record(_) | FieldValue::Records(_) => true,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Bool(_) => "bool",
            FieldValue::I8(_) => "i8",
            FieldValue::I16(_) => "i16",
            FieldValue::I32(_) => "i32",
            FieldValue::I64(_) => "i64",
            FieldValue::U8(_) => "u8",
            FieldValue::U16(_) => "u16",
            FieldValue::U32(_) => "u32",
            FieldValue::U64(_) => "u64",
            FieldValue::F32(_) => "f32",
            FieldValue::F64(_) => "f64",
            FieldValue::Str(_) => "String",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::Duration(_) => "TimeDelta",
            FieldValue::Timestamp(_) => "NaiveDateTime",
            FieldValue::List(v) => v.element_type(),
            FieldValue::Record(r) => r.type_name(),
            FieldValue::Records(_) => "records",
        }
    }
}
