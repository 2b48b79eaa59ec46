//! Built-in coercion strategies, one per value kind plus the exact-type
//! overrides for durations and timestamps.

use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::FieldError;
use crate::filler::{Filler, Strategy};
use crate::kind::{ExactType, ValueKind};
use crate::record::FieldValue;
use crate::{offset, selector, timefmt};

lazy_static! {
    static ref BRACKETED: Regex = Regex::new(r"^\[(.*)\]$").unwrap();
}

/// Written in an annotation to mean a literal `-`.
pub const HYPHEN_ESCAPE: &str = "-,";

const ESCAPED_COMMA: &str = "\u{E000}";

pub fn kind_strategies() -> HashMap<ValueKind, Strategy> {
    let mut strategies: HashMap<ValueKind, Strategy> = HashMap::new();
    strategies.insert(ValueKind::Bool, Arc::new(coerce_bool));
    strategies.insert(ValueKind::Int, Arc::new(coerce_int));
    strategies.insert(ValueKind::Uint, Arc::new(coerce_uint));
    strategies.insert(ValueKind::Float, Arc::new(coerce_float));
    strategies.insert(ValueKind::String, Arc::new(coerce_string));
    strategies.insert(ValueKind::Bytes, Arc::new(coerce_bytes));
    strategies.insert(ValueKind::Sequence, Arc::new(coerce_sequence));
    strategies
}

pub fn exact_strategies() -> HashMap<ExactType, Strategy> {
    let mut strategies: HashMap<ExactType, Strategy> = HashMap::new();
    strategies.insert(ExactType::Duration, Arc::new(coerce_duration));
    strategies.insert(ExactType::Timestamp, Arc::new(coerce_timestamp));
    strategies
}

pub fn coerce_bool(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let name = value.type_name();
    let FieldValue::Bool(slot) = value else {
        return Err(FieldError::Unsupported(name));
    };
    *slot = match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => true,
        "0" | "f" | "F" | "false" | "FALSE" | "False" => false,
        _ => return Err(FieldError::InvalidBool(text.to_string())),
    };
    Ok(())
}

/// Signed integers. A duration slot reached through the kind table reads a
/// duration expression rather than a plain count.
pub fn coerce_int(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let parse = || -> Result<i64, FieldError> {
        text.parse().map_err(|_| FieldError::InvalidInt(text.to_string()))
    };
    match value {
        FieldValue::Duration(slot) => *slot = timefmt::parse_duration(text)?,
        FieldValue::I8(slot) => *slot = narrow(parse()?, "i8")?,
        FieldValue::I16(slot) => *slot = narrow(parse()?, "i16")?,
        FieldValue::I32(slot) => *slot = narrow(parse()?, "i32")?,
        FieldValue::I64(slot) => *slot = parse()?,
        other => return Err(FieldError::Unsupported(other.type_name())),
    }
    Ok(())
}

pub fn coerce_uint(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let parse = || -> Result<u64, FieldError> {
        text.parse().map_err(|_| FieldError::InvalidUint(text.to_string()))
    };
    match value {
        FieldValue::U8(slot) => *slot = narrow(parse()?, "u8")?,
        FieldValue::U16(slot) => *slot = narrow(parse()?, "u16")?,
        FieldValue::U32(slot) => *slot = narrow(parse()?, "u32")?,
        FieldValue::U64(slot) => *slot = parse()?,
        other => return Err(FieldError::Unsupported(other.type_name())),
    }
    Ok(())
}

fn narrow<S, T>(value: S, target: &'static str) -> Result<T, FieldError>
where
    S: Copy + Display,
    T: TryFrom<S>,
{
    T::try_from(value).map_err(|_| FieldError::OutOfRange {
        value: value.to_string(),
        target,
    })
}

pub fn coerce_float(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let parsed: f64 = text
        .parse()
        .map_err(|_| FieldError::InvalidFloat(text.to_string()))?;
    match value {
        FieldValue::F32(slot) => *slot = parsed as f32,
        FieldValue::F64(slot) => *slot = parsed,
        other => return Err(FieldError::Unsupported(other.type_name())),
    }
    Ok(())
}

/// Selector first; placeholders only when the selector left the text alone.
pub fn coerce_string(filler: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let name = value.type_name();
    let FieldValue::Str(slot) = value else {
        return Err(FieldError::Unsupported(name));
    };
    let text = if text == HYPHEN_ESCAPE { "-" } else { text };
    let mut resolved = selector::resolve(text, filler.lookup());
    if resolved == text {
        resolved = offset::substitute(text, filler.now());
    }
    *slot = resolved;
    Ok(())
}

/// Raw annotation bytes, only ever written into an unset slot.
pub fn coerce_bytes(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let name = value.type_name();
    let FieldValue::Bytes(slot) = value else {
        return Err(FieldError::Unsupported(name));
    };
    if slot.is_none() {
        *slot = Some(text.as_bytes().to_vec());
    }
    Ok(())
}

/// `[a,b,c]` into a scalar sequence; `|,` keeps a comma inside an item.
pub fn coerce_sequence(filler: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let name = value.type_name();
    let FieldValue::List(list) = value else {
        return Err(FieldError::Unsupported(name));
    };
    let caps = BRACKETED
        .captures(text)
        .ok_or_else(|| FieldError::MalformedSequence(text.to_string()))?;
    let inner = &caps[1];
    let items: Vec<String> = if inner.is_empty() {
        Vec::new()
    } else {
        inner
            .replace("|,", ESCAPED_COMMA)
            .split(',')
            .map(|item| item.replace(ESCAPED_COMMA, ","))
            .collect()
    };
    list.assign(&items, filler)
}

pub fn coerce_duration(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let name = value.type_name();
    let FieldValue::Duration(slot) = value else {
        return Err(FieldError::Unsupported(name));
    };
    *slot = timefmt::parse_duration(text)?;
    Ok(())
}

pub fn coerce_timestamp(_: &Filler, value: FieldValue<'_>, text: &str) -> Result<(), FieldError> {
    let name = value.type_name();
    let FieldValue::Timestamp(slot) = value else {
        return Err(FieldError::Unsupported(name));
    };
    *slot = timefmt::parse_timestamp(text)?;
    Ok(())
}
