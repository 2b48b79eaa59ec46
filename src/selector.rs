//! Environment selectors.
//!
//! A string default of the form
//!
//! ```text
//! envs|[key|]match,result[,payload]|match,result[,payload]|...
//! ```
//!
//! picks its value by looking `key` up (overlay first, then the process
//! environment) and returning the `result` of the first segment whose
//! `match` equals the looked-up value. Without an explicit key, `EnvType` is
//! consulted. When the key is unset, the first segment is selected. The
//! first segment's `result` is also the fallback when nothing matches.
//!
//! A three part segment with an empty `result` yields its base64 `payload`
//! decoded. `|,` writes a literal comma and `||` a literal pipe.
//!
//! Anything malformed leaves the input unchanged, so the annotation itself
//! becomes the default.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::source::KeyValueSource;

pub const PREFIX: &str = "envs|";
pub const IMPLICIT_KEY: &str = "EnvType";

// private use code points stand in for escaped separators while splitting
const ESCAPED_COMMA: &str = "\u{E000}";
const ESCAPED_PIPE: &str = "\u{E001}";

pub fn resolve(input: &str, lookup: &dyn KeyValueSource) -> String {
    let Some(body) = input.strip_prefix(PREFIX) else {
        return input.to_string();
    };
    let escaped = body.replace("|,", ESCAPED_COMMA).replace("||", ESCAPED_PIPE);
    let selected = select(input, &escaped, lookup);
    if escaped != body {
        selected
            .replace(ESCAPED_PIPE, "|")
            .replace(ESCAPED_COMMA, ",")
    } else {
        selected
    }
}

fn select(original: &str, escaped: &str, lookup: &dyn KeyValueSource) -> String {
    let mut segments: Vec<&str> = escaped.split('|').collect();
    if segments.len() < 2 {
        return original.to_string();
    }
    let key = if segments[0].contains(',') {
        IMPLICIT_KEY
    } else {
        segments.remove(0)
    };
    let mut value = lookup.get(key);

    let mut fallback = "";
    for (i, segment) in segments.iter().enumerate() {
        let parts: Vec<&str> = segment.split(',').collect();
        if parts.len() != 2 && parts.len() != 3 {
            return original.to_string();
        }
        if i == 0 {
            fallback = parts[1];
            if value.is_none() {
                value = Some(parts[0].to_string());
            }
        }
        if value.as_deref() != Some(parts[0]) {
            continue;
        }
        if parts.len() == 3 {
            if parts[1].is_empty() {
                if let Some(decoded) = decode(parts[2]) {
                    return decoded;
                }
            }
            return original.to_string();
        }
        return parts[1].to_string();
    }
    fallback.to_string()
}

fn decode(payload: &str) -> Option<String> {
    let bytes = STANDARD.decode(payload).ok()?;
    String::from_utf8(bytes).ok()
}
