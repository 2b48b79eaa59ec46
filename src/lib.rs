//! Prefill – fills unset record fields from declared default annotations.
//!
//! A record declares, once, which fields it has and what each field's
//! annotation says (see [`record::Record`]). Filling walks those fields and,
//! for every field still holding the zero value of its type, parses the
//! annotation into the field:
//! * booleans, signed and unsigned integers and floats are parsed as literals;
//! * durations (`"1m30s"`) and timestamps (`"2024-01-02 03:04:05"`) use the
//!   parsers in [`timefmt`];
//! * strings may pick their value from the environment through a selector
//!   (`"envs|MODE|dev,debug|prod,info"`, see [`selector`]) or embed relative
//!   dates and times (`"{{date:0,0,1}}"`, see [`offset`]);
//! * byte fields take the annotation's raw bytes;
//! * scalar sequences are written `[a,b,c]`;
//! * nested records and every element of record sequences are descended into.
//!
//! A caller-set value equal to the zero value cannot be told apart from an
//! unset one and is overwritten.
//!
//! ## Modules
//! * [`record`] – the [`record::Record`] trait, schemas and field slots.
//! * [`kind`] – classification of slots into value kinds and exact types.
//! * [`filler`] – the [`filler::Filler`], its builder and the field walker.
//! * [`coerce`] – the built-in per-kind strategies.
//! * [`selector`], [`offset`], [`timefmt`] – the string micro-languages.
//! * [`source`] – overlay store and environment lookups.
//! * [`settings`] – loading a filler from a settings file.
//! * [`report`] – per-field outcomes of a fill.
//!
//! ## Failures
//! By default a bad annotation never fails a fill: the field stays at its
//! zero value and the failure is recorded in the returned
//! [`report::FillReport`]. Build a filler with [`filler::Mode::Strict`] to
//! stop at the first bad annotation instead.
//!
//! ## Quick Start
//! ```
//! use lazy_static::lazy_static;
//! use prefill::record::{FieldValue, Record, Schema};
//!
//! #[derive(Default)]
//! struct Retry {
//!     attempts: u32,
//!     backoff: chrono::TimeDelta,
//!     codes: Vec<u16>,
//! }
//!
//! impl Record for Retry {
//!     fn schema() -> &'static Schema<Self> {
//!         lazy_static! {
//!             static ref SCHEMA: Schema<Retry> = Schema::<Retry>::new("Retry")
//!                 .field("attempts", r#"default:"3""#, |r| FieldValue::from(&mut r.attempts))
//!                 .field("backoff", r#"default:"250ms""#, |r| FieldValue::from(&mut r.backoff))
//!                 .field("codes", r#"default:"[502,503]""#, |r| FieldValue::from(&mut r.codes));
//!         }
//!         &SCHEMA
//!     }
//! }
//!
//! let mut retry = Retry::default();
//! let report = prefill::set_defaults(&mut retry).unwrap();
//! assert!(report.is_clean());
//! assert_eq!(retry.attempts, 3);
//! assert_eq!(retry.backoff, chrono::TimeDelta::milliseconds(250));
//! assert_eq!(retry.codes, vec![502, 503]);
//! ```

pub mod coerce;
pub mod error;
pub mod filler;
pub mod kind;
pub mod offset;
pub mod record;
pub mod report;
pub mod selector;
pub mod settings;
pub mod source;
pub mod tag;
pub mod timefmt;

use lazy_static::lazy_static;

pub use error::{FieldError, PrefillError, Result};
pub use filler::{DEFAULT_TAG, Filler, FillerBuilder, Mode};
pub use record::{FieldValue, Record, Schema};
pub use report::{FieldOutcome, FillReport};

lazy_static! {
    static ref SHARED: Filler = Filler::new();
}

/// Fills `record` with the shared lenient filler reading `default:"..."`.
pub fn set_defaults<R: Record>(record: &mut R) -> Result<FillReport> {
    SHARED.fill(record)
}

/// Fills `record` using annotations under `tag` (`default` when `None`).
///
/// Any key other than the default one gets a filler of its own, so asking
/// for a different key is always honored.
pub fn apply_defaults<R: Record>(record: &mut R, tag: Option<&str>) -> Result<FillReport> {
    match tag {
        None => SHARED.fill(record),
        Some(tag) if tag == DEFAULT_TAG => SHARED.fill(record),
        Some(tag) => Filler::with_tag(tag).fill(record),
    }
}
