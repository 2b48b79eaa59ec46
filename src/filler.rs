//! The filler: strategy tables, the field walker and its configuration.
//!
//! A [`Filler`] is built once and then only read, so one instance can serve
//! any number of records and threads. Strategies are looked up by field name
//! first, then by [`ExactType`], then by [`ValueKind`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::coerce;
use crate::error::{FieldError, PrefillError, Result};
use crate::kind::{ExactType, ValueKind};
use crate::offset::{Clock, SystemClock};
use crate::record::{FieldValue, Record, RecordList};
use crate::report::{FieldOutcome, FillReport};
use crate::source::{self, KeyValueSource};
use crate::tag;

/// Annotation key used unless another one is configured.
pub const DEFAULT_TAG: &str = "default";

pub type Strategy =
    Arc<dyn Fn(&Filler, FieldValue<'_>, &str) -> std::result::Result<(), FieldError> + Send + Sync>;

/// What happens when a default cannot be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Record the failure, leave the field at its zero value and carry on.
    #[default]
    Lenient,
    /// Stop at the first failure. Fields visited earlier keep their defaults.
    Strict,
}

pub struct Filler {
    tag: String,
    mode: Mode,
    lookup: Arc<dyn KeyValueSource>,
    clock: Arc<dyn Clock>,
    by_kind: HashMap<ValueKind, Strategy>,
    by_type: HashMap<ExactType, Strategy>,
    by_name: HashMap<String, Strategy>,
}

/// One field as seen from its parent record, without descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub annotation: Option<String>,
    pub kind: ValueKind,
    pub exact_type: Option<ExactType>,
    pub type_name: &'static str,
    pub is_zero: bool,
}

impl Filler {
    pub fn new() -> Self {
        FillerBuilder::new().build()
    }
    pub fn with_tag(tag: impl Into<String>) -> Self {
        FillerBuilder::new().tag(tag).build()
    }
    pub fn builder() -> FillerBuilder {
        FillerBuilder::new()
    }
    pub fn tag(&self) -> &str {
        &self.tag
    }
    pub fn mode(&self) -> Mode {
        self.mode
    }
    pub fn lookup(&self) -> &dyn KeyValueSource {
        self.lookup.as_ref()
    }
    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Applies defaults to every eligible field of `record`, descending into
    /// nested records and every element of record sequences.
    pub fn fill<R: Record>(&self, record: &mut R) -> Result<FillReport> {
        let mut walk = Walk {
            filler: self,
            path: Vec::new(),
            report: FillReport::new(),
        };
        walk.record(record)?;
        Ok(walk.report)
    }

    pub fn enumerate_fields<R: Record>(&self, record: &mut R) -> Vec<FieldDescriptor> {
        R::schema()
            .fields()
            .iter()
            .map(|spec| {
                let value = spec.value(record);
                FieldDescriptor {
                    name: spec.name,
                    annotation: tag::lookup(spec.annotation, &self.tag).map(|a| a.into_owned()),
                    kind: value.kind(),
                    exact_type: value.exact_type(),
                    type_name: value.type_name(),
                    is_zero: value.is_zero(),
                }
            })
            .collect()
    }

    fn strategy(&self, field: Option<&str>, value: &FieldValue<'_>) -> Option<&Strategy> {
        field
            .and_then(|name| self.by_name.get(name))
            .or_else(|| value.exact_type().and_then(|t| self.by_type.get(&t)))
            .or_else(|| self.by_kind.get(&value.kind()))
    }

    fn apply(&self, field: Option<&str>, value: FieldValue<'_>, text: &str) -> std::result::Result<(), FieldError> {
        match self.strategy(field, &value) {
            Some(strategy) => strategy(self, value, text),
            None => Err(FieldError::Unsupported(value.type_name())),
        }
    }

    /// Coerces `text` into `value` with the exact-type or kind strategy,
    /// ignoring field-name strategies.
    pub fn coerce(&self, value: FieldValue<'_>, text: &str) -> std::result::Result<(), FieldError> {
        self.apply(None, value, text)
    }

    /// Like [`coerce`](Self::coerce) for one sequence item. In lenient mode a
    /// bad item is left at its zero value instead of failing the sequence.
    pub fn coerce_element(&self, value: FieldValue<'_>, text: &str) -> std::result::Result<(), FieldError> {
        match self.coerce(value, text) {
            Err(e) if self.mode == Mode::Lenient => {
                debug!(item = text, error = %e, "sequence item left at zero value");
                Ok(())
            }
            other => other,
        }
    }
}

impl Default for Filler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Filler {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Filler")
            .field("tag", &self.tag)
            .field("mode", &self.mode)
            .field("named", &self.by_name.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct FillerBuilder {
    tag: String,
    mode: Mode,
    lookup: Option<Arc<dyn KeyValueSource>>,
    clock: Arc<dyn Clock>,
    by_kind: HashMap<ValueKind, Strategy>,
    by_type: HashMap<ExactType, Strategy>,
    by_name: HashMap<String, Strategy>,
}

impl FillerBuilder {
    pub fn new() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
            mode: Mode::default(),
            lookup: None,
            clock: Arc::new(SystemClock),
            by_kind: coerce::kind_strategies(),
            by_type: coerce::exact_strategies(),
            by_name: HashMap::new(),
        }
    }
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
    /// Replaces the overlay-then-environment lookup used by selectors.
    pub fn lookup(mut self, lookup: Arc<dyn KeyValueSource>) -> Self {
        self.lookup = Some(lookup);
        self
    }
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
    pub fn kind<F>(mut self, kind: ValueKind, strategy: F) -> Self
    where
        F: Fn(&Filler, FieldValue<'_>, &str) -> std::result::Result<(), FieldError> + Send + Sync + 'static,
    {
        self.by_kind.insert(kind, Arc::new(strategy));
        self
    }
    pub fn exact<F>(mut self, exact: ExactType, strategy: F) -> Self
    where
        F: Fn(&Filler, FieldValue<'_>, &str) -> std::result::Result<(), FieldError> + Send + Sync + 'static,
    {
        self.by_type.insert(exact, Arc::new(strategy));
        self
    }
    /// Strategy for every field with this name, at any depth.
    pub fn field<F>(mut self, name: impl Into<String>, strategy: F) -> Self
    where
        F: Fn(&Filler, FieldValue<'_>, &str) -> std::result::Result<(), FieldError> + Send + Sync + 'static,
    {
        self.by_name.insert(name.into(), Arc::new(strategy));
        self
    }
    pub fn build(self) -> Filler {
        Filler {
            tag: self.tag,
            mode: self.mode,
            lookup: self.lookup.unwrap_or_else(source::default_lookup),
            clock: self.clock,
            by_kind: self.by_kind,
            by_type: self.by_type,
            by_name: self.by_name,
        }
    }
}

impl Default for FillerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one fill: the current field path and the outcomes so far.
pub struct Walk<'f> {
    filler: &'f Filler,
    path: Vec<String>,
    report: FillReport,
}

impl Walk<'_> {
    pub(crate) fn record<R: Record>(&mut self, record: &mut R) -> Result<()> {
        for spec in R::schema().fields() {
            self.path.push(spec.name.to_string());
            let result = self.field(spec.name, spec.annotation, spec.value(record));
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn field(&mut self, name: &str, annotation: &str, value: FieldValue<'_>) -> Result<()> {
        let value = match value {
            FieldValue::Record(nested) => return nested.fill_fields(self),
            FieldValue::Records(list) => return self.records(list),
            other => other,
        };
        let path = self.path_string();
        let Some(text) = tag::lookup(annotation, &self.filler.tag).filter(|t| !t.is_empty()) else {
            self.report.push(path, FieldOutcome::Skipped);
            return Ok(());
        };
        if !value.is_zero() {
            self.report.push(path, FieldOutcome::Kept);
            return Ok(());
        }
        match self.filler.apply(Some(name), value, &text) {
            Ok(()) => {
                trace!(field = %path, "default applied");
                self.report.push(path, FieldOutcome::Defaulted);
                Ok(())
            }
            Err(e) if self.filler.mode == Mode::Lenient => {
                debug!(field = %path, error = %e, "default not applied");
                self.report.push(path, FieldOutcome::Failed(e));
                Ok(())
            }
            Err(e) => {
                self.report.push(path.clone(), FieldOutcome::Failed(e.clone()));
                Err(PrefillError::Field { path, source: e })
            }
        }
    }

    fn records(&mut self, list: &mut dyn RecordList) -> Result<()> {
        for index in 0..list.len() {
            let Some(element) = list.element(index) else {
                continue;
            };
            self.path.push(format!("[{}]", index));
            let result = element.fill_fields(self);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn path_string(&self) -> String {
        let mut path = String::new();
        for segment in &self.path {
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(segment);
        }
        path
    }
}
