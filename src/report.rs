//! What a fill did to each field.

use std::fmt;

use crate::error::FieldError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The zero value was replaced by the default.
    Defaulted,
    /// The field already held a non-zero value.
    Kept,
    /// No annotation under the configured key.
    Skipped,
    /// The default could not be applied; the field keeps its zero value.
    Failed(FieldError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldReport {
    pub path: String,
    pub outcome: FieldOutcome,
}

/// Per-field outcomes of one fill, in visiting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillReport {
    fields: Vec<FieldReport>,
}

impl FillReport {
    pub fn new() -> Self {
        Self::default()
    }
    pub(crate) fn push(&mut self, path: String, outcome: FieldOutcome) {
        self.fields.push(FieldReport { path, outcome });
    }
    pub fn fields(&self) -> &[FieldReport] {
        &self.fields
    }
    pub fn outcome(&self, path: &str) -> Option<&FieldOutcome> {
        self.fields.iter().find(|f| f.path == path).map(|f| &f.outcome)
    }
    pub fn defaulted(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.outcome == FieldOutcome::Defaulted)
            .map(|f| f.path.as_str())
    }
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FieldError)> {
        self.fields.iter().filter_map(|f| match &f.outcome {
            FieldOutcome::Failed(e) => Some((f.path.as_str(), e)),
            _ => None,
        })
    }
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl fmt::Display for FillReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for field in &self.fields {
            match &field.outcome {
                FieldOutcome::Defaulted => writeln!(f, "{}: defaulted", field.path)?,
                FieldOutcome::Kept => writeln!(f, "{}: kept", field.path)?,
                FieldOutcome::Skipped => writeln!(f, "{}: skipped", field.path)?,
                FieldOutcome::Failed(e) => writeln!(f, "{}: failed ({})", field.path, e)?,
            }
        }
        Ok(())
    }
}
