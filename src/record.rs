//! Records and the slots the filler writes into.
//!
//! A [`Record`] describes its fields once through a [`Schema`]: a name, a
//! static annotation and an accessor handing out a [`FieldValue`] borrow of
//! the field. The schema is built on first use and kept for the lifetime of
//! the process, so walking a record never re-derives field metadata.
//!
//! ```
//! use lazy_static::lazy_static;
//! use prefill::record::{FieldValue, Record, Schema};
//!
//! #[derive(Default)]
//! struct Listener {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Record for Listener {
//!     fn schema() -> &'static Schema<Self> {
//!         lazy_static! {
//!             static ref SCHEMA: Schema<Listener> = Schema::<Listener>::new("Listener")
//!                 .field("host", r#"default:"localhost""#, |l| FieldValue::from(&mut l.host))
//!                 .field("port", r#"default:"8080""#, |l| FieldValue::from(&mut l.port));
//!         }
//!         &SCHEMA
//!     }
//! }
//!
//! let mut listener = Listener::default();
//! prefill::set_defaults(&mut listener).unwrap();
//! assert_eq!(listener.host, "localhost");
//! assert_eq!(listener.port, 8080);
//! ```

use chrono::{NaiveDateTime, TimeDelta};

use crate::error::{FieldError, Result};
use crate::filler::{Filler, Walk};

pub trait Record: Sized + 'static {
    fn schema() -> &'static Schema<Self>;
}

/// Field table of one record type.
pub struct Schema<R> {
    name: &'static str,
    fields: Vec<FieldSpec<R>>,
}

impl<R> Schema<R> {
    /// Starts an empty schema. Name the record type on the call
    /// (`Schema::<Point>::new`) so the accessors in the `.field` chain can
    /// see which fields exist.
    ///
    /// ```
    /// use prefill::record::{FieldValue, Schema};
    ///
    /// #[derive(Default)]
    /// struct Point {
    ///     x: i32,
    ///     y: i32,
    /// }
    ///
    /// let schema = Schema::<Point>::new("Point")
    ///     .field("x", r#"default:"1""#, |p| FieldValue::from(&mut p.x))
    ///     .field("y", r#"default:"2""#, |p| FieldValue::from(&mut p.y));
    /// let names: Vec<_> = schema.fields().iter().map(|f| f.name).collect();
    /// assert_eq!(names, ["x", "y"]);
    /// ```
    pub fn new(name: &'static str) -> Self {
        Self { name, fields: Vec::new() }
    }
    pub fn field(
        mut self,
        name: &'static str,
        annotation: &'static str,
        access: fn(&mut R) -> FieldValue<'_>,
    ) -> Self {
        self.fields.push(FieldSpec { name, annotation, access });
        self
    }
    pub fn name(&self) -> &'static str {
        self.name
    }
    pub fn fields(&self) -> &[FieldSpec<R>] {
        &self.fields
    }
}

pub struct FieldSpec<R> {
    pub name: &'static str,
    pub annotation: &'static str,
    access: fn(&mut R) -> FieldValue<'_>,
}

impl<R> FieldSpec<R> {
    pub fn value<'a>(&self, record: &'a mut R) -> FieldValue<'a> {
        (self.access)(record)
    }
}

/// A mutable borrow of one field slot inside a record.
pub enum FieldValue<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    F32(&'a mut f32),
    F64(&'a mut f64),
    Str(&'a mut String),
    /// `None` is the unset state; `Some(vec![])` counts as set.
    Bytes(&'a mut Option<Vec<u8>>),
    Duration(&'a mut TimeDelta),
    Timestamp(&'a mut NaiveDateTime),
    List(&'a mut dyn ListField),
    Record(&'a mut dyn Fill),
    Records(&'a mut dyn RecordList),
}

impl<'a> FieldValue<'a> {
    pub fn record<R: Record>(record: &'a mut R) -> Self {
        FieldValue::Record(record)
    }
    pub fn records<R: Record>(records: &'a mut Vec<R>) -> Self {
        FieldValue::Records(records)
    }
    pub fn list<T: Scalar>(list: &'a mut Vec<T>) -> Self {
        FieldValue::List(list)
    }
}

/// Element types allowed inside a scalar sequence.
pub trait Scalar: Default + 'static {
    const TYPE_NAME: &'static str;
    fn slot(&mut self) -> FieldValue<'_>;
}

macro_rules! scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);
                fn slot(&mut self) -> FieldValue<'_> {
                    FieldValue::$variant(self)
                }
            }
            impl<'a> From<&'a mut $ty> for FieldValue<'a> {
                fn from(value: &'a mut $ty) -> Self {
                    FieldValue::$variant(value)
                }
            }
        )*
    };
}

scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => Str,
    Option<Vec<u8>> => Bytes,
    TimeDelta => Duration,
    NaiveDateTime => Timestamp,
}

impl<'a, T: Scalar> From<&'a mut Vec<T>> for FieldValue<'a> {
    fn from(list: &'a mut Vec<T>) -> Self {
        FieldValue::List(list)
    }
}

/// A homogeneous sequence of scalars.
pub trait ListField {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn element_type(&self) -> &'static str;
    /// Replaces the contents with one element per item, each coerced by the
    /// filler's element strategy.
    fn assign(&mut self, items: &[String], filler: &Filler) -> std::result::Result<(), FieldError>;
}

impl<T: Scalar> ListField for Vec<T> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn element_type(&self) -> &'static str {
        T::TYPE_NAME
    }
    fn assign(&mut self, items: &[String], filler: &Filler) -> std::result::Result<(), FieldError> {
        let mut values = Vec::with_capacity(items.len());
        for item in items {
            let mut value = T::default();
            filler.coerce_element(value.slot(), item)?;
            values.push(value);
        }
        *self = values;
        Ok(())
    }
}

/// Object safe view of a record, used for nested fields.
pub trait Fill {
    fn type_name(&self) -> &'static str;
    fn fill_fields(&mut self, walk: &mut Walk<'_>) -> Result<()>;
}

impl<R: Record> Fill for R {
    fn type_name(&self) -> &'static str {
        R::schema().name()
    }
    fn fill_fields(&mut self, walk: &mut Walk<'_>) -> Result<()> {
        walk.record(self)
    }
}

/// A sequence of records. Never resized by the filler.
pub trait RecordList {
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn element(&mut self, index: usize) -> Option<&mut dyn Fill>;
}

impl<R: Record> RecordList for Vec<R> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
    fn element(&mut self, index: usize) -> Option<&mut dyn Fill> {
        self.get_mut(index).map(|r| r as &mut dyn Fill)
    }
}
