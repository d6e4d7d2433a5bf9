//! Record filtering for listing screens
//!
//! A [`RecordFilter`] is a conjunction of predicates over one record type.
//! Predicates are assembled with a [`FilterBuilder`], checked against the
//! fields the record type declares through [`Filterable`], and then applied
//! to in-memory slices. Application never fails and never reorders: the
//! output is the ordered subsequence of the input that satisfies every
//! predicate.

use std::borrow::Cow;
use std::marker::PhantomData;

use crate::error::{ReserviliError, Result};
use crate::metrics::MetricsCollector;
use crate::models::{Booking, Business, Customer, Service};

/// How a field can be matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, searchable by substring
    Text,
    /// Enumerated or identifying value, matched exactly
    Key,
    /// Boolean flag
    Flag,
}

impl FieldKind {
    const fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Key => "key",
            Self::Flag => "flag",
        }
    }
}

/// Value of a record field as seen by the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Text or key value
    Text(Cow<'a, str>),
    /// Flag value
    Flag(bool),
}

/// Records that can be filtered by field name
pub trait Filterable {
    /// Record type name used in errors and metrics
    const RECORD: &'static str;
    /// Declared fields and how each can be matched
    const FIELDS: &'static [(&'static str, FieldKind)];

    /// Value of the named field, `None` for undeclared names
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// A filter condition as requested by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring match; matches if any listed field
    /// contains the needle as given. A blank needle matches everything and
    /// no fields means every text field.
    TextContains {
        /// Fields to search
        fields: Vec<String>,
        /// Text to look for
        needle: String,
    },
    /// Exact match on a key or text field
    Equals {
        /// Field to compare
        field: String,
        /// Expected value
        value: String,
    },
    /// Boolean field equals the given value
    Flag {
        /// Flag field
        field: String,
        /// Expected value
        value: bool,
    },
}

#[derive(Debug, Clone)]
enum Compiled {
    TextContains { fields: Vec<&'static str>, needle: String },
    Equals { field: &'static str, value: String },
    Flag { field: &'static str, value: bool },
}

/// Builder for [`RecordFilter`]
#[derive(Debug)]
pub struct FilterBuilder<T> {
    predicates: Vec<Predicate>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Filterable> Default for FilterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Filterable> FilterBuilder<T> {
    /// Create a builder with no predicates
    #[must_use]
    pub const fn new() -> Self {
        Self { predicates: Vec::new(), _record: PhantomData }
    }

    /// Search every text field for `needle`
    #[must_use]
    pub fn search(self, needle: impl Into<String>) -> Self {
        self.predicate(Predicate::TextContains { fields: Vec::new(), needle: needle.into() })
    }

    /// Search the given fields for `needle`
    #[must_use]
    pub fn search_in(self, fields: &[&str], needle: impl Into<String>) -> Self {
        self.predicate(Predicate::TextContains {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            needle: needle.into(),
        })
    }

    /// Require an exact value on `field`
    #[must_use]
    pub fn equals(self, field: &str, value: impl Into<String>) -> Self {
        self.predicate(Predicate::Equals { field: field.to_string(), value: value.into() })
    }

    /// Require a flag value on `field`
    #[must_use]
    pub fn flag(self, field: &str, value: bool) -> Self {
        self.predicate(Predicate::Flag { field: field.to_string(), value })
    }

    /// Add an arbitrary predicate
    #[must_use]
    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Check every predicate against the record's declared fields
    pub fn build(self) -> Result<RecordFilter<T>> {
        let predicates = self
            .predicates
            .into_iter()
            .map(compile::<T>)
            .collect::<Result<Vec<_>>>()?;
        Ok(RecordFilter { predicates, _record: PhantomData })
    }
}

fn declared<T: Filterable>(name: &str, allowed: &[FieldKind], wanted: FieldKind) -> Result<&'static str> {
    T::FIELDS
        .iter()
        .find(|(field, kind)| *field == name && allowed.contains(kind))
        .map(|(field, _)| *field)
        .ok_or_else(|| ReserviliError::UnknownField {
            record: T::RECORD,
            kind: wanted.label(),
            field: name.to_string(),
        })
}

fn compile<T: Filterable>(predicate: Predicate) -> Result<Compiled> {
    match predicate {
        Predicate::TextContains { fields, needle } => {
            let fields = if fields.is_empty() {
                T::FIELDS
                    .iter()
                    .filter(|(_, kind)| *kind == FieldKind::Text)
                    .map(|(field, _)| *field)
                    .collect()
            } else {
                fields
                    .iter()
                    .map(|f| declared::<T>(f, &[FieldKind::Text, FieldKind::Key], FieldKind::Text))
                    .collect::<Result<Vec<_>>>()?
            };
            Ok(Compiled::TextContains { fields, needle: needle.to_lowercase() })
        }
        Predicate::Equals { field, value } => Ok(Compiled::Equals {
            field: declared::<T>(&field, &[FieldKind::Key, FieldKind::Text], FieldKind::Key)?,
            value,
        }),
        Predicate::Flag { field, value } => Ok(Compiled::Flag {
            field: declared::<T>(&field, &[FieldKind::Flag], FieldKind::Flag)?,
            value,
        }),
    }
}

impl Compiled {
    fn matches<T: Filterable>(&self, record: &T) -> bool {
        match self {
            Self::TextContains { needle, .. } if needle.trim().is_empty() => true,
            Self::TextContains { fields, needle } => fields.iter().any(|field| {
                matches!(record.field(field), Some(FieldValue::Text(text)) if text.to_lowercase().contains(needle.as_str()))
            }),
            Self::Equals { field, value } => {
                matches!(record.field(field), Some(FieldValue::Text(text)) if text == value.as_str())
            }
            Self::Flag { field, value } => record.field(field) == Some(FieldValue::Flag(*value)),
        }
    }
}

/// A validated conjunction of predicates over records of type `T`
#[derive(Debug, Clone)]
pub struct RecordFilter<T> {
    predicates: Vec<Compiled>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Filterable> RecordFilter<T> {
    /// Start building a filter
    #[must_use]
    pub const fn builder() -> FilterBuilder<T> {
        FilterBuilder::new()
    }

    /// Filter that keeps every record
    #[must_use]
    pub const fn all() -> Self {
        Self { predicates: Vec::new(), _record: PhantomData }
    }

    /// Number of predicates
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// True if the filter has no predicates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// True if `record` satisfies every predicate
    #[must_use]
    pub fn matches(&self, record: &T) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Matching records, in input order
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [T]) -> Vec<&'a T> {
        let matched: Vec<&T> = records.iter().filter(|r| self.matches(r)).collect();
        tracing::debug!(
            record = T::RECORD,
            predicates = self.predicates.len(),
            input = records.len(),
            output = matched.len(),
            "Filtered records"
        );
        MetricsCollector::default().record_filter(T::RECORD, records.len(), matched.len());
        matched
    }

    /// Matching records cloned into a new vector, in input order
    #[must_use]
    pub fn apply_owned(&self, records: &[T]) -> Vec<T>
    where
        T: Clone,
    {
        self.apply(records).into_iter().cloned().collect()
    }
}

impl Filterable for Booking {
    const RECORD: &'static str = "booking";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("id", FieldKind::Key),
        ("customer", FieldKind::Text),
        ("service", FieldKind::Text),
        ("status", FieldKind::Key),
        ("date", FieldKind::Key),
        ("disputed", FieldKind::Flag),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(Cow::Borrowed(&self.id)),
            "customer" => FieldValue::Text(Cow::Borrowed(&self.customer_name)),
            "service" => FieldValue::Text(Cow::Borrowed(&self.service_name)),
            "status" => FieldValue::Text(Cow::Borrowed(self.status.as_str())),
            "date" => FieldValue::Text(Cow::Owned(self.date.format("%Y-%m-%d").to_string())),
            "disputed" => FieldValue::Flag(self.disputed),
            _ => return None,
        })
    }
}

impl Filterable for Service {
    const RECORD: &'static str = "service";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("id", FieldKind::Key),
        ("name", FieldKind::Text),
        ("description", FieldKind::Text),
        ("category", FieldKind::Key),
        ("active", FieldKind::Flag),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(Cow::Borrowed(&self.id)),
            "name" => FieldValue::Text(Cow::Borrowed(&self.name)),
            "description" => FieldValue::Text(Cow::Borrowed(&self.description)),
            "category" => FieldValue::Text(Cow::Borrowed(&self.category)),
            "active" => FieldValue::Flag(self.active),
            _ => return None,
        })
    }
}

impl Filterable for Customer {
    const RECORD: &'static str = "customer";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("id", FieldKind::Key),
        ("name", FieldKind::Text),
        ("phone", FieldKind::Text),
        ("email", FieldKind::Text),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(Cow::Borrowed(&self.id)),
            "name" => FieldValue::Text(Cow::Borrowed(&self.name)),
            "phone" => FieldValue::Text(Cow::Borrowed(&self.phone)),
            "email" => FieldValue::Text(Cow::Borrowed(self.email.as_deref().unwrap_or_default())),
            _ => return None,
        })
    }
}

impl Filterable for Business {
    const RECORD: &'static str = "business";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("id", FieldKind::Key),
        ("name", FieldKind::Text),
        ("city", FieldKind::Text),
        ("category", FieldKind::Key),
        ("sponsored", FieldKind::Flag),
    ];

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::Text(Cow::Borrowed(&self.id)),
            "name" => FieldValue::Text(Cow::Borrowed(&self.name)),
            "city" => FieldValue::Text(Cow::Borrowed(&self.city)),
            "category" => FieldValue::Text(Cow::Borrowed(self.category.as_str())),
            "sponsored" => FieldValue::Flag(self.sponsored),
            _ => return None,
        })
    }
}
