//! Error buckets collected during a validation pass.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constraints::ViolationKind;

/// The category a recorded error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Table shape and structure
    Meta,
    /// Column content
    Data,
    /// Table-level constraints
    Constraints,
}

impl Bucket {
    /// All buckets, in report order.
    pub const ALL: [Bucket; 3] = [Bucket::Meta, Bucket::Data, Bucket::Constraints];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Meta => "meta",
            Bucket::Data => "data",
            Bucket::Constraints => "constraints",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed condition: the property it was declared on and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    pub property: String,
    pub message: String,
    /// Violation kind for predicate failures; `None` for exact mismatches
    /// and missing columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ViolationKind>,
}

impl ErrorEntry {
    pub fn new(
        property: impl Into<String>,
        message: impl Into<String>,
        kind: Option<ViolationKind>,
    ) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
            kind,
        }
    }

    /// Returns the entry as a `(property, message)` pair.
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.property, &self.message)
    }
}

/// The errors recorded by the most recent validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLog {
    pub meta: Vec<ErrorEntry>,
    pub data: Vec<ErrorEntry>,
    pub constraints: Vec<ErrorEntry>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bucket: Bucket, entry: ErrorEntry) {
        self.bucket_mut(bucket).push(entry);
    }

    pub fn bucket(&self, bucket: Bucket) -> &[ErrorEntry] {
        match bucket {
            Bucket::Meta => &self.meta,
            Bucket::Data => &self.data,
            Bucket::Constraints => &self.constraints,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<ErrorEntry> {
        match bucket {
            Bucket::Meta => &mut self.meta,
            Bucket::Data => &mut self.data,
            Bucket::Constraints => &mut self.constraints,
        }
    }

    /// Total number of recorded errors across all buckets.
    pub fn len(&self) -> usize {
        self.meta.len() + self.data.len() + self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every entry with its bucket, in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Bucket, &ErrorEntry)> + '_ {
        Bucket::ALL
            .into_iter()
            .flat_map(move |b| self.bucket(b).iter().map(move |e| (b, e)))
    }
}
