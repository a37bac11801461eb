//! Per-field validation.
//!
//! Every write to a record goes through the parsers in this module, whether it
//! comes from the initial entry flow or from an edit. That keeps the stored
//! shape consistent: amounts are always positive, categories never empty,
//! timestamps always in [`TIMESTAMP_FORMAT`].

use chrono::NaiveDateTime;
use unicode_normalization::UnicodeNormalization;

use crate::{Amount, EngineError, ResultEngine, TransactionKind};

/// Storage and input format for record timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Editable columns of a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordField {
    Kind,
    Amount,
    Category,
    Timestamp,
}

impl RecordField {
    pub const ALL: [RecordField; 4] = [
        RecordField::Kind,
        RecordField::Amount,
        RecordField::Category,
        RecordField::Timestamp,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kind => "kind",
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Timestamp => "timestamp",
        }
    }
}

impl TryFrom<&str> for RecordField {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "kind" => Ok(Self::Kind),
            "amount" => Ok(Self::Amount),
            "category" => Ok(Self::Category),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(EngineError::Validation(format!("unknown field: {other}"))),
        }
    }
}

/// A validated value for one [`RecordField`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Kind(TransactionKind),
    Amount(Amount),
    Category(String),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    /// Parses raw user text for `field`.
    pub fn parse(field: RecordField, raw: &str) -> ResultEngine<Self> {
        match field {
            RecordField::Kind => TransactionKind::try_from(raw.trim()).map(Self::Kind),
            RecordField::Amount => Amount::parse_positive(raw).map(Self::Amount),
            RecordField::Category => normalize_category(raw).map(Self::Category),
            RecordField::Timestamp => parse_timestamp(raw.trim()).map(Self::Timestamp),
        }
    }

    pub fn field(&self) -> RecordField {
        match self {
            Self::Kind(_) => RecordField::Kind,
            Self::Amount(_) => RecordField::Amount,
            Self::Category(_) => RecordField::Category,
            Self::Timestamp(_) => RecordField::Timestamp,
        }
    }

    /// Re-checks the invariants of an already typed value.
    pub(crate) fn validate(self) -> ResultEngine<Self> {
        match self {
            Self::Amount(amount) if !amount.is_positive() => Err(EngineError::Validation(
                "amount must be > 0".to_string(),
            )),
            Self::Category(category) => normalize_category(&category).map(Self::Category),
            other => Ok(other),
        }
    }
}

/// Trims and NFC-normalizes a category; rejects empty text.
pub fn normalize_category(raw: &str) -> ResultEngine<String> {
    let normalized: String = raw.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::Validation(
            "category must not be empty".to_string(),
        ));
    }
    Ok(normalized)
}

pub fn parse_timestamp(raw: &str) -> ResultEngine<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|_| EngineError::Validation(format!("invalid timestamp: {raw}")))
}

pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
