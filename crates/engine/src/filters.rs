//! Filter compiler for record listings.
//!
//! User text never reaches the query text: a [`FilterType`] parses the raw
//! value into a closed [`FilterIntent`], which compiles into a [`Predicate`]
//! holding exactly one value that is bound as a query parameter.

use chrono::{Datelike, NaiveDate};
use sea_orm::{ColumnTrait, Condition};

use crate::{EngineError, ResultEngine, TransactionKind, transactions};

/// Filters that need a value typed by the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterType {
    Date,
    Month,
    Year,
}

impl FilterType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Expected input shape, for prompts.
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Date => "YYYY-MM-DD",
            Self::Month => "YYYY-MM",
            Self::Year => "YYYY",
        }
    }

    /// Parses the raw user text into an intent, or rejects it with
    /// [`EngineError::InvalidFormat`].
    pub fn parse_value(self, raw: &str) -> ResultEngine<FilterIntent> {
        let invalid = || EngineError::InvalidFormat(format!("expected {}", self.pattern()));
        let raw = raw.trim();
        match self {
            Self::Date => {
                let [y, m, d] = split_numeric::<3>(raw, [4, 2, 2]).ok_or_else(invalid)?;
                let date = NaiveDate::from_ymd_opt(y as i32, m, d).ok_or_else(invalid)?;
                Ok(FilterIntent::ExactDate(date))
            }
            Self::Month => {
                let [y, m] = split_numeric::<2>(raw, [4, 2]).ok_or_else(invalid)?;
                if !(1..=12).contains(&m) {
                    return Err(invalid());
                }
                Ok(FilterIntent::Month {
                    year: y as i32,
                    month: m,
                })
            }
            Self::Year => {
                let [y] = split_numeric::<1>(raw, [4]).ok_or_else(invalid)?;
                Ok(FilterIntent::Year(y as i32))
            }
        }
    }
}

impl TryFrom<&str> for FilterType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "date" => Ok(Self::Date),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(EngineError::Validation(format!("unknown filter: {other}"))),
        }
    }
}

/// What a listing should be restricted to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterIntent {
    #[default]
    None,
    ExactDate(NaiveDate),
    Month { year: i32, month: u32 },
    Year(i32),
    Kind(TransactionKind),
}

impl FilterIntent {
    /// Compiles the intent. `None` means every row of the owner matches.
    pub fn compile(&self) -> Option<Predicate> {
        match *self {
            Self::None => None,
            Self::ExactDate(date) => Some(Predicate::TimestampPrefix(format!(
                "{:04}-{:02}-{:02}",
                date.year(),
                date.month(),
                date.day()
            ))),
            Self::Month { year, month } => {
                Some(Predicate::TimestampPrefix(format!("{year:04}-{month:02}")))
            }
            Self::Year(year) => Some(Predicate::TimestampPrefix(format!("{year:04}"))),
            Self::Kind(kind) => Some(Predicate::KindIs(kind)),
        }
    }
}

/// A compiled filter: a fixed column template plus one bound value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
    /// `timestamp LIKE ?` with the value `<prefix>%`.
    TimestampPrefix(String),
    /// `kind = ?`.
    KindIs(TransactionKind),
}

impl Predicate {
    pub(crate) fn condition(&self) -> Condition {
        match self {
            Self::TimestampPrefix(prefix) => {
                Condition::all().add(transactions::Column::Timestamp.starts_with(prefix.as_str()))
            }
            Self::KindIs(kind) => Condition::all().add(transactions::Column::Kind.eq(kind.as_str())),
        }
    }

    /// Evaluates the predicate against a stored timestamp/kind pair.
    #[cfg(test)]
    fn matches(&self, timestamp: &str, kind: TransactionKind) -> bool {
        match self {
            Self::TimestampPrefix(prefix) => timestamp.starts_with(prefix.as_str()),
            Self::KindIs(expected) => *expected == kind,
        }
    }
}

/// Splits `raw` on `-` into exactly `N` all-digit groups of the given widths.
fn split_numeric<const N: usize>(raw: &str, widths: [usize; N]) -> Option<[u32; N]> {
    let mut out = [0u32; N];
    let mut parts = raw.split('-');
    for (slot, width) in out.iter_mut().zip(widths) {
        let part = parts.next()?;
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse().ok()?;
    }
    if parts.next().is_some() {
        return None;
    }
    Some(out)
}
