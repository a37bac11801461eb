use std::{fmt, ops::Add, str::FromStr};

use crate::EngineError;

/// Money amount represented as **integer hundredths**.
///
/// The ledger is currency-agnostic: the value is a fixed-point decimal with
/// two fraction digits, stored as an `i64` to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount = Amount::new(150_00);
/// assert_eq!(amount.hundredths(), 15000);
/// assert_eq!(amount.to_string(), "150.00");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().hundredths(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().hundredths(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates a new amount from integer hundredths.
    #[must_use]
    pub const fn new(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Returns the raw value in hundredths.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Parses user input and requires the result to be strictly positive.
    pub fn parse_positive(input: &str) -> Result<Self, EngineError> {
        let amount: Amount = input.parse()?;
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a plain decimal such as `150`, `-3`, `12.5` or `12,50`.
    ///
    /// Amounts are kept in hundredths, so a third fraction digit is an error
    /// rather than being rounded away. Exponents and grouping are not
    /// accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::Validation(format!("not a number: {:?}", s.trim()));

        let text = s.trim().replace(',', ".");
        let (negative, digits) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text.as_str()),
        };
        let (units, fraction) = digits.split_once('.').unwrap_or((digits, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if units.is_empty() || !all_digits(units) || !all_digits(fraction) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(EngineError::Validation(
                "at most two decimals are allowed".to_string(),
            ));
        }

        let cents = format!("{fraction:0<2}");
        let total = units
            .parse::<i64>()
            .ok()
            .and_then(|u| u.checked_mul(100))
            .and_then(|u| u.checked_add(cents.parse::<i64>().unwrap_or(0)))
            .ok_or_else(|| EngineError::Validation("amount too large".to_string()))?;

        Ok(Amount(if negative { -total } else { total }))
    }
}
