//! Button tokens.
//!
//! Every inline button carries an opaque token in its callback data. Tokens
//! are underscore-delimited: an action name, then an optional field name,
//! then an optional record id (`show_42`, `field_amount_42`,
//! `confirm_delete_42`, `filter_month`).

use std::{fmt, str::FromStr};

use engine::{FilterType, RecordField, TransactionKind};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub(crate) enum TokenError {
    #[error("unknown token: {0}")]
    Unknown(String),
    #[error("invalid record id in token: {0}")]
    InvalidId(String),
}

/// What the filter menu offers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FilterChoice {
    /// Needs a typed value.
    Value(FilterType),
    Kind(TransactionKind),
    All,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Record(TransactionKind),
    View,
    Filter(FilterChoice),
    Show(i64),
    Edit(i64),
    EditField { field: RecordField, id: i64 },
    Delete(i64),
    ConfirmDelete(i64),
    BackToTransaction(i64),
    BackToView,
    BackToMenu,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(kind) => write!(f, "{kind}"),
            Self::View => f.write_str("view"),
            Self::Filter(FilterChoice::Value(ty)) => write!(f, "filter_{}", ty.as_str()),
            Self::Filter(FilterChoice::Kind(TransactionKind::Expense)) => {
                f.write_str("filter_expenses")
            }
            Self::Filter(FilterChoice::Kind(TransactionKind::Income)) => {
                f.write_str("filter_incomes")
            }
            Self::Filter(FilterChoice::All) => f.write_str("filter_all"),
            Self::Show(id) => write!(f, "show_{id}"),
            Self::Edit(id) => write!(f, "edit_{id}"),
            Self::EditField { field, id } => write!(f, "field_{}_{id}", field.as_str()),
            Self::Delete(id) => write!(f, "delete_{id}"),
            Self::ConfirmDelete(id) => write!(f, "confirm_delete_{id}"),
            Self::BackToTransaction(id) => write!(f, "back_to_transaction_{id}"),
            Self::BackToView => f.write_str("back_to_view"),
            Self::BackToMenu => f.write_str("back_to_menu"),
        }
    }
}

fn parse_id(raw: &str, token: &str) -> Result<i64, TokenError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| TokenError::InvalidId(token.to_string()))
}

impl FromStr for Action {
    type Err = TokenError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || TokenError::Unknown(token.to_string());

        match token {
            "expense" => return Ok(Self::Record(TransactionKind::Expense)),
            "income" => return Ok(Self::Record(TransactionKind::Income)),
            "view" => return Ok(Self::View),
            "filter_expenses" => {
                return Ok(Self::Filter(FilterChoice::Kind(TransactionKind::Expense)));
            }
            "filter_incomes" => {
                return Ok(Self::Filter(FilterChoice::Kind(TransactionKind::Income)));
            }
            "filter_all" => return Ok(Self::Filter(FilterChoice::All)),
            "back_to_view" => return Ok(Self::BackToView),
            "back_to_menu" => return Ok(Self::BackToMenu),
            _ => {}
        }

        if let Some(rest) = token.strip_prefix("back_to_transaction_") {
            return Ok(Self::BackToTransaction(parse_id(rest, token)?));
        }
        if let Some(rest) = token.strip_prefix("confirm_delete_") {
            return Ok(Self::ConfirmDelete(parse_id(rest, token)?));
        }
        if let Some(rest) = token.strip_prefix("filter_") {
            let ty = FilterType::try_from(rest).map_err(|_| unknown())?;
            return Ok(Self::Filter(FilterChoice::Value(ty)));
        }
        if let Some(rest) = token.strip_prefix("field_") {
            let (field, id) = rest.rsplit_once('_').ok_or_else(unknown)?;
            let field = RecordField::try_from(field).map_err(|_| unknown())?;
            return Ok(Self::EditField {
                field,
                id: parse_id(id, token)?,
            });
        }
        if let Some(rest) = token.strip_prefix("show_") {
            return Ok(Self::Show(parse_id(rest, token)?));
        }
        if let Some(rest) = token.strip_prefix("edit_") {
            return Ok(Self::Edit(parse_id(rest, token)?));
        }
        if let Some(rest) = token.strip_prefix("delete_") {
            return Ok(Self::Delete(parse_id(rest, token)?));
        }

        Err(unknown())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_documented_tokens() {
        assert_eq!(
            "field_amount_42".parse::<Action>().unwrap(),
            Action::EditField {
                field: RecordField::Amount,
                id: 42
            }
        );
        assert_eq!(
            "confirm_delete_42".parse::<Action>().unwrap(),
            Action::ConfirmDelete(42)
        );
        assert_eq!(
            "filter_month".parse::<Action>().unwrap(),
            Action::Filter(FilterChoice::Value(FilterType::Month))
        );
        assert_eq!(
            "back_to_transaction_7".parse::<Action>().unwrap(),
            Action::BackToTransaction(7)
        );
    }

    #[test]
    fn display_matches_button_vocabulary() {
        assert_eq!(Action::Record(TransactionKind::Expense).to_string(), "expense");
        assert_eq!(
            Action::Filter(FilterChoice::Kind(TransactionKind::Income)).to_string(),
            "filter_incomes"
        );
        assert_eq!(
            Action::EditField {
                field: RecordField::Timestamp,
                id: 3
            }
            .to_string(),
            "field_timestamp_3"
        );
        assert_eq!(Action::BackToMenu.to_string(), "back_to_menu");
    }

    #[test]
    fn rejects_unknown_and_malformed_tokens() {
        assert!(matches!(
            "filter_week".parse::<Action>(),
            Err(TokenError::Unknown(_))
        ));
        assert!(matches!(
            "field_note_4".parse::<Action>(),
            Err(TokenError::Unknown(_))
        ));
        assert!(matches!(
            "show_abc".parse::<Action>(),
            Err(TokenError::InvalidId(_))
        ));
        assert!(matches!(
            "delete_-1".parse::<Action>(),
            Err(TokenError::InvalidId(_))
        ));
        assert!(matches!("".parse::<Action>(), Err(TokenError::Unknown(_))));
    }
}
