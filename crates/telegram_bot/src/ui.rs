use engine::{Amount, FilterType, RecordField, Transaction, TransactionKind, fields};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::callbacks::{Action, FilterChoice};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

/// A message to render: text plus an optional panel of button rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Screen {
    pub text: String,
    pub rows: Vec<Vec<Button>>,
}

impl Screen {
    fn new(text: impl Into<String>, rows: Vec<Vec<Button>>) -> Self {
        Self {
            text: text.into(),
            rows,
        }
    }

    /// Prepends a line to the text, keeping the buttons.
    fn headed(mut self, line: &str) -> Self {
        self.text = format!("{line}\n\n{}", self.text);
        self
    }

    pub(crate) fn keyboard(&self) -> Option<InlineKeyboardMarkup> {
        if self.rows.is_empty() {
            return None;
        }
        Some(InlineKeyboardMarkup::new(self.rows.iter().map(|row| {
            row.iter()
                .map(|b| InlineKeyboardButton::callback(b.label.clone(), b.action.to_string()))
                .collect::<Vec<_>>()
        })))
    }
}

fn cancel_row() -> Vec<Vec<Button>> {
    vec![vec![Button::new("❌ Cancel", Action::BackToMenu)]]
}

fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Expense => "Expense",
        TransactionKind::Income => "Income",
    }
}

pub(crate) fn main_menu(text: impl Into<String>) -> Screen {
    Screen::new(
        text,
        vec![
            vec![Button::new(
                "📉 Expense",
                Action::Record(TransactionKind::Expense),
            )],
            vec![Button::new(
                "📈 Income",
                Action::Record(TransactionKind::Income),
            )],
            vec![Button::new("👀 View", Action::View)],
        ],
    )
}

pub(crate) fn welcome() -> Screen {
    main_menu("💰 Welcome to your finance bot!\nChoose an action:")
}

pub(crate) fn home() -> Screen {
    main_menu("Choose an action:")
}

pub(crate) fn help() -> Screen {
    main_menu(
        "Record an expense or an income with the buttons, then answer the questions.\n\
         Use 👀 View to browse, edit or delete your records.\n\n\
         /start shows the menu, /cancel drops whatever you were typing.",
    )
}

pub(crate) fn use_the_buttons() -> Screen {
    main_menu("Please use the buttons below.")
}

pub(crate) fn unknown_action() -> Screen {
    main_menu("This button is no longer valid. Choose an action:")
}

pub(crate) fn filter_menu() -> Screen {
    Screen::new(
        "Choose a filter:",
        vec![
            vec![Button::new(
                "📅 By date",
                Action::Filter(FilterChoice::Value(FilterType::Date)),
            )],
            vec![Button::new(
                "📆 By month",
                Action::Filter(FilterChoice::Value(FilterType::Month)),
            )],
            vec![Button::new(
                "🗓 By year",
                Action::Filter(FilterChoice::Value(FilterType::Year)),
            )],
            vec![Button::new(
                "📉 Expenses",
                Action::Filter(FilterChoice::Kind(TransactionKind::Expense)),
            )],
            vec![Button::new(
                "📈 Incomes",
                Action::Filter(FilterChoice::Kind(TransactionKind::Income)),
            )],
            vec![Button::new(
                "🔍 All records",
                Action::Filter(FilterChoice::All),
            )],
            vec![Button::new("🔙 Back", Action::BackToMenu)],
        ],
    )
}

pub(crate) fn ask_amount(kind: TransactionKind) -> Screen {
    let what = match kind {
        TransactionKind::Expense => "expense",
        TransactionKind::Income => "income",
    };
    Screen::new(format!("Enter the {what} amount:"), cancel_row())
}

pub(crate) fn retry_amount() -> Screen {
    Screen::new(
        "Please enter a valid amount (a positive number, e.g. 150 or 12.50):",
        cancel_row(),
    )
}

pub(crate) fn ask_category() -> Screen {
    Screen::new("Enter the category:", cancel_row())
}

pub(crate) fn retry_category() -> Screen {
    Screen::new("The category cannot be empty. Enter the category:", cancel_row())
}

pub(crate) fn ask_filter_value(filter: FilterType) -> Screen {
    let what = match filter {
        FilterType::Date => "date",
        FilterType::Month => "month",
        FilterType::Year => "year",
    };
    Screen::new(
        format!("Enter the {what} as {}:", filter.pattern()),
        cancel_row(),
    )
}

pub(crate) fn retry_filter_value(filter: FilterType) -> Screen {
    Screen::new(
        format!("Invalid format, expected {}. Try again:", filter.pattern()),
        cancel_row(),
    )
}

pub(crate) fn ask_field_value(field: RecordField) -> Screen {
    let text = match field {
        RecordField::Kind => format!(
            "Enter the new kind ({}/{}):",
            TransactionKind::Expense,
            TransactionKind::Income
        ),
        RecordField::Amount => "Enter the new amount:".to_string(),
        RecordField::Category => "Enter the new category:".to_string(),
        RecordField::Timestamp => "Enter the new date (YYYY-MM-DD HH:MM:SS):".to_string(),
    };
    Screen::new(text, cancel_row())
}

pub(crate) fn retry_field_value(field: RecordField) -> Screen {
    ask_field_value(field).headed("Invalid value. Try again.")
}

pub(crate) fn saved(kind: TransactionKind, amount: Amount, category: &str) -> Screen {
    main_menu(format!(
        "✅ {} recorded:\nAmount: {amount}\nCategory: {category}",
        kind_label(kind)
    ))
}

pub(crate) fn list(transactions: &[Transaction], limit: usize) -> Screen {
    if transactions.is_empty() {
        return main_menu("No records.");
    }

    let shown = &transactions[..transactions.len().min(limit)];
    let (income, expenses) = shown.iter().fold(
        (Amount::ZERO, Amount::ZERO),
        |(income, expenses), tx| match tx.kind {
            TransactionKind::Income => (income + tx.amount, expenses),
            TransactionKind::Expense => (income, expenses + tx.amount),
        },
    );

    let mut text = format!("📊 Pick a record:\nIncome: {income} • Expenses: {expenses}");
    if transactions.len() > shown.len() {
        text.push_str(&format!("\n(showing the latest {})", shown.len()));
    }

    let mut rows: Vec<Vec<Button>> = shown
        .iter()
        .map(|tx| {
            vec![Button::new(
                format!(
                    "{} - {}: {} ({})",
                    tx.timestamp.date(),
                    tx.kind,
                    tx.amount,
                    tx.category
                ),
                Action::Show(tx.id),
            )]
        })
        .collect();
    rows.push(vec![Button::new("🔙 Back", Action::BackToMenu)]);

    Screen::new(text, rows)
}

pub(crate) fn detail(tx: &Transaction) -> Screen {
    Screen::new(
        format!(
            "📊 Transaction #{}:\n\nKind: {}\nAmount: {}\nCategory: {}\nDate: {}",
            tx.id,
            tx.kind,
            tx.amount,
            tx.category,
            fields::format_timestamp(tx.timestamp)
        ),
        vec![
            vec![Button::new("✏️ Edit", Action::Edit(tx.id))],
            vec![Button::new("🗑️ Delete", Action::Delete(tx.id))],
            vec![Button::new("🔙 Back", Action::BackToView)],
        ],
    )
}

pub(crate) fn updated(tx: &Transaction) -> Screen {
    detail(tx).headed("✅ Record updated!")
}

pub(crate) fn edit_menu(id: i64) -> Screen {
    let mut rows: Vec<Vec<Button>> = RecordField::ALL
        .into_iter()
        .map(|field| {
            let label = match field {
                RecordField::Kind => "Kind",
                RecordField::Amount => "Amount",
                RecordField::Category => "Category",
                RecordField::Timestamp => "Date",
            };
            vec![Button::new(label, Action::EditField { field, id })]
        })
        .collect();
    rows.push(vec![Button::new("🔙 Back", Action::BackToTransaction(id))]);
    Screen::new("Choose the field to edit:", rows)
}

pub(crate) fn confirm_delete(id: i64) -> Screen {
    Screen::new(
        "Are you sure you want to delete this record?",
        vec![
            vec![Button::new("✅ Yes", Action::ConfirmDelete(id))],
            vec![Button::new("❌ No", Action::BackToTransaction(id))],
        ],
    )
}

pub(crate) fn deleted() -> Screen {
    main_menu("✅ Record deleted!")
}

pub(crate) fn not_found() -> Screen {
    main_menu("Transaction not found.")
}

pub(crate) fn storage_failure() -> Screen {
    Screen::new(
        "⚠️ Something went wrong. Please try again.",
        cancel_row(),
    )
}

pub(crate) fn rejected(reason: &str) -> Screen {
    Screen::new(format!("Invalid value: {reason}. Try again."), cancel_row())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_fits_reads_and_writes() {
        let screen = storage_failure();
        assert!(!screen.text.contains("saving"));
        assert_eq!(screen.rows, cancel_row());
    }

    #[test]
    fn prompts_offer_a_way_back() {
        for screen in [ask_amount(TransactionKind::Income), ask_category(), retry_amount()] {
            let keyboard = screen.keyboard().unwrap();
            assert_eq!(keyboard.inline_keyboard.len(), 1);
        }
        assert!(filter_menu().rows.iter().flatten().any(|b| b.action == Action::BackToMenu));
    }
}
