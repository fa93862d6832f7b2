use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::error::ValidationError;
use crate::format::parse_decimal;
use crate::models::{Expense, ExpenseType};
use crate::ui::components::date_input::DateInputState;
use crate::ui::components::{edit_number, edit_text, form_line, render_error, render_help, render_title, wizard_layout};

pub enum ExpenseWizardAction {
    Cancel,
    Save(Expense),
}

#[derive(Clone, Copy, PartialEq)]
pub enum ExpenseField {
    Date,
    Type,
    Description,
    Amount,
    Notes,
}

pub struct ExpenseWizardState {
    owner_email: String,
    date_state: DateInputState,
    kind: ExpenseType,
    description: String,
    amount_input: String,
    notes: String,
    current_field: ExpenseField,
    editing: bool,
    show_error: Option<String>,
}

impl ExpenseWizardState {
    pub fn new(owner_email: &str, today: NaiveDate) -> Self {
        Self {
            owner_email: owner_email.to_string(),
            date_state: DateInputState::new(today),
            kind: ExpenseType::default(),
            description: String::new(),
            amount_input: String::new(),
            notes: String::new(),
            current_field: ExpenseField::Date,
            editing: false,
            show_error: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.current_field == ExpenseField::Date {
            self.date_state.toggle_editing();
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ExpenseField::Date => ExpenseField::Type,
            ExpenseField::Type => ExpenseField::Description,
            ExpenseField::Description => ExpenseField::Amount,
            ExpenseField::Amount => ExpenseField::Notes,
            ExpenseField::Notes => ExpenseField::Date,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ExpenseField::Date => ExpenseField::Notes,
            ExpenseField::Type => ExpenseField::Date,
            ExpenseField::Description => ExpenseField::Type,
            ExpenseField::Amount => ExpenseField::Description,
            ExpenseField::Notes => ExpenseField::Amount,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            ExpenseField::Date => self.date_state.handle_input(key),
            ExpenseField::Description => edit_text(&mut self.description, key),
            ExpenseField::Amount => edit_number(&mut self.amount_input, key),
            ExpenseField::Notes => edit_text(&mut self.notes, key),
            ExpenseField::Type => {}
        }
    }

    pub fn to_expense(&self) -> Result<Expense, ValidationError> {
        if self.description.trim().is_empty() {
            return Err(ValidationError::MissingField("Description"));
        }
        let amount = parse_decimal(&self.amount_input).ok_or(ValidationError::InvalidNumber("Amount"))?;

        let expense = Expense {
            id: String::new(),
            date: self.date_state.date,
            kind: self.kind,
            description: self.description.trim().to_string(),
            amount,
            notes: self.notes.trim().to_string(),
            owner_email: self.owner_email.clone(),
        };
        expense.validate()?;

        Ok(expense)
    }
}

pub fn render_expense_wizard<B: Backend>(frame: &mut Frame<B>, state: &mut ExpenseWizardState) {
    let size = frame.size();
    let chunks = wizard_layout(size);
    render_title(frame, chunks[0], "New Expense");

    let date = state.date_state.get_display_string();
    let current = state.current_field;
    let editing = state.editing;
    let lines: Vec<Spans> = vec![
        form_line("Date", &date, current == ExpenseField::Date, false),
        form_line("Type", state.kind.label(), current == ExpenseField::Type, false),
        form_line("Description", &state.description, current == ExpenseField::Description, editing),
        form_line("Amount (R$)", &state.amount_input, current == ExpenseField::Amount, editing),
        form_line("Notes", &state.notes, current == ExpenseField::Notes, editing),
    ];
    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Expense Details"));
    frame.render_widget(form, chunks[1]);

    let help = match (state.editing, state.current_field) {
        (true, ExpenseField::Date) => "Type digits - Set date part | Left/Right - Switch date part | Enter - Done",
        (true, _) => "Enter - Save field | Esc - Cancel editing",
        (false, _) => "Enter - Edit field | Left/Right - Change type | Up/Down - Navigate | S - Save | Esc - Cancel",
    };
    render_help(frame, chunks[2], help);

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut ExpenseWizardState) -> Result<Option<ExpenseWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut ExpenseWizardState, key: KeyCode) -> Option<ExpenseWizardAction> {
    if state.show_error.take().is_some() {
        return None;
    }

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ExpenseWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if state.current_field == ExpenseField::Type {
                state.kind = state.kind.next();
            } else {
                state.toggle_editing();
            }
        }
        KeyCode::Left | KeyCode::Right if !state.editing && state.current_field == ExpenseField::Type => {
            state.kind = state.kind.next();
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => match state.to_expense() {
            Ok(expense) => return Some(ExpenseWizardAction::Save(expense)),
            Err(err) => state.show_error = Some(err.to_string()),
        },
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn fill(state: &mut ExpenseWizardState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn date_defaults_to_today_and_can_be_changed() {
        let mut state = ExpenseWizardState::new("marceneiro@example.com", today());
        fill(&mut state, "10");
        handle_key(&mut state, KeyCode::Down);
        handle_key(&mut state, KeyCode::Right);
        handle_key(&mut state, KeyCode::Down);
        fill(&mut state, "Frete");
        handle_key(&mut state, KeyCode::Down);
        fill(&mut state, "45,90");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(ExpenseWizardAction::Save(expense)) => {
                assert_eq!(expense.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
                assert_eq!(expense.kind, ExpenseType::Transport);
                assert_eq!(expense.amount, 45.9);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn amount_must_be_numeric() {
        let mut state = ExpenseWizardState::new("marceneiro@example.com", today());
        state.current_field = ExpenseField::Description;
        fill(&mut state, "Almoço");

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.show_error.as_deref(), Some("Amount must be a valid number."));
    }
}
