use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::format::format_money;
use crate::models::{Expense, ExpenseFilter, ExpenseTotals, ExpenseType};
use crate::ui::components::{
    clamp_selection, highlight_style, listing_layout, render_buttons, render_delete_confirmation, wrap_next,
    wrap_previous,
};

/// Expense ledger with period and type filters. "Today" is fixed when the screen opens.
pub struct ExpensesState {
    expenses: Vec<Expense>,
    filter: ExpenseFilter,
    today: NaiveDate,
    table_state: TableState,
    show_delete_confirmation: bool,
    pub message: Option<String>,
}

impl ExpensesState {
    pub fn new(expenses: Vec<Expense>, today: NaiveDate) -> Self {
        let mut state = Self {
            expenses,
            filter: ExpenseFilter::default(),
            today,
            table_state: TableState::default(),
            show_delete_confirmation: false,
            message: None,
        };
        state.reset_selection();
        state
    }

    pub fn visible_expenses(&self) -> Vec<&Expense> {
        self.filter.apply(&self.expenses, self.today)
    }

    pub fn totals(&self) -> ExpenseTotals {
        ExpenseTotals::from_expenses(self.visible_expenses())
    }

    fn reset_selection(&mut self) {
        let len = self.visible_expenses().len();
        self.table_state.select(clamp_selection(Some(0), len));
    }

    pub fn next_period(&mut self) {
        self.filter.period = self.filter.period.next();
        self.reset_selection();
    }

    pub fn next_kind(&mut self) {
        self.filter.next_kind();
        self.reset_selection();
    }

    pub fn next(&mut self) {
        let len = self.visible_expenses().len();
        self.table_state.select(wrap_next(self.table_state.selected(), len));
    }

    pub fn previous(&mut self) {
        let len = self.visible_expenses().len();
        self.table_state.select(wrap_previous(self.table_state.selected(), len));
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        let index = self.table_state.selected()?;
        self.visible_expenses().get(index).copied()
    }
}

pub enum ExpenseAction {
    Back,
    NewExpense,
    DeleteExpense(String),
}

pub fn render_expenses<B: Backend>(frame: &mut Frame<B>, state: &mut ExpensesState) {
    let size = frame.size();
    let outer = listing_layout(size);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)].as_ref())
        .split(outer[0]);

    let header = Row::new(
        ["Date", "Type", "Description", "Amount"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = state
        .visible_expenses()
        .into_iter()
        .map(|expense| {
            Row::new(vec![
                Cell::from(expense.date.format("%d/%m/%Y").to_string()),
                Cell::from(expense.kind.label()),
                Cell::from(expense.description.clone()),
                Cell::from(format_money(expense.amount)),
            ])
        })
        .collect();

    let kind_label = state.filter.kind.map_or("All types", ExpenseType::label);
    let title = format!("Expenses ({} / {})", state.filter.period.label(), kind_label);
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(18),
            Constraint::Percentage(22),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
        ]);
    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let totals = state.totals();
    let mut lines: Vec<Spans> = ExpenseType::ALL
        .iter()
        .map(|kind| Spans::from(format!("{}: {}", kind.label(), format_money(totals.for_type(*kind)))))
        .collect();
    lines.push(Spans::from(""));
    lines.push(Spans::from(Span::styled(
        format!("Total: {}", format_money(totals.total)),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    let summary = Paragraph::new(lines).block(Block::default().title("Totals").borders(Borders::ALL));
    frame.render_widget(summary, chunks[1]);

    let buttons = if state.selected_expense().is_some() {
        "<N> New Expense | <D> Delete Expense | <P> Period | <T> Type | <Esc> Back"
    } else {
        "<N> New Expense | <P> Period | <T> Type | <Esc> Back"
    };
    render_buttons(frame, outer[1], buttons, state.message.as_deref());

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size, "expense");
    }
}

pub fn handle_input(state: &mut ExpensesState) -> Result<Option<ExpenseAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut ExpensesState, key: KeyCode) -> Option<ExpenseAction> {
    state.message = None;

    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('y') => {
                state.show_delete_confirmation = false;
                return state
                    .selected_expense()
                    .map(|e| ExpenseAction::DeleteExpense(e.id.clone()));
            }
            KeyCode::Char('n') | KeyCode::Esc => state.show_delete_confirmation = false,
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ExpenseAction::Back),
        KeyCode::Char('n') => return Some(ExpenseAction::NewExpense),
        KeyCode::Char('d') if state.selected_expense().is_some() => state.show_delete_confirmation = true,
        KeyCode::Char('p') => state.next_period(),
        KeyCode::Char('t') => state.next_kind(),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;

    fn ymd(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn expense(id: &str, day: u32, kind: ExpenseType, amount: f64) -> Expense {
        Expense {
            id: id.to_string(),
            date: ymd(day),
            kind,
            description: id.to_string(),
            amount,
            notes: String::new(),
            owner_email: "marceneiro@example.com".to_string(),
        }
    }

    fn state() -> ExpensesState {
        ExpensesState::new(
            vec![
                expense("hoje", 15, ExpenseType::Food, 30.0),
                expense("domingo", 12, ExpenseType::Transport, 50.0),
                expense("inicio", 1, ExpenseType::HelperLabor, 150.0),
            ],
            ymd(15),
        )
    }

    #[test]
    fn month_is_the_default_period() {
        let state = state();
        assert_eq!(state.filter.period, Period::Month);
        assert_eq!(state.totals().total, 230.0);
    }

    #[test]
    fn period_and_type_filters_narrow_the_totals() {
        let mut state = state();
        handle_key(&mut state, KeyCode::Char('p'));
        assert_eq!(state.filter.period, Period::All);
        handle_key(&mut state, KeyCode::Char('p'));
        assert_eq!(state.filter.period, Period::Day);
        assert_eq!(state.totals().total, 30.0);

        handle_key(&mut state, KeyCode::Char('p'));
        assert_eq!(state.totals().total, 80.0);

        handle_key(&mut state, KeyCode::Char('t'));
        handle_key(&mut state, KeyCode::Char('t'));
        let totals = state.totals();
        assert_eq!(totals.total, 50.0);
        assert_eq!(totals.transport, 50.0);
        assert_eq!(state.selected_expense().map(|e| e.id.as_str()), Some("domingo"));
    }

    #[test]
    fn delete_is_confirmed_first() {
        let mut state = state();
        handle_key(&mut state, KeyCode::Char('d'));
        match handle_key(&mut state, KeyCode::Char('y')) {
            Some(ExpenseAction::DeleteExpense(id)) => assert_eq!(id, "hoje"),
            _ => panic!("expected delete"),
        }
    }
}
