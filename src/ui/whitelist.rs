use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::ui::components::{
    edit_text, form_line, highlight_style, list_state_for, render_buttons, render_error, wrap_next, wrap_previous,
};

/// Admin screen listing the emails allowed to log in.
pub struct WhitelistState {
    emails: Vec<String>,
    list_state: ListState,
    new_email: String,
    adding: bool,
    pub message: Option<String>,
    pub show_error: Option<String>,
}

impl WhitelistState {
    pub fn new(emails: Vec<String>) -> Self {
        Self {
            list_state: list_state_for(emails.len()),
            emails,
            new_email: String::new(),
            adding: false,
            message: None,
            show_error: None,
        }
    }

    pub fn next(&mut self) {
        self.list_state.select(wrap_next(self.list_state.selected(), self.emails.len()));
    }

    pub fn previous(&mut self) {
        self.list_state.select(wrap_previous(self.list_state.selected(), self.emails.len()));
    }

    pub fn selected_email(&self) -> Option<&String> {
        self.list_state.selected().and_then(|i| self.emails.get(i))
    }
}

pub enum WhitelistAction {
    Back,
    Add(String),
    Remove(String),
}

pub fn render_whitelist<B: Backend>(frame: &mut Frame<B>, state: &mut WhitelistState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let input = Paragraph::new(form_line("New email", &state.new_email, state.adding, state.adding))
        .block(Block::default().borders(Borders::ALL).title("Authorize a client"));
    frame.render_widget(input, chunks[0]);

    let items: Vec<ListItem> = state
        .emails
        .iter()
        .map(|email| ListItem::new(email.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::default().title("Authorized Emails").borders(Borders::ALL))
        .highlight_style(highlight_style());
    frame.render_stateful_widget(list, chunks[1], &mut state.list_state);

    let buttons = if state.adding {
        "<Enter> Authorize | <Esc> Cancel"
    } else {
        "<A> Add Email | <D> Remove Email | <Esc> Back"
    };
    render_buttons(frame, chunks[2], buttons, state.message.as_deref());

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut WhitelistState) -> Result<Option<WhitelistAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut WhitelistState, key: KeyCode) -> Option<WhitelistAction> {
    state.message = None;
    if state.show_error.take().is_some() {
        return None;
    }

    if state.adding {
        match key {
            KeyCode::Esc => {
                state.adding = false;
                state.new_email.clear();
            }
            KeyCode::Enter => {
                state.adding = false;
                return Some(WhitelistAction::Add(std::mem::take(&mut state.new_email)));
            }
            _ => edit_text(&mut state.new_email, key),
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(WhitelistAction::Back),
        KeyCode::Char('a') => state.adding = true,
        KeyCode::Char('d') => return state.selected_email().cloned().map(WhitelistAction::Remove),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}
