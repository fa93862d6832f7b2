use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::{centered_rect, edit_text, form_line, render_error};

#[derive(Clone, Copy, PartialEq)]
pub enum LoginField {
    Email,
    Password,
}

pub struct LoginState {
    pub email: String,
    pub password: String,
    pub current_field: LoginField,
    pub show_error: Option<String>,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            current_field: LoginField::Email,
            show_error: None,
        }
    }

    pub fn with_error(error: String) -> Self {
        Self {
            show_error: Some(error),
            ..Self::new()
        }
    }

    pub fn toggle_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}

pub enum LoginAction {
    Exit,
    Submit { email: String, password: String },
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState) {
    let size = frame.size();
    let area = centered_rect(60, 50, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(4),
                Constraint::Min(3),
            ]
            .as_ref(),
        )
        .split(area);

    let title = Paragraph::new("Marcenaria Manager - Login")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let masked = "*".repeat(state.password.chars().count());
    let form = Paragraph::new(vec![
        form_line("Email", &state.email, state.current_field == LoginField::Email, state.current_field == LoginField::Email),
        form_line("Password", &masked, state.current_field == LoginField::Password, state.current_field == LoginField::Password),
    ])
    .block(Block::default().borders(Borders::ALL).title("Credentials"));
    frame.render_widget(form, chunks[1]);

    let help = Paragraph::new(vec![
        Spans::from("Tab/Up/Down - Switch field | Enter - Log in | Esc - Quit"),
        Spans::from(""),
        Spans::from("Ask the administrator to authorize your email before logging in."),
    ])
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut LoginState, key: KeyCode) -> Option<LoginAction> {
    if state.show_error.take().is_some() {
        return None;
    }

    match key {
        KeyCode::Esc => return Some(LoginAction::Exit),
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => state.toggle_field(),
        KeyCode::Enter => {
            if state.current_field == LoginField::Email {
                state.toggle_field();
            } else {
                return Some(LoginAction::Submit {
                    email: state.email.trim().to_string(),
                    password: state.password.clone(),
                });
            }
        }
        _ => match state.current_field {
            LoginField::Email => edit_text(&mut state.email, key),
            LoginField::Password => edit_text(&mut state.password, key),
        },
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut LoginState, text: &str) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn enter_moves_to_password_then_submits() {
        let mut state = LoginState::new();
        type_text(&mut state, "admin@admin.com ");
        assert!(handle_key(&mut state, KeyCode::Enter).is_none());
        type_text(&mut state, "123456");

        match handle_key(&mut state, KeyCode::Enter) {
            Some(LoginAction::Submit { email, password }) => {
                assert_eq!(email, "admin@admin.com");
                assert_eq!(password, "123456");
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn first_key_after_an_error_only_dismisses_it() {
        let mut state = LoginState::with_error("nope".to_string());
        assert!(handle_key(&mut state, KeyCode::Esc).is_none());
        assert!(state.show_error.is_none());
        assert!(matches!(handle_key(&mut state, KeyCode::Esc), Some(LoginAction::Exit)));
    }
}
