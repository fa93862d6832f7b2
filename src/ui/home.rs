use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::auth::Identity;
use crate::ui::components::{highlight_style, list_state_for, render_buttons, wrap_next, wrap_previous};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MenuEntry {
    NewQuote,
    Quotes,
    Materials,
    Categories,
    Expenses,
    Clients,
    CompanyProfile,
    Whitelist,
}

impl MenuEntry {
    fn label(self) -> &'static str {
        match self {
            MenuEntry::NewQuote => "New Quote - build a quote from your materials",
            MenuEntry::Quotes => "Quotes - view, edit and print saved quotes",
            MenuEntry::Materials => "Materials - manage your catalog and prices",
            MenuEntry::Categories => "Categories - organize your materials",
            MenuEntry::Expenses => "Expenses - track helpers, transport and food",
            MenuEntry::Clients => "Clients - manage your client list",
            MenuEntry::CompanyProfile => "Company Profile - letterhead printed on quotes",
            MenuEntry::Whitelist => "Authorized Emails - who may log in",
        }
    }
}

pub struct HomeState {
    user_email: String,
    entries: Vec<MenuEntry>,
    list_state: ListState,
}

impl HomeState {
    pub fn new(identity: &Identity) -> Self {
        let mut entries = vec![
            MenuEntry::NewQuote,
            MenuEntry::Quotes,
            MenuEntry::Materials,
            MenuEntry::Categories,
            MenuEntry::Expenses,
            MenuEntry::Clients,
            MenuEntry::CompanyProfile,
        ];
        if identity.is_admin() {
            entries.push(MenuEntry::Whitelist);
        }

        Self {
            user_email: identity.email.clone(),
            list_state: list_state_for(entries.len()),
            entries,
        }
    }

    pub fn next(&mut self) {
        self.list_state.select(wrap_next(self.list_state.selected(), self.entries.len()));
    }

    pub fn previous(&mut self) {
        self.list_state.select(wrap_previous(self.list_state.selected(), self.entries.len()));
    }

    pub fn selected_entry(&self) -> Option<MenuEntry> {
        self.list_state.selected().and_then(|i| self.entries.get(i).copied())
    }
}

pub enum HomeAction {
    Exit,
    Logout,
    Open(MenuEntry),
}

pub fn render_home<B: Backend>(frame: &mut Frame<B>, state: &mut HomeState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(4),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(frame.size());

    let header = Paragraph::new(vec![
        Spans::from("Welcome to the quoting system"),
        Spans::from(format!("Logged in as {}", state.user_email)),
    ])
    .style(Style::default().fg(Color::Cyan))
    .block(Block::default().borders(Borders::ALL).title("Marcenaria Manager"));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = state
        .entries
        .iter()
        .map(|entry| ListItem::new(entry.label()))
        .collect();

    let menu = List::new(items)
        .block(Block::default().title("Menu").borders(Borders::ALL))
        .highlight_style(highlight_style());
    frame.render_stateful_widget(menu, chunks[1], &mut state.list_state);

    render_buttons(frame, chunks[2], "<Enter> Open | <L> Log out | <Q> Quit", None);
}

pub fn handle_input(state: &mut HomeState) -> Result<Option<HomeAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut HomeState, key: KeyCode) -> Option<HomeAction> {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(HomeAction::Exit),
        KeyCode::Char('l') => return Some(HomeAction::Logout),
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        KeyCode::Enter => return state.selected_entry().map(HomeAction::Open),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn identity(role: Role) -> Identity {
        Identity {
            email: "maria@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn whitelist_entry_is_admin_only() {
        let member = HomeState::new(&identity(Role::Member));
        assert!(!member.entries.contains(&MenuEntry::Whitelist));

        let admin = HomeState::new(&identity(Role::Admin));
        assert_eq!(admin.entries.last(), Some(&MenuEntry::Whitelist));
    }

    #[test]
    fn enter_opens_the_selected_entry() {
        let mut state = HomeState::new(&identity(Role::Member));
        handle_key(&mut state, KeyCode::Down);
        assert!(matches!(
            handle_key(&mut state, KeyCode::Enter),
            Some(HomeAction::Open(MenuEntry::Quotes))
        ));
    }
}
