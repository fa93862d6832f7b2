use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::Constraint,
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::models::dates::format_br;
use crate::models::{Client, ClientStatus};
use crate::ui::components::{
    clamp_selection, highlight_style, listing_layout, render_buttons, render_delete_confirmation, wrap_next,
    wrap_previous,
};

// Represents the state of the client listing screen
pub struct ClientsState {
    clients: Vec<Client>,
    status_filter: Option<ClientStatus>,
    table_state: TableState,
    show_delete_confirmation: bool,
    pub message: Option<String>,
}

impl ClientsState {
    pub fn new(clients: Vec<Client>) -> Self {
        let mut state = Self {
            clients,
            status_filter: None,
            table_state: TableState::default(),
            show_delete_confirmation: false,
            message: None,
        };
        state.table_state.select(clamp_selection(None, state.visible_clients().len()));
        state
    }

    /// Clients passing the status filter, in listing order.
    pub fn visible_clients(&self) -> Vec<&Client> {
        self.clients
            .iter()
            .filter(|c| self.status_filter.is_none_or(|status| c.status == status))
            .collect()
    }

    pub fn next_status_filter(&mut self) {
        self.status_filter = match self.status_filter {
            None => Some(ClientStatus::ALL[0]),
            Some(status) => ClientStatus::ALL
                .iter()
                .position(|s| *s == status)
                .and_then(|i| ClientStatus::ALL.get(i + 1))
                .copied(),
        };
        let len = self.visible_clients().len();
        self.table_state.select(clamp_selection(Some(0), len));
    }

    pub fn next(&mut self) {
        let len = self.visible_clients().len();
        self.table_state.select(wrap_next(self.table_state.selected(), len));
    }

    pub fn previous(&mut self) {
        let len = self.visible_clients().len();
        self.table_state.select(wrap_previous(self.table_state.selected(), len));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_client(&self) -> Option<&Client> {
        let index = self.table_state.selected()?;
        self.visible_clients().get(index).copied()
    }

    fn filter_label(&self) -> &'static str {
        self.status_filter.map_or("All", ClientStatus::label)
    }
}

pub enum ClientAction {
    Back,
    NewClient,
    EditClient(Client),
    DeleteClient(String),
}

pub fn render_clients<B: Backend>(frame: &mut Frame<B>, state: &mut ClientsState) {
    let size = frame.size();
    let chunks = listing_layout(size);

    let header = Row::new(
        ["Name", "Email", "Phone", "Status", "Registered"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .height(1)
    .bottom_margin(1);

    let rows: Vec<Row> = state
        .visible_clients()
        .into_iter()
        .map(|client| {
            Row::new(vec![
                Cell::from(client.name.clone()),
                Cell::from(client.email.clone()),
                Cell::from(client.phone.clone()),
                Cell::from(client.status.label()),
                Cell::from(format_br(client.registered_on)),
            ])
        })
        .collect();

    let title = format!("Clients ({})", state.filter_label());
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(18),
            Constraint::Percentage(17),
            Constraint::Percentage(15),
        ]);
    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let buttons = if state.selected_client().is_some() {
        "<N> New Client | <E> Edit Client | <D> Delete Client | <F> Filter Status | <Esc> Back"
    } else {
        "<N> New Client | <F> Filter Status | <Esc> Back"
    };
    render_buttons(frame, chunks[1], buttons, state.message.as_deref());

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size, "client");
    }
}

pub fn handle_input(state: &mut ClientsState) -> Result<Option<ClientAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut ClientsState, key: KeyCode) -> Option<ClientAction> {
    state.message = None;

    match key {
        KeyCode::Char('q') | KeyCode::Esc => {
            if state.show_delete_confirmation {
                state.toggle_delete_confirmation();
            } else {
                return Some(ClientAction::Back);
            }
        }
        KeyCode::Char('n') => {
            if state.show_delete_confirmation {
                state.toggle_delete_confirmation();
            } else {
                return Some(ClientAction::NewClient);
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if !state.show_delete_confirmation {
                return state.selected_client().cloned().map(ClientAction::EditClient);
            }
        }
        KeyCode::Char('d') => {
            if !state.show_delete_confirmation && state.selected_client().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Char('y') => {
            if state.show_delete_confirmation {
                state.toggle_delete_confirmation();
                return state.selected_client().map(|c| ClientAction::DeleteClient(c.id.clone()));
            }
        }
        KeyCode::Char('f') => {
            if !state.show_delete_confirmation {
                state.next_status_filter();
            }
        }
        KeyCode::Down => {
            if !state.show_delete_confirmation {
                state.next();
            }
        }
        KeyCode::Up => {
            if !state.show_delete_confirmation {
                state.previous();
            }
        }
        _ => {}
    }
    None
}
