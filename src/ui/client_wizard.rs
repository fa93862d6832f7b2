use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::error::ValidationError;
use crate::format::format_phone;
use crate::models::dates::format_br;
use crate::models::Client;
use crate::ui::components::{edit_text, form_line, render_error, render_help, render_title, wizard_layout};

pub enum ClientWizardAction {
    Cancel,
    Save(Client),
}

#[derive(Clone, PartialEq, Copy)]
pub enum ClientField {
    Name,
    Email,
    Phone,
    Address,
    Status,
    Notes,
}

pub struct ClientWizardState {
    pub client: Client,
    pub current_field: ClientField,
    pub editing: bool,
    pub show_error: Option<String>,
}

impl ClientWizardState {
    pub fn new(owner_email: &str) -> Self {
        Self::from_existing(Client::blank(owner_email))
    }

    pub fn from_existing(client: Client) -> Self {
        Self {
            client,
            current_field: ClientField::Name,
            editing: false,
            show_error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.client.id.is_empty()
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if !self.editing && self.current_field == ClientField::Phone && !self.client.phone.is_empty() {
            self.client.phone = format_phone(&self.client.phone);
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            ClientField::Name => ClientField::Email,
            ClientField::Email => ClientField::Phone,
            ClientField::Phone => ClientField::Address,
            ClientField::Address => ClientField::Status,
            ClientField::Status => ClientField::Notes,
            ClientField::Notes => ClientField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            ClientField::Name => ClientField::Notes,
            ClientField::Email => ClientField::Name,
            ClientField::Phone => ClientField::Email,
            ClientField::Address => ClientField::Phone,
            ClientField::Status => ClientField::Address,
            ClientField::Notes => ClientField::Status,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field_value = match self.current_field {
            ClientField::Name => &mut self.client.name,
            ClientField::Email => &mut self.client.email,
            ClientField::Phone => &mut self.client.phone,
            ClientField::Address => &mut self.client.address,
            ClientField::Notes => &mut self.client.notes,
            ClientField::Status => return,
        };
        edit_text(field_value, key);
    }

    pub fn to_client(&self) -> Result<Client, ValidationError> {
        let client = Client {
            name: self.client.name.trim().to_string(),
            email: self.client.email.trim().to_string(),
            ..self.client.clone()
        };
        client.validate()?;
        Ok(client)
    }
}

pub fn render_client_wizard<B: Backend>(f: &mut Frame<B>, state: &mut ClientWizardState) {
    let size = f.size();
    let chunks = wizard_layout(size);

    let title_text = if state.is_new() {
        "Client Creation Wizard"
    } else {
        "Client Editing Wizard"
    };
    render_title(f, chunks[0], title_text);

    let registered = format_br(state.client.registered_on);
    let current = state.current_field;
    let editing = state.editing;
    let lines: Vec<Spans> = vec![
        form_line("Name", &state.client.name, current == ClientField::Name, editing),
        form_line("Email", &state.client.email, current == ClientField::Email, editing),
        form_line("Phone", &state.client.phone, current == ClientField::Phone, editing),
        form_line("Address", &state.client.address, current == ClientField::Address, editing),
        form_line("Status", state.client.status.label(), current == ClientField::Status, false),
        form_line("Notes", &state.client.notes, current == ClientField::Notes, editing),
        Spans::from(""),
        Spans::from(format!("Registered on: {}", registered)),
    ];
    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Client Details"));
    f.render_widget(form, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Left/Right - Change status | Up/Down - Navigate fields | S - Save client | Esc - Cancel"
    };
    render_help(f, chunks[2], help_text);

    if let Some(error) = &state.show_error {
        render_error(f, size, error);
    }
}

pub fn handle_input(state: &mut ClientWizardState) -> Result<Option<ClientWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut ClientWizardState, key: KeyCode) -> Option<ClientWizardAction> {
    if state.show_error.take().is_some() {
        return None;
    }

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(ClientWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if state.current_field == ClientField::Status {
                state.client.status = state.client.status.next();
            } else {
                state.toggle_editing();
            }
        }
        KeyCode::Left | KeyCode::Right if !state.editing && state.current_field == ClientField::Status => {
            state.client.status = state.client.status.next();
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => match state.to_client() {
            Ok(client) => return Some(ClientWizardAction::Save(client)),
            Err(err) => state.show_error = Some(err.to_string()),
        },
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }
    None
}
