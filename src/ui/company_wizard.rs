use std::path::Path;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    text::Spans,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::format::{format_cnpj, format_phone};
use crate::models::CompanyProfile;
use crate::ui::components::{edit_text, form_line, render_error, render_help, render_title, wizard_layout};

pub enum CompanyWizardAction {
    Cancel,
    Save(CompanyProfile),
}

#[derive(Clone, PartialEq, Copy)]
pub enum CompanyField {
    Name,
    Owner,
    TaxId,
    Phone,
    Logo,
}

pub struct CompanyWizardState {
    profile: CompanyProfile,
    logo_path: String,
    current_field: CompanyField,
    editing: bool,
    pub show_error: Option<String>,
}

impl CompanyWizardState {
    pub fn new(profile: CompanyProfile) -> Self {
        Self {
            profile,
            logo_path: String::new(),
            current_field: CompanyField::Name,
            editing: false,
            show_error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            CompanyField::Name => CompanyField::Owner,
            CompanyField::Owner => CompanyField::TaxId,
            CompanyField::TaxId => CompanyField::Phone,
            CompanyField::Phone => CompanyField::Logo,
            CompanyField::Logo => CompanyField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            CompanyField::Name => CompanyField::Logo,
            CompanyField::Owner => CompanyField::Name,
            CompanyField::TaxId => CompanyField::Owner,
            CompanyField::Phone => CompanyField::TaxId,
            CompanyField::Logo => CompanyField::Phone,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            CompanyField::Name => edit_text(&mut self.profile.name, key),
            CompanyField::Owner => edit_text(&mut self.profile.owner_name, key),
            CompanyField::TaxId => edit_text(&mut self.profile.tax_id, key),
            CompanyField::Phone => edit_text(&mut self.profile.phone, key),
            CompanyField::Logo => edit_text(&mut self.logo_path, key),
        }
    }

    /// Enter on a field: start editing, or finish and normalize what was typed.
    pub fn toggle_editing(&mut self) {
        if !self.editing {
            self.editing = true;
            return;
        }
        self.editing = false;

        match self.current_field {
            CompanyField::TaxId => self.profile.tax_id = format_cnpj(&self.profile.tax_id),
            CompanyField::Phone => self.profile.phone = format_phone(&self.profile.phone),
            CompanyField::Logo => self.load_logo(),
            _ => {}
        }
    }

    fn load_logo(&mut self) {
        let path = self.logo_path.trim();
        if path.is_empty() {
            return;
        }
        match self.profile.load_logo(Path::new(path)) {
            Ok(()) => self.logo_path.clear(),
            Err(err) => self.show_error = Some(format!("Could not load logo: {err:#}")),
        }
    }

    fn logo_status(&self) -> String {
        if self.editing && self.current_field == CompanyField::Logo {
            self.logo_path.clone()
        } else if self.profile.has_logo() {
            "(logo loaded)".to_string()
        } else {
            "(none)".to_string()
        }
    }
}

pub fn render_company_wizard<B: Backend>(frame: &mut Frame<B>, state: &mut CompanyWizardState) {
    let size = frame.size();
    let chunks = wizard_layout(size);

    render_title(frame, chunks[0], "Company Profile");

    let logo = state.logo_status();
    let current = state.current_field;
    let editing = state.editing;
    let lines: Vec<Spans> = vec![
        form_line("Company Name", &state.profile.name, current == CompanyField::Name, editing),
        form_line("Owner", &state.profile.owner_name, current == CompanyField::Owner, editing),
        form_line("CNPJ", &state.profile.tax_id, current == CompanyField::TaxId, editing),
        form_line("Phone", &state.profile.phone, current == CompanyField::Phone, editing),
        form_line("Logo file", &logo, current == CompanyField::Logo, editing),
        Spans::from(""),
        Spans::from("These details appear in the header of every printed quote."),
    ];
    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Company Details"))
        .wrap(Wrap { trim: false });
    frame.render_widget(form, chunks[1]);

    let help = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Del - Remove logo | Up/Down - Navigate | S - Save | Esc - Cancel"
    };
    render_help(frame, chunks[2], help);

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut CompanyWizardState) -> Result<Option<CompanyWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut CompanyWizardState, key: KeyCode) -> Option<CompanyWizardAction> {
    if state.show_error.take().is_some() {
        return None;
    }

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.editing = false;
            } else {
                return Some(CompanyWizardAction::Cancel);
            }
        }
        KeyCode::Enter => state.toggle_editing(),
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Delete if !state.editing && state.current_field == CompanyField::Logo => {
            state.profile.logo.clear();
        }
        KeyCode::Char('s') if !state.editing => {
            let mut profile = state.profile.clone();
            profile.name = profile.name.trim().to_string();
            profile.owner_name = profile.owner_name.trim().to_string();
            return Some(CompanyWizardAction::Save(profile));
        }
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn type_field(state: &mut CompanyWizardState, text: &str) {
        handle_key(state, KeyCode::Enter);
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
        handle_key(state, KeyCode::Enter);
    }

    #[test]
    fn tax_id_and_phone_are_formatted_when_editing_ends() {
        let mut state = CompanyWizardState::new(CompanyProfile::default());
        type_field(&mut state, "Marcenaria Silva");
        handle_key(&mut state, KeyCode::Down);
        type_field(&mut state, "João Silva");
        handle_key(&mut state, KeyCode::Down);
        type_field(&mut state, "12345678000190");
        handle_key(&mut state, KeyCode::Down);
        type_field(&mut state, "11934567890");

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(CompanyWizardAction::Save(profile)) => {
                assert_eq!(profile.name, "Marcenaria Silva");
                assert_eq!(profile.owner_name, "João Silva");
                assert_eq!(profile.tax_id, "12.345.678/0001-90");
                assert_eq!(profile.phone, "(11) 93456-7890");
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn logo_path_is_loaded_and_can_be_removed() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"png-bytes").unwrap();

        let mut state = CompanyWizardState::new(CompanyProfile::default());
        handle_key(&mut state, KeyCode::Up);
        type_field(&mut state, &file.path().display().to_string());

        assert!(state.show_error.is_none());
        assert!(state.profile.logo.starts_with("data:image/png;base64,"));

        handle_key(&mut state, KeyCode::Delete);
        assert!(!state.profile.has_logo());
    }

    #[test]
    fn unreadable_logo_shows_an_error() {
        let mut state = CompanyWizardState::new(CompanyProfile::default());
        handle_key(&mut state, KeyCode::Up);
        type_field(&mut state, "/nonexistent/logo.png");

        assert!(state.show_error.as_deref().is_some_and(|e| e.starts_with("Could not load logo")));
        assert!(!state.profile.has_logo());
    }

    #[test]
    fn escape_cancels_without_saving() {
        let mut state = CompanyWizardState::new(CompanyProfile::default());
        assert!(matches!(handle_key(&mut state, KeyCode::Esc), Some(CompanyWizardAction::Cancel)));
    }
}
