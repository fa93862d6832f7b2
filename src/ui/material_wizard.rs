use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    text::Spans,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::error::ValidationError;
use crate::format::parse_decimal;
use crate::models::{Category, Material, Unit};
use crate::ui::components::{edit_number, edit_text, form_line, render_error, render_help, render_title, wizard_layout};

pub enum MaterialWizardAction {
    Cancel,
    Save(Material),
}

#[derive(Clone, PartialEq, Copy)]
pub enum MaterialField {
    Name,
    Category,
    Unit,
    UnitPrice,
}

pub struct MaterialWizardState {
    material: Material,
    categories: Vec<String>,
    price_input: String,
    current_field: MaterialField,
    editing: bool,
    show_error: Option<String>,
}

impl MaterialWizardState {
    pub fn new(owner_email: &str, categories: &[Category]) -> Self {
        Self::from_existing(
            Material {
                id: String::new(),
                name: String::new(),
                category: String::new(),
                unit: Unit::default(),
                unit_price: 0.0,
                owner_email: owner_email.to_string(),
            },
            categories,
        )
    }

    pub fn from_existing(material: Material, categories: &[Category]) -> Self {
        let price_input = if material.id.is_empty() {
            String::new()
        } else {
            material.unit_price.to_string()
        };

        Self {
            material,
            categories: categories.iter().map(|c| c.name.clone()).collect(),
            price_input,
            current_field: MaterialField::Name,
            editing: false,
            show_error: None,
        }
    }

    pub fn is_new(&self) -> bool {
        self.material.id.is_empty()
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            MaterialField::Name => MaterialField::Category,
            MaterialField::Category => MaterialField::Unit,
            MaterialField::Unit => MaterialField::UnitPrice,
            MaterialField::UnitPrice => MaterialField::Name,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            MaterialField::Name => MaterialField::UnitPrice,
            MaterialField::Category => MaterialField::Name,
            MaterialField::Unit => MaterialField::Category,
            MaterialField::UnitPrice => MaterialField::Unit,
        };
    }

    /// Left/Right on a choice field.
    pub fn cycle_choice(&mut self, forward: bool) {
        match self.current_field {
            MaterialField::Unit => {
                self.material.unit = if forward {
                    self.material.unit.next()
                } else {
                    self.material.unit.previous()
                };
            }
            MaterialField::Category if !self.categories.is_empty() => {
                let len = self.categories.len();
                let current = self.categories.iter().position(|c| *c == self.material.category);
                let index = match (current, forward) {
                    (Some(i), true) => (i + 1) % len,
                    (Some(i), false) => (i + len - 1) % len,
                    (None, true) => 0,
                    (None, false) => len - 1,
                };
                self.material.category = self.categories[index].clone();
            }
            _ => {}
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            MaterialField::Name => edit_text(&mut self.material.name, key),
            MaterialField::Category => edit_text(&mut self.material.category, key),
            MaterialField::UnitPrice => edit_number(&mut self.price_input, key),
            MaterialField::Unit => {}
        }
    }

    pub fn to_material(&self) -> Result<Material, ValidationError> {
        let unit_price =
            parse_decimal(&self.price_input).ok_or(ValidationError::InvalidNumber("Unit price"))?;

        let material = Material {
            name: self.material.name.trim().to_string(),
            category: self.material.category.trim().to_string(),
            unit_price,
            ..self.material.clone()
        };
        material.validate()?;

        Ok(material)
    }
}

pub fn render_material_wizard<B: Backend>(frame: &mut Frame<B>, state: &mut MaterialWizardState) {
    let size = frame.size();
    let chunks = wizard_layout(size);

    let title = if state.is_new() {
        "Material Creation Wizard"
    } else {
        "Material Editing Wizard"
    };
    render_title(frame, chunks[0], title);

    let unit = state.material.unit.label();
    let lines: Vec<Spans> = vec![
        form_line("Name", &state.material.name, state.current_field == MaterialField::Name, state.editing),
        form_line("Category", &state.material.category, state.current_field == MaterialField::Category, state.editing),
        form_line("Unit", unit, state.current_field == MaterialField::Unit, false),
        form_line("Unit Price (R$)", &state.price_input, state.current_field == MaterialField::UnitPrice, state.editing),
        Spans::from(""),
        Spans::from(format!("Categories: {}", state.categories.join(", "))),
    ];
    let form = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Material Details"));
    frame.render_widget(form, chunks[1]);

    let help = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Left/Right - Choose unit or category | Up/Down - Navigate | S - Save | Esc - Cancel"
    };
    render_help(frame, chunks[2], help);

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut MaterialWizardState) -> Result<Option<MaterialWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut MaterialWizardState, key: KeyCode) -> Option<MaterialWizardAction> {
    if state.show_error.take().is_some() {
        return None;
    }

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(MaterialWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if state.current_field == MaterialField::Unit {
                state.cycle_choice(true);
            } else {
                state.toggle_editing();
            }
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Left if !state.editing => state.cycle_choice(false),
        KeyCode::Right if !state.editing => state.cycle_choice(true),
        KeyCode::Char('s') if !state.editing => match state.to_material() {
            Ok(material) => return Some(MaterialWizardAction::Save(material)),
            Err(err) => state.show_error = Some(err.to_string()),
        },
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }
    None
}
