use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::Constraint,
    style::{Color, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::format::format_money;
use crate::models::Material;
use crate::ui::components::{
    highlight_style, listing_layout, render_buttons, render_delete_confirmation, table_state_for, wrap_next,
    wrap_previous,
};

pub struct MaterialsState {
    materials: Vec<Material>,
    table_state: TableState,
    show_delete_confirmation: bool,
    pub message: Option<String>,
}

impl MaterialsState {
    pub fn new(materials: Vec<Material>) -> Self {
        Self {
            table_state: table_state_for(materials.len()),
            materials,
            show_delete_confirmation: false,
            message: None,
        }
    }

    pub fn next(&mut self) {
        self.table_state.select(wrap_next(self.table_state.selected(), self.materials.len()));
    }

    pub fn previous(&mut self) {
        self.table_state.select(wrap_previous(self.table_state.selected(), self.materials.len()));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_material(&self) -> Option<&Material> {
        self.table_state.selected().and_then(|i| self.materials.get(i))
    }
}

pub enum MaterialAction {
    Back,
    NewMaterial,
    EditMaterial(Material),
    DeleteMaterial(String),
}

pub fn render_materials<B: Backend>(frame: &mut Frame<B>, state: &mut MaterialsState) {
    let size = frame.size();
    let chunks = listing_layout(size);

    let header = Row::new(
        ["Name", "Category", "Unit", "Unit Price"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow))),
    )
    .height(1)
    .bottom_margin(1);

    let rows = state.materials.iter().map(|material| {
        Row::new(vec![
            Cell::from(material.name.as_str()),
            Cell::from(material.category.as_str()),
            Cell::from(material.unit.label()),
            Cell::from(format_money(material.unit_price)),
        ])
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Materials").borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(40),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ]);
    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let buttons = if state.selected_material().is_some() {
        "<N> New Material | <E> Edit Material | <D> Delete Material | <Esc> Back"
    } else {
        "<N> New Material | <Esc> Back"
    };
    render_buttons(frame, chunks[1], buttons, state.message.as_deref());

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size, "material");
    }
}

pub fn handle_input(state: &mut MaterialsState) -> Result<Option<MaterialAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut MaterialsState, key: KeyCode) -> Option<MaterialAction> {
    state.message = None;

    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('y') => {
                state.toggle_delete_confirmation();
                return state
                    .selected_material()
                    .map(|m| MaterialAction::DeleteMaterial(m.id.clone()));
            }
            KeyCode::Char('n') | KeyCode::Esc => state.toggle_delete_confirmation(),
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(MaterialAction::Back),
        KeyCode::Char('n') => return Some(MaterialAction::NewMaterial),
        KeyCode::Char('e') | KeyCode::Enter => {
            return state.selected_material().cloned().map(MaterialAction::EditMaterial);
        }
        KeyCode::Char('d') => {
            if state.selected_material().is_some() {
                state.toggle_delete_confirmation();
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Unit;

    fn material(id: &str) -> Material {
        Material {
            id: id.to_string(),
            name: format!("Material {id}"),
            category: "Chapas".to_string(),
            unit: Unit::Piece,
            unit_price: 5.0,
            owner_email: "marceneiro@example.com".to_string(),
        }
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut state = MaterialsState::new(vec![material("1"), material("2")]);
        state.next();

        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        match handle_key(&mut state, KeyCode::Char('y')) {
            Some(MaterialAction::DeleteMaterial(id)) => assert_eq!(id, "2"),
            _ => panic!("expected delete"),
        }
    }

    #[test]
    fn declining_the_confirmation_deletes_nothing() {
        let mut state = MaterialsState::new(vec![material("1")]);
        handle_key(&mut state, KeyCode::Char('d'));
        assert!(handle_key(&mut state, KeyCode::Char('n')).is_none());
        assert!(!state.show_delete_confirmation);
    }
}
