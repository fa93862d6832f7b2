use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::error::ValidationError;
use crate::format::format_money;
use crate::models::{Exclusion, Material, QuoteDraft};
use crate::ui::components::{
    clamp_selection, edit_number, edit_text, form_line, list_state_for, render_error, render_help, render_title,
    wizard_layout, wrap_next, wrap_previous,
};

// Represents a section of the quote form
#[derive(Clone, Copy, PartialEq)]
pub enum QuoteField {
    Title,
    Materials,
    Margin,
    Surcharge,
    SurchargeEnabled,
    Exclusions,
    CustomExclusions,
}

pub struct QuoteWizardState {
    draft: QuoteDraft,
    catalog: Vec<Material>,
    current_field: QuoteField,
    editing: bool,
    material_index: usize,
    quantity_input: String,
    line_items_list_state: ListState,
    exclusion_index: usize,
    custom_input: String,
    custom_list_state: ListState,
    pub show_error: Option<String>,
    pub message: Option<String>,
}

impl QuoteWizardState {
    pub fn new(draft: QuoteDraft, catalog: Vec<Material>) -> Self {
        Self {
            line_items_list_state: list_state_for(draft.line_items.len()),
            custom_list_state: list_state_for(draft.custom_exclusions.len()),
            draft,
            catalog,
            current_field: QuoteField::Title,
            editing: false,
            material_index: 0,
            quantity_input: String::new(),
            exclusion_index: 0,
            custom_input: String::new(),
            show_error: None,
            message: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            QuoteField::Title => QuoteField::Materials,
            QuoteField::Materials => QuoteField::Margin,
            QuoteField::Margin => QuoteField::Surcharge,
            QuoteField::Surcharge => QuoteField::SurchargeEnabled,
            QuoteField::SurchargeEnabled => QuoteField::Exclusions,
            QuoteField::Exclusions => QuoteField::CustomExclusions,
            QuoteField::CustomExclusions => QuoteField::Title,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            QuoteField::Title => QuoteField::CustomExclusions,
            QuoteField::Materials => QuoteField::Title,
            QuoteField::Margin => QuoteField::Materials,
            QuoteField::Surcharge => QuoteField::Margin,
            QuoteField::SurchargeEnabled => QuoteField::Surcharge,
            QuoteField::Exclusions => QuoteField::SurchargeEnabled,
            QuoteField::CustomExclusions => QuoteField::Exclusions,
        };
    }

    pub fn selected_material(&self) -> Option<&Material> {
        self.catalog.get(self.material_index)
    }

    pub fn cycle_material(&mut self, forward: bool) {
        let len = self.catalog.len();
        if len == 0 {
            return;
        }
        self.material_index = if forward {
            (self.material_index + 1) % len
        } else {
            (self.material_index + len - 1) % len
        };
    }

    /// Add the picked material with the typed quantity, then reset the picker.
    pub fn add_line_item(&mut self) -> Result<(), ValidationError> {
        let material_id = self.selected_material().map(|m| m.id.clone());
        self.draft
            .add_line_item(&self.catalog, material_id.as_deref(), &self.quantity_input)?;

        self.quantity_input.clear();
        self.material_index = 0;
        self.line_items_list_state.select(Some(self.draft.line_items.len() - 1));
        Ok(())
    }

    pub fn document_written(&mut self, outcome: Result<PathBuf>) {
        match outcome {
            Ok(path) => self.message = Some(format!("Document written to {}", path.display())),
            Err(err) => self.show_error = Some(format!("Could not write the document: {err:#}")),
        }
    }

    pub fn delete_line_item(&mut self) {
        let Some(selected) = self.line_items_list_state.selected() else {
            return;
        };
        if let Some(item) = self.draft.line_items.get(selected) {
            let id = item.id.clone();
            self.draft.remove_line_item(&id);
        }
        self.line_items_list_state
            .select(clamp_selection(Some(selected), self.draft.line_items.len()));
    }

    pub fn add_custom_exclusion(&mut self) {
        if self.draft.add_custom_exclusion(&self.custom_input) {
            self.custom_list_state.select(Some(self.draft.custom_exclusions.len() - 1));
        }
        self.custom_input.clear();
    }

    pub fn delete_custom_exclusion(&mut self) {
        let Some(selected) = self.custom_list_state.selected() else {
            return;
        };
        self.draft.remove_custom_exclusion(selected);
        self.custom_list_state
            .select(clamp_selection(Some(selected), self.draft.custom_exclusions.len()));
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match self.current_field {
            QuoteField::Title => edit_text(&mut self.draft.title, key),
            QuoteField::Margin => edit_number(&mut self.draft.margin_input, key),
            QuoteField::Surcharge => edit_number(&mut self.draft.surcharge_input, key),
            QuoteField::Materials => match key {
                KeyCode::Left => self.cycle_material(false),
                KeyCode::Right => self.cycle_material(true),
                KeyCode::Up => {
                    let len = self.draft.line_items.len();
                    self.line_items_list_state
                        .select(wrap_previous(self.line_items_list_state.selected(), len));
                }
                KeyCode::Down => {
                    let len = self.draft.line_items.len();
                    self.line_items_list_state
                        .select(wrap_next(self.line_items_list_state.selected(), len));
                }
                KeyCode::Delete => self.delete_line_item(),
                _ => edit_number(&mut self.quantity_input, key),
            },
            QuoteField::Exclusions => match key {
                KeyCode::Up => {
                    self.exclusion_index = (self.exclusion_index + Exclusion::ALL.len() - 1) % Exclusion::ALL.len();
                }
                KeyCode::Down => self.exclusion_index = (self.exclusion_index + 1) % Exclusion::ALL.len(),
                KeyCode::Char(' ') => self.draft.toggle_exclusion(Exclusion::ALL[self.exclusion_index]),
                _ => {}
            },
            QuoteField::CustomExclusions => match key {
                KeyCode::Up => {
                    let len = self.draft.custom_exclusions.len();
                    self.custom_list_state.select(wrap_previous(self.custom_list_state.selected(), len));
                }
                KeyCode::Down => {
                    let len = self.draft.custom_exclusions.len();
                    self.custom_list_state.select(wrap_next(self.custom_list_state.selected(), len));
                }
                KeyCode::Delete => self.delete_custom_exclusion(),
                _ => edit_text(&mut self.custom_input, key),
            },
            QuoteField::SurchargeEnabled => {}
        }
    }

    /// Enter while editing. Returns whether editing should end.
    fn confirm(&mut self) -> bool {
        match self.current_field {
            QuoteField::Materials => {
                if self.quantity_input.is_empty() {
                    return true;
                }
                if let Err(err) = self.add_line_item() {
                    self.show_error = Some(err.to_string());
                }
                false
            }
            QuoteField::Exclusions => {
                self.draft.toggle_exclusion(Exclusion::ALL[self.exclusion_index]);
                false
            }
            QuoteField::CustomExclusions => {
                if self.custom_input.trim().is_empty() {
                    return true;
                }
                self.add_custom_exclusion();
                false
            }
            _ => true,
        }
    }
}

pub enum QuoteWizardAction {
    Cancel,
    Save(QuoteDraft),
    Print(QuoteDraft),
}

pub fn render_quote_wizard<B: Backend>(frame: &mut Frame<B>, state: &mut QuoteWizardState) {
    let size = frame.size();
    let chunks = wizard_layout(size);

    let title_text = if state.draft.is_editing() {
        "Edit Quote"
    } else {
        "Create Quote"
    };
    render_title(frame, chunks[0], title_text);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(chunks[1]);
    render_form(frame, state, body[0]);
    render_side_panel(frame, state, body[1]);

    let help_text = match (state.editing, state.current_field) {
        (false, _) => "Enter - Edit section | Up/Down - Navigate | S - Save quote | P - Print | Esc - Cancel",
        (true, QuoteField::Materials) => {
            "Left/Right - Pick material | Type quantity + Enter - Add | Up/Down - Select item | Del - Remove | Esc - Done"
        }
        (true, QuoteField::Exclusions) => "Up/Down - Select | Space/Enter - Toggle | Esc - Done",
        (true, QuoteField::CustomExclusions) => {
            "Type + Enter - Add exclusion | Up/Down - Select | Del - Remove | Esc - Done"
        }
        (true, _) => "Enter - Save field | Esc - Cancel editing",
    };
    render_help(frame, chunks[2], help_text);

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

fn section_style(state: &QuoteWizardState, field: QuoteField) -> Style {
    if state.current_field == field {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut QuoteWizardState, area: Rect) {
    let form_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(5),
            ]
            .as_ref(),
        )
        .split(area);

    let editing = state.editing;
    let current = state.current_field;

    let title = Paragraph::new(form_line("Title", &state.draft.title, current == QuoteField::Title, editing))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, form_chunks[0]);

    let picker = match state.selected_material() {
        Some(material) => format!(
            "< {} - {}/{} >",
            material.name,
            format_money(material.unit_price),
            material.unit
        ),
        None => "No materials in the catalog".to_string(),
    };
    let picking = current == QuoteField::Materials && editing;
    let picker_line = Paragraph::new(Spans::from(vec![
        Span::styled(picker, section_style(state, QuoteField::Materials)),
        Span::raw("  Quantity: "),
        Span::styled(
            format!("{}{}", state.quantity_input, if picking { "|" } else { "" }),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Add Material"));
    frame.render_widget(picker_line, form_chunks[1]);

    let items: Vec<ListItem> = state
        .draft
        .line_items
        .iter()
        .map(|item| {
            ListItem::new(format!(
                "{}: {} {} x {} = {}",
                item.name,
                item.quantity,
                item.unit,
                format_money(item.unit_price),
                format_money(item.total)
            ))
        })
        .collect();
    let items_title = if state.draft.line_items.is_empty() {
        "Quote Items (none yet)".to_string()
    } else {
        format!("Quote Items ({})", state.draft.line_items.len())
    };
    let mut items_list = List::new(items).block(
        Block::default()
            .title(items_title)
            .borders(Borders::ALL)
            .style(section_style(state, QuoteField::Materials)),
    );
    if picking {
        items_list = items_list.highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    }
    frame.render_stateful_widget(items_list, form_chunks[2], &mut state.line_items_list_state);

    let surcharge_flag = if state.draft.surcharge_enabled { "[x]" } else { "[ ]" };
    let pricing = Paragraph::new(vec![
        form_line("Profit margin (%)", &state.draft.margin_input, current == QuoteField::Margin, editing),
        form_line("Card surcharge (%)", &state.draft.surcharge_input, current == QuoteField::Surcharge, editing),
        form_line(
            "Apply card surcharge",
            surcharge_flag,
            current == QuoteField::SurchargeEnabled,
            false,
        ),
    ])
    .block(Block::default().borders(Borders::ALL).title("Pricing"));
    frame.render_widget(pricing, form_chunks[3]);
}

fn render_side_panel<B: Backend>(frame: &mut Frame<B>, state: &mut QuoteWizardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(6),
                Constraint::Length(8),
                Constraint::Min(4),
            ]
            .as_ref(),
        )
        .split(area);

    let totals = state.draft.totals();
    let mut lines = vec![
        Spans::from(format!("Materials: {}", format_money(totals.materials))),
        Spans::from(Span::styled(
            format!("Cash total: {}", format_money(totals.general_total)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    if state.draft.surcharge_enabled {
        lines.push(Spans::from(format!(
            "Installments: {}",
            format_money(totals.installment_total)
        )));
    }
    if let Some(message) = &state.message {
        lines.push(Spans::from(Span::styled(message.clone(), Style::default().fg(Color::Green))));
    }
    let summary = Paragraph::new(lines).block(Block::default().title("Totals").borders(Borders::ALL));
    frame.render_widget(summary, chunks[0]);

    let choosing = state.editing && state.current_field == QuoteField::Exclusions;
    let exclusions: Vec<Spans> = Exclusion::ALL
        .iter()
        .enumerate()
        .map(|(i, exclusion)| {
            let mark = if state.draft.exclusions.get(*exclusion) { "[x]" } else { "[ ]" };
            let style = if choosing && i == state.exclusion_index {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            Spans::from(Span::styled(format!("{} {}", mark, exclusion.label()), style))
        })
        .collect();
    let exclusions = Paragraph::new(exclusions).block(
        Block::default()
            .title("Not Included")
            .borders(Borders::ALL)
            .style(section_style(state, QuoteField::Exclusions)),
    );
    frame.render_widget(exclusions, chunks[1]);

    let typing = state.editing && state.current_field == QuoteField::CustomExclusions;
    let mut custom: Vec<ListItem> = state
        .draft
        .custom_exclusions
        .iter()
        .map(|text| ListItem::new(text.as_str()))
        .collect();
    if typing {
        custom.push(ListItem::new(format!("+ {}|", state.custom_input)));
    }
    let mut custom_list = List::new(custom).block(
        Block::default()
            .title("Other Exclusions")
            .borders(Borders::ALL)
            .style(section_style(state, QuoteField::CustomExclusions)),
    );
    if typing {
        custom_list = custom_list.highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    }
    frame.render_stateful_widget(custom_list, chunks[2], &mut state.custom_list_state);
}

pub fn handle_input(state: &mut QuoteWizardState) -> Result<Option<QuoteWizardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut QuoteWizardState, key: KeyCode) -> Option<QuoteWizardAction> {
    if state.show_error.take().is_some() {
        return None;
    }
    state.message = None;

    match key {
        KeyCode::Esc => {
            if state.editing {
                state.toggle_editing();
            } else {
                return Some(QuoteWizardAction::Cancel);
            }
        }
        KeyCode::Enter => {
            if state.current_field == QuoteField::SurchargeEnabled {
                state.draft.surcharge_enabled = !state.draft.surcharge_enabled;
            } else if !state.editing || state.confirm() {
                state.toggle_editing();
            }
        }
        KeyCode::Char(' ') if !state.editing && state.current_field == QuoteField::SurchargeEnabled => {
            state.draft.surcharge_enabled = !state.draft.surcharge_enabled;
        }
        KeyCode::Up if !state.editing => state.previous_field(),
        KeyCode::Down if !state.editing => state.next_field(),
        KeyCode::Char('s') if !state.editing => match state.draft.validate() {
            Ok(()) => return Some(QuoteWizardAction::Save(state.draft.clone())),
            Err(err) => state.show_error = Some(err.to_string()),
        },
        KeyCode::Char('p') if !state.editing => {
            if state.draft.line_items.is_empty() {
                state.show_error = Some(ValidationError::EmptyQuote.to_string());
            } else {
                return Some(QuoteWizardAction::Print(state.draft.clone()));
            }
        }
        _ if state.editing => state.edit_current_field(key),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyProfile, Unit};
    use crate::quote_gen::QuoteDocumentGenerator;
    use chrono::NaiveDate;

    fn catalog() -> Vec<Material> {
        [("mdf", "MDF 15mm", 10.0), ("pinus", "Pinus", 5.0)]
            .iter()
            .map(|(id, name, price)| Material {
                id: id.to_string(),
                name: name.to_string(),
                category: "Chapas".to_string(),
                unit: Unit::SquareMeter,
                unit_price: *price,
                owner_email: "marceneiro@example.com".to_string(),
            })
            .collect()
    }

    fn keys(state: &mut QuoteWizardState, keys: &[KeyCode]) {
        for key in keys {
            handle_key(state, *key);
        }
    }

    fn type_text(state: &mut QuoteWizardState, text: &str) {
        for c in text.chars() {
            handle_key(state, KeyCode::Char(c));
        }
    }

    #[test]
    fn printing_into_an_unwritable_directory_keeps_the_draft_open() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("afile");
        std::fs::write(&blocker, "").unwrap();
        let generator = QuoteDocumentGenerator::new(blocker.join("sub"), None);

        let mut state = QuoteWizardState::new(QuoteDraft::new(), catalog());
        handle_key(&mut state, KeyCode::Enter);
        type_text(&mut state, "Deck");
        handle_key(&mut state, KeyCode::Enter);

        let date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let quote = state.draft.to_quote("rascunho".to_string(), date, "marceneiro@example.com");
        state.document_written(generator.generate(&quote, &CompanyProfile::default()));

        assert!(state.show_error.as_deref().unwrap().starts_with("Could not write the document"));
        assert_eq!(state.draft.title, "Deck");

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert!(state.show_error.is_none());
    }

    #[test]
    fn builds_and_saves_a_quote() {
        let mut state = QuoteWizardState::new(QuoteDraft::new(), catalog());
        handle_key(&mut state, KeyCode::Enter);
        type_text(&mut state, "Deck");
        keys(&mut state, &[KeyCode::Enter, KeyCode::Down, KeyCode::Enter]);
        type_text(&mut state, "2");
        handle_key(&mut state, KeyCode::Enter);
        keys(&mut state, &[KeyCode::Right]);
        type_text(&mut state, "4");
        keys(&mut state, &[KeyCode::Enter, KeyCode::Esc, KeyCode::Down, KeyCode::Enter]);
        type_text(&mut state, "20");
        handle_key(&mut state, KeyCode::Enter);

        assert_eq!(state.draft.line_items.len(), 2);
        assert_eq!(state.draft.totals().materials, 40.0);
        assert_eq!(state.draft.totals().general_total, 48.0);

        match handle_key(&mut state, KeyCode::Char('s')) {
            Some(QuoteWizardAction::Save(draft)) => assert_eq!(draft.title, "Deck"),
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn adding_an_item_resets_the_picker() {
        let mut state = QuoteWizardState::new(QuoteDraft::new(), catalog());
        keys(&mut state, &[KeyCode::Down, KeyCode::Enter, KeyCode::Right]);
        type_text(&mut state, "3");
        handle_key(&mut state, KeyCode::Enter);

        assert_eq!(state.draft.line_items[0].name, "Pinus");
        assert!(state.quantity_input.is_empty());
        assert_eq!(state.selected_material().map(|m| m.id.as_str()), Some("mdf"));
    }

    #[test]
    fn invalid_quantity_shows_an_error_and_adds_nothing() {
        let mut state = QuoteWizardState::new(QuoteDraft::new(), catalog());
        keys(&mut state, &[KeyCode::Down, KeyCode::Enter]);
        type_text(&mut state, "0");
        handle_key(&mut state, KeyCode::Enter);

        assert!(state.draft.line_items.is_empty());
        assert_eq!(
            state.show_error.as_deref(),
            Some("Quantity must be a number greater than zero.")
        );
    }

    #[test]
    fn saving_without_items_is_refused() {
        let mut state = QuoteWizardState::new(QuoteDraft::new(), catalog());
        handle_key(&mut state, KeyCode::Enter);
        type_text(&mut state, "Deck");
        handle_key(&mut state, KeyCode::Enter);

        assert!(handle_key(&mut state, KeyCode::Char('s')).is_none());
        assert_eq!(state.show_error.as_deref(), Some("Enter a title and add at least one material."));

        handle_key(&mut state, KeyCode::Esc);
        assert!(handle_key(&mut state, KeyCode::Char('p')).is_none());
        assert!(state.show_error.is_some());
    }

    #[test]
    fn exclusions_toggle_and_custom_entries_are_deduplicated() {
        let mut state = QuoteWizardState::new(QuoteDraft::new(), catalog());
        keys(&mut state, &[KeyCode::Up, KeyCode::Up, KeyCode::Enter, KeyCode::Down, KeyCode::Enter, KeyCode::Esc]);
        assert!(state.draft.exclusions.electrical);

        keys(&mut state, &[KeyCode::Down, KeyCode::Enter]);
        type_text(&mut state, "Frete");
        handle_key(&mut state, KeyCode::Enter);
        type_text(&mut state, " Frete ");
        handle_key(&mut state, KeyCode::Enter);
        assert_eq!(state.draft.custom_exclusions, vec!["Frete"]);

        handle_key(&mut state, KeyCode::Delete);
        assert!(state.draft.custom_exclusions.is_empty());
    }

    #[test]
    fn surcharge_flag_toggles_installment_total() {
        let mut draft = QuoteDraft::new();
        draft.surcharge_input = "5".to_string();
        let mut state = QuoteWizardState::new(draft, catalog());
        keys(&mut state, &[KeyCode::Down, KeyCode::Down, KeyCode::Down, KeyCode::Down]);
        handle_key(&mut state, KeyCode::Char(' '));

        assert!(state.draft.surcharge_enabled);
    }
}
