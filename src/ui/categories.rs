use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::Category;
use crate::ui::components::{
    edit_text, form_line, highlight_style, list_state_for, render_buttons, render_delete_confirmation, render_error,
    wrap_next, wrap_previous,
};

pub struct CategoriesState {
    categories: Vec<Category>,
    list_state: ListState,
    new_name: String,
    adding: bool,
    show_delete_confirmation: bool,
    pub show_error: Option<String>,
}

impl CategoriesState {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            list_state: list_state_for(categories.len()),
            categories,
            new_name: String::new(),
            adding: false,
            show_delete_confirmation: false,
            show_error: None,
        }
    }

    pub fn next(&mut self) {
        self.list_state.select(wrap_next(self.list_state.selected(), self.categories.len()));
    }

    pub fn previous(&mut self) {
        self.list_state.select(wrap_previous(self.list_state.selected(), self.categories.len()));
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.list_state.selected().and_then(|i| self.categories.get(i))
    }
}

pub enum CategoryAction {
    Back,
    AddCategory(String),
    DeleteCategory(String),
}

pub fn render_categories<B: Backend>(frame: &mut Frame<B>, state: &mut CategoriesState) {
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

    let input = Paragraph::new(form_line("New category", &state.new_name, state.adding, state.adding))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(input, chunks[0]);

    let items: Vec<ListItem> = state
        .categories
        .iter()
        .map(|category| ListItem::new(category.name.as_str()))
        .collect();
    let list = List::new(items)
        .block(Block::default().title("Categories").borders(Borders::ALL))
        .highlight_style(highlight_style());
    frame.render_stateful_widget(list, chunks[1], &mut state.list_state);

    let buttons = if state.adding {
        "<Enter> Add | <Esc> Cancel"
    } else {
        "<A> Add Category | <D> Delete Category | <Esc> Back"
    };
    render_buttons(frame, chunks[2], buttons, None);

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size, "category");
    }
    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut CategoriesState) -> Result<Option<CategoryAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut CategoriesState, key: KeyCode) -> Option<CategoryAction> {
    if state.show_error.take().is_some() {
        return None;
    }

    if state.adding {
        match key {
            KeyCode::Esc => {
                state.adding = false;
                state.new_name.clear();
            }
            KeyCode::Enter => {
                if state.new_name.trim().is_empty() {
                    state.show_error = Some("Category name is required.".to_string());
                    return None;
                }
                state.adding = false;
                return Some(CategoryAction::AddCategory(std::mem::take(&mut state.new_name)));
            }
            _ => edit_text(&mut state.new_name, key),
        }
        return None;
    }

    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('y') => {
                state.show_delete_confirmation = false;
                return state
                    .selected_category()
                    .map(|c| CategoryAction::DeleteCategory(c.id.clone()));
            }
            KeyCode::Char('n') | KeyCode::Esc => state.show_delete_confirmation = false,
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(CategoryAction::Back),
        KeyCode::Char('a') => state.adding = true,
        KeyCode::Char('d') if state.selected_category().is_some() => state.show_delete_confirmation = true,
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_refused() {
        let mut state = CategoriesState::new(Vec::new());
        handle_key(&mut state, KeyCode::Char('a'));
        handle_key(&mut state, KeyCode::Char(' '));

        assert!(handle_key(&mut state, KeyCode::Enter).is_none());
        assert!(state.show_error.is_some());
    }

    #[test]
    fn typed_name_is_added() {
        let mut state = CategoriesState::new(Vec::new());
        handle_key(&mut state, KeyCode::Char('a'));
        for c in "Chapas".chars() {
            handle_key(&mut state, KeyCode::Char(c));
        }
        match handle_key(&mut state, KeyCode::Enter) {
            Some(CategoryAction::AddCategory(name)) => assert_eq!(name, "Chapas"),
            _ => panic!("expected add"),
        }
    }
}
