use std::path::PathBuf;

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
use crate::models::Quote;
use crate::models::dates::format_br;
use crate::ui::components::{
    highlight_style, listing_layout, render_buttons, render_delete_confirmation, render_error, table_state_for,
    wrap_next, wrap_previous,
};

// Represents the state of the quote table screen
pub struct QuotesState {
    quotes: Vec<Quote>,
    table_state: TableState,
    show_delete_confirmation: bool,
    pub message: Option<String>,
    pub show_error: Option<String>,
}

impl QuotesState {
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            table_state: table_state_for(quotes.len()),
            quotes,
            show_delete_confirmation: false,
            message: None,
            show_error: None,
        }
    }

    pub fn with_message(quotes: Vec<Quote>, message: String) -> Self {
        Self {
            message: Some(message),
            ..Self::new(quotes)
        }
    }

    pub fn next(&mut self) {
        self.table_state.select(wrap_next(self.table_state.selected(), self.quotes.len()));
    }

    pub fn previous(&mut self) {
        self.table_state.select(wrap_previous(self.table_state.selected(), self.quotes.len()));
    }

    pub fn selected_quote(&self) -> Option<&Quote> {
        self.table_state.selected().and_then(|i| self.quotes.get(i))
    }

    pub fn selected_quote_id(&self) -> Option<String> {
        self.selected_quote().map(|q| q.id.clone())
    }

    /// Report the outcome of writing a quote document.
    pub fn document_written(&mut self, outcome: Result<PathBuf>) {
        match outcome {
            Ok(path) => self.message = Some(format!("Document written to {}", path.display())),
            Err(err) => self.show_error = Some(format!("Could not write the document: {err:#}")),
        }
    }
}

pub enum QuoteAction {
    Back,
    NewQuote,
    EditQuote(String),
    DeleteQuote(String),
    PrintQuote(String),
}

pub fn render_quotes<B: Backend>(frame: &mut Frame<B>, state: &mut QuotesState) {
    let size = frame.size();
    let chunks = listing_layout(size);

    let header_cells = ["Title", "Date", "Items", "Cash Total", "Installments"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = state.quotes.iter().map(|quote| {
        let installments = if quote.surcharge_enabled {
            format_money(quote.totals.installment_total)
        } else {
            "-".to_string()
        };

        Row::new(vec![
            Cell::from(quote.title.as_str()),
            Cell::from(format_br(quote.created_on)),
            Cell::from(quote.line_items.len().to_string()),
            Cell::from(format_money(quote.totals.general_total)),
            Cell::from(installments),
        ])
    });

    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Saved Quotes").borders(Borders::ALL))
        .highlight_style(highlight_style())
        .widths(&[
            Constraint::Percentage(35),
            Constraint::Percentage(15),
            Constraint::Percentage(10),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ]);
    frame.render_stateful_widget(table, chunks[0], &mut state.table_state);

    let buttons = if state.selected_quote().is_some() {
        "<N> New Quote | <E> Edit Quote | <P> Print Quote | <D> Delete Quote | <Esc> Back"
    } else {
        "<N> New Quote | <Esc> Back"
    };
    render_buttons(frame, chunks[1], buttons, state.message.as_deref());

    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size, "quote");
    }

    if let Some(error) = &state.show_error {
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut QuotesState) -> Result<Option<QuoteAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(state, key.code));
    }
    Ok(None)
}

fn handle_key(state: &mut QuotesState, key: KeyCode) -> Option<QuoteAction> {
    state.message = None;
    if state.show_error.take().is_some() {
        return None;
    }

    if state.show_delete_confirmation {
        match key {
            KeyCode::Char('y') => {
                state.show_delete_confirmation = false;
                return state.selected_quote_id().map(QuoteAction::DeleteQuote);
            }
            KeyCode::Char('n') | KeyCode::Esc => state.show_delete_confirmation = false,
            _ => {}
        }
        return None;
    }

    match key {
        KeyCode::Char('q') | KeyCode::Esc => return Some(QuoteAction::Back),
        KeyCode::Char('n') => return Some(QuoteAction::NewQuote),
        KeyCode::Char('e') | KeyCode::Enter => return state.selected_quote_id().map(QuoteAction::EditQuote),
        KeyCode::Char('p') => return state.selected_quote_id().map(QuoteAction::PrintQuote),
        KeyCode::Char('d') if state.selected_quote().is_some() => state.show_delete_confirmation = true,
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanyProfile, QuoteDraft};
    use crate::quote_gen::QuoteDocumentGenerator;
    use chrono::NaiveDate;

    fn quote(id: &str) -> Quote {
        let mut draft = QuoteDraft::new();
        draft.title = format!("Orçamento {id}");
        draft.to_quote(id.to_string(), NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(), "marceneiro@example.com")
    }

    #[test]
    fn actions_target_the_selected_quote() {
        let mut state = QuotesState::new(vec![quote("a"), quote("b")]);
        handle_key(&mut state, KeyCode::Down);

        assert!(matches!(handle_key(&mut state, KeyCode::Char('p')), Some(QuoteAction::PrintQuote(id)) if id == "b"));
        assert!(matches!(handle_key(&mut state, KeyCode::Char('e')), Some(QuoteAction::EditQuote(id)) if id == "b"));
    }

    #[test]
    fn failed_document_write_is_shown_inline() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("afile");
        std::fs::write(&blocker, "not a directory").unwrap();
        let generator = QuoteDocumentGenerator::new(blocker.join("sub"), None);
        let mut state = QuotesState::new(vec![quote("a")]);

        state.document_written(generator.generate(&quote("a"), &CompanyProfile::default()));

        let error = state.show_error.clone().unwrap();
        assert!(error.starts_with("Could not write the document"));
        assert!(state.message.is_none());

        // The next key only dismisses the popup.
        assert!(handle_key(&mut state, KeyCode::Char('q')).is_none());
        assert!(matches!(handle_key(&mut state, KeyCode::Char('q')), Some(QuoteAction::Back)));
    }

    #[test]
    fn written_document_path_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let generator = QuoteDocumentGenerator::new(dir.path(), None);
        let mut state = QuotesState::new(vec![quote("a")]);

        state.document_written(generator.generate(&quote("a"), &CompanyProfile::default()));

        assert!(state.show_error.is_none());
        assert!(state.message.unwrap().ends_with("orcamento_a.html"));
    }

    #[test]
    fn empty_listing_only_offers_new_and_back() {
        let mut state = QuotesState::new(Vec::new());
        assert!(handle_key(&mut state, KeyCode::Char('e')).is_none());
        assert!(handle_key(&mut state, KeyCode::Char('d')).is_none());
        assert!(matches!(handle_key(&mut state, KeyCode::Char('n')), Some(QuoteAction::NewQuote)));
    }
}
