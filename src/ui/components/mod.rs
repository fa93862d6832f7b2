pub mod date_input;

use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, ListState, Paragraph, TableState, Wrap},
    Frame,
};

/// Append or erase one character of a text field.
pub fn edit_text(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) => value.push(c),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// Like [`edit_text`], restricted to what a decimal number can contain.
pub fn edit_number(value: &mut String, key: KeyCode) {
    match key {
        KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | '-') => value.push(c),
        KeyCode::Backspace => {
            value.pop();
        }
        _ => {}
    }
}

/// Next index in a wrapping list of `len` entries.
pub fn wrap_next(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(i) if i + 1 < len => i + 1,
        _ => 0,
    })
}

pub fn wrap_previous(selected: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    Some(match selected {
        Some(0) | None => len - 1,
        Some(i) => i - 1,
    })
}

pub fn list_state_for(len: usize) -> ListState {
    let mut state = ListState::default();
    if len > 0 {
        state.select(Some(0));
    }
    state
}

pub fn table_state_for(len: usize) -> TableState {
    let mut state = TableState::default();
    if len > 0 {
        state.select(Some(0));
    }
    state
}

/// Keep a selection in range after the underlying rows changed.
pub fn clamp_selection(selected: Option<usize>, len: usize) -> Option<usize> {
    match selected {
        _ if len == 0 => None,
        Some(i) if i >= len => Some(len - 1),
        Some(i) => Some(i),
        None => Some(0),
    }
}

pub fn highlight_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

/// One `Label: value` line of a wizard form.
pub fn form_line<'a>(name: &'a str, value: &'a str, selected: bool, editing: bool) -> Spans<'a> {
    let label_style = if selected {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    if selected && editing {
        Spans::from(vec![
            Span::styled(format!("{}: ", name), label_style),
            Span::styled(format!("{}|", value), Style::default().add_modifier(Modifier::BOLD)),
        ])
    } else {
        Spans::from(vec![
            Span::styled(format!("{}: ", name), label_style),
            Span::raw(value),
        ])
    }
}

pub fn render_title<B: Backend>(frame: &mut Frame<B>, area: Rect, title: &str) {
    let title = Paragraph::new(title.to_string())
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

pub fn render_help<B: Backend>(frame: &mut Frame<B>, area: Rect, help: &str) {
    let help = Paragraph::new(help.to_string())
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

/// Bottom line of a listing screen: key bindings, or a status message when there is one.
pub fn render_buttons<B: Backend>(frame: &mut Frame<B>, area: Rect, buttons: &str, message: Option<&str>) {
    let (text, color) = match message {
        Some(message) => (message.to_string(), Color::Green),
        None => (buttons.to_string(), Color::White),
    };
    let buttons = Paragraph::new(text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(color));
    frame.render_widget(buttons, area);
}

pub fn render_error<B: Backend>(frame: &mut Frame<B>, size: Rect, error: &str) {
    let popup_area = centered_rect(60, 20, size);

    let error_msg = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(error.to_string()),
        Spans::from(""),
        Spans::from("Press any key to continue"),
    ])
    .block(Block::default().title("Error").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red))
    .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(error_msg, popup_area);
}

pub fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect, what: &str) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(format!("Are you sure you want to delete this {}?", what)),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// Title, body and help rows shared by the wizards.
pub fn wizard_layout(size: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size)
}

/// Body and button rows shared by the listings.
pub fn listing_layout(size: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size)
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_both_ways() {
        assert_eq!(wrap_next(Some(2), 3), Some(0));
        assert_eq!(wrap_next(None, 3), Some(0));
        assert_eq!(wrap_previous(Some(0), 3), Some(2));
        assert_eq!(wrap_previous(Some(1), 3), Some(0));
        assert_eq!(wrap_next(Some(0), 0), None);
    }

    #[test]
    fn selection_is_clamped_after_removal() {
        assert_eq!(clamp_selection(Some(3), 3), Some(2));
        assert_eq!(clamp_selection(Some(1), 3), Some(1));
        assert_eq!(clamp_selection(Some(0), 0), None);
    }

    #[test]
    fn number_fields_reject_letters() {
        let mut value = String::new();
        for key in [KeyCode::Char('1'), KeyCode::Char('x'), KeyCode::Char(','), KeyCode::Char('5')] {
            edit_number(&mut value, key);
        }
        assert_eq!(value, "1,5");
    }
}
