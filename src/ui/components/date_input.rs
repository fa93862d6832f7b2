use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DatePart {
    Day,
    Month,
    Year,
}

/// Date typed part by part in the shop's `dd/mm/yyyy` order.
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Day,
            current_date_input: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        if self.editing {
            self.date_part = DatePart::Day;
            self.current_date_input.clear();
        }
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Day => DatePart::Month,
            DatePart::Month => DatePart::Year,
            DatePart::Year => DatePart::Day,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Day => DatePart::Year,
            DatePart::Month => DatePart::Day,
            DatePart::Year => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                let width = match self.date_part {
                    DatePart::Year => 4,
                    DatePart::Day | DatePart::Month => 2,
                };
                if self.current_date_input.len() < width {
                    return;
                }

                if let Some(date) = self.apply_input() {
                    self.date = date;
                }
                self.current_date_input.clear();
                if self.date_part != DatePart::Year {
                    self.next_date_part();
                }
            }
            KeyCode::Backspace => {
                self.current_date_input.pop();
            }
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    /// The date with the typed part substituted, if that is a real calendar day.
    fn apply_input(&self) -> Option<NaiveDate> {
        let value: u32 = self.current_date_input.parse().ok()?;
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());

        match self.date_part {
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            DatePart::Month => NaiveDate::from_ymd_opt(year, value, day),
            DatePart::Year if (1900..=2100).contains(&value) => {
                NaiveDate::from_ymd_opt(value as i32, month, day)
            }
            DatePart::Year => None,
        }
    }

    pub fn get_display_string(&self) -> String {
        let day = format!("{:02}", self.date.day());
        let month = format!("{:02}", self.date.month());
        let year = format!("{:04}", self.date.year());

        if !self.editing {
            return format!("{day}/{month}/{year}");
        }

        let current_input = if !self.current_date_input.is_empty() {
            format!("[{}]", self.current_date_input)
        } else {
            match self.date_part {
                DatePart::Day => "[DD]".to_string(),
                DatePart::Month => "[MM]".to_string(),
                DatePart::Year => "[YYYY]".to_string(),
            }
        };

        match self.date_part {
            DatePart::Day => format!("{day}{current_input}/{month}/{year}"),
            DatePart::Month => format!("{day}/{month}{current_input}/{year}"),
            DatePart::Year => format!("{day}/{month}/{year}{current_input}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(date: NaiveDate) -> DateInputState {
        let mut state = DateInputState::new(date);
        state.toggle_editing();
        state
    }

    fn type_digits(state: &mut DateInputState, digits: &str) {
        for c in digits.chars() {
            state.handle_input(KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_day_month_year_in_order() {
        let mut state = editing(NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        type_digits(&mut state, "03");
        type_digits(&mut state, "02");
        type_digits(&mut state, "2023");

        assert_eq!(state.date, NaiveDate::from_ymd_opt(2023, 2, 3).unwrap());
    }

    #[test]
    fn impossible_days_are_ignored() {
        let mut state = editing(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        type_digits(&mut state, "30");

        assert_eq!(state.date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(state.date_part, DatePart::Month);
    }

    #[test]
    fn display_marks_the_part_being_typed() {
        let mut state = DateInputState::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(state.get_display_string(), "01/05/2024");

        state.toggle_editing();
        state.handle_input(KeyCode::Right);
        assert_eq!(state.get_display_string(), "01/05[MM]/2024");
    }
}
