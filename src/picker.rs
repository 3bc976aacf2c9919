use chrono::{Datelike, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::Category;
use crate::tui::{FOOTER_STYLE, SELECTED_STYLE};

pub enum PickerAction<T> {
    Continue,
    Selected(T),
    Cancelled,
}

pub struct CategoryPicker {
    selection: usize,
}

impl CategoryPicker {
    pub fn new(current: Option<Category>) -> Self {
        let selection = current
            .and_then(|c| Category::ALL.iter().position(|x| *x == c))
            .unwrap_or(0);
        Self { selection }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerAction<Category> {
        match code {
            KeyCode::Up => self.selection = self.selection.saturating_sub(1),
            KeyCode::Down => self.selection = (self.selection + 1).min(Category::ALL.len() - 1),
            KeyCode::Enter => return PickerAction::Selected(Category::ALL[self.selection]),
            KeyCode::Esc => return PickerAction::Cancelled,
            _ => {}
        }
        PickerAction::Continue
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let height = Category::ALL.len() as u16 + 3;
        let sheet = bottom_sheet(area, height);
        let mut lines: Vec<Line> = Category::ALL
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if i == self.selection {
                    Line::from(Span::styled(format!(" > {c}"), SELECTED_STYLE))
                } else {
                    Line::from(format!("   {c}"))
                }
            })
            .collect();
        lines.push(Line::from(Span::styled(" Enter=select  Esc=close", FOOTER_STYLE)));

        frame.render_widget(Clear, sheet);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Select Category "),
            ),
            sheet,
        );
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum DateSegment {
    Month,
    Day,
    Year,
}

/// Month/day/year spinner. Changing the month or year clamps the day to
/// the new month's length.
pub struct DatePicker {
    year: i32,
    month: u32,
    day: u32,
    segment: DateSegment,
}

impl DatePicker {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            segment: DateSegment::Month,
        }
    }

    pub fn date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerAction<NaiveDate> {
        match code {
            KeyCode::Left | KeyCode::BackTab => {
                self.segment = match self.segment {
                    DateSegment::Month => DateSegment::Year,
                    DateSegment::Day => DateSegment::Month,
                    DateSegment::Year => DateSegment::Day,
                };
            }
            KeyCode::Right | KeyCode::Tab => {
                self.segment = match self.segment {
                    DateSegment::Month => DateSegment::Day,
                    DateSegment::Day => DateSegment::Year,
                    DateSegment::Year => DateSegment::Month,
                };
            }
            KeyCode::Up => self.step(1),
            KeyCode::Down => self.step(-1),
            KeyCode::Enter => return PickerAction::Selected(self.date()),
            KeyCode::Esc => return PickerAction::Cancelled,
            _ => {}
        }
        PickerAction::Continue
    }

    fn step(&mut self, delta: i32) {
        match self.segment {
            DateSegment::Month => {
                self.month = (self.month as i32 - 1 + delta).rem_euclid(12) as u32 + 1;
            }
            DateSegment::Day => {
                let len = days_in_month(self.year, self.month) as i32;
                self.day = (self.day as i32 - 1 + delta).rem_euclid(len) as u32 + 1;
            }
            DateSegment::Year => {
                self.year = (self.year + delta).clamp(1, 9999);
            }
        }
        self.day = self.day.min(days_in_month(self.year, self.month));
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let sheet = bottom_sheet(area, 5);
        let seg = |text: String, s: DateSegment| {
            if s == self.segment {
                Span::styled(
                    text,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                )
            } else {
                Span::raw(text)
            }
        };
        let lines = vec![
            Line::from(vec![
                Span::raw("   "),
                seg(format!("{:02}", self.month), DateSegment::Month),
                Span::raw(" / "),
                seg(format!("{:02}", self.day), DateSegment::Day),
                Span::raw(" / "),
                seg(format!("{:04}", self.year), DateSegment::Year),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                " \u{2190}\u{2192}=field  \u{2191}\u{2193}=change  Enter=confirm  Esc=close",
                FOOTER_STYLE,
            )),
        ];
        frame.render_widget(Clear, sheet);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Select Date "),
            ),
            sheet,
        );
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Rect anchored to the bottom of `area`, at most `height` rows tall.
fn bottom_sheet(area: Rect, height: u16) -> Rect {
    let h = height.min(area.height);
    Rect {
        x: area.x,
        y: area.y + area.height - h,
        width: area.width,
        height: h,
    }
}
