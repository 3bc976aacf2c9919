use crossterm::event::KeyCode;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::draft::TransactionDraft;
use crate::fmt::short_date;
use crate::models::AccountType;
use crate::tui::SELECTED_STYLE;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Merchant,
    Amount,
    Category,
    Account,
    Date,
    Actions,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Merchant => "Merchant",
            Field::Amount => "Amount",
            Field::Category => "Category",
            Field::Account => "Account",
            Field::Date => "Date",
            Field::Actions => "",
        }
    }
}

pub const ADD_FIELDS: &[Field] = &[Field::Merchant, Field::Amount, Field::Category, Field::Account];

pub const EDIT_FIELDS: &[Field] = &[
    Field::Merchant,
    Field::Amount,
    Field::Category,
    Field::Account,
    Field::Date,
    Field::Actions,
];

const BUTTONS: &[&str] = &["Delete", "Cancel", "Save"];
const BUTTON_DELETE: usize = 0;
const BUTTON_CANCEL: usize = 1;
const BUTTON_SAVE: usize = 2;

#[derive(Debug, PartialEq, Eq)]
pub enum FormEvent {
    Continue,
    Submit,
    OpenCategory,
    OpenDate,
    Delete,
    Cancel,
}

/// Keyboard-driven form over a [`TransactionDraft`].
pub struct DraftForm {
    pub draft: TransactionDraft,
    fields: &'static [Field],
    focused: usize,
    button: usize,
}

impl DraftForm {
    pub fn new(draft: TransactionDraft, fields: &'static [Field]) -> Self {
        Self {
            draft,
            fields,
            focused: 0,
            button: BUTTON_SAVE,
        }
    }

    pub fn focused(&self) -> Field {
        self.fields[self.focused]
    }

    pub fn handle_key(&mut self, code: KeyCode) -> FormEvent {
        match code {
            KeyCode::Esc => return FormEvent::Cancel,
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % self.fields.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = if self.focused == 0 {
                    self.fields.len() - 1
                } else {
                    self.focused - 1
                };
            }
            KeyCode::Left => match self.focused() {
                Field::Account => self.draft.account = self.draft.account.prev(),
                Field::Actions => self.button = self.button.saturating_sub(1),
                _ => {}
            },
            KeyCode::Right => match self.focused() {
                Field::Account => self.draft.account = self.draft.account.next(),
                Field::Actions => self.button = (self.button + 1).min(BUTTONS.len() - 1),
                _ => {}
            },
            KeyCode::Char(c) => match self.focused() {
                Field::Merchant => self.draft.merchant.push(c),
                Field::Amount => self.draft.amount.push(c),
                _ => {}
            },
            KeyCode::Backspace => match self.focused() {
                Field::Merchant => {
                    self.draft.merchant.pop();
                }
                Field::Amount => {
                    self.draft.amount.pop();
                }
                _ => {}
            },
            KeyCode::Enter => {
                return match self.focused() {
                    Field::Category => FormEvent::OpenCategory,
                    Field::Date => FormEvent::OpenDate,
                    Field::Actions => match self.button {
                        BUTTON_DELETE => FormEvent::Delete,
                        BUTTON_CANCEL => FormEvent::Cancel,
                        _ => FormEvent::Submit,
                    },
                    _ => FormEvent::Submit,
                };
            }
            _ => {}
        }
        FormEvent::Continue
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let focus_style = Style::default().fg(Color::Cyan);
        let placeholder = Style::default().fg(Color::DarkGray);

        self.fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let is_focused = i == self.focused;
                let label_style = if is_focused {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let value_style = if is_focused { focus_style } else { Style::default() };
                let mut spans = vec![Span::styled(format!("   {:<10} ", field.label()), label_style)];

                match field {
                    Field::Merchant | Field::Amount => {
                        let text = if *field == Field::Merchant {
                            &self.draft.merchant
                        } else {
                            &self.draft.amount
                        };
                        let cursor = if is_focused { "_" } else { "" };
                        spans.push(Span::styled(format!("{text}{cursor}"), value_style));
                    }
                    Field::Category => match self.draft.category_label() {
                        Some(c) => spans.push(Span::styled(c.to_string(), value_style)),
                        None => spans.push(Span::styled("Category", placeholder)),
                    },
                    Field::Account => {
                        for account in AccountType::ALL {
                            let style = if account == self.draft.account {
                                SELECTED_STYLE.fg(Color::Rgb(10, 132, 255))
                            } else {
                                Style::default().fg(Color::Gray)
                            };
                            spans.push(Span::styled(format!(" {} ", account.label()), style));
                            spans.push(Span::raw(" "));
                        }
                    }
                    Field::Date => {
                        let text = self.draft.date.as_ref().map(short_date).unwrap_or_default();
                        spans.push(Span::styled(text, value_style));
                    }
                    Field::Actions => {
                        for (b, name) in BUTTONS.iter().enumerate() {
                            let base = if b == BUTTON_DELETE {
                                Style::default().fg(Color::Red)
                            } else {
                                Style::default()
                            };
                            let style = if is_focused && b == self.button {
                                base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
                            } else {
                                base
                            };
                            spans.push(Span::styled(format!("[ {name} ]"), style));
                            spans.push(Span::raw("  "));
                        }
                    }
                }
                Line::from(spans)
            })
            .collect()
    }
}
