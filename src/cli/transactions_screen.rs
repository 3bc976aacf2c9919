use chrono::Local;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::db::Store;
use crate::draft::{replace_date, TransactionDraft};
use crate::error::Result;
use crate::fmt::short_date;
use crate::form::{DraftForm, FormEvent, EDIT_FIELDS};
use crate::models::Transaction;
use crate::picker::{CategoryPicker, DatePicker, PickerAction};
use crate::tui::{self, Alert, ALERT_STYLE};

pub enum TransactionsAction {
    Continue,
    Close,
}

enum Screen {
    List,
    Edit(Box<EditSession>),
}

struct EditSession {
    selected: Transaction,
    form: DraftForm,
    overlay: Overlay,
}

enum Overlay {
    None,
    PickCategory(CategoryPicker),
    PickDate(DatePicker),
    ConfirmDelete,
}

pub struct TransactionsScreen {
    transactions: Vec<Transaction>,
    selection: usize,
    screen: Screen,
    alert: Option<Alert>,
}

impl Default for TransactionsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionsScreen {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            selection: 0,
            screen: Screen::List,
            alert: None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.screen, Screen::Edit(_))
    }

    pub fn draft(&self) -> Option<&TransactionDraft> {
        match &self.screen {
            Screen::Edit(session) => Some(&session.form.draft),
            Screen::List => None,
        }
    }

    /// Called every time the screen gains focus: replace local state with a
    /// full re-read.
    pub fn on_focus(&mut self, store: &Store) {
        if let Err(e) = self.reload(store) {
            tracing::error!(error = %e, "failed to load transactions");
            self.alert = Some(Alert::generic());
        }
    }

    fn reload(&mut self, store: &Store) -> Result<()> {
        self.transactions = store.list_all()?;
        tracing::info!(count = self.transactions.len(), "loaded transactions");
        if self.transactions.is_empty() {
            self.selection = 0;
        } else {
            self.selection = self.selection.min(self.transactions.len() - 1);
        }
        Ok(())
    }

    fn close_edit(&mut self) {
        self.screen = Screen::List;
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    pub fn draw(&self, frame: &mut Frame) {
        let (content, hints_area) = tui::chrome(frame, "Transactions");
        self.draw_list(frame, content);

        match &self.screen {
            Screen::List => {
                if let Some(alert) = &self.alert {
                    let [_, alert_area] =
                        Layout::vertical([Constraint::Fill(1), Constraint::Length(4)]).areas(content);
                    frame.render_widget(Clear, alert_area);
                    frame.render_widget(Paragraph::new(alert.lines()), alert_area);
                }
                tui::hints(frame, hints_area, "\u{2191}\u{2193}=select  Enter=edit  r=reload  Esc=back");
            }
            Screen::Edit(session) => {
                self.draw_edit(frame, content, session);
                let hint = match session.overlay {
                    Overlay::ConfirmDelete => "y=delete  n=keep",
                    _ => "Tab=next field  \u{2190}\u{2192}=account/button  Enter=save/pick  Esc=cancel",
                };
                tui::hints(frame, hints_area, hint);
            }
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            tui::title_line(&format!("Transactions loaded: {}", self.transactions.len())),
            Line::from(""),
        ];

        if self.transactions.is_empty() {
            lines.push(Line::from("   No transactions yet. Add one from the home screen."));
        } else {
            // Two lines per row; keep the selection on screen.
            let per_page = ((area.height as usize).saturating_sub(lines.len()) / 2).max(1);
            let start = self.selection.saturating_sub(per_page - 1);
            for (i, tx) in self.transactions.iter().enumerate().skip(start).take(per_page) {
                let selected = i == self.selection;
                let marker = if selected { " > " } else { "   " };
                let merchant_style = if selected {
                    tui::SELECTED_STYLE
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                lines.push(Line::from(Span::styled(format!("{marker}{}", tx.merchant), merchant_style)));
                lines.push(Line::from(vec![
                    Span::raw("     "),
                    tui::money_span(tx.amount),
                    Span::styled(
                        format!(
                            " \u{2022} {} \u{2022} {} \u{2022} {}",
                            tx.category_label(),
                            tx.account.label(),
                            short_date(&tx.date)
                        ),
                        Style::default().fg(Color::Gray),
                    ),
                ]));
            }
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_edit(&self, frame: &mut Frame, area: Rect, session: &EditSession) {
        let card = centered(area, 72, 16);
        let mut lines = vec![Line::from("")];
        lines.extend(session.form.lines());

        if let Overlay::ConfirmDelete = session.overlay {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled("   Delete transaction?", tui::ERROR_STYLE)));
            lines.push(Line::from(Span::styled(
                "   This can't be undone. (y/n)",
                ALERT_STYLE,
            )));
        }
        if let Some(alert) = &self.alert {
            lines.extend(alert.lines());
        }

        frame.render_widget(Clear, card);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Edit Transaction "),
            ),
            card,
        );

        match &session.overlay {
            Overlay::PickCategory(picker) => picker.draw(frame, area),
            Overlay::PickDate(picker) => picker.draw(frame, area),
            Overlay::None | Overlay::ConfirmDelete => {}
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, code: KeyCode, store: &Store) -> TransactionsAction {
        if self.alert.take().is_some() {
            return TransactionsAction::Continue;
        }
        if self.is_editing() {
            self.handle_edit_key(code, store);
            return TransactionsAction::Continue;
        }
        self.handle_list_key(code, store)
    }

    fn handle_list_key(&mut self, code: KeyCode, store: &Store) -> TransactionsAction {
        match code {
            KeyCode::Up => self.selection = self.selection.saturating_sub(1),
            KeyCode::Down => {
                if !self.transactions.is_empty() {
                    self.selection = (self.selection + 1).min(self.transactions.len() - 1);
                }
            }
            KeyCode::Enter => {
                if let Some(tx) = self.transactions.get(self.selection) {
                    self.screen = Screen::Edit(Box::new(EditSession {
                        selected: tx.clone(),
                        form: DraftForm::new(TransactionDraft::from_transaction(tx), EDIT_FIELDS),
                        overlay: Overlay::None,
                    }));
                }
            }
            KeyCode::Char('r') => self.on_focus(store),
            KeyCode::Char('q') | KeyCode::Esc => return TransactionsAction::Close,
            _ => {}
        }
        TransactionsAction::Continue
    }

    fn handle_edit_key(&mut self, code: KeyCode, store: &Store) {
        let Screen::Edit(session) = &mut self.screen else {
            return;
        };

        match &mut session.overlay {
            Overlay::PickCategory(picker) => {
                match picker.handle_key(code) {
                    PickerAction::Continue => {}
                    PickerAction::Selected(category) => {
                        session.form.draft.pick_category(category);
                        session.overlay = Overlay::None;
                    }
                    PickerAction::Cancelled => session.overlay = Overlay::None,
                }
                return;
            }
            Overlay::PickDate(picker) => {
                match picker.handle_key(code) {
                    PickerAction::Continue => {}
                    PickerAction::Selected(date) => {
                        let current = session.form.draft.date.unwrap_or(session.selected.date);
                        session.form.draft.date = Some(replace_date(current, date, &Local));
                        session.overlay = Overlay::None;
                    }
                    PickerAction::Cancelled => session.overlay = Overlay::None,
                }
                return;
            }
            Overlay::ConfirmDelete => {
                match code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => {
                        let id = session.selected.id.clone();
                        self.delete(&id, store);
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        session.overlay = Overlay::None;
                    }
                    _ => {}
                }
                return;
            }
            Overlay::None => {}
        }

        match session.form.handle_key(code) {
            FormEvent::Continue => {}
            FormEvent::Cancel => self.close_edit(),
            FormEvent::OpenCategory => {
                session.overlay = Overlay::PickCategory(CategoryPicker::new(session.form.draft.category));
            }
            FormEvent::OpenDate => {
                let date = session.form.draft.date.unwrap_or(session.selected.date);
                session.overlay = Overlay::PickDate(DatePicker::new(date.with_timezone(&Local).date_naive()));
            }
            FormEvent::Delete => session.overlay = Overlay::ConfirmDelete,
            FormEvent::Submit => self.save(store),
        }
    }

    fn save(&mut self, store: &Store) {
        let Screen::Edit(session) = &self.screen else {
            return;
        };
        let valid = match session.form.draft.validate() {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "edit form rejected");
                self.alert = Some(Alert::validation(e));
                return;
            }
        };
        let date = session.form.draft.date.unwrap_or(session.selected.date);
        let updated = valid.apply_to(&session.selected, date);

        let result = store.update(&updated).and_then(|_| self.reload(store));
        match result {
            Ok(()) => self.close_edit(),
            Err(e) => {
                tracing::error!(error = %e, "failed to update transaction");
                self.alert = Some(Alert::generic());
            }
        }
    }

    fn delete(&mut self, id: &str, store: &Store) {
        let result = store.remove(id).and_then(|_| self.reload(store));
        match result {
            Ok(()) => self.close_edit(),
            Err(e) => {
                tracing::error!(error = %e, "failed to delete transaction");
                if let Screen::Edit(session) = &mut self.screen {
                    session.overlay = Overlay::None;
                }
                self.alert = Some(Alert::generic());
            }
        }
    }
}

/// A rect of at most `width` x `height` centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}
