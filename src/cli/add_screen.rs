use chrono::Utc;
use crossterm::event::KeyCode;
use ratatui::{text::Line, widgets::Paragraph, Frame};

use crate::db::Store;
use crate::draft::TransactionDraft;
use crate::form::{DraftForm, FormEvent, ADD_FIELDS};
use crate::picker::{CategoryPicker, PickerAction};
use crate::tui::{self, Alert};

pub enum AddAction {
    Continue,
    Close,
    /// A record was stored; the caller navigates to the transactions list.
    Saved,
}

enum Mode {
    Editing,
    PickCategory(CategoryPicker),
}

pub struct AddScreen {
    form: DraftForm,
    mode: Mode,
    alert: Option<Alert>,
}

impl Default for AddScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl AddScreen {
    pub fn new() -> Self {
        Self {
            form: DraftForm::new(TransactionDraft::default(), ADD_FIELDS),
            mode: Mode::Editing,
            alert: None,
        }
    }

    pub fn draft(&self) -> &TransactionDraft {
        &self.form.draft
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn draw(&self, frame: &mut Frame) {
        let (content, hints_area) = tui::chrome(frame, "Add Transaction");

        let mut lines = vec![Line::from(""), tui::title_line("Add Transaction"), Line::from("")];
        lines.extend(self.form.lines());
        if let Some(alert) = &self.alert {
            lines.extend(alert.lines());
        }
        frame.render_widget(Paragraph::new(lines), content);

        tui::hints(
            frame,
            hints_area,
            "Tab=next field  \u{2190}\u{2192}=account  Enter=save/pick  Esc=back",
        );

        if let Mode::PickCategory(picker) = &self.mode {
            picker.draw(frame, content);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, store: &Store) -> AddAction {
        if self.alert.take().is_some() {
            return AddAction::Continue;
        }

        if let Mode::PickCategory(picker) = &mut self.mode {
            match picker.handle_key(code) {
                PickerAction::Continue => {}
                PickerAction::Selected(category) => {
                    self.form.draft.pick_category(category);
                    self.mode = Mode::Editing;
                }
                PickerAction::Cancelled => self.mode = Mode::Editing,
            }
            return AddAction::Continue;
        }

        match self.form.handle_key(code) {
            FormEvent::Cancel => AddAction::Close,
            FormEvent::OpenCategory => {
                self.mode = Mode::PickCategory(CategoryPicker::new(self.form.draft.category));
                AddAction::Continue
            }
            FormEvent::Submit => self.save(store),
            FormEvent::Continue | FormEvent::OpenDate | FormEvent::Delete => AddAction::Continue,
        }
    }

    fn save(&mut self, store: &Store) -> AddAction {
        let valid = match self.form.draft.validate() {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!(error = %e, "add form rejected");
                self.alert = Some(Alert::validation(e));
                return AddAction::Continue;
            }
        };
        let tx = valid.into_new_transaction(Utc::now());
        match store.add(&tx) {
            Ok(()) => {
                self.form = DraftForm::new(TransactionDraft::default(), ADD_FIELDS);
                AddAction::Saved
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to add transaction");
                self.alert = Some(Alert::generic());
                AddAction::Continue
            }
        }
    }
}
