use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::add_screen::{AddAction, AddScreen};
use super::transactions_screen::{TransactionsAction, TransactionsScreen};
use crate::db::Store;
use crate::error::Result;
use crate::tui::{self, HEADER_STYLE, SELECTED_STYLE};

const MENU_ITEMS: &[&str] = &["Add a transaction", "View transactions", "Quit"];
const MENU_ADD: usize = 0;
const MENU_TRANSACTIONS: usize = 1;
const MENU_QUIT: usize = 2;

enum AppScreen {
    Home,
    Add,
    Transactions,
}

pub struct App {
    screen: AppScreen,
    menu_selection: usize,
    add: AddScreen,
    transactions: TransactionsScreen,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            screen: AppScreen::Home,
            menu_selection: 0,
            add: AddScreen::new(),
            transactions: TransactionsScreen::new(),
        }
    }

    fn show_transactions(&mut self, store: &Store) {
        self.screen = AppScreen::Transactions;
        self.transactions.on_focus(store);
    }

    fn draw(&self, frame: &mut Frame) {
        match self.screen {
            AppScreen::Home => self.draw_home(frame),
            AppScreen::Add => self.add.draw(frame),
            AppScreen::Transactions => self.transactions.draw(frame),
        }
    }

    fn draw_home(&self, frame: &mut Frame) {
        let (content, hints_area) = tui::chrome(frame, "Home");
        let [_, body, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(4 + MENU_ITEMS.len() as u16),
            Constraint::Fill(1),
        ])
        .areas(content);

        let mut lines = vec![
            Line::from(Span::styled("BetterSpend", HEADER_STYLE)).centered(),
            Line::from(Span::styled(
                "Manual Spending Tracker",
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            ))
            .centered(),
            Line::from(""),
        ];
        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let line = if i == self.menu_selection {
                Line::from(Span::styled(format!(" > {item} "), SELECTED_STYLE))
            } else {
                Line::from(format!("   {item} "))
            };
            lines.push(line.centered());
        }
        frame.render_widget(Paragraph::new(lines), body);
        tui::hints(frame, hints_area, "\u{2191}\u{2193}=select  Enter=open  q=quit");
    }

    /// Route a key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode, store: &Store) -> bool {
        match self.screen {
            AppScreen::Home => match code {
                KeyCode::Up => self.menu_selection = self.menu_selection.saturating_sub(1),
                KeyCode::Down => {
                    self.menu_selection = (self.menu_selection + 1).min(MENU_ITEMS.len() - 1)
                }
                KeyCode::Char('a') => self.screen = AppScreen::Add,
                KeyCode::Char('t') => self.show_transactions(store),
                KeyCode::Enter => match self.menu_selection {
                    MENU_ADD => self.screen = AppScreen::Add,
                    MENU_TRANSACTIONS => self.show_transactions(store),
                    MENU_QUIT => return true,
                    _ => {}
                },
                KeyCode::Char('q') | KeyCode::Esc => return true,
                _ => {}
            },
            AppScreen::Add => match self.add.handle_key(code, store) {
                AddAction::Continue => {}
                AddAction::Close => self.screen = AppScreen::Home,
                AddAction::Saved => self.show_transactions(store),
            },
            AppScreen::Transactions => match self.transactions.handle_key(code, store) {
                TransactionsAction::Continue => {}
                TransactionsAction::Close => self.screen = AppScreen::Home,
            },
        }
        false
    }
}

/// Run the interactive app until the user quits. `store` must already be
/// initialized.
pub fn run(store: &Store) -> Result<()> {
    tui::install_panic_hook();
    tracing::info!(db = %store.path().display(), "starting interactive app");

    let mut app = App::new();
    let mut terminal = ratatui::init();

    let result: Result<()> = loop {
        if let Err(e) = terminal.draw(|frame| app.draw(frame)) {
            break Err(e.into());
        }

        match event::read() {
            Err(e) => break Err(e.into()),
            Ok(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break Ok(());
                }
                if app.handle_key(key.code, store) {
                    break Ok(());
                }
            }
            _ => {}
        }
    };

    drop(terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("test.db"));
        store.initialize().unwrap();
        (dir, store)
    }

    #[test]
    fn test_saving_from_add_navigates_to_refreshed_list() {
        let (_dir, store) = test_store();
        let mut app = App::new();
        app.handle_key(KeyCode::Enter, &store);
        assert!(matches!(app.screen, AppScreen::Add));

        for c in "Shell".chars() {
            app.handle_key(KeyCode::Char(c), &store);
        }
        app.handle_key(KeyCode::Tab, &store);
        for c in "40".chars() {
            app.handle_key(KeyCode::Char(c), &store);
        }
        app.handle_key(KeyCode::Tab, &store);
        app.handle_key(KeyCode::Enter, &store);
        app.handle_key(KeyCode::Enter, &store);
        app.handle_key(KeyCode::Tab, &store);
        app.handle_key(KeyCode::Enter, &store);

        assert!(matches!(app.screen, AppScreen::Transactions));
        assert_eq!(app.transactions.transactions().len(), 1);
        assert_eq!(app.transactions.transactions()[0].merchant, "Shell");
    }

    #[test]
    fn test_back_and_quit() {
        let (_dir, store) = test_store();
        let mut app = App::new();
        assert!(!app.handle_key(KeyCode::Char('t'), &store));
        assert!(matches!(app.screen, AppScreen::Transactions));
        assert!(!app.handle_key(KeyCode::Esc, &store));
        assert!(matches!(app.screen, AppScreen::Home));
        assert!(app.handle_key(KeyCode::Char('q'), &store));
    }

    #[test]
    fn test_menu_quit_item() {
        let (_dir, store) = test_store();
        let mut app = App::new();
        app.handle_key(KeyCode::Down, &store);
        app.handle_key(KeyCode::Down, &store);
        app.handle_key(KeyCode::Down, &store);
        assert!(app.handle_key(KeyCode::Enter, &store));
    }
}
