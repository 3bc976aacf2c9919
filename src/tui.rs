use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::draft::ValidationError;
use crate::fmt::money;

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const AMOUNT_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

pub const ALERT_STYLE: Style = Style::new().fg(Color::Yellow);

pub const ERROR_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);

/// Shown for any persistence failure caught at a screen boundary.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Blocking message shown until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
}

impl Alert {
    pub fn validation(err: ValidationError) -> Self {
        Self {
            title: err.title(),
            message: err.to_string(),
        }
    }

    pub fn generic() -> Self {
        Self {
            title: "Error",
            message: GENERIC_ERROR.to_string(),
        }
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(""),
            Line::from(Span::styled(format!("   {}", self.title), ERROR_STYLE)),
            Line::from(Span::styled(format!("   {}", self.message), ALERT_STYLE)),
            Line::from(Span::styled("   (press any key)", FOOTER_STYLE)),
        ]
    }
}

pub fn money_span(amount: f64) -> Span<'static> {
    Span::styled(money(amount), AMOUNT_STYLE)
}

pub fn title_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {title}"),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

/// Draw the shared header + separator and return (content, hints) areas.
pub fn chrome(frame: &mut Frame, header: &str) -> (Rect, Rect) {
    let area = frame.area();
    let [header_area, sep, content_area, hints_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(format!(" BetterSpend: {header}")).style(HEADER_STYLE),
        header_area,
    );
    let sep_line = "\u{2501}".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(sep_line).style(Style::default().fg(Color::DarkGray)),
        sep,
    );
    (content_area, hints_area)
}

pub fn hints(frame: &mut Frame, area: Rect, text: &str) {
    frame.render_widget(Paragraph::new(format!(" {text}")).style(FOOTER_STYLE), area);
}

/// Restore the terminal before the default panic output runs.
pub fn install_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));
}
