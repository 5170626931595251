//! Modal overlays. Each wraps a UI-agnostic controller from `hcdash-core`
//! and captures all keys while open.

pub mod api_action;
pub mod detail;
pub mod raw_call;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use hcdash_core::ResponseView;

use crate::theme;

pub use api_action::ApiActionPopup;
pub use detail::DetailPopup;
pub use raw_call::RawCallPopup;

/// Rect of `percent_x` by `percent_y` centered in `area`.
pub fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = (area.width.saturating_mul(percent_x) / 100).max(20);
    let height = (area.height.saturating_mul(percent_y) / 100).max(8);
    let (width, height) = (width.min(area.width), height.min(area.height));
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x + x, area.y + y, width, height)
}

/// Clear the overlay area and draw its frame. Returns the inner area.
pub fn render_frame(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) -> Rect {
    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        area,
    );

    let mut block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    if !subtitle.is_empty() {
        block = block.title(
            Line::from(Span::styled(format!(" {subtitle} "), theme::key_hint())).right_aligned(),
        );
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

/// Lines for a response area: the failure banner (if any) above the
/// payload text. Tabs are expanded since terminals render them unevenly.
pub fn response_lines(view: &ResponseView) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if let Some(banner) = view.banner() {
        lines.push(Line::from(Span::styled(
            format!("✗ {banner}"),
            theme::error_banner(),
        )));
    }
    lines.extend(
        view.text()
            .lines()
            .map(|l| Line::from(Span::styled(l.replace('\t', "    "), theme::table_row()))),
    );
    lines
}

/// Render a response area, with a throbber while the call is in flight.
pub fn render_response(
    frame: &mut Frame,
    area: Rect,
    view: &ResponseView,
    scroll: u16,
    throbber: &ThrobberState,
) {
    if matches!(view, ResponseView::Loading) {
        let throbber_widget = Throbber::default()
            .label(view.text())
            .style(Style::default().fg(theme::DIM_WHITE))
            .throbber_style(Style::default().fg(theme::NEON_CYAN));
        frame.render_stateful_widget(throbber_widget, area, &mut throbber.clone());
        return;
    }

    let paragraph = Paragraph::new(response_lines(view))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Key hint line: `[("Esc", "close"), ...]`.
pub fn hint_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!(" {key} "), theme::key_hint_key()));
        spans.push(Span::styled(format!("{label} "), theme::key_hint()));
    }
    Line::from(spans)
}
