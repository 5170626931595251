//! Request detail overlay: headers and bodies of one captured exchange.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use hcdash_core::{BodyText, DetailState, DetailView, HeaderPair, RecordId, TrafficLog};

use super::{centered_rect, hint_line, render_frame};
use crate::action::Action;
use crate::component::Component;
use crate::theme;

pub struct DetailPopup {
    traffic: Arc<TrafficLog>,
    state: Option<DetailState>,
    scroll: u16,
}

impl DetailPopup {
    pub fn new(traffic: Arc<TrafficLog>) -> Self {
        Self {
            traffic,
            state: None,
            scroll: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    pub fn open(&mut self, id: &RecordId) {
        self.state = Some(DetailState::open(self.traffic.as_ref(), id));
        self.scroll = 0;
    }

    pub fn close(&mut self) {
        self.state = None;
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("── {title} "),
        Style::default().fg(theme::NEON_CYAN),
    ))
}

fn header_lines(headers: &[HeaderPair]) -> Vec<Line<'static>> {
    if headers.is_empty() {
        return vec![Line::from(Span::styled("  (no headers)", theme::muted()))];
    }
    let key_width = headers.iter().map(|h| h.key.len()).max().unwrap_or(0);
    headers
        .iter()
        .map(|h| {
            Line::from(vec![
                Span::styled(format!("  {:<key_width$}  ", h.key), theme::key_hint_key()),
                Span::styled(h.value.clone(), theme::table_row()),
            ])
        })
        .collect()
}

fn body_lines(body: &BodyText) -> Vec<Line<'static>> {
    let style = if body.is_muted() {
        theme::muted()
    } else {
        theme::table_row()
    };
    body.text()
        .lines()
        .map(|l| Line::from(Span::styled(format!("  {l}"), style)))
        .collect()
}

/// Full scrollable content for a found record.
pub fn detail_lines(view: &DetailView) -> Vec<Line<'static>> {
    let status = view
        .status
        .map_or_else(|| "no response".to_owned(), |s| s.to_string());
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  Status ", theme::key_hint()),
            Span::styled(status, Style::default().fg(theme::status_color(view.status))),
            Span::styled("   Time ", theme::key_hint()),
            Span::styled(
                view.time.clone().unwrap_or_else(|| "-".into()),
                theme::table_row(),
            ),
        ]),
        Line::from(""),
        section("Request headers"),
    ];
    lines.extend(header_lines(&view.request_headers));
    lines.push(Line::from(""));
    lines.push(section("Request body"));
    lines.extend(body_lines(&view.request_body));
    lines.push(Line::from(""));
    lines.push(section("Response headers"));
    lines.extend(header_lines(&view.response_headers));
    lines.push(Line::from(""));
    lines.push(section("Response body"));
    lines.extend(body_lines(&view.response_body));
    lines
}

impl Component for DetailPopup {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Some(Action::CloseDialog)),
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(state) = &self.state else {
            return;
        };
        let popup = centered_rect(area, 85, 85);

        let (title, subtitle, lines) = match state {
            DetailState::Found(view) => (
                view.title.clone(),
                format!("#{}", view.id),
                detail_lines(view),
            ),
            DetailState::NotFound { id } => (
                "Request not found".to_owned(),
                format!("#{id}"),
                vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        format!("  No captured request with id {id}"),
                        theme::muted(),
                    )),
                ],
            ),
        };

        let inner = render_frame(frame, popup, &title, &subtitle);
        let [body_area, hint_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            body_area,
        );
        frame.render_widget(
            Paragraph::new(hint_line(&[("j/k", "scroll"), ("Esc", "close")])),
            hint_area,
        );
    }
}
