//! Raw GET / PUT overlay: editable path (and body for PUT), submit, and
//! the pretty-printed response.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use throbber_widgets_tui::ThrobberState;

use hcdash_core::{DialogContext, RawCallDialog, RawCallKind, ResponseView};

use super::{centered_rect, hint_line, render_frame, render_response};
use crate::action::{Action, DialogId};
use crate::component::Component;
use crate::theme;

/// Which input has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Path,
    Body,
}

pub struct RawCallPopup {
    dialog: RawCallDialog,
    field: Field,
    scroll: u16,
    /// Shown under the inputs after a refused submit.
    hint: Option<&'static str>,
    throbber_state: ThrobberState,
}

impl RawCallPopup {
    pub fn new(kind: RawCallKind) -> Self {
        Self {
            dialog: RawCallDialog::new(kind),
            field: Field::Path,
            scroll: 0,
            hint: None,
            throbber_state: ThrobberState::default(),
        }
    }

    pub fn dialog_id(&self) -> DialogId {
        self.dialog.kind().into()
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    pub fn open(&mut self, context: DialogContext) {
        self.dialog.open(context);
        self.field = Field::Path;
        self.scroll = 0;
        self.hint = None;
    }

    pub fn close(&mut self) {
        self.dialog.close();
    }

    fn submit(&mut self) -> Option<Action> {
        if let Some(submission) = self.dialog.submit() {
            self.hint = None;
            self.scroll = 0;
            Some(Action::Submit(self.dialog_id(), submission))
        } else {
            self.hint = Some("A request is already running");
            None
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            Field::Path => self.dialog.path_mut(),
            Field::Body => self.dialog.body_mut(),
        }
    }

    fn input_line<'a>(&self, label: &'a str, value: &'a str, field: Field) -> Line<'a> {
        let focused = self.field == field;
        let label_style = if focused {
            Style::default().fg(theme::ELECTRIC_PURPLE)
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        let mut spans = vec![
            Span::styled(format!("  {label:<6}"), label_style),
            Span::styled(value, Style::default().fg(theme::NEON_CYAN)),
        ];
        if focused {
            spans.push(Span::styled("█", Style::default().fg(theme::ELECTRIC_PURPLE)));
        }
        Line::from(spans)
    }
}

impl Component for RawCallPopup {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let has_body = self.dialog.kind().has_body();
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => return Ok(Some(Action::CloseDialog)),
            (_, KeyCode::Enter) => return Ok(self.submit()),
            (_, KeyCode::Tab | KeyCode::BackTab) if has_body => {
                self.field = match self.field {
                    Field::Path => Field::Body,
                    Field::Body => Field::Path,
                };
            }
            (_, KeyCode::PageDown) => self.scroll = self.scroll.saturating_add(10),
            (_, KeyCode::PageUp) => self.scroll = self.scroll.saturating_sub(10),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.active_input().clear(),
            (_, KeyCode::Backspace) => {
                self.active_input().pop();
            }
            (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => {
                self.active_input().push(c);
            }
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if matches!(self.dialog.response(), ResponseView::Loading) => {
                self.throbber_state.calc_next();
            }
            Action::CallCompleted {
                dialog,
                ticket,
                result,
            } if *dialog == self.dialog_id() => {
                self.dialog.complete(*ticket, result);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        if !self.dialog.is_open() {
            return;
        }
        let kind = self.dialog.kind();
        let popup = centered_rect(area, 80, 80);
        let inner = render_frame(frame, popup, kind.title(), self.dialog.subtitle());

        let input_rows = if kind.has_body() { 2 } else { 1 };
        let [inputs_area, hint_area, header_area, response_area, keys_area] = Layout::vertical([
            Constraint::Length(input_rows + 1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        let mut inputs = vec![
            Line::from(""),
            self.input_line("Path", self.dialog.path(), Field::Path),
        ];
        if kind.has_body() {
            inputs.push(self.input_line("Body", self.dialog.body(), Field::Body));
        }
        frame.render_widget(Paragraph::new(inputs), inputs_area);

        if let Some(hint) = self.hint {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  {hint}"),
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                )),
                hint_area,
            );
        }

        if self.dialog.shows_response_header() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "── Response ",
                    Style::default().fg(theme::NEON_CYAN),
                )),
                header_area,
            );
        }
        render_response(
            frame,
            response_area,
            self.dialog.response(),
            self.scroll,
            &self.throbber_state,
        );

        let keys: &[(&'static str, &'static str)] = if kind.has_body() {
            &[("Enter", "send"), ("Tab", "path/body"), ("PgUp/PgDn", "scroll"), ("Esc", "close")]
        } else {
            &[("Enter", "send"), ("PgUp/PgDn", "scroll"), ("Esc", "close")]
        };
        frame.render_widget(Paragraph::new(hint_line(keys)), keys_area);
    }
}
