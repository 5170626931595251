//! API action overlay: fires one read-only action on open and shows the
//! JSON it returns.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    widgets::Paragraph,
};
use throbber_widgets_tui::ThrobberState;

use hcdash_core::{ApiActionDialog, DialogContext, ResponseView};

use super::{centered_rect, hint_line, render_frame, render_response};
use crate::action::{Action, DialogId};
use crate::component::Component;

#[derive(Default)]
pub struct ApiActionPopup {
    dialog: ApiActionDialog,
    scroll: u16,
    throbber_state: ThrobberState,
}

impl ApiActionPopup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    /// Open and return the submit action for the one call to make, if any.
    pub fn open(&mut self, context: DialogContext) -> Option<Action> {
        self.scroll = 0;
        self.dialog
            .open(context)
            .map(|submission| Action::Submit(DialogId::ApiAction, submission))
    }

    pub fn close(&mut self) {
        self.dialog.close();
    }
}

impl Component for ApiActionPopup {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Ok(Some(Action::CloseDialog)),
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
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
                dialog: DialogId::ApiAction,
                ticket,
                result,
            } => {
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
        let popup = centered_rect(area, 80, 80);
        let inner = render_frame(frame, popup, self.dialog.title(), self.dialog.subtitle());
        let [response_area, keys_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        render_response(
            frame,
            response_area,
            self.dialog.response(),
            self.scroll,
            &self.throbber_state,
        );
        frame.render_widget(
            Paragraph::new(hint_line(&[("j/k", "scroll"), ("Esc", "close")])),
            keys_area,
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hcdash_core::BackendRequest;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn open_emits_one_submit_and_completion_renders() {
        let mut popup = ApiActionPopup::new();
        let action = popup.open(
            DialogContext::for_thing("homeconnect:oven:bridge:X").with_action("get-power-state"),
        );

        let Some(Action::Submit(DialogId::ApiAction, submission)) = action else {
            panic!("expected a submit action");
        };
        assert_eq!(
            submission.request,
            BackendRequest::ApplianceAction {
                thing_id: "homeconnect:oven:bridge:X".into(),
                action: "get-power-state".into(),
            }
        );

        popup
            .update(&Action::CallCompleted {
                dialog: DialogId::ApiAction,
                ticket: submission.ticket,
                result: Ok(json!({ "value": "On" })),
            })
            .unwrap();
        assert_eq!(popup.dialog.response().text(), "{\n\t\"value\": \"On\"\n}");
    }

    #[test]
    fn open_without_action_submits_nothing() {
        let mut popup = ApiActionPopup::new();
        assert!(popup.open(DialogContext::for_thing("t")).is_none());
        assert!(popup.is_open());
    }
}
