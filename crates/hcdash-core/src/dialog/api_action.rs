// ── API action dialog ──
//
// Opening the dialog fires one read-only backend action and shows its raw
// JSON. There is no resubmission; reopen to refresh.

use tracing::{debug, warn};

use super::{ResponseView, Submission, Ticket, TicketBook, render};
use crate::backend::BackendRequest;
use crate::model::DialogContext;
use crate::payload::{CallFailure, Payload, RenderedPayload};

#[derive(Debug, Default)]
pub struct ApiActionDialog {
    context: Option<DialogContext>,
    response: ResponseView,
    tickets: TicketBook,
}

impl ApiActionDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.context.is_some()
    }

    /// Title override, falling back to the action name.
    pub fn title(&self) -> &str {
        self.context
            .as_ref()
            .and_then(|c| c.title.as_deref().or(c.action.as_deref()))
            .unwrap_or_default()
    }

    pub fn subtitle(&self) -> &str {
        self.context.as_ref().map_or("", |c| c.thing_id.as_str())
    }

    pub fn response(&self) -> &ResponseView {
        &self.response
    }

    /// Open the dialog and describe the one call to make. Without an action
    /// there is nothing to run; the dialog shows why instead.
    pub fn open(&mut self, context: DialogContext) -> Option<Submission> {
        self.tickets.abandon();
        let action = context.action.clone();
        debug!(thing_id = %context.thing_id, ?action, "api action dialog opened");
        let thing_id = context.thing_id.clone();
        self.context = Some(context);

        let Some(action) = action else {
            warn!(%thing_id, "api action dialog opened without an action");
            self.response = ResponseView::Rendered(RenderedPayload {
                banner: Some("No action selected".into()),
                text: String::new(),
            });
            return None;
        };

        self.response = ResponseView::Loading;
        Some(Submission {
            ticket: self.tickets.issue(),
            request: BackendRequest::ApplianceAction { thing_id, action },
        })
    }

    pub fn close(&mut self) {
        self.context = None;
        self.tickets.abandon();
    }

    /// Apply a completion. Returns `false` for stale tickets.
    pub fn complete(&mut self, ticket: Ticket, result: &Result<Payload, CallFailure>) -> bool {
        if !self.tickets.settle(ticket) {
            debug!(?ticket, "dropping stale api action completion");
            return false;
        }
        self.response = render(result);
        true
    }
}
