// ── Dialog controllers ──
//
// UI-agnostic state machines behind the raw call and API action dialogs.
// A controller hands out a `Submission` for every backend call it wants
// made; the matching completion is applied only while its ticket is still
// current, so a reopened dialog never shows a late answer from before.

pub mod api_action;
pub mod raw_call;

use crate::backend::BackendRequest;
use crate::payload::{CallFailure, Payload, RenderedPayload, format_payload};

pub use api_action::ApiActionDialog;
pub use raw_call::{RawCallDialog, RawCallKind};

/// Placeholder shown while a call is in flight.
pub const LOADING_TEXT: &str = "Loading...";

/// Identifies one issued backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A backend call a dialog wants made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: Ticket,
    pub request: BackendRequest,
}

/// Contents of a dialog's response area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseView {
    /// Nothing submitted since the dialog opened.
    #[default]
    Idle,
    Loading,
    Rendered(RenderedPayload),
}

impl ResponseView {
    /// Text for the response area.
    pub fn text(&self) -> &str {
        match self {
            Self::Idle => "",
            Self::Loading => LOADING_TEXT,
            Self::Rendered(rendered) => &rendered.text,
        }
    }

    pub fn banner(&self) -> Option<&str> {
        match self {
            Self::Rendered(rendered) => rendered.banner.as_deref(),
            _ => None,
        }
    }
}

/// Issues tickets and tracks which one is current.
#[derive(Debug, Default)]
pub(crate) struct TicketBook {
    next: u64,
    in_flight: Option<Ticket>,
}

impl TicketBook {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.next += 1;
        let ticket = Ticket(self.next);
        self.in_flight = Some(ticket);
        ticket
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Forget the in-flight call; its completion will be dropped.
    pub(crate) fn abandon(&mut self) {
        self.in_flight = None;
    }

    /// Accept a completion only for the current ticket.
    pub(crate) fn settle(&mut self, ticket: Ticket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }
}

pub(crate) fn render(result: &Result<Payload, CallFailure>) -> ResponseView {
    ResponseView::Rendered(format_payload(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_current_ticket_settles() {
        let mut book = TicketBook::default();
        let first = book.issue();
        book.abandon();
        let second = book.issue();

        assert!(!book.settle(first));
        assert!(book.is_in_flight());
        assert!(book.settle(second));
        assert!(!book.is_in_flight());
        assert!(!book.settle(second));
    }
}
