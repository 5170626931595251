// ── Raw call dialogs ──
//
// Two variants share one controller: GET (path only) and PUT (path plus a
// JSON body). Both proxy through the bridge's `appliances` endpoint.

use strum::{Display, IntoStaticStr};
use tracing::{debug, info, warn};

use super::{ResponseView, Submission, Ticket, TicketBook, render};
use crate::backend::BackendRequest;
use crate::model::DialogContext;
use crate::payload::{CallFailure, Payload};

/// Which raw call dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum RawCallKind {
    #[strum(serialize = "get-raw")]
    Get,
    #[strum(serialize = "put-raw")]
    Put,
}

impl RawCallKind {
    /// Path pre-filled on open.
    pub fn default_path(self, ha_id: &str) -> String {
        match self {
            Self::Get => format!("/api/homeappliances/{ha_id}/programs"),
            Self::Put => format!("/api/homeappliances/{ha_id}/programs/active"),
        }
    }

    /// Backend action name.
    pub fn action(self) -> &'static str {
        self.into()
    }

    /// Whether the dialog shows a body input.
    pub fn has_body(self) -> bool {
        matches!(self, Self::Put)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Get => "Raw GET",
            Self::Put => "Raw PUT",
        }
    }
}

/// Controller for one raw call dialog.
#[derive(Debug)]
pub struct RawCallDialog {
    kind: RawCallKind,
    context: Option<DialogContext>,
    path: String,
    body: String,
    response: ResponseView,
    show_response_header: bool,
    tickets: TicketBook,
}

impl RawCallDialog {
    pub fn new(kind: RawCallKind) -> Self {
        Self {
            kind,
            context: None,
            path: String::new(),
            body: String::new(),
            response: ResponseView::Idle,
            show_response_header: false,
            tickets: TicketBook::default(),
        }
    }

    pub fn kind(&self) -> RawCallKind {
        self.kind
    }

    pub fn is_open(&self) -> bool {
        self.context.is_some()
    }

    /// Subtitle: the thing id that opened the dialog.
    pub fn subtitle(&self) -> &str {
        self.context.as_ref().map_or("", |c| c.thing_id.as_str())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// In-place editing access for the path input.
    pub fn path_mut(&mut self) -> &mut String {
        &mut self.path
    }

    pub fn body_mut(&mut self) -> &mut String {
        &mut self.body
    }

    pub fn response(&self) -> &ResponseView {
        &self.response
    }

    /// Whether the response section (header and area) is revealed.
    pub fn shows_response_header(&self) -> bool {
        self.show_response_header
    }

    pub fn is_in_flight(&self) -> bool {
        self.tickets.is_in_flight()
    }

    /// Open for an appliance: clear the old response and pre-fill the path.
    /// The body input keeps whatever was typed last.
    pub fn open(&mut self, context: DialogContext) {
        let ha_id = context.ha_id.as_deref().unwrap_or_default();
        if ha_id.is_empty() {
            warn!(thing_id = %context.thing_id, "raw call opened without an appliance id");
        }
        self.path = self.kind.default_path(ha_id);
        self.response = ResponseView::Idle;
        self.show_response_header = false;
        self.tickets.abandon();
        debug!(kind = %self.kind, thing_id = %context.thing_id, "raw call dialog opened");
        self.context = Some(context);
    }

    pub fn close(&mut self) {
        self.context = None;
        self.tickets.abandon();
    }

    /// Submit the current inputs. Refused while closed or while a call is
    /// already in flight.
    pub fn submit(&mut self) -> Option<Submission> {
        let context = self.context.as_ref()?;
        if self.tickets.is_in_flight() {
            debug!(kind = %self.kind, "submit ignored, call in flight");
            return None;
        }

        let thing_id = context.thing_id.clone();
        let path = self.path.clone();
        let request = match self.kind {
            RawCallKind::Get => BackendRequest::RawGet { thing_id, path },
            RawCallKind::Put => BackendRequest::RawPut {
                thing_id,
                path,
                body: self.body.clone(),
            },
        };

        info!(kind = %self.kind, path = %self.path, "submitting raw call");
        self.response = ResponseView::Loading;
        Some(Submission {
            ticket: self.tickets.issue(),
            request,
        })
    }

    /// Apply a completion. Returns `false` when the ticket is stale and the
    /// result was dropped.
    pub fn complete(&mut self, ticket: Ticket, result: &Result<Payload, CallFailure>) -> bool {
        if !self.tickets.settle(ticket) {
            debug!(kind = %self.kind, ?ticket, "dropping stale raw call completion");
            return false;
        }
        self.response = render(result);
        self.show_response_header = true;
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dialog::LOADING_TEXT;

    fn oven() -> DialogContext {
        DialogContext::for_thing("homeconnect:oven:bridge:X").with_ha_id("X")
    }

    #[test]
    fn default_paths_use_the_appliance_id() {
        let mut put = RawCallDialog::new(RawCallKind::Put);
        put.open(oven());
        assert_eq!(put.path(), "/api/homeappliances/X/programs/active");

        let mut get = RawCallDialog::new(RawCallKind::Get);
        get.open(oven());
        assert_eq!(get.path(), "/api/homeappliances/X/programs");
        assert_eq!(get.subtitle(), "homeconnect:oven:bridge:X");
    }

    #[test]
    fn missing_appliance_id_leaves_segment_empty() {
        let mut get = RawCallDialog::new(RawCallKind::Get);
        get.open(DialogContext::for_thing("t"));
        assert_eq!(get.path(), "/api/homeappliances//programs");
        assert!(get.is_open());
    }

    #[test]
    fn put_submission_carries_edited_path_and_body() {
        let mut put = RawCallDialog::new(RawCallKind::Put);
        put.open(oven());
        put.set_path("/api/homeappliances/X/settings/BSH.Common.Setting.PowerState");
        put.set_body(r#"{"data":{"value":"BSH.Common.EnumType.PowerState.On"}}"#);

        let submission = put.submit().unwrap();

        assert_eq!(
            submission.request,
            BackendRequest::RawPut {
                thing_id: "homeconnect:oven:bridge:X".into(),
                path: "/api/homeappliances/X/settings/BSH.Common.Setting.PowerState".into(),
                body: r#"{"data":{"value":"BSH.Common.EnumType.PowerState.On"}}"#.into(),
            }
        );
        assert_eq!(put.response().text(), LOADING_TEXT);
        assert!(!put.shows_response_header());
    }

    #[test]
    fn get_submission_has_no_body() {
        let mut get = RawCallDialog::new(RawCallKind::Get);
        get.open(oven());
        get.set_body("ignored");

        let submission = get.submit().unwrap();

        assert_eq!(submission.request.action(), "get-raw");
        assert!(matches!(submission.request, BackendRequest::RawGet { .. }));
    }

    #[test]
    fn completion_renders_and_reveals_header() {
        let mut get = RawCallDialog::new(RawCallKind::Get);
        get.open(oven());
        let submission = get.submit().unwrap();

        assert!(get.complete(submission.ticket, &Ok(json!({ "data": {} }))));

        assert!(get.shows_response_header());
        assert_eq!(get.response().text(), "{\n\t\"data\": {}\n}");
        assert!(!get.is_in_flight());
    }

    #[test]
    fn double_submit_issues_one_call_and_shows_its_response() {
        let mut put = RawCallDialog::new(RawCallKind::Put);
        put.open(oven());

        let first = put.submit().unwrap();
        assert!(put.submit().is_none());

        assert!(put.complete(first.ticket, &Ok(json!({ "n": 1 }))));
        let second = put.submit().unwrap();
        assert!(put.complete(second.ticket, &Ok(json!({ "n": 2 }))));

        assert_eq!(put.response().text(), "{\n\t\"n\": 2\n}");
    }

    #[test]
    fn reopen_drops_late_completion() {
        let mut get = RawCallDialog::new(RawCallKind::Get);
        get.open(oven());
        let stale = get.submit().unwrap();

        get.close();
        get.open(oven());

        assert!(!get.complete(stale.ticket, &Ok(json!("late"))));
        assert_eq!(get.response(), &ResponseView::Idle);
        assert!(!get.shows_response_header());
        assert!(get.submit().is_some());
    }

    #[test]
    fn failure_shows_banner_and_payload() {
        let mut get = RawCallDialog::new(RawCallKind::Get);
        get.open(oven());
        let submission = get.submit().unwrap();

        let failure = CallFailure {
            status: Some(404),
            message: "backend returned HTTP 404".into(),
            payload: json!({ "error": { "key": "SDK.Error.HomeAppliance.Connection.Initialization.Failed" } }),
        };
        get.complete(submission.ticket, &Err(failure));

        assert_eq!(get.response().banner(), Some("Request failed (HTTP 404)"));
        assert!(get.response().text().contains("Initialization.Failed"));
        assert!(get.shows_response_header());
    }

    #[test]
    fn submit_requires_open_dialog() {
        let mut get = RawCallDialog::new(RawCallKind::Get);
        assert!(get.submit().is_none());
    }
}
