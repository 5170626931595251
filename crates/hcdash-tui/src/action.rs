//! All UI actions. Actions are the only way state changes.

use hcdash_core::{
    CallFailure, DialogContext, HistogramState, Payload, RawCallKind, RecordId, Submission, Ticket,
};

use crate::screen::ScreenId;

/// Which overlay dialog an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogId {
    ApiAction,
    RawGet,
    RawPut,
    RequestDetail,
}

impl From<RawCallKind> for DialogId {
    fn from(kind: RawCallKind) -> Self {
        match kind {
            RawCallKind::Get => Self::RawGet,
            RawCallKind::Put => Self::RawPut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    ToggleHelp,

    // ── Dialogs ───────────────────────────────────────────────────
    OpenApiAction(DialogContext),
    OpenRawCall(RawCallKind, DialogContext),
    OpenRequestDetail(RecordId),
    CloseDialog,

    // ── Backend calls ─────────────────────────────────────────────
    /// A dialog handed out a call to make.
    Submit(DialogId, Submission),
    /// A spawned call finished.
    CallCompleted {
        dialog: DialogId,
        ticket: Ticket,
        result: Result<Payload, CallFailure>,
    },

    // ── Histograms ────────────────────────────────────────────────
    ReloadHistograms,
    HistogramLoaded {
        bridge_id: String,
        state: HistogramState,
    },

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
}
