//! Request inspection and traffic visualization core for the Home Connect
//! bridge dashboard.
//!
//! This crate owns the domain model and the UI-agnostic state machines the
//! `hcdash` TUI drives:
//!
//! - **[`TrafficLog`]**: Read-only, session-scoped store of captured vendor
//!   API exchanges, queried through the [`TrafficRepository`] trait with loose
//!   id comparison.
//!
//! - **Detail lookup** ([`detail`]): Shapes one record into a [`DetailView`]
//!   (title, bodies with muted placeholders, ordered header pairs) or an inert
//!   `NotFound` state.
//!
//! - **Dialogs** ([`dialog`]): [`RawCallDialog`] (GET and PUT variants) and
//!   [`ApiActionDialog`]. Controllers emit [`Submission`]s and accept
//!   completions only for their current ticket.
//!
//! - **Histograms** ([`histogram`]): Fetch a bridge's request-count CSV,
//!   shape it into samples and describe the binned chart as a
//!   [`HistogramSpec`].
//!
//! - **[`Backend`]**: The async seam to the bridge, implemented for
//!   `hcdash_api::BridgeClient`.

pub mod backend;
pub mod config;
pub mod detail;
pub mod dialog;
pub mod error;
pub mod histogram;
pub mod model;
pub mod payload;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use backend::{Backend, BackendRequest, execute};
pub use config::{DashboardConfig, TlsVerification};
pub use detail::{BodyText, DetailState, DetailView, HeaderPair};
pub use dialog::{ApiActionDialog, RawCallDialog, RawCallKind, ResponseView, Submission, Ticket};
pub use error::CoreError;
pub use histogram::{HistogramBin, HistogramSample, HistogramSpec, HistogramState};
pub use model::{DialogContext, RecordId, TrafficRecord};
pub use payload::{CallFailure, Payload, RenderedPayload, format_payload};
pub use store::{TrafficLog, TrafficRepository};
