// ── Domain model ──

pub mod context;
pub mod record;

pub use context::DialogContext;
pub(crate) use record::IdKey;
pub use record::{RecordId, RequestCapture, ResponseCapture, TrafficRecord};
