// ── Detail lookup ──
//
// Resolves a record id against the traffic log and shapes the record into
// what the detail dialog shows: a title, both bodies (with placeholders for
// empty ones) and the header label/value pairs.

use tracing::debug;

use crate::error::CoreError;
use crate::model::{RecordId, TrafficRecord};
use crate::store::TrafficRepository;

pub const EMPTY_REQUEST_BODY: &str = "Empty request body";
pub const EMPTY_RESPONSE_BODY: &str = "Empty response body";

/// A body as displayed: verbatim text, or a muted placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyText {
    Present(String),
    Empty(&'static str),
}

impl BodyText {
    fn from_raw(raw: Option<&str>, placeholder: &'static str) -> Self {
        match raw {
            Some(text) if !text.is_empty() => Self::Present(text.to_owned()),
            _ => Self::Empty(placeholder),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Present(text) => text,
            Self::Empty(placeholder) => placeholder,
        }
    }

    /// Placeholders render in the muted style.
    pub fn is_muted(&self) -> bool {
        matches!(self, Self::Empty(_))
    }
}

/// One header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPair {
    pub key: String,
    pub value: String,
}

/// Display model for one captured request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: RecordId,
    /// `"{method} {url}"`.
    pub title: String,
    pub status: Option<u16>,
    pub time: Option<String>,
    pub request_body: BodyText,
    pub response_body: BodyText,
    pub request_headers: Vec<HeaderPair>,
    pub response_headers: Vec<HeaderPair>,
}

impl DetailView {
    pub fn from_record(record: &TrafficRecord) -> Self {
        let request = &record.home_connect_request;
        let response = record.home_connect_response.as_ref();

        Self {
            id: record.id.clone(),
            title: format!("{} {}", request.method, request.url),
            status: record.status(),
            time: record.time.clone(),
            request_body: BodyText::from_raw(request.body.as_deref(), EMPTY_REQUEST_BODY),
            response_body: BodyText::from_raw(
                response.and_then(|r| r.body.as_deref()),
                EMPTY_RESPONSE_BODY,
            ),
            request_headers: header_pairs(request.header.iter()),
            response_headers: response
                .and_then(|r| r.header.as_ref())
                .map(|h| header_pairs(h.iter()))
                .unwrap_or_default(),
        }
    }
}

fn header_pairs<'a>(headers: impl Iterator<Item = (&'a String, &'a String)>) -> Vec<HeaderPair> {
    headers
        .map(|(key, value)| HeaderPair {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}

/// What the detail dialog holds after an open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Found(DetailView),
    NotFound { id: RecordId },
}

impl DetailState {
    /// Resolve `id` for display. A miss is an inert state, not an error.
    pub fn open<R: TrafficRepository + ?Sized>(repo: &R, id: &RecordId) -> Self {
        match lookup(repo, id) {
            Ok(view) => Self::Found(view),
            Err(_) => Self::NotFound { id: id.clone() },
        }
    }
}

/// Resolve `id` into a display model.
pub fn lookup<R: TrafficRepository + ?Sized>(repo: &R, id: &RecordId) -> Result<DetailView, CoreError> {
    let Some(record) = repo.find_by_id(id) else {
        debug!(%id, "request record not found");
        return Err(CoreError::RecordNotFound { id: id.to_string() });
    };
    Ok(DetailView::from_record(record))
}
