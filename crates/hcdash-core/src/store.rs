// ── Traffic log store ──
//
// Read-only, session-scoped collection of captured requests. Lookups go
// through the `TrafficRepository` trait so dialogs never reach into a
// global list.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::{IdKey, RecordId, TrafficRecord};

/// Read access to captured traffic records.
pub trait TrafficRepository: Send + Sync {
    /// Find a record by id using loose id comparison.
    fn find_by_id(&self, id: &RecordId) -> Option<&TrafficRecord>;

    /// All records in capture order.
    fn records(&self) -> &[TrafficRecord];
}

/// In-memory traffic log, loaded once and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct TrafficLog {
    records: Vec<TrafficRecord>,
    by_id: HashMap<IdKey, usize>,
}

impl TrafficLog {
    pub fn new(records: Vec<TrafficRecord>) -> Self {
        let mut by_id = HashMap::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            // First loose match in capture order wins.
            by_id.entry(record.id.lookup_key()).or_insert(idx);
        }
        Self { records, by_id }
    }

    /// Decode a JSON array of records as exported by the bridge.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let records: Vec<TrafficRecord> =
            serde_json::from_str(json).map_err(|e| CoreError::TrafficLog {
                message: e.to_string(),
            })?;
        debug!(count = records.len(), "decoded traffic log");
        Ok(Self::new(records))
    }

    /// Load a JSON export from disk.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let json = std::fs::read_to_string(path).map_err(|e| CoreError::TrafficLog {
            message: format!("{}: {e}", path.display()),
        })?;
        let log = Self::from_json(&json)?;
        info!(path = %path.display(), count = log.len(), "traffic log loaded");
        Ok(log)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TrafficRepository for TrafficLog {
    fn find_by_id(&self, id: &RecordId) -> Option<&TrafficRecord> {
        let idx = *self.by_id.get(&id.lookup_key())?;
        self.records.get(idx)
    }

    fn records(&self) -> &[TrafficRecord] {
        &self.records
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    const EXPORT: &str = r#"[
        { "id": 1, "homeConnectRequest": { "method": "GET", "url": "/a", "header": {} } },
        { "id": 2, "homeConnectRequest": { "method": "PUT", "url": "/b", "header": {} } },
        { "id": 2, "homeConnectRequest": { "method": "DELETE", "url": "/dup", "header": {} } }
    ]"#;

    #[test]
    fn finds_numeric_id_from_text() {
        let log = TrafficLog::from_json(EXPORT).unwrap();
        let record = log.find_by_id(&RecordId::from("1")).unwrap();
        assert_eq!(record.url(), "/a");
    }

    #[test]
    fn falls_back_to_numeric_comparison() {
        let log = TrafficLog::from_json(EXPORT).unwrap();
        let record = log.find_by_id(&RecordId::from("02")).unwrap();
        assert_eq!(record.url(), "/b");
    }

    #[test]
    fn first_duplicate_wins() {
        let log = TrafficLog::from_json(EXPORT).unwrap();
        assert_eq!(log.len(), 3);
        assert_eq!(log.find_by_id(&RecordId::from(2)).unwrap().method(), "PUT");
    }

    #[test]
    fn earliest_loose_match_beats_a_later_exact_one() {
        let log = TrafficLog::from_json(
            r#"[
                { "id": 7, "homeConnectRequest": { "method": "GET", "url": "/seven", "header": {} } },
                { "id": "07", "homeConnectRequest": { "method": "GET", "url": "/oh-seven", "header": {} } }
            ]"#,
        )
        .unwrap();

        assert_eq!(log.find_by_id(&RecordId::from("07")).unwrap().url(), "/seven");
        assert_eq!(log.find_by_id(&RecordId::from(7)).unwrap().url(), "/seven");
    }

    #[test]
    fn lookup_agrees_with_loose_matching() {
        let log = TrafficLog::from_json(
            r#"[
                { "id": "abc", "homeConnectRequest": { "method": "GET", "url": "/abc", "header": {} } },
                { "id": 0, "homeConnectRequest": { "method": "GET", "url": "/zero", "header": {} } },
                { "id": "", "homeConnectRequest": { "method": "GET", "url": "/blank", "header": {} } }
            ]"#,
        )
        .unwrap();

        for query in ["abc", "0", "-0", " 0 ", "0.0", "", "ABC", "1"] {
            let query = RecordId::from(query);
            let scanned = log.records().iter().find(|r| r.id.loosely_matches(&query));
            assert_eq!(
                log.find_by_id(&query).map(TrafficRecord::url),
                scanned.map(TrafficRecord::url),
                "query {query:?}"
            );
        }
        assert_eq!(log.find_by_id(&RecordId::from("")).unwrap().url(), "/blank");
    }

    #[test]
    fn unknown_id_is_none() {
        let log = TrafficLog::from_json(EXPORT).unwrap();
        assert!(log.find_by_id(&RecordId::from("99")).is_none());
    }

    #[test]
    fn invalid_json_is_traffic_log_error() {
        let err = TrafficLog::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CoreError::TrafficLog { .. }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXPORT.as_bytes()).unwrap();

        let log = TrafficLog::load(file.path()).unwrap();

        assert_eq!(log.records().len(), 3);
    }
}
