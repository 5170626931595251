// ── Traffic histogram builder ──
//
// Turns a bridge's request-count CSV into a chart description: raw x/y
// samples plus the binning and axis settings the chart should use. The
// core never draws; `HistogramSpec::bins` does the sum aggregation so any
// renderer can plot bars directly.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use hcdash_api::{CsvDocument, CsvRow};
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::CoreError;

/// Default bin width: one second.
pub const DEFAULT_BIN_SIZE_MS: i64 = 1000;

pub const TIME_COLUMN: &str = "time";
pub const REQUESTS_COLUMN: &str = "requests";

/// Epoch milliseconds.
pub type Timestamp = i64;

/// One CSV row: request count at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramSample {
    pub time: Timestamp,
    pub request_count: u64,
}

// ── Chart description ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistFunc {
    Sum,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Date,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeMode {
    Normal,
    NonNegative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub title: Option<String>,
    pub kind: AxisKind,
    pub autorange: bool,
    pub rangemode: RangeMode,
}

/// Renderer options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartOptions {
    pub display_mode_bar: bool,
    pub responsive: bool,
}

/// One aggregated bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramBin {
    pub start: Timestamp,
    pub total: u64,
}

/// Everything a renderer needs to draw the request histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramSpec {
    pub x: Vec<Timestamp>,
    pub y: Vec<u64>,
    pub bin_size_ms: i64,
    pub histfunc: HistFunc,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub options: ChartOptions,
}

impl HistogramSpec {
    /// Describe the chart for samples in row order. Non-positive bin sizes fall
    /// back to the default.
    pub fn new(samples: &[HistogramSample], bin_size_ms: i64) -> Self {
        let bin_size_ms = if bin_size_ms > 0 {
            bin_size_ms
        } else {
            DEFAULT_BIN_SIZE_MS
        };
        Self {
            x: samples.iter().map(|s| s.time).collect(),
            y: samples.iter().map(|s| s.request_count).collect(),
            bin_size_ms,
            histfunc: HistFunc::Sum,
            x_axis: Axis {
                title: None,
                kind: AxisKind::Date,
                autorange: true,
                rangemode: RangeMode::NonNegative,
            },
            y_axis: Axis {
                title: Some(REQUESTS_COLUMN.into()),
                kind: AxisKind::Linear,
                autorange: true,
                rangemode: RangeMode::NonNegative,
            },
            options: ChartOptions {
                display_mode_bar: false,
                responsive: true,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Sum of all request counts, saturating at `u64::MAX`.
    pub fn total_requests(&self) -> u64 {
        self.y.iter().fold(0, |acc, &n| acc.saturating_add(n))
    }

    /// Sum `y` per bin, ordered by bin start. Bin start is
    /// `floor(t / bin_size) * bin_size`. Totals saturate; samples whose bin
    /// start falls outside the `i64` range are skipped.
    pub fn bins(&self) -> Vec<HistogramBin> {
        let mut bins: BTreeMap<Timestamp, u64> = BTreeMap::new();
        for (&time, &count) in self.x.iter().zip(&self.y) {
            let Some(start) = time.div_euclid(self.bin_size_ms).checked_mul(self.bin_size_ms) else {
                warn!(time, bin_size_ms = self.bin_size_ms, "sample outside the binnable range");
                continue;
            };
            let total = bins.entry(start).or_default();
            *total = total.saturating_add(count);
        }
        bins.into_iter()
            .map(|(start, total)| HistogramBin { start, total })
            .collect()
    }
}

// ── Chart state ──────────────────────────────────────────────────────

/// Lifecycle of one bridge chart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistogramState {
    #[default]
    Loading,
    Ready(HistogramSpec),
    /// The CSV had no usable rows.
    Empty,
    /// Fetch or decode failed.
    Failed(String),
}

impl HistogramState {
    fn from_error(err: &CoreError) -> Self {
        match err {
            CoreError::EmptyDataset { .. } => Self::Empty,
            other => Self::Failed(other.to_string()),
        }
    }
}

// ── Shaping ──────────────────────────────────────────────────────────

/// Pick `(time, requests)` samples out of the CSV in row order, skipping
/// rows that cannot be parsed.
pub fn shape(doc: &CsvDocument) -> Result<Vec<HistogramSample>, CoreError> {
    if doc.columns.is_empty() {
        return Ok(Vec::new());
    }
    for column in [TIME_COLUMN, REQUESTS_COLUMN] {
        if !doc.has_column(column) {
            return Err(CoreError::MalformedCsv {
                message: format!("missing `{column}` column"),
            });
        }
    }

    let samples: Vec<_> = doc
        .rows
        .iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let sample = sample_from_row(row);
            if sample.is_none() {
                warn!(row = idx + 1, ?row, "skipping unparsable request csv row");
            }
            sample
        })
        .collect();
    Ok(samples)
}

fn sample_from_row(row: &CsvRow) -> Option<HistogramSample> {
    let time = parse_timestamp(row.get(TIME_COLUMN)?)?;
    let request_count = parse_count(row.get(REQUESTS_COLUMN)?)?;
    Some(HistogramSample {
        time,
        request_count,
    })
}

/// Build the chart spec for one bridge's CSV.
pub fn build(bridge_id: &str, doc: &CsvDocument, bin_size_ms: i64) -> Result<HistogramSpec, CoreError> {
    let samples = shape(doc)?;
    if samples.is_empty() {
        return Err(CoreError::EmptyDataset {
            bridge_id: bridge_id.to_owned(),
        });
    }
    Ok(HistogramSpec::new(&samples, bin_size_ms))
}

/// Fetch, shape and build one bridge chart. Always ends in a terminal state.
pub async fn load<B: Backend>(backend: &B, bridge_id: &str, bin_size_ms: i64) -> HistogramState {
    let result = backend
        .request_csv(bridge_id)
        .await
        .and_then(|doc| build(bridge_id, &doc, bin_size_ms));
    match result {
        Ok(spec) => {
            debug!(bridge_id, samples = spec.len(), "request histogram ready");
            HistogramState::Ready(spec)
        }
        Err(e) => {
            warn!(bridge_id, error = %e, "request histogram unavailable");
            HistogramState::from_error(&e)
        }
    }
}

// ── Value parsing ────────────────────────────────────────────────────

/// Parse a `time` cell: epoch milliseconds, RFC 3339, or a naive
/// `YYYY-MM-DD[ HH:MM:SS[.fff]]` taken as UTC. Epoch values outside the
/// calendar range are rejected.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ms) = raw.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms).map(|_| ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Parse a `requests` cell. Whole-valued decimals (`"3.0"`) are accepted.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions,
    clippy::float_cmp
)]
fn parse_count(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::backend::testing::CannedBackend;

    fn doc(csv: &str) -> CsvDocument {
        hcdash_api::csv::parse(csv).unwrap()
    }

    #[test]
    fn sums_requests_per_bin() {
        let spec = build("b", &doc("time,requests\n0,3\n500,2\n1500,4\n"), 1000).unwrap();

        assert_eq!(spec.x, vec![0, 500, 1500]);
        assert_eq!(spec.y, vec![3, 2, 4]);
        assert_eq!(
            spec.bins(),
            vec![
                HistogramBin { start: 0, total: 5 },
                HistogramBin {
                    start: 1000,
                    total: 4
                },
            ]
        );
        assert_eq!(spec.total_requests(), 9);
    }

    #[test]
    fn samples_keep_row_order() {
        let samples = shape(&doc("time,requests\n2000,1\n0,2\n")).unwrap();
        assert_eq!(samples[0].time, 2000);
        assert_eq!(samples[1].time, 0);
    }

    #[test]
    fn spec_carries_chart_settings() {
        let spec = HistogramSpec::new(&[], 1000);
        assert_eq!(spec.histfunc, HistFunc::Sum);
        assert_eq!(spec.x_axis.kind, AxisKind::Date);
        assert!(spec.x_axis.autorange);
        assert_eq!(spec.x_axis.rangemode, RangeMode::NonNegative);
        assert_eq!(spec.y_axis.title.as_deref(), Some("requests"));
        assert_eq!(spec.y_axis.rangemode, RangeMode::NonNegative);
        assert!(!spec.options.display_mode_bar);
        assert!(spec.options.responsive);
    }

    #[test]
    fn invalid_bin_size_falls_back_to_default() {
        assert_eq!(HistogramSpec::new(&[], 0).bin_size_ms, DEFAULT_BIN_SIZE_MS);
    }

    #[test]
    fn unparsable_rows_are_skipped() {
        let samples = shape(&doc("time,requests\n0,3\nsoon,2\n1000,many\n2000\n3000,1\n")).unwrap();
        assert_eq!(
            samples,
            vec![
                HistogramSample {
                    time: 0,
                    request_count: 3
                },
                HistogramSample {
                    time: 3000,
                    request_count: 1
                },
            ]
        );
    }

    #[test]
    fn missing_columns_are_malformed() {
        let err = shape(&doc("timestamp,count\n0,1\n")).unwrap_err();
        assert!(matches!(err, CoreError::MalformedCsv { .. }));
    }

    #[test]
    fn no_rows_is_empty_dataset() {
        let err = build("b", &doc("time,requests\n"), 1000).unwrap_err();
        assert!(matches!(err, CoreError::EmptyDataset { .. }));
        let err = build("b", &doc(""), 1000).unwrap_err();
        assert!(matches!(err, CoreError::EmptyDataset { .. }));
    }

    #[test]
    fn timestamps_accept_common_formats() {
        assert_eq!(parse_timestamp("1500"), Some(1500));
        assert_eq!(parse_timestamp("1970-01-01T00:00:01Z"), Some(1000));
        assert_eq!(parse_timestamp("1970-01-01T01:00:01+01:00"), Some(1000));
        assert_eq!(parse_timestamp("1970-01-01 00:00:01.250"), Some(1250));
        assert_eq!(parse_timestamp("1970-01-02"), Some(86_400_000));
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn huge_counts_saturate_instead_of_overflowing() {
        let spec = build("b", &doc("time,requests\n0,18446744073709551615\n1,1\n2000,1\n"), 1000).unwrap();

        assert_eq!(
            spec.bins(),
            vec![
                HistogramBin {
                    start: 0,
                    total: u64::MAX
                },
                HistogramBin {
                    start: 2000,
                    total: 1
                },
            ]
        );
        assert_eq!(spec.total_requests(), u64::MAX);
    }

    #[test]
    fn extreme_times_never_overflow_binning() {
        assert_eq!(parse_timestamp("9223372036854775807"), None);
        assert_eq!(parse_timestamp("-9223372036854775808"), None);

        let mut spec = HistogramSpec::new(&[], 1000);
        spec.x = vec![i64::MIN, 0];
        spec.y = vec![1, 2];
        assert_eq!(spec.bins(), vec![HistogramBin { start: 0, total: 2 }]);
    }

    #[test]
    fn counts_accept_whole_decimals_only() {
        assert_eq!(parse_count("3"), Some(3));
        assert_eq!(parse_count(" 3.0 "), Some(3));
        assert_eq!(parse_count("2.5"), None);
        assert_eq!(parse_count("-1"), None);
    }

    #[tokio::test]
    async fn load_reaches_a_terminal_state() {
        let backend = CannedBackend {
            csv: HashMap::from([
                ("ok".to_owned(), Ok("time,requests\n0,3\n500,2\n".to_owned())),
                ("empty".to_owned(), Ok("time,requests\n".to_owned())),
                ("bad".to_owned(), Ok("when,n\n0,1\n".to_owned())),
                ("down".to_owned(), Err(503)),
            ]),
            ..CannedBackend::default()
        };

        match load(&backend, "ok", 1000).await {
            HistogramState::Ready(spec) => assert_eq!(spec.bins().len(), 1),
            other => panic!("expected Ready, got: {other:?}"),
        }
        assert_eq!(load(&backend, "empty", 1000).await, HistogramState::Empty);
        assert!(matches!(load(&backend, "bad", 1000).await, HistogramState::Failed(_)));
        assert!(matches!(load(&backend, "down", 1000).await, HistogramState::Failed(_)));
    }
}
