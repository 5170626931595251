// ── CSV decoding ──
//
// The bridge serves request statistics as a small header-first CSV. Rows
// are decoded into ordered column → value maps, mirroring how a browser
// CSV loader hands rows to a chart: short rows simply lack trailing keys,
// surplus fields are dropped.

use indexmap::IndexMap;

use crate::error::Error;

/// One decoded data row, keyed by header column name in column order.
pub type CsvRow = IndexMap<String, String>;

/// A decoded CSV document: header columns plus data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDocument {
    pub columns: Vec<String>,
    pub rows: Vec<CsvRow>,
}

impl CsvDocument {
    /// Whether the header declares the given column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Decode a header-first CSV document.
///
/// Supports quoted fields (with `""` escapes, embedded commas and line
/// breaks), CRLF line endings, a leading BOM, and blank lines.
pub fn parse(input: &str) -> Result<CsvDocument, Error> {
    let mut records = split_records(input)?.into_iter();

    let Some(header) = records.next() else {
        return Ok(CsvDocument::default());
    };
    let columns: Vec<String> = header.into_iter().map(|c| c.trim().to_owned()).collect();

    let rows = records
        .map(|fields| columns.iter().cloned().zip(fields).collect())
        .collect();

    Ok(CsvDocument { columns, rows })
}

fn split_records(input: &str) -> Result<Vec<Vec<String>>, Error> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut quote_line = 1;

    let mut chars = input.trim_start_matches('\u{feff}').chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => {
                in_quotes = true;
                quote_line = line;
            }
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                finish_record(&mut records, &mut record, &mut field);
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(Error::Csv {
            line: quote_line,
            message: "unterminated quoted field".into(),
        });
    }

    finish_record(&mut records, &mut record, &mut field);
    Ok(records)
}

/// Close the current record; a record consisting of one empty field is a
/// blank line and is discarded.
fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    record.push(std::mem::take(field));
    if matches!(record.as_slice(), [only] if only.is_empty()) {
        record.clear();
        return;
    }
    records.push(std::mem::take(record));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let doc = parse("time,requests\n0,3\n500,2\n1500,4\n").unwrap();
        assert_eq!(doc.columns, vec!["time", "requests"]);
        assert_eq!(doc.rows.len(), 3);
        assert_eq!(doc.rows[1]["time"], "500");
        assert_eq!(doc.rows[1]["requests"], "2");
        assert!(doc.has_column("requests"));
        assert!(!doc.has_column("duration"));
    }

    #[test]
    fn handles_crlf_bom_and_blank_lines() {
        let doc = parse("\u{feff}time,requests\r\n\r\n2024-01-01 10:00:00,1\r\n\r\n").unwrap();
        assert_eq!(doc.columns, vec!["time", "requests"]);
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0]["time"], "2024-01-01 10:00:00");
    }

    #[test]
    fn quoted_fields_keep_commas_quotes_and_newlines() {
        let doc = parse("name,note\n\"a,b\",\"say \"\"hi\"\"\nthere\"\n").unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0]["name"], "a,b");
        assert_eq!(doc.rows[0]["note"], "say \"hi\"\nthere");
    }

    #[test]
    fn short_rows_lack_trailing_columns() {
        let doc = parse("time,requests\n100\n").unwrap();
        assert_eq!(doc.rows[0].get("time").map(String::as_str), Some("100"));
        assert!(doc.rows[0].get("requests").is_none());
    }

    #[test]
    fn empty_input_is_empty_document() {
        let doc = parse("").unwrap();
        assert!(doc.columns.is_empty());
        assert!(doc.is_empty());
    }

    #[test]
    fn header_only_has_columns_but_no_rows() {
        let doc = parse("time,requests\n").unwrap();
        assert!(doc.has_column("time"));
        assert!(doc.is_empty());
    }

    #[test]
    fn unterminated_quote_reports_line() {
        let err = parse("time,requests\n\"oops,1\n").unwrap_err();
        match err {
            Error::Csv { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Csv error, got: {other:?}"),
        }
    }
}
