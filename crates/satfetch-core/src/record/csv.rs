//! CSV record source.
//!
//! Reads a header row, locates the `lat` and `long` columns and turns every
//! non-blank data row into a `Record` whose id is its 0-based row index.
//! A quoted field may span several physical lines; the row then keeps the
//! line number it starts on. Any malformed row aborts loading: a run never
//! starts on partial input.

use super::{Record, SourceError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const LAT_COLUMN: &str = "lat";
pub const LON_COLUMN: &str = "long";

/// Loads all records from the CSV file at `path`.
pub fn read_records(path: &Path) -> Result<Vec<Record>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_records(BufReader::new(file)).map_err(|e| match e {
        SourceError::Io { source, .. } => SourceError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    tracing::debug!(count = records.len(), path = %path.display(), "loaded records");
    Ok(records)
}

/// Parses records from any buffered reader (header row first).
pub fn parse_records<R: BufRead>(reader: R) -> Result<Vec<Record>, SourceError> {
    let mut lines = reader.lines().enumerate();

    let header = loop {
        match lines.next() {
            None => return Err(SourceError::Empty),
            Some((_, line)) => {
                let line = line.map_err(io_err)?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
        }
    };
    let columns = split_fields(header.trim_start_matches('\u{feff}'));
    let find = |name: &str| columns.iter().position(|c| c.trim() == name);
    let (lat_idx, lon_idx) = match (find(LAT_COLUMN), find(LON_COLUMN)) {
        (Some(lat), Some(lon)) => (lat, lon),
        (lat, lon) => {
            let mut missing = Vec::new();
            if lat.is_none() {
                missing.push(LAT_COLUMN.to_string());
            }
            if lon.is_none() {
                missing.push(LON_COLUMN.to_string());
            }
            return Err(SourceError::MissingColumns { missing });
        }
    };

    let mut records = Vec::new();
    // Row still inside a quoted field: (starting line number, text so far).
    let mut pending: Option<(usize, String)> = None;
    for (index, line) in lines {
        let line = line.map_err(io_err)?;
        let line = line.strip_suffix('\r').unwrap_or(&line);
        let (line_no, row) = match pending.take() {
            Some((start, mut row)) => {
                row.push('\n');
                row.push_str(line);
                (start, row)
            }
            None if line.trim().is_empty() => continue,
            None => (index + 1, line.to_string()),
        };
        // Quotes only open fields or come in `""` pairs, so odd means still open.
        if row.matches('"').count() % 2 == 1 {
            pending = Some((line_no, row));
            continue;
        }

        let fields = split_fields(&row);
        let lat = parse_coord(&fields, lat_idx, LAT_COLUMN, line_no)?;
        let lon = parse_coord(&fields, lon_idx, LON_COLUMN, line_no)?;
        let id = records.len() as u64;
        let record = Record::new(id, lat, lon)
            .map_err(|source| SourceError::InvalidRecord { line: line_no, source })?;
        records.push(record);
    }
    if let Some((line, _)) = pending {
        return Err(SourceError::Row {
            line,
            message: "unterminated quoted field".to_string(),
        });
    }
    Ok(records)
}

fn io_err(source: std::io::Error) -> SourceError {
    SourceError::Io {
        path: Default::default(),
        source,
    }
}

fn parse_coord(fields: &[String], idx: usize, name: &str, line: usize) -> Result<f64, SourceError> {
    let raw = fields.get(idx).map(|s| s.trim()).unwrap_or("");
    if raw.is_empty() {
        return Err(SourceError::Row {
            line,
            message: format!("missing value for '{}'", name),
        });
    }
    raw.parse::<f64>().map_err(|_| SourceError::Row {
        line,
        message: format!("invalid number for '{}': {:?}", name, raw),
    })
}

/// Splits one CSV row into fields, honoring double-quoted fields and `""` escapes.
fn split_fields(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if current.is_empty() => in_quotes = true,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<Vec<Record>, SourceError> {
        parse_records(input.as_bytes())
    }

    #[test]
    fn finds_columns_anywhere_in_header() {
        let recs = parse("id,price,long,lat\n9,100,-122.3,47.6\n4,200,-74.0,40.7\n").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].id(), 0);
        assert_eq!(recs[0].lat(), 47.6);
        assert_eq!(recs[0].lon(), -122.3);
        assert_eq!(recs[1].id(), 1);
        assert_eq!(recs[1].lat(), 40.7);
    }

    #[test]
    fn quoted_fields_and_crlf() {
        let input = "\u{feff}name,lat,long\r\n\"Smith, J\",47.5,-122.1\r\n\"say \"\"hi\"\"\",10,20\r\n";
        let recs = parse(input).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].lon(), -122.1);
        assert_eq!(recs[1].lat(), 10.0);
    }

    #[test]
    fn quoted_field_may_span_lines() {
        let input = "name,lat,long\n\"Pier 39,\nupper deck\",37.8,-122.4\n\"b\",1,2\n";
        let recs = parse(input).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].lat(), 37.8);
        assert_eq!(recs[0].lon(), -122.4);
        assert_eq!(recs[1].id(), 1);

        let crlf = "name,lat,long\r\n\"two\r\n\r\nlines\",5,6\r\n";
        let recs = parse(crlf).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].lon(), 6.0);
    }

    #[test]
    fn unterminated_quote_reports_starting_line() {
        assert!(matches!(
            parse("lat,long\n1,2\n\"3,4\n5,6\n"),
            Err(SourceError::Row { line: 3, .. })
        ));
    }

    #[test]
    fn blank_lines_do_not_consume_ids() {
        let recs = parse("lat,long\n1,2\n\n3,4\n").unwrap();
        assert_eq!(recs.iter().map(|r| r.id()).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn missing_columns_reported() {
        match parse("latitude,long\n1,2\n") {
            Err(SourceError::MissingColumns { missing }) => assert_eq!(missing, vec!["lat"]),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
        match parse("a,b\n") {
            Err(SourceError::MissingColumns { missing }) => {
                assert_eq!(missing, vec!["lat", "long"])
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn bad_rows_are_fatal_with_line_number() {
        assert!(matches!(
            parse("lat,long\n1,2\nabc,3\n"),
            Err(SourceError::Row { line: 3, .. })
        ));
        assert!(matches!(
            parse("lat,long\n1,\n"),
            Err(SourceError::Row { line: 2, .. })
        ));
        assert!(matches!(
            parse("lat,long\n91,3\n"),
            Err(SourceError::InvalidRecord { line: 2, .. })
        ));
    }

    #[test]
    fn empty_input() {
        assert!(matches!(parse(""), Err(SourceError::Empty)));
        assert!(parse("lat,long\n").unwrap().is_empty());
    }

    #[test]
    fn read_records_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        std::fs::write(&path, "lat,long\n47.6,-122.3\n").unwrap();
        let recs = read_records(&path).unwrap();
        assert_eq!(recs.len(), 1);

        let missing = dir.path().join("nope.csv");
        match read_records(&missing) {
            Err(SourceError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
