use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
};

use csv::StringRecord;

use crate::domain::LightRecord;

/// Column layout of the persisted store: raw fields first, derived after.
pub const HEADER: [&str; 8] = [
    "Brand",
    "Lumens",
    "Watts",
    "Hours/Day",
    "Rate €/kWh",
    "Efficacy (lm/W)",
    "Annual kWh",
    "Annual Cost (€)",
];

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("failed to open store '{path}': {reason}")]
    Open { path: PathBuf, reason: String },
    #[error("malformed stored row at line {line}: {reason}")]
    Parse { line: u64, reason: String },
    #[error("failed to append to store '{path}': {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Raw (non-derived) fields of a stored row, parsed back from disk.
///
/// Duplicate detection compares these and nothing else; the derived columns
/// are ignored, and floats must be exactly equal once parsed (no tolerance).
#[derive(Debug, PartialEq)]
struct RawKey {
    brand: String,
    lumens: f64,
    wattage: f64,
    hours_per_day: f64,
    rate_per_kwh: f64,
}

impl RawKey {
    fn matches(&self, record: &LightRecord) -> bool {
        let s = &record.spec;
        self.brand == s.brand
            && self.lumens == s.lumens
            && self.wattage == s.wattage
            && self.hours_per_day == s.hours_per_day
            && self.rate_per_kwh == s.rate_per_kwh
    }
}

fn parse_field(record: &StringRecord, idx: usize, name: &str, line: u64) -> Result<f64, StoreError> {
    let raw = record.get(idx).unwrap_or("");
    raw.trim().parse().map_err(|e| StoreError::Parse {
        line,
        reason: format!("invalid {name} '{raw}': {e}"),
    })
}

fn record_to_key(record: &StringRecord, line: u64) -> Result<RawKey, StoreError> {
    if record.len() != HEADER.len() {
        return Err(StoreError::Parse {
            line,
            reason: format!("expected {} fields, found {}", HEADER.len(), record.len()),
        });
    }

    Ok(RawKey {
        brand: record.get(0).unwrap_or("").to_string(),
        lumens: parse_field(record, 1, "lumens", line)?,
        wattage: parse_field(record, 2, "wattage", line)?,
        hours_per_day: parse_field(record, 3, "hours/day", line)?,
        rate_per_kwh: parse_field(record, 4, "rate", line)?,
    })
}

/// Read the store file back, reporting whether its first line is the expected
/// header and returning the raw keys of every data row for duplicate checks.
///
/// As in the store's write path, the first line is always treated as the
/// header position: a mismatched first line is not recovered as data.
fn read_existing(path: &Path) -> Result<(bool, Vec<RawKey>), StoreError> {
    if !path.exists() {
        return Ok((false, Vec::new()));
    }

    let file = File::open(path).map_err(|e| StoreError::Open {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let header_ok = match rdr.headers() {
        Ok(headers) => headers.iter().eq(HEADER.iter().copied()),
        Err(e) => {
            return Err(StoreError::Parse {
                line: 1,
                reason: format!("unreadable header: {e}"),
            })
        }
    };

    let mut keys = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| StoreError::Parse {
            line: 0,
            reason: format!("unreadable row: {e}"),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        keys.push(record_to_key(&record, line)?);
    }

    Ok((header_ok, keys))
}

/// Two-decimal formatting for the persisted derived columns. `format!` rounds
/// half to even; precision beyond two decimals is deliberately dropped.
fn fixed2(v: f64) -> String {
    format!("{v:.2}")
}

/// Append `records` to the CSV store at `path`, skipping any record whose raw
/// fields exactly match an already-stored row. Returns the number of rows
/// actually written; zero is a normal outcome, not an error.
///
/// The header line is written only when the file is missing, empty, or its
/// first line does not match the expected header. Existing content is never
/// rewritten in place.
pub fn append<P: AsRef<Path>>(records: &[LightRecord], path: P) -> Result<usize, StoreError> {
    let path = path.as_ref();
    let (header_ok, existing) = read_existing(path)?;

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    let write_err = |e: csv::Error| StoreError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if !header_ok {
        wtr.write_record(HEADER).map_err(write_err)?;
    }

    let mut written = 0;
    for record in records {
        if existing.iter().any(|k| k.matches(record)) {
            tracing::info!(brand = %record.spec.brand, "skipping duplicate record");
            continue;
        }

        let s = &record.spec;
        let row = [
            s.brand.clone(),
            s.lumens.to_string(),
            s.wattage.to_string(),
            s.hours_per_day.to_string(),
            s.rate_per_kwh.to_string(),
            fixed2(record.efficacy),
            fixed2(record.annual_kwh),
            fixed2(record.annual_cost),
        ];
        wtr.write_record(&row).map_err(write_err)?;
        written += 1;
    }

    wtr.flush().map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LightSpec;
    use crate::transform;
    use std::fs;

    fn record(brand: &str, lumens: f64, wattage: f64, hours: f64, rate: f64) -> LightRecord {
        transform::derive(LightSpec {
            brand: brand.to_string(),
            lumens,
            wattage,
            hours_per_day: hours,
            rate_per_kwh: rate,
        })
        .unwrap()
    }

    const EXPECTED_HEADER: &str =
        "Brand,Lumens,Watts,Hours/Day,Rate €/kWh,Efficacy (lm/W),Annual kWh,Annual Cost (€)";

    #[test]
    fn fresh_file_gets_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");

        let written = append(&[record("A", 800.0, 10.0, 5.0, 0.23)], &path).unwrap();
        assert_eq!(written, 1);

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], EXPECTED_HEADER);
        assert!(lines[1].starts_with("A,800,10,5,0.23,"));
    }

    #[test]
    fn derived_columns_are_stored_at_two_decimal_places() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");

        append(&[record("A", 800.0, 10.0, 5.0, 0.23)], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        // efficacy 80, annual kWh 18.25, annual cost 4.1975 rounded up.
        assert!(contents.contains(",80.00,18.25,4.20"));
    }

    #[test]
    fn duplicate_across_calls_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");
        let light = record("A", 800.0, 10.0, 5.0, 0.23);

        assert_eq!(append(&[light.clone()], &path).unwrap(), 1);
        assert_eq!(append(&[light], &path).unwrap(), 0);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn header_is_written_exactly_once_across_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");

        append(&[record("A", 800.0, 10.0, 5.0, 0.23)], &path).unwrap();
        append(&[record("B", 1600.0, 16.0, 3.0, 0.23)], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert_eq!(
            contents.lines().filter(|l| *l == EXPECTED_HEADER).count(),
            1
        );
    }

    #[test]
    fn duplicate_check_ignores_derived_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");
        let light = record("A", 800.0, 10.0, 5.0, 0.23);

        append(&[light.clone()], &path).unwrap();

        // Same raw fields with nonsense derived values still count as a dup.
        let mut tampered = light;
        tampered.efficacy = 1.0;
        tampered.annual_kwh = 2.0;
        tampered.annual_cost = 3.0;
        assert_eq!(append(&[tampered], &path).unwrap(), 0);
    }

    #[test]
    fn brand_comparison_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");

        append(&[record("A", 800.0, 10.0, 5.0, 0.23)], &path).unwrap();
        let written = append(&[record("a", 800.0, 10.0, 5.0, 0.23)], &path).unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn mismatched_first_line_gets_a_fresh_header_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");
        fs::write(&path, "not,a,header\n").unwrap();

        append(&[record("A", 800.0, 10.0, 5.0, 0.23)], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "not,a,header");
        assert_eq!(lines[1], EXPECTED_HEADER);
        assert!(lines[2].starts_with("A,"));
    }

    #[test]
    fn malformed_stored_row_fails_with_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");
        fs::write(&path, format!("{EXPECTED_HEADER}\nA,not-a-number,10,5,0.23,80.00,18.25,4.20\n"))
            .unwrap();

        let res = append(&[record("B", 1600.0, 16.0, 3.0, 0.23)], &path);
        assert!(matches!(res, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn short_stored_row_fails_with_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");
        fs::write(&path, format!("{EXPECTED_HEADER}\nA,800\n")).unwrap();

        let res = append(&[record("B", 1600.0, 16.0, 3.0, 0.23)], &path);
        assert!(matches!(res, Err(StoreError::Parse { .. })));
    }

    #[test]
    fn unopenable_path_fails_with_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("lights.csv");

        let res = append(&[record("A", 800.0, 10.0, 5.0, 0.23)], &path);
        assert!(matches!(res, Err(StoreError::Open { .. })));
    }

    #[test]
    fn empty_batch_on_fresh_file_still_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lights.csv");

        assert_eq!(append(&[], &path).unwrap(), 0);
        assert_eq!(append(&[], &path).unwrap(), 0);

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert_eq!(contents.lines().next().unwrap(), EXPECTED_HEADER);
    }
}
