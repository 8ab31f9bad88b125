use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::error::EngineError;
use super::model::{CellValue, Column, ColumnType, Table};

// ---------------------------------------------------------------------------
// Filter predicate: which date range keeps a row
// ---------------------------------------------------------------------------

/// A date-range predicate over one temporal column.
///
/// `Week` uses the ISO week (Monday start, ISO week-numbering year); `Month`
/// uses the calendar year + month of the given date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpec {
    All,
    Day(NaiveDate),
    Week(NaiveDate),
    Month(NaiveDate),
}

impl FilterSpec {
    /// Whether a timestamp falls inside the range.  Callers pass `None` for
    /// rows whose cell is null or non-temporal; those never match a
    /// non-`All` spec.
    fn matches(&self, ts: Option<NaiveDateTime>) -> bool {
        match self {
            FilterSpec::All => true,
            FilterSpec::Day(d) => ts.is_some_and(|t| t.date() == *d),
            FilterSpec::Week(start) => ts.is_some_and(|t| t.date().iso_week() == start.iso_week()),
            FilterSpec::Month(start) => {
                ts.is_some_and(|t| t.year() == start.year() && t.month() == start.month())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate date columns
// ---------------------------------------------------------------------------

/// Columns that may carry dates: already-temporal columns plus text columns
/// (text may contain parseable dates).  Numeric columns never qualify.
/// Decided by declared column type, so a zero-row table still reports its
/// schema.  An empty result means filtering is unavailable; the caller keeps
/// the full table.
pub fn candidate_date_columns(table: &Table) -> Vec<String> {
    table
        .columns
        .iter()
        .filter(|c| matches!(c.ty, ColumnType::Timestamp | ColumnType::Text))
        .map(|c| c.name.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Temporal coercion (two-stage parse, tagged)
// ---------------------------------------------------------------------------

/// Which stage of the two-stage parse produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStage {
    /// Matched the strict `%Y-%m-%d %H:%M:%S` format (or was already temporal).
    Strict,
    /// Matched one of the loose fallback formats.
    Loose,
    /// No format matched.
    Failed,
}

/// What to do with cells the loose fallback cannot interpret either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Any unparseable non-null cell fails the whole coercion.
    Strict,
    /// Unparseable cells become null (and then never match a date filter).
    #[default]
    Lenient,
}

/// Per-column summary of a coercion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoercionReport {
    pub strict: usize,
    pub loose: usize,
    pub failed: usize,
}

/// Fallback formats tried after the strict one, most specific first.
/// Day-first wins over month-first for ambiguous slash dates.
const LOOSE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const LOOSE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

const STRICT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Two-stage parse of a single text cell.
pub fn parse_temporal(s: &str) -> (Option<NaiveDateTime>, ParseStage) {
    let trimmed = s.trim();
    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, STRICT_FORMAT) {
        return (Some(ts), ParseStage::Strict);
    }
    for fmt in LOOSE_DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return (Some(ts), ParseStage::Loose);
        }
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return (Some(ts.naive_utc()), ParseStage::Loose);
    }
    for fmt in LOOSE_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            // Midnight stands in for date-only input.
            return (d.and_hms_opt(0, 0, 0), ParseStage::Loose);
        }
    }
    (None, ParseStage::Failed)
}

/// Parse the named column into timestamps, returning the coerced table and a
/// report of which stage each cell needed.
///
/// Already-temporal cells pass through unchanged, so coercing a timestamp
/// column twice is a no-op.  Nulls stay null.  Under [`Strictness::Strict`]
/// any failed cell aborts with [`EngineError::Parse`]; under
/// [`Strictness::Lenient`] failed cells become null and are reported, never
/// silently swallowed.
pub fn coerce_to_temporal(
    table: &Table,
    column_name: &str,
    strictness: Strictness,
) -> Result<(Table, CoercionReport), EngineError> {
    let idx = table.column_index(column_name).ok_or_else(|| {
        EngineError::Malformed(format!("no such column: '{column_name}'"))
    })?;
    let col = &table.columns[idx];

    let mut report = CoercionReport::default();
    let mut first_failure: Option<String> = None;
    let mut values = Vec::with_capacity(col.values.len());

    for v in &col.values {
        match v {
            CellValue::Timestamp(ts) => {
                report.strict += 1;
                values.push(CellValue::Timestamp(*ts));
            }
            CellValue::Null => values.push(CellValue::Null),
            CellValue::Text(s) => match parse_temporal(s) {
                (Some(ts), ParseStage::Strict) => {
                    report.strict += 1;
                    values.push(CellValue::Timestamp(ts));
                }
                (Some(ts), _) => {
                    report.loose += 1;
                    values.push(CellValue::Timestamp(ts));
                }
                (None, _) => {
                    report.failed += 1;
                    first_failure.get_or_insert_with(|| s.clone());
                    values.push(CellValue::Null);
                }
            },
            CellValue::Number(n) => {
                // Numbers are not dates; a numeric column should never have
                // been offered as a candidate in the first place.
                report.failed += 1;
                first_failure.get_or_insert_with(|| n.to_string());
                values.push(CellValue::Null);
            }
        }
    }

    if report.failed > 0 && strictness == Strictness::Strict {
        return Err(EngineError::Parse {
            column: column_name.to_string(),
            failed: report.failed,
            sample: first_failure.unwrap_or_default(),
        });
    }

    let coerced = Column {
        name: col.name.clone(),
        ty: ColumnType::Timestamp,
        values,
    };
    Ok((table.with_column_replaced(idx, coerced), report))
}

// ---------------------------------------------------------------------------
// Row filtering
// ---------------------------------------------------------------------------

/// Indices of rows whose temporal cell matches the spec.
///
/// `All` keeps every row, including those with null cells.  Any other spec
/// drops rows whose cell in `column_name` is null or non-temporal.
pub fn filter_row_indices(table: &Table, column_name: &str, spec: &FilterSpec) -> Vec<usize> {
    if *spec == FilterSpec::All {
        return (0..table.n_rows()).collect();
    }
    let Some(col) = table.column(column_name) else {
        return (0..table.n_rows()).collect();
    };
    col.values
        .iter()
        .enumerate()
        .filter(|(_, v)| spec.matches(v.as_timestamp()))
        .map(|(i, _)| i)
        .collect()
}

/// Row-subset table matching the spec; same column set, same order.
pub fn filter_rows(table: &Table, column_name: &str, spec: &FilterSpec) -> Table {
    match spec {
        FilterSpec::All => table.clone(),
        _ => table.take_rows(&filter_row_indices(table, column_name, spec)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text_table(ts_values: &[&str]) -> Table {
        let values = ts_values
            .iter()
            .map(|s| CellValue::Text(s.to_string()))
            .collect();
        let reading = (0..ts_values.len())
            .map(|i| CellValue::Number(i as f64))
            .collect();
        Table::new(vec![
            Column::from_values("ts", values),
            Column::from_values("reading", reading),
        ])
    }

    fn coerced(ts_values: &[&str]) -> Table {
        let (t, _) = coerce_to_temporal(&text_table(ts_values), "ts", Strictness::Lenient).unwrap();
        t
    }

    #[test]
    fn numeric_columns_are_never_candidates() {
        let table = text_table(&["2024-01-01 00:00:00"]);
        assert_eq!(candidate_date_columns(&table), vec!["ts".to_string()]);
    }

    #[test]
    fn candidates_come_from_schema_even_with_zero_rows() {
        let table = Table::new(vec![
            Column::from_values("ts", vec![]),
            Column::from_values("note", vec![]),
        ]);
        assert_eq!(
            candidate_date_columns(&table),
            vec!["ts".to_string(), "note".to_string()]
        );
        let out = filter_rows(&table, "ts", &FilterSpec::Day(date(2024, 1, 1)));
        assert_eq!(out.n_rows(), 0);
        assert_eq!(out.n_cols(), 2);
    }

    #[test]
    fn strict_format_tagged_strict_loose_tagged_loose() {
        assert_eq!(
            parse_temporal("2024-01-01 10:00:00").1,
            ParseStage::Strict
        );
        assert_eq!(parse_temporal("2024-01-01").1, ParseStage::Loose);
        assert_eq!(parse_temporal("15/06/2024").1, ParseStage::Loose);
        assert_eq!(parse_temporal("not-a-date").1, ParseStage::Failed);
    }

    #[test]
    fn coercion_is_idempotent() {
        let once = coerced(&["2024-01-01 10:00:00", "2024-01-02 11:00:00"]);
        let (twice, report) = coerce_to_temporal(&once, "ts", Strictness::Strict).unwrap();
        assert_eq!(report.strict, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(
            twice.column("ts").unwrap().values,
            once.column("ts").unwrap().values
        );
    }

    #[test]
    fn strict_mode_propagates_parse_failure() {
        let table = text_table(&["2024-01-01 10:00:00", "garbage"]);
        let err = coerce_to_temporal(&table, "ts", Strictness::Strict).unwrap_err();
        match err {
            EngineError::Parse { column, failed, sample } => {
                assert_eq!(column, "ts");
                assert_eq!(failed, 1);
                assert_eq!(sample, "garbage");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn lenient_mode_nulls_failures_and_reports_them() {
        let table = text_table(&["2024-01-01 10:00:00", "garbage"]);
        let (out, report) = coerce_to_temporal(&table, "ts", Strictness::Lenient).unwrap();
        assert_eq!(report.strict, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(out.column("ts").unwrap().values[1], CellValue::Null);
    }

    #[test]
    fn all_is_identity() {
        let table = coerced(&["2024-01-01 10:00:00", "2024-06-15 09:00:00"]);
        let out = filter_rows(&table, "ts", &FilterSpec::All);
        assert_eq!(out.n_rows(), table.n_rows());
        assert_eq!(
            out.column("ts").unwrap().values,
            table.column("ts").unwrap().values
        );
    }

    #[test]
    fn day_filter_keeps_exactly_matching_rows() {
        let table = coerced(&[
            "2024-01-01 10:00:00",
            "2024-01-01 23:59:59",
            "2024-01-02 00:00:00",
        ]);
        let spec = FilterSpec::Day(date(2024, 1, 1));
        let out = filter_rows(&table, "ts", &spec);
        assert_eq!(out.n_rows(), 2);
        for v in &out.column("ts").unwrap().values {
            assert_eq!(v.as_timestamp().unwrap().date(), date(2024, 1, 1));
        }
        // No rows invented: the other column came along unchanged.
        assert_eq!(
            out.column("reading").unwrap().values,
            vec![CellValue::Number(0.0), CellValue::Number(1.0)]
        );
    }

    #[test]
    fn month_filter_scenario() {
        let table = coerced(&[
            "2024-01-01 10:00:00",
            "2024-01-02 11:00:00",
            "2024-06-15 09:00:00",
        ]);
        let out = filter_rows(&table, "ts", &FilterSpec::Month(date(2024, 1, 10)));
        assert_eq!(
            filter_row_indices(&table, "ts", &FilterSpec::Month(date(2024, 1, 10))),
            vec![0, 1]
        );
        assert_eq!(out.n_rows(), 2);
    }

    #[test]
    fn week_filter_is_iso_monday_start() {
        // 2024-01-01 is a Monday; the ISO week runs through Sunday 2024-01-07.
        let table = coerced(&[
            "2024-01-01 00:00:00",
            "2024-01-07 23:00:00",
            "2024-01-08 01:00:00",
        ]);
        let out = filter_row_indices(&table, "ts", &FilterSpec::Week(date(2024, 1, 3)));
        assert_eq!(out, vec![0, 1]);
        // Sunday belongs to the preceding ISO week.
        let sunday = filter_row_indices(&table, "ts", &FilterSpec::Week(date(2024, 1, 7)));
        assert_eq!(sunday, vec![0, 1]);
    }

    #[test]
    fn unparseable_rows_never_match_day_filter() {
        let table = coerced(&[
            "2024-03-05 08:00:00",
            "not-a-date",
            "2024-03-06 08:00:00",
        ]);
        let out = filter_rows(&table, "ts", &FilterSpec::Day(date(2024, 3, 5)));
        assert_eq!(out.n_rows(), 1);
        assert_eq!(
            out.column("ts").unwrap().values[0].as_timestamp().unwrap().date(),
            date(2024, 3, 5)
        );
    }

    #[test]
    fn null_rows_still_pass_all() {
        let table = coerced(&["not-a-date", "2024-03-05 08:00:00"]);
        let out = filter_rows(&table, "ts", &FilterSpec::All);
        assert_eq!(out.n_rows(), 2);
    }
}
