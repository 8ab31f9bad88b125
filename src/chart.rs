use crate::data::model::Table;

// ---------------------------------------------------------------------------
// Chart description + column projection
// ---------------------------------------------------------------------------

/// Visual encoding for the two selected columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

impl ChartKind {
    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line chart",
            ChartKind::Bar => "Bar chart",
            ChartKind::Scatter => "Scatter plot",
        }
    }

    /// Kinds on offer; scatter only with the extended chart set.
    pub fn available(extended: bool) -> &'static [ChartKind] {
        if extended {
            &[ChartKind::Line, ChartKind::Bar, ChartKind::Scatter]
        } else {
            &[ChartKind::Line, ChartKind::Bar]
        }
    }
}

/// Purely descriptive chart request; rendering happens in [`crate::ui::plot`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x_column: String,
    pub y_column: String,
}

/// Project two columns to plot points, restricted to the given rows.
///
/// Numbers pass through; timestamps become epoch seconds.  Rows where either
/// side is text or null are skipped, so an all-text column just produces an
/// empty series (rendered as an empty plot, not an error).
pub fn series_points(
    table: &Table,
    x_column: &str,
    y_column: &str,
    rows: &[usize],
) -> Vec<[f64; 2]> {
    let (Some(x), Some(y)) = (table.column(x_column), table.column(y_column)) else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|&i| Some([x.values.get(i)?.as_f64()?, y.values.get(i)?.as_f64()?]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column, Table};
    use chrono::NaiveDate;

    #[test]
    fn projects_numbers_and_skips_nulls() {
        let table = Table::new(vec![
            Column::from_values(
                "x",
                vec![
                    CellValue::Number(1.0),
                    CellValue::Null,
                    CellValue::Number(3.0),
                ],
            ),
            Column::from_values(
                "y",
                vec![
                    CellValue::Number(10.0),
                    CellValue::Number(20.0),
                    CellValue::Text("n/a".into()),
                ],
            ),
        ]);
        assert_eq!(series_points(&table, "x", "y", &[0, 1, 2]), vec![[1.0, 10.0]]);
    }

    #[test]
    fn respects_row_restriction() {
        let table = Table::new(vec![
            Column::from_values(
                "x",
                vec![CellValue::Number(1.0), CellValue::Number(2.0)],
            ),
            Column::from_values(
                "y",
                vec![CellValue::Number(10.0), CellValue::Number(20.0)],
            ),
        ]);
        assert_eq!(series_points(&table, "x", "y", &[1]), vec![[2.0, 20.0]]);
    }

    #[test]
    fn timestamps_project_to_epoch_seconds() {
        let ts = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_opt(0, 1, 0)
            .unwrap();
        let table = Table::new(vec![
            Column::from_values("when", vec![CellValue::Timestamp(ts)]),
            Column::from_values("v", vec![CellValue::Number(5.0)]),
        ]);
        assert_eq!(series_points(&table, "when", "v", &[0]), vec![[60.0, 5.0]]);
    }

    #[test]
    fn missing_column_gives_empty_series() {
        let table = Table::new(vec![Column::from_values(
            "x",
            vec![CellValue::Number(1.0)],
        )]);
        assert!(series_points(&table, "x", "nope", &[0]).is_empty());
    }
}
