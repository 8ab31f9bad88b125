use chrono::NaiveDate;

use crate::chart::{ChartKind, ChartSpec};
use crate::data::filter::{
    candidate_date_columns, coerce_to_temporal, filter_row_indices, FilterSpec, Strictness,
};
use crate::data::model::Table;

// ---------------------------------------------------------------------------
// UI configuration flags
// ---------------------------------------------------------------------------

/// Presentation variants expressed as flags rather than separate code paths.
#[derive(Debug, Clone, Copy)]
pub struct UiConfig {
    /// Controls in a left side panel; otherwise inline above the chart.
    pub sidebar_controls: bool,
    /// Offer the scatter plot in addition to line and bar.
    pub extended_charts: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            sidebar_controls: true,
            extended_charts: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter mode (UI side of FilterSpec)
// ---------------------------------------------------------------------------

/// Granularity selector; pairs with the picked date to form a [`FilterSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Day,
    Week,
    Month,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::All,
        FilterMode::Day,
        FilterMode::Week,
        FilterMode::Month,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Day => "Day",
            FilterMode::Week => "Week",
            FilterMode::Month => "Month",
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// The full per-session state, passed explicitly to the UI and the filter
/// engine.  One instance per window; a new upload replaces the table
/// wholesale.  Nothing here is global.
pub struct SessionState {
    /// Working table (None until the user opens a file).  Holds the coerced
    /// date column once one is selected.
    pub table: Option<Table>,

    /// The table exactly as loaded.  Coercion always re-parses from here, so
    /// changing the strictness policy still sees the original text of cells
    /// a lenient pass already nulled out.
    source: Option<Table>,

    /// Columns eligible as date columns (temporal or text), cached per load.
    pub date_candidates: Vec<String>,

    /// User-selected date column; never auto-picked.
    pub date_column: Option<String>,

    /// Current filter granularity and the date driving it.
    pub filter_mode: FilterMode,
    pub picked_date: NaiveDate,

    /// Parse strictness for temporal coercion.
    pub strictness: Strictness,

    /// Indices of rows passing the current filter (cached).
    pub visible_indices: Vec<usize>,

    /// Chart selection.
    pub chart_kind: ChartKind,
    pub x_column: Option<String>,
    pub y_column: Option<String>,

    /// Status / warning / error message shown in the UI.
    pub status_message: Option<String>,

    /// Presentation flags.
    pub config: UiConfig,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            table: None,
            source: None,
            date_candidates: Vec::new(),
            date_column: None,
            filter_mode: FilterMode::All,
            picked_date: chrono::Local::now().date_naive(),
            strictness: Strictness::Lenient,
            visible_indices: Vec::new(),
            chart_kind: ChartKind::Line,
            x_column: None,
            y_column: None,
            status_message: None,
            config: UiConfig::default(),
        }
    }
}

impl SessionState {
    /// Ingest a freshly loaded table: recompute candidates, reset the
    /// selections, and surface a warning when no column can carry dates.
    pub fn set_table(&mut self, table: Table) {
        let schema: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{} ({})", c.name, c.ty))
            .collect();
        log::info!("table schema: {schema:?}");

        self.date_candidates = candidate_date_columns(&table);
        self.date_column = None;
        self.filter_mode = FilterMode::All;
        self.visible_indices = (0..table.n_rows()).collect();

        let names = table.column_names();
        self.x_column = names.first().cloned();
        self.y_column = names.get(1).cloned().or_else(|| names.first().cloned());

        self.status_message = if self.date_candidates.is_empty() {
            Some("No date/time column found; date filtering is disabled.".into())
        } else if table.is_empty() {
            Some("File has headers but no data rows.".into())
        } else {
            None
        };
        self.source = Some(table.clone());
        self.table = Some(table);
    }

    /// Select (and coerce) the date column, parsing from the pristine loaded
    /// table.  A parse failure under strict mode leaves the previous
    /// selection untouched and surfaces the error.
    pub fn select_date_column(&mut self, name: String) {
        let Some(source) = &self.source else { return };

        match coerce_to_temporal(source, &name, self.strictness) {
            Ok((coerced, report)) => {
                log::info!(
                    "coerced '{name}': {} strict, {} loose, {} failed",
                    report.strict,
                    report.loose,
                    report.failed
                );
                self.status_message = (report.failed > 0).then(|| {
                    format!(
                        "{} value(s) in '{name}' could not be parsed and will never match a date filter.",
                        report.failed
                    )
                });
                self.table = Some(coerced);
                self.date_column = Some(name);
                self.refilter();
            }
            Err(e) => {
                log::warn!("date coercion failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// The engine-side spec for the current mode + picked date.
    pub fn filter_spec(&self) -> FilterSpec {
        match self.filter_mode {
            FilterMode::All => FilterSpec::All,
            FilterMode::Day => FilterSpec::Day(self.picked_date),
            FilterMode::Week => FilterSpec::Week(self.picked_date),
            FilterMode::Month => FilterSpec::Month(self.picked_date),
        }
    }

    /// Recompute `visible_indices` after any filter change.
    pub fn refilter(&mut self) {
        let Some(table) = &self.table else { return };
        self.visible_indices = match &self.date_column {
            Some(col) => filter_row_indices(table, col, &self.filter_spec()),
            None => (0..table.n_rows()).collect(),
        };
    }

    /// Current chart request, if both axes are chosen.
    pub fn chart_spec(&self) -> Option<ChartSpec> {
        Some(ChartSpec {
            kind: self.chart_kind,
            x_column: self.x_column.clone()?,
            y_column: self.y_column.clone()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, Column};

    fn sample_table() -> Table {
        Table::new(vec![
            Column::from_values(
                "ts",
                vec![
                    CellValue::Text("2024-01-01 10:00:00".into()),
                    CellValue::Text("2024-06-15 09:00:00".into()),
                ],
            ),
            Column::from_values("power", vec![CellValue::Number(1.0), CellValue::Number(2.0)]),
        ])
    }

    #[test]
    fn new_table_resets_selection_and_shows_everything() {
        let mut state = SessionState::default();
        state.set_table(sample_table());
        assert_eq!(state.date_candidates, vec!["ts".to_string()]);
        assert_eq!(state.date_column, None);
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn all_numeric_table_warns_and_keeps_full_table() {
        let mut state = SessionState::default();
        state.set_table(Table::new(vec![Column::from_values(
            "n",
            vec![CellValue::Number(1.0)],
        )]));
        assert!(state.date_candidates.is_empty());
        assert!(state.status_message.is_some());
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn day_filter_through_session() {
        let mut state = SessionState::default();
        state.set_table(sample_table());
        state.select_date_column("ts".into());
        state.filter_mode = FilterMode::Day;
        state.picked_date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        state.refilter();
        assert_eq!(state.visible_indices, vec![1]);
    }

    #[test]
    fn strictness_change_reparses_the_pristine_column() {
        let mut state = SessionState::default();
        state.set_table(Table::new(vec![Column::from_values(
            "ts",
            vec![
                CellValue::Text("2024-01-01 10:00:00".into()),
                CellValue::Text("garbage".into()),
            ],
        )]));

        // Lenient pass nulls the bad cell.
        state.select_date_column("ts".into());
        assert_eq!(state.date_column.as_deref(), Some("ts"));
        assert_eq!(state.table.as_ref().unwrap().column("ts").unwrap().values[1], CellValue::Null);

        // Strict re-coercion must still see the original text, not the null.
        state.strictness = Strictness::Strict;
        state.select_date_column("ts".into());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.starts_with("Error"));
        assert!(msg.contains("garbage"));
    }

    #[test]
    fn strict_failure_keeps_previous_selection() {
        let mut state = SessionState::default();
        state.strictness = Strictness::Strict;
        state.set_table(Table::new(vec![Column::from_values(
            "ts",
            vec![CellValue::Text("garbage".into())],
        )]));
        state.select_date_column("ts".into());
        assert_eq!(state.date_column, None);
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
    }
}
