use eframe::egui::Ui;
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CellValue, Table};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Data table (below the chart)
// ---------------------------------------------------------------------------

/// Render the filtered rows as a table.  With the `All` filter this is the
/// raw upload; otherwise it is the filtered view.
pub fn table_view(ui: &mut Ui, state: &SessionState) {
    let Some(table) = &state.table else { return };
    if table.n_cols() == 0 {
        return;
    }

    ui.strong("Data");
    TableBuilder::new(ui)
        .striped(true)
        .columns(TableColumn::auto().resizable(true), table.n_cols())
        .header(20.0, |mut header| {
            for col in &table.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.name.as_str());
                });
            }
        })
        .body(|body| {
            let visible = &state.visible_indices;
            body.rows(18.0, visible.len(), |mut row| {
                let cells = row_text(table, visible[row.index()]);
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell.as_str());
                    });
                }
            });
        });
}

/// Cell text for one row, in column order.  Nulls render empty so gaps look
/// like the source file.
fn row_text(table: &Table, row: usize) -> Vec<String> {
    table
        .columns
        .iter()
        .map(|c| match &c.values[row] {
            CellValue::Null => String::new(),
            v => v.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    #[test]
    fn rows_render_in_column_order_with_empty_nulls() {
        let table = Table::new(vec![
            Column::from_values(
                "ts",
                vec![
                    CellValue::Text("2024-01-01 10:00:00".into()),
                    CellValue::Null,
                ],
            ),
            Column::from_values("power", vec![CellValue::Number(12.5), CellValue::Number(3.0)]),
        ]);
        assert_eq!(
            row_text(&table, 0),
            vec!["2024-01-01 10:00:00".to_string(), "12.5".to_string()]
        );
        assert_eq!(row_text(&table, 1), vec![String::new(), "3".to_string()]);
    }
}
