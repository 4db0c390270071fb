// View domain model - Filtered and grouped projections of a table
use super::chart::Aggregation;
use super::table::{Cell, Column, ColumnType, DataTable};
use serde::Serialize;

/// A snapshot projection of the shared table, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataView {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Cell>>,
}

impl DataView {
    pub fn of(table: &DataTable) -> Self {
        Self {
            columns: table.columns.clone(),
            rows: table.rows.clone(),
        }
    }

    /// Keep only rows matching every `(column index, expected value)` pair.
    pub fn retain_matching(&mut self, constraints: &[(usize, Cell)]) {
        self.rows
            .retain(|row| constraints.iter().all(|(i, v)| row.get(*i) == Some(v)));
    }

    /// Group by the dimension column, folding the view's first column into a
    /// synthetic number column. Output is sorted by group key.
    pub fn grouped(&self, dimension: usize, aggregation: Aggregation) -> DataView {
        let mut groups: Vec<(Cell, Vec<Cell>)> = Vec::new();
        for row in &self.rows {
            let key = row.get(dimension).cloned().unwrap_or(Cell::Null);
            let value = row.first().cloned().unwrap_or(Cell::Null);
            match groups.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value),
                None => groups.push((key, vec![value])),
            }
        }
        groups.sort_by(|a, b| a.0.compare(&b.0));

        let columns = vec![
            self.columns[dimension].clone(),
            Column::new(
                aggregation.label().to_string(),
                aggregation.label().to_string(),
                ColumnType::Number,
            ),
        ];
        let rows = groups
            .into_iter()
            .map(|(key, values)| vec![key, Cell::Number(aggregation.apply(&values))])
            .collect();
        DataView { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> DataTable {
        DataTable::new(
            vec![
                Column::new("Loan".to_string(), "Loan".to_string(), ColumnType::String),
                Column::new("State".to_string(), "State".to_string(), ColumnType::String),
                Column::new(
                    "Amount".to_string(),
                    "Amount".to_string(),
                    ColumnType::Number,
                ),
            ],
            vec![
                vec![
                    Cell::Text("L-1".to_string()),
                    Cell::Text("CA".to_string()),
                    Cell::Number(100.0),
                ],
                vec![
                    Cell::Text("L-2".to_string()),
                    Cell::Text("TX".to_string()),
                    Cell::Number(250.0),
                ],
                vec![
                    Cell::Text("L-3".to_string()),
                    Cell::Text("CA".to_string()),
                    Cell::Number(50.0),
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_retain_matching_applies_all_constraints() {
        let mut view = DataView::of(&sample_table());
        view.retain_matching(&[
            (1, Cell::Text("CA".to_string())),
            (2, Cell::Number(100.0)),
        ]);
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0][0], Cell::Text("L-1".to_string()));
    }

    #[test]
    fn test_retain_matching_without_constraints_keeps_all() {
        let mut view = DataView::of(&sample_table());
        view.retain_matching(&[]);
        assert_eq!(view.rows.len(), 3);
    }

    #[test]
    fn test_grouped_counts_by_dimension() {
        let view = DataView::of(&sample_table());
        let grouped = view.grouped(1, Aggregation::Count);
        assert_eq!(grouped.columns.len(), 2);
        assert_eq!(grouped.columns[0].id, "State");
        assert_eq!(grouped.columns[1].id, "count");
        assert_eq!(grouped.columns[1].column_type, ColumnType::Number);
        // Sorted by group key
        assert_eq!(
            grouped.rows,
            vec![
                vec![Cell::Text("CA".to_string()), Cell::Number(2.0)],
                vec![Cell::Text("TX".to_string()), Cell::Number(1.0)],
            ]
        );
    }

    #[test]
    fn test_grouped_sums_first_column() {
        // Reorder so Amount is the view's first column
        let table = sample_table();
        let view = DataView {
            columns: vec![
                table.columns[2].clone(),
                table.columns[1].clone(),
            ],
            rows: table
                .rows
                .iter()
                .map(|r| vec![r[2].clone(), r[1].clone()])
                .collect(),
        };
        let grouped = view.grouped(1, Aggregation::Sum);
        assert_eq!(
            grouped.rows,
            vec![
                vec![Cell::Text("CA".to_string()), Cell::Number(150.0)],
                vec![Cell::Text("TX".to_string()), Cell::Number(250.0)],
            ]
        );
    }
}
