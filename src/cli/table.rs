//! Fixed-width text tables
//!
//! Every column has an alignment and a left padding. Widths are the widest
//! cell per column, counted in characters.

/// Cell alignment within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub align: Align,
    /// Spaces printed before the cell.
    pub padding: usize,
}

impl Column {
    pub const fn left(padding: usize) -> Self {
        Self {
            align: Align::Left,
            padding,
        }
    }

    pub const fn right(padding: usize) -> Self {
        Self {
            align: Align::Right,
            padding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: impl Into<Vec<Column>>) -> Self {
        Self {
            columns: columns.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row; missing cells render empty, surplus cells are dropped.
    pub fn row<I>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.columns.len())
            .map(|c| c.to_string())
            .collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
        self
    }

    fn widths(&self) -> Vec<usize> {
        (0..self.columns.len())
            .map(|i| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        self.rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.columns)
                    .zip(&widths)
                    .map(|((cell, column), width)| {
                        let pad = " ".repeat(column.padding);
                        match column.align {
                            Align::Left => format!("{pad}{cell:<width$}"),
                            Align::Right => format!("{pad}{cell:>width$}"),
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_summary_layout_when_rendered_then_right_aligned_with_padding() {
        let mut table = Table::new([
            Column::right(0),
            Column::right(3),
            Column::right(3),
            Column::right(3),
        ]);
        table
            .row(["Balance", "Profit", "Time Spent", "Wage"])
            .row(["$1.00", "$0.00", "0h 00m", "N/A"]);

        let rendered = table.render();

        assert_eq!(
            rendered,
            "Balance   Profit   Time Spent   Wage\n  $1.00    $0.00       0h 00m    N/A"
        );
    }

    #[test]
    fn given_short_row_when_rendered_then_missing_cells_blank() {
        let mut table = Table::new([Column::left(0), Column::left(1)]);
        table.row(["1."]).row(["10.", "b"]);

        assert_eq!(table.render(), "1.   \n10. b");
    }
}
