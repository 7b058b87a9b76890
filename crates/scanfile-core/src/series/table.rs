use crate::common::constants::COMMENT_MARKER;

pub const MIN_ROWS: usize = 2;
pub const MIN_COLUMNS: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TableShapeError {
    #[error("file contains no numeric rows")]
    Empty,
    #[error("line {line_number}: '{token}' is not numeric")]
    NonNumeric { line_number: usize, token: String },
    #[error("line {line_number}: expected {expected} columns, found {found}")]
    Ragged {
        line_number: usize,
        expected: usize,
        found: usize,
    },
    #[error(
        "numeric block is {rows} x {columns}; a scan needs at least {min_rows} x {min_columns}",
        min_rows = MIN_ROWS,
        min_columns = MIN_COLUMNS
    )]
    NotTwoDimensional { rows: usize, columns: usize },
}

/// Whitespace-delimited numeric block of a scan file, one `Vec` per row.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    rows: Vec<Vec<f64>>,
    column_count: usize,
}

impl NumericTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index]).collect()
    }

    /// Column counted from the right: `1` is the last column.
    pub fn column_from_end(&self, offset: usize) -> Vec<f64> {
        self.column(self.column_count - offset)
    }
}

/// Reads the numeric block. Text after `#` is ignored, blank lines are skipped
/// and one leading non-numeric row (column names) is tolerated.
pub fn read_table<S: AsRef<str>>(lines: &[S]) -> Result<NumericTable, TableShapeError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut column_count = 0;
    let mut skipped_column_names = false;

    for (index, line) in lines.iter().enumerate() {
        let line_number = index + 1;
        let content = match line.as_ref().split_once(COMMENT_MARKER) {
            Some((before, _)) => before,
            None => line.as_ref(),
        };
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.is_empty() {
            continue;
        }

        let parsed: Result<Vec<f64>, &str> = tokens
            .iter()
            .map(|token| token.parse::<f64>().map_err(|_| *token))
            .collect();
        let row = match parsed {
            Ok(row) => row,
            Err(_) if rows.is_empty() && !skipped_column_names => {
                skipped_column_names = true;
                continue;
            }
            Err(token) => {
                return Err(TableShapeError::NonNumeric {
                    line_number,
                    token: token.to_string(),
                });
            }
        };

        if rows.is_empty() {
            column_count = row.len();
        } else if row.len() != column_count {
            return Err(TableShapeError::Ragged {
                line_number,
                expected: column_count,
                found: row.len(),
            });
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(TableShapeError::Empty);
    }
    if rows.len() < MIN_ROWS || column_count < MIN_COLUMNS {
        return Err(TableShapeError::NotTwoDimensional {
            rows: rows.len(),
            columns: column_count,
        });
    }

    Ok(NumericTable { rows, column_count })
}
