use serde::Serialize;

/// A detected table, one record per table with its rows of cell text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub page: u32,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(page: u32, rows: Vec<Vec<String>>) -> Self {
        Self { page, rows }
    }

    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }
}
