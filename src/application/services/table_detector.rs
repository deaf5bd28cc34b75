use crate::domain::{Bounds, PageLayout, Table, TextLine};

#[derive(Debug, Clone, PartialEq)]
struct Cell {
    text: String,
    bounds: Bounds,
}

/// Finds column-aligned runs of lines on a page.
#[derive(Debug, Clone, Copy)]
pub struct TableDetector {
    column_gap: f32,
    alignment_tolerance: f32,
}

impl TableDetector {
    pub fn new(column_gap: f32, alignment_tolerance: f32) -> Self {
        Self {
            column_gap,
            alignment_tolerance,
        }
    }

    pub fn detect(&self, layout: &PageLayout) -> Vec<Table> {
        let mut tables = Vec::new();
        let mut run: Vec<Vec<Cell>> = Vec::new();

        for block in &layout.blocks {
            for line in &block.lines {
                let cells = self.split_cells(line);
                if cells.len() < 2 {
                    self.close_run(&mut run, layout.number, &mut tables);
                    continue;
                }

                let continues = run
                    .last()
                    .is_some_and(|previous| self.aligned(previous, &cells));
                if !continues {
                    self.close_run(&mut run, layout.number, &mut tables);
                }
                run.push(cells);
            }
            // Tables never span a block break.
            self.close_run(&mut run, layout.number, &mut tables);
        }

        tables
    }

    fn close_run(&self, run: &mut Vec<Vec<Cell>>, page: u32, tables: &mut Vec<Table>) {
        if run.len() >= 2 {
            let rows = run
                .drain(..)
                .map(|cells| cells.into_iter().map(|c| c.text).collect())
                .collect();
            tables.push(Table::new(page, rows));
        } else {
            run.clear();
        }
    }

    fn aligned(&self, above: &[Cell], below: &[Cell]) -> bool {
        above.len() == below.len()
            && above.iter().zip(below).all(|(a, b)| {
                a.bounds.overlaps_horizontally(&b.bounds)
                    || (a.bounds.left - b.bounds.left).abs() <= self.alignment_tolerance
            })
    }

    fn split_cells(&self, line: &TextLine) -> Vec<Cell> {
        let mut spans: Vec<_> = line
            .spans
            .iter()
            .filter(|s| !s.text.trim().is_empty())
            .collect();
        spans.sort_by(|a, b| a.bounds.left.total_cmp(&b.bounds.left));

        let mut cells: Vec<Cell> = Vec::new();
        for span in spans {
            match cells.last_mut() {
                Some(cell) if span.bounds.left - cell.bounds.right < self.column_gap => {
                    cell.text.push(' ');
                    cell.text.push_str(span.text.trim());
                    cell.bounds = cell.bounds.union(&span.bounds);
                }
                _ => cells.push(Cell {
                    text: span.text.trim().to_string(),
                    bounds: span.bounds,
                }),
            }
        }
        cells
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new(12.0, 4.0)
    }
}
