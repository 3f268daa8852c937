mod cell;
mod rows;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

pub use cell::{compare_cells, CellValue, Column, ColumnKind};

use crate::error::{InsightsError, Result};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const LEADERBOARD_ROWS_PER_PAGE: usize = 5;

/// A report row that can be shown in a table, searched, sorted and exported.
pub trait TableRow {
    fn columns() -> &'static [Column];

    fn cell(&self, key: &str) -> CellValue;

    /// Text of every non-derived cell, joined by spaces.
    fn search_text(&self) -> String {
        Self::columns()
            .iter()
            .filter(|column| !column.derived)
            .map(|column| self.cell(column.key).display())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct TableView<R> {
    rows: Vec<R>,
    search_term: String,
    sort_key: Option<&'static str>,
    sort_direction: SortDirection,
    current_page: usize,
    rows_per_page: usize,
}

impl<R: TableRow> TableView<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            search_term: String::new(),
            sort_key: None,
            sort_direction: SortDirection::default(),
            current_page: 1,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }

    pub fn with_rows_per_page(rows: Vec<R>, rows_per_page: usize) -> Result<Self> {
        let mut view = Self::new(rows);
        view.set_rows_per_page(rows_per_page)?;
        Ok(view)
    }

    /// Starts the view sorted by `key` in `direction`.
    pub fn with_sort(mut self, key: &str, direction: SortDirection) -> Result<Self> {
        self.sort_key = Some(column(Self::columns(), key)?.key);
        self.sort_direction = direction;
        Ok(self)
    }

    fn columns() -> &'static [Column] {
        R::columns()
    }

    /// Replaces the underlying rows, keeping search and sort state.
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
        self.clamp_page();
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> Result<()> {
        if rows_per_page == 0 {
            return Err(InsightsError::InvalidPageSize);
        }
        self.rows_per_page = rows_per_page;
        self.clamp_page();
        Ok(())
    }

    pub fn set_search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.current_page = 1;
    }

    /// Sorting by the current key flips the direction; a new key starts ascending.
    pub fn request_sort(&mut self, key: &str) -> Result<()> {
        let column = column(Self::columns(), key)?;
        if self.sort_key == Some(column.key) {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = Some(column.key);
            self.sort_direction = SortDirection::Ascending;
        }
        self.current_page = 1;
        Ok(())
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.page_count());
    }

    fn clamp_page(&mut self) {
        self.set_page(self.current_page);
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort_key.map(|key| SortState {
            key,
            direction: self.sort_direction,
        })
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Number of rows matching the search.
    pub fn total_items(&self) -> usize {
        self.filtered_items().len()
    }

    pub fn page_count(&self) -> usize {
        self.total_items().div_ceil(self.rows_per_page).max(1)
    }

    pub fn filtered_items(&self) -> Vec<&R> {
        let needle = self.search_term.to_lowercase();
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| row.search_text().to_lowercase().contains(&needle))
            .collect()
    }

    /// Filtered rows in sort order. Empty cells always go last; equal cells
    /// keep their original relative order.
    pub fn sorted_items(&self) -> Vec<&R> {
        let mut items = self.filtered_items();
        let Some(key) = self.sort_key else {
            return items;
        };
        let kind = Self::columns()
            .iter()
            .find(|column| column.key == key)
            .map_or(ColumnKind::Text, |column| column.kind);
        let direction = self.sort_direction;

        items.sort_by(|a, b| order_cells(kind, direction, &a.cell(key), &b.cell(key)));
        items
    }

    pub fn paginated_items(&self) -> Vec<&R> {
        let start = (self.current_page - 1) * self.rows_per_page;
        self.sorted_items()
            .into_iter()
            .skip(start)
            .take(self.rows_per_page)
            .collect()
    }
}

fn column(columns: &'static [Column], key: &str) -> Result<&'static Column> {
    columns
        .iter()
        .find(|column| column.key == key)
        .ok_or_else(|| InsightsError::UnknownColumn(key.to_string()))
}

fn order_cells(kind: ColumnKind, direction: SortDirection, a: &CellValue, b: &CellValue) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = compare_cells(kind, a, b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}
