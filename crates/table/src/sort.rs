use std::cmp::Ordering;

use crate::Table;
use crate::collate::compare_cells;
use crate::model::SortIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            SortDirection::Ascending => '↑',
            SortDirection::Descending => '↓',
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Active sort key and direction. `column` is `None` until the first sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    column: Option<usize>,
    direction: SortDirection,
}

impl SortState {
    pub fn column(&self) -> Option<usize> {
        self.column
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Registers a sort request: repeating the active column flips the
    /// direction, a new column becomes active in ascending order.
    pub fn activate(&mut self, column: usize) {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn indicator_for(&self, column: usize) -> SortIndicator {
        if self.column == Some(column) {
            SortIndicator::active(self.direction)
        } else {
            SortIndicator::neutral()
        }
    }
}

/// Reorders rows in place by `column`. The sort is stable, so rows with equal
/// keys keep their relative order in both directions.
pub(crate) fn sort_rows(table: &mut Table, column: usize, direction: SortDirection) {
    table.rows_mut().sort_by(|left, right| {
        let ordering = compare_cells(left.cell(column).unwrap_or_default(), right.cell(column).unwrap_or_default());
        direction.apply(ordering)
    });
}

/// Refreshes every header indicator from the sort state.
pub(crate) fn update_indicators(table: &mut Table, state: &SortState) {
    for (index, header) in table.headers_mut().iter_mut().enumerate() {
        header.set_indicator(state.indicator_for(index));
    }
}
