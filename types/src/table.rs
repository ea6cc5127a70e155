//! Client-side sorting and pagination for the console tables.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Which column a table is sorted by, and in which direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + PartialEq> SortState<C> {
    pub fn new(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// A click on a column header. The same column flips direction, a new
    /// column starts ascending.
    pub fn toggle(&mut self, column: C) {
        if self.column == column {
            self.direction = self.direction.flipped();
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn direction_for(&self, column: C) -> Option<SortDirection> {
        (self.column == column).then_some(self.direction)
    }
}

/// Implemented by row types whose columns can be compared.
pub trait Sortable<C> {
    fn compare(&self, other: &Self, column: C) -> Ordering;
}

/// Stable sort of `rows` by `column`.
pub fn sort_rows<T: Sortable<C>, C: Copy>(rows: &mut [T], state: SortState<C>) {
    rows.sort_by(|a, b| state.direction.apply(a.compare(b, state.column)));
}

/// Case-insensitive string ordering used by text columns.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub size: usize,
}

impl Page {
    pub const DEFAULT_SIZE: usize = 10;

    pub fn first(size: usize) -> Self {
        Self { number: 1, size }
    }

    /// Keep the page number inside `1..=total` after the underlying data changes.
    pub fn clamp(self, total: usize) -> Self {
        Self {
            number: self.number.clamp(1, total.max(1)),
            size: self.size,
        }
    }

    /// 1-based index of the first row on this page, for "Showing x-y of z".
    pub fn range(self, len: usize) -> Option<(usize, usize)> {
        let start = self.number.checked_sub(1)?.checked_mul(self.size)?;
        if self.size == 0 || start >= len {
            return None;
        }
        Some((start + 1, (start + self.size).min(len)))
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::first(Self::DEFAULT_SIZE)
    }
}

pub fn total_pages(len: usize, size: usize) -> usize {
    if size == 0 { 0 } else { len.div_ceil(size) }
}

pub fn paginate<T>(items: &[T], page: Page) -> &[T] {
    match page.range(items.len()) {
        Some((first, last)) => &items[first - 1..last],
        None => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Column {
        Name,
        Age,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        age: u32,
    }

    impl Sortable<Column> for Row {
        fn compare(&self, other: &Self, column: Column) -> Ordering {
            match column {
                Column::Name => compare_text(self.name, other.name),
                Column::Age => self.age.cmp(&other.age),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "carol", age: 41 },
            Row { name: "Alice", age: 30 },
            Row { name: "bob", age: 30 },
        ]
    }

    #[test]
    fn same_column_toggles_direction() {
        let mut state = SortState::new(Column::Name);
        state.toggle(Column::Name);
        assert_eq!(state.direction, SortDirection::Descending);
        state.toggle(Column::Name);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn new_column_starts_ascending() {
        let mut state = SortState::new(Column::Name);
        state.toggle(Column::Name);
        state.toggle(Column::Age);
        assert_eq!(state.column, Column::Age);
        assert_eq!(state.direction, SortDirection::Ascending);
        assert_eq!(state.direction_for(Column::Name), None);
    }

    #[test]
    fn sorts_text_case_insensitively() {
        let mut rows = rows();
        sort_rows(&mut rows, SortState::new(Column::Name));
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, ["Alice", "bob", "carol"]);
    }

    #[test]
    fn descending_reverses_and_ties_stay_stable() {
        let mut rows = rows();
        let mut state = SortState::new(Column::Age);
        state.toggle(Column::Age);
        sort_rows(&mut rows, state);
        let names: Vec<_> = rows.iter().map(|r| r.name).collect();
        assert_eq!(names, ["carol", "Alice", "bob"]);
    }

    #[test]
    fn paginates_full_and_partial_pages() {
        let items: Vec<u32> = (1..=23).collect();

        assert_eq!(paginate(&items, Page { number: 1, size: 10 }), &items[0..10]);
        assert_eq!(paginate(&items, Page { number: 2, size: 10 }), &items[10..20]);
        assert_eq!(paginate(&items, Page { number: 3, size: 10 }), &[21, 22, 23]);
        assert_eq!(total_pages(items.len(), 10), 3);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, Page { number: 0, size: 2 }).is_empty());
        assert!(paginate(&items, Page { number: 3, size: 2 }).is_empty());
        assert!(paginate(&items, Page { number: 1, size: 0 }).is_empty());
        assert!(paginate::<u8>(&[], Page::default()).is_empty());
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn exact_multiple_has_no_trailing_page() {
        let items: Vec<u32> = (1..=20).collect();
        assert_eq!(total_pages(items.len(), 10), 2);
        assert!(paginate(&items, Page { number: 3, size: 10 }).is_empty());
    }

    #[test]
    fn clamp_pulls_page_back_into_range() {
        assert_eq!(Page { number: 5, size: 10 }.clamp(2).number, 2);
        assert_eq!(Page { number: 0, size: 10 }.clamp(2).number, 1);
        assert_eq!(Page { number: 3, size: 10 }.clamp(0).number, 1);
    }

    #[test]
    fn range_reports_one_based_bounds() {
        assert_eq!(Page { number: 3, size: 10 }.range(23), Some((21, 23)));
        assert_eq!(Page { number: 4, size: 10 }.range(23), None);
    }
}
