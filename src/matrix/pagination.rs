//! Responsive pagination of competitor columns.
//!
//! The subscriber column is pinned and never paginated; only competitors are
//! split into pages whose width follows the viewport.

/// Viewport breakpoints: `(max width, inclusive) -> columns per page`.
/// Anything wider than the last bound gets [`WIDE_COLUMNS`].
const BREAKPOINTS: [(f32, usize); 3] = [(1351.0, 3), (1500.0, 5), (1800.0, 7)];
const WIDE_COLUMNS: usize = 9;

/// Number of competitor columns that fit at the given viewport width.
///
/// Step function: `< 1352 -> 3`, `1352..=1500 -> 5`, `1501..=1800 -> 7`,
/// `> 1800 -> 9`. Fractional widths fall into the band of the whole pixel
/// they start in, so `1351.5` still yields 3.
pub fn columns_per_page(width: f32) -> usize {
    let width = width.floor();
    BREAKPOINTS
        .iter()
        .find(|(upper, _)| width <= *upper)
        .map(|(_, cols)| *cols)
        .unwrap_or(WIDE_COLUMNS)
}

/// One column position on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot<T> {
    /// A real competitor column
    Entity(T),
    /// Padding so a short last page still renders `columns_per_page` columns
    Placeholder,
}

impl<T> Slot<T> {
    pub fn entity(&self) -> Option<&T> {
        match self {
            Slot::Entity(e) => Some(e),
            Slot::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder)
    }
}

impl<T: Copy> Slot<&T> {
    pub fn copied(self) -> Slot<T> {
        match self {
            Slot::Entity(e) => Slot::Entity(*e),
            Slot::Placeholder => Slot::Placeholder,
        }
    }
}

/// Page cursor over a list of competitor columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    columns_per_page: usize,
    total: usize,
    page: usize,
}

impl Paginator {
    pub fn new(columns_per_page: usize, total: usize) -> Self {
        Paginator {
            columns_per_page: columns_per_page.max(1),
            total,
            page: 0,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn columns_per_page(&self) -> usize {
        self.columns_per_page
    }

    /// `ceil(total / columns_per_page)`; zero for an empty list.
    pub fn page_count(&self) -> usize {
        (self.total + self.columns_per_page - 1) / self.columns_per_page
    }

    /// Pages the controls should offer. An empty list still renders one
    /// page of placeholders.
    pub fn total_pages(&self) -> usize {
        self.page_count().max(1)
    }

    fn last_page(&self) -> usize {
        self.total_pages() - 1
    }

    /// Update the number of entities. A changed count sends the cursor back
    /// to the first page; an unchanged count leaves it alone.
    pub fn set_total(&mut self, total: usize) {
        if total != self.total {
            log::debug!(
                "[Matrix] [PAGE] entity count {} -> {}, resetting to page 0",
                self.total,
                total
            );
            self.total = total;
            self.page = 0;
        }
    }

    /// Update the page width (after a viewport resize), keeping the cursor
    /// inside the new page range.
    pub fn set_columns_per_page(&mut self, columns: usize) {
        let columns = columns.max(1);
        if columns != self.columns_per_page {
            self.columns_per_page = columns;
            self.page = self.page.min(self.last_page());
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.last_page()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn next(&mut self) {
        self.go_to(self.page.saturating_add(1));
    }

    pub fn prev(&mut self) {
        self.go_to(self.page.saturating_sub(1));
    }

    /// Jump to a page, clamped to `[0, total_pages - 1]`.
    pub fn go_to(&mut self, page: usize) {
        self.page = page.min(self.last_page());
    }

    /// Index range of the entities on the current page.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let start = (self.page * self.columns_per_page).min(self.total);
        let end = (start + self.columns_per_page).min(self.total);
        start..end
    }

    /// Columns of the current page: the visible entities followed by as many
    /// placeholders as needed to fill exactly `columns_per_page` slots.
    ///
    /// `items` is expected to hold `total` entries; extra entries are ignored.
    pub fn page_slots<'a, T>(&self, items: &'a [T]) -> Vec<Slot<&'a T>> {
        let range = self.visible_range();
        let end = range.end.min(items.len());
        let start = range.start.min(end);
        let mut slots: Vec<Slot<&T>> = items[start..end].iter().map(Slot::Entity).collect();
        slots.resize(self.columns_per_page, Slot::Placeholder);
        slots
    }
}
