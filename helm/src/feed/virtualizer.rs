use std::collections::HashMap;

use serde::Serialize;

/// A row that should be rendered, positioned in list coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VirtualItem {
    pub index: usize,
    pub start: u64,
    pub size: u32,
}

impl VirtualItem {
    pub fn end(&self) -> u64 {
        self.start + u64::from(self.size)
    }
}

/// Windowing over a long list: only rows intersecting the viewport, plus
/// `overscan` rows on each side, are produced.
#[derive(Debug, Clone)]
pub struct Virtualizer {
    count: usize,
    estimate: u32,
    overscan: usize,
    viewport: u32,
    scroll_offset: u64,
    measured: HashMap<usize, u32>,
}

impl Virtualizer {
    pub fn new(count: usize, estimate: u32, overscan: usize, viewport: u32) -> Self {
        Self {
            count,
            estimate: estimate.max(1),
            overscan,
            viewport,
            scroll_offset: 0,
            measured: HashMap::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.measured.retain(|&index, _| index < count);
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_offset(&self) -> u64 {
        self.scroll_offset
    }

    /// Clamped to the scrollable range.
    pub fn scroll_to(&mut self, offset: u64) {
        self.scroll_offset = offset.min(self.max_scroll());
    }

    /// Record the rendered size of a row; it replaces the estimate.
    pub fn measure(&mut self, index: usize, size: u32) {
        if index < self.count {
            self.measured.insert(index, size.max(1));
        }
    }

    pub fn size_of(&self, index: usize) -> u32 {
        self.measured.get(&index).copied().unwrap_or(self.estimate)
    }

    pub fn start_of(&self, index: usize) -> u64 {
        let estimated = index as u64 * u64::from(self.estimate);
        self.measured
            .iter()
            .filter(|(&i, _)| i < index)
            .fold(estimated, |acc, (_, &size)| {
                acc + u64::from(size) - u64::from(self.estimate)
            })
    }

    pub fn total_size(&self) -> u64 {
        self.start_of(self.count)
    }

    fn max_scroll(&self) -> u64 {
        self.total_size().saturating_sub(u64::from(self.viewport))
    }

    /// Index of the row covering `offset`.
    fn index_at(&self, offset: u64) -> usize {
        let (mut lo, mut hi) = (0, self.count);
        while lo + 1 < hi {
            let mid = lo + (hi - lo) / 2;
            if self.start_of(mid) <= offset {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Upper bound on how many items one call can return with unmeasured rows.
    pub fn max_items(&self) -> usize {
        self.viewport.div_ceil(self.estimate) as usize + 1 + 2 * self.overscan
    }

    pub fn virtual_items(&self) -> Vec<VirtualItem> {
        if self.count == 0 {
            return Vec::new();
        }

        let first = self.index_at(self.scroll_offset);
        let bottom = self.scroll_offset + u64::from(self.viewport.max(1)) - 1;
        let last = self.index_at(bottom);

        let from = first.saturating_sub(self.overscan);
        let to = (last + self.overscan).min(self.count - 1);

        let mut start = self.start_of(from);
        (from..=to)
            .map(|index| {
                let size = self.size_of(index);
                let item = VirtualItem { index, start, size };
                start += u64::from(size);
                item
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_window() {
        let v = Virtualizer::new(100, 200, 5, 800);
        let items = v.virtual_items();

        // rows 0..=3 visible, 5 more below
        assert_eq!(items.len(), 9);
        assert_eq!(items[0], VirtualItem { index: 0, start: 0, size: 200 });
        assert_eq!(items[8].index, 8);
        assert_eq!(v.total_size(), 20_000);
    }

    #[test]
    fn test_scrolled_window_has_overscan_both_sides() {
        let mut v = Virtualizer::new(100, 200, 5, 800);
        v.scroll_to(10_000);

        let items = v.virtual_items();
        assert_eq!(items.first().unwrap().index, 45);
        assert_eq!(items.last().unwrap().index, 58);
        assert!(items.len() <= v.max_items());
    }

    #[test]
    fn test_item_count_bounded_regardless_of_count() {
        let mut v = Virtualizer::new(10, 200, 5, 800);
        for pages in 1..=200 {
            v.set_count(pages * 10);
            v.scroll_to(v.total_size());
            assert!(v.virtual_items().len() <= v.max_items());
        }
        assert_eq!(v.virtual_items().last().unwrap().index, 1999);
    }

    #[test]
    fn test_measurements_override_estimate() {
        let mut v = Virtualizer::new(10, 200, 0, 800);
        v.measure(0, 50);
        v.measure(2, 300);

        assert_eq!(v.start_of(1), 50);
        assert_eq!(v.start_of(3), 50 + 200 + 300);
        assert_eq!(v.total_size(), 50 + 300 + 8 * 200);

        let items = v.virtual_items();
        assert_eq!(items[1], VirtualItem { index: 1, start: 50, size: 200 });
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut v = Virtualizer::new(3, 200, 1, 800);
        v.scroll_to(5_000);
        assert_eq!(v.scroll_offset(), 0);
        assert_eq!(v.virtual_items().len(), 3);
        assert!(Virtualizer::new(0, 200, 5, 800).virtual_items().is_empty());
    }
}
