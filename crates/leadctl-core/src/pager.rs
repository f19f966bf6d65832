//! Pagination bar layout.
//!
//! Decides which page numbers a pager shows for a given page count.

/// One slot in the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerSlot {
    /// A directly selectable page number.
    Page(u32),
    /// Visual ellipsis between page ranges.
    Gap,
    /// The jump-to-page control.
    Jump,
}

/// Returns the slots for a pager over `total_pages` pages.
///
/// Short ranges list every page. Longer ranges show the first three and the
/// last three pages with a jump control in between, so the bar has a fixed
/// width no matter how many pages exist.
pub fn pager_slots(total_pages: u32) -> Vec<PagerSlot> {
    let total = total_pages.max(1);
    if total <= 6 {
        return (1..=total).map(PagerSlot::Page).collect();
    }

    vec![
        PagerSlot::Page(1),
        PagerSlot::Page(2),
        PagerSlot::Page(3),
        PagerSlot::Gap,
        PagerSlot::Jump,
        PagerSlot::Gap,
        PagerSlot::Page(total - 2),
        PagerSlot::Page(total - 1),
        PagerSlot::Page(total),
    ]
}

/// Clamps a 1-based page number into the valid range for `total_pages`.
pub fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A single page yields a single slot; zero pages behave like one.
    #[test]
    fn test_single_page() {
        assert_eq!(pager_slots(1), vec![PagerSlot::Page(1)]);
        assert_eq!(pager_slots(0), vec![PagerSlot::Page(1)]);
    }

    /// Up to six pages are listed in full, without gaps or a jump control.
    #[test]
    fn test_short_range_lists_every_page() {
        let slots = pager_slots(6);
        assert_eq!(
            slots,
            (1..=6).map(PagerSlot::Page).collect::<Vec<_>>()
        );

        let slots = pager_slots(4);
        assert_eq!(slots.len(), 4);
        assert!(!slots.contains(&PagerSlot::Gap));
        assert!(!slots.contains(&PagerSlot::Jump));
    }

    /// Seven pages is the first count that collapses the middle.
    #[test]
    fn test_seven_pages_collapse() {
        assert_eq!(
            pager_slots(7),
            vec![
                PagerSlot::Page(1),
                PagerSlot::Page(2),
                PagerSlot::Page(3),
                PagerSlot::Gap,
                PagerSlot::Jump,
                PagerSlot::Gap,
                PagerSlot::Page(5),
                PagerSlot::Page(6),
                PagerSlot::Page(7),
            ]
        );
    }

    /// Large page counts keep the fixed nine-slot layout.
    #[test]
    fn test_large_range_fixed_layout() {
        let slots = pager_slots(50);
        assert_eq!(slots.len(), 9);
        assert_eq!(slots[0], PagerSlot::Page(1));
        assert_eq!(slots[4], PagerSlot::Jump);
        assert_eq!(slots[8], PagerSlot::Page(50));
    }

    /// Page clamping stays within [1, total].
    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 5), 1);
        assert_eq!(clamp_page(3, 5), 3);
        assert_eq!(clamp_page(9, 5), 5);
        assert_eq!(clamp_page(1, 0), 1);
    }
}
