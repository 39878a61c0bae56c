use core::cell::Cell;

/// Counts clicks on the demo button. The first click reads 1.
#[derive(Debug)]
pub struct ClickCounter {
    next: Cell<u32>,
}

impl ClickCounter {
    pub const fn new() -> Self {
        Self { next: Cell::new(1) }
    }

    /// Registers a click and returns the value to display.
    pub fn click(&self) -> u32 {
        let count = self.next.get();
        self.next.set(count.wrapping_add(1));
        count
    }

    /// Number of clicks registered so far
    pub fn clicks(&self) -> u32 {
        self.next.get().wrapping_sub(1)
    }
}

impl Default for ClickCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_first_click_shows_one() {
        let counter = ClickCounter::new();
        assert_eq!(counter.clicks(), 0);
        assert_eq!(counter.click(), 1);
        assert_eq!(counter.clicks(), 1);
    }

    #[test]
    fn test_value_matches_number_of_clicks() {
        let counter = ClickCounter::default();
        for expected in 1..=1000u32 {
            let shown = format!("{}", counter.click());
            assert_eq!(shown, format!("{}", expected));
        }
        assert_eq!(counter.clicks(), 1000);
    }
}
