//! Anger state tracking across samples

/// Remembers whether the previous sample was angry.
#[derive(Debug, Clone, Default)]
pub struct AngerTracker {
    was_angry_before: bool,
}

impl AngerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this sample's state; true on a false -> true transition
    pub fn observe(&mut self, is_angry: bool) -> bool {
        let rising = is_angry && !self.was_angry_before;
        self.was_angry_before = is_angry;
        rising
    }

    pub fn was_angry_before(&self) -> bool {
        self.was_angry_before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_edge_per_angry_run() {
        let mut tracker = AngerTracker::new();
        let edges: Vec<bool> = [false, true, true, true, false, true]
            .into_iter()
            .map(|angry| tracker.observe(angry))
            .collect();

        assert_eq!(edges, vec![false, true, false, false, false, true]);
        assert!(tracker.was_angry_before());
    }

    #[test]
    fn test_starts_calm() {
        let mut tracker = AngerTracker::new();
        assert!(!tracker.was_angry_before());
        assert!(tracker.observe(true));
    }
}
