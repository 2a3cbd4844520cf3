//! Advisory checks against the output format's style ceiling

use tracing::{debug, warn};

/// Maximum number of cell formats the XLSX specification permits.
pub const FORMAT_STYLE_CEILING: u64 = 64_000;

/// Outcome of one capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityCheck {
    /// The count that was checked (projected or actual).
    pub count: u64,
    /// The ceiling it was checked against.
    pub ceiling: u64,
    /// Whether the count exceeds the ceiling.
    pub exceeded: bool,
}

/// Computes whether the distinct-color count will, or did, exceed the
/// format's style ceiling. Both checks are advisory: they log a warning
/// and report back, but never abort a run.
#[derive(Debug, Clone, Copy)]
pub struct CapacityGuard {
    ceiling: u64,
}

impl CapacityGuard {
    pub fn new() -> Self {
        CapacityGuard {
            ceiling: FORMAT_STYLE_CEILING,
        }
    }

    /// A guard with a non-standard ceiling (used by tests).
    pub fn with_ceiling(ceiling: u64) -> Self {
        CapacityGuard { ceiling }
    }

    /// Pre-run projection: an upper bound assuming every expected sheet
    /// contributes `colors_per_sheet` previously unseen colors.
    pub fn check_projection(&self, expected_sheets: u64, colors_per_sheet: u64) -> CapacityCheck {
        let projected = expected_sheets.saturating_mul(colors_per_sheet);
        let check = self.check(projected);
        if check.exceeded {
            warn!(
                projected,
                ceiling = self.ceiling,
                "current settings may exceed the maximum number of colors permitted in an XLSX file"
            );
        } else {
            debug!(projected, "projected maximum color usage");
        }
        check
    }

    /// Post-run check of the realized distinct-color count.
    pub fn check_actual(&self, distinct_colors: u64) -> CapacityCheck {
        let check = self.check(distinct_colors);
        if check.exceeded {
            warn!(
                palette_size = distinct_colors,
                ceiling = self.ceiling,
                "palette size exceeds the maximum permitted under the XLSX specification; \
                 the resulting file may not be recognized as a valid XLSX file"
            );
        }
        check
    }

    fn check(&self, count: u64) -> CapacityCheck {
        CapacityCheck {
            count,
            ceiling: self.ceiling,
            exceeded: count > self.ceiling,
        }
    }
}

impl Default for CapacityGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_at_ceiling_passes() {
        let guard = CapacityGuard::new();
        // 64,000 exactly is still conformant
        let check = guard.check_projection(64, 1_000);
        assert_eq!(check.count, 64_000);
        assert!(!check.exceeded);
    }

    #[test]
    fn test_projection_over_ceiling_flags() {
        let guard = CapacityGuard::new();
        let check = guard.check_projection(65, 1_000);
        assert!(check.exceeded);
    }

    #[test]
    fn test_projection_saturates() {
        let guard = CapacityGuard::new();
        let check = guard.check_projection(u64::MAX, 2);
        assert_eq!(check.count, u64::MAX);
        assert!(check.exceeded);
    }

    #[test]
    fn test_actual_boundaries() {
        let guard = CapacityGuard::new();
        assert!(!guard.check_actual(0).exceeded);
        assert!(!guard.check_actual(64_000).exceeded);
        assert!(guard.check_actual(64_001).exceeded);
    }

    #[test]
    fn test_custom_ceiling() {
        let guard = CapacityGuard::with_ceiling(10);
        assert!(!guard.check_actual(10).exceeded);
        assert!(guard.check_actual(11).exceeded);
    }
}
