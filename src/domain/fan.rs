//! Fan domain types
//!
//! A fan is a cluster of SMC registers sharing an index: current, minimum,
//! maximum and target speed, plus the manual-mode flag. The invariant
//! `min_rpm <= target_rpm <= max_rpm` holds from enumeration onward and is
//! re-enforced on every target mutation.

use serde::Serialize;

/// Current-speed register for fan `index` ("F{i}Ac")
pub fn actual_key(index: usize) -> String {
    format!("F{index}Ac")
}

/// Minimum-speed register for fan `index` ("F{i}Mn")
pub fn min_key(index: usize) -> String {
    format!("F{index}Mn")
}

/// Maximum-speed register for fan `index` ("F{i}Mx")
pub fn max_key(index: usize) -> String {
    format!("F{index}Mx")
}

/// Target-speed register for fan `index` ("F{i}Tg")
pub fn target_key(index: usize) -> String {
    format!("F{index}Tg")
}

/// Manual-mode register for fan `index` ("F{i}Md")
pub fn mode_key(index: usize) -> String {
    format!("F{index}Md")
}

/// One controllable fan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fan {
    /// Zero-based fan index, shared with its register names
    pub id: usize,
    /// Display name ("Fan 1", ...)
    pub name: String,
    /// Last observed speed in RPM
    pub current_rpm: f64,
    /// Hardware minimum in RPM (post-repair, see [`Fan::new`])
    pub min_rpm: f64,
    /// Hardware maximum in RPM (post-repair)
    pub max_rpm: f64,
    /// Requested speed in RPM, always within [min_rpm, max_rpm]
    pub target_rpm: f64,
    /// Whether the fan is under manual control
    pub manual: bool,
}

impl Fan {
    /// Build a fan from raw register readings, enforcing the invariant
    ///
    /// Some controllers report equal or inverted min/max (commonly 0/0);
    /// in that case the max is repaired to `max(min + 1000, 6000)` so the
    /// range stays usable. The target is then clamped into [min, max].
    pub fn new(id: usize, current: f64, min: f64, max: f64, target: f64) -> Self {
        let max = if max <= min {
            (min + 1000.0).max(6000.0)
        } else {
            max
        };
        let target = target.clamp(min, max);

        Self {
            id,
            name: format!("Fan {}", id + 1),
            current_rpm: current,
            min_rpm: min,
            max_rpm: max,
            target_rpm: target,
            manual: false,
        }
    }

    /// Set the target speed, clamped into the fan's bounds
    ///
    /// Returns the clamped value actually stored.
    pub fn set_target(&mut self, rpm: f64) -> f64 {
        self.target_rpm = rpm.clamp(self.min_rpm, self.max_rpm);
        self.target_rpm
    }

    /// Whether the invariant currently holds (used by tests and asserts)
    pub fn bounds_valid(&self) -> bool {
        self.min_rpm <= self.target_rpm && self.target_rpm <= self.max_rpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_key_names() {
        assert_eq!(actual_key(0), "F0Ac");
        assert_eq!(min_key(1), "F1Mn");
        assert_eq!(max_key(2), "F2Mx");
        assert_eq!(target_key(0), "F0Tg");
        assert_eq!(mode_key(3), "F3Md");
    }

    #[test]
    fn test_healthy_bounds_untouched() {
        let fan = Fan::new(0, 1500.0, 1200.0, 6000.0, 2000.0);
        assert_eq!(fan.min_rpm, 1200.0);
        assert_eq!(fan.max_rpm, 6000.0);
        assert_eq!(fan.target_rpm, 2000.0);
        assert!(fan.bounds_valid());
    }

    #[test]
    fn test_zero_bounds_repaired() {
        // min=0, max=0 must yield a usable range with max >= 6000
        let fan = Fan::new(0, 0.0, 0.0, 0.0, 0.0);
        assert!(fan.max_rpm >= 6000.0);
        assert!(fan.bounds_valid());
    }

    #[test]
    fn test_inverted_bounds_repaired() {
        let fan = Fan::new(0, 0.0, 5500.0, 4000.0, 0.0);
        assert_eq!(fan.max_rpm, 6500.0);
        assert_eq!(fan.target_rpm, 5500.0);
        assert!(fan.bounds_valid());
    }

    #[test]
    fn test_target_clamped_on_construction() {
        let fan = Fan::new(0, 0.0, 1200.0, 6000.0, 9999.0);
        assert_eq!(fan.target_rpm, 6000.0);

        let fan = Fan::new(0, 0.0, 1200.0, 6000.0, 100.0);
        assert_eq!(fan.target_rpm, 1200.0);
    }

    #[test]
    fn test_set_target_clamps() {
        let mut fan = Fan::new(0, 0.0, 1200.0, 6000.0, 1200.0);
        assert_eq!(fan.set_target(4000.0), 4000.0);
        assert_eq!(fan.set_target(12000.0), 6000.0);
        assert_eq!(fan.set_target(0.0), 1200.0);
        assert!(fan.bounds_valid());
    }

    #[test]
    fn test_display_name_is_one_based() {
        assert_eq!(Fan::new(0, 0.0, 0.0, 0.0, 0.0).name, "Fan 1");
        assert_eq!(Fan::new(2, 0.0, 0.0, 0.0, 0.0).name, "Fan 3");
    }
}
