//! Core types used throughout mipilib.

use std::fmt;

/// Selector for which bus instance a transaction targets.
///
/// Multi-site test programs instantiate one bus per site; a negative value
/// selects the single shared bus used by bench setups with one device under
/// test. The selector is formatted into the transport's site-list argument
/// by [`site_list`](BusNumber::site_list) and is otherwise opaque to the
/// codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusNumber(i32);

impl BusNumber {
    /// The single shared bus (bench setups, no per-site addressing).
    pub const SHARED: BusNumber = BusNumber(-1);

    /// Create a per-site bus selector for the given site index.
    pub fn site(index: u16) -> Self {
        BusNumber(i32::from(index))
    }

    /// Create a selector from a raw bus number (negative means shared).
    pub fn from_raw(raw: i32) -> Self {
        BusNumber(raw)
    }

    /// Return the raw bus number.
    pub fn raw(&self) -> i32 {
        self.0
    }

    /// Returns `true` if this selector addresses the shared bus.
    pub fn is_shared(&self) -> bool {
        self.0 < 0
    }

    /// Format this selector as a pattern-engine site list.
    ///
    /// The shared bus formats as the empty string (all sites); a per-site
    /// bus formats as `"siteN"`.
    pub fn site_list(&self) -> String {
        if self.0 < 0 {
            String::new()
        } else {
            format!("site{}", self.0)
        }
    }
}

impl fmt::Display for BusNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_shared() {
            write!(f, "shared")
        } else {
            write!(f, "site{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_bus_site_list_is_empty() {
        assert_eq!(BusNumber::SHARED.site_list(), "");
        assert!(BusNumber::SHARED.is_shared());
    }

    #[test]
    fn per_site_bus_site_list() {
        assert_eq!(BusNumber::site(0).site_list(), "site0");
        assert_eq!(BusNumber::site(3).site_list(), "site3");
        assert!(!BusNumber::site(3).is_shared());
    }

    #[test]
    fn raw_round_trip() {
        assert_eq!(BusNumber::from_raw(-1), BusNumber::SHARED);
        assert_eq!(BusNumber::from_raw(2).raw(), 2);
        assert!(BusNumber::from_raw(-5).is_shared());
    }

    #[test]
    fn display() {
        assert_eq!(BusNumber::SHARED.to_string(), "shared");
        assert_eq!(BusNumber::site(1).to_string(), "site1");
    }
}
