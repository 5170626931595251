//! Screen identifiers.

use std::fmt;

/// Primary screens, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Appliances, // 1
    Requests, // 2
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 2] = [Self::Appliances, Self::Requests];

    pub fn number(self) -> u8 {
        match self {
            Self::Appliances => 1,
            Self::Requests => 2,
        }
    }

    /// Screen for a number key. None when out of range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Appliances),
            2 => Some(Self::Requests),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Appliances => "Appliances",
            Self::Requests => "Requests",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Appliances.next(), ScreenId::Requests);
        assert_eq!(ScreenId::Requests.next(), ScreenId::Appliances);
        assert_eq!(ScreenId::Appliances.prev(), ScreenId::Requests);
    }

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(9), None);
    }
}
