//! Role capability gates.
//!
//! The same capability governs both sides of the approval queue: seeing
//! pending items and deciding them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User role at the masjid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Caretaker; manages the TV display and physical assets.
    Marbot,
    /// Treasurer; records income and expenses.
    Bendahara,
    /// Chairperson; reviews large expenses.
    Ketua,
    /// Full administrative access.
    SuperAdmin,
}

impl Role {
    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marbot => "marbot",
            Self::Bendahara => "bendahara",
            Self::Ketua => "ketua",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "marbot" => Some(Self::Marbot),
            "bendahara" => Some(Self::Bendahara),
            "ketua" => Some(Self::Ketua),
            "super_admin" => Some(Self::SuperAdmin),
            _ => None,
        }
    }

    /// May this role approve or reject pending transactions, and view
    /// the approval queue?
    #[must_use]
    pub fn can_approve(&self) -> bool {
        matches!(self, Self::Ketua | Self::SuperAdmin)
    }

    /// May this role record and delete transactions?
    #[must_use]
    pub fn can_manage_finance(&self) -> bool {
        matches!(self, Self::Bendahara | Self::SuperAdmin)
    }

    /// May this role manage slides, assets, and agendas?
    #[must_use]
    pub fn can_manage_operations(&self) -> bool {
        matches!(self, Self::Marbot | Self::SuperAdmin)
    }

    /// May this role see the executive dashboard?
    #[must_use]
    pub fn can_view_executive_dashboard(&self) -> bool {
        matches!(self, Self::Ketua | Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Marbot, Role::Bendahara, Role::Ketua, Role::SuperAdmin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("KETUA"), Some(Role::Ketua));
        assert_eq!(Role::parse("imam"), None);
    }

    #[test]
    fn test_approval_capability() {
        assert!(Role::Ketua.can_approve());
        assert!(Role::SuperAdmin.can_approve());
        assert!(!Role::Bendahara.can_approve());
        assert!(!Role::Marbot.can_approve());
    }

    #[test]
    fn test_finance_capability() {
        assert!(Role::Bendahara.can_manage_finance());
        assert!(Role::SuperAdmin.can_manage_finance());
        assert!(!Role::Ketua.can_manage_finance());
        assert!(!Role::Marbot.can_manage_finance());
    }

    #[test]
    fn test_operations_capability() {
        assert!(Role::Marbot.can_manage_operations());
        assert!(Role::SuperAdmin.can_manage_operations());
        assert!(!Role::Bendahara.can_manage_operations());
    }

    #[test]
    fn test_executive_dashboard_capability() {
        assert!(Role::Ketua.can_view_executive_dashboard());
        assert!(Role::SuperAdmin.can_view_executive_dashboard());
        assert!(!Role::Marbot.can_view_executive_dashboard());
    }
}
