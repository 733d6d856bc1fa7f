//! Account roles and password hashing.

mod password;

pub use password::{
    MIN_PASSWORD_LEN, PasswordError, hash_password, validate_password, verify_password,
};

use serde::{Deserialize, Serialize};

/// Role attached to a login account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Tea farmer. Sees only their own records.
    Supplier,
    /// Logistics driver. Records leaf collections and shares location.
    Driver,
    /// Factory office staff. Full access.
    Admin,
}

impl AccountRole {
    /// Returns the string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Driver => "driver",
            Self::Admin => "admin",
        }
    }

    /// Parses a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "supplier" => Some(Self::Supplier),
            "driver" => Some(Self::Driver),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns true if this role can record, edit and delete leaf collections.
    #[must_use]
    pub const fn can_record_collections(&self) -> bool {
        matches!(self, Self::Driver | Self::Admin)
    }

    /// Returns true if this role can read any supplier's collections.
    #[must_use]
    pub const fn can_view_all_collections(&self) -> bool {
        matches!(self, Self::Driver | Self::Admin)
    }

    /// Returns true if this role can approve loans, advances, orders and settlements.
    #[must_use]
    pub const fn can_manage_finance(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
