//! Deduction data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Loan status.
///
/// Only `Successful` loans (fully settled) are excluded from settlement
/// deductions; every other status counts as outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    /// Requested by the supplier.
    Pending,
    /// Approved and paid out by the office.
    Approved,
    /// Fully settled.
    Successful,
}

impl LoanStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Successful => "successful",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "successful" => Some(Self::Successful),
            _ => None,
        }
    }

    /// Returns true if the loan still counts against settlements.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        !matches!(self, Self::Successful)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advance status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvanceStatus {
    /// Requested, counts against settlements.
    Pending,
    /// Recovered. Excluded from settlement deductions.
    #[serde(alias = "transfered")]
    Transferred,
}

impl AdvanceStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Transferred => "transferred",
        }
    }

    /// Parses a status from a string. Accepts the legacy spelling `transfered`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "transferred" | "transfered" => Some(Self::Transferred),
            _ => None,
        }
    }

    /// Returns true if the advance still counts against settlements.
    #[must_use]
    pub const fn is_outstanding(&self) -> bool {
        !matches!(self, Self::Transferred)
    }
}

impl fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored loan as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanLine {
    /// Principal amount.
    pub principal_amount: Decimal,
    /// Current status.
    pub status: LoanStatus,
}

/// A stored advance as seen by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceLine {
    /// Advance amount.
    pub amount: Decimal,
    /// Current status.
    pub status: AdvanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_status_parse() {
        assert_eq!(LoanStatus::parse("Pending"), Some(LoanStatus::Pending));
        assert_eq!(LoanStatus::parse("SUCCESSFUL"), Some(LoanStatus::Successful));
        assert_eq!(LoanStatus::parse("approved"), Some(LoanStatus::Approved));
        assert_eq!(LoanStatus::parse("paid"), None);
    }

    #[test]
    fn test_advance_status_accepts_legacy_spelling() {
        assert_eq!(
            AdvanceStatus::parse("Transfered"),
            Some(AdvanceStatus::Transferred)
        );
        assert_eq!(
            AdvanceStatus::parse("transferred"),
            Some(AdvanceStatus::Transferred)
        );
        let from_json: AdvanceStatus = serde_json::from_str("\"transfered\"").unwrap();
        assert_eq!(from_json, AdvanceStatus::Transferred);
    }

    #[test]
    fn test_outstanding_rules() {
        assert!(LoanStatus::Pending.is_outstanding());
        assert!(LoanStatus::Approved.is_outstanding());
        assert!(!LoanStatus::Successful.is_outstanding());
        assert!(AdvanceStatus::Pending.is_outstanding());
        assert!(!AdvanceStatus::Transferred.is_outstanding());
    }
}
