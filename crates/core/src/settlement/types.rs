//! Settlement data types.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::SettlementError;

/// Flat transport fee applied to every settlement.
pub const DEFAULT_TRANSPORT_CHARGE: Decimal = Decimal::ONE_HUNDRED;

/// Settlement status.
///
/// Moves forward only: Pending → Processing → Transferred, or straight
/// from Pending to Transferred. Transferred is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Created, not yet paid out.
    Pending,
    /// Payout in progress.
    Processing,
    /// Paid to the supplier.
    #[serde(alias = "completed")]
    Transferred,
}

impl SettlementStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Transferred => "transferred",
        }
    }

    /// Parses a status, accepting `completed` as an alias of `transferred`.
    pub fn parse(s: &str) -> Result<Self, SettlementError> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "transferred" | "completed" => Ok(Self::Transferred),
            _ => Err(SettlementError::UnknownStatus(s.to_string())),
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Transferred)
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed settlement figures.
///
/// `final_total` is always derived from the components and may be
/// negative, meaning the supplier owes the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    /// Income from leaf collections.
    pub gross_income: Decimal,
    /// Outstanding loan principal.
    pub loan_amount: Decimal,
    /// Outstanding advances.
    pub advance_amount: Decimal,
    /// Completed product orders.
    pub products_amount: Decimal,
    /// Flat transport fee.
    pub transport_charge: Decimal,
    /// Net payable amount.
    pub final_total: Decimal,
}

impl SettlementBreakdown {
    /// Builds a breakdown and derives `final_total`.
    #[must_use]
    pub fn from_components(
        gross_income: Decimal,
        loan_amount: Decimal,
        advance_amount: Decimal,
        products_amount: Decimal,
        transport_charge: Decimal,
    ) -> Self {
        Self {
            gross_income,
            loan_amount,
            advance_amount,
            products_amount,
            transport_charge,
            final_total: gross_income
                - loan_amount
                - advance_amount
                - products_amount
                - transport_charge,
        }
    }

    /// Rounds every component to cents and re-derives the final total.
    #[must_use]
    pub fn rounded_to_cents(&self) -> Self {
        let cents =
            |v: Decimal| v.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self::from_components(
            cents(self.gross_income),
            cents(self.loan_amount),
            cents(self.advance_amount),
            cents(self.products_amount),
            cents(self.transport_charge),
        )
    }

    /// Total of every deduction including transport.
    #[must_use]
    pub fn total_deductions(&self) -> Decimal {
        self.loan_amount + self.advance_amount + self.products_amount + self.transport_charge
    }
}

/// Caller supplied replacements for computed components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOverrides {
    /// Replaces the computed gross income.
    #[serde(alias = "grossIncome")]
    pub gross_income: Option<Decimal>,
    /// Replaces the computed loan deduction.
    #[serde(alias = "loanAmount")]
    pub loan_amount: Option<Decimal>,
    /// Replaces the computed advance deduction.
    #[serde(alias = "advanceAmount")]
    pub advance_amount: Option<Decimal>,
    /// Replaces the computed products deduction.
    #[serde(alias = "productsAmount")]
    pub products_amount: Option<Decimal>,
    /// Replaces the configured transport charge.
    #[serde(alias = "transportCharge")]
    pub transport_charge: Option<Decimal>,
}

impl SettlementOverrides {
    /// Returns true if no component is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.gross_income.is_none()
            && self.loan_amount.is_none()
            && self.advance_amount.is_none()
            && self.products_amount.is_none()
            && self.transport_charge.is_none()
    }
}

/// Settlement policy loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementPolicy {
    /// Flat fee per settlement.
    pub transport_charge: Decimal,
}

impl SettlementPolicy {
    /// Creates a policy, rejecting a negative transport charge.
    pub fn new(transport_charge: Decimal) -> Result<Self, SettlementError> {
        if transport_charge < Decimal::ZERO {
            return Err(SettlementError::NegativeTransportCharge);
        }
        Ok(Self { transport_charge })
    }
}

impl Default for SettlementPolicy {
    fn default() -> Self {
        Self {
            transport_charge: DEFAULT_TRANSPORT_CHARGE,
        }
    }
}
