//! Postgres enum types and their mapping to the core domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tealeaf_core::{auth, deduction, order, settlement};

/// `account_role` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_role")]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Supplier login.
    #[sea_orm(string_value = "supplier")]
    Supplier,
    /// Driver login.
    #[sea_orm(string_value = "driver")]
    Driver,
    /// Office staff.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// `loan_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "loan_status")]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Requested.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid out.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Fully settled.
    #[sea_orm(string_value = "successful")]
    Successful,
}

/// `advance_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "advance_status")]
#[serde(rename_all = "snake_case")]
pub enum AdvanceStatus {
    /// Outstanding.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Recovered.
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

/// `product_kind` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "product_kind")]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Fertilizer bags.
    #[sea_orm(string_value = "fertilizer")]
    Fertilizer,
    /// Tea packets.
    #[sea_orm(string_value = "tea_packet")]
    TeaPacket,
}

/// `order_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "order_status")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Placed.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Dispatched.
    #[sea_orm(string_value = "delivered")]
    Delivered,
    /// Confirmed, stock consumed.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Withdrawn.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// `settlement_status` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "settlement_status")]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Created.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Payout in progress.
    #[sea_orm(string_value = "processing")]
    Processing,
    /// Paid.
    #[sea_orm(string_value = "transferred")]
    Transferred,
}

// Each pair below is a 1:1 mapping between the stored enum and the domain enum.
macro_rules! map_enum {
    ($db:ident <=> $core:path { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $core {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$core> for $db {
            fn from(value: $core) -> Self {
                type Core = $core;
                match value {
                    $(Core::$variant => Self::$variant,)+
                }
            }
        }
    };
}

map_enum!(AccountRole <=> auth::AccountRole { Supplier, Driver, Admin });
map_enum!(LoanStatus <=> deduction::LoanStatus { Pending, Approved, Successful });
map_enum!(AdvanceStatus <=> deduction::AdvanceStatus { Pending, Transferred });
map_enum!(ProductKind <=> order::ProductKind { Fertilizer, TeaPacket });
map_enum!(OrderStatus <=> order::OrderStatus { Pending, Delivered, Completed, Cancelled });
map_enum!(SettlementStatus <=> settlement::SettlementStatus { Pending, Processing, Transferred });
