//! Core business logic for Tealeaf.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `collection` - Leaf weighing and gross income aggregation
//! - `deduction` - Loans, advances and outstanding deduction amounts
//! - `order` - Product orders and their stock-consuming lifecycle
//! - `settlement` - Payment settlement composition and status lifecycle
//! - `location` - Driver GPS fixes
//! - `auth` - Account roles and password hashing
//! - `registry` - Supplier and driver register codes

pub mod auth;
pub mod collection;
pub mod deduction;
pub mod location;
pub mod order;
pub mod registry;
pub mod settlement;
