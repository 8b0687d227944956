//! Service Record Engine for after-school day services
//!
//! This crate derives one billing/support record per child per day from an
//! attendance event. It resolves the planned service duration from the child's
//! Final support plan, classifies it into a statutory time class, tiers any
//! extension time, applies facility-wide addon defaults, and persists the
//! record exactly once per `(date, userId)`.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod derivation;
pub mod error;
pub mod models;
pub mod store;
