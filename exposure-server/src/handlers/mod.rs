//! HTTP handlers

pub mod health;
pub mod scans;
pub mod flows;
pub mod records;
pub mod simulations;
