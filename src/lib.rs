//! Vitalwatch core library
//!
//! Patient vital-sign monitoring: a generator/evaluator loop that feeds a
//! remote key-value store, and an aggregation/serving layer that exposes
//! per-patient history and unresolved alerts with outbound notification.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod error;
pub mod generator;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod store;
pub mod thresholds;
