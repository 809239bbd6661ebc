//! Ordergate - Sales Order API with Per-Client Admission Control
//!
//! This crate implements a small REST API over an in-memory store of ERP
//! sales orders. Every non-diagnostic request passes a per-client
//! fixed-window admission limiter before authentication and routing.

pub mod config;
pub mod error;
pub mod http;
pub mod orders;
pub mod ratelimit;
