//! cfgview - search AWS Config aggregator data across accounts and regions
//!
//! The crate is split into:
//!
//! - [`aws`] - AWS clients (Config aggregator, IAM) behind injectable traits
//! - [`resource`] - query executor, per-kind extraction and filtering
//! - [`server`] - HTTP handlers and JSON envelopes
//! - [`ui`] - embedded browser UI
//! - [`config`] - runtime configuration

pub mod aws;
pub mod config;
pub mod resource;
pub mod server;
pub mod ui;
