//! Resource abstraction layer
//!
//! # Architecture
//!
//! - [`fetcher`] - Runs paginated aggregator queries and decodes rows
//! - [`extract`] - Configuration payload decoding and the `Name` tag
//! - [`filter`] - Search parameters and substring matching
//! - [`kinds`] - Per-kind records, typed configurations and query functions
//! - [`enrich`] - IAM user enrichment
//! - [`registry`] - Display metadata loaded from embedded JSON
//!
//! # Example
//!
//! ```ignore
//! use cfgview::resource::{ResourceKind, SearchParams};
//!
//! async fn web_servers(clients: &cfgview::aws::client::AwsClients) -> anyhow::Result<usize> {
//!     let mut params = SearchParams::default();
//!     params.name = Some("web".into());
//!     Ok(ResourceKind::Ec2.query(clients, &params).await?.len())
//! }
//! ```

pub mod enrich;
pub mod extract;
pub mod fetcher;
pub mod filter;
mod kind;
pub mod kinds;
pub mod registry;

pub use fetcher::{execute_query, QueryBatch, RawResource};
pub use filter::SearchParams;
pub use kind::ResourceKind;
pub use registry::{get_resource, list_resources};
