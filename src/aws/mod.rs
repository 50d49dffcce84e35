//! AWS API interaction module
//!
//! # Module Structure
//!
//! - [`aggregator`] - AWS Config aggregator advanced queries
//! - [`identity`] - IAM lookups for user enrichment
//! - [`client`] - SDK configuration and shared client construction
//! - [`error`] - Operator-facing error messages
//!
//! # Example
//!
//! ```ignore
//! use cfgview::aws::client::AwsClients;
//!
//! async fn example() {
//!     let clients = AwsClients::new("org-aggregator", "ap-northeast-1").await;
//!     let page = clients
//!         .aggregator
//!         .select_page("SELECT resourceId WHERE resourceType = 'AWS::EC2::VPC'", 100, None)
//!         .await;
//! }
//! ```

pub mod aggregator;
pub mod client;
pub mod error;
pub mod identity;
