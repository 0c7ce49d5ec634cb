//! sharing-client - an async client for the Delta Sharing protocol.
//!
//! This library provides functionality to:
//! - Read a sharing profile (`*.share`) from disk
//! - List every table the profile can see
//! - Load a whole table into memory as a [`DataFrame`]
//!
//! # Example
//!
//! ```no_run
//! use sharing_client::DeltaSharingClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DeltaSharingClient::default();
//!
//!     for table in client.list_all_tables_at("config.share").await? {
//!         println!("{}", table);
//!     }
//!
//!     let frame = client.load_as_frame("config.share#share.schema.table").await?;
//!     println!("{} rows", frame.num_rows());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod frame;
pub mod models;
pub mod profile;
pub mod url;

// Re-exports for convenience
pub use client::DeltaSharingClient;
pub use error::{ClientError, Result};
pub use frame::DataFrame;
pub use models::{Share, Table};
pub use profile::Profile;
pub use url::{parse_table_url, table_url};
