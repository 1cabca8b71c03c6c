//! Engagerr Rust SDK
//!
//! Client library for the content relationship API: cached reads,
//! mutations that invalidate what they affect, and user-facing
//! notifications for every outcome.
//!
//! # Example
//!
//! ```no_run
//! use engagerr_sdk::{ContentRelationships, SdkConfig};
//! use engagerr_domain::{CreateRelationshipRequest, RelationshipType};
//!
//! # async fn run() -> Result<(), engagerr_sdk::SdkError> {
//! let config = SdkConfig::new("http://localhost:8080", "u1");
//! let sdk = ContentRelationships::connect(&config)?;
//!
//! let created = sdk
//!     .create_relationship(CreateRelationshipRequest::new(
//!         "clip-1",
//!         "episode-42",
//!         RelationshipType::Derivative,
//!     ))
//!     .await?;
//!
//! let family = sdk.get_content_family("episode-42").await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cache;
mod client;
mod config;
mod error;
mod notify;
mod relationships;

pub use cache::{CacheConfig, QueryCache, QueryKey, QueryKind};
pub use client::ApiClient;
pub use config::SdkConfig;
pub use error::{SdkError, GENERIC_FAILURE_MESSAGE};
pub use notify::{MemoryNotifier, TracingNotifier};
pub use relationships::{ContentRelationships, RelationshipSnapshot, SuggestionOutcome};
