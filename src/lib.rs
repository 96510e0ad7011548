//! # TeamCity build queue client
//!
//! A Rust client for the build queue part of the TeamCity REST API: put a
//! build in the queue, then look it up again to follow its state.
//!
//! ## Example
//!
//! ```no_run
//! use teamcity_queue::{Credentials, TeamCityClient, TriggerBuildRequestBuilder};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TeamCityClient::new("http://localhost:8111", Credentials::token("t0k3n"))?;
//!
//!     let request = TriggerBuildRequestBuilder::new("Project_Build")
//!         .branch("main")
//!         .property("env.DEPLOY", "false")
//!         .build();
//!
//!     let queued = client.build_queue().trigger_build(&request).await?;
//!     let latest = client.build_queue().get_queued_build(&queued.get_id()).await?;
//!     println!("Build {} is {}", latest.id, latest.state);
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod locator;
pub mod queue;
pub mod types;

pub use builder::TriggerBuildRequestBuilder;
pub use client::TeamCityClient;
pub use config::{ClientConfig, Credentials};
pub use error::{Result, TeamCityError};
pub use locator::Locator;
pub use queue::QueueService;
pub use types::{
    BuildTypeReference, Properties, Property, PropertyType, QueueTriggered, QueuedBuild,
    TriggerBuildRequest,
};
