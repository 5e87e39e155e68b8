//! Disposable MySQL servers in Docker for integration tests.
//!
//! [`SandboxManager::provision`] creates a container running MySQL, binds an
//! optional seed script into it, waits until the engine accepts connections,
//! and returns a [`SandboxHandle`] bundling a live [`sqlx`] pool, the
//! assigned endpoint, and the teardown capability. Between tests,
//! [`SandboxHandle::reset_all_tables`] and [`SandboxHandle::reset_tables`]
//! clear table state without restarting the server. The container stops with
//! [`SandboxHandle::stop`] and removes itself (auto-removal is attached at
//! creation), so a stopped sandbox leaves nothing behind.
//!
//! # Example
//!
//! ```rust,no_run
//! use mysql_sandbox::{SandboxConfig, SandboxManager, SeedData};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = SandboxManager::connect().await?;
//!
//! let handle = manager
//!     .provision(SandboxConfig {
//!         seed: Some(SeedData::from_buffer("CREATE TABLE users (id INT);")),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! sqlx::query("INSERT INTO users (id) VALUES (1)")
//!     .execute(handle.pool()?)
//!     .await?;
//!
//! handle.reset_all_tables().await?;
//! handle.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! Independent sandboxes can be provisioned concurrently; they share nothing
//! but the host's Docker daemon.

pub mod config;
pub mod error;
pub mod handle;
pub mod log;
pub mod manager;
pub mod seed;

mod ident;
mod reset;

pub use config::{DEFAULT_DATABASE, DEFAULT_IMAGE, RootCredential, SandboxConfig};
pub use error::{Result, SandboxError};
pub use handle::SandboxHandle;
pub use log::LogBuffer;
pub use manager::{SandboxManager, SandboxState};
pub use seed::SeedData;
