//! Error types for sandbox provisioning and teardown.

use std::time::Duration;

use thiserror::Error;

/// Result type for sandbox operations.
pub type Result<T> = std::result::Result<T, SandboxError>;

/// Errors that can occur while provisioning, using, or tearing down a sandbox.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// Invalid or contradictory configuration.
    #[error("sandbox configuration error: {reason}")]
    Config {
        /// Reason for the error.
        reason: String,
    },

    /// Reading the seed source or writing the transient seed file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Docker is not available.
    #[error("Docker not available: {reason}")]
    DockerNotAvailable {
        /// Reason why Docker is unavailable.
        reason: String,
    },

    /// Failed to pull the image.
    #[error("failed to pull image '{image}': {reason}")]
    ImagePull {
        /// Image name.
        image: String,
        /// Reason for failure.
        reason: String,
    },

    /// The backend rejected container creation or start, or the engine
    /// exited before becoming ready.
    #[error("failed to provision sandbox '{name}': {reason}")]
    Provisioning {
        /// Sandbox container name.
        name: String,
        /// Reason for failure.
        reason: String,
    },

    /// No host port binding was reported for the engine port after start.
    #[error("sandbox '{name}' reported no bound host port for 3306/tcp")]
    PortDiscovery {
        /// Sandbox container name.
        name: String,
    },

    /// The engine never accepted connections within the readiness deadline.
    ///
    /// Usually environmental (slow host, cold image) rather than a logic bug.
    #[error("MySQL in sandbox '{name}' not reachable within {timeout:?}")]
    ReadinessTimeout {
        /// Sandbox container name.
        name: String,
        /// Overall readiness deadline that elapsed.
        timeout: Duration,
    },

    /// The stop request failed.
    #[error("failed to stop sandbox '{name}': {reason}")]
    Teardown {
        /// Sandbox container name.
        name: String,
        /// Reason for failure.
        reason: String,
    },

    /// Enumerating tables from the catalog failed. Fatal to both reset
    /// operations.
    #[error("failed to enumerate tables: {source}")]
    TableEnumeration {
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// Truncating a single table failed. Fatal to `reset_all_tables` only.
    #[error("failed to truncate table `{table}`: {source}")]
    Truncate {
        /// Table that failed to truncate.
        table: String,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// An operation was invoked on a handle that was never provisioned.
    #[error("sandbox handle is not provisioned; did provisioning fail?")]
    InvalidHandle,
}
