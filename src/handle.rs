//! Caller-facing handle to a provisioned sandbox.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use bollard::Docker;
use bollard::container::StopContainerOptions;
use bollard::errors::Error as DockerError;
use sqlx::mysql::MySqlPool;

use crate::config::ResolvedConfig;
use crate::error::{Result, SandboxError};
use crate::log::LogBuffer;
use crate::manager::SandboxState;

/// A live sandbox: the connection pool, the assigned endpoint, the container
/// identity, and the teardown capability.
///
/// Returned only by [`SandboxManager::provision`]; the manager keeps no
/// reference after handoff. [`stop`](Self::stop) uses nothing outside the
/// handle, so it stays callable from deferred cleanup even when the caller
/// unwound right after provisioning.
///
/// An *unprovisioned* handle ([`SandboxHandle::unprovisioned`], also the
/// `Default`) exists for cleanup paths that run unconditionally: every
/// operation on it reports [`SandboxError::InvalidHandle`] instead of
/// panicking.
///
/// [`SandboxManager::provision`]: crate::SandboxManager::provision
#[derive(Default)]
pub struct SandboxHandle {
    inner: Option<HandleInner>,
}

impl std::fmt::Debug for SandboxHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.inner {
            Some(inner) => f
                .debug_struct("SandboxHandle")
                .field("name", &inner.name)
                .field("database", &inner.database)
                .field("port", &inner.port)
                .finish_non_exhaustive(),
            None => f.write_str("SandboxHandle(unprovisioned)"),
        }
    }
}

pub(crate) struct HandleInner {
    pub(crate) docker: Docker,
    pub(crate) log: LogBuffer,
    pub(crate) pool: MySqlPool,
    pub(crate) url: String,
    pub(crate) name: String,
    pub(crate) container_id: String,
    pub(crate) database: String,
    pub(crate) port: u16,
    pub(crate) skip_reset_tables: Vec<String>,
    stop_grace: Duration,
    stopped: AtomicBool,
}

impl SandboxHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn provisioned(
        docker: Docker,
        log: LogBuffer,
        pool: MySqlPool,
        url: String,
        cfg: &ResolvedConfig,
        container_id: String,
        port: u16,
        stop_grace: Duration,
    ) -> Self {
        Self {
            inner: Some(HandleInner {
                docker,
                log,
                pool,
                url,
                name: cfg.name.clone(),
                container_id,
                database: cfg.database.clone(),
                port,
                skip_reset_tables: cfg.skip_reset_tables.clone(),
                stop_grace,
                stopped: AtomicBool::new(false),
            }),
        }
    }

    /// A handle that was never provisioned. All operations on it fail with
    /// [`SandboxError::InvalidHandle`].
    pub fn unprovisioned() -> Self {
        Self::default()
    }

    pub(crate) fn inner(&self) -> Result<&HandleInner> {
        self.inner.as_ref().ok_or(SandboxError::InvalidHandle)
    }

    /// The connection pool into the sandbox database.
    pub fn pool(&self) -> Result<&MySqlPool> {
        Ok(&self.inner()?.pool)
    }

    /// The root connection URL.
    pub fn url(&self) -> Result<&str> {
        Ok(self.inner()?.url.as_str())
    }

    /// The container name.
    pub fn container_name(&self) -> Result<&str> {
        Ok(self.inner()?.name.as_str())
    }

    /// The container id assigned by the runtime.
    pub fn container_id(&self) -> Result<&str> {
        Ok(self.inner()?.container_id.as_str())
    }

    /// The database created inside the sandbox.
    pub fn database(&self) -> Result<&str> {
        Ok(self.inner()?.database.as_str())
    }

    /// The host port bound to the engine's 3306/tcp.
    pub fn port(&self) -> Result<u16> {
        Ok(self.inner()?.port)
    }

    /// Stop the sandbox container. Auto-removal attached at creation deletes
    /// it afterwards, so there is nothing else to release.
    ///
    /// Idempotent: a repeat call no-ops, and an "already stopped" or "no such
    /// container" answer from the backend counts as success. On a real stop
    /// failure the handle is re-armed so the call can be retried.
    pub async fn stop(&self) -> Result<()> {
        let inner = self.inner()?;

        if inner.stopped.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        inner.log.record(format!(
            "{}: {}",
            inner.name,
            SandboxState::Stopping
        ));

        // Release pooled connections before the server goes away.
        inner.pool.close().await;

        let options = StopContainerOptions {
            t: inner.stop_grace.as_secs() as i64,
        };

        match inner
            .docker
            .stop_container(&inner.container_id, Some(options))
            .await
        {
            Ok(()) => {}
            // 304: already stopped; 404: already removed (auto-remove raced us).
            Err(DockerError::DockerResponseServerError {
                status_code: 304 | 404,
                ..
            }) => {}
            Err(e) => {
                inner.stopped.store(false, Ordering::SeqCst);
                return Err(SandboxError::Teardown {
                    name: inner.name.clone(),
                    reason: e.to_string(),
                });
            }
        }

        inner
            .log
            .record(format!("{}: {}", inner.name, SandboxState::Stopped));
        tracing::info!(sandbox = %inner.name, "sandbox stopped");
        Ok(())
    }
}
