//! Configuration for a sandbox instance.

use crate::ident;
use crate::seed::SeedData;

/// Default image tag; pinned to the stable MySQL major.
pub const DEFAULT_IMAGE: &str = "mysql:8";

/// Default database created inside the sandbox.
pub const DEFAULT_DATABASE: &str = "testing";

/// Root credential policy for the MySQL server.
///
/// Exactly one variant is active at a time; the Docker image's implicit
/// flag precedence (explicit > random > empty) is resolved here at the type
/// level instead of by conditional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RootCredential {
    /// Allow root to connect with no password. The default.
    #[default]
    Empty,
    /// Let the engine generate a random root password. It is printed in the
    /// container logs, not known to this library, so the connection URL
    /// carries no credential.
    Random,
    /// Caller-supplied root password.
    Password(String),
}

impl RootCredential {
    /// Translate the policy into the MySQL image's environment signal.
    pub(crate) fn env_var(&self) -> String {
        match self {
            Self::Empty => "MYSQL_ALLOW_EMPTY_PASSWORD=1".to_string(),
            Self::Random => "MYSQL_RANDOM_ROOT_PASSWORD=1".to_string(),
            Self::Password(p) => format!("MYSQL_ROOT_PASSWORD={p}"),
        }
    }

    /// Password to embed in the connection URL, if any is known.
    pub(crate) fn url_password(&self) -> &str {
        match self {
            Self::Password(p) => p,
            Self::Empty | Self::Random => "",
        }
    }
}

/// Settings bundle for one sandbox.
///
/// Every field is optional or defaulted; an all-default config provisions a
/// `mysql:8` container with an empty root password and an ephemeral port.
#[derive(Debug, Default)]
pub struct SandboxConfig {
    /// Image reference. Defaults to [`DEFAULT_IMAGE`].
    pub image: Option<String>,
    /// Database created inside the sandbox. Defaults to [`DEFAULT_DATABASE`].
    pub database: Option<String>,
    /// Container name. Defaults to a generated `mysql-sandbox-{id}` name.
    pub name: Option<String>,
    /// Root credential policy.
    pub credential: RootCredential,
    /// Published host port; 0 asks the runtime to assign one.
    pub port: u16,
    /// SQL run by the engine on first boot.
    pub seed: Option<SeedData>,
    /// Tables that [`reset_all_tables`](crate::SandboxHandle::reset_all_tables)
    /// leaves untouched.
    pub skip_reset_tables: Vec<String>,
}

/// A config with every field filled in. Internal to provisioning.
#[derive(Debug)]
pub(crate) struct ResolvedConfig {
    pub image: String,
    pub database: String,
    pub name: String,
    pub credential: RootCredential,
    pub port: u16,
    pub seed: Option<SeedData>,
    pub skip_reset_tables: Vec<String>,
}

impl SandboxConfig {
    /// Fill unset fields with their defaults. Never overwrites caller-supplied
    /// values; no I/O beyond identifier generation for the default name.
    pub(crate) fn resolve(self) -> ResolvedConfig {
        ResolvedConfig {
            image: self.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
            database: self
                .database
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            name: self
                .name
                .unwrap_or_else(|| format!("mysql-sandbox-{}", ident::next())),
            credential: self.credential,
            port: self.port,
            seed: self.seed,
            skip_reset_tables: self.skip_reset_tables,
        }
    }
}
