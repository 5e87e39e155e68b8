//! Docker-backed integration tests for sandbox provisioning, reset, and
//! teardown.
//!
//! These talk to the local Docker daemon and boot real MySQL containers, so
//! they are `#[ignore]`d by default. Run them with:
//!
//! ```text
//! cargo test --test sandbox -- --ignored
//! ```

use std::time::Duration;

use mysql_sandbox::{
    RootCredential, SandboxConfig, SandboxError, SandboxHandle, SandboxManager, SeedData,
};

/// Schema with a table the tests dirty (`users`) and a table pre-seeded with
/// five rows (`categories`).
const SCHEMA: &str = r#"
CREATE TABLE users
(
    id    INT          NOT NULL,
    email VARCHAR(128) NOT NULL,
    PRIMARY KEY (id)
) ENGINE = InnoDB;

CREATE TABLE categories
(
    id   INT          NOT NULL,
    name VARCHAR(128) NOT NULL,
    PRIMARY KEY (id)
) ENGINE = InnoDB;

INSERT INTO categories (id, name)
VALUES (1, 'books'),
       (2, 'music'),
       (3, 'games'),
       (4, 'tools'),
       (5, 'misc');
"#;

const BAD_SCHEMA: &str = "CREATE TABLE broken (id INT,;";

async fn manager() -> SandboxManager {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mysql_sandbox=debug".into()),
        )
        .try_init();

    SandboxManager::connect()
        .await
        .expect("Docker daemon not reachable")
        .auto_pull(true)
}

async fn count(handle: &SandboxHandle, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(handle.pool().unwrap())
        .await
        .unwrap_or_else(|e| panic!("count {table} failed: {e}"))
}

async fn insert_users(handle: &SandboxHandle, n: i32) {
    for i in 0..n {
        sqlx::query("INSERT INTO users (id, email) VALUES (?, ?)")
            .bind(i)
            .bind(format!("user{i}@example.com"))
            .execute(handle.pool().unwrap())
            .await
            .expect("insert failed");
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn provisions_with_default_config() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig::default())
        .await
        .expect("provision failed");

    assert!(handle.container_name().unwrap().starts_with("mysql-sandbox-"));
    assert!(!handle.container_id().unwrap().is_empty());
    assert!(handle.url().unwrap().starts_with("mysql://root:@127.0.0.1:"));
    assert_eq!(handle.database().unwrap(), "testing");
    assert_ne!(handle.port().unwrap(), 0);

    // The probe already succeeded inside provision; the pool must agree.
    sqlx::query("SELECT 1")
        .execute(handle.pool().unwrap())
        .await
        .expect("engine not reachable through returned handle");

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn provisions_with_explicit_credential() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig {
            credential: RootCredential::Password("hunter2".to_string()),
            ..Default::default()
        })
        .await
        .expect("provision failed");

    sqlx::query("SELECT 1")
        .execute(handle.pool().unwrap())
        .await
        .expect("authenticated connection failed");

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn seed_rows_are_queryable_after_provision() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig {
            seed: Some(SeedData::from_buffer(SCHEMA)),
            ..Default::default()
        })
        .await
        .expect("provision failed");

    assert_eq!(count(&handle, "categories").await, 5);

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn seed_from_reader_is_equivalent_to_buffer() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig {
            seed: Some(SeedData::from_reader(std::io::Cursor::new(
                SCHEMA.as_bytes().to_vec(),
            ))),
            ..Default::default()
        })
        .await
        .expect("provision failed");

    assert_eq!(count(&handle, "categories").await, 5);

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn reset_all_tables_honors_exclusions() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig {
            seed: Some(SeedData::from_buffer(SCHEMA)),
            skip_reset_tables: vec!["categories".to_string()],
            ..Default::default()
        })
        .await
        .expect("provision failed");

    insert_users(&handle, 10).await;
    assert_eq!(count(&handle, "users").await, 10);
    assert_eq!(count(&handle, "categories").await, 5);

    handle.reset_all_tables().await.expect("reset failed");

    assert_eq!(count(&handle, "users").await, 0);
    assert_eq!(count(&handle, "categories").await, 5);

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn reset_all_tables_without_exclusions_clears_everything() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig {
            seed: Some(SeedData::from_buffer(SCHEMA)),
            ..Default::default()
        })
        .await
        .expect("provision failed");

    insert_users(&handle, 10).await;

    handle.reset_all_tables().await.expect("reset failed");

    assert_eq!(count(&handle, "users").await, 0);
    assert_eq!(count(&handle, "categories").await, 0);

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn reset_tables_skips_missing_names() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig {
            seed: Some(SeedData::from_buffer(SCHEMA)),
            ..Default::default()
        })
        .await
        .expect("provision failed");

    insert_users(&handle, 10).await;

    handle
        .reset_tables(&["categories", "does_not_exist"])
        .await
        .expect("reset_tables must tolerate missing names");

    assert_eq!(count(&handle, "users").await, 10);
    assert_eq!(count(&handle, "categories").await, 0);

    handle.stop().await.expect("stop failed");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn malformed_seed_fails_and_leaves_no_container() {
    let manager = manager().await;
    let name = format!("mysql-sandbox-badseed-{}", std::process::id());

    let result = manager
        .provision(SandboxConfig {
            name: Some(name.clone()),
            seed: Some(SeedData::from_buffer(BAD_SCHEMA)),
            ..Default::default()
        })
        .await;

    match result {
        Err(SandboxError::Provisioning { .. }) | Err(SandboxError::ReadinessTimeout { .. }) => {}
        Err(other) => panic!("unexpected error kind: {other}"),
        Ok(_) => panic!("provision must not return a handle for a bad seed"),
    }

    // Auto-removal plus best-effort cleanup: the container must be gone.
    let docker = bollard_probe().await;
    assert!(
        docker.inspect_container(&name, None).await.is_err(),
        "container '{name}' still exists after failed provisioning"
    );
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn readiness_deadline_elapse_leaves_no_container() {
    let manager = manager().await.readiness_timeout(Duration::from_millis(1));
    let name = format!("mysql-sandbox-deadline-{}", std::process::id());

    let result = manager
        .provision(SandboxConfig {
            name: Some(name.clone()),
            ..Default::default()
        })
        .await;

    assert!(
        matches!(result, Err(SandboxError::ReadinessTimeout { .. })),
        "expected ReadinessTimeout"
    );

    // Stop has a 60s grace period; give auto-removal a moment.
    tokio::time::sleep(Duration::from_secs(2)).await;
    let docker = bollard_probe().await;
    if let Ok(info) = docker.inspect_container(&name, None).await {
        let running = info.state.and_then(|s| s.running).unwrap_or(false);
        assert!(!running, "container '{name}' still running after timeout");
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn stop_is_idempotent() {
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig::default())
        .await
        .expect("provision failed");

    handle.stop().await.expect("first stop failed");
    handle.stop().await.expect("second stop must be benign");
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn teardown_works_from_unconditional_cleanup() {
    // Cleanup code commonly stops whatever handle it has, even when the body
    // bailed early. The handle alone must carry enough to tear down.
    let manager = manager().await;
    let handle = manager
        .provision(SandboxConfig::default())
        .await
        .expect("provision failed");
    drop(manager);

    handle.stop().await.expect("stop after manager drop failed");
}

/// A raw Docker client for asserting on container state from the outside.
async fn bollard_probe() -> bollard::Docker {
    bollard::Docker::connect_with_local_defaults().expect("Docker daemon not reachable")
}
