//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixconv-api --test upload_test`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use pixconv_api::setup::{routes, storage};
use pixconv_api::AppState;
use pixconv_core::Config;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the temporary upload directory it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(&self.upload_dir)
            .expect("Failed to list upload dir")
            .map(|entry| {
                entry
                    .expect("Failed to read dir entry")
                    .file_name()
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        names.sort();
        names
    }
}

/// Setup test app with default limits and an isolated upload directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup test app after adjusting the config.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let mut config = Config {
        upload_dir: temp_dir.path().join("converted"),
        ..Config::default()
    };
    customize(&mut config);

    let storage = storage::setup_storage(&config)
        .await
        .expect("Failed to setup storage");
    let state = Arc::new(AppState::new(config.clone(), storage));
    let app = routes::setup_routes(&config, state).expect("Failed to setup routes");

    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir: config.upload_dir,
        _temp_dir: temp_dir,
    }
}
