//! Test helpers: build the application over a temporary storage directory.
//!
//! Run from workspace root: `cargo test -p pixdrop-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use pixdrop_api::setup::initialize_app;
use pixdrop_api::AppState;
use pixdrop_core::Config;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server, shared state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.state.config.storage_dir().to_path_buf()
    }

    /// Names of the files currently in the storage directory, sorted.
    pub fn stored_files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.storage_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Setup test app with PNG output, which keeps encoding fast.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|config| config).await
}

/// Setup test app, letting the caller adjust the config first.
pub async fn setup_test_app_with(customize: impl FnOnce(Config) -> Config) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::new(temp_dir.path().join("uploads")).with_output_format("png");
    let config = customize(config);

    let (state, router) = initialize_app(config).await.unwrap();
    let server = TestServer::new(router).unwrap();

    TestApp {
        server,
        state,
        _temp_dir: temp_dir,
    }
}
