//! Test environment: temporary data directory plus mock GitHub and Discord servers

use std::fs;
use std::path::PathBuf;

use mockito::{Mock, Server, ServerGuard};
use tempfile::TempDir;

use update_notifier::config::Config;

pub const ROLE_ID: &str = "42";

pub struct TestEnv {
    pub temp_dir: TempDir,
    pub github: ServerGuard,
    pub discord: ServerGuard,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
            github: Server::new_async().await,
            discord: Server::new_async().await,
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp_dir.path().join("data")
    }

    pub fn config(&self) -> Config {
        Config {
            webhook_url: format!("{}/webhook", self.discord.url()),
            role_id: ROLE_ID.to_string(),
            github_token: None,
            allow_ping: true,
            allow_all_releases_ping: false,
            data_dir: self.data_dir(),
            api_base_url: self.github.url(),
            concurrency: 4,
        }
    }

    pub fn write_services(&self, services: &[&str]) {
        fs::create_dir_all(self.data_dir()).unwrap();
        fs::write(self.data_dir().join("services.txt"), services.join("\n")).unwrap();
    }

    pub fn write_versions(&self, versions: serde_json::Value) {
        fs::create_dir_all(self.data_dir()).unwrap();
        fs::write(
            self.data_dir().join("versions.json"),
            serde_json::to_string(&versions).unwrap(),
        )
        .unwrap();
    }

    pub fn read_versions(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.data_dir().join("versions.json")).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    /// Serve `tag` as the latest release of `repo`
    pub async fn mock_release(&mut self, repo: &str, tag: &str) -> Mock {
        self.github
            .mock("GET", format!("/repos/{}/releases/latest", repo).as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "tag_name": tag,
                    "html_url": format!("https://github.com/{}/releases/tag/{}", repo, tag),
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    pub async fn mock_missing_release(&mut self, repo: &str) -> Mock {
        self.github
            .mock("GET", format!("/repos/{}/releases/latest", repo).as_str())
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await
    }
}
