use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080/api";
pub const DEFAULT_DATA_DIR: &str = ".clubctl";

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Deserialize, Debug)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_milliseconds: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_milliseconds: None,
        }
    }
}

impl ApiConfig {
    pub fn set_endpoint(&mut self, endpoint: &mut Option<String>) {
        if let Some(endpoint) = endpoint.take() {
            self.endpoint = endpoint;
        }
    }

    pub fn set_timeout_milliseconds(&mut self, timeout: &mut Option<u64>) {
        if let Some(timeout) = timeout.take() {
            self.timeout_milliseconds = Some(timeout);
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn set_data_dir(&mut self, data_dir: &mut Option<PathBuf>) {
        if let Some(data_dir) = data_dir.take() {
            self.data_dir = Some(data_dir);
        }
    }
}
