//! Configuration module
//!
//! Environment-driven settings for the upload endpoint and the conversion
//! defaults the command-line client falls back to.

use std::env;
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_ALLOWED_FORMATS, DEFAULT_MAX_FILE_SIZE_BYTES, DEFAULT_QUALITY, DEFAULT_UPLOAD_DIR,
};
use crate::models::{Quality, ValidationPolicy};

const SERVER_PORT: u16 = 4000;
const UPLOAD_MAX_FILES: usize = 10;

#[derive(Clone, Debug)]
pub struct Config {
    pub environment: String,
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub upload_dir: PathBuf,
    pub max_file_size_bytes: u64,
    pub allowed_formats: Vec<String>,
    pub upload_max_files: usize,
    pub default_quality: Quality,
    /// `compact` (default) or `json` console output.
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_formats: DEFAULT_ALLOWED_FORMATS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            upload_max_files: UPLOAD_MAX_FILES,
            default_quality: Quality::default(),
            log_format: "compact".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let config = Config {
            environment,
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            max_file_size_bytes: env::var("MAX_FILE_SIZE_BYTES")
                .unwrap_or_else(|_| DEFAULT_MAX_FILE_SIZE_BYTES.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be a valid number"))?,
            allowed_formats: env::var("ALLOWED_FORMATS")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_FORMATS.join(","))
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            upload_max_files: env::var("UPLOAD_MAX_FILES")
                .unwrap_or_else(|_| UPLOAD_MAX_FILES.to_string())
                .parse()
                .unwrap_or(UPLOAD_MAX_FILES),
            default_quality: Quality::new(
                env::var("DEFAULT_QUALITY")
                    .unwrap_or_else(|_| DEFAULT_QUALITY.to_string())
                    .parse()
                    .unwrap_or(DEFAULT_QUALITY),
            ),
            log_format: env::var("LOG_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|_| "compact".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_BYTES must be greater than 0"));
        }

        if self.upload_max_files == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_FILES must be greater than 0"));
        }

        if !matches!(self.log_format.as_str(), "compact" | "json") {
            return Err(anyhow::anyhow!("LOG_FORMAT must be 'compact' or 'json'"));
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_DIR must not be empty"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }

    /// Validation policy the upload endpoint re-applies to submitted files.
    pub fn upload_policy(&self) -> ValidationPolicy {
        ValidationPolicy::new(self.max_file_size_bytes, self.allowed_formats.clone())
    }

    /// Upper bound for a whole multipart request body.
    pub fn max_body_bytes(&self) -> usize {
        let per_file = usize::try_from(self.max_file_size_bytes).unwrap_or(usize::MAX);
        per_file
            .saturating_mul(self.upload_max_files)
            // multipart framing overhead
            .saturating_add(64 * 1024)
    }
}
