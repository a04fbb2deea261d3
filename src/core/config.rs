use std::env;
use std::path::PathBuf;

use crate::shared::constants::{DEFAULT_IMAGE_MAX_DIMENSION, DEFAULT_MAX_UPLOAD_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Local image storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory holding category images, flat
    pub upload_dir: PathBuf,
    /// URL path the upload directory is served under (e.g., "/uploads")
    pub public_path: String,
    /// Bound for the larger side of stored images, in pixels; also the
    /// `<max>_` prefix of generated image file names
    pub image_max_dimension: u32,
    /// Maximum accepted size of an uploaded image in bytes
    pub max_upload_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            storage: StorageConfig::from_env()?,
        })
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;

        // Parse CORS allowed origins from comma-separated string
        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    // Default values for database connection pool (conservative defaults for small-medium apps)
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let url = env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MAX_CONNECTIONS must be a valid number".to_string())?;

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| Self::DEFAULT_MIN_CONNECTIONS.to_string())
            .parse::<u32>()
            .map_err(|_| "DB_MIN_CONNECTIONS must be a valid number".to_string())?;

        let acquire_timeout_secs = env::var("DB_ACQUIRE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_ACQUIRE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_ACQUIRE_TIMEOUT_SECS must be a valid number".to_string())?;

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_IDLE_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_IDLE_TIMEOUT_SECS must be a valid number".to_string())?;

        let max_lifetime_secs = env::var("DB_MAX_LIFETIME_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_LIFETIME_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "DB_MAX_LIFETIME_SECS must be a valid number".to_string())?;

        Ok(Self {
            url,
            max_connections,
            min_connections,
            acquire_timeout_secs,
            idle_timeout_secs,
            max_lifetime_secs,
        })
    }
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, String> {
        let upload_dir = PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

        let public_path = env::var("UPLOAD_PUBLIC_PATH").unwrap_or_else(|_| "/uploads".to_string());
        let public_path = Self::normalize_public_path(&public_path)?;

        let image_max_dimension = env::var("IMAGE_MAX_DIMENSION")
            .unwrap_or_else(|_| DEFAULT_IMAGE_MAX_DIMENSION.to_string())
            .parse::<u32>()
            .map_err(|_| "IMAGE_MAX_DIMENSION must be a valid number".to_string())?;
        if image_max_dimension == 0 {
            return Err("IMAGE_MAX_DIMENSION must be greater than zero".to_string());
        }

        let max_upload_size = env::var("MAX_UPLOAD_SIZE")
            .unwrap_or_else(|_| DEFAULT_MAX_UPLOAD_SIZE.to_string())
            .parse::<usize>()
            .map_err(|_| "MAX_UPLOAD_SIZE must be a valid number".to_string())?;

        Ok(Self {
            upload_dir,
            public_path,
            image_max_dimension,
            max_upload_size,
        })
    }

    /// Router nesting needs a leading slash and no trailing one
    fn normalize_public_path(raw: &str) -> Result<String, String> {
        let trimmed = raw.trim().trim_end_matches('/');
        if !trimmed.starts_with('/') || trimmed.len() < 2 {
            return Err(format!(
                "UPLOAD_PUBLIC_PATH must start with '/' and name a path, got '{}'",
                raw
            ));
        }
        Ok(trimmed.to_string())
    }
}
