use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 3030;

/// Environment-based path configuration
#[derive(Debug, Clone)]
pub struct EnvPaths {
    pub data_path: PathBuf,
}

impl EnvPaths {
    /// Load paths from environment variables with defaults
    pub fn load() -> Result<Self> {
        Self::load_with_base(None)
    }

    /// Load paths relative to `base_dir`, or to the current directory after
    /// reading a `.env` file found there.
    pub fn load_with_base(base_dir: Option<PathBuf>) -> Result<Self> {
        let base = match base_dir {
            Some(base) => base,
            None => {
                let cwd = env::current_dir().context("Failed to get current directory")?;
                let env_file = cwd.join(".env");
                if env_file.exists() {
                    dotenv::from_path(&env_file).ok();
                }
                cwd
            }
        };

        Ok(Self {
            data_path: get_path_from_env("DATA_PATH", "./data", &base),
        })
    }

    /// Board database, shared with the session table
    pub fn database_path(&self) -> PathBuf {
        self.data_path.join("board.db")
    }

    pub fn logs_path(&self) -> PathBuf {
        self.data_path.join("logs")
    }
}

fn get_path_from_env(var_name: &str, default: &str, base_dir: &Path) -> PathBuf {
    let path = PathBuf::from(env::var(var_name).unwrap_or_else(|_| default.to_string()));

    if path.is_relative() {
        base_dir.join(path)
    } else {
        path
    }
}

/// Get the current environment (dev, stg, prd)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string())
}

/// Port the API listens on, from `BOARD_PORT`
pub fn api_port() -> Result<u16> {
    match env::var("BOARD_PORT") {
        Ok(value) => value
            .parse()
            .map_err(|_| anyhow!("Invalid BOARD_PORT: {}", value)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    // Tests in this module share process environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_env_paths_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::remove_var("DATA_PATH");

        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().to_path_buf();
        let paths = EnvPaths::load_with_base(Some(base.clone())).unwrap();

        assert_eq!(paths.data_path, base.join("data"));
        assert_eq!(paths.database_path(), base.join("data/board.db"));
        assert_eq!(paths.logs_path(), base.join("data/logs"));
    }

    #[test]
    fn test_env_paths_with_relative_env_var() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DATA_PATH", "./custom_data");

        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().to_path_buf();
        let paths = EnvPaths::load_with_base(Some(base.clone())).unwrap();
        assert_eq!(paths.data_path, base.join("./custom_data"));

        env::remove_var("DATA_PATH");
    }

    #[test]
    fn test_env_paths_with_absolute_env_var() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let temp_dir = TempDir::new().unwrap();
        let absolute = temp_dir.path().join("elsewhere");
        env::set_var("DATA_PATH", absolute.to_str().unwrap());

        let paths = EnvPaths::load_with_base(Some(PathBuf::from("/ignored"))).unwrap();
        assert_eq!(paths.data_path, absolute);

        env::remove_var("DATA_PATH");
    }

    #[test]
    fn test_get_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();

        env::remove_var("ENVIRONMENT");
        assert_eq!(get_environment(), "dev");

        env::set_var("ENVIRONMENT", "prd");
        assert_eq!(get_environment(), "prd");

        env::remove_var("ENVIRONMENT");
    }

    #[test]
    fn test_api_port() {
        let _guard = ENV_MUTEX.lock().unwrap();

        env::remove_var("BOARD_PORT");
        assert_eq!(api_port().unwrap(), DEFAULT_PORT);

        env::set_var("BOARD_PORT", "8088");
        assert_eq!(api_port().unwrap(), 8088);

        env::set_var("BOARD_PORT", "eighty");
        assert!(api_port().is_err());

        env::remove_var("BOARD_PORT");
    }
}
