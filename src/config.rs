use std::env;
use std::path::PathBuf;

/// Default length of the retention window, in months.
pub const DEFAULT_RETENTION_MONTHS: u32 = 24;

/// Name appearing in the bank label of transfers from the holder's own account.
pub const DEFAULT_ACCOUNT_HOLDER: &str = "ALOYSE PHULPIN";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub static_path: PathBuf,
    pub retention_months: u32,
    pub account_holder: String,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8050,
            static_path: PathBuf::from("static"),
            retention_months: DEFAULT_RETENTION_MONTHS,
            account_holder: DEFAULT_ACCOUNT_HOLDER.into(),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("SOLDE_HOST").unwrap_or(defaults.host),
            port: env::var("SOLDE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            static_path: env::var("SOLDE_STATIC_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_path),
            retention_months: env::var("SOLDE_RETENTION_MONTHS")
                .ok()
                .and_then(|m| m.parse::<u32>().ok())
                .filter(|m| *m > 0)
                .unwrap_or(defaults.retention_months),
            account_holder: env::var("SOLDE_ACCOUNT_HOLDER")
                .ok()
                .map(|name| name.trim().to_uppercase())
                .filter(|name| !name.is_empty())
                .unwrap_or(defaults.account_holder),
            max_upload_bytes: env::var("SOLDE_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
