use std::env;
use std::path::PathBuf;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding `memberships.json` and `membership-periods.json`
    pub data_dir: PathBuf,
    /// User id stamped on memberships when the caller sends none
    pub default_user_id: i64,
    /// `assignedBy` used when the caller sends none
    pub default_assigned_by: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3099),
            data_dir: env::var("MEMBERSHIP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            default_user_id: env::var("DEFAULT_USER_ID")
                .ok()
                .and_then(|id| id.parse().ok())
                .unwrap_or(2000),
            default_assigned_by: env::var("DEFAULT_ASSIGNED_BY")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| "admin".to_string()),
        }
    }
}
