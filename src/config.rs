use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediFlow";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot file holding the local appointment array.
pub const SNAPSHOT_FILE: &str = "appointments.json";

/// Record-service table the remote backend targets by default.
pub const DEFAULT_TABLE: &str = "appointment1";

const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Get the application data directory
/// ~/MediFlow/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MediFlow")
}

/// Path of the local appointment snapshot.
pub fn snapshot_path() -> PathBuf {
    app_data_dir().join(SNAPSHOT_FILE)
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}

/// Remote record-service base URL. Its presence selects the remote
/// backend; unset means the local snapshot store.
pub fn remote_base_url() -> Option<String> {
    std::env::var("MEDIFLOW_REMOTE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}

/// Record table name, overridable per deployment.
pub fn remote_table() -> String {
    std::env::var("MEDIFLOW_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string())
}

/// Remote request timeout in seconds.
pub fn remote_timeout_secs() -> u64 {
    std::env::var("MEDIFLOW_REMOTE_TIMEOUT_SECS")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS)
}
