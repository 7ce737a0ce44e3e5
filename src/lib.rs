//! MediFlow appointment core.
//!
//! The appointment lifecycle of the hospital dashboard: a controller that
//! owns the appointment collection, form draft, and validation, and
//! orchestrates asynchronous store operations with request-lifecycle
//! flags and toast notifications. Persistence sits behind the `Store`
//! capability with a local snapshot backend and a hosted record-service
//! backend, selected from configuration at startup.

pub mod config;
pub mod confirm;
pub mod controller;
pub mod dashboard;
pub mod models;
pub mod notify;
pub mod store;

use tracing_subscriber::EnvFilter;

pub use controller::AppointmentController;
pub use store::{AnyStore, StoreError};

use crate::confirm::AutoConfirm;
use crate::notify::TracingNotifier;
use crate::store::{LocalStore, RemoteStore};

/// Initialize tracing for embedders that don't bring their own
/// subscriber. RUST_LOG wins when set.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} appointment core v{}", config::APP_NAME, config::APP_VERSION);
}

/// Builds a controller over the configured backend: the remote record
/// service when `MEDIFLOW_REMOTE_URL` is set, otherwise the local
/// snapshot under the app data directory.
pub fn default_controller(
) -> Result<AppointmentController<AnyStore, TracingNotifier, AutoConfirm>, StoreError> {
    let store = match config::remote_base_url() {
        Some(url) => {
            tracing::debug!("using remote record service at {url}");
            AnyStore::Remote(RemoteStore::new(
                &url,
                &config::remote_table(),
                config::remote_timeout_secs(),
            ))
        }
        None => AnyStore::Local(LocalStore::open(config::snapshot_path())?),
    };
    Ok(AppointmentController::new(store, TracingNotifier, AutoConfirm))
}
