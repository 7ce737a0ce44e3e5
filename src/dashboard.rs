//! Dashboard header counts: appointments bucketed by status.
//!
//! Single fetch for the stat tiles; each bucket is one `count` call so
//! the numbers match whatever the backing store considers authoritative.

use serde::{Deserialize, Serialize};

use crate::models::{AppointmentFilter, AppointmentStatus};
use crate::store::{Store, StoreError};

/// Aggregated appointment counts for the dashboard header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub scheduled: u64,
    pub confirmed: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub total: u64,
}

impl DashboardStats {
    /// Appointments still ahead: scheduled plus confirmed.
    pub fn upcoming(&self) -> u64 {
        self.scheduled + self.confirmed
    }
}

/// Assembles the stat-tile numbers from the store.
pub async fn fetch_dashboard_stats<S: Store>(store: &S) -> Result<DashboardStats, StoreError> {
    let mut stats = DashboardStats::default();
    for status in AppointmentStatus::ALL {
        let count = store
            .count(&AppointmentFilter::with_status(status))
            .await?;
        match status {
            AppointmentStatus::Scheduled => stats.scheduled = count,
            AppointmentStatus::Confirmed => stats.confirmed = count,
            AppointmentStatus::Completed => stats.completed = count,
            AppointmentStatus::Cancelled => stats.cancelled = count,
        }
    }
    stats.total = store.count(&AppointmentFilter::default()).await?;
    Ok(stats)
}
