use super::enums::AppointmentStatus;

/// Listing filter passed to `Store::list` and `Store::count`.
///
/// An empty status set matches everything. `limit`/`offset` page the
/// result after filtering and ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub status: Vec<AppointmentStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl AppointmentFilter {
    /// The upcoming-appointments view: scheduled and confirmed only.
    pub fn upcoming() -> Self {
        Self {
            status: vec![AppointmentStatus::Scheduled, AppointmentStatus::Confirmed],
            ..Self::default()
        }
    }

    pub fn with_status(status: AppointmentStatus) -> Self {
        Self {
            status: vec![status],
            ..Self::default()
        }
    }

    /// Does a record with this status pass the filter?
    pub fn matches(&self, status: AppointmentStatus) -> bool {
        self.status.is_empty() || self.status.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_matches_all() {
        let filter = AppointmentFilter::default();
        for status in AppointmentStatus::ALL {
            assert!(filter.matches(status));
        }
    }

    #[test]
    fn upcoming_excludes_completed_and_cancelled() {
        let filter = AppointmentFilter::upcoming();
        assert!(filter.matches(AppointmentStatus::Scheduled));
        assert!(filter.matches(AppointmentStatus::Confirmed));
        assert!(!filter.matches(AppointmentStatus::Completed));
        assert!(!filter.matches(AppointmentStatus::Cancelled));
    }

    #[test]
    fn single_status_filter() {
        let filter = AppointmentFilter::with_status(AppointmentStatus::Cancelled);
        assert!(filter.matches(AppointmentStatus::Cancelled));
        assert!(!filter.matches(AppointmentStatus::Scheduled));
    }
}
