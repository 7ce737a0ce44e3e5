//! Appointment lifecycle controller.
//!
//! Owns the collection of persisted appointments, the form draft, and the
//! request-lifecycle flags, and orchestrates store calls with notification
//! side effects. The view renders from accessor snapshots and forwards
//! intents (`begin_create`, `set_draft`, `submit`, `remove`, `cancel`).
//!
//! State lives behind one mutex and the guard is never held across an
//! await, so every method takes `&self` and concurrent intents from the
//! event loop are safe. `submitting` and `deleting` are real guards, not
//! display hints: a second submit while one is pending is a no-op, and
//! update/delete against an id with an operation already in flight is
//! refused.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::confirm::ConfirmationGate;
use crate::models::{Appointment, AppointmentDraft, AppointmentFilter};
use crate::notify::{Notifier, Severity};
use crate::store::{RecordId, Store};

pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this appointment?";

// ─── Form state ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Idle,
    Creating,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DraftField {
    PatientName,
    Date,
    Time,
    Purpose,
}

impl DraftField {
    /// Field key as the form knows it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PatientName => "patientName",
            Self::Date => "date",
            Self::Time => "time",
            Self::Purpose => "purpose",
        }
    }
}

/// Per-field validation messages, ordered for stable display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<DraftField, &'static str>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn message(&self, field: DraftField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn fields(&self) -> Vec<DraftField> {
        self.0.keys().copied().collect()
    }
}

/// Checks the four required fields for blank or whitespace-only values.
/// Pure: no I/O, deterministic, returns exactly the offending fields.
pub fn validate(draft: &AppointmentDraft) -> ValidationErrors {
    let mut errors = BTreeMap::new();
    if draft.patient_name.trim().is_empty() {
        errors.insert(DraftField::PatientName, "Patient name is required");
    }
    if draft.date.trim().is_empty() {
        errors.insert(DraftField::Date, "Date is required");
    }
    if draft.time.trim().is_empty() {
        errors.insert(DraftField::Time, "Time is required");
    }
    if draft.purpose.trim().is_empty() {
        errors.insert(DraftField::Purpose, "Purpose is required");
    }
    ValidationErrors(errors)
}

// ─── Controller ───────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct ControllerState {
    collection: Vec<Appointment>,
    draft: AppointmentDraft,
    errors: ValidationErrors,
    mode: FormMode,
    loading: bool,
    loaded: bool,
    submitting: bool,
    deleting: BTreeSet<RecordId>,
}

pub struct AppointmentController<S, N, C> {
    store: S,
    notifier: N,
    gate: C,
    filter: AppointmentFilter,
    state: Mutex<ControllerState>,
}

impl<S, N, C> AppointmentController<S, N, C>
where
    S: Store,
    N: Notifier,
    C: ConfirmationGate,
{
    /// Controller over the upcoming-appointments view.
    pub fn new(store: S, notifier: N, gate: C) -> Self {
        Self::with_filter(store, notifier, gate, AppointmentFilter::upcoming())
    }

    /// Controller with an explicit listing filter.
    pub fn with_filter(store: S, notifier: N, gate: C, filter: AppointmentFilter) -> Self {
        Self {
            store,
            notifier,
            gate,
            filter,
            state: Mutex::new(ControllerState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Snapshots for the view ──────────────────────────────────────────

    pub fn appointments(&self) -> Vec<Appointment> {
        self.lock().collection.clone()
    }

    pub fn draft(&self) -> AppointmentDraft {
        self.lock().draft.clone()
    }

    pub fn validation_errors(&self) -> ValidationErrors {
        self.lock().errors.clone()
    }

    pub fn mode(&self) -> FormMode {
        self.lock().mode
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// Has the initial load completed at least once?
    pub fn is_loaded(&self) -> bool {
        self.lock().loaded
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn is_deleting(&self, id: &RecordId) -> bool {
        self.lock().deleting.contains(id)
    }

    // ── Form intents ────────────────────────────────────────────────────

    /// Opens the form with an empty draft.
    pub fn begin_create(&self) {
        let mut state = self.lock();
        state.draft = AppointmentDraft::default();
        state.errors = ValidationErrors::default();
        state.mode = FormMode::Creating;
    }

    /// Opens the form seeded from an existing appointment.
    pub fn begin_edit(&self, appointment: &Appointment) {
        let mut state = self.lock();
        state.draft = AppointmentDraft::from(appointment);
        state.errors = ValidationErrors::default();
        state.mode = FormMode::Editing;
    }

    /// Replaces the draft wholesale. Field-level edits build a new draft
    /// and pass it here.
    pub fn set_draft(&self, draft: AppointmentDraft) {
        self.lock().draft = draft;
    }

    /// Closes the form and discards the draft. Safe to call repeatedly.
    pub fn cancel(&self) {
        let mut state = self.lock();
        state.draft = AppointmentDraft::default();
        state.errors = ValidationErrors::default();
        state.mode = FormMode::Idle;
    }

    // ── Store orchestration ─────────────────────────────────────────────

    /// Replaces the collection from the store using the configured filter.
    pub async fn load(&self) {
        {
            let mut state = self.lock();
            if state.loading {
                return;
            }
            state.loading = true;
        }

        let result = self.store.list(&self.filter).await.and_then(|records| {
            records
                .into_iter()
                .map(Appointment::try_from)
                .collect::<Result<Vec<_>, _>>()
        });

        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(collection) => {
                state.collection = collection;
                state.loaded = true;
            }
            Err(err) => {
                drop(state);
                tracing::warn!("appointment load failed: {err}");
                self.notifier
                    .notify(Severity::Error, "Failed to load appointments");
            }
        }
    }

    /// Validates the draft and sends it to the store. On success the
    /// collection is updated in place from the record the store returned,
    /// the form closes, and the draft resets; on failure the form and
    /// draft stay so the user can retry or cancel.
    pub async fn submit(&self) {
        let (target, draft) = {
            let mut state = self.lock();
            if state.submitting || state.mode == FormMode::Idle {
                return;
            }

            let errors = validate(&state.draft);
            if !errors.is_empty() {
                state.errors = errors;
                return;
            }
            state.errors = ValidationErrors::default();

            let target = if state.mode == FormMode::Editing {
                match state.draft.id.clone() {
                    Some(id) => {
                        if state.deleting.contains(&id) {
                            tracing::warn!("refusing update for {id}: delete in flight");
                            return;
                        }
                        Some(id)
                    }
                    None => {
                        tracing::warn!("edit submitted without an id; ignoring");
                        return;
                    }
                }
            } else {
                None
            };

            state.submitting = true;
            (target, state.draft.clone())
        };

        let editing = target.is_some();
        let fields = draft.to_fields();
        let result = match &target {
            Some(id) => self.store.update(id, fields).await,
            None => self.store.create(fields).await,
        }
        .and_then(Appointment::try_from);

        let mut state = self.lock();
        state.submitting = false;
        match result {
            Ok(saved) => {
                // Replace-by-id keeps the unique-id invariant; a fresh
                // record lands at the end.
                match state.collection.iter().position(|a| a.id == saved.id) {
                    Some(pos) => state.collection[pos] = saved,
                    None => state.collection.push(saved),
                }
                state.draft = AppointmentDraft::default();
                state.errors = ValidationErrors::default();
                state.mode = FormMode::Idle;
                drop(state);
                let message = if editing {
                    "Appointment updated successfully!"
                } else {
                    "New appointment added!"
                };
                self.notifier.notify(Severity::Success, message);
            }
            Err(err) => {
                drop(state);
                tracing::warn!("appointment save failed: {err}");
                let message = if editing {
                    "Failed to update appointment"
                } else {
                    "Failed to add appointment"
                };
                self.notifier.notify(Severity::Error, message);
            }
        }
    }

    /// Deletes one appointment after explicit confirmation. Declining the
    /// prompt aborts before any store call; the in-flight marker is
    /// cleared on every exit path.
    pub async fn remove(&self, id: &RecordId) {
        {
            let state = self.lock();
            if state.deleting.contains(id) {
                return;
            }
            if state.submitting
                && state.mode == FormMode::Editing
                && state.draft.id.as_ref() == Some(id)
            {
                tracing::warn!("refusing delete for {id}: update in flight");
                return;
            }
        }

        if !self.gate.confirm(DELETE_CONFIRM_PROMPT) {
            return;
        }

        {
            let mut state = self.lock();
            if state.deleting.contains(id) {
                return;
            }
            state.deleting.insert(id.clone());
        }

        let result = self.store.delete(id).await;

        let mut state = self.lock();
        state.deleting.remove(id);
        match result {
            Ok(true) => {
                state.collection.retain(|a| &a.id != id);
                drop(state);
                self.notifier
                    .notify(Severity::Success, "Appointment deleted successfully!");
            }
            Ok(false) => {
                drop(state);
                tracing::warn!("delete for {id} removed nothing");
                self.notifier
                    .notify(Severity::Error, "Failed to delete appointment");
            }
            Err(err) => {
                drop(state);
                tracing::warn!("appointment delete failed: {err}");
                self.notifier
                    .notify(Severity::Error, "Failed to delete appointment");
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
