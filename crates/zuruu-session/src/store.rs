//! Process-local session state.
//!
//! One [`SessionHandle`] per user session, cloned into whatever needs it.
//! State lives in a `tokio::sync::watch` channel: every mutation replaces
//! the current value and wakes subscribers, who read the latest snapshot.
//! Nothing is persisted; a restart starts empty.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};
use ts_rs::TS;
use uuid::Uuid;
use zuruu_core::models::mode::Mode;
use zuruu_core::models::patient::PatientRecord;
use zuruu_core::models::prescription::Prescription;

use crate::error::StateError;

/// The patient the current user is working with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
#[ts(export)]
pub enum ActiveUser {
    /// A record held in `patient_records`.
    Linked(Uuid),
    /// A record the user chose not to save.
    Transient(PatientRecord),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionState {
    pub active_user: Option<ActiveUser>,
    /// Insertion-ordered.
    pub patient_records: Vec<PatientRecord>,
    pub last_prescription: Option<Prescription>,
    pub mode: Mode,
}

impl SessionState {
    pub fn record(&self, id: Uuid) -> Option<&PatientRecord> {
        self.patient_records.iter().find(|r| r.id == id)
    }

    /// The active patient's record, if there is one.
    ///
    /// A `Linked` id that no longer resolves yields `None`.
    pub fn active_record(&self) -> Option<&PatientRecord> {
        match self.active_user.as_ref()? {
            ActiveUser::Linked(id) => self.record(*id),
            ActiveUser::Transient(record) => Some(record),
        }
    }
}

/// Cloneable handle to one session's state.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::with_state(SessionState::default())
    }

    pub fn with_state(state: SessionState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    /// Receive a notification after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Apply several changes and notify subscribers once.
    pub fn update(&self, f: impl FnOnce(&mut SessionState)) {
        self.tx.send_modify(f);
    }

    // -- Active user --

    /// Make the stored record `id` the active patient.
    ///
    /// An unknown id clears the active user rather than leaving a dangling
    /// reference.
    pub fn set_active_user(&self, id: Uuid) -> Result<(), StateError> {
        let mut outcome = Ok(());
        self.update(|state| {
            if state.record(id).is_some() {
                state.active_user = Some(ActiveUser::Linked(id));
                debug!(patient_id = %id, "active user set");
            } else {
                state.active_user = None;
                warn!(patient_id = %id, "active user not in records, cleared");
                outcome = Err(StateError::UnknownPatient(id));
            }
        });
        outcome
    }

    /// Make an unsaved record the active patient.
    pub fn set_transient_user(&self, record: PatientRecord) {
        self.update(|state| {
            debug!(patient_id = %record.id, "transient active user set");
            state.active_user = Some(ActiveUser::Transient(record));
        });
    }

    pub fn clear_active_user(&self) {
        self.update(|state| state.active_user = None);
    }

    pub fn get_active_patient_record(&self) -> Option<PatientRecord> {
        self.tx.borrow().active_record().cloned()
    }

    /// The active patient's record, or guidance for the user when none is
    /// selected.
    pub fn require_active_patient(&self) -> Result<PatientRecord, StateError> {
        self.get_active_patient_record()
            .ok_or(StateError::NoActivePatient)
    }

    // -- Patient records --

    /// Insert `record`, or replace the stored record with the same id.
    ///
    /// Replacing keeps the original `created_at` and bumps `updated_at`.
    /// Saving the transient active user links it.
    pub fn add_or_update_patient_record(&self, mut record: PatientRecord) -> Uuid {
        let id = record.id;
        self.update(|state| {
            match state.patient_records.iter_mut().find(|r| r.id == id) {
                Some(existing) => {
                    record.created_at = existing.created_at;
                    record.updated_at = jiff::Timestamp::now();
                    *existing = record;
                    debug!(patient_id = %id, "patient record updated");
                }
                None => {
                    state.patient_records.push(record);
                    debug!(patient_id = %id, "patient record added");
                }
            }

            if matches!(&state.active_user, Some(ActiveUser::Transient(r)) if r.id == id) {
                state.active_user = Some(ActiveUser::Linked(id));
            }
        });
        id
    }

    /// Remove a record. If it was the active user, the active user is
    /// cleared too. Subscribers are only notified when something changed.
    pub fn remove_patient_record(&self, id: Uuid) -> Option<PatientRecord> {
        let mut removed = None;
        self.tx.send_if_modified(|state| {
            let Some(pos) = state.patient_records.iter().position(|r| r.id == id) else {
                return false;
            };
            removed = Some(state.patient_records.remove(pos));
            if matches!(state.active_user, Some(ActiveUser::Linked(active)) if active == id) {
                state.active_user = None;
            }
            debug!(patient_id = %id, "patient record removed");
            true
        });
        removed
    }

    pub fn patient_records(&self) -> Vec<PatientRecord> {
        self.tx.borrow().patient_records.clone()
    }

    // -- Prescription hand-off --

    pub fn set_last_prescription(&self, prescription: Prescription) {
        self.update(|state| state.last_prescription = Some(prescription));
    }

    pub fn clear_last_prescription(&self) {
        self.update(|state| state.last_prescription = None);
    }

    pub fn last_prescription(&self) -> Option<Prescription> {
        self.tx.borrow().last_prescription.clone()
    }

    /// Hand the prescription to a consumer and clear it.
    pub fn take_last_prescription(&self) -> Option<Prescription> {
        let mut taken = None;
        self.tx.send_if_modified(|state| {
            taken = state.last_prescription.take();
            taken.is_some()
        });
        taken
    }

    // -- Mode --

    pub fn set_mode(&self, mode: Mode) {
        self.update(|state| {
            debug!(mode = %mode, "mode set");
            state.mode = mode;
        });
    }

    pub fn mode(&self) -> Mode {
        self.tx.borrow().mode
    }
}
