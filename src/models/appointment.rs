//! Appointment entity, form draft, and record-service wire shapes.
//!
//! `Appointment` is the normalized entity the controller keeps in its
//! collection. `RawRecord` is what the record service speaks (capitalized
//! `Id`/`Name` fields, optionally a nested `patient` expansion), and
//! `RecordFields` is the create/update payload. The mapping between the
//! two lives here so neither the stores nor the controller duplicate it.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;
use crate::store::{RecordId, StoreError};

// ─── Entity ───────────────────────────────────────────────────────────────────

/// A persisted appointment as the controller sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: RecordId,
    pub patient_name: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Time of day, `HH:MM`.
    pub time: String,
    pub purpose: String,
    pub status: AppointmentStatus,
    pub patient_id: Option<RecordId>,
}

/// In-progress form state. May be partially filled; never enters the
/// collection. Replaced wholesale on every field change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentDraft {
    /// Present when editing an existing appointment, absent for a new one.
    pub id: Option<RecordId>,
    pub patient_name: String,
    pub date: String,
    pub time: String,
    pub purpose: String,
    pub status: AppointmentStatus,
    pub patient_id: Option<RecordId>,
}

impl From<&Appointment> for AppointmentDraft {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: Some(appointment.id.clone()),
            patient_name: appointment.patient_name.clone(),
            date: appointment.date.clone(),
            time: appointment.time.clone(),
            purpose: appointment.purpose.clone(),
            status: appointment.status,
            patient_id: appointment.patient_id.clone(),
        }
    }
}

impl AppointmentDraft {
    /// Builds the create/update payload. The patient name travels as the
    /// record's `Name` field.
    pub fn to_fields(&self) -> RecordFields {
        RecordFields {
            name: self.patient_name.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            purpose: self.purpose.clone(),
            status: self.status.as_str().to_string(),
            patient_id: self.patient_id.clone(),
        }
    }
}

// ─── Wire shapes ──────────────────────────────────────────────────────────────

/// Nested patient expansion on a fetched record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRef {
    #[serde(rename = "Name")]
    pub name: String,
}

/// A record as returned by the store. The patient name may arrive flat
/// (`Name`) or nested (`patient.Name`) depending on whether the service
/// expanded the patient reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientRef>,
    pub date: String,
    pub time: String,
    pub purpose: String,
    pub status: String,
    #[serde(rename = "patientId", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<RecordId>,
}

impl RawRecord {
    /// Assembles a stored record from a payload and an assigned id.
    /// Used by stores that materialize records themselves.
    pub fn from_fields(id: RecordId, fields: RecordFields) -> Self {
        Self {
            id,
            name: Some(fields.name),
            patient: None,
            date: fields.date,
            time: fields.time,
            purpose: fields.purpose,
            status: fields.status,
            patient_id: fields.patient_id,
        }
    }
}

/// Writable fields for create/update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFields {
    #[serde(rename = "Name")]
    pub name: String,
    pub date: String,
    pub time: String,
    pub purpose: String,
    pub status: String,
    #[serde(rename = "patientId", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<RecordId>,
}

impl TryFrom<RawRecord> for Appointment {
    type Error = StoreError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        let status = AppointmentStatus::from_str(&record.status)?;
        let patient_name = record
            .patient
            .map(|p| p.name)
            .or(record.name)
            .ok_or_else(|| StoreError::Malformed {
                id: record.id.to_string(),
                reason: "record has neither Name nor patient.Name".into(),
            })?;
        Ok(Self {
            id: record.id,
            patient_name,
            date: record.date,
            time: record.time,
            purpose: record.purpose,
            status,
            patient_id: record.patient_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str) -> RawRecord {
        RawRecord {
            id: RecordId::from(id),
            name: Some(name.into()),
            patient: None,
            date: "2024-05-01".into(),
            time: "09:30".into(),
            purpose: "Checkup".into(),
            status: "scheduled".into(),
            patient_id: None,
        }
    }

    #[test]
    fn maps_flat_name() {
        let appointment = Appointment::try_from(raw("1", "Jane Doe")).unwrap();
        assert_eq!(appointment.patient_name, "Jane Doe");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn nested_patient_name_wins_over_flat() {
        let mut record = raw("1", "appointment-title");
        record.patient = Some(PatientRef {
            name: "Jane Doe".into(),
        });
        let appointment = Appointment::try_from(record).unwrap();
        assert_eq!(appointment.patient_name, "Jane Doe");
    }

    #[test]
    fn record_without_any_name_is_malformed() {
        let mut record = raw("7", "x");
        record.name = None;
        let err = Appointment::try_from(record).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut record = raw("1", "Jane Doe");
        record.status = "tentative".into();
        let err = Appointment::try_from(record).unwrap_err();
        assert!(matches!(err, StoreError::InvalidEnum { .. }));
    }

    #[test]
    fn draft_from_appointment_carries_id() {
        let appointment = Appointment::try_from(raw("42", "Jane Doe")).unwrap();
        let draft = AppointmentDraft::from(&appointment);
        assert_eq!(draft.id, Some(RecordId::from("42")));
        assert_eq!(draft.patient_name, "Jane Doe");
    }

    #[test]
    fn fields_round_trip_through_from_fields() {
        let draft = AppointmentDraft {
            id: None,
            patient_name: "Jane Doe".into(),
            date: "2024-05-01".into(),
            time: "09:30".into(),
            purpose: "Checkup".into(),
            status: AppointmentStatus::Scheduled,
            patient_id: None,
        };
        let record = RawRecord::from_fields(RecordId::from("1"), draft.to_fields());
        let appointment = Appointment::try_from(record).unwrap();
        assert_eq!(appointment.patient_name, "Jane Doe");
        assert_eq!(appointment.date, "2024-05-01");
        assert_eq!(appointment.time, "09:30");
        assert_eq!(appointment.purpose, "Checkup");
    }

    #[test]
    fn wire_field_names_match_service() {
        let json = serde_json::to_value(raw("9", "Jane Doe")).unwrap();
        assert_eq!(json["Id"], "9");
        assert_eq!(json["Name"], "Jane Doe");
        assert_eq!(json["date"], "2024-05-01");
        assert!(json.get("patientId").is_none());
    }

    #[test]
    fn parses_nested_patient_from_json() {
        let json = r#"{
            "Id": "3",
            "patient": { "Name": "Sam Okafor" },
            "date": "2024-06-10",
            "time": "14:00",
            "purpose": "Follow-up",
            "status": "confirmed"
        }"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();
        let appointment = Appointment::try_from(record).unwrap();
        assert_eq!(appointment.patient_name, "Sam Okafor");
        assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    }
}
