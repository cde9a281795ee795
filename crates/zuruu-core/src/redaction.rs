//! Role-based redaction of patient records.
//!
//! Which fields a given [`Mode`] may see is a lookup table, not per-page
//! logic. The table ships with a default and can be replaced by a versioned
//! JSON document.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::mode::Mode;
use crate::models::patient::{PatientField, PatientRecord};

/// Placeholder written over hidden text fields.
pub const REDACTED: &str = "[redacted]";

/// Current policy document version. Bump when the shape changes and add a
/// step to [`migrate`].
const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionPolicy {
    /// Schema version. Missing or 0 = pre-versioned document.
    #[serde(default)]
    pub policy_version: u32,
    /// Fields hidden from each mode. Modes absent from the map see everything.
    #[serde(default)]
    pub hidden: BTreeMap<Mode, BTreeSet<PatientField>>,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        let identifiers = [
            PatientField::Name,
            PatientField::Cnic,
            PatientField::Phone,
            PatientField::Address,
        ];

        let mut hidden = BTreeMap::new();
        hidden.insert(Mode::Patient, BTreeSet::new());
        hidden.insert(Mode::Pharmacist, BTreeSet::from([PatientField::Cnic]));
        hidden.insert(Mode::Student, BTreeSet::from(identifiers));

        Self {
            policy_version: CURRENT_VERSION,
            hidden,
        }
    }
}

impl RedactionPolicy {
    /// A policy that hides nothing from anyone.
    pub fn permissive() -> Self {
        Self {
            policy_version: CURRENT_VERSION,
            hidden: BTreeMap::new(),
        }
    }

    /// Parse a policy document, running migrations from older versions.
    pub fn from_json_str(contents: &str) -> Result<Self, CoreError> {
        let json: serde_json::Value = serde_json::from_str(contents)?;
        let on_disk_version = match json.get("policy_version") {
            None => 0,
            Some(v) => v.as_u64().ok_or_else(|| {
                CoreError::InvalidPolicy(format!("policy_version {v} is not a version number"))
            })?,
        };

        let migrated = migrate(json, on_disk_version)?;
        let policy: RedactionPolicy = serde_json::from_value(migrated)?;
        Ok(policy)
    }

    pub fn to_json_string(&self) -> Result<String, CoreError> {
        let mut stamped = self.clone();
        stamped.policy_version = CURRENT_VERSION;
        Ok(serde_json::to_string_pretty(&stamped)?)
    }

    pub fn is_hidden(&self, mode: Mode, field: PatientField) -> bool {
        self.hidden
            .get(&mode)
            .is_some_and(|fields| fields.contains(&field))
    }

    pub fn hide(&mut self, mode: Mode, field: PatientField) {
        self.hidden.entry(mode).or_default().insert(field);
    }

    pub fn show(&mut self, mode: Mode, field: PatientField) {
        if let Some(fields) = self.hidden.get_mut(&mode) {
            fields.remove(&field);
        }
    }

    /// Fields of `record` that `mode` is allowed to see, in display order.
    pub fn visible_fields(&self, mode: Mode) -> Vec<PatientField> {
        PatientField::ALL
            .into_iter()
            .filter(|f| !self.is_hidden(mode, *f))
            .collect()
    }

    /// Copy of `record` with every hidden field masked.
    pub fn redact(&self, mode: Mode, record: &PatientRecord) -> PatientRecord {
        let mut redacted = record.clone();
        if let Some(fields) = self.hidden.get(&mode) {
            for field in fields {
                redacted.mask_field(*field, REDACTED);
            }
        }
        redacted
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
fn migrate(mut json: serde_json::Value, from_version: u64) -> Result<serde_json::Value, CoreError> {
    if from_version > u64::from(CURRENT_VERSION) {
        return Err(CoreError::UnsupportedPolicyVersion {
            found: from_version,
            supported: CURRENT_VERSION,
        });
    }

    // v0 -> v1: pre-versioned documents listed hidden fields under `redact`.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| CoreError::InvalidPolicy("policy is not a JSON object".to_string()))?;
        if let Some(legacy) = obj.remove("redact") {
            obj.entry("hidden").or_insert(legacy);
        }
        obj.insert(
            "policy_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated redaction policy v0 -> v1");
    }

    Ok(json)
}
