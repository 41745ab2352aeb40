use serde::{Deserialize, Serialize};

use super::require;
use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub surname: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentFields {
    pub first_name: String,
    pub surname: String,
}

// ── Request payloads ─────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StudentPayload {
    pub first_name: Option<String>,
    pub surname: Option<String>,
}

impl StudentPayload {
    pub fn into_fields(self) -> AppResult<StudentFields> {
        Ok(StudentFields {
            first_name: require(self.first_name, "first_name")?,
            surname: require(self.surname, "surname")?,
        })
    }

    /// Values written by an update. Absent fields become empty strings; the
    /// stored values are not consulted.
    pub fn into_overwrite(self) -> StudentFields {
        StudentFields {
            first_name: self.first_name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
        }
    }
}
