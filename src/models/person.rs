use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::require;
use crate::error::AppResult;

/// A stored person. `birth_date` serializes as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub surname: String,
    pub address: String,
    pub city: String,
    pub birth_date: NaiveDate,
}

impl Person {
    /// Field values without the key, as written back by an update.
    pub fn fields(&self) -> PersonFields {
        PersonFields {
            first_name: self.first_name.clone(),
            surname: self.surname.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            birth_date: self.birth_date,
        }
    }
}

/// Complete set of writable person columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonFields {
    pub first_name: String,
    pub surname: String,
    pub address: String,
    pub city: String,
    pub birth_date: NaiveDate,
}

impl PersonFields {
    /// Key used to serialize concurrent creates of the same person.
    /// Surname is excluded; a create may rewrite it.
    pub fn natural_key(&self) -> String {
        format!(
            "persons:{}|{}|{}|{}",
            self.first_name, self.address, self.city, self.birth_date
        )
    }
}

// ── Request payloads ─────────────────────────────────────────────────────────

/// Body of `POST /persons` and `PUT /persons/:id`. Every field is optional on
/// the wire; create requires all of them, update only touches what is present.
#[derive(Debug, Default, Deserialize)]
pub struct PersonPayload {
    pub first_name: Option<String>,
    pub surname: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl PersonPayload {
    pub fn into_fields(self) -> AppResult<PersonFields> {
        Ok(PersonFields {
            first_name: require(self.first_name, "first_name")?,
            surname: require(self.surname, "surname")?,
            address: require(self.address, "address")?,
            city: require(self.city, "city")?,
            birth_date: require(self.birth_date, "birth_date")?,
        })
    }

    /// Overwrite the fields present in the payload, keep the rest.
    pub fn merge_into(self, mut current: PersonFields) -> PersonFields {
        if let Some(first_name) = self.first_name {
            current.first_name = first_name;
        }
        if let Some(surname) = self.surname {
            current.surname = surname;
        }
        if let Some(address) = self.address {
            current.address = address;
        }
        if let Some(city) = self.city {
            current.city = city;
        }
        if let Some(birth_date) = self.birth_date {
            current.birth_date = birth_date;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn eugenie() -> Person {
        Person {
            id: 1,
            first_name: "Eugenie".to_string(),
            surname: "Giesbrecht".to_string(),
            address: "Paulinenstr. 50".to_string(),
            city: "Stuttgart".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2025, 2, 16).unwrap(),
        }
    }

    #[test]
    fn serializes_flat_with_iso_date() {
        let value = serde_json::to_value(eugenie()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 1,
                "first_name": "Eugenie",
                "surname": "Giesbrecht",
                "address": "Paulinenstr. 50",
                "city": "Stuttgart",
                "birth_date": "2025-02-16",
            })
        );
    }

    #[test]
    fn full_payload_becomes_fields() {
        let payload: PersonPayload = serde_json::from_value(serde_json::json!({
            "first_name": "Eugenie",
            "surname": "Giesbrecht",
            "address": "Paulinenstr. 50",
            "city": "Stuttgart",
            "birth_date": "2025-02-16",
        }))
        .unwrap();
        assert_eq!(payload.into_fields().unwrap(), eugenie().fields());
    }

    #[test]
    fn missing_field_is_a_bad_request() {
        let payload: PersonPayload = serde_json::from_value(serde_json::json!({
            "first_name": "Eugenie",
            "surname": "Giesbrecht",
        }))
        .unwrap();
        match payload.into_fields() {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, "address is required"),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn malformed_date_is_rejected_by_serde() {
        let parsed = serde_json::from_value::<PersonPayload>(serde_json::json!({
            "birth_date": "16.02.2025",
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let payload = PersonPayload {
            city: Some("Berlin".to_string()),
            ..Default::default()
        };
        let merged = payload.merge_into(eugenie().fields());
        assert_eq!(merged.city, "Berlin");
        assert_eq!(merged.first_name, "Eugenie");
        assert_eq!(merged.surname, "Giesbrecht");
        assert_eq!(merged.address, "Paulinenstr. 50");
        assert_eq!(merged.birth_date, eugenie().birth_date);
    }

    #[test]
    fn empty_merge_is_identity() {
        let current = eugenie().fields();
        assert_eq!(PersonPayload::default().merge_into(current.clone()), current);
    }

    #[test]
    fn natural_key_ignores_surname() {
        let a = eugenie().fields();
        let mut b = a.clone();
        b.surname = "Müller".to_string();
        assert_eq!(a.natural_key(), b.natural_key());

        b.city = "Berlin".to_string();
        assert_ne!(a.natural_key(), b.natural_key());
    }
}
