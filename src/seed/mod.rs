use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::info;

use crate::db;
use crate::error::AppResult;
use crate::models::{Person, PersonFields};

/// The record a fresh persons table is seeded with, so manual testing has
/// something to look at.
pub fn default_person() -> PersonFields {
    PersonFields {
        first_name: "Eugenie".to_string(),
        surname: "Giesbrecht".to_string(),
        address: "Paulinenstr. 50".to_string(),
        city: "Stuttgart".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2025, 2, 16).expect("valid default birth date"),
    }
}

/// Insert [`default_person`] unless a record with its natural key is already
/// stored. An existing record is left as is, even if its surname differs.
/// Returns the inserted row, or `None` when nothing was written.
pub async fn seed_default_person(pool: &PgPool) -> AppResult<Option<Person>> {
    let fields = default_person();

    if let Some(existing) = db::find_person_by_natural_key(pool, &fields).await? {
        info!(id = existing.id, "Default person already present, skipping seed");
        return Ok(None);
    }

    let person = db::insert_person(pool, &fields).await?;
    info!(id = person.id, "Seeded default person");
    Ok(Some(person))
}
