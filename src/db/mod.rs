use sqlx::{PgExecutor, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::ServiceKind;

// ── Schema ────────────────────────────────────────────────────────────────────

const CREATE_PERSONS: &str = r#"
    CREATE TABLE IF NOT EXISTS persons (
        id         BIGSERIAL    PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        surname    VARCHAR(100) NOT NULL,
        address    VARCHAR(255) NOT NULL,
        city       VARCHAR(100) NOT NULL,
        birth_date DATE         NOT NULL
    )
"#;

const CREATE_STUDENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS students (
        id         BIGSERIAL    PRIMARY KEY,
        first_name VARCHAR(100) NOT NULL,
        surname    VARCHAR(100) NOT NULL
    )
"#;

/// Create the service's table if it does not exist yet. Idempotent.
pub async fn ensure_table(pool: &PgPool, kind: ServiceKind) -> AppResult<()> {
    let ddl = match kind {
        ServiceKind::Persons => CREATE_PERSONS,
        ServiceKind::Students => CREATE_STUDENTS,
    };
    sqlx::query(ddl).execute(pool).await?;
    Ok(())
}

// ── Persons ───────────────────────────────────────────────────────────────────

/// What a `POST /persons` did to the table.
#[derive(Debug)]
pub enum PersonCreated {
    Inserted(Person),
    SurnameUpdated(Person),
}

pub async fn fetch_all_persons(pool: &PgPool) -> AppResult<Vec<Person>> {
    let persons = sqlx::query_as::<_, Person>(
        "SELECT id, first_name, surname, address, city, birth_date
         FROM persons ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(persons)
}

pub async fn fetch_person_by_id(pool: &PgPool, id: i64) -> AppResult<Person> {
    sqlx::query_as::<_, Person>(
        "SELECT id, first_name, surname, address, city, birth_date
         FROM persons WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(ServiceKind::Persons))
}

/// First record sharing first name, address, city and birth date, whatever
/// its surname.
pub async fn find_person_by_natural_key(
    pool: &PgPool,
    fields: &PersonFields,
) -> AppResult<Option<Person>> {
    let person = sqlx::query_as::<_, Person>(
        r#"
        SELECT id, first_name, surname, address, city, birth_date
        FROM persons
        WHERE first_name = $1 AND address = $2 AND city = $3 AND birth_date = $4
        ORDER BY id ASC
        LIMIT 1
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.address)
    .bind(&fields.city)
    .bind(fields.birth_date)
    .fetch_optional(pool)
    .await?;

    Ok(person)
}

pub async fn insert_person<'e, E>(executor: E, fields: &PersonFields) -> AppResult<Person>
where
    E: PgExecutor<'e>,
{
    let person = sqlx::query_as::<_, Person>(
        r#"
        INSERT INTO persons (first_name, surname, address, city, birth_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, first_name, surname, address, city, birth_date
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.surname)
    .bind(&fields.address)
    .bind(&fields.city)
    .bind(fields.birth_date)
    .fetch_one(executor)
    .await?;

    Ok(person)
}

/// Insert a person, or rewrite the surname of the record that already has the
/// same first name, address, city and birth date.
///
/// Runs in one transaction holding an advisory lock on the natural key, so two
/// concurrent creates for the same person cannot both insert.
pub async fn create_or_update_person(
    pool: &PgPool,
    fields: &PersonFields,
) -> AppResult<PersonCreated> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
        .bind(fields.natural_key())
        .execute(&mut *tx)
        .await?;

    let existing = sqlx::query_as::<_, Person>(
        r#"
        SELECT id, first_name, surname, address, city, birth_date
        FROM persons
        WHERE first_name = $1 AND address = $2 AND city = $3 AND birth_date = $4
        ORDER BY id ASC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.address)
    .bind(&fields.city)
    .bind(fields.birth_date)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match existing {
        // Dropping `tx` rolls it back.
        Some(person) if person.surname == fields.surname => {
            return Err(AppError::Conflict("Person already exists".to_string()));
        }
        Some(person) => {
            let updated = sqlx::query_as::<_, Person>(
                r#"
                UPDATE persons SET surname = $1
                WHERE id = $2
                RETURNING id, first_name, surname, address, city, birth_date
                "#,
            )
            .bind(&fields.surname)
            .bind(person.id)
            .fetch_one(&mut *tx)
            .await?;
            PersonCreated::SurnameUpdated(updated)
        }
        None => PersonCreated::Inserted(insert_person(&mut *tx, fields).await?),
    };

    tx.commit().await?;
    Ok(outcome)
}

pub async fn update_person(pool: &PgPool, id: i64, payload: PersonPayload) -> AppResult<Person> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_as::<_, Person>(
        "SELECT id, first_name, surname, address, city, birth_date
         FROM persons WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::not_found(ServiceKind::Persons))?;

    let merged = payload.merge_into(existing.fields());

    let person = sqlx::query_as::<_, Person>(
        r#"
        UPDATE persons
        SET first_name = $1,
            surname    = $2,
            address    = $3,
            city       = $4,
            birth_date = $5
        WHERE id = $6
        RETURNING id, first_name, surname, address, city, birth_date
        "#,
    )
    .bind(&merged.first_name)
    .bind(&merged.surname)
    .bind(&merged.address)
    .bind(&merged.city)
    .bind(merged.birth_date)
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(person)
}

pub async fn delete_person(pool: &PgPool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM persons WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(ServiceKind::Persons));
    }
    Ok(())
}

// ── Students ──────────────────────────────────────────────────────────────────

pub async fn fetch_all_students(pool: &PgPool) -> AppResult<Vec<Student>> {
    let students = sqlx::query_as::<_, Student>(
        "SELECT id, first_name, surname FROM students ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(students)
}

pub async fn fetch_student_by_id(pool: &PgPool, id: i64) -> AppResult<Student> {
    sqlx::query_as::<_, Student>("SELECT id, first_name, surname FROM students WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found(ServiceKind::Students))
}

pub async fn insert_student(pool: &PgPool, fields: &StudentFields) -> AppResult<Student> {
    let student = sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (first_name, surname)
        VALUES ($1, $2)
        RETURNING id, first_name, surname
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.surname)
    .fetch_one(pool)
    .await?;

    Ok(student)
}

/// Single-statement overwrite; no read of the previous values is needed.
pub async fn update_student(pool: &PgPool, id: i64, fields: &StudentFields) -> AppResult<Student> {
    sqlx::query_as::<_, Student>(
        r#"
        UPDATE students
        SET first_name = $1,
            surname    = $2
        WHERE id = $3
        RETURNING id, first_name, surname
        "#,
    )
    .bind(&fields.first_name)
    .bind(&fields.surname)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found(ServiceKind::Students))
}

pub async fn delete_student(pool: &PgPool, id: i64) -> AppResult<()> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(ServiceKind::Students));
    }
    Ok(())
}
