//! Column lists, joins and row mappers shared by the MySQL repositories
//!
//! Property columns carry a `p_` prefix and joined users a per-role table
//! alias (`ow` owner, `br` broker, `oc` occupant, `ll` landlord, `tn`
//! tenant) so one row can hold an agreement, its property and five users.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Row};
use uuid::Uuid;

use rh_core::domain::entities::{Address, Property, RentalAgreement, User};
use rh_core::domain::value_objects::{AgreementDetails, PropertyDetails, UserSummary};
use rh_core::errors::DomainError;

pub(crate) const USER_COLUMNS: &str = "id, email, full_name, phone, password_hash, \
    failed_login_attempts, locked_until, created_at, updated_at";

pub(crate) const PROPERTY_COLUMNS: &str = "p.id AS p_id, p.street AS p_street, \
    p.postal_code AS p_postal_code, p.city AS p_city, p.state AS p_state, \
    p.neighborhood AS p_neighborhood, p.number AS p_number, p.complement AS p_complement, \
    p.owner_id AS p_owner_id, p.broker_id AS p_broker_id, p.occupant_id AS p_occupant_id, \
    p.created_at AS p_created_at, p.updated_at AS p_updated_at";

pub(crate) const AGREEMENT_COLUMNS: &str = "a.id, a.property_id, a.landlord_id, a.tenant_id, \
    a.landlord_signed, a.tenant_signed, a.closed_at, a.due_date, a.monthly_rent, \
    a.created_at, a.updated_at";

const PROPERTY_PARTY_JOINS: &str = "JOIN users ow ON ow.id = p.owner_id \
    LEFT JOIN users br ON br.id = p.broker_id \
    LEFT JOIN users oc ON oc.id = p.occupant_id";

/// `SELECT` of a property with owner, broker and occupant, without `WHERE`
pub(crate) static PROPERTY_DETAILS_SELECT: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT {}, {}, {}, {} FROM properties p {}",
        PROPERTY_COLUMNS,
        summary_columns("ow"),
        summary_columns("br"),
        summary_columns("oc"),
        PROPERTY_PARTY_JOINS,
    )
});

/// `SELECT` of an agreement with its property, the property's parties,
/// landlord and tenant, without `WHERE`
pub(crate) static AGREEMENT_DETAILS_SELECT: Lazy<String> = Lazy::new(|| {
    format!(
        "SELECT {}, {}, {}, {}, {}, {}, {} \
         FROM rental_agreements a \
         JOIN properties p ON p.id = a.property_id {} \
         JOIN users ll ON ll.id = a.landlord_id \
         JOIN users tn ON tn.id = a.tenant_id",
        AGREEMENT_COLUMNS,
        PROPERTY_COLUMNS,
        summary_columns("ow"),
        summary_columns("br"),
        summary_columns("oc"),
        summary_columns("ll"),
        summary_columns("tn"),
        PROPERTY_PARTY_JOINS,
    )
});

fn summary_columns(alias: &str) -> String {
    format!(
        "{a}.id AS {a}_user_id, {a}.email AS {a}_email, {a}.full_name AS {a}_full_name, {a}.phone AS {a}_phone",
        a = alias
    )
}

pub(crate) fn internal(context: &str, err: impl Display) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, err),
    }
}

/// Whether a statement failed on a unique key
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map_or(false, |db_err| db_err.is_unique_violation())
}

fn get<'r, T>(row: &'r MySqlRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, MySql> + sqlx::Type<MySql>,
{
    row.try_get(column)
        .map_err(|e| internal(&format!("Failed to get {}", column), e))
}

fn get_uuid(row: &MySqlRow, column: &str) -> Result<Uuid, DomainError> {
    let value: String = get(row, column)?;
    Uuid::parse_str(&value).map_err(|e| internal(&format!("Invalid UUID in {}", column), e))
}

fn get_optional_uuid(row: &MySqlRow, column: &str) -> Result<Option<Uuid>, DomainError> {
    let value: Option<String> = get(row, column)?;
    value
        .map(|v| Uuid::parse_str(&v))
        .transpose()
        .map_err(|e| internal(&format!("Invalid UUID in {}", column), e))
}

pub(crate) fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
    Ok(User {
        id: get_uuid(row, "id")?,
        email: get(row, "email")?,
        full_name: get(row, "full_name")?,
        phone: get(row, "phone")?,
        password_hash: get(row, "password_hash")?,
        failed_login_attempts: get(row, "failed_login_attempts")?,
        locked_until: get::<Option<DateTime<Utc>>>(row, "locked_until")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

pub(crate) fn row_to_property(row: &MySqlRow) -> Result<Property, DomainError> {
    Ok(Property {
        id: get_uuid(row, "p_id")?,
        address: Address {
            street: get(row, "p_street")?,
            postal_code: get(row, "p_postal_code")?,
            city: get(row, "p_city")?,
            state: get(row, "p_state")?,
            neighborhood: get(row, "p_neighborhood")?,
            number: get(row, "p_number")?,
            complement: get(row, "p_complement")?,
        },
        owner_id: get_uuid(row, "p_owner_id")?,
        broker_id: get_optional_uuid(row, "p_broker_id")?,
        occupant_id: get_optional_uuid(row, "p_occupant_id")?,
        created_at: get::<DateTime<Utc>>(row, "p_created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "p_updated_at")?,
    })
}

pub(crate) fn row_to_agreement(row: &MySqlRow) -> Result<RentalAgreement, DomainError> {
    Ok(RentalAgreement {
        id: get_uuid(row, "id")?,
        property_id: get_uuid(row, "property_id")?,
        landlord_id: get_uuid(row, "landlord_id")?,
        tenant_id: get_uuid(row, "tenant_id")?,
        landlord_signed: get(row, "landlord_signed")?,
        tenant_signed: get(row, "tenant_signed")?,
        closed_at: get::<Option<DateTime<Utc>>>(row, "closed_at")?,
        due_date: get::<NaiveDate>(row, "due_date")?,
        monthly_rent: get::<Decimal>(row, "monthly_rent")?,
        created_at: get::<DateTime<Utc>>(row, "created_at")?,
        updated_at: get::<DateTime<Utc>>(row, "updated_at")?,
    })
}

/// Summary of the user joined under `alias`; `None` for an empty LEFT JOIN
fn row_to_summary(row: &MySqlRow, alias: &str) -> Result<Option<UserSummary>, DomainError> {
    let Some(id) = get_optional_uuid(row, &format!("{}_user_id", alias))? else {
        return Ok(None);
    };

    Ok(Some(UserSummary {
        id,
        email: get(row, &format!("{}_email", alias))?,
        full_name: get(row, &format!("{}_full_name", alias))?,
        phone: get(row, &format!("{}_phone", alias))?,
    }))
}

fn required_summary(row: &MySqlRow, alias: &str) -> Result<UserSummary, DomainError> {
    row_to_summary(row, alias)?.ok_or_else(|| DomainError::Internal {
        message: format!("Joined user {} is missing", alias),
    })
}

pub(crate) fn row_to_property_details(row: &MySqlRow) -> Result<PropertyDetails, DomainError> {
    let property = row_to_property(row)?;
    Ok(PropertyDetails::from_parts(
        &property,
        required_summary(row, "ow")?,
        row_to_summary(row, "br")?,
        row_to_summary(row, "oc")?,
    ))
}

pub(crate) fn row_to_agreement_details(row: &MySqlRow) -> Result<AgreementDetails, DomainError> {
    let agreement = row_to_agreement(row)?;
    Ok(AgreementDetails::from_parts(
        &agreement,
        row_to_property_details(row)?,
        required_summary(row, "ll")?,
        required_summary(row, "tn")?,
    ))
}
