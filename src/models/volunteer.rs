//! Diesel models for volunteers and their unit assignments.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use diesel::sql_types::{Integer, Nullable, Text};

use crate::domain::filter::StatusEnum;
use crate::domain::types::{TypeConstraintError, UserId, VolunteerId};
use crate::domain::volunteer::{Volunteer as DomainVolunteer, VolunteerStatus};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::volunteers)]
/// Diesel model for [`crate::domain::volunteer::Volunteer`].
pub struct Volunteer {
    pub id: i32,
    pub user_id: Option<i32>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub contact_number: String,
    pub volunteer_status: String,
    pub application_date: NaiveDate,
    pub created_at: NaiveDateTime,
}

/// Raw list row; status and dates stay textual until presentation.
#[derive(Debug, Clone, QueryableByName, PartialEq)]
pub struct VolunteerRow {
    #[diesel(sql_type = Integer)]
    pub id: i32,
    #[diesel(sql_type = Text)]
    pub first_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub middle_name: Option<String>,
    #[diesel(sql_type = Text)]
    pub last_name: String,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Text)]
    pub contact_number: String,
    #[diesel(sql_type = Text)]
    pub volunteer_status: String,
    #[diesel(sql_type = Text)]
    pub application_date: String,
}

impl VolunteerRow {
    /// Columns selected for [`VolunteerRow`], in struct order.
    pub const COLUMNS: &'static str = "id, first_name, middle_name, last_name, email, \
        contact_number, volunteer_status, application_date";
}

impl TryFrom<Volunteer> for DomainVolunteer {
    type Error = TypeConstraintError;

    fn try_from(volunteer: Volunteer) -> Result<Self, Self::Error> {
        let status = VolunteerStatus::parse(&volunteer.volunteer_status).ok_or_else(|| {
            TypeConstraintError::InvalidValue(format!(
                "volunteer status '{}'",
                volunteer.volunteer_status
            ))
        })?;

        Ok(Self {
            id: VolunteerId::new(volunteer.id)?,
            user_id: volunteer.user_id.map(UserId::new).transpose()?,
            first_name: volunteer.first_name,
            middle_name: volunteer.middle_name,
            last_name: volunteer.last_name,
            email: volunteer.email,
            contact_number: volunteer.contact_number,
            status,
            application_date: volunteer.application_date,
            created_at: volunteer.created_at,
        })
    }
}
