use diesel::prelude::*;

use crate::domain::filter::StatusEnum;
use crate::domain::types::VolunteerId;
use crate::domain::volunteer::{DeleteOutcome, Volunteer, VolunteerStatus};
use crate::models::volunteer::VolunteerRow;
use crate::pagination::Pager;
use crate::query_builder::{WhereClause, build};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, VolunteerListQuery, VolunteerReader, VolunteerWriter};

const TABLE: &str = "volunteers";
const STATUS_COLUMN: &str = "volunteer_status";
const ORDER_BY: &str = "created_at DESC, id DESC";
/// Full name, middle name, email and phone are searchable.
const SEARCHABLE: &[&str] = &[
    "first_name || ' ' || last_name",
    "middle_name",
    "email",
    "contact_number",
];

fn where_clause(query: &VolunteerListQuery) -> WhereClause {
    build(&query.filter, SEARCHABLE, STATUS_COLUMN)
}

impl VolunteerReader for DieselRepository {
    fn get_volunteer_by_id(&self, id: VolunteerId) -> RepositoryResult<Option<Volunteer>> {
        use crate::models::volunteer::Volunteer as DbVolunteer;
        use crate::schema::volunteers;

        let mut conn = self.conn()?;
        let volunteer = volunteers::table
            .find(id.get())
            .first::<DbVolunteer>(&mut conn)
            .optional()?;

        volunteer
            .map(Volunteer::try_from)
            .transpose()
            .map_err(RepositoryError::from)
    }

    fn count_volunteers(&self, query: &VolunteerListQuery) -> RepositoryResult<usize> {
        self.count_where(TABLE, &where_clause(query))
    }

    fn list_volunteers(
        &self,
        query: &VolunteerListQuery,
        pager: &Pager,
    ) -> RepositoryResult<Vec<VolunteerRow>> {
        self.page_where(
            TABLE,
            VolunteerRow::COLUMNS,
            &where_clause(query),
            ORDER_BY,
            pager,
        )
    }

    fn count_volunteers_by_status(&self) -> RepositoryResult<Vec<(String, usize)>> {
        self.group_count_where(TABLE, STATUS_COLUMN, &WhereClause::default())
    }
}

impl VolunteerWriter for DieselRepository {
    fn set_volunteer_status(
        &self,
        id: VolunteerId,
        status: VolunteerStatus,
    ) -> RepositoryResult<()> {
        use crate::schema::volunteers;

        let mut conn = self.conn()?;
        let affected = diesel::update(volunteers::table.find(id.get()))
            .set(volunteers::volunteer_status.eq(status.as_str()))
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    fn delete_volunteer(&self, id: VolunteerId) -> RepositoryResult<DeleteOutcome> {
        use crate::schema::{users, volunteer_assignments, volunteers};

        self.with_transaction(|conn| {
            let (user_id, email) = volunteers::table
                .find(id.get())
                .select((volunteers::user_id, volunteers::email))
                .first::<(Option<i32>, String)>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)?;

            let deactivated_accounts = match user_id {
                Some(user_id) => diesel::update(
                    users::table.filter(users::id.eq(user_id).or(users::email.eq(&email))),
                )
                .set(users::is_verified.eq(false))
                .execute(conn)?,
                None => diesel::update(users::table.filter(users::email.eq(&email)))
                    .set(users::is_verified.eq(false))
                    .execute(conn)?,
            };

            let removed_assignments = diesel::delete(
                volunteer_assignments::table
                    .filter(volunteer_assignments::volunteer_id.eq(id.get())),
            )
            .execute(conn)?;

            let deleted = diesel::delete(volunteers::table.find(id.get())).execute(conn)?;
            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(DeleteOutcome {
                removed_assignments,
                deactivated_accounts,
            })
        })
    }
}
