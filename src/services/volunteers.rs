//! Services backing the volunteer management page.

use crate::domain::filter::{FilterSpec, StatusEnum};
use crate::domain::transition::Transition;
use crate::domain::types::SearchTerm;
use crate::domain::volunteer::{VolunteerAction, VolunteerStatus};
use crate::dto::volunteers::{VolunteerActionOutcome, VolunteersPageData, VolunteersQuery};
use crate::forms::volunteers::{VolunteerActionForm, VolunteerActionPayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Pager, Paginated};
use crate::presenter::{present_all, present_status_summary, present_volunteer};
use crate::repository::{VolunteerListQuery, VolunteerReader, VolunteerWriter};
use crate::services::{ServiceError, ServiceResult, VOLUNTEER_MANAGERS, ensure_role};

/// Loads one filtered page of volunteers plus the per-status summary.
pub fn load_volunteers_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: VolunteersQuery,
    page_size: usize,
) -> ServiceResult<VolunteersPageData>
where
    R: VolunteerReader + ?Sized,
{
    ensure_role(user, VOLUNTEER_MANAGERS)?;

    let filter = FilterSpec::<VolunteerStatus>::from_params(
        query.status.as_deref(),
        query.search.as_deref(),
        query.page.as_deref(),
        page_size,
    )?;
    let list_query = VolunteerListQuery::new(filter);

    let total = repo.count_volunteers(&list_query).map_err(|err| {
        log::error!("Failed to count volunteers: {err}");
        err
    })?;
    let pager = Pager::new(total, list_query.filter.page, page_size);

    let rows = repo.list_volunteers(&list_query, &pager).map_err(|err| {
        log::error!("Failed to list volunteers: {err}");
        err
    })?;
    let volunteers = present_all(rows, present_volunteer).map_err(|err| {
        log::error!("Failed to present volunteers: {err}");
        err
    })?;

    let counts = repo.count_volunteers_by_status().map_err(|err| {
        log::error!("Failed to count volunteers by status: {err}");
        err
    })?;

    Ok(VolunteersPageData {
        volunteers: Paginated::new(volunteers, &pager),
        status: list_query.filter.status.as_param(),
        search_query: list_query.filter.search.map(SearchTerm::into_inner),
        summary: present_status_summary::<VolunteerStatus>(counts).map_err(|err| {
            log::error!("Failed to summarise volunteers: {err}");
            err
        })?,
    })
}

/// Applies approve/reject/deactivate or the confirmed cascading delete.
pub fn apply_volunteer_action<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: VolunteerActionForm,
) -> ServiceResult<VolunteerActionOutcome>
where
    R: VolunteerReader + VolunteerWriter + ?Sized,
{
    ensure_role(user, VOLUNTEER_MANAGERS)?;

    let payload = VolunteerActionPayload::try_from(form)?;
    let id = payload.volunteer_id;

    if payload.action == VolunteerAction::Delete {
        let outcome = repo.delete_volunteer(id).map_err(|err| {
            log::error!("Failed to delete volunteer {id}: {err}");
            err
        })?;
        log::info!(
            "Volunteer {id} deleted by {}: {} assignments removed, {} accounts deactivated",
            user.email,
            outcome.removed_assignments,
            outcome.deactivated_accounts
        );
        return Ok(VolunteerActionOutcome::Deleted(outcome));
    }

    let volunteer = repo
        .get_volunteer_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load volunteer {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    match volunteer.status.apply(payload.action)? {
        Transition::Changed { from, to } => {
            repo.set_volunteer_status(id, to).map_err(|err| {
                log::error!("Failed to update volunteer {id}: {err}");
                err
            })?;
            log::info!("Volunteer {id} moved from '{from}' to '{to}' by {}", user.email);
            Ok(VolunteerActionOutcome::StatusChanged { to: to.as_str() })
        }
        Transition::Unchanged(status) => Ok(VolunteerActionOutcome::Unchanged {
            status: status.as_str(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::filter::StatusFilter;
    use crate::domain::types::VolunteerId;
    use crate::domain::volunteer::{DeleteOutcome, Volunteer};
    use crate::models::volunteer::VolunteerRow;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::user;

    fn row(id: i32) -> VolunteerRow {
        VolunteerRow {
            id,
            first_name: "Ana".into(),
            middle_name: None,
            last_name: "Reyes".into(),
            email: format!("ana{id}@example.com"),
            contact_number: "0917".into(),
            volunteer_status: "Active".into(),
            application_date: "2025-03-01".into(),
        }
    }

    fn volunteer(status: VolunteerStatus) -> Volunteer {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date");
        Volunteer {
            id: VolunteerId::new(5).expect("valid id"),
            user_id: None,
            first_name: "Ana".into(),
            middle_name: None,
            last_name: "Reyes".into(),
            email: "ana@example.com".into(),
            contact_number: "0917".into(),
            status,
            application_date: date,
            created_at: date.and_hms_opt(8, 0, 0).expect("valid time"),
        }
    }

    fn action_form(action: &str, confirm: Option<&str>) -> VolunteerActionForm {
        VolunteerActionForm {
            action: action.to_string(),
            volunteer_id: 5,
            confirm_permanent: confirm.map(str::to_string),
        }
    }

    #[test]
    fn employee_cannot_list_volunteers() {
        let repo = MockRepository::new();
        let result =
            load_volunteers_page(&repo, &user("EMPLOYEE"), VolunteersQuery::default(), 10);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn out_of_range_page_is_clamped_to_the_last_page() {
        let mut repo = MockRepository::new();
        repo.expect_count_volunteers().returning(|_| Ok(95));
        repo.expect_list_volunteers()
            .withf(|_, pager| pager.offset == 90 && pager.limit() == 10)
            .returning(|_, _| Ok((91..=95).map(row).collect()));
        repo.expect_count_volunteers_by_status()
            .returning(|| Ok(vec![("Active".to_string(), 95)]));

        let query = VolunteersQuery {
            page: Some("15".to_string()),
            ..Default::default()
        };
        let page = load_volunteers_page(&repo, &user("ADMIN"), query, 10).expect("page loads");

        assert_eq!(page.volunteers.page, 10);
        assert_eq!(page.volunteers.total_pages, 10);
        assert_eq!(page.volunteers.items.len(), 5);
        assert_eq!(page.status, "all");
        let active = page
            .summary
            .iter()
            .find(|s| s.status == "Active")
            .expect("active bucket");
        assert_eq!(active.count, 95);
        assert_eq!(page.summary.len(), VolunteerStatus::ALL.len());
    }

    #[test]
    fn filters_reach_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_count_volunteers()
            .withf(|q| {
                q.filter.status == StatusFilter::Only(VolunteerStatus::OnLeave)
                    && q.filter.search.as_deref() == Some("ana")
            })
            .returning(|_| Ok(0));
        repo.expect_list_volunteers().returning(|_, _| Ok(vec![]));
        repo.expect_count_volunteers_by_status()
            .returning(|| Ok(vec![]));

        let query = VolunteersQuery {
            status: Some("On Leave".to_string()),
            search: Some("  ana ".to_string()),
            page: None,
        };
        let page = load_volunteers_page(&repo, &user("ADMIN"), query, 10).expect("page loads");
        assert_eq!(page.volunteers.total_pages, 1);
        assert_eq!(page.search_query.as_deref(), Some("ana"));
    }

    #[test]
    fn unknown_status_filter_is_a_form_error() {
        let repo = MockRepository::new();
        let query = VolunteersQuery {
            status: Some("Retired".to_string()),
            ..Default::default()
        };
        let result = load_volunteers_page(&repo, &user("ADMIN"), query, 10);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn unknown_stored_status_is_a_data_defect() {
        let mut repo = MockRepository::new();
        repo.expect_count_volunteers().returning(|_| Ok(1));
        repo.expect_list_volunteers().returning(|_, _| {
            let mut bad = row(1);
            bad.volunteer_status = "Retired".into();
            Ok(vec![bad])
        });

        let result = load_volunteers_page(&repo, &user("ADMIN"), VolunteersQuery::default(), 10);
        assert!(matches!(result, Err(ServiceError::DataDefect(_))));
    }

    #[test]
    fn approve_moves_new_to_active() {
        let mut repo = MockRepository::new();
        repo.expect_get_volunteer_by_id()
            .returning(|_| Ok(Some(volunteer(VolunteerStatus::New))));
        repo.expect_set_volunteer_status()
            .with(eq(VolunteerId::new(5).unwrap()), eq(VolunteerStatus::Active))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome = apply_volunteer_action(&repo, &user("ADMIN"), action_form("approve", None))
            .expect("approved");
        assert_eq!(
            outcome,
            VolunteerActionOutcome::StatusChanged { to: "Active" }
        );
    }

    #[test]
    fn approving_an_active_volunteer_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_volunteer_by_id()
            .returning(|_| Ok(Some(volunteer(VolunteerStatus::Active))));
        repo.expect_set_volunteer_status().times(0);

        let result = apply_volunteer_action(&repo, &user("ADMIN"), action_form("approve", None));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn deactivating_twice_is_a_no_op() {
        let mut repo = MockRepository::new();
        repo.expect_get_volunteer_by_id()
            .returning(|_| Ok(Some(volunteer(VolunteerStatus::Inactive))));
        repo.expect_set_volunteer_status().times(0);

        let outcome =
            apply_volunteer_action(&repo, &user("ADMIN"), action_form("deactivate", None))
                .expect("no-op");
        assert_eq!(
            outcome,
            VolunteerActionOutcome::Unchanged { status: "Inactive" }
        );
    }

    #[test]
    fn confirmed_delete_runs_the_cascade() {
        let mut repo = MockRepository::new();
        repo.expect_delete_volunteer().times(1).returning(|_| {
            Ok(DeleteOutcome {
                removed_assignments: 3,
                deactivated_accounts: 1,
            })
        });

        let outcome =
            apply_volunteer_action(&repo, &user("ADMIN"), action_form("delete", Some("true")))
                .expect("deleted");
        assert_eq!(
            outcome,
            VolunteerActionOutcome::Deleted(DeleteOutcome {
                removed_assignments: 3,
                deactivated_accounts: 1,
            })
        );
    }

    #[test]
    fn unconfirmed_delete_never_reaches_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_delete_volunteer().times(0);

        let result = apply_volunteer_action(&repo, &user("ADMIN"), action_form("delete", None));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn rolled_back_delete_surfaces_as_transaction_error() {
        let mut repo = MockRepository::new();
        repo.expect_delete_volunteer()
            .returning(|_| Err(RepositoryError::TransactionError("disk I/O error".into())));

        let result =
            apply_volunteer_action(&repo, &user("ADMIN"), action_form("delete", Some("on")));
        assert!(matches!(result, Err(ServiceError::Transaction(_))));
    }

    #[test]
    fn missing_volunteer_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_volunteer_by_id().returning(|_| Ok(None));

        let result =
            apply_volunteer_action(&repo, &user("ADMIN"), action_form("deactivate", None));
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
