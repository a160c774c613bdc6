//! Services backing the feedback moderation page.

use crate::domain::feedback::{FeedbackAction, FeedbackStatus, Visibility};
use crate::domain::filter::{FilterSpec, StatusEnum};
use crate::domain::transition::Transition;
use crate::domain::types::SearchTerm;
use crate::dto::feedback::{FeedbackActionOutcome, FeedbackPageData, FeedbackQuery};
use crate::forms::feedback::{FeedbackActionForm, FeedbackActionPayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::{Pager, Paginated};
use crate::presenter::{present_all, present_feedback};
use crate::repository::{FeedbackListQuery, FeedbackReader, FeedbackWriter};
use crate::services::{FEEDBACK_MODERATORS, ServiceError, ServiceResult, ensure_role};

/// Loads one filtered page of feedback plus the moderation statistics.
pub fn load_feedback_page<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: FeedbackQuery,
    page_size: usize,
) -> ServiceResult<FeedbackPageData>
where
    R: FeedbackReader + ?Sized,
{
    ensure_role(user, FEEDBACK_MODERATORS)?;

    let filter = FilterSpec::<FeedbackStatus>::from_params(
        query.status.as_deref(),
        query.search.as_deref(),
        query.page.as_deref(),
        page_size,
    )?;
    let visibility = Visibility::parse(query.visibility.as_deref())?;
    let list_query = FeedbackListQuery::new(filter).visibility(visibility);

    let total = repo.count_feedback(&list_query).map_err(|err| {
        log::error!("Failed to count feedback: {err}");
        err
    })?;
    let pager = Pager::new(total, list_query.filter.page, page_size);

    let rows = repo.list_feedback(&list_query, &pager).map_err(|err| {
        log::error!("Failed to list feedback: {err}");
        err
    })?;
    let feedback = present_all(rows, present_feedback).map_err(|err| {
        log::error!("Failed to present feedback: {err}");
        err
    })?;

    let stats = repo.feedback_stats().map_err(|err| {
        log::error!("Failed to load feedback statistics: {err}");
        err
    })?;

    Ok(FeedbackPageData {
        feedback: Paginated::new(feedback, &pager),
        stats,
        status: list_query.filter.status.as_param(),
        visibility: list_query.visibility.as_param(),
        search_query: list_query.filter.search.map(SearchTerm::into_inner),
    })
}

/// Approves, rejects or (with confirmation) deletes a feedback entry.
pub fn apply_feedback_action<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: FeedbackActionForm,
) -> ServiceResult<FeedbackActionOutcome>
where
    R: FeedbackReader + FeedbackWriter + ?Sized,
{
    ensure_role(user, FEEDBACK_MODERATORS)?;

    let payload = FeedbackActionPayload::try_from(form)?;
    let id = payload.feedback_id;

    if payload.action == FeedbackAction::Delete {
        repo.delete_feedback(id).map_err(|err| {
            log::error!("Failed to delete feedback {id}: {err}");
            err
        })?;
        log::info!("Feedback {id} deleted by {}", user.email);
        return Ok(FeedbackActionOutcome::Deleted);
    }

    let feedback = repo
        .get_feedback_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load feedback {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    match feedback.status.apply(payload.action)? {
        Transition::Changed { to, .. } => {
            repo.set_feedback_status(id, to).map_err(|err| {
                log::error!("Failed to update feedback {id}: {err}");
                err
            })?;
            Ok(FeedbackActionOutcome::StatusChanged { to: to.as_str() })
        }
        Transition::Unchanged(status) => Ok(FeedbackActionOutcome::Unchanged {
            status: status.as_str(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    use super::*;
    use crate::domain::feedback::{Feedback, FeedbackStats};
    use crate::domain::types::FeedbackId;
    use crate::models::feedback::FeedbackRow;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::user;

    fn feedback(status: FeedbackStatus) -> Feedback {
        Feedback {
            id: FeedbackId::new(3).expect("valid id"),
            name: Some("Ben".into()),
            email: Some("ben@example.com".into()),
            message: "Quick response".into(),
            rating: 5,
            is_anonymous: false,
            status,
            created_at: NaiveDate::from_ymd_opt(2025, 2, 1)
                .and_then(|d| d.and_hms_opt(9, 30, 0))
                .expect("valid timestamp"),
        }
    }

    fn row() -> FeedbackRow {
        FeedbackRow {
            id: 3,
            name: Some("Ben".into()),
            email: Some("ben@example.com".into()),
            message: "Quick response".into(),
            rating: 4,
            is_anonymous: false,
            status: "pending".into(),
            created_at: "2025-02-01 09:30:00".into(),
        }
    }

    fn form(action: &str, confirm: Option<&str>) -> FeedbackActionForm {
        FeedbackActionForm {
            action: action.to_string(),
            feedback_id: 3,
            confirm_permanent: confirm.map(str::to_string),
        }
    }

    #[test]
    fn employees_may_moderate() {
        let mut repo = MockRepository::new();
        repo.expect_count_feedback().returning(|_| Ok(1));
        repo.expect_list_feedback().returning(|_, _| Ok(vec![row()]));
        repo.expect_feedback_stats().returning(|| {
            Ok(FeedbackStats {
                total: 1,
                pending: 1,
                average_rating: Some(4.0),
                ..Default::default()
            })
        });

        let page = load_feedback_page(&repo, &user("EMPLOYEE"), FeedbackQuery::default(), 10)
            .expect("page loads");
        assert_eq!(page.feedback.items.len(), 1);
        assert_eq!(page.feedback.items[0].display_name, "Ben (ben@example.com)");
        assert_eq!(page.stats.pending, 1);
        assert_eq!(page.visibility, "all");
    }

    #[test]
    fn visibility_filter_reaches_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_count_feedback()
            .withf(|q| q.visibility == Visibility::Anonymous)
            .returning(|_| Ok(0));
        repo.expect_list_feedback().returning(|_, _| Ok(vec![]));
        repo.expect_feedback_stats()
            .returning(|| Ok(FeedbackStats::default()));

        let query = FeedbackQuery {
            visibility: Some("anonymous".into()),
            ..Default::default()
        };
        let page = load_feedback_page(&repo, &user("ADMIN"), query, 10).expect("page loads");
        assert_eq!(page.visibility, "anonymous");
    }

    #[test]
    fn other_roles_are_unauthorized() {
        let repo = MockRepository::new();
        let result = load_feedback_page(&repo, &user("USER"), FeedbackQuery::default(), 10);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn approve_persists_the_new_status() {
        let mut repo = MockRepository::new();
        repo.expect_get_feedback_by_id()
            .returning(|_| Ok(Some(feedback(FeedbackStatus::Pending))));
        repo.expect_set_feedback_status()
            .with(eq(FeedbackId::new(3).unwrap()), eq(FeedbackStatus::Approved))
            .times(1)
            .returning(|_, _| Ok(()));

        let outcome =
            apply_feedback_action(&repo, &user("ADMIN"), form("approve", None)).expect("approved");
        assert_eq!(
            outcome,
            FeedbackActionOutcome::StatusChanged { to: "approved" }
        );
    }

    #[test]
    fn repeated_reject_writes_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_get_feedback_by_id()
            .returning(|_| Ok(Some(feedback(FeedbackStatus::Rejected))));
        repo.expect_set_feedback_status().times(0);

        let outcome =
            apply_feedback_action(&repo, &user("ADMIN"), form("reject", None)).expect("no-op");
        assert_eq!(
            outcome,
            FeedbackActionOutcome::Unchanged { status: "rejected" }
        );
    }

    #[test]
    fn confirmed_delete_removes_the_entry() {
        let mut repo = MockRepository::new();
        repo.expect_delete_feedback()
            .with(eq(FeedbackId::new(3).unwrap()))
            .times(1)
            .returning(|_| Ok(()));

        let outcome = apply_feedback_action(&repo, &user("EMPLOYEE"), form("delete", Some("on")))
            .expect("deleted");
        assert_eq!(outcome, FeedbackActionOutcome::Deleted);
    }
}
