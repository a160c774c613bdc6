//! Services behind the JSON API.

use crate::domain::types::FeedbackId;
use crate::dto::api::PublishedFeedback;
use crate::dto::feedback::FeedbackView;
use crate::models::auth::AuthenticatedUser;
use crate::presenter::{present_feedback_record, present_published};
use crate::repository::FeedbackReader;
use crate::services::{FEEDBACK_MODERATORS, ServiceError, ServiceResult, ensure_role};

/// Number of testimonials returned by the public feed.
pub const PUBLISHED_FEEDBACK_LIMIT: usize = 10;

/// Newest approved feedback; public, no session required.
pub fn list_published_feedback<R>(repo: &R) -> ServiceResult<Vec<PublishedFeedback>>
where
    R: FeedbackReader + ?Sized,
{
    let feedback = repo
        .list_published_feedback(PUBLISHED_FEEDBACK_LIMIT)
        .map_err(|err| {
            log::error!("Failed to list published feedback: {err}");
            err
        })?;

    Ok(feedback.into_iter().map(present_published).collect())
}

/// Full details of one feedback entry for moderators.
pub fn get_feedback_details<R>(
    repo: &R,
    user: &AuthenticatedUser,
    feedback_id: i32,
) -> ServiceResult<FeedbackView>
where
    R: FeedbackReader + ?Sized,
{
    ensure_role(user, FEEDBACK_MODERATORS)?;

    let id = FeedbackId::new(feedback_id)?;
    let feedback = repo
        .get_feedback_by_id(id)
        .map_err(|err| {
            log::error!("Failed to load feedback {id}: {err}");
            err
        })?
        .ok_or(ServiceError::NotFound)?;

    Ok(present_feedback_record(feedback))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::feedback::{Feedback, FeedbackStatus};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::user;

    fn feedback(id: i32, anonymous: bool) -> Feedback {
        Feedback {
            id: FeedbackId::new(id).expect("valid id"),
            name: Some("Carla".into()),
            email: Some("carla@example.com".into()),
            message: "Thank you".into(),
            rating: 5,
            is_anonymous: anonymous,
            status: FeedbackStatus::Approved,
            created_at: NaiveDate::from_ymd_opt(2025, 8, 9)
                .and_then(|d| d.and_hms_opt(10, 0, 0))
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn published_feed_hides_anonymous_authors_and_emails() {
        let mut repo = MockRepository::new();
        repo.expect_list_published_feedback()
            .withf(|limit| *limit == PUBLISHED_FEEDBACK_LIMIT)
            .returning(|_| Ok(vec![feedback(1, true), feedback(2, false)]));

        let items = list_published_feedback(&repo).expect("feed loads");
        assert_eq!(items[0].name, "Anonymous");
        assert_eq!(items[1].name, "Carla");
        assert_eq!(items[1].created_at, "Aug 09, 2025");
    }

    #[test]
    fn details_require_a_moderator() {
        let repo = MockRepository::new();
        let result = get_feedback_details(&repo, &user("USER"), 1);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn non_positive_id_is_a_type_constraint_error() {
        let repo = MockRepository::new();
        let result = get_feedback_details(&repo, &user("ADMIN"), 0);
        assert!(matches!(result, Err(ServiceError::TypeConstraint(_))));
    }

    #[test]
    fn missing_feedback_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_feedback_by_id().returning(|_| Ok(None));
        let result = get_feedback_details(&repo, &user("EMPLOYEE"), 4);
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
