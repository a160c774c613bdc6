//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::feedback::{Feedback, FeedbackStats, FeedbackStatus};
use crate::domain::incident::{Incident, IncidentStatusChange};
use crate::domain::types::{FeedbackId, IncidentId, VolunteerId};
use crate::domain::volunteer::{DeleteOutcome, Volunteer, VolunteerStatus};
use crate::models::feedback::FeedbackRow;
use crate::models::incident::IncidentRow;
use crate::models::volunteer::VolunteerRow;
use crate::pagination::Pager;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    FeedbackListQuery, FeedbackReader, FeedbackWriter, IncidentListQuery, IncidentReader,
    IncidentWriter, VolunteerListQuery, VolunteerReader, VolunteerWriter,
};

mock! {
    pub Repository {}

    impl VolunteerReader for Repository {
        fn get_volunteer_by_id(&self, id: VolunteerId) -> RepositoryResult<Option<Volunteer>>;
        fn count_volunteers(&self, query: &VolunteerListQuery) -> RepositoryResult<usize>;
        fn list_volunteers(
            &self,
            query: &VolunteerListQuery,
            pager: &Pager,
        ) -> RepositoryResult<Vec<VolunteerRow>>;
        fn count_volunteers_by_status(&self) -> RepositoryResult<Vec<(String, usize)>>;
    }

    impl VolunteerWriter for Repository {
        fn set_volunteer_status(
            &self,
            id: VolunteerId,
            status: VolunteerStatus,
        ) -> RepositoryResult<()>;
        fn delete_volunteer(&self, id: VolunteerId) -> RepositoryResult<DeleteOutcome>;
    }

    impl FeedbackReader for Repository {
        fn get_feedback_by_id(&self, id: FeedbackId) -> RepositoryResult<Option<Feedback>>;
        fn count_feedback(&self, query: &FeedbackListQuery) -> RepositoryResult<usize>;
        fn list_feedback(
            &self,
            query: &FeedbackListQuery,
            pager: &Pager,
        ) -> RepositoryResult<Vec<FeedbackRow>>;
        fn feedback_stats(&self) -> RepositoryResult<FeedbackStats>;
        fn list_published_feedback(&self, limit: usize) -> RepositoryResult<Vec<Feedback>>;
    }

    impl FeedbackWriter for Repository {
        fn set_feedback_status(
            &self,
            id: FeedbackId,
            status: FeedbackStatus,
        ) -> RepositoryResult<()>;
        fn delete_feedback(&self, id: FeedbackId) -> RepositoryResult<()>;
    }

    impl IncidentReader for Repository {
        fn get_incident_by_id(&self, id: IncidentId) -> RepositoryResult<Option<Incident>>;
        fn count_incidents(&self, query: &IncidentListQuery) -> RepositoryResult<usize>;
        fn list_incidents(
            &self,
            query: &IncidentListQuery,
            pager: &Pager,
        ) -> RepositoryResult<Vec<IncidentRow>>;
        fn count_incidents_by_status(
            &self,
            query: &IncidentListQuery,
        ) -> RepositoryResult<Vec<(String, usize)>>;
    }

    impl IncidentWriter for Repository {
        fn record_incident_status(&self, change: &IncidentStatusChange) -> RepositoryResult<()>;
    }
}
