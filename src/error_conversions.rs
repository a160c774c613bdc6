//! Error conversion glue between layers.
//!
//! The domain layer does not depend on repository or service error types;
//! the `From` impls live here so `?` works across the boundaries.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::filter::FilterError;
    use crate::domain::transition::TransitionError;
    use crate::domain::types::TypeConstraintError;
    use crate::forms::FormError;
    use crate::presenter::PresentError;
    use crate::repository::errors::RepositoryError;
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<RepositoryError> for ServiceError {
        fn from(val: RepositoryError) -> Self {
            match val {
                RepositoryError::NotFound => ServiceError::NotFound,
                RepositoryError::TransactionError(msg) => ServiceError::Transaction(msg),
                // Stored values that fail domain validation.
                RepositoryError::ValidationError(msg) => ServiceError::DataDefect(msg),
                other => ServiceError::Internal(other.to_string()),
            }
        }
    }

    impl From<FilterError> for ServiceError {
        fn from(val: FilterError) -> Self {
            match val {
                // Comes from configuration, not from the request.
                FilterError::ZeroPageSize => ServiceError::Internal(val.to_string()),
                other => ServiceError::Form(other.to_string()),
            }
        }
    }

    impl From<TransitionError> for ServiceError {
        fn from(val: TransitionError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<FormError> for ServiceError {
        fn from(val: FormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<PresentError> for ServiceError {
        fn from(val: PresentError) -> Self {
            ServiceError::DataDefect(val.to_string())
        }
    }

}
