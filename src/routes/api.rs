use actix_web::{HttpResponse, Responder, get, web};
use serde_json::json;

use crate::models::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, api as api_service};

/// Public testimonials feed.
#[get("/v1/feedbacks")]
pub async fn api_v1_feedbacks(repo: web::Data<DieselRepository>) -> impl Responder {
    match api_service::list_published_feedback(repo.get_ref()) {
        Ok(feedback) => HttpResponse::Ok().json(feedback),
        Err(err) => {
            log::error!("Failed to list published feedback: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/v1/feedbacks/{feedback_id}")]
pub async fn api_v1_feedback_details(
    feedback_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match api_service::get_feedback_details(repo.get_ref(), &user, feedback_id.into_inner()) {
        Ok(feedback) => HttpResponse::Ok().json(feedback),
        Err(ServiceError::Unauthorized) => {
            HttpResponse::Forbidden().json(json!({ "error": "insufficient permissions" }))
        }
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(json!({ "error": "feedback not found" }))
        }
        Err(ServiceError::TypeConstraint(message)) => {
            HttpResponse::BadRequest().json(json!({ "error": message }))
        }
        Err(err) => {
            log::error!("Failed to load feedback details: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
