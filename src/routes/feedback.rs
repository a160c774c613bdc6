use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::feedback::{FeedbackActionOutcome, FeedbackQuery};
use crate::forms::feedback::FeedbackActionForm;
use crate::forms::parse_form;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, feedback as feedback_service};

const FEEDBACK_URL: &str = "/feedback";

#[derive(Deserialize)]
struct FeedbackQueryParams {
    status: Option<String>,
    visibility: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

#[get("/feedback")]
pub async fn show_feedback(
    params: web::Query<FeedbackQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = FeedbackQuery {
        status: params.status,
        visibility: params.visibility,
        search: params.search,
        page: params.page,
    };

    match feedback_service::load_feedback_page(
        repo.get_ref(),
        &user,
        query,
        server_config.page_size,
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "feedback",
                &server_config.auth_service_url,
            );
            context.insert("feedback", &data.feedback);
            context.insert("stats", &data.stats);
            context.insert("status", data.status);
            context.insert("visibility", data.visibility);
            context.insert(
                "search_query",
                data.search_query.as_deref().unwrap_or_default(),
            );

            render_template(&tera, "feedback/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(FEEDBACK_URL)
        }
        Err(err) => {
            log::error!("Failed to render feedback: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/feedback/action")]
pub async fn feedback_action(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form = match parse_form::<FeedbackActionForm>(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected feedback action form: {err}");
            FlashMessage::error("Invalid request.").send();
            return redirect(FEEDBACK_URL);
        }
    };

    match feedback_service::apply_feedback_action(repo.get_ref(), &user, form) {
        Ok(FeedbackActionOutcome::StatusChanged { to }) => {
            FlashMessage::success(format!("Feedback marked as {to}.")).send();
        }
        Ok(FeedbackActionOutcome::Unchanged { status }) => {
            FlashMessage::info(format!("Feedback is already {status}.")).send();
        }
        Ok(FeedbackActionOutcome::Deleted) => {
            FlashMessage::success("Feedback deleted.").send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Feedback not found.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(err) => {
            log::error!("Failed to apply feedback action: {err}");
            FlashMessage::error("The action could not be completed.").send();
        }
    }
    redirect(FEEDBACK_URL)
}
