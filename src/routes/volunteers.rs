use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::dto::volunteers::{VolunteerActionOutcome, VolunteersQuery};
use crate::forms::parse_form;
use crate::forms::volunteers::VolunteerActionForm;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, volunteers as volunteers_service};

const VOLUNTEERS_URL: &str = "/volunteers";

#[derive(Deserialize)]
struct VolunteersQueryParams {
    status: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

#[get("/volunteers")]
pub async fn show_volunteers(
    params: web::Query<VolunteersQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = VolunteersQuery {
        status: params.status,
        search: params.search,
        page: params.page,
    };

    match volunteers_service::load_volunteers_page(
        repo.get_ref(),
        &user,
        query,
        server_config.page_size,
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "volunteers",
                &server_config.auth_service_url,
            );
            context.insert("volunteers", &data.volunteers);
            context.insert("status", data.status);
            context.insert(
                "search_query",
                data.search_query.as_deref().unwrap_or_default(),
            );
            context.insert("summary", &data.summary);

            render_template(&tera, "volunteers/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(VOLUNTEERS_URL)
        }
        Err(err) => {
            log::error!("Failed to render volunteers: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/volunteers/action")]
pub async fn volunteer_action(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form = match parse_form::<VolunteerActionForm>(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected volunteer action form: {err}");
            FlashMessage::error("Invalid request.").send();
            return redirect(VOLUNTEERS_URL);
        }
    };

    match volunteers_service::apply_volunteer_action(repo.get_ref(), &user, form) {
        Ok(VolunteerActionOutcome::StatusChanged { to }) => {
            FlashMessage::success(format!("Volunteer status updated to {to}.")).send();
        }
        Ok(VolunteerActionOutcome::Unchanged { status }) => {
            FlashMessage::info(format!("Volunteer is already {status}.")).send();
        }
        Ok(VolunteerActionOutcome::Deleted(outcome)) => {
            FlashMessage::success(format!(
                "Volunteer deleted along with {} assignment(s).",
                outcome.removed_assignments
            ))
            .send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            return redirect("/na");
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Volunteer not found.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::Transaction(err)) => {
            log::error!("Volunteer action rolled back: {err}");
            FlashMessage::error("The action failed and no changes were made.").send();
        }
        Err(err) => {
            log::error!("Failed to apply volunteer action: {err}");
            FlashMessage::error("The action could not be completed.").send();
        }
    }
    redirect(VOLUNTEERS_URL)
}
