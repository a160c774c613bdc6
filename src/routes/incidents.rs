use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::transition::Transition;
use crate::dto::incidents::IncidentsQuery;
use crate::forms::incidents::IncidentStatusForm;
use crate::forms::parse_form;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, incidents as incidents_service};

const INCIDENTS_URL: &str = "/incidents";

#[derive(Deserialize)]
struct IncidentsQueryParams {
    status: Option<String>,
    severity: Option<String>,
    date: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

#[get("/incidents")]
pub async fn show_incidents(
    params: web::Query<IncidentsQueryParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let params = params.into_inner();
    let query = IncidentsQuery {
        status: params.status,
        severity: params.severity,
        date: params.date,
        search: params.search,
        page: params.page,
    };

    match incidents_service::load_incidents_page(
        repo.get_ref(),
        &user,
        query,
        server_config.page_size,
    ) {
        Ok(data) => {
            let mut context = base_context(
                &flash_messages,
                &user,
                "incidents",
                &server_config.auth_service_url,
            );
            context.insert("incidents", &data.incidents);
            context.insert("status", data.status);
            context.insert("severity", data.severity);
            context.insert("date", data.date);
            context.insert("summary", &data.summary);
            context.insert(
                "search_query",
                data.search_query.as_deref().unwrap_or_default(),
            );
            context.insert("statuses", &data.statuses);
            context.insert("can_update", &data.can_update);

            render_template(&tera, "incidents/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/na")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(INCIDENTS_URL)
        }
        Err(err) => {
            log::error!("Failed to render incidents: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/incidents/status")]
pub async fn incident_status(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form = match parse_form::<IncidentStatusForm>(&body) {
        Ok(form) => form,
        Err(err) => {
            log::warn!("Rejected incident status form: {err}");
            FlashMessage::error("Invalid request.").send();
            return redirect(INCIDENTS_URL);
        }
    };

    match incidents_service::update_incident_status(repo.get_ref(), &user, form) {
        Ok(Transition::Changed { to, .. }) => {
            FlashMessage::success(format!("Incident moved to {to}.")).send();
        }
        Ok(Transition::Unchanged(status)) => {
            FlashMessage::info(format!("Incident is already {status}.")).send();
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Incident not found.").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::Transaction(err)) => {
            log::error!("Incident status update rolled back: {err}");
            FlashMessage::error("The status could not be saved and no changes were made.")
                .send();
        }
        Err(err) => {
            log::error!("Failed to update incident status: {err}");
            FlashMessage::error("The status could not be saved.").send();
        }
    }
    redirect(INCIDENTS_URL)
}
