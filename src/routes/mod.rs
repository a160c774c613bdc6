//! HTTP handlers and the helpers they share.

use actix_identity::Identity;
use actix_web::{HttpResponse, Responder, get, http::header, post, web};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::types::Role;
use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;

pub mod api;
pub mod feedback;
pub mod incidents;
pub mod volunteers;

/// Bootstrap alert class for a flash message level.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

/// Context shared by every page: alerts, the current user and navigation.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_role", user.role().as_str());
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Sends each role to the first page it may use.
#[get("/")]
pub async fn index(user: AuthenticatedUser) -> impl Responder {
    match user.role() {
        Role::Admin => redirect("/volunteers"),
        Role::Employee => redirect("/feedback"),
        Role::Other(_) => redirect("/na"),
    }
}

#[get("/na")]
pub async fn not_assigned(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &user,
        "na",
        &server_config.auth_service_url,
    );
    render_template(&tera, "main/not_assigned.html", &context)
}

#[post("/logout")]
pub async fn logout(user: Identity) -> impl Responder {
    user.logout();
    redirect("/")
}
