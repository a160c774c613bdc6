pub mod db;
pub mod domain;
pub mod error_conversions;
pub mod models;
pub mod pagination;
pub mod query_builder;
pub mod repository;
pub mod schema;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod presenter;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_identity::IdentityMiddleware;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::db::establish_connection_pool;
    use crate::middleware::RedirectUnauthorized;
    use crate::models::config::ServerConfig;
    use crate::repository::DieselRepository;
    use crate::routes::api::{api_v1_feedback_details, api_v1_feedbacks};
    use crate::routes::feedback::{feedback_action, show_feedback};
    use crate::routes::incidents::{incident_status, show_incidents};
    use crate::routes::volunteers::{show_volunteers, volunteer_action};
    use crate::routes::{index, logout, not_assigned};

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        server_config.validate().map_err(|e| {
            log::error!("Invalid server configuration: {e}");
            std::io::Error::other(e)
        })?;

        // Establish Diesel connection pool for the SQLite database.
        let pool = establish_connection_pool(&server_config.database_url, server_config.pool_size)
            .map_err(|e| {
                std::io::Error::other(format!("Failed to establish database connection: {e}"))
            })?;

        let repo = DieselRepository::new(pool);

        // Keys and stores for identity, sessions, and flash messages.
        let secret_key = Key::from(server_config.secret.as_bytes());

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(IdentityMiddleware::default())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(Some(format!(".{}", server_config.domain)))
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(
                    web::scope("/api")
                        .service(api_v1_feedbacks)
                        .service(api_v1_feedback_details),
                )
                .service(
                    web::scope("")
                        .wrap(RedirectUnauthorized)
                        .service(index)
                        .service(not_assigned)
                        .service(show_volunteers)
                        .service(volunteer_action)
                        .service(show_feedback)
                        .service(feedback_action)
                        .service(show_incidents)
                        .service(incident_status)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
