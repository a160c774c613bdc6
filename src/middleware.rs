//! Middleware turning `401` responses of the protected scope into a sign-in redirect.

use std::future::{Future, Ready, ready};
use std::pin::Pin;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::{StatusCode, header};
use actix_web::{Error, HttpResponse, web};

use crate::models::config::ServerConfig;

/// Used when no [`ServerConfig`] is registered on the app.
pub const DEFAULT_SIGNIN_URL: &str = "/auth/signin";

pub struct RedirectUnauthorized;

impl<S, B> Transform<S, ServiceRequest> for RedirectUnauthorized
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RedirectUnauthorizedMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RedirectUnauthorizedMiddleware { service }))
    }
}

pub struct RedirectUnauthorizedMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RedirectUnauthorizedMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            if res.status() != StatusCode::UNAUTHORIZED {
                return Ok(res.map_into_left_body());
            }

            let location = res
                .request()
                .app_data::<web::Data<ServerConfig>>()
                .map(|config| config.auth_service_url.clone())
                .unwrap_or_else(|| DEFAULT_SIGNIN_URL.to_string());
            log::debug!("Redirecting unauthenticated request to {location}");

            let (req, _) = res.into_parts();
            let response = HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish()
                .map_into_right_body();
            Ok(ServiceResponse::new(req, response))
        })
    }
}
