//! Session identity extracted from the `actix-identity` cookie.
//!
//! The identity holds a JWT issued by the external auth service. Handlers
//! receive an [`AuthenticatedUser`] through the extractor below; a missing or
//! invalid token yields `401`, which the `RedirectUnauthorized` middleware
//! turns into a redirect to the sign-in page.

use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::{FromRequest, HttpRequest, dev::Payload, error, web};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Role, TypeConstraintError, UserId};
use crate::models::config::ServerConfig;

/// Claims carried by the session token.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// User id as issued by the auth service.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub role: String,
    /// Expiry as a unix timestamp.
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn role(&self) -> Role {
        Role::from(self.role.as_str())
    }

    /// Numeric user id, used for audit columns.
    pub fn user_id(&self) -> Result<UserId, TypeConstraintError> {
        let id = self
            .sub
            .trim()
            .parse::<i32>()
            .map_err(|_| TypeConstraintError::InvalidValue(format!("user id '{}'", self.sub)))?;
        UserId::new(id)
    }

    /// Decodes and validates a session token.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(data.claims)
    }

    /// Encodes the claims with the shared secret.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_user(req))
    }
}

fn extract_user(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("Server configuration is not registered");
        return Err(error::ErrorInternalServerError("configuration missing"));
    };

    let token = req
        .get_identity()
        .ok()
        .and_then(|identity| identity.id().ok())
        .ok_or_else(|| error::ErrorUnauthorized("not signed in"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|e| {
        log::warn!("Rejected session token: {e}");
        error::ErrorUnauthorized("invalid session")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "42".into(),
            email: "chief@example.com".into(),
            name: "Chief".into(),
            role: role.into(),
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn token_round_trips_with_the_same_secret() {
        let original = user("ADMIN");
        let token = original.to_jwt("secret").expect("encodes");
        let decoded = AuthenticatedUser::from_jwt(&token, "secret").expect("decodes");
        assert_eq!(decoded, original);
        assert_eq!(decoded.role(), Role::Admin);
        assert_eq!(decoded.user_id().map(UserId::get), Ok(42));
    }

    #[test]
    fn token_with_another_secret_is_rejected() {
        let token = user("EMPLOYEE").to_jwt("secret").expect("encodes");
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn non_numeric_subject_has_no_user_id() {
        let mut claims = user("ADMIN");
        claims.sub = "abc".into();
        assert!(claims.user_id().is_err());
    }
}
