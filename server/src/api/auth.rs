use axum::{
    async_trait,
    extract::{rejection::TypedHeaderRejection, FromRequestParts, State},
    headers::authorization::{Authorization, Bearer},
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
    TypedHeader,
};
use jsonwebtoken::{
    decode, encode, errors::Error as JwtError, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::ops::Add;
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use super::{error::Error, extract::Json, AppState};
use crate::auth::authenticate;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token: {0}")]
    Missing(#[from] TypedHeaderRejection),
    #[error("Invalid authentication token: {0}")]
    Invalid(#[source] JwtError),
    #[error("Could not sign token: {0}")]
    Sign(#[source] JwtError),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: usize,
}

#[derive(Debug, Serialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub value: String,
    pub token_type: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

/// Issues and checks the bearer credentials guarding mutating routes.
pub trait AuthProvider: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
    fn issue(&self, username: &str) -> Result<Token, AuthError>;
}

/// HS256 JSON web tokens signed with a shared secret.
pub struct JwtAuth {
    secret: String,
    lifetime: Duration,
}

impl JwtAuth {
    pub fn new(settings: &base::setting::Auth) -> Self {
        Self {
            secret: settings.jwt_secret.to_owned(),
            lifetime: Duration::days(settings.token_days),
        }
    }
}

impl AuthProvider for JwtAuth {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_ref()),
            &Validation::new(Algorithm::HS256),
        );
        match claims {
            Ok(token_data) => {
                tracing::trace!(?token_data, "User for request");
                Ok(token_data.claims)
            }
            Err(e) => Err(AuthError::Invalid(e)),
        }
    }

    fn issue(&self, username: &str) -> Result<Token, AuthError> {
        let expires_at = OffsetDateTime::now_utc().add(self.lifetime);
        let claims = Claims {
            username: username.to_owned(),
            exp: expires_at.unix_timestamp() as usize,
        };
        let value = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_ref()),
        )
        .map_err(AuthError::Sign)?;
        Ok(Token {
            value,
            token_type: "Bearer",
            expires_at,
        })
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(header) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(AuthError::Missing)?;
        Ok(state.auth.verify(header.token())?)
    }
}

pub async fn auth_middleware<B>(
    claims: Claims,
    request: Request<B>,
    next: Next<B>,
) -> Result<Response, Error> {
    tracing::debug!(username = %claims.username, method = %request.method(), uri = %request.uri(), "Authenticated request");
    let response = next.run(request).await;
    Ok(response)
}

#[derive(Deserialize, Validate)]
pub struct LoginData {
    #[validate(min_length = 1)]
    username: String,
    #[validate(min_length = 1)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(login_data): Json<LoginData>,
) -> Result<Json<Token>, Error> {
    login_data
        .validate()
        .map_err(|e| Error::Unprocessable(e.to_string()))?;
    let user = authenticate(
        &state.db,
        &state.users,
        login_data.username.as_str(),
        login_data.password.as_str(),
    )
    .await
    .map_err(|e| {
        tracing::debug!(username = %login_data.username, %e, "Login attempt failed");
        Error::InvalidCredentials
    })?;
    let token = state.auth.issue(user.username.as_str())?;
    tracing::info!(username = %user.username, "User logged in");
    Ok(Json(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base::setting;

    fn provider(secret: &str) -> JwtAuth {
        JwtAuth::new(&setting::Auth {
            jwt_secret: secret.to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn issued_tokens_verify() {
        let auth = provider("secret");
        let token = auth.issue("admin").unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert!(token.expires_at > OffsetDateTime::now_utc().add(Duration::days(6)));
        assert_eq!(auth.verify(&token.value).unwrap().username, "admin");
    }

    #[test]
    fn foreign_tokens_are_rejected() {
        let token = provider("secret").issue("admin").unwrap();
        assert!(matches!(
            provider("other").verify(&token.value),
            Err(AuthError::Invalid(_))
        ));
        assert!(provider("secret").verify("not-a-jwt").is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let auth = JwtAuth::new(&setting::Auth {
            jwt_secret: "secret".to_string(),
            token_days: -1,
            ..Default::default()
        });
        let token = auth.issue("admin").unwrap();
        assert!(auth.verify(&token.value).is_err());
    }
}
