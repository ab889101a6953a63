use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{Identity, Role},
};

/// Claims carried by bearer tokens from the identity provider
///
/// Aliases accept tokens minted with Go-style field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(alias = "UserId")]
    pub user_id: String,
    #[serde(default, alias = "Email")]
    pub email: String,
    #[serde(default, alias = "FirstName")]
    pub first_name: String,
    #[serde(default, alias = "LastName")]
    pub last_name: String,
    #[serde(alias = "Role")]
    pub role: Role,
    pub iss: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
}

impl Claims {
    fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Identity {
            display_name: claims.display_name(),
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

/// Verifies HS256 bearer tokens and turns them into identities
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str, issuer: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> AppResult<Identity> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected bearer token");
                AppError::Unauthenticated("invalid or expired token".to_string())
            })?;

        if data.claims.user_id.is_empty() {
            return Err(AppError::Unauthenticated(
                "token carries no user id".to_string(),
            ));
        }

        Ok(data.claims.into())
    }
}

fn bearer_token(parts: &Parts) -> AppResult<&str> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthenticated("Authorization header is empty".to_string()))?;

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .unwrap_or_default();

    if token.is_empty() {
        return Err(AppError::Unauthenticated(
            "Bearer token is empty".to_string(),
        ));
    }

    Ok(token)
}

/// Handlers that take an `Identity` argument require a valid bearer token
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    Arc<TokenVerifier>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let verifier = Arc::<TokenVerifier>::from_ref(state);
        let identity = verifier.verify(bearer_token(parts)?)?;

        tracing::debug!(user_id = %identity.user_id, role = ?identity.role, "Authenticated request");

        Ok(identity)
    }
}
