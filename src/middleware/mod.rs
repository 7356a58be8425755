use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

// Claims carried by the identity token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

// Single capability check for every privileged entry point; admins
// satisfy plain-user requirements.
pub fn require_role(actor: Role, required: Role) -> Result<(), ApiError> {
    match (actor, required) {
        (Role::Admin, _) => Ok(()),
        (Role::User, Role::User) => Ok(()),
        (Role::User, Role::Admin) => {
            Err(ApiError::Unauthorized("admin role required".to_string()))
        }
    }
}

// Bearer token extractor
impl FromRequestParts<Arc<crate::AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<crate::AppState>,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("expected a bearer token".to_string()))?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::Unauthorized("invalid token".to_string()))?;

        Ok(AuthUser {
            user_id: data.claims.sub,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &[u8] = b"test-secret";

    fn make_token(sub: i64, role: Role, exp: usize) -> String {
        encode(
            &Header::default(),
            &Claims { sub, role, exp },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap()
    }

    fn decode_claims(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(SECRET),
            &Validation::new(Algorithm::HS256),
        )
        .map(|d| d.claims)
    }

    #[test]
    fn admin_satisfies_both_roles() {
        assert!(require_role(Role::Admin, Role::Admin).is_ok());
        assert!(require_role(Role::Admin, Role::User).is_ok());
    }

    #[test]
    fn plain_user_cannot_act_as_admin() {
        assert!(require_role(Role::User, Role::User).is_ok());
        let err = require_role(Role::User, Role::Admin).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
        let token = make_token(42, Role::Admin, exp);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default validation leeway
        let exp = (chrono::Utc::now().timestamp() - 7200) as usize;
        let token = make_token(42, Role::User, exp);
        assert!(decode_claims(&token).is_err());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }
}
