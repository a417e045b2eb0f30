use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;

/// Extractor for endpoints behind a session: the bearer token must be a
/// valid access token signed by the project's JWT secret. The raw token is
/// kept so handlers can reconcile or revoke the session it names.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub token: String,
}

/// Claims carried by the backend's access tokens.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
    #[allow(dead_code)]
    email: Option<String>,
    #[allow(dead_code)]
    role: Option<String>,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => match header.to_str() {
                Ok(h) => h,
                Err(_) => return ready(Err(ErrorUnauthorized("Invalid header format"))),
            },
            None => return ready(Err(ErrorUnauthorized("Missing Authorization header"))),
        };

        if !auth_header.starts_with("Bearer ") {
            return ready(Err(ErrorUnauthorized("Invalid auth header format")));
        }
        let token = auth_header.trim_start_matches("Bearer ").trim();

        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(ErrorUnauthorized("Auth not configured")));
        };

        match validate_token(token, &state.config.supabase_jwt_secret) {
            Ok(user_id) => ready(Ok(AuthenticatedUser {
                user_id,
                token: token.to_string(),
            })),
            Err(e) => {
                log::debug!("rejected bearer token: {}", e);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

/// Verify signature, expiry and audience, and pull the user id out of `sub`.
fn validate_token(token: &str, secret: &str) -> Result<Uuid, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("token validation failed: {}", e))?;

    Uuid::parse_str(&data.claims.sub).map_err(|e| format!("invalid sub claim: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        aud: String,
        exp: usize,
    }

    const SECRET: &str = "test-secret";

    fn token(sub: &str, aud: &str, exp_offset: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as usize;
        encode(
            &Header::new(Algorithm::HS256),
            &TestClaims {
                sub: sub.to_string(),
                aud: aud.to_string(),
                exp,
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_user_id() {
        let id = Uuid::new_v4();
        let t = token(&id.to_string(), "authenticated", 3600);
        assert_eq!(validate_token(&t, SECRET).unwrap(), id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let t = token(&Uuid::new_v4().to_string(), "authenticated", -3600);
        assert!(validate_token(&t, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let t = token(&Uuid::new_v4().to_string(), "authenticated", 3600);
        assert!(validate_token(&t, "other-secret").is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let t = token(&Uuid::new_v4().to_string(), "anon", 3600);
        assert!(validate_token(&t, SECRET).is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let t = token("service-account", "authenticated", 3600);
        assert!(validate_token(&t, SECRET).is_err());
    }
}
