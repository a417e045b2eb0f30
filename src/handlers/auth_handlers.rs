use actix_web::{HttpResponse, Responder, get, post, web};
use regex::Regex;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::auth_dtos::{LoginIn, LoginResponse, SignupIn, SignupResponse};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::session::SessionState;
use crate::services::payment::format_phone_number;

fn looks_like_email(email: &str) -> bool {
    let re = Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    re.is_match(email)
}

/// POST /auth/signup
/// Creates the auth account and its profile row; the phone ends up both in
/// the auth metadata and on the profile.
#[post("/signup")]
pub async fn signup(state: web::Data<AppState>, body: web::Json<SignupIn>) -> impl Responder {
    let email = body.email.trim().to_lowercase();

    if !looks_like_email(&email) {
        return HttpResponse::BadRequest().json(ApiResponse::error("Invalid email format"));
    }
    if body.password.len() < 6 {
        return HttpResponse::BadRequest()
            .json(ApiResponse::error("Password must be at least 6 characters long"));
    }

    let phone = body
        .phone
        .as_deref()
        .map(format_phone_number)
        .filter(|p| !p.is_empty());

    match state.auth.sign_up(&email, &body.password, phone).await {
        Ok(user_id) => HttpResponse::Created().json(ApiResponse::success(
            "Account created. Check your email to confirm it.",
            SignupResponse {
                user_id,
                next_step: "confirm_email".to_string(),
            },
        )),
        Err(e) => {
            log::error!("signup failed for {}: {}", email, e);
            let message = if e.to_string().contains("already registered") {
                "Email already exists. Please log in instead."
            } else {
                "Failed to create account. Please try again."
            };
            HttpResponse::BadRequest().json(ApiResponse::error(message))
        }
    }
}

/// POST /auth/login
/// Password grant plus reconciliation; the merged identity in the response
/// carries the role the client routes on.
#[post("/login")]
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginIn>) -> impl Responder {
    match state.auth.sign_in(body.email.trim(), &body.password).await {
        Ok((session, identity)) => HttpResponse::Ok().json(ApiResponse::success(
            "Login successful",
            LoginResponse { session, identity },
        )),
        Err(e) => {
            log::warn!("login failed: {}", e);
            HttpResponse::Unauthorized().json(ApiResponse::error("Invalid email or password"))
        }
    }
}

/// POST /auth/logout
#[post("/logout")]
pub async fn logout(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.auth.sign_out(&user.token).await {
        Ok(()) => {
            HttpResponse::Ok().json(ApiResponse::success("Signed out", serde_json::json!({})))
        }
        Err(e) => {
            log::error!("logout failed for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to sign out"))
        }
    }
}

/// GET /api/me
/// Full session reconciliation for the bearer token. First call after a
/// fresh signup also creates the missing profile row.
#[get("/me")]
pub async fn me(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match state.auth.reconcile(&user.token).await {
        SessionState::Authenticated(identity) => {
            HttpResponse::Ok().json(ApiResponse::success("Session active", identity))
        }
        SessionState::Unauthenticated => {
            HttpResponse::Unauthorized().json(ApiResponse::error("Session is no longer valid"))
        }
    }
}
