use actix_web::{HttpResponse, Responder, get, put, web};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::coach::{Coach, NewCoach};
use crate::models::profile::Role;
use crate::repositories::RepoError;
use crate::repositories::coach_repo::CoachCardUpdate;

/// GET /api/coach/profile
/// The caller's own card; `data: null` when none has been saved yet.
#[get("/profile")]
pub async fn my_card(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Coach).await {
        return resp;
    }

    match state.coaches.get_by_user_id(user.user_id).await {
        Ok(coach) => HttpResponse::Ok().json(ApiResponse::success("Card retrieved", coach)),
        Err(RepoError::NotFound) => HttpResponse::Ok().json(ApiResponse::<Coach> {
            status: "success".to_string(),
            message: "No card saved yet".to_string(),
            data: None,
        }),
        Err(e) => {
            log::error!("card lookup failed for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load the card"))
        }
    }
}

/// PUT /api/coach/profile
/// Save the caller's card. Upserts on the per-profile unique constraint, so
/// first save and edits are the same request and racing saves stay
/// idempotent. Invalidates the public trainer list.
#[put("/profile")]
pub async fn save_card(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CoachCardUpdate>,
) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Coach).await {
        return resp;
    }

    let update = body.into_inner();
    if update.name.trim().is_empty() {
        return HttpResponse::BadRequest().json(ApiResponse::error("Name is required"));
    }

    let coach = NewCoach {
        user_id: user.user_id,
        name: update.name,
        activities: update
            .activities
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect(),
        schedule: update.schedule,
        price: update.price,
    };

    match state.coaches.upsert(&coach).await {
        Ok(saved) => {
            state.trainers.invalidate().await;
            HttpResponse::Ok().json(ApiResponse::success("Card saved", saved))
        }
        Err(e) => {
            log::error!("card save failed for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to save the card"))
        }
    }
}

/// GET /api/coach/forms
/// Every intake submission, newest first, with submitter contact data.
#[get("/forms")]
pub async fn intake_forms(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Coach).await {
        return resp;
    }

    match state.forms.list_with_profiles().await {
        Ok(forms) => HttpResponse::Ok().json(ApiResponse::success("Forms retrieved", forms)),
        Err(e) => {
            log::error!("intake listing failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load forms"))
        }
    }
}
