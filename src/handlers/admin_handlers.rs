use actix_web::{HttpResponse, Responder, get, put, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::admin_dtos::{
    AdminCoachOut, AdminUserOut, NEW_COACH_NAME, RoleUpdateIn, RoleUpdateOut,
};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::coach::NewCoach;
use crate::models::profile::Role;
use crate::repositories::RepoError;
use crate::repositories::coach_repo::CoachCardUpdate;

/// GET /api/admin/users
/// Every profile, newest first, with display ids shortened for the table.
#[get("/users")]
pub async fn list_users(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Admin).await {
        return resp;
    }

    match state.profiles.list_all().await {
        Ok(profiles) => {
            let users: Vec<AdminUserOut> = profiles.into_iter().map(AdminUserOut::from).collect();
            HttpResponse::Ok().json(ApiResponse::success("Users retrieved", users))
        }
        Err(e) => {
            log::error!("user listing failed: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load users"))
        }
    }
}

/// GET /api/admin/coaches
/// Coach cards whose owning profile actually holds the coach role, merged
/// with the owner's contact data.
#[get("/coaches")]
pub async fn list_coaches(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Admin).await {
        return resp;
    }

    let coach_ids = match state.profiles.coach_ids().await {
        Ok(ids) => ids,
        Err(e) => {
            log::error!("coach id listing failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load coaches"));
        }
    };
    if coach_ids.is_empty() {
        return HttpResponse::Ok()
            .json(ApiResponse::success("Coaches retrieved", Vec::<AdminCoachOut>::new()));
    }

    let cards = match state.coaches.list_for_users(&coach_ids).await {
        Ok(cards) => cards,
        Err(e) => {
            log::error!("coach card listing failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load coaches"));
        }
    };
    let owner_ids: Vec<Uuid> = cards.iter().map(|c| c.user_id).collect();
    let profiles = match state.profiles.list_by_ids(&owner_ids).await {
        Ok(profiles) => profiles,
        Err(e) => {
            log::error!("coach profile listing failed: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load coaches"));
        }
    };

    let coaches: Vec<AdminCoachOut> = cards
        .into_iter()
        .map(|card| {
            let profile = profiles.iter().find(|p| p.id == card.user_id);
            AdminCoachOut::merge(card, profile)
        })
        .collect();
    HttpResponse::Ok().json(ApiResponse::success("Coaches retrieved", coaches))
}

/// PUT /api/admin/users/{user_id}/role
/// Change a profile's role. Promotion to coach optionally creates a default
/// card (skipped when one exists, since re-promotion must not wipe a card);
/// demotion away from coach deletes the card instead of orphaning it.
#[put("/users/{user_id}/role")]
pub async fn update_role(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<RoleUpdateIn>,
) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Admin).await {
        return resp;
    }

    let target_id = path.into_inner();
    let current = match state.profiles.get(target_id).await {
        Ok(profile) => profile,
        Err(RepoError::NotFound) => {
            return HttpResponse::NotFound().json(ApiResponse::error("User not found"));
        }
        Err(e) => {
            log::error!("profile lookup failed for {}: {}", target_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load the user"));
        }
    };
    let old_role = current.role;
    let new_role = body.role;

    if let Err(e) = state.profiles.set_role(target_id, new_role).await {
        log::error!("role update failed for {}: {}", target_id, e);
        return HttpResponse::InternalServerError()
            .json(ApiResponse::error("Failed to update the role"));
    }

    let mut card_removed = false;
    if old_role == Role::Coach && new_role != Role::Coach {
        match state.coaches.delete_by_user_id(target_id).await {
            Ok(()) => {
                card_removed = true;
                state.trainers.invalidate().await;
            }
            Err(e) => {
                log::error!("coach card cleanup failed for {}: {}", target_id, e);
                return HttpResponse::InternalServerError().json(ApiResponse::error(
                    "Role updated but the coach card could not be removed",
                ));
            }
        }
    }

    let mut card_created = false;
    if new_role == Role::Coach && body.create_card {
        match state.coaches.get_by_user_id(target_id).await {
            Ok(_) => {} // keep the existing card untouched
            Err(RepoError::NotFound) => {
                let name = current
                    .email
                    .clone()
                    .unwrap_or_else(|| NEW_COACH_NAME.to_string());
                match state
                    .coaches
                    .upsert(&NewCoach::default_card(target_id, name))
                    .await
                {
                    Ok(_) => {
                        card_created = true;
                        state.trainers.invalidate().await;
                    }
                    Err(e) => {
                        log::error!("coach card creation failed for {}: {}", target_id, e);
                        return HttpResponse::InternalServerError().json(ApiResponse::error(
                            "Role updated but the coach card could not be created",
                        ));
                    }
                }
            }
            Err(e) => {
                log::error!("coach card lookup failed for {}: {}", target_id, e);
                return HttpResponse::InternalServerError().json(ApiResponse::error(
                    "Role updated but the coach card could not be verified",
                ));
            }
        }
    }

    HttpResponse::Ok().json(ApiResponse::success(
        "Role updated",
        RoleUpdateOut {
            user_id: target_id,
            role: new_role,
            coach_card_created: card_created,
            coach_card_removed: card_removed,
        },
    ))
}

/// PUT /api/admin/coaches/{coach_id}
/// Admin edit of a coach card.
#[put("/coaches/{coach_id}")]
pub async fn update_coach(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CoachCardUpdate>,
) -> impl Responder {
    if let Err(resp) = super::require_role(&state, user.user_id, Role::Admin).await {
        return resp;
    }

    let coach_id = path.into_inner();
    match state.coaches.update_card(coach_id, &body.into_inner()).await {
        Ok(()) => {
            state.trainers.invalidate().await;
            HttpResponse::Ok().json(ApiResponse::success(
                "Coach updated",
                serde_json::json!({ "coach_id": coach_id }),
            ))
        }
        Err(e) => {
            log::error!("coach update failed for {}: {}", coach_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to update the coach"))
        }
    }
}
