pub mod admin_handlers;
pub mod auth_handlers;
pub mod coach_handlers;
pub mod plan_handlers;
pub mod subscription_handlers;
pub mod trainer_handlers;

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::models::profile::{Profile, Role};
use crate::repositories::RepoError;

/// All routes: the `/auth` scope and the `/api` scope with its coach and
/// admin sub-scopes. Shared by the server and the integration tests.
pub fn api_services(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth_handlers::signup)
            .service(auth_handlers::login)
            .service(auth_handlers::logout),
    )
    .service(
        web::scope("/api")
            .service(auth_handlers::me)
            .service(trainer_handlers::list_trainers)
            .service(trainer_handlers::book_session)
            .service(plan_handlers::training_plan)
            .service(plan_handlers::meal_plan)
            .service(subscription_handlers::list_plans)
            .service(subscription_handlers::purchase_subscription)
            .service(
                web::scope("/coach")
                    .service(coach_handlers::my_card)
                    .service(coach_handlers::save_card)
                    .service(coach_handlers::intake_forms),
            )
            .service(
                web::scope("/admin")
                    .service(admin_handlers::list_users)
                    .service(admin_handlers::list_coaches)
                    .service(admin_handlers::update_role)
                    .service(admin_handlers::update_coach),
            ),
    );
}

/// Role gate for the coach dashboard and admin panel: the caller's profile
/// must carry the given role. Enforced here, not in the client.
pub async fn require_role(
    state: &AppState,
    user_id: Uuid,
    role: Role,
) -> Result<Profile, HttpResponse> {
    match state.profiles.get(user_id).await {
        Ok(profile) if profile.role == role => Ok(profile),
        Ok(_) | Err(RepoError::NotFound) => Err(HttpResponse::Forbidden()
            .json(ApiResponse::error(format!("{} access required", role.as_str())))),
        Err(e) => {
            log::error!("role check failed for {}: {}", user_id, e);
            Err(HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to verify access")))
        }
    }
}
