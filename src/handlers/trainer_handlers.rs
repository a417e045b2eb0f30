use actix_web::{HttpResponse, Responder, get, post, web};
use serde_json::json;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::coach_dtos::TrainerOut;
use crate::dtos::form_dtos::{BookingIn, BookingOut};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::form::form_type;
use crate::models::session::SessionState;
use crate::repositories::RepoError;

/// GET /api/trainers
/// Public trainer cards for the booking page, served through the cache.
#[get("/trainers")]
pub async fn list_trainers(state: web::Data<AppState>) -> impl Responder {
    match state.trainers.list().await {
        Ok(coaches) => {
            let trainers: Vec<TrainerOut> = coaches.into_iter().map(TrainerOut::from).collect();
            HttpResponse::Ok().json(ApiResponse::success("Trainers retrieved", trainers))
        }
        Err(e) => {
            log::error!("trainer listing failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load trainers"))
        }
    }
}

/// POST /api/bookings
/// Book a coaching session. The selected slot must exist in the trainer's
/// week; the stored form denormalizes trainer and member contact data the
/// way the coach dashboard expects to read it. No purchase row is written,
/// only the card's last digits land in the payload.
#[post("/bookings")]
pub async fn book_session(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<BookingIn>,
) -> impl Responder {
    if let Err(message) = body.validate() {
        return HttpResponse::BadRequest().json(ApiResponse::error(message));
    }

    let coach = match state.coaches.get(body.coach_id).await {
        Ok(coach) => coach,
        Err(RepoError::NotFound) => {
            return HttpResponse::NotFound().json(ApiResponse::error("Trainer not found"));
        }
        Err(e) => {
            log::error!("trainer lookup failed for {}: {}", body.coach_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load trainer"));
        }
    };

    if coach.schedule.is_empty() {
        return HttpResponse::BadRequest()
            .json(ApiResponse::error("This trainer has no available sessions"));
    }
    if !coach.schedule.has_slot(&body.day, &body.time) {
        return HttpResponse::BadRequest()
            .json(ApiResponse::error("Selected session is not in the trainer's schedule"));
    }

    let identity = match state.auth.reconcile(&user.token).await {
        SessionState::Authenticated(identity) => identity,
        SessionState::Unauthenticated => {
            return HttpResponse::Unauthorized()
                .json(ApiResponse::error("Session is no longer valid"));
        }
    };

    let trainer = TrainerOut::from(coach);
    let session = format!("{} {}", body.day, body.time);
    let digits: String = body
        .card_number
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let payload = json!({
        "form_type": form_type::BOOKING,
        "coach_id": trainer.id,
        "coach_name": trainer.name,
        "user_name": identity.email.clone().unwrap_or_else(|| "Unnamed".to_string()),
        "user_phone": identity.phone.clone().unwrap_or_else(|| "Not provided".to_string()),
        "session": session.clone(),
        "price": trainer.price.clone(),
        "payment_details": &digits[digits.len() - 4..],
    });

    match state.checkout.submit_form(identity.user_id, payload).await {
        Ok(form) => HttpResponse::Created().json(ApiResponse::success(
            "Booking confirmed",
            BookingOut {
                form_id: form.id,
                session,
                price: trainer.price,
            },
        )),
        Err(e) => {
            log::error!("booking failed for {}: {}", identity.user_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to store the booking"))
        }
    }
}
