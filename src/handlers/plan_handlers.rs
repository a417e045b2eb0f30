use actix_web::{HttpResponse, Responder, post, web};

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::form_dtos::{MealPlanIn, ReceiptOut, TrainingPlanIn};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::plan::PLAN_SERVICE_AMOUNT;
use crate::models::purchase::transaction_tag;
use crate::services::checkout::Receipt;

fn receipt_response(receipt: Receipt) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::success(
        "Thank you! Your request has been received.",
        ReceiptOut {
            form_id: receipt.form.id,
            purchase_id: receipt.purchase.id,
            amount: receipt.purchase.amount,
            status: receipt.purchase.status,
            transaction_id: receipt.purchase.transaction_id,
        },
    ))
}

/// POST /api/plans/training
/// Individual training-plan intake: validate, then run the paid-form saga
/// at the fixed plan price. Nothing is written when validation fails.
#[post("/plans/training")]
pub async fn training_plan(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<TrainingPlanIn>,
) -> impl Responder {
    if let Err(message) = body.validate() {
        return HttpResponse::BadRequest().json(ApiResponse::error(message));
    }

    match state
        .checkout
        .submit_paid_form(
            user.user_id,
            body.to_payload(),
            PLAN_SERVICE_AMOUNT,
            transaction_tag::TRAINING_PLAN,
        )
        .await
    {
        Ok(receipt) => receipt_response(receipt),
        Err(e) => {
            log::error!("training plan checkout failed for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to process your request. Please try again."))
        }
    }
}

/// POST /api/plans/meal
/// Meal-plan intake, same shape as the training plan.
#[post("/plans/meal")]
pub async fn meal_plan(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<MealPlanIn>,
) -> impl Responder {
    if let Err(message) = body.validate() {
        return HttpResponse::BadRequest().json(ApiResponse::error(message));
    }

    match state
        .checkout
        .submit_paid_form(
            user.user_id,
            body.to_payload(),
            PLAN_SERVICE_AMOUNT,
            transaction_tag::MEAL_PLAN,
        )
        .await
    {
        Ok(receipt) => receipt_response(receipt),
        Err(e) => {
            log::error!("meal plan checkout failed for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to process your request. Please try again."))
        }
    }
}
