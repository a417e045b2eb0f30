use actix_web::{HttpResponse, Responder, get, post, web};
use serde::Serialize;
use serde_json::json;

use crate::AppState;
use crate::dtos::ApiResponse;
use crate::dtos::form_dtos::{ReceiptOut, SubscriptionPurchaseIn};
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::models::form::form_type;
use crate::models::plan::{MEMBERSHIP_PLANS, MembershipPlan, find_plan};
use crate::models::purchase::transaction_tag;
use crate::models::session::SessionState;
use crate::services::payment::parse_price_amount;

#[derive(Serialize)]
struct PlansResponse {
    plans: &'static [MembershipPlan],
    total: usize,
}

/// GET /api/subscriptions
/// The fixed membership tiers shown on the pricing page.
#[get("/subscriptions")]
pub async fn list_plans() -> impl Responder {
    HttpResponse::Ok().json(ApiResponse::success(
        "Plans retrieved",
        PlansResponse {
            plans: MEMBERSHIP_PLANS,
            total: MEMBERSHIP_PLANS.len(),
        },
    ))
}

/// POST /api/subscriptions
/// Membership purchase: the plan is resolved by name server-side, so the
/// stored price, features and purchase amount always come from the fixed
/// plan set rather than the request.
#[post("/subscriptions")]
pub async fn purchase_subscription(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<SubscriptionPurchaseIn>,
) -> impl Responder {
    if let Err(message) = body.validate() {
        return HttpResponse::BadRequest().json(ApiResponse::error(message));
    }

    let Some(plan) = find_plan(body.plan.trim()) else {
        return HttpResponse::BadRequest().json(ApiResponse::error("Unknown membership plan"));
    };
    let Some(amount) = parse_price_amount(plan.price) else {
        log::error!("membership plan {} has an unparseable price", plan.name);
        return HttpResponse::InternalServerError()
            .json(ApiResponse::error("Failed to process the purchase"));
    };

    let identity = match state.auth.reconcile(&user.token).await {
        SessionState::Authenticated(identity) => identity,
        SessionState::Unauthenticated => {
            return HttpResponse::Unauthorized()
                .json(ApiResponse::error("Session is no longer valid"));
        }
    };

    let payload = json!({
        "form_type": form_type::SUBSCRIPTION,
        "name": identity.email.clone().unwrap_or_else(|| "Unnamed".to_string()),
        "subscription_plan": plan.name,
        "price": plan.price,
        "features": plan.features,
    });

    match state
        .checkout
        .submit_paid_form(
            identity.user_id,
            payload,
            amount,
            transaction_tag::SUBSCRIPTION,
        )
        .await
    {
        Ok(receipt) => HttpResponse::Created().json(ApiResponse::success(
            "Membership purchased",
            ReceiptOut {
                form_id: receipt.form.id,
                purchase_id: receipt.purchase.id,
                amount: receipt.purchase.amount,
                status: receipt.purchase.status,
                transaction_id: receipt.purchase.transaction_id,
            },
        )),
        Err(e) => {
            log::error!("subscription checkout failed for {}: {}", identity.user_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to process the purchase"))
        }
    }
}
