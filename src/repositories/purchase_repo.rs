use urlencoding::encode;
use uuid::Uuid;

use crate::models::purchase::{NewPurchase, Purchase};
use crate::repositories::{RepoError, SupabaseRest};

const TABLE: &str = "purchases";

/// `purchases` table access.
#[derive(Clone)]
pub struct PurchaseRepo {
    rest: SupabaseRest,
}

impl PurchaseRepo {
    pub fn new(rest: SupabaseRest) -> Self {
        Self { rest }
    }

    pub async fn insert(&self, purchase: &NewPurchase) -> Result<Purchase, RepoError> {
        self.rest.insert_returning(TABLE, purchase).await
    }

    /// Compensation path for the checkout saga.
    pub async fn delete(&self, purchase_id: Uuid) -> Result<(), RepoError> {
        self.rest
            .delete(
                TABLE,
                &format!("id=eq.{}", encode(&purchase_id.to_string())),
            )
            .await
    }
}
