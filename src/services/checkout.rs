use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::models::form::UserForm;
use crate::models::purchase::{NewPurchase, Purchase};
use crate::repositories::RepoError;
use crate::repositories::form_repo::FormRepo;
use crate::repositories::purchase_repo::PurchaseRepo;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("{0}")]
    Repo(#[from] RepoError),
}

/// Outcome of a paid submission: the stored form and the purchase linked
/// into it.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub form: UserForm,
    pub purchase: Purchase,
}

/// The "submit form, record payment, link the two" sequence as an explicit
/// saga. The three writes cannot share a transaction through the hosted row
/// API, so each later step compensates the earlier ones on failure instead
/// of leaving half-written submissions behind.
#[derive(Clone)]
pub struct CheckoutService {
    forms: FormRepo,
    purchases: PurchaseRepo,
}

impl CheckoutService {
    pub fn new(forms: FormRepo, purchases: PurchaseRepo) -> Self {
        Self { forms, purchases }
    }

    /// Store an intake form with no payment attached. Session bookings
    /// record the card's last digits in the payload but create no purchase.
    pub async fn submit_form(&self, user_id: Uuid, data: Value) -> Result<UserForm, CheckoutError> {
        Ok(self.forms.insert(user_id, data).await?)
    }

    /// Store an intake form, record its purchase, and link the purchase id
    /// back into the form payload.
    ///
    /// Step failures roll the saga back: a failed purchase deletes the form,
    /// a failed link deletes the purchase and then the form. Compensation
    /// failures are logged; at that point the backend is refusing writes
    /// and the step error is the one worth surfacing.
    pub async fn submit_paid_form(
        &self,
        user_id: Uuid,
        data: Value,
        amount: i64,
        transaction_tag: &str,
    ) -> Result<Receipt, CheckoutError> {
        let form = self.forms.insert(user_id, data).await?;

        let purchase = match self
            .purchases
            .insert(&NewPurchase::completed(user_id, amount, transaction_tag))
            .await
        {
            Ok(purchase) => purchase,
            Err(e) => {
                log::error!("purchase insert failed, rolling back form {}: {}", form.id, e);
                if let Err(comp) = self.forms.delete(form.id).await {
                    log::error!("compensating form delete failed for {}: {}", form.id, comp);
                }
                return Err(e.into());
            }
        };

        if let Err(e) = self.forms.attach_purchase(&form, purchase.id).await {
            log::error!(
                "purchase link failed, rolling back form {} and purchase {}: {}",
                form.id,
                purchase.id,
                e
            );
            if let Err(comp) = self.purchases.delete(purchase.id).await {
                log::error!(
                    "compensating purchase delete failed for {}: {}",
                    purchase.id,
                    comp
                );
            }
            if let Err(comp) = self.forms.delete(form.id).await {
                log::error!("compensating form delete failed for {}: {}", form.id, comp);
            }
            return Err(e.into());
        }

        Ok(Receipt { form, purchase })
    }
}
