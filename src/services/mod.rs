pub mod auth_service;
pub mod checkout;
pub mod payment;
pub mod trainer_cache;
