//! Gym-membership backend: marketing-page data, session bookings, intake
//! forms, the coach dashboard and the admin panel, all persisted through a
//! hosted Supabase backend (GoTrue auth + PostgREST row storage). There is
//! no local database; every write is a call to the hosted row API.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;

use reqwest::Client;

use config::Config;
use repositories::SupabaseRest;
use repositories::coach_repo::CoachRepo;
use repositories::form_repo::FormRepo;
use repositories::profile_repo::ProfileRepo;
use repositories::purchase_repo::PurchaseRepo;
use services::auth_service::AuthService;
use services::checkout::CheckoutService;
use services::trainer_cache::TrainerCache;

/// Shared application state: one HTTP client fanned out into the table
/// repositories and the services built on them.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub profiles: ProfileRepo,
    pub coaches: CoachRepo,
    pub forms: FormRepo,
    pub checkout: CheckoutService,
    pub trainers: TrainerCache,
}

impl AppState {
    pub fn new(config: Config, client: Client) -> Self {
        let rest = SupabaseRest::new(client.clone(), &config);
        let profiles = ProfileRepo::new(rest.clone());
        let coaches = CoachRepo::new(rest.clone());
        let forms = FormRepo::new(rest.clone());
        let purchases = PurchaseRepo::new(rest);
        let auth = AuthService::new(client, &config, profiles.clone());
        let checkout = CheckoutService::new(forms.clone(), purchases);
        let trainers = TrainerCache::new(coaches.clone());
        Self {
            config,
            auth,
            profiles,
            coaches,
            forms,
            checkout,
            trainers,
        }
    }
}
