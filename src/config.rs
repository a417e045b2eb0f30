use std::env;

use anyhow::{Context, Result};

/// Connection settings for the hosted Supabase backend plus local server
/// options. Everything comes from the environment; the keys are required,
/// the rest have defaults.
#[derive(Clone, Debug)]
pub struct Config {
    /// Project base URL, e.g. https://xyz.supabase.co (no trailing slash).
    pub supabase_url: String,
    /// Public anon key, sent as `apikey` on auth endpoints.
    pub supabase_anon_key: String,
    /// Service role key, server-only, used for row storage access.
    pub supabase_service_role_key: String,
    /// HS256 secret the project signs access tokens with.
    pub supabase_jwt_secret: String,
    pub port: u16,
    pub allowed_origins: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL not set")?
            .trim()
            .trim_end_matches('/')
            .to_string();
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .context("SUPABASE_ANON_KEY not set")?
            .trim()
            .to_string();
        let supabase_service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .context("SUPABASE_SERVICE_ROLE_KEY not set")?
            .trim()
            .to_string();
        let supabase_jwt_secret = env::var("SUPABASE_JWT_SECRET")
            .context("SUPABASE_JWT_SECRET not set")?
            .trim()
            .to_string();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .context("PORT is not a valid port number")?;

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".into());

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            supabase_service_role_key,
            supabase_jwt_secret,
            port,
            allowed_origins,
        })
    }

    /// Fixed settings for tests: nothing listens on the backend URL, so any
    /// test that accidentally reaches the network fails fast.
    pub fn test_default() -> Self {
        Self {
            supabase_url: "http://127.0.0.1:9".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_role_key: "test-service-key".to_string(),
            supabase_jwt_secret: "test-jwt-secret".to_string(),
            port: 0,
            allowed_origins: String::new(),
        }
    }

    /// PostgREST base, e.g. https://xyz.supabase.co/rest/v1
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.supabase_url)
    }

    /// GoTrue base, e.g. https://xyz.supabase.co/auth/v1
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.supabase_url)
    }
}
