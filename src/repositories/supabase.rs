use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found")]
    NotFound,
}

/// Shared PostgREST access for the table repositories: one client, the
/// service-role key (server-only), and the row-level helpers every table
/// needs. All rows live in the hosted backend; there is no local database.
#[derive(Clone)]
pub struct SupabaseRest {
    client: Client,
    base_rest_url: String,
    headers: HeaderMap,
}

impl SupabaseRest {
    pub fn new(client: Client, config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.supabase_anon_key).expect("invalid SUPABASE_ANON_KEY"),
        );
        // service role key as bearer: row security does not apply server-side
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.supabase_service_role_key))
                .expect("invalid SUPABASE_SERVICE_ROLE_KEY"),
        );
        Self {
            client,
            base_rest_url: config.rest_url(),
            headers,
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_rest_url.trim_end_matches('/'), table)
    }

    async fn read_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, RepoError> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!(
                "{} -> {}",
                status.as_u16(),
                text
            )));
        }
        let rows: Vec<T> = serde_json::from_str(&text)?;
        Ok(rows)
    }

    async fn expect_ok(resp: reqwest::Response) -> Result<(), RepoError> {
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(RepoError::Supabase(format!(
                "{} -> {}",
                status.as_u16(),
                text
            )));
        }
        Ok(())
    }

    /// GET with a raw PostgREST query string (`id=eq.<uuid>&select=*`).
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
    ) -> Result<Vec<T>, RepoError> {
        let url = format!("{}?{}", self.table_url(table), query);
        let resp = self
            .client
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::read_rows(resp).await
    }

    /// INSERT returning the created row.
    pub async fn insert_returning<T: DeserializeOwned>(
        &self,
        table: &str,
        payload: &impl Serialize,
    ) -> Result<T, RepoError> {
        let resp = self
            .client
            .post(self.table_url(table))
            .headers(self.headers.clone())
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?;
        let rows: Vec<T> = Self::read_rows(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Supabase("empty response from insert".to_string()))
    }

    /// UPSERT on a unique column, returning the resulting row. One
    /// idempotent request, safe under racing writers.
    pub async fn upsert_returning<T: DeserializeOwned>(
        &self,
        table: &str,
        on_conflict: &str,
        payload: &impl Serialize,
    ) -> Result<T, RepoError> {
        let url = format!("{}?on_conflict={}", self.table_url(table), on_conflict);
        let resp = self
            .client
            .post(&url)
            .headers(self.headers.clone())
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(payload)
            .send()
            .await?;
        let rows: Vec<T> = Self::read_rows(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Supabase("empty response from upsert".to_string()))
    }

    /// UPDATE rows matching a raw filter (`id=eq.<uuid>`).
    pub async fn update(
        &self,
        table: &str,
        filter: &str,
        payload: &impl Serialize,
    ) -> Result<(), RepoError> {
        let url = format!("{}?{}", self.table_url(table), filter);
        let resp = self
            .client
            .patch(&url)
            .headers(self.headers.clone())
            .header("Prefer", "return=minimal")
            .json(payload)
            .send()
            .await?;
        Self::expect_ok(resp).await
    }

    /// DELETE rows matching a raw filter.
    pub async fn delete(&self, table: &str, filter: &str) -> Result<(), RepoError> {
        let url = format!("{}?{}", self.table_url(table), filter);
        let resp = self
            .client
            .delete(&url)
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::expect_ok(resp).await
    }
}
