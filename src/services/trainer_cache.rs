use std::sync::Arc;

use tokio::sync::Mutex;

use crate::models::coach::Coach;
use crate::repositories::RepoError;
use crate::repositories::coach_repo::CoachRepo;

/// Single invalidation mechanism for the public trainer list.
///
/// Reads serve the cached list when present. A miss fetches while holding
/// the lock, so concurrent misses collapse into a single backend request:
/// later callers wait and then read the freshly filled cache. Every coach
/// write must call `invalidate`.
#[derive(Clone)]
pub struct TrainerCache {
    coaches: CoachRepo,
    cached: Arc<Mutex<Option<Vec<Coach>>>>,
}

impl TrainerCache {
    pub fn new(coaches: CoachRepo) -> Self {
        Self {
            coaches,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Coach>, RepoError> {
        let mut cached = self.cached.lock().await;
        if let Some(list) = cached.as_ref() {
            return Ok(list.clone());
        }
        let fresh = self.coaches.list_all().await?;
        *cached = Some(fresh.clone());
        Ok(fresh)
    }

    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}
