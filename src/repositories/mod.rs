pub mod coach_repo;
pub mod form_repo;
pub mod profile_repo;
pub mod purchase_repo;
pub mod supabase;

pub use supabase::{RepoError, SupabaseRest};
