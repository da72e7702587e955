//! Supabase vector-search client
//!
//! The nearest-neighbour ranking happens server-side inside the
//! `match_notes_by_embedding` stored procedure; this module only forwards the
//! query vector and parameters and decodes the ranked rows.

pub mod client;
pub mod mock;
pub mod models;
pub mod traits;

pub use client::SupabaseClient;
pub use mock::MockSimilaritySearch;
pub use models::NoteMatch;
pub use traits::SimilaritySearch;
