//! Embedding generation module
//!
//! Turns a free-text query into the vector that the Supabase stored procedure
//! compares against the stored page embeddings.
//!
//! Architecture follows the project pattern (trait + impl + mock):
//! - `EmbeddingProvider` trait: async interface for embedding generation
//! - `HttpEmbeddingProvider`: real implementation using the OpenAI
//!   `/v1/embeddings` API (or any compatible endpoint)
//! - `MockEmbeddingProvider`: deterministic mock for tests

pub mod mock;
pub mod provider;
pub mod traits;

pub use mock::MockEmbeddingProvider;
pub use provider::HttpEmbeddingProvider;
pub use traits::EmbeddingProvider;
