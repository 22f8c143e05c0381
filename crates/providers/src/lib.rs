//! Completion and content providers.
//!
//! Completion backends implement `gofp_core::CompletionProvider`; the content
//! fetcher implements `gofp_core::ContentSource`. Each performs one HTTP call
//! per request and never retries.

pub mod content;
pub mod mock;
pub mod openai_compat;

pub use content::HttpContentSource;
pub use mock::CannedProvider;
pub use openai_compat::OpenAiCompatProvider;
