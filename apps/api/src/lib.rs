//! Resume Chat — retrieval-augmented resume review and mock interviews.
//!
//! A resume PDF is split into passages and embedded; each chat turn rewrites
//! the question against the conversation, retrieves the closest passages and
//! asks the model for a mode-specific answer. Served as a JSON page API
//! (`resume-chat-api`) and as a terminal REPL (`resume-chat`).

pub mod chat;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod llm_client;
pub mod page;
pub mod repl;
pub mod retrieval;
pub mod routes;
pub mod state;
