// Repotalk - answers questions about a codebase with a self-critique loop

pub mod config;
pub mod graph;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod server;
