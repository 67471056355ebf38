pub mod chat;
pub mod core;
pub mod history;
pub mod llm;
pub mod repl;
pub mod retrieval;
pub mod server;
pub mod state;
