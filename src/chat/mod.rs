//! The single chat operation shared by the HTTP and REPL front-ends.

mod prompt;
mod service;

pub use service::ChatService;
