//! Interactive line-oriented front-end over the shared chat operation.

use std::sync::Arc;

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use uuid::Uuid;

use crate::state::AppState;

pub async fn run(state: Arc<AppState>) -> anyhow::Result<()> {
    // One fresh session per process; REPL runs never share the in-memory
    // default session with each other or with the HTTP front-end.
    let session_id = Uuid::new_v4().to_string();
    state.chat.history().get_or_create(&session_id).await;

    let mut rl = DefaultEditor::new()?;

    println!(
        "{}",
        "Welcome to the ragchat REPL! Type 'quit' to exit.".bright_magenta()
    );

    loop {
        match rl.readline("\nYou: ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed.eq_ignore_ascii_case("quit") {
                    println!("{}", "Chatbot: Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                match state.chat.answer(&session_id, trimmed).await {
                    Ok(reply) => println!("{} {}", "Chatbot:".bright_blue(), reply),
                    Err(err) => eprintln!("{}", format!("Error: {}", err).red()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Chatbot: Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}
