//! Interactive chat in the terminal.
//!
//! Streams answers from an OpenAI-compatible API, renders `**bold**` as it
//! arrives, and reports what the session cost on exit.
//!
//! # Usage
//!
//! ```bash
//! # Settings from ~/.v2/config.json
//! vtwo
//!
//! # Override the model for this session
//! vtwo --model gpt-4o
//!
//! # Disable colors (useful for piping output)
//! vtwo --no-color
//! ```
//!
//! # Commands
//!
//! - `:q`, `:quit` - Exit the application
//! - `:c`, `:clear` - Clear conversation history
//! - `:u`, `:undo` - Remove the last question and answer
//! - `:cost` - Show the session cost so far
//! - `:h`, `:help` - Show available commands

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use vtwo::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, UserConfig,
    help_text, parse_command,
};
use vtwo::format_session_cost;

const PROMPT: &str = "\x1b[1;35m>\x1b[39m ";
const PLAIN_PROMPT: &str = "> ";
const RESET: &str = "\x1b[0m";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    vtwo::logging::init();
    let (args, _) = ChatArgs::from_command_line_relaxed("vtwo [OPTIONS]");
    let user_config = UserConfig::load_from(args.config.as_deref())?;
    let config = ChatConfig::from_user_config(&user_config).apply_args(&args);
    let use_color = config.use_color;

    let mut session = ChatSession::from_config(config)?;
    let mut rl = DefaultEditor::new()?;

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;
    let mut renderer = PlainTextRenderer::with_color(use_color).with_interrupt(interrupted.clone());

    let prompt = if use_color { PROMPT } else { PLAIN_PROMPT };
    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline(prompt);
        if use_color {
            print!("{RESET}");
            let _ = io::stdout().flush();
        }

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => break,
                        ChatCommand::Clear => {
                            session.clear();
                            renderer.print_info("\nClearing chat history.\n");
                        }
                        ChatCommand::Undo => {
                            if session.undo() {
                                renderer.print_info("\nRemoving last interaction.\n");
                            } else {
                                renderer.print_error("nothing to undo");
                            }
                        }
                        ChatCommand::Cost => {
                            let cost = format_session_cost(session.cost())
                                .unwrap_or_else(|| "$0.00".to_string());
                            renderer.print_info(&format!("Session cost so far: {cost}"));
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(input) => {
                            renderer.print_info(&format!("Unknown command: {input}"));
                        }
                    }
                    continue;
                }

                if let Err(e) = session.send_streaming(line, &mut renderer).await {
                    renderer.print_error(&e.to_string());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    if let Some(cost) = format_session_cost(session.cost()) {
        println!("\nTotal cost for this session was {cost}.");
    }
    Ok(())
}
