//! The interactive session loop.
//!
//! Reads one line at a time, classifies it once into a closed [`Command`],
//! and dispatches by exhaustive match. Every branch that reaches the
//! responder writes the user's raw turn to the transcript **before**
//! dispatch, so the transcript always shows what was asked even when the
//! responder call fails or hangs. Collaborator failures are rendered as
//! inline one-liners; only end-of-input, an interrupt, or the exit command
//! ends the loop.

use std::sync::Arc;
use std::time::Duration;

use ember_config::Settings;
use ember_core::error::StoreError;
use ember_core::responder::{Responder, ResponderRequest};
use ember_core::search::SearchProvider;
use ember_core::turn::{MAX_FACT_LEN, Role};
use ember_store::{MemoryLog, SessionHandle};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::assembler;
use crate::guard;

/// One classified input line.
///
/// Classification happens exactly once per line; adding a command kind is a
/// compiler-checked change at every dispatch site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Exit keyword (`exit` / `quit`)
    Exit,
    /// `remember <fact>` — the argument may be empty
    Remember(String),
    /// `search <query>` — the argument may be empty
    Search(String),
    /// Anything else non-empty
    Chat(String),
}

impl Command {
    /// Classify a raw input line. Blank lines are not input.
    pub fn classify(line: &str) -> Option<Command> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            return Some(Command::Exit);
        }

        if let Some(arg) = keyword_argument(trimmed, "remember") {
            return Some(Command::Remember(arg.to_string()));
        }

        if let Some(query) = keyword_argument(trimmed, "search") {
            return Some(Command::Search(query.to_string()));
        }

        Some(Command::Chat(trimmed.to_string()))
    }
}

/// Extract the argument of a leading keyword, case-insensitively.
///
/// The bare keyword yields an empty argument; text that merely starts with
/// the keyword's letters (`remembering…`) is not a command.
fn keyword_argument<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    if text.eq_ignore_ascii_case(keyword) {
        return Some("");
    }

    let prefix = text.get(..keyword.len())?;
    let rest = &text[keyword.len()..];
    if prefix.eq_ignore_ascii_case(keyword) && rest.starts_with(' ') {
        Some(rest.trim())
    } else {
        None
    }
}

/// Whether the loop should keep reading input after a line was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The session loop: one terminal, one transcript file, one collaborator
/// call in flight at a time.
pub struct SessionRunner {
    settings: Settings,
    transcript: SessionHandle,
    memory: MemoryLog,
    responder: Arc<dyn Responder>,
    search: Arc<dyn SearchProvider>,
}

impl SessionRunner {
    pub fn new(
        settings: Settings,
        transcript: SessionHandle,
        memory: MemoryLog,
        responder: Arc<dyn Responder>,
        search: Arc<dyn SearchProvider>,
    ) -> Self {
        Self {
            settings,
            transcript,
            memory,
            responder,
            search,
        }
    }

    /// Drive the loop over stdin until exit, end-of-input, or interrupt.
    ///
    /// Cancellation is honored between turns only; a collaborator call
    /// already in flight runs to its own timeout.
    pub async fn run(mut self) {
        let stdin = tokio::io::stdin();
        let mut lines = BufReader::new(stdin).lines();

        loop {
            print!("you> ");
            use std::io::Write;
            let _ = std::io::stdout().flush();

            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        if self.handle_line(&line).await == Flow::Exit {
                            break;
                        }
                    }
                    Ok(None) => {
                        // EOF (Ctrl+D) — exit with no further transcript writes
                        println!();
                        self.say("Bye.");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    self.say("Bye.");
                    break;
                }
            }
        }
    }

    /// Handle one raw input line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let Some(command) = Command::classify(line) else {
            return Flow::Continue;
        };

        // All user input is transcribed verbatim, before anything else runs.
        if let Err(e) = self.transcript.append(Role::User, line) {
            self.report_storage(&e);
            return Flow::Continue;
        }

        match command {
            Command::Exit => {
                self.say("Bye.");
                if let Err(e) = self.transcript.append(Role::Assistant, "Bye.") {
                    self.report_storage(&e);
                }
                Flow::Exit
            }
            Command::Remember(arg) => {
                self.remember(&arg);
                Flow::Continue
            }
            Command::Search(query) => {
                self.run_search(&query).await;
                Flow::Continue
            }
            Command::Chat(text) => {
                self.dispatch(&text, None).await;
                Flow::Continue
            }
        }
    }

    /// Store a fact after the length and injection checks.
    ///
    /// The confirmation is printed but not written to the transcript;
    /// only the user's line is.
    fn remember(&self, arg: &str) {
        if arg.is_empty() {
            self.say("Usage: remember <something worth keeping>");
            return;
        }

        let length = arg.chars().count();
        if length > MAX_FACT_LEN {
            self.say(&format!(
                "That is too long to remember ({length} characters, max {MAX_FACT_LEN})."
            ));
            return;
        }

        if guard::looks_like_instruction(arg) {
            self.say("That reads like an instruction rather than a fact about you, so I won't store it.");
            return;
        }

        match self.memory.add(arg) {
            Ok(()) => self.say("Okay, I'll remember that."),
            Err(e) => self.report_storage(&e),
        }
    }

    /// Run the search flow: fetch results, then hand them to the responder.
    async fn run_search(&mut self, query: &str) {
        if query.is_empty() {
            self.say("Usage: search <query>");
            return;
        }

        let block = match self
            .search
            .search(query, self.settings.search_max_results)
            .await
        {
            Ok(block) => block,
            Err(e) => {
                self.say(&format!("[search error] {e}"));
                return;
            }
        };

        let question = assembler::reframe_search_question(query);
        self.dispatch(&question, Some(&block)).await;
    }

    /// Assemble the prompt, call the responder, record the reply.
    async fn dispatch(&mut self, user_text: &str, search_block: Option<&str>) {
        let facts = match self.memory.load() {
            Ok(facts) => facts,
            Err(e) => {
                self.report_storage(&e);
                return;
            }
        };

        let prompt = assembler::build(user_text, &facts, search_block);
        debug!(
            facts = facts.len(),
            with_search = search_block.is_some(),
            "Dispatching assembled prompt"
        );

        let request = ResponderRequest {
            prompt,
            provider: self.settings.provider.clone(),
            model: self.settings.model.clone(),
            system_prompt: self.settings.system_prompt.clone(),
            timeout: Duration::from_secs(self.settings.responder_timeout_secs),
        };

        match self.responder.respond(request).await {
            Ok(reply) => {
                self.say(&reply);
                if let Err(e) = self.transcript.append(Role::Assistant, &reply) {
                    self.report_storage(&e);
                }
            }
            Err(e) => self.say(&format!("[responder error] {e}")),
        }
    }

    fn report_storage(&self, error: &StoreError) {
        self.say(&format!("[storage error] {error}"));
    }

    /// Print a message under the companion's display name, one prefixed
    /// line per line of content.
    fn say(&self, text: &str) {
        for line in text.lines() {
            println!("{}> {line}", self.settings.display_name);
        }
    }
}
