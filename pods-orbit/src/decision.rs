//! Decision providers for conflict resolution
//!
//! The resolver asks one question at a time and waits for the answer.
//! Providers:
//! - [`ScriptedDecisions`]: answers supplied up front (config, CLI, tests)
//! - [`TerminalPrompt`]: asks on the terminal, re-asking on invalid input

use crate::error::{ImportError, ImportResult};
use crate::import::types::ConflictEntry;
use crate::models::resolution::{menu_hint, parse_choice};
use crate::models::ResolutionPolicy;
use async_trait::async_trait;
use pods_common::notes::{SocialHandles, SocialKey};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use std::sync::Mutex;

#[async_trait]
pub trait DecisionProvider: Send + Sync {
    /// Choose a policy for `entry` from `menu`
    ///
    /// `Ok(None)` means no decision was given.
    async fn decide(
        &self,
        entry: &ConflictEntry,
        menu: &[ResolutionPolicy],
    ) -> ImportResult<Option<ResolutionPolicy>>;
}

/// Pre-supplied answers, consumed in order
///
/// Once the answers run out every further question gets no decision. An
/// answer that is not on the menu is a validation error.
pub struct ScriptedDecisions {
    answers: Mutex<VecDeque<String>>,
}

impl ScriptedDecisions {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
        }
    }

    pub fn from_policies(policies: impl IntoIterator<Item = ResolutionPolicy>) -> Self {
        Self::new(policies.into_iter().map(|p| p.as_str()))
    }

    /// Answers not yet consumed
    pub fn remaining(&self) -> usize {
        self.answers.lock().map(|a| a.len()).unwrap_or(0)
    }
}

#[async_trait]
impl DecisionProvider for ScriptedDecisions {
    async fn decide(
        &self,
        entry: &ConflictEntry,
        menu: &[ResolutionPolicy],
    ) -> ImportResult<Option<ResolutionPolicy>> {
        let next = self
            .answers
            .lock()
            .map_err(|_| ImportError::Validation("decision queue poisoned".to_string()))?
            .pop_front();

        match next {
            Some(answer) => {
                let policy = parse_choice(&answer, menu)?;
                tracing::debug!(
                    fname = %entry.conflict_note.fname,
                    policy = %policy,
                    "Scripted decision"
                );
                Ok(Some(policy))
            }
            None => Ok(None),
        }
    }
}

/// Interactive prompt on stdin/stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

#[async_trait]
impl DecisionProvider for TerminalPrompt {
    async fn decide(
        &self,
        entry: &ConflictEntry,
        menu: &[ResolutionPolicy],
    ) -> ImportResult<Option<ResolutionPolicy>> {
        let description = describe_conflict(entry);
        let menu = menu.to_vec();

        // Reading stdin blocks; keep it off the async workers
        tokio::task::spawn_blocking(move || {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            let mut output = std::io::stderr();
            prompt_for_decision(&mut input, &mut output, &description, &menu)
        })
        .await
        .map_err(|e| ImportError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }
}

/// Ask until a valid choice is read
///
/// Invalid answers print the validation message and ask again. End of input
/// means no decision.
pub fn prompt_for_decision<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    description: &str,
    menu: &[ResolutionPolicy],
) -> ImportResult<Option<ResolutionPolicy>> {
    writeln!(output, "{}", description)?;
    for (i, policy) in menu.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, policy.label())?;
    }

    loop {
        write!(output, "Choose [1-{}]: ", menu.len())?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(None);
        }

        match parse_choice(&line, menu) {
            Ok(policy) => return Ok(Some(policy)),
            Err(err) => {
                writeln!(output, "{}. Valid choices: {}", err, menu_hint(menu))?;
            }
        }
    }
}

/// One-paragraph summary of a conflict for the prompt
pub fn describe_conflict(entry: &ConflictEntry) -> String {
    let local = entry.conflict_note.custom.social.clone().unwrap_or_default();
    let remote = entry.conflict_entry.custom.social.clone().unwrap_or_default();

    let mut text = format!(
        "Conflict in {} (incoming copy: {})",
        entry.conflict_note.fname, entry.conflict_entry.fname
    );
    for key in &entry.conflict_data {
        text.push_str(&format!(
            "\n  {}: local={} remote={}",
            key,
            shown(&local, *key),
            shown(&remote, *key)
        ));
    }
    text
}

fn shown(social: &SocialHandles, key: SocialKey) -> String {
    match (social.get(key), social.raw_value(key)) {
        (Some(handle), _) => handle.to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "<unset>".to_string(),
    }
}
