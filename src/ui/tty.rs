//! Helpers for terminal interaction

use crate::error::{ReimageError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Write};

/// Source of passwords for archive encryption and verification
pub trait PasswordPrompt {
    fn read_password(&self, query: &str) -> Result<String>;
}

/// Prompts on the controlling terminal without echoing input
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&self, query: &str) -> Result<String> {
        read_password(query)
    }
}

/// Read a password from stdin, writing `query` first and echoing nothing.
///
/// When stdin is not a terminal a single line is read as-is, which lets
/// scripts pipe the password in.
pub fn read_password(query: &str) -> Result<String> {
    if !atty::is(atty::Stream::Stdin) {
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    let mut out = io::stderr();
    let _ignore_error = write!(out, "{} ", query);
    let _ignore_error = out.flush();

    terminal::enable_raw_mode()?;
    let result = read_hidden_line();
    if terminal::disable_raw_mode().is_err() {
        // not fatal...
        eprintln!("failed to reset terminal attributes!");
    }

    let _ignore_error = write!(out, "\r\n");
    let _ignore_error = out.flush();
    result
}

fn read_hidden_line() -> Result<String> {
    let mut password = String::new();

    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };

        if kind == KeyEventKind::Release {
            continue;
        }

        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(ReimageError::Interrupted);
            }
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => break,
            KeyCode::Enter => break,
            KeyCode::Backspace => {
                password.pop();
            }
            KeyCode::Char(c) => password.push(c),
            _ => {}
        }
    }

    Ok(password)
}
