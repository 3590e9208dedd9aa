//! Recording fakes shared by the unit tests

use crate::config::{ItemFilter, Operation, RunConfig, Settings};
use crate::error::{ReimageError, Result};
use crate::runner::{CommandLine, CommandOutput, Executor};
use crate::ui::tty::PasswordPrompt;
use crate::utils::platform::EnvironmentStore;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// Run configuration rooted in a scratch directory.
pub fn run_config(dir: &Path, operation: Operation) -> RunConfig {
    RunConfig {
        operation,
        archive: dir.join("backup.7z"),
        metadata_path: dir.join("metadata.json"),
        filter: ItemFilter::All,
        encrypt: false,
        dry_run: false,
        verbose: false,
        settings: Settings {
            seven_zip: PathBuf::from("7z"),
            editor: "code".to_string(),
            editor_settings: dir.join("Code").join("User").join("settings.json"),
            env_variable: "PATH".to_string(),
            env_marker: "S:".to_string(),
            env_extra: vec!["C:\\Program Files\\7-Zip".to_string()],
        },
    }
}

type Responder = Box<dyn Fn(&CommandLine) -> CommandOutput>;

/// Executor that records every command and answers from a closure
pub struct RecordingExecutor {
    calls: RefCell<Vec<CommandLine>>,
    responder: Responder,
    installed: Vec<String>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            responder: Box::new(|_| CommandOutput::success("")),
            installed: Vec::new(),
        }
    }

    pub fn respond(mut self, responder: impl Fn(&CommandLine) -> CommandOutput + 'static) -> Self {
        self.responder = Box::new(responder);
        self
    }

    /// Make `program` resolvable on the fake search path.
    pub fn with_program(mut self, program: &str) -> Self {
        self.installed.push(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }

    /// Raw argument lists of every recorded call whose first argument is `sub`.
    pub fn calls_with(&self, sub: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .map(CommandLine::raw_args)
            .filter(|args| args.first().map(String::as_str) == Some(sub))
            .collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&self, command: &CommandLine) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(command.clone());
        Ok((self.responder)(command))
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.installed
            .iter()
            .any(|p| p == program)
            .then(|| PathBuf::from(format!("/fake/bin/{}", program)))
    }
}

/// Prompt that hands out scripted answers in order
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<String>>,
    asked: Cell<usize>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: Cell::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.get()
    }
}

impl PasswordPrompt for ScriptedPrompt {
    fn read_password(&self, _query: &str) -> Result<String> {
        self.asked.set(self.asked.get() + 1);
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or(ReimageError::Interrupted)
    }
}

/// In-memory variable store
#[derive(Default)]
pub struct MemoryEnvironment {
    vars: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryEnvironment {
    pub fn with_var(name: &str, value: &str) -> Self {
        let env = Self::default();
        env.vars
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        env
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.borrow().get(name).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl EnvironmentStore for MemoryEnvironment {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(self.get(name))
    }

    fn write(&self, name: &str, value: &str) -> Result<()> {
        self.writes.set(self.writes.get() + 1);
        self.vars
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }
}
