//! Item dispatch
//!
//! One linear pass over the filtered catalog per run. Each item is handled
//! by its registered handler or by the generic archive routine, in catalog
//! order, one at a time.

mod backup;
mod install;
mod restore;

use crate::archive::{Archive, Password, Verifier};
use crate::catalog::{Catalog, CatalogEntry};
use crate::config::{Operation, RunConfig};
use crate::error::Result;
use crate::handlers::{HandlerContext, HandlerRegistry};
use crate::metadata::MetadataDocument;
use crate::runner::Runner;
use crate::ui::tty::PasswordPrompt;
use crate::utils::platform::EnvironmentStore;

/// Everything one run needs, borrowed for its duration
pub struct Session<'a> {
    pub config: &'a RunConfig,
    pub catalog: &'a Catalog,
    pub handlers: &'a HandlerRegistry,
    pub runner: &'a Runner<'a>,
    pub prompt: &'a dyn PasswordPrompt,
    pub env: &'a dyn EnvironmentStore,
}

impl<'a> Session<'a> {
    pub fn run(&self) -> Result<()> {
        match self.config.operation {
            Operation::Backup => backup::run(self),
            Operation::Install => install::run(self),
            Operation::Restore => restore::run(self),
        }
    }

    fn selected(&self) -> Vec<&'a CatalogEntry> {
        self.catalog.select(&self.config.filter)
    }

    fn archive(&self) -> Archive<'a> {
        Archive::new(
            &self.config.settings.seven_zip,
            &self.config.archive,
            self.runner,
        )
    }

    fn handler_context(&self) -> HandlerContext<'a> {
        HandlerContext {
            config: self.config,
            runner: self.runner,
            env: self.env,
        }
    }

    /// Metadata from the last backup plus a verified archive password.
    fn load_and_verify(&self, archive: &Archive<'_>) -> Result<(MetadataDocument, Password)> {
        let metadata = MetadataDocument::load(&self.config.metadata_path)?;
        let password = Verifier::new(archive, self.prompt).verify()?;
        Ok((metadata, password))
    }
}

#[cfg(test)]
mod tests;
