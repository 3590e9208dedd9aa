use super::Session;
use crate::archive::Password;
use crate::catalog::Mechanism;
use crate::error::Result;
use crate::metadata::MetadataDocument;

pub(super) fn run(session: &Session<'_>) -> Result<()> {
    let config = session.config;

    let password = if config.encrypt {
        Some(Password::new(session.prompt.read_password("Password:")?))
    } else {
        None
    };

    let archive = session.archive();
    let ctx = session.handler_context();
    let mut metadata = MetadataDocument::new();

    for entry in session.selected() {
        tracing::info!("Backing up {}", entry.name);

        match &entry.mechanism {
            Mechanism::Handler(id) => {
                session
                    .handlers
                    .get(id)?
                    .backup(&entry.name, &ctx, &mut metadata)?;
            }
            Mechanism::Archive(spec) => {
                for path in &spec.paths {
                    archive.add(path, &spec.filters, password.as_ref())?;
                }
            }
            Mechanism::Nothing => {
                tracing::debug!("Skipping {}, nothing to do.", entry.name);
            }
        }
    }

    metadata.save(&config.metadata_path)
}
