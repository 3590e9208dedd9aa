use super::Session;
use crate::catalog::Mechanism;
use crate::error::Result;

pub(super) fn run(session: &Session<'_>) -> Result<()> {
    let archive = session.archive();
    let (metadata, password) = session.load_and_verify(&archive)?;
    let ctx = session.handler_context();

    for entry in session.selected() {
        tracing::info!("Restoring {}", entry.name);

        match &entry.mechanism {
            Mechanism::Handler(id) => {
                session
                    .handlers
                    .get(id)?
                    .restore(&entry.name, &ctx, &metadata)?;
            }
            Mechanism::Archive(spec) => {
                for path in &spec.paths {
                    archive.extract(path, Some(&password))?;
                }
            }
            Mechanism::Nothing => {
                tracing::debug!("Skipping {}, nothing to do.", entry.name);
            }
        }
    }

    Ok(())
}
