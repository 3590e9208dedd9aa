use super::Session;
use crate::catalog::Mechanism;
use crate::error::Result;

/// Install mode replays the restore handler of every item that names an
/// installer; the installer itself is only pointed out, never fetched.
pub(super) fn run(session: &Session<'_>) -> Result<()> {
    let archive = session.archive();
    let (metadata, _password) = session.load_and_verify(&archive)?;
    let ctx = session.handler_context();

    for entry in session.selected() {
        let Some(url) = &entry.installer else {
            tracing::debug!("Skipping {}, nothing to do.", entry.name);
            continue;
        };

        tracing::info!("Installing {}", entry.name);

        match &entry.mechanism {
            Mechanism::Handler(id) => {
                session
                    .handlers
                    .get(id)?
                    .restore(&entry.name, &ctx, &metadata)?;
            }
            Mechanism::Archive(_) | Mechanism::Nothing => {
                tracing::info!("Download and run the installer for {}: {}", entry.name, url);
            }
        }
    }

    Ok(())
}
