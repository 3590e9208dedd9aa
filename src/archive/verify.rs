use super::{Archive, Password};
use crate::error::{ReimageError, Result, exit_code_label};
use crate::ui::tty::PasswordPrompt;

/// Integrity tests attempted before giving up on the password
pub const MAX_PASSWORD_ATTEMPTS: u32 = 5;

/// `-slt` listing line present when any entry is encrypted
const ENCRYPTED_MARKER: &str = "Encrypted = +";
/// 7-Zip's wording for a failed decryption
const WRONG_PASSWORD_MARKER: &str = "Wrong password?";

/// Checks an archive before restore/install and settles on its password
pub struct Verifier<'a> {
    archive: &'a Archive<'a>,
    prompt: &'a dyn PasswordPrompt,
}

impl<'a> Verifier<'a> {
    pub fn new(archive: &'a Archive<'a>, prompt: &'a dyn PasswordPrompt) -> Self {
        Self { archive, prompt }
    }

    /// Test the archive, asking for a password while 7-Zip reports a wrong one.
    ///
    /// Returns the password of the last attempt. After
    /// [`MAX_PASSWORD_ATTEMPTS`] wrong passwords the last one is still
    /// returned, and the extractions that follow will fail on it.
    pub fn verify(&self) -> Result<Password> {
        let listing = self.archive.list()?;

        let mut password = Password::default();
        if listing.contains(ENCRYPTED_MARKER) {
            password = Password::new(
                self.prompt
                    .read_password("Archive appears encrypted, please provide password:")?,
            );
        }

        for attempt in 1..=MAX_PASSWORD_ATTEMPTS {
            match self.archive.test(&password) {
                Ok(_) => {
                    tracing::info!("Archive {} verified", self.archive.path().display());
                    return Ok(password);
                }
                Err(ReimageError::CommandExit { output, .. })
                    if output.contains(WRONG_PASSWORD_MARKER) =>
                {
                    tracing::debug!("Wrong password (attempt {}/{})", attempt, MAX_PASSWORD_ATTEMPTS);
                    if attempt < MAX_PASSWORD_ATTEMPTS {
                        password =
                            Password::new(self.prompt.read_password("Wrong password, try again:")?);
                    }
                }
                Err(ReimageError::CommandExit { program, code, output }) => {
                    return Err(ReimageError::ArchiveVerification(format!(
                        "unknown error when checking {} ({} exited with {}):\n{}",
                        self.archive.path().display(),
                        program,
                        exit_code_label(&code),
                        output
                    )));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::warn!(
            "Giving up on the archive password after {} attempts; continuing anyway",
            MAX_PASSWORD_ATTEMPTS
        );
        Ok(password)
    }
}
