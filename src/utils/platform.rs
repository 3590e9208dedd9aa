use crate::error::{ReimageError, Result};
use crate::runner::{CommandLine, Effect, Runner};
use crate::utils::paths;
use std::fs;
use std::path::PathBuf;

/// Separator between entries of a PATH-like variable
pub const PATH_DELIMITER: char = if cfg!(windows) { ';' } else { ':' };

const REGISTRY_KEY: &str = r"HKCU\Environment";

/// Persistent user-scope environment variables
pub trait EnvironmentStore {
    fn read(&self, name: &str) -> Result<Option<String>>;
    fn write(&self, name: &str, value: &str) -> Result<()>;
}

/// Pick the store for the host platform.
///
/// - Windows: the user hive of the registry, through `reg.exe`
/// - elsewhere: the process environment for reads, a shell profile fragment for writes
pub fn user_environment<'a>(runner: &'a Runner<'a>) -> Result<Box<dyn EnvironmentStore + 'a>> {
    if cfg!(windows) {
        Ok(Box::new(RegistryEnvironment { runner }))
    } else {
        Ok(Box::new(ProfileEnvironment::new(
            paths::config_dir()?.join("environment.sh"),
        )))
    }
}

pub struct RegistryEnvironment<'a> {
    runner: &'a Runner<'a>,
}

impl EnvironmentStore for RegistryEnvironment<'_> {
    fn read(&self, name: &str) -> Result<Option<String>> {
        let command = CommandLine::new("reg")
            .args(["query", REGISTRY_KEY, "/v"])
            .arg(name);

        match self.runner.run_checked(&command, Effect::ReadOnly) {
            Ok(output) => Ok(parse_reg_query(&output, name)),
            Err(ReimageError::CommandExit { output, .. }) => {
                tracing::debug!("{} is not set:\n{}", name, output);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn write(&self, name: &str, value: &str) -> Result<()> {
        let command = CommandLine::new("reg")
            .args(["add", REGISTRY_KEY, "/v"])
            .arg(name)
            .args(["/t", "REG_EXPAND_SZ", "/d"])
            .arg(value)
            .arg("/f");
        self.runner.run_checked(&command, Effect::Destructive)?;
        Ok(())
    }
}

/// Extract a value from `reg query` output:
///
/// ```text
/// HKEY_CURRENT_USER\Environment
///     Path    REG_EXPAND_SZ    C:\tools;S:\bin
/// ```
pub fn parse_reg_query(output: &str, name: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let line = line.trim();
        let mut words = line.split_whitespace();
        let key = words.next()?;
        let kind = words.next()?;
        if !key.eq_ignore_ascii_case(name) || !kind.starts_with("REG_") {
            return None;
        }
        let value_start = line.find(kind)? + kind.len();
        Some(line[value_start..].trim().to_string())
    })
}

pub struct ProfileEnvironment {
    fragment: PathBuf,
}

impl ProfileEnvironment {
    pub fn new(fragment: PathBuf) -> Self {
        Self { fragment }
    }
}

impl EnvironmentStore for ProfileEnvironment {
    fn read(&self, name: &str) -> Result<Option<String>> {
        Ok(std::env::var(name).ok())
    }

    fn write(&self, name: &str, value: &str) -> Result<()> {
        let quoted = shlex::try_quote(value)
            .map_err(|e| ReimageError::ConfigError(format!("Cannot quote {}: {}", name, e)))?;

        if let Some(dir) = self.fragment.parent() {
            fs::create_dir_all(dir).map_err(|e| ReimageError::IoError {
                path: dir.to_path_buf(),
                source: e,
            })?;
        }

        // Prepended: the login value stays in effect after sourcing
        let line = format!(
            "export {}={}{}\"${}\"\n",
            name, quoted, PATH_DELIMITER, name
        );
        fs::write(&self.fragment, line).map_err(|e| {
            ReimageError::IoError {
                path: self.fragment.clone(),
                source: e,
            }
        })?;

        tracing::info!(
            "Wrote {} to {}; source it from your shell profile",
            name,
            self.fragment.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_reg_query_output() {
        let output = "\r\nHKEY_CURRENT_USER\\Environment\r\n    Path    REG_EXPAND_SZ    C:\\tools;S:\\My Bin\r\n\r\n";
        assert_eq!(
            parse_reg_query(output, "path"),
            Some("C:\\tools;S:\\My Bin".to_string())
        );
    }

    #[test]
    fn reg_query_without_value_yields_none() {
        let output = "HKEY_CURRENT_USER\\Environment\n    TEMP    REG_EXPAND_SZ    C:\\tmp\n";
        assert_eq!(parse_reg_query(output, "Path"), None);
    }

    #[test]
    fn profile_fragment_exports_quoted_value() {
        let dir = tempdir().expect("tempdir");
        let fragment = dir.path().join("nested").join("environment.sh");
        let store = ProfileEnvironment::new(fragment.clone());

        store.write("PATH", "/s/bin:/s/my tools").expect("write fragment");

        let content = fs::read_to_string(&fragment).expect("read fragment");
        assert!(content.starts_with("export PATH="));
        assert!(content.contains("/s/bin:/s/my tools"));
        assert!(content.trim_end().ends_with(":\"$PATH\""));
    }

    #[cfg(unix)]
    #[test]
    fn sourced_fragment_keeps_existing_path() {
        let dir = tempdir().expect("tempdir");
        let fragment = dir.path().join("environment.sh");
        ProfileEnvironment::new(fragment.clone())
            .write("PATH", "/s/tools")
            .expect("write fragment");

        let output = std::process::Command::new("/bin/sh")
            .arg("-c")
            .arg(". \"$1\"; printf %s \"$PATH\"")
            .arg("sh")
            .arg(&fragment)
            .env("PATH", "/usr/bin:/bin")
            .output()
            .expect("run sh");

        assert_eq!(String::from_utf8_lossy(&output.stdout), "/s/tools:/usr/bin:/bin");
    }
}
