use super::*;
use crate::catalog::CatalogEntry;
use crate::config::ItemFilter;
use crate::error::ReimageError;
use crate::handlers::{HandlerContext, ItemHandler};
use crate::runner::CommandOutput;
use crate::testing::{MemoryEnvironment, RecordingExecutor, ScriptedPrompt, run_config};
use serde_json::json;
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;
use tempfile::tempdir;

/// Handler that stores a fixed extension list and remembers what restore saw
struct FixedHandler {
    restored: Rc<RefCell<Vec<String>>>,
}

impl ItemHandler for FixedHandler {
    fn backup(
        &self,
        item: &str,
        _ctx: &HandlerContext<'_>,
        metadata: &mut MetadataDocument,
    ) -> Result<()> {
        metadata.insert(item, json!({"extensions": ["ext.a"]}));
        Ok(())
    }

    fn restore(
        &self,
        item: &str,
        _ctx: &HandlerContext<'_>,
        metadata: &MetadataDocument,
    ) -> Result<()> {
        let extensions = metadata
            .get(item)
            .and_then(|p| p.get("extensions"))
            .and_then(|e| e.as_array())
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        self.restored.borrow_mut().extend(extensions);
        Ok(())
    }
}

/// Handler whose backup always fails
struct FailingHandler;

impl ItemHandler for FailingHandler {
    fn backup(&self, _: &str, _: &HandlerContext<'_>, _: &mut MetadataDocument) -> Result<()> {
        Err(ReimageError::ConfigError("boom".to_string()))
    }

    fn restore(&self, _: &str, _: &HandlerContext<'_>, _: &MetadataDocument) -> Result<()> {
        Ok(())
    }
}

fn registry_with_fixed(restored: &Rc<RefCell<Vec<String>>>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.register(
        "fixed",
        FixedHandler {
            restored: Rc::clone(restored),
        },
    );
    registry
}

fn plain_archive_executor() -> RecordingExecutor {
    RecordingExecutor::new().respond(|cmd| match cmd.raw_args()[0].as_str() {
        "l" => CommandOutput::success("Path = x\nEncrypted = -\n"),
        _ => CommandOutput::success("Everything is Ok"),
    })
}

fn run_session(
    config: &RunConfig,
    catalog: &Catalog,
    handlers: &HandlerRegistry,
    executor: &RecordingExecutor,
    prompt: &ScriptedPrompt,
) -> Result<()> {
    let runner = Runner::new(executor, config.dry_run);
    let env = MemoryEnvironment::default();
    Session {
        config,
        catalog,
        handlers,
        runner: &runner,
        prompt,
        env: &env,
    }
    .run()
}

#[test]
fn path_only_backup_adds_to_archive_and_writes_empty_metadata() {
    let dir = tempdir().expect("tempdir");
    let mut config = run_config(dir.path(), Operation::Backup);
    config.archive = dir.path().join("t.7z");
    let catalog = Catalog::new(vec![CatalogEntry::new("ssh").paths(["/home/u/.ssh"])]).unwrap();
    let executor = RecordingExecutor::new();

    run_session(
        &config,
        &catalog,
        &HandlerRegistry::new(),
        &executor,
        &ScriptedPrompt::new(&[]),
    )
    .expect("backup");

    let adds = executor.calls_with("a");
    assert_eq!(adds.len(), 1);
    assert_eq!(adds[0][2], config.archive.to_string_lossy());
    assert_eq!(adds[0][3], "/home/u/.ssh");

    let written = fs::read_to_string(&config.metadata_path).unwrap();
    assert_eq!(written, "{}");
}

#[test]
fn handler_backup_writes_exact_metadata() {
    let dir = tempdir().expect("tempdir");
    let config = run_config(dir.path(), Operation::Backup);
    let catalog = Catalog::new(vec![CatalogEntry::new("editorapp").handler("fixed")]).unwrap();
    let restored = Rc::new(RefCell::new(Vec::new()));
    let executor = RecordingExecutor::new();

    run_session(
        &config,
        &catalog,
        &registry_with_fixed(&restored),
        &executor,
        &ScriptedPrompt::new(&[]),
    )
    .expect("backup");

    let loaded = MetadataDocument::load(&config.metadata_path).unwrap();
    let mut expected = MetadataDocument::new();
    expected.insert("editorapp", json!({"extensions": ["ext.a"]}));
    assert_eq!(loaded, expected);
    assert!(executor.calls().is_empty());
}

#[test]
fn dry_run_backup_writes_the_same_metadata() {
    let catalog = Catalog::new(vec![
        CatalogEntry::new("editorapp").handler("fixed"),
        CatalogEntry::new("ssh").paths(["/home/u/.ssh"]),
    ])
    .unwrap();
    let restored = Rc::new(RefCell::new(Vec::new()));
    let handlers = registry_with_fixed(&restored);

    let real_dir = tempdir().expect("tempdir");
    let real = run_config(real_dir.path(), Operation::Backup);
    run_session(&real, &catalog, &handlers, &RecordingExecutor::new(), &ScriptedPrompt::new(&[]))
        .expect("backup");

    let dry_dir = tempdir().expect("tempdir");
    let mut dry = run_config(dry_dir.path(), Operation::Backup);
    dry.dry_run = true;
    let executor = RecordingExecutor::new();
    run_session(&dry, &catalog, &handlers, &executor, &ScriptedPrompt::new(&[]))
        .expect("dry backup");

    assert_eq!(
        fs::read_to_string(&real.metadata_path).unwrap(),
        fs::read_to_string(&dry.metadata_path).unwrap()
    );
    // archive construction is not simulated away
    assert_eq!(executor.calls_with("a").len(), 1);
}

#[test]
fn encrypted_backup_passes_prompted_password() {
    let dir = tempdir().expect("tempdir");
    let mut config = run_config(dir.path(), Operation::Backup);
    config.encrypt = true;
    let catalog = Catalog::new(vec![CatalogEntry::new("ssh").paths(["/home/u/.ssh"])]).unwrap();
    let executor = RecordingExecutor::new();
    let prompt = ScriptedPrompt::new(&["s3cret"]);

    run_session(&config, &catalog, &HandlerRegistry::new(), &executor, &prompt).expect("backup");

    assert_eq!(prompt.asked(), 1);
    let adds = executor.calls_with("a");
    assert_eq!(adds[0].last().map(String::as_str), Some("-ps3cret"));
}

#[test]
fn failing_handler_aborts_before_metadata_is_written() {
    let dir = tempdir().expect("tempdir");
    let config = run_config(dir.path(), Operation::Backup);
    let catalog = Catalog::new(vec![
        CatalogEntry::new("broken").handler("failing"),
        CatalogEntry::new("ssh").paths(["/home/u/.ssh"]),
    ])
    .unwrap();
    let mut handlers = HandlerRegistry::new();
    handlers.register("failing", FailingHandler);
    let executor = RecordingExecutor::new();

    let err = run_session(&config, &catalog, &handlers, &executor, &ScriptedPrompt::new(&[]))
        .expect_err("handler error propagates");

    assert!(err.to_string().contains("boom"));
    assert!(!config.metadata_path.exists());
    assert!(executor.calls_with("a").is_empty());
}

#[test]
fn backup_then_restore_round_trips_handler_payload() {
    let dir = tempdir().expect("tempdir");
    let catalog = Catalog::new(vec![CatalogEntry::new("editorapp").handler("fixed")]).unwrap();
    let restored = Rc::new(RefCell::new(Vec::new()));
    let handlers = registry_with_fixed(&restored);

    let backup = run_config(dir.path(), Operation::Backup);
    run_session(&backup, &catalog, &handlers, &RecordingExecutor::new(), &ScriptedPrompt::new(&[]))
        .expect("backup");

    let restore = run_config(dir.path(), Operation::Restore);
    run_session(&restore, &catalog, &handlers, &plain_archive_executor(), &ScriptedPrompt::new(&[]))
        .expect("restore");

    assert_eq!(*restored.borrow(), vec!["ext.a".to_string()]);
}

#[test]
fn restore_extracts_paths_with_verified_password() {
    let dir = tempdir().expect("tempdir");
    let config = run_config(dir.path(), Operation::Restore);
    MetadataDocument::new().save(&config.metadata_path).unwrap();
    let catalog = Catalog::new(vec![
        CatalogEntry::new("ssh").paths(["/home/u/.ssh"]),
        CatalogEntry::new("git").paths(["/home/u/.gitconfig"]),
    ])
    .unwrap();
    let executor = RecordingExecutor::new().respond(|cmd| {
        let args = cmd.raw_args();
        match args[0].as_str() {
            "l" => CommandOutput::success("Encrypted = +\n"),
            "t" if args.last().map(String::as_str) != Some("-ppw") => {
                CommandOutput::failure(2, "Wrong password?")
            }
            _ => CommandOutput::success("Everything is Ok"),
        }
    });

    run_session(
        &config,
        &catalog,
        &HandlerRegistry::new(),
        &executor,
        &ScriptedPrompt::new(&["pw"]),
    )
    .expect("restore");

    let extracts = executor.calls_with("x");
    assert_eq!(extracts.len(), 2);
    assert_eq!(extracts[0][3], "/home/u/.ssh");
    assert_eq!(extracts[1][3], "/home/u/.gitconfig");
    assert!(extracts.iter().all(|args| args.last().map(String::as_str) == Some("-ppw")));
}

#[test]
fn dry_run_restore_verifies_but_extracts_nothing() {
    let dir = tempdir().expect("tempdir");
    let mut config = run_config(dir.path(), Operation::Restore);
    config.dry_run = true;
    MetadataDocument::new().save(&config.metadata_path).unwrap();
    let catalog = Catalog::new(vec![CatalogEntry::new("ssh").paths(["/home/u/.ssh"])]).unwrap();
    let executor = plain_archive_executor();

    run_session(&config, &catalog, &HandlerRegistry::new(), &executor, &ScriptedPrompt::new(&[]))
        .expect("restore");

    assert_eq!(executor.calls_with("t").len(), 1);
    assert!(executor.calls_with("x").is_empty());
}

#[test]
fn restore_without_metadata_file_fails() {
    let dir = tempdir().expect("tempdir");
    let config = run_config(dir.path(), Operation::Restore);
    let catalog = Catalog::new(vec![]).unwrap();
    let executor = plain_archive_executor();

    let err = run_session(&config, &catalog, &HandlerRegistry::new(), &executor, &ScriptedPrompt::new(&[]))
        .expect_err("metadata required");
    assert!(matches!(err, ReimageError::IoError { .. }));
    assert!(executor.calls().is_empty());
}

#[test]
fn install_runs_restore_handler_only_for_items_with_installer() {
    let dir = tempdir().expect("tempdir");
    let config = run_config(dir.path(), Operation::Install);
    let mut metadata = MetadataDocument::new();
    metadata.insert("withurl", json!({"extensions": ["ext.url"]}));
    metadata.insert("nourl", json!({"extensions": ["ext.none"]}));
    metadata.save(&config.metadata_path).unwrap();

    let catalog = Catalog::new(vec![
        CatalogEntry::new("withurl")
            .handler("fixed")
            .installer("https://example.com/a.exe"),
        CatalogEntry::new("nourl").handler("fixed"),
        CatalogEntry::new("ssh")
            .paths(["/home/u/.ssh"])
            .installer("https://example.com/ssh.exe"),
    ])
    .unwrap();
    let restored = Rc::new(RefCell::new(Vec::new()));
    let executor = plain_archive_executor();

    run_session(
        &config,
        &catalog,
        &registry_with_fixed(&restored),
        &executor,
        &ScriptedPrompt::new(&[]),
    )
    .expect("install");

    assert_eq!(*restored.borrow(), vec!["ext.url".to_string()]);
    assert!(executor.calls_with("x").is_empty());
}

#[test]
fn filter_limits_participating_items() {
    let dir = tempdir().expect("tempdir");
    let mut config = run_config(dir.path(), Operation::Backup);
    config.filter = ItemFilter::Exclude(vec!["ssh".to_string()]);
    let catalog = Catalog::new(vec![
        CatalogEntry::new("ssh").paths(["/home/u/.ssh"]),
        CatalogEntry::new("git").paths(["/home/u/.gitconfig"]),
    ])
    .unwrap();
    let executor = RecordingExecutor::new();

    run_session(&config, &catalog, &HandlerRegistry::new(), &executor, &ScriptedPrompt::new(&[]))
        .expect("backup");

    let adds = executor.calls_with("a");
    assert_eq!(adds.len(), 1);
    assert_eq!(Path::new(&adds[0][3]), Path::new("/home/u/.gitconfig"));
}
