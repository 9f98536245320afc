//! End-to-end tests for the conversion pipeline.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use strato_convert::{
    ConvertOptions, Converter, DependencyInstaller, ExecutionContext, IR_FILE, InstallError,
    PluginError, registry,
};
use strato_manifest::RuntimeDescriptor;

const SOURCE: &str = r#"
[project]
name = "simple"
runtime = "strato"

[variables]
key = { fn = "readFile", args = ["key.pub"] }

[outputs]
result = "${key}"
"#;

fn write_source(dir: &Path) {
    std::fs::write(dir.join("Strato.toml"), SOURCE).unwrap();
}

fn options(source_dir: &Path, language: &str, out_dir: &Path) -> ConvertOptions {
    ConvertOptions {
        source_dir: source_dir.to_path_buf(),
        language: language.to_string(),
        out_dir: out_dir.to_path_buf(),
        generate_only: true,
        dev_mode: false,
    }
}

#[derive(Clone, Default)]
struct RecordingInstaller {
    calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl DependencyInstaller for RecordingInstaller {
    fn install(
        &self,
        _ctx: &ExecutionContext,
        runtime: &RuntimeDescriptor,
        root: &Path,
    ) -> Result<(), InstallError> {
        self.calls
            .lock()
            .unwrap()
            .push((runtime.name.clone(), root.to_path_buf()));
        Ok(())
    }
}

#[test]
fn test_ir_fast_path_writes_golden_document() {
    let source = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    write_source(source.path());

    let mut opts = options(source.path(), "ir", out.path());
    opts.dev_mode = true;
    Converter::new().convert(&opts).unwrap();

    let written = std::fs::read_to_string(out.path().join(IR_FILE)).unwrap();
    let expected = concat!(
        "key = readFile(\"key.pub\")\n",
        "\n",
        "output result {\n",
        "    __logicalName = \"result\"\n",
        "    value = key\n",
        "}",
    );
    assert_eq!(written.replace("\r\n", "\n"), expected);
}

#[test]
fn test_ir_target_requires_dev_mode() {
    let source = tempfile::TempDir::new().unwrap();
    let parent = tempfile::TempDir::new().unwrap();
    let out = parent.path().join("out");
    write_source(source.path());

    let err = Converter::new()
        .convert(&options(source.path(), "ir", &out))
        .unwrap_err();
    assert!(err.to_string().contains("cannot generate programs for 'ir'"));
    // hard error: nothing may be written
    assert!(!out.exists());
}

#[test]
fn test_registry_languages_produce_project_trees() {
    for language in registry::supported_languages() {
        let source = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        write_source(source.path());

        Converter::new()
            .convert(&options(source.path(), language, out.path()))
            .unwrap_or_else(|e| panic!("conversion to {} failed: {:?}", language, e));

        let entries: Vec<_> = std::fs::read_dir(out.path()).unwrap().collect();
        assert!(!entries.is_empty(), "{} produced an empty tree", language);
        assert!(
            out.path().join("Strato.toml").is_file(),
            "{} did not write a manifest",
            language
        );
    }
}

#[test]
fn test_unknown_language_takes_plugin_path() {
    let source = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    write_source(source.path());

    let err = Converter::new()
        .with_plugin_dirs(vec![])
        .convert(&options(source.path(), "elixir", out.path()))
        .unwrap_err();

    match err.downcast_ref::<PluginError>() {
        Some(PluginError::NotFound { runtime }) => assert_eq!(runtime, "elixir"),
        other => panic!("expected plugin not-found, got {:?}", other),
    }
}

#[test]
fn test_csharp_aliases_reach_the_same_dispatch() {
    for alias in ["csharp", "c#"] {
        let source = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        write_source(source.path());

        let err = Converter::new()
            .with_plugin_dirs(vec![])
            .convert(&options(source.path(), alias, out.path()))
            .unwrap_err();

        match err.downcast_ref::<PluginError>() {
            Some(PluginError::NotFound { runtime }) => assert_eq!(runtime, "dotnet"),
            other => panic!("expected plugin not-found for {}, got {:?}", alias, other),
        }
    }
}

#[test]
fn test_generate_only_suppresses_install() {
    let source = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    write_source(source.path());

    let installer = RecordingInstaller::default();
    let converter = Converter::new().with_installer(installer.clone());
    converter
        .convert(&options(source.path(), "typescript", out.path()))
        .unwrap();

    assert!(installer.calls.lock().unwrap().is_empty());
    // generation itself still succeeded
    assert!(out.path().join("Strato.toml").is_file());
}

#[test]
fn test_install_runs_against_generated_project() {
    let source = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();
    write_source(source.path());

    let installer = RecordingInstaller::default();
    let converter = Converter::new().with_installer(installer.clone());
    let mut opts = options(source.path(), "typescript", out.path());
    opts.generate_only = false;
    converter.convert(&opts).unwrap();

    let calls = installer.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    // the runtime comes from the manifest the generator wrote, not the source
    assert_eq!(calls[0].0, "nodejs");
    assert_eq!(calls[0].1, out.path());
}

#[test]
fn test_missing_source_fails_before_dispatch() {
    let source = tempfile::TempDir::new().unwrap();
    let out = tempfile::TempDir::new().unwrap();

    let installer = RecordingInstaller::default();
    let converter = Converter::new().with_installer(installer.clone());
    let mut opts = options(source.path(), "typescript", out.path());
    opts.generate_only = false;
    let err = converter.convert(&opts).unwrap_err();

    assert!(err.to_string().contains("could not load source program"));
    assert!(err.downcast_ref::<PluginError>().is_none());
    assert!(installer.calls.lock().unwrap().is_empty());
}

#[cfg(unix)]
mod plugin_process {
    use super::*;

    fn write_plugin(dir: &Path, runtime: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(format!("strato-language-{}", runtime));
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_plugin_generation_error_propagates_verbatim() {
        let source = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let plugins = tempfile::TempDir::new().unwrap();
        write_source(source.path());
        write_plugin(
            plugins.path(),
            "fake",
            "#!/bin/sh\ncat > /dev/null\necho '{\"error\": \"unsupported resource shape\"}'\n",
        );

        let installer = RecordingInstaller::default();
        let converter = Converter::new()
            .with_plugin_dirs(vec![plugins.path().to_path_buf()])
            .with_installer(installer.clone());
        let mut opts = options(source.path(), "fake", out.path());
        opts.generate_only = false;
        let err = converter.convert(&opts).unwrap_err();

        match err.downcast_ref::<PluginError>() {
            Some(PluginError::Generation { message }) => {
                assert_eq!(message, "unsupported resource shape");
            }
            other => panic!("expected generation error, got {:?}", other),
        }
        // a failed generator must not trigger the post-generation step
        assert!(installer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_plugin_success_round_trip() {
        let source = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let plugins = tempfile::TempDir::new().unwrap();
        write_source(source.path());
        write_plugin(
            plugins.path(),
            "fake",
            "#!/bin/sh\ncat > /dev/null\necho '{}'\n",
        );

        let converter = Converter::new().with_plugin_dirs(vec![plugins.path().to_path_buf()]);
        converter
            .convert(&options(source.path(), "fake", out.path()))
            .unwrap();
    }

    #[test]
    fn test_plugin_garbage_output_is_a_protocol_error() {
        let source = tempfile::TempDir::new().unwrap();
        let out = tempfile::TempDir::new().unwrap();
        let plugins = tempfile::TempDir::new().unwrap();
        write_source(source.path());
        write_plugin(
            plugins.path(),
            "fake",
            "#!/bin/sh\ncat > /dev/null\necho 'not json'\nexit 3\n",
        );

        let converter = Converter::new().with_plugin_dirs(vec![plugins.path().to_path_buf()]);
        let err = converter
            .convert(&options(source.path(), "fake", out.path()))
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PluginError>(),
            Some(PluginError::Protocol { .. })
        ));
    }
}
