//! Move package builder, driving the aptos cli

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::info;

use crate::{
    constants::{APTOS_CLI, MOVE_MANIFEST},
    errors::ScriptError,
    utils::{command_success_or, CommandRunner, ExternalCommand},
};

/// Arguments of the compile step, metadata is needed by the publish call
const COMPILE_ARGS: &str = "move compile --save-metadata --included-artifacts sparse";

/// Arguments of the cli publish step
const PUBLISH_ARGS: &str = "move publish";

/// The `[package]` table of a `Move.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    /// Package name
    pub name: String,
    /// Declared version, if any
    #[serde(default)]
    pub version: Option<String>,
}

/// `Move.toml`, only the parts we read
#[derive(Deserialize)]
struct ManifestFile {
    /// `[package]` table
    package: PackageManifest,
}

/// A move package on disk, built and published through the aptos cli
#[derive(Debug, Clone)]
pub struct MovePackage {
    /// Directory holding `Move.toml`
    dir: PathBuf,
}

impl MovePackage {
    /// Package rooted at `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Package directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `aptos move compile`, run from the package directory
    pub fn compile_command(&self) -> ExternalCommand {
        ExternalCommand::new(APTOS_CLI, COMPILE_ARGS, &self.dir)
    }

    /// `aptos move publish`, run from the package directory
    pub fn publish_command(&self) -> ExternalCommand {
        ExternalCommand::new(APTOS_CLI, PUBLISH_ARGS, &self.dir)
    }

    /// Compile the package, any failure aborts the run
    pub fn compile<R: CommandRunner + ?Sized>(&self, runner: &R) -> Result<(), ScriptError> {
        command_success_or(
            runner,
            &self.compile_command(),
            ScriptError::PackageCompilation,
            "Compilation failed",
        )
    }

    /// Publish the package with the aptos cli
    pub fn publish_with_cli<R: CommandRunner + ?Sized>(&self, runner: &R) -> Result<(), ScriptError> {
        command_success_or(
            runner,
            &self.publish_command(),
            ScriptError::ExternalCommand,
            "Cli publish failed",
        )
    }

    /// Read the bytes to publish, `file` being relative to the package directory
    pub fn read_package_file(&self, file: &Path) -> Result<Vec<u8>, ScriptError> {
        let path = self.dir.join(file);
        let bytes = fs::read(&path)
            .map_err(|e| ScriptError::PackageRead(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), size = bytes.len(), "Read package file");
        Ok(bytes)
    }

    /// Parse the package manifest
    pub fn manifest(&self) -> Result<PackageManifest, ScriptError> {
        let path = self.dir.join(MOVE_MANIFEST);
        let contents = fs::read_to_string(&path)
            .map_err(|e| ScriptError::PackageRead(format!("{}: {e}", path.display())))?;
        let manifest: ManifestFile = toml::from_str(&contents)
            .map_err(|e| ScriptError::PackageRead(format!("{}: {e}", path.display())))?;
        Ok(manifest.package)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[package]
name = "hello_blockchain"
version = "0.0.1"

[addresses]
hello_blockchain = "_"

[dependencies.AptosFramework]
git = "https://github.com/aptos-labs/aptos-core.git"
rev = "mainnet"
subdir = "aptos-move/framework/aptos-framework"
"#;

    #[test]
    fn commands_run_in_package_dir() {
        let package = MovePackage::new("contracts/hello");
        let compile = package.compile_command();
        assert_eq!(
            compile.to_string(),
            "aptos move compile --save-metadata --included-artifacts sparse"
        );
        assert_eq!(compile.cwd, PathBuf::from("contracts/hello"));
        assert_eq!(package.publish_command().to_string(), "aptos move publish");
    }

    #[test]
    fn reads_manifest_and_package_bytes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Move.toml"), MANIFEST).unwrap();
        let package = MovePackage::new(dir.path());

        let manifest = package.manifest().unwrap();
        assert_eq!(manifest.name, "hello_blockchain");
        assert_eq!(manifest.version.as_deref(), Some("0.0.1"));

        let bytes = package.read_package_file(Path::new("Move.toml")).unwrap();
        assert_eq!(bytes, MANIFEST.as_bytes());
    }

    #[test]
    fn missing_files_are_read_errors() {
        let dir = tempfile::tempdir().unwrap();
        let package = MovePackage::new(dir.path());
        assert!(matches!(package.manifest(), Err(ScriptError::PackageRead(_))));
        assert!(matches!(
            package.read_package_file(Path::new("Move.toml")),
            Err(ScriptError::PackageRead(_))
        ));
    }

    #[test]
    fn manifest_without_package_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Move.toml"), "[addresses]\nfoo = \"0x1\"\n").unwrap();
        assert!(matches!(
            MovePackage::new(dir.path()).manifest(),
            Err(ScriptError::PackageRead(_))
        ));
    }
}
