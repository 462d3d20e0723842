use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{status_code, OrchestratorError, Result};
use crate::runner::command_line;

/// Package name read from the manifest.
///
/// Construction goes through [`PackageName::parse`], so a value of this type is
/// never empty, never the `null` a query tool prints for a missing key, and
/// never contains whitespace or path separators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn parse(raw: &str, manifest: &Path) -> Result<Self> {
        let name = raw.trim();
        let invalid = name.is_empty()
            || name == "null"
            || name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\');

        if invalid {
            return Err(OrchestratorError::InvalidPackageName {
                name: name.to_string(),
                manifest: manifest.to_path_buf(),
            });
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the package name.
pub trait ManifestReader {
    fn package_name(&self, manifest: &Path) -> Result<PackageName>;
}

/// `converter < manifest | query -r <path>`
///
/// Both programs are spawned directly with their stdio connected; no shell is
/// involved.
#[derive(Debug, Clone)]
pub struct ToolchainReader {
    pub converter: PathBuf,
    pub query: PathBuf,
    pub query_path: String,
}

impl ManifestReader for ToolchainReader {
    fn package_name(&self, manifest: &Path) -> Result<PackageName> {
        let input = File::open(manifest).map_err(|e| OrchestratorError::Manifest {
            path: manifest.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut convert = Command::new(&self.converter);
        convert.stdin(Stdio::from(input)).stdout(Stdio::piped());
        let convert_line = command_line(&convert);
        let mut converter = convert.spawn().map_err(|source| OrchestratorError::Spawn {
            command: convert_line.clone(),
            source,
        })?;

        let json = converter.stdout.take().ok_or_else(|| OrchestratorError::Manifest {
            path: manifest.to_path_buf(),
            reason: "converter produced no stdout handle".to_string(),
        })?;

        let mut query = Command::new(&self.query);
        query
            .arg("-r")
            .arg(&self.query_path)
            .stdin(Stdio::from(json))
            .stderr(Stdio::inherit());
        let query_line = command_line(&query);
        let queried = query.output();
        // Close our copy of the pipe's read end so a converter still writing
        // sees EPIPE instead of blocking forever.
        drop(query);

        // Reap the converter before looking at the query result so it never
        // outlives us as a zombie.
        let converted = converter.wait()?;
        let queried = queried.map_err(|source| OrchestratorError::Spawn {
            command: query_line.clone(),
            source,
        })?;

        if !converted.success() {
            return Err(OrchestratorError::CommandFailed {
                command: format!("{} < {}", convert_line, manifest.display()),
                code: status_code(converted),
            });
        }
        if !queried.status.success() {
            return Err(OrchestratorError::CommandFailed {
                command: query_line,
                code: status_code(queried.status),
            });
        }

        let raw = String::from_utf8_lossy(&queried.stdout);
        tracing::debug!(raw = %raw.trim(), "query output");
        PackageName::parse(&raw, manifest)
    }
}

/// Reads the manifest in-process with the `toml` crate.
#[derive(Debug, Clone)]
pub struct NativeReader {
    pub query_path: String,
}

impl ManifestReader for NativeReader {
    fn package_name(&self, manifest: &Path) -> Result<PackageName> {
        let content =
            std::fs::read_to_string(manifest).map_err(|e| OrchestratorError::Manifest {
                path: manifest.to_path_buf(),
                reason: e.to_string(),
            })?;
        let document: toml::Value =
            toml::from_str(&content).map_err(|e| OrchestratorError::Manifest {
                path: manifest.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut node = &document;
        for key in self.query_path.split('.').filter(|k| !k.is_empty()) {
            node = match node.get(key) {
                Some(next) => next,
                // Same outcome as `jq -r` on a missing key.
                None => return PackageName::parse("null", manifest),
            };
        }

        match node.as_str() {
            Some(name) => PackageName::parse(name, manifest),
            None => Err(OrchestratorError::Manifest {
                path: manifest.to_path_buf(),
                reason: format!("{} is not a string", self.query_path),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn manifest(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cargo.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let name = PackageName::parse("  acvm_js\n", Path::new("Cargo.toml")).unwrap();
        assert_eq!(name.as_str(), "acvm_js");
    }

    #[test]
    fn parse_rejects_empty_and_null() {
        for raw in ["", "   \n", "null"] {
            let err = PackageName::parse(raw, Path::new("Cargo.toml")).unwrap_err();
            assert!(matches!(err, OrchestratorError::InvalidPackageName { .. }), "{raw:?}");
        }
    }

    #[test]
    fn parse_rejects_separators() {
        assert!(PackageName::parse("../evil", Path::new("Cargo.toml")).is_err());
        assert!(PackageName::parse("two words", Path::new("Cargo.toml")).is_err());
    }

    #[test]
    fn native_reader_follows_query_path() {
        let (_dir, path) = manifest("[package]\nname = \"foo\"\nversion = \"0.1.0\"\n");
        let reader = NativeReader {
            query_path: ".package.name".to_string(),
        };
        assert_eq!(reader.package_name(&path).unwrap().as_str(), "foo");
    }

    #[test]
    fn native_reader_missing_key_is_invalid_name() {
        let (_dir, path) = manifest("[workspace]\nmembers = []\n");
        let reader = NativeReader {
            query_path: ".package.name".to_string(),
        };
        match reader.package_name(&path) {
            Err(OrchestratorError::InvalidPackageName { name, .. }) => assert_eq!(name, "null"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn native_reader_reports_unreadable_manifest() {
        let reader = NativeReader {
            query_path: ".package.name".to_string(),
        };
        let err = reader
            .package_name(Path::new("/nonexistent/Cargo.toml"))
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::Manifest { .. }));
    }

    #[cfg(unix)]
    mod toolchain {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::os::unix::fs::PermissionsExt;

        fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn chains_converter_into_query() {
            let (dir, path) = manifest("[package]\nname = \"foo\"\n");
            // The fake converter pulls the name out of the TOML and emits it as
            // JSON; the fake query asserts its arguments and unwraps it.
            let converter = script(
                dir.path(),
                "toml2json",
                r#"name=$(sed -n 's/^name = "\(.*\)"$/\1/p'); printf '{"package":{"name":"%s"}}\n' "$name""#,
            );
            let query = script(
                dir.path(),
                "jq",
                r#"[ "$1" = "-r" ] && [ "$2" = ".package.name" ] || exit 9
sed -n 's/.*"name":"\([^"]*\)".*/\1/p'"#,
            );

            let reader = ToolchainReader {
                converter,
                query,
                query_path: ".package.name".to_string(),
            };
            assert_eq!(reader.package_name(&path).unwrap().as_str(), "foo");
        }

        #[test]
        fn failing_query_propagates_its_status() {
            let (dir, path) = manifest("[package]\nname = \"foo\"\n");
            let converter = script(dir.path(), "toml2json", "cat");
            let query = script(dir.path(), "jq", "cat >/dev/null; exit 5");

            let reader = ToolchainReader {
                converter,
                query,
                query_path: ".package.name".to_string(),
            };
            let err = reader.package_name(&path).unwrap_err();
            assert_eq!(err.exit_code(), 5);
        }

        #[test]
        fn empty_query_output_is_rejected() {
            let (dir, path) = manifest("");
            let converter = script(dir.path(), "toml2json", "cat");
            let query = script(dir.path(), "jq", "cat >/dev/null; echo");

            let reader = ToolchainReader {
                converter,
                query,
                query_path: ".package.name".to_string(),
            };
            let err = reader.package_name(&path).unwrap_err();
            assert!(matches!(err, OrchestratorError::InvalidPackageName { .. }));
        }
    }
}
