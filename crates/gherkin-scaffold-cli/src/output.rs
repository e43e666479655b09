//! Writing rendered artifacts.
//!
//! Writing happens in two phases. Every artifact is first staged in a
//! temporary file next to its destination; only when all of them are on disk
//! are they persisted over their final names. A failure while staging leaves
//! the previous artifacts untouched, so a new suite never sits next to a
//! stale runner.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use gherkin_scaffold::generator::Artifact;
use tempfile::NamedTempFile;

use crate::error::CliError;

/// Write every artifact into `dir`, creating it if needed.
///
/// Returns the destination paths in input order.
///
/// # Errors
///
/// Returns [`CliError::WriteArtifact`] naming the first artifact that could
/// not be staged or persisted.
pub fn write_artifacts(dir: &Path, artifacts: &[&Artifact]) -> Result<Vec<PathBuf>, CliError> {
    fs::create_dir_all(dir).map_err(|source| CliError::WriteArtifact {
        path: dir.to_path_buf(),
        source,
    })?;
    let staged = artifacts
        .iter()
        .map(|artifact| Staged::new(dir, artifact))
        .collect::<Result<Vec<_>, _>>()?;
    staged.into_iter().map(Staged::persist).collect()
}

/// An artifact written and synced to a temporary file, not yet visible under
/// its final name. Dropping it removes the temporary file.
struct Staged {
    file: NamedTempFile,
    path: PathBuf,
    bytes: usize,
}

impl Staged {
    fn new(dir: &Path, artifact: &Artifact) -> Result<Self, CliError> {
        let path = dir.join(&artifact.name);
        let failed = |source| CliError::WriteArtifact {
            path: path.clone(),
            source,
        };

        let mut file = NamedTempFile::new_in(path.parent().unwrap_or(dir)).map_err(failed)?;
        file.write_all(artifact.source.as_bytes()).map_err(failed)?;
        file.as_file().sync_all().map_err(failed)?;
        Ok(Self {
            file,
            path,
            bytes: artifact.source.len(),
        })
    }

    fn persist(self) -> Result<PathBuf, CliError> {
        let Self { file, path, bytes } = self;
        if let Err(e) = file.persist(&path) {
            return Err(CliError::WriteArtifact {
                path,
                source: e.error,
            });
        }
        tracing::debug!(path = %path.display(), bytes, "wrote artifact");
        Ok(path)
    }
}

/// Print every artifact to `out`, each preceded by a comment naming it.
///
/// # Errors
///
/// Returns [`CliError::Io`] if `out` cannot be written.
pub fn print_artifacts<W: Write>(out: &mut W, artifacts: &[&Artifact]) -> Result<(), CliError> {
    for artifact in artifacts {
        writeln!(out, "// {}", artifact.name)?;
        out.write_all(artifact.source.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gherkin_scaffold::ambient::{RUNNER_BINDINGS, SUITE_BINDINGS};
    use rstest::{fixture, rstest};

    #[fixture]
    fn artifacts() -> (Artifact, Artifact) {
        (
            Artifact {
                name: "suite.ts".into(),
                source: "declare const world;\n".into(),
                bindings: SUITE_BINDINGS,
            },
            Artifact {
                name: "runner.ts".into(),
                source: "export function* GetSuite(env) {}\n".into(),
                bindings: RUNNER_BINDINGS,
            },
        )
    }

    #[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
    #[rstest]
    fn writes_each_artifact_into_a_new_directory(artifacts: (Artifact, Artifact)) {
        let temp = tempfile::tempdir().expect("temp dir");
        let dir = temp.path().join("generated");
        let (suite, runner) = artifacts;

        let paths = write_artifacts(&dir, &[&suite, &runner]).expect("artifacts written");

        assert_eq!(paths, [dir.join("suite.ts"), dir.join("runner.ts")]);
        assert_eq!(fs::read_to_string(dir.join("suite.ts")).expect("suite"), suite.source);
        assert_eq!(fs::read_to_string(dir.join("runner.ts")).expect("runner"), runner.source);
        let entries = fs::read_dir(&dir).expect("read dir").count();
        assert_eq!(entries, 2, "no temporary files are left behind");
    }

    #[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
    #[rstest]
    fn overwrites_existing_artifacts(artifacts: (Artifact, Artifact)) {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(temp.path().join("suite.ts"), "stale").expect("seed file");
        let (suite, _) = artifacts;

        write_artifacts(temp.path(), &[&suite]).expect("artifact written");

        assert_eq!(
            fs::read_to_string(temp.path().join("suite.ts")).expect("suite"),
            suite.source
        );
    }

    #[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
    #[rstest]
    fn reports_unwritable_destinations(artifacts: (Artifact, Artifact)) {
        let temp = tempfile::tempdir().expect("temp dir");
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, "").expect("seed file");
        let (suite, _) = artifacts;

        let err = write_artifacts(&blocker, &[&suite]).err();
        assert!(matches!(err, Some(CliError::WriteArtifact { path, .. }) if path == blocker));
    }

    #[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
    #[rstest]
    fn failed_staging_leaves_earlier_artifacts_untouched(artifacts: (Artifact, Artifact)) {
        let temp = tempfile::tempdir().expect("temp dir");
        fs::write(temp.path().join("suite.ts"), "stale").expect("seed file");
        let (suite, mut runner) = artifacts;
        runner.name = "missing/runner.ts".into();

        let err = write_artifacts(temp.path(), &[&suite, &runner]).err();

        let unstaged = temp.path().join("missing/runner.ts");
        assert!(matches!(err, Some(CliError::WriteArtifact { path, .. }) if path == unstaged));
        assert_eq!(
            fs::read_to_string(temp.path().join("suite.ts")).expect("suite"),
            "stale"
        );
        let entries = fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 1, "staged files are removed on failure");
    }

    #[expect(clippy::expect_used, reason = "tests use explicit failures for clarity")]
    #[rstest]
    fn prints_artifacts_with_name_headers(artifacts: (Artifact, Artifact)) {
        let (suite, runner) = artifacts;
        let mut out = Vec::new();
        print_artifacts(&mut out, &[&suite, &runner]).expect("printed");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "// suite.ts\ndeclare const world;\n// runner.ts\nexport function* GetSuite(env) {}\n"
        );
    }
}
