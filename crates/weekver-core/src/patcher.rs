//! AssemblyInfo patching
//!
//! Every immediate subdirectory of the workspace that contains
//! `Properties/AssemblyInfo.cs` is a project. Its `AssemblyVersion`
//! declaration is rewritten to `<major>.<suffix>`, keeping the existing major
//! version. A file without a usable declaration is reported and skipped; the
//! remaining projects are still processed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use walkdir::WalkDir;

use crate::Reporter;
use crate::calculator::{AssemblyVersion, VersionSuffix};
use crate::error::StampError;

/// Directory inside a project holding the metadata file.
pub const PROPERTIES_DIR: &str = "Properties";

/// Name of the metadata file.
pub const METADATA_FILE: &str = "AssemblyInfo.cs";

// The declaration must sit on its own line. A trailing tab is tolerated.
static VERSION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\r\n|\n)(\[assembly: AssemblyVersion\([^)]+\)\])(?:$|\r\n|\n|\t)")
        .expect("version line pattern is valid")
});

static MAJOR_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(\d+)\."#).expect("major version pattern is valid"));

/// Result of rewriting a metadata file's contents in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    /// The declaration was replaced.
    Updated {
        /// Full new file contents.
        contents: String,
        /// Version now declared.
        version: AssemblyVersion,
    },
    /// No declaration line was found.
    MissingVersionLine,
    /// A declaration was found but has no leading numeric major component.
    MissingMajorVersion {
        /// The declaration as found.
        line: String,
    },
}

/// Replace the first version declaration in `contents`.
///
/// Only the matched declaration is replaced; everything around it is
/// preserved byte for byte. If several declarations match, only the first one
/// is considered.
pub fn rewrite(contents: &str, suffix: VersionSuffix) -> Rewrite {
    let Some(line) = VERSION_LINE.captures(contents).and_then(|c| c.get(1)) else {
        return Rewrite::MissingVersionLine;
    };
    let range = line.range();
    let line = line.as_str();

    let Some(major) = MAJOR_VERSION.captures(line).and_then(|c| c.get(1)) else {
        return Rewrite::MissingMajorVersion {
            line: line.to_string(),
        };
    };

    let version = AssemblyVersion::new(major.as_str(), suffix);
    let mut updated = String::with_capacity(contents.len());
    updated.push_str(&contents[..range.start]);
    updated.push_str(&version.declaration());
    updated.push_str(&contents[range.end..]);
    Rewrite::Updated {
        contents: updated,
        version,
    }
}

/// What happened to one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The declaration was rewritten (or would have been, in a dry run).
    Patched {
        /// Version now declared.
        version: AssemblyVersion,
    },
    /// Skipped: no declaration line.
    MissingVersionLine,
    /// Skipped: declaration without a major version.
    MissingMajorVersion {
        /// The declaration as found.
        line: String,
    },
    /// Skipped: the file is not UTF-8 text (e.g. saved as UTF-16).
    NotUtf8,
}

impl PatchOutcome {
    /// Whether the file was (or would be) rewritten.
    pub fn is_patched(&self) -> bool {
        matches!(self, Self::Patched { .. })
    }
}

impl fmt::Display for PatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patched { version } => write!(f, "set to {version}"),
            Self::MissingVersionLine => f.write_str("no version line"),
            Self::MissingMajorVersion { .. } => f.write_str("no major version"),
            Self::NotUtf8 => f.write_str("not UTF-8"),
        }
    }
}

/// A metadata file and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult {
    /// Path of the metadata file.
    pub path: PathBuf,
    /// Outcome for that file.
    pub outcome: PatchOutcome,
}

/// Metadata files of all projects directly under `root`, sorted by project
/// directory name. Directories without the file are skipped silently.
pub fn find_metadata_files(root: &Path) -> Result<Vec<PathBuf>, StampError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let candidate = entry?.path().join(PROPERTIES_DIR).join(METADATA_FILE);
        if candidate.is_file() {
            files.push(candidate);
        }
    }
    Ok(files)
}

/// Rewrites metadata files with a fixed version suffix.
#[derive(Debug)]
pub struct Patcher<'a, R: Reporter + ?Sized> {
    suffix: VersionSuffix,
    dry_run: bool,
    reporter: &'a R,
}

impl<'a, R: Reporter + ?Sized> Patcher<'a, R> {
    /// Patcher applying `suffix`, reporting through `reporter`.
    pub fn new(suffix: VersionSuffix, reporter: &'a R) -> Self {
        Self {
            suffix,
            dry_run: false,
            reporter,
        }
    }

    /// Compute and report, but leave files untouched.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Patch every project directly under `root`, one after another.
    pub fn patch_workspace(&self, root: &Path) -> Result<Vec<PatchResult>, StampError> {
        let files = find_metadata_files(root)?;
        tracing::debug!(root = %root.display(), projects = files.len(), "Discovered projects");

        let mut results = Vec::with_capacity(files.len());
        for path in files {
            let outcome = self.patch_file(&path)?;
            results.push(PatchResult { path, outcome });
        }
        Ok(results)
    }

    /// Patch a single metadata file.
    ///
    /// A missing declaration or major version, or contents that are not
    /// UTF-8, are reported as a warning and leave the file untouched. Only I/O
    /// failures are errors.
    pub fn patch_file(&self, path: &Path) -> Result<PatchOutcome, StampError> {
        let bytes = std::fs::read(path).map_err(|e| StampError::io(path, e))?;
        let Ok(contents) = String::from_utf8(bytes) else {
            self.reporter
                .warning(&format!("Cannot read {} as UTF-8 text", path.display()));
            return Ok(PatchOutcome::NotUtf8);
        };

        match rewrite(&contents, self.suffix) {
            Rewrite::MissingVersionLine => {
                self.reporter
                    .warning(&format!("Cannot find version line in {}", path.display()));
                Ok(PatchOutcome::MissingVersionLine)
            }
            Rewrite::MissingMajorVersion { line } => {
                self.reporter.warning(&format!(
                    "Cannot find major version in version line {line} in {}",
                    path.display()
                ));
                Ok(PatchOutcome::MissingMajorVersion { line })
            }
            Rewrite::Updated { contents, version } => {
                if self.dry_run {
                    self.reporter.info(&format!(
                        "Would set version {version} in {} (dry run)",
                        path.display()
                    ));
                } else {
                    self.reporter
                        .info(&format!("Setting version {version} in {}", path.display()));
                    std::fs::write(path, contents).map_err(|e| StampError::io(path, e))?;
                }
                Ok(PatchOutcome::Patched { version })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::testing::RecordingReporter;
    use tempfile::TempDir;

    const SUFFIX: VersionSuffix = VersionSuffix {
        year: 24,
        week: 2,
        build: 3,
    };

    const ASSEMBLY_INFO: &str = "using System.Reflection;\r\n\
        using System.Runtime.InteropServices;\r\n\
        \r\n\
        [assembly: AssemblyTitle(\"Widgets\")]\r\n\
        [assembly: AssemblyVersion(\"5.0.0.0\")]\r\n\
        [assembly: AssemblyFileVersion(\"5.0.0.0\")]\r\n";

    fn project(root: &Path, name: &str, contents: &str) -> PathBuf {
        let dir = root.join(name).join(PROPERTIES_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(METADATA_FILE);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn updated(contents: &str) -> String {
        match rewrite(contents, SUFFIX) {
            Rewrite::Updated { contents, .. } => contents,
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_rewrite_only_declaration() {
        let expected = ASSEMBLY_INFO.replace(
            "AssemblyVersion(\"5.0.0.0\")",
            "AssemblyVersion(\"5.24.2.3\")",
        );
        assert_eq!(updated(ASSEMBLY_INFO), expected);
    }

    #[test]
    fn test_rewrite_declaration_only_file() {
        assert_eq!(
            updated("[assembly: AssemblyVersion(\"5.0.0.0\")]"),
            "[assembly: AssemblyVersion(\"5.24.2.3\")]"
        );
    }

    #[test]
    fn test_rewrite_short_forms() {
        assert_eq!(
            updated("[assembly: AssemblyVersion(\"12.1\")]\n"),
            "[assembly: AssemblyVersion(\"12.24.2.3\")]\n"
        );
        assert_eq!(
            updated("x\n[assembly: AssemblyVersion(\"3.1.*\")]\tfoo"),
            "x\n[assembly: AssemblyVersion(\"3.24.2.3\")]\tfoo"
        );
    }

    #[test]
    fn test_declaration_must_be_on_its_own_line() {
        assert_eq!(
            rewrite("// [assembly: AssemblyVersion(\"1.0.0.0\")]\n", SUFFIX),
            Rewrite::MissingVersionLine
        );
        assert_eq!(
            rewrite("[assembly: AssemblyVersion(\"1.0.0.0\")] // pinned\n", SUFFIX),
            Rewrite::MissingVersionLine
        );
    }

    #[test]
    fn test_commented_copy_above_declaration_is_untouched() {
        let contents = "// [assembly: AssemblyVersion(\"1.0.0.0\")]\n[assembly: AssemblyVersion(\"1.0.0.0\")]\n";
        assert_eq!(
            updated(contents),
            "// [assembly: AssemblyVersion(\"1.0.0.0\")]\n[assembly: AssemblyVersion(\"1.24.2.3\")]\n"
        );
    }

    #[test]
    fn test_first_declaration_wins() {
        let contents = "[assembly: AssemblyVersion(\"1.0.0.0\")]\n[assembly: AssemblyVersion(\"2.0.0.0\")]\n";
        match rewrite(contents, SUFFIX) {
            Rewrite::Updated { contents, version } => {
                assert_eq!(version.major, "1");
                assert_eq!(
                    contents,
                    "[assembly: AssemblyVersion(\"1.24.2.3\")]\n[assembly: AssemblyVersion(\"2.0.0.0\")]\n"
                );
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_major_version() {
        for line in [
            "[assembly: AssemblyVersion(\"1\")]",
            "[assembly: AssemblyVersion(\"x.1.0.0\")]",
            "[assembly: AssemblyVersion(Version)]",
        ] {
            assert_eq!(
                rewrite(line, SUFFIX),
                Rewrite::MissingMajorVersion {
                    line: line.to_string()
                }
            );
        }
    }

    #[test]
    fn test_patch_workspace_writes_each_project() {
        let ws = TempDir::new().unwrap();
        let a = project(ws.path(), "Alpha", ASSEMBLY_INFO);
        let b = project(ws.path(), "Beta", "[assembly: AssemblyVersion(\"9.9.9.9\")]\n");
        std::fs::create_dir_all(ws.path().join("docs")).unwrap();
        std::fs::write(ws.path().join("README.md"), "readme").unwrap();

        let reporter = RecordingReporter::default();
        let results = Patcher::new(SUFFIX, &reporter)
            .patch_workspace(ws.path())
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path, a);
        assert_eq!(results[1].path, b);
        assert!(results.iter().all(|r| r.outcome.is_patched()));

        let alpha = std::fs::read_to_string(&a).unwrap();
        assert!(alpha.contains("[assembly: AssemblyVersion(\"5.24.2.3\")]\r\n"));
        assert!(alpha.contains("[assembly: AssemblyFileVersion(\"5.0.0.0\")]"));
        assert_eq!(
            std::fs::read_to_string(&b).unwrap(),
            "[assembly: AssemblyVersion(\"9.24.2.3\")]\n"
        );

        let infos = reporter.infos();
        assert_eq!(infos.len(), 2);
        assert!(infos[0].contains("5.24.2.3"));
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn test_unmatched_file_left_untouched_with_one_warning() {
        let ws = TempDir::new().unwrap();
        let original = "namespace Widgets;\r\n// no version here\r\n";
        let bad = project(ws.path(), "Broken", original);
        let good = project(ws.path(), "Good", "[assembly: AssemblyVersion(\"2.0.0.0\")]");

        let reporter = RecordingReporter::default();
        let results = Patcher::new(SUFFIX, &reporter)
            .patch_workspace(ws.path())
            .unwrap();

        assert_eq!(results[0].outcome, PatchOutcome::MissingVersionLine);
        assert_eq!(std::fs::read(&bad).unwrap(), original.as_bytes());

        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(&bad.display().to_string()));

        assert!(results[1].outcome.is_patched());
        assert_eq!(
            std::fs::read_to_string(&good).unwrap(),
            "[assembly: AssemblyVersion(\"2.24.2.3\")]"
        );
    }

    #[test]
    fn test_missing_major_left_untouched_with_one_warning() {
        let ws = TempDir::new().unwrap();
        let original = "[assembly: AssemblyVersion(\"beta\")]\n";
        let path = project(ws.path(), "Beta", original);

        let reporter = RecordingReporter::default();
        let outcome = Patcher::new(SUFFIX, &reporter).patch_file(&path).unwrap();

        assert!(matches!(outcome, PatchOutcome::MissingMajorVersion { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
        assert_eq!(reporter.warnings().len(), 1);
    }

    #[test]
    fn test_utf16_project_skipped_and_others_patched() {
        let ws = TempDir::new().unwrap();
        let a = project(ws.path(), "A", "[assembly: AssemblyVersion(\"5.0.0.0\")]");
        let utf16: Vec<u8> = [0xFF, 0xFE]
            .into_iter()
            .chain(
                "[assembly: AssemblyVersion(\"6.0.0.0\")]"
                    .encode_utf16()
                    .flat_map(u16::to_le_bytes),
            )
            .collect();
        let b = project(ws.path(), "B", "");
        std::fs::write(&b, &utf16).unwrap();
        let c = project(ws.path(), "C", "[assembly: AssemblyVersion(\"7.0.0.0\")]");

        let reporter = RecordingReporter::default();
        let results = Patcher::new(SUFFIX, &reporter)
            .patch_workspace(ws.path())
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[1].outcome, PatchOutcome::NotUtf8);
        assert_eq!(std::fs::read(&b).unwrap(), utf16);
        assert_eq!(
            std::fs::read_to_string(&a).unwrap(),
            "[assembly: AssemblyVersion(\"5.24.2.3\")]"
        );
        assert_eq!(
            std::fs::read_to_string(&c).unwrap(),
            "[assembly: AssemblyVersion(\"7.24.2.3\")]"
        );

        let warnings = reporter.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains(&b.display().to_string()));
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let ws = TempDir::new().unwrap();
        let path = project(ws.path(), "Alpha", ASSEMBLY_INFO);

        let reporter = RecordingReporter::default();
        let results = Patcher::new(SUFFIX, &reporter)
            .dry_run(true)
            .patch_workspace(ws.path())
            .unwrap();

        assert!(results[0].outcome.is_patched());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), ASSEMBLY_INFO);
        assert!(reporter.infos()[0].contains("dry run"));
    }

    #[test]
    fn test_missing_workspace_is_an_error() {
        let ws = TempDir::new().unwrap();
        let missing = ws.path().join("nope");
        let result = Patcher::new(SUFFIX, &crate::NullReporter).patch_workspace(&missing);
        assert!(matches!(result, Err(StampError::Walk(_))));
    }
}
