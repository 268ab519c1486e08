//! Aggregated validation report
//!
//! The loader never stops at the first bad record: every violation found in
//! one pass is collected here so authors see the complete list at once.

use std::fmt;
use std::path::PathBuf;

/// A single violated constraint on one field of one record
#[derive(Debug, Clone)]
pub struct Violation {
    /// Field the constraint applies to (e.g. `title`, `social.website`)
    pub field: String,
    /// What was wrong with the value
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field `{}`: {}", self.field, self.message)
    }
}

/// All violations found in one source file
#[derive(Debug, Clone)]
pub struct FileIssues {
    /// Source file path relative to the content root
    pub file: PathBuf,
    pub violations: Vec<Violation>,
}

/// Every violation of a load pass, grouped by source file
///
/// A non-empty report is build-fatal: the site must not ship invalid
/// content.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub files: Vec<FileIssues>,
}

impl BuildReport {
    /// Record the violations found in one file
    pub fn push(&mut self, file: impl Into<PathBuf>, violations: Vec<Violation>) {
        if !violations.is_empty() {
            self.files.push(FileIssues {
                file: file.into(),
                violations,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total violation count across all files
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "content validation failed: {} problem(s) in {} file(s)",
            self.total(),
            self.files.len()
        )?;
        for issues in &self.files {
            writeln!(f, "  {}", issues.file.display())?;
            for violation in &issues.violations {
                writeln!(f, "    - {}", violation)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for BuildReport {}
