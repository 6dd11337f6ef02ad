//! Errors that occur during building

use sfnt_read::ReadError;
use sfnt_types::Tag;

use crate::validate::ValidationReport;

/// An error occurred while building a font or one of its tables.
#[derive(Debug)]
pub enum BuildError {
    /// A table failed the pre-write validation pass.
    ValidationFailed(ValidationReport),
    /// A raw table could not be decoded into its builder.
    DecodeFailed { tag: Tag, inner: ReadError },
    /// An index passed to a list edit was out of range.
    IndexOutOfRange { index: usize, len: usize },
    /// The loca entry count disagrees with the maxp glyph count.
    MismatchedGlyphCount { loca_glyphs: usize, maxp_glyphs: u16 },
    /// A table the operation requires is not in the builder.
    MissingTable(Tag),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::ValidationFailed(report) => report.fmt(f),
            BuildError::DecodeFailed { tag, inner } => {
                write!(f, "failed to decode '{tag}' table: {inner}")
            }
            BuildError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for list of length {len}")
            }
            BuildError::MismatchedGlyphCount {
                loca_glyphs,
                maxp_glyphs,
            } => write!(
                f,
                "loca describes {loca_glyphs} glyphs but maxp declares {maxp_glyphs}"
            ),
            BuildError::MissingTable(tag) => write!(f, "the '{tag}' table is missing"),
        }
    }
}

impl From<ValidationReport> for BuildError {
    fn from(report: ValidationReport) -> Self {
        BuildError::ValidationFailed(report)
    }
}

impl std::error::Error for BuildError {}
