use thiserror::Error;

use crate::Tag;

/// Errors produced while reading font tables or shaping a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("table {0:?} not found")]
    TableNotFound(Tag),

    #[error("script {0:?} not found")]
    ScriptNotFound(Tag),

    #[error("no language system for {language:?} in script {script:?} and no default")]
    LanguageSystemNotFound { script: Tag, language: Tag },

    #[error("unsupported {table:?} version {version:#010x}")]
    UnsupportedTableVersion { table: Tag, version: u32 },

    #[error("unsupported {table:?} subtable format {format}")]
    UnsupportedTableFormat { table: Tag, format: u16 },

    #[error("unsupported coverage format {0}")]
    UnsupportedCoverageFormat(u16),

    #[error("coverage index {index} is out of bounds for {len} entries")]
    InvalidCoverageIndex { index: u16, len: usize },

    #[error("read of {len} bytes at offset {offset} overflows the stream")]
    StreamOverflow { offset: usize, len: usize },

    #[error("lookup type {kind} in {table:?} is not supported")]
    UnsupportedLookupType { table: Tag, kind: u16 },

    #[error("line {line} of the Unicode data file is malformed")]
    InvalidUcdLine { line: usize },

    #[error("malformed font: {0}")]
    Font(#[from] ttf_parser::FaceParsingError),

    #[error(transparent)]
    Mph(#[from] MphError),
}

/// Minimal perfect hash construction failures.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MphError {
    #[error("key {0:#x} appears more than once")]
    DuplicateKey(u32),

    #[error("no secondary seed below {limit} separates bucket {bucket}")]
    SeedSearchExhausted { bucket: usize, limit: u32 },

    #[error("key {0:#x} does not resolve to its own slot")]
    Verification(u32),

    #[error("bucket {bucket} stores direct seed {seed} outside the table")]
    InvalidSeed { bucket: usize, seed: i32 },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
