use std::path::PathBuf;

use thiserror::Error;

use crate::format::ObjectKind;

/// Top-level error type for the normalis toolkit.
#[derive(Debug, Error)]
pub enum NormalisError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

/// The input file could not be located or opened.
#[derive(Debug, Error)]
#[error("cannot open {}: {source}", path.display())]
pub struct NotFoundError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Errors decoding the bytes of a graphics object file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("unrecognized object tag {tag:?}")]
    UnrecognizedTag { tag: char },

    #[error("unexpected end of file while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("invalid number {token:?} while reading {context}")]
    InvalidNumber { token: String, context: &'static str },

    #[error("negative {context}: {value}")]
    NegativeCount { context: &'static str, value: i64 },

    #[error("colour flag must be 0, 1, or 2, got {value}")]
    InvalidColourFlag { value: i64 },

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

/// The file decodes, but does not hold exactly one structurally sound
/// polygon mesh.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("file contains no objects")]
    Empty,

    #[error("file contains more than one object; exactly one polygon object expected")]
    MultipleObjects,

    #[error("file contains a {kind} object; exactly one polygon object expected")]
    NotPolygons { kind: ObjectKind },

    #[error("mesh has {n_normals} vertex normals for {n_points} points")]
    NormalCountMismatch { n_points: usize, n_normals: usize },

    #[error("mesh has {actual} {per} colours, expected {expected}")]
    ColourCountMismatch {
        per: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("end index of facet {facet} is {end}, but the previous facet ends at {prev}")]
    InvalidEndIndices { facet: usize, prev: u32, end: u32 },

    #[error("final end index {end} does not match {pool} stored indices")]
    IndexPoolMismatch { end: u32, pool: usize },

    #[error("facet {facet} has {len} vertices; at least 3 required")]
    FacetTooSmall { facet: usize, len: usize },

    #[error("facet {facet} references vertex {index}, but the mesh has {n_points} points")]
    IndexOutOfBounds {
        facet: usize,
        index: u32,
        n_points: usize,
    },
}

/// The output file could not be produced.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("{} already exists and overwriting is not enabled", path.display())]
    AlreadyExists { path: PathBuf },

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for results using [`NormalisError`].
pub type Result<T> = std::result::Result<T, NormalisError>;
