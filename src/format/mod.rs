mod reader;
mod writer;

pub use reader::{read_polygon_file, read_polygons};
pub use writer::{write_polygon_file, write_polygons};

use std::fmt;

/// The kind of graphics object a file tag announces.
///
/// Every object in a graphics file starts with a single tag letter; the
/// letter selects the kind, and its case selects the [`Encoding`] of the
/// body that follows (uppercase text, lowercase binary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Lines,
    Markers,
    Pixels,
    Polygons,
    QuadMesh,
    Text,
}

impl ObjectKind {
    /// Decodes a tag letter into its object kind and body encoding.
    ///
    /// Returns `None` for letters no object kind claims.
    #[must_use]
    pub fn from_tag(tag: char) -> Option<(Self, Encoding)> {
        let kind = match tag.to_ascii_uppercase() {
            'L' => Self::Lines,
            'M' => Self::Markers,
            'F' => Self::Pixels,
            'P' => Self::Polygons,
            'Q' => Self::QuadMesh,
            'T' => Self::Text,
            _ => return None,
        };
        let encoding = if tag.is_ascii_uppercase() {
            Encoding::Ascii
        } else {
            Encoding::Binary
        };
        Some((kind, encoding))
    }

    /// Returns the tag letter announcing this kind in `encoding`.
    #[must_use]
    pub fn tag(self, encoding: Encoding) -> char {
        let upper = match self {
            Self::Lines => 'L',
            Self::Markers => 'M',
            Self::Pixels => 'F',
            Self::Polygons => 'P',
            Self::QuadMesh => 'Q',
            Self::Text => 'T',
        };
        match encoding {
            Encoding::Ascii => upper,
            Encoding::Binary => upper.to_ascii_lowercase(),
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lines => "lines",
            Self::Markers => "markers",
            Self::Pixels => "pixels",
            Self::Polygons => "polygons",
            Self::QuadMesh => "quadmesh",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

/// How the scalar fields of an object body are laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Whitespace-separated decimal text.
    Ascii,
    /// Little-endian 4-byte scalars, packed with no separators.
    Binary,
}

/// Parameters controlling how a mesh is written back out.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Encoding of the object body.
    pub encoding: Encoding,
    /// Whether an existing file at the output path may be replaced.
    pub overwrite: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            encoding: Encoding::Ascii,
            overwrite: false,
        }
    }
}
