use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{FormatError, NotFoundError, Result, StructureError};
use crate::format::{Encoding, ObjectKind};
use crate::math::{Point3, Vector3};
use crate::mesh::{Colour, ColourTable, PolygonMesh, SurfaceProperties};

/// Upper bound on vector capacity reserved from file-declared counts.
const PREALLOC_LIMIT: usize = 1 << 16;

/// Reads the polygon object stored in the graphics file at `path`.
///
/// Returns the mesh together with the encoding the file used, so a caller
/// can write results back in kind.
///
/// # Errors
///
/// Returns [`NotFoundError`] if the file cannot be opened, and otherwise
/// everything [`read_polygons`] can return.
pub fn read_polygon_file(path: &Path) -> Result<(PolygonMesh, Encoding)> {
    let file = File::open(path).map_err(|source| NotFoundError {
        path: path.to_path_buf(),
        source,
    })?;
    read_polygons(BufReader::new(file))
}

/// Reads exactly one polygon object from `reader`.
///
/// The object tag selects the body encoding: `P` announces whitespace
/// separated text, `p` packed little-endian scalars. The mesh is checked
/// against the structural invariants of [`PolygonMesh::validate`] before
/// it is returned.
///
/// # Errors
///
/// Returns a [`FormatError`] when the bytes cannot be decoded (unknown
/// tag, malformed number, negative count, truncation) and a
/// [`StructureError`] when they decode to something other than exactly one
/// structurally sound polygon object.
pub fn read_polygons(mut reader: impl BufRead) -> Result<(PolygonMesh, Encoding)> {
    let Some(first) = next_nonspace(&mut reader).map_err(FormatError::Io)? else {
        return Err(StructureError::Empty.into());
    };
    let tag = char::from(first);
    let Some((kind, encoding)) = ObjectKind::from_tag(tag) else {
        return Err(FormatError::UnrecognizedTag { tag }.into());
    };
    if kind != ObjectKind::Polygons {
        return Err(StructureError::NotPolygons { kind }.into());
    }

    let mesh = match encoding {
        Encoding::Ascii => read_body(&mut AsciiSource { reader: &mut reader })?,
        Encoding::Binary => read_body(&mut BinarySource { reader: &mut reader })?,
    };

    if let Some(byte) = next_nonspace(&mut reader).map_err(FormatError::Io)? {
        let tag = char::from(byte);
        if ObjectKind::from_tag(tag).is_some() {
            return Err(StructureError::MultipleObjects.into());
        }
        return Err(FormatError::UnrecognizedTag { tag }.into());
    }

    mesh.validate()?;
    Ok((mesh, encoding))
}

/// Reads a polygon object body, field by field, from either encoding.
fn read_body(source: &mut impl ScalarSource) -> Result<PolygonMesh> {
    let surfprop = SurfaceProperties {
        ambient: source.real("surface properties")?,
        diffuse: source.real("surface properties")?,
        specular: source.real("surface properties")?,
        shininess: source.real("surface properties")?,
        transparency: source.real("surface properties")?,
    };

    let n_points = source.count("point count")?;
    let points = read_sequence(n_points, || {
        Ok(Point3::new(
            source.real("point")?,
            source.real("point")?,
            source.real("point")?,
        ))
    })?;
    let normals = read_sequence(n_points, || {
        Ok(Vector3::new(
            source.real("normal")?,
            source.real("normal")?,
            source.real("normal")?,
        ))
    })?;

    let n_items = source.count("item count")?;

    let colour_flag = source.integer("colour flag")?;
    let colours = match colour_flag {
        0 => ColourTable::Single(source.colour()?),
        1 => ColourTable::PerFacet(read_sequence(n_items, || source.colour())?),
        2 => ColourTable::PerVertex(read_sequence(n_points, || source.colour())?),
        value => return Err(FormatError::InvalidColourFlag { value }.into()),
    };

    let end_indices = read_sequence(n_items, || source.index("end index"))?;
    let pool = end_indices.last().copied().unwrap_or(0) as usize;
    let indices = read_sequence(pool, || source.index("vertex index"))?;

    Ok(PolygonMesh {
        surfprop,
        points,
        normals,
        colours,
        end_indices,
        indices,
    })
}

/// Reads `count` items into a vector, reserving at most [`PREALLOC_LIMIT`]
/// entries up front since `count` is file-controlled.
fn read_sequence<T>(count: usize, mut read_one: impl FnMut() -> Result<T>) -> Result<Vec<T>> {
    let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        items.push(read_one()?);
    }
    Ok(items)
}

/// One scalar field after another, independent of the on-disk encoding.
trait ScalarSource {
    fn real(&mut self, context: &'static str) -> Result<f64>;
    fn integer(&mut self, context: &'static str) -> Result<i64>;

    /// Reads an integer that the format constrains to the non-negative
    /// 32-bit range, as counts and indices are.
    fn nonnegative_int(&mut self, context: &'static str) -> Result<i64> {
        let value = self.integer(context)?;
        if value < 0 {
            return Err(FormatError::NegativeCount { context, value }.into());
        }
        if value > i64::from(i32::MAX) {
            return Err(FormatError::InvalidNumber {
                token: value.to_string(),
                context,
            }
            .into());
        }
        Ok(value)
    }

    fn count(&mut self, context: &'static str) -> Result<usize> {
        let value = self.nonnegative_int(context)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = value as usize;
        Ok(count)
    }

    fn index(&mut self, context: &'static str) -> Result<u32> {
        let value = self.nonnegative_int(context)?;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = value as u32;
        Ok(index)
    }

    fn colour(&mut self) -> Result<Colour> {
        Ok(Colour::new(
            self.real("colour")?,
            self.real("colour")?,
            self.real("colour")?,
            self.real("colour")?,
        ))
    }
}

/// Whitespace-separated decimal tokens.
struct AsciiSource<R> {
    reader: R,
}

impl<R: BufRead> AsciiSource<R> {
    fn token(&mut self, context: &'static str) -> Result<String> {
        let Some(first) = next_nonspace(&mut self.reader).map_err(FormatError::Io)? else {
            return Err(FormatError::UnexpectedEof { context }.into());
        };
        let mut token = String::new();
        token.push(char::from(first));
        loop {
            let buf = self.reader.fill_buf().map_err(FormatError::Io)?;
            let Some(&byte) = buf.first() else { break };
            if byte.is_ascii_whitespace() {
                break;
            }
            token.push(char::from(byte));
            self.reader.consume(1);
        }
        Ok(token)
    }
}

impl<R: BufRead> ScalarSource for AsciiSource<R> {
    fn real(&mut self, context: &'static str) -> Result<f64> {
        let token = self.token(context)?;
        token
            .parse()
            .map_err(|_| FormatError::InvalidNumber { token, context }.into())
    }

    fn integer(&mut self, context: &'static str) -> Result<i64> {
        let token = self.token(context)?;
        token
            .parse()
            .map_err(|_| FormatError::InvalidNumber { token, context }.into())
    }
}

/// Packed little-endian scalars: reals as `f32`, integers as `i32`.
struct BinarySource<R> {
    reader: R,
}

impl<R: Read> BinarySource<R> {
    fn scalar_bytes(&mut self, context: &'static str) -> Result<[u8; 4]> {
        let mut bytes = [0u8; 4];
        self.reader.read_exact(&mut bytes).map_err(|source| {
            if source.kind() == io::ErrorKind::UnexpectedEof {
                FormatError::UnexpectedEof { context }
            } else {
                FormatError::Io(source)
            }
        })?;
        Ok(bytes)
    }
}

impl<R: Read> ScalarSource for BinarySource<R> {
    fn real(&mut self, context: &'static str) -> Result<f64> {
        Ok(f64::from(f32::from_le_bytes(self.scalar_bytes(context)?)))
    }

    fn integer(&mut self, context: &'static str) -> Result<i64> {
        Ok(i64::from(i32::from_le_bytes(self.scalar_bytes(context)?)))
    }
}

/// Returns the next byte, or `None` at end of input.
fn next_byte(reader: &mut impl BufRead) -> io::Result<Option<u8>> {
    let buf = reader.fill_buf()?;
    let Some(&byte) = buf.first() else {
        return Ok(None);
    };
    reader.consume(1);
    Ok(Some(byte))
}

/// Returns the next byte that is not ASCII whitespace, or `None` at end of
/// input.
fn next_nonspace(reader: &mut impl BufRead) -> io::Result<Option<u8>> {
    loop {
        match next_byte(reader)? {
            Some(byte) if byte.is_ascii_whitespace() => {}
            other => return Ok(other),
        }
    }
}
