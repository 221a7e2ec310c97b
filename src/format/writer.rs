use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, WriteError};
use crate::format::{Encoding, ObjectKind, WriteOptions};
use crate::mesh::{Colour, ColourTable, PolygonMesh};

const INDICES_PER_LINE: usize = 8;

/// Writes `mesh` as a polygon object to the file at `path`.
///
/// Unless `options.overwrite` is set, an existing file at `path` fails the
/// write and is left untouched.
///
/// # Errors
///
/// Returns [`WriteError::AlreadyExists`] when the path is occupied and
/// overwriting is not enabled, and [`WriteError::Io`] for any other
/// failure to create or fill the file.
pub fn write_polygon_file(path: &Path, mesh: &PolygonMesh, options: WriteOptions) -> Result<()> {
    let file = if options.overwrite {
        File::create(path)
    } else {
        OpenOptions::new().write(true).create_new(true).open(path)
    }
    .map_err(|source| {
        if source.kind() == io::ErrorKind::AlreadyExists {
            WriteError::AlreadyExists {
                path: path.to_path_buf(),
            }
        } else {
            WriteError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut writer = BufWriter::new(file);
    write_polygons(&mut writer, mesh, options.encoding)
        .and_then(|()| writer.flush())
        .map_err(|source| WriteError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(())
}

/// Writes `mesh` as a polygon object to `writer` in the given encoding.
///
/// The leading tag comes from [`ObjectKind::tag`], so it always matches
/// what [`read_polygons`](super::read_polygons) dispatches on.
///
/// # Errors
///
/// Returns any I/O error the underlying writer reports.
pub fn write_polygons(
    mut writer: impl Write,
    mesh: &PolygonMesh,
    encoding: Encoding,
) -> io::Result<()> {
    write!(writer, "{}", ObjectKind::Polygons.tag(encoding))?;
    match encoding {
        Encoding::Ascii => write_ascii(&mut writer, mesh),
        Encoding::Binary => write_binary(&mut writer, mesh),
    }
}

fn write_ascii(writer: &mut impl Write, mesh: &PolygonMesh) -> io::Result<()> {
    let sp = &mesh.surfprop;
    writeln!(
        writer,
        " {} {} {} {} {} {}",
        sp.ambient,
        sp.diffuse,
        sp.specular,
        sp.shininess,
        sp.transparency,
        mesh.n_points()
    )?;
    for point in &mesh.points {
        writeln!(writer, "{} {} {}", point.x, point.y, point.z)?;
    }
    for normal in &mesh.normals {
        writeln!(writer, "{} {} {}", normal.x, normal.y, normal.z)?;
    }
    writeln!(writer, "{}", mesh.n_facets())?;
    match &mesh.colours {
        ColourTable::Single(colour) => {
            writeln!(writer, "0 {} {} {} {}", colour.r, colour.g, colour.b, colour.a)?;
        }
        ColourTable::PerFacet(colours) => {
            writeln!(writer, "1")?;
            for colour in colours {
                writeln!(writer, "{} {} {} {}", colour.r, colour.g, colour.b, colour.a)?;
            }
        }
        ColourTable::PerVertex(colours) => {
            writeln!(writer, "2")?;
            for colour in colours {
                writeln!(writer, "{} {} {} {}", colour.r, colour.g, colour.b, colour.a)?;
            }
        }
    }
    write_index_block(writer, &mesh.end_indices)?;
    write_index_block(writer, &mesh.indices)?;
    Ok(())
}

fn write_index_block(writer: &mut impl Write, values: &[u32]) -> io::Result<()> {
    for chunk in values.chunks(INDICES_PER_LINE) {
        let mut separator = "";
        for value in chunk {
            write!(writer, "{separator}{value}")?;
            separator = " ";
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_binary(writer: &mut impl Write, mesh: &PolygonMesh) -> io::Result<()> {
    let sp = &mesh.surfprop;
    for value in [
        sp.ambient,
        sp.diffuse,
        sp.specular,
        sp.shininess,
        sp.transparency,
    ] {
        put_real(writer, value)?;
    }
    put_count(writer, mesh.n_points())?;
    for point in &mesh.points {
        put_real(writer, point.x)?;
        put_real(writer, point.y)?;
        put_real(writer, point.z)?;
    }
    for normal in &mesh.normals {
        put_real(writer, normal.x)?;
        put_real(writer, normal.y)?;
        put_real(writer, normal.z)?;
    }
    put_count(writer, mesh.n_facets())?;
    match &mesh.colours {
        ColourTable::Single(colour) => {
            put_count(writer, 0)?;
            put_colour(writer, *colour)?;
        }
        ColourTable::PerFacet(colours) => {
            put_count(writer, 1)?;
            for &colour in colours {
                put_colour(writer, colour)?;
            }
        }
        ColourTable::PerVertex(colours) => {
            put_count(writer, 2)?;
            for &colour in colours {
                put_colour(writer, colour)?;
            }
        }
    }
    for &end in &mesh.end_indices {
        put_index(writer, end)?;
    }
    for &index in &mesh.indices {
        put_index(writer, index)?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn put_real(writer: &mut impl Write, value: f64) -> io::Result<()> {
    writer.write_all(&(value as f32).to_le_bytes())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn put_count(writer: &mut impl Write, value: usize) -> io::Result<()> {
    writer.write_all(&(value as i32).to_le_bytes())
}

#[allow(clippy::cast_possible_wrap)]
fn put_index(writer: &mut impl Write, value: u32) -> io::Result<()> {
    writer.write_all(&(value as i32).to_le_bytes())
}

fn put_colour(writer: &mut impl Write, colour: Colour) -> io::Result<()> {
    for value in [colour.r, colour.g, colour.b, colour.a] {
        put_real(writer, value)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::NormalisError;
    use crate::format::read_polygons;
    use crate::math::{Point3, Vector3};
    use crate::mesh::SurfaceProperties;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_path(stem: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("normalis-{stem}-{}-{n}.obj", std::process::id()))
    }

    /// A quad and a triangle sharing an edge, with per-vertex colours and
    /// every scalar representable exactly in `f32`.
    fn sample_mesh() -> PolygonMesh {
        let mut mesh = PolygonMesh::from_facets(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.5, 0.0, 0.0),
                Point3::new(1.5, 1.0, 0.25),
                Point3::new(0.0, 1.0, 0.25),
                Point3::new(0.75, -1.0, 0.5),
            ],
            &[vec![0, 1, 2, 3], vec![1, 0, 4]],
        );
        mesh.surfprop = SurfaceProperties {
            ambient: 0.25,
            diffuse: 0.5,
            specular: 0.375,
            shininess: 25.0,
            transparency: 1.0,
        };
        mesh.colours = ColourTable::PerVertex(vec![
            Colour::new(1.0, 0.0, 0.0, 1.0),
            Colour::new(0.0, 1.0, 0.0, 1.0),
            Colour::new(0.0, 0.0, 1.0, 1.0),
            Colour::new(0.5, 0.5, 0.5, 1.0),
            Colour::new(1.0, 1.0, 0.0, 0.5),
        ]);
        mesh.set_vertex_normals(vec![
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, -1.0, 0.0),
        ]);
        mesh
    }

    fn assert_same_mesh(a: &PolygonMesh, b: &PolygonMesh) {
        assert_eq!(a.surfprop, b.surfprop);
        assert_eq!(a.points, b.points);
        assert_eq!(a.normals, b.normals);
        assert_eq!(a.colours, b.colours);
        assert_eq!(a.end_indices, b.end_indices);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn ascii_output_survives_reading_back() {
        let mesh = sample_mesh();
        let mut bytes = Vec::new();
        write_polygons(&mut bytes, &mesh, Encoding::Ascii).unwrap();
        let (reread, encoding) = read_polygons(Cursor::new(bytes)).unwrap();
        assert_eq!(encoding, Encoding::Ascii);
        assert_same_mesh(&mesh, &reread);
    }

    #[test]
    fn binary_output_survives_reading_back() {
        let mesh = sample_mesh();
        let mut bytes = Vec::new();
        write_polygons(&mut bytes, &mesh, Encoding::Binary).unwrap();
        assert_eq!(bytes[0], b'p');
        let (reread, encoding) = read_polygons(Cursor::new(bytes)).unwrap();
        assert_eq!(encoding, Encoding::Binary);
        assert_same_mesh(&mesh, &reread);
    }

    #[test]
    fn ascii_layout_is_stable() {
        let mesh = PolygonMesh::from_facets(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2]],
        );
        let mut bytes = Vec::new();
        write_polygons(&mut bytes, &mesh, Encoding::Ascii).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "P 0.3 0.3 0.4 10 1 3\n\
             0 0 0\n\
             1 0 0\n\
             0 1 0\n\
             0 0 0\n\
             0 0 0\n\
             0 0 0\n\
             1\n\
             0 1 1 1 1\n\
             3\n\
             0 1 2\n"
        );
    }

    #[test]
    fn long_index_blocks_wrap_at_eight() {
        let mesh = PolygonMesh::from_facets(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1], vec![1, 3, 2]],
        );
        let mut bytes = Vec::new();
        write_polygons(&mut bytes, &mesh, Encoding::Ascii).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(
            text.ends_with("3 6 9 12\n0 1 2 0 2 3 0 3\n1 1 3 2\n"),
            "unexpected tail in:\n{text}"
        );
    }

    #[test]
    fn existing_file_is_not_clobbered_by_default() {
        let path = temp_path("noclobber");
        let mesh = sample_mesh();
        write_polygon_file(&path, &mesh, WriteOptions::default()).unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = write_polygon_file(&path, &mesh, WriteOptions::default()).unwrap_err();
        assert!(
            matches!(
                err,
                NormalisError::Write(WriteError::AlreadyExists { .. })
            ),
            "{err:?}"
        );
        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after, "failed write must leave the file untouched");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn overwrite_replaces_existing_file() {
        let path = temp_path("clobber");
        let mesh = sample_mesh();
        write_polygon_file(&path, &mesh, WriteOptions::default()).unwrap();

        let mut modified = mesh.clone();
        modified.surfprop.ambient = 0.125;
        let options = WriteOptions {
            overwrite: true,
            ..WriteOptions::default()
        };
        write_polygon_file(&path, &modified, options).unwrap();

        let (reread, _) = read_polygons(Cursor::new(std::fs::read(&path).unwrap())).unwrap();
        assert!((reread.surfprop.ambient - 0.125).abs() < 1e-12);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unwritable_path_reports_io_error() {
        let path = temp_path("no-such-dir").join("out.obj");
        let err = write_polygon_file(&path, &sample_mesh(), WriteOptions::default()).unwrap_err();
        assert!(
            matches!(err, NormalisError::Write(WriteError::Io { .. })),
            "{err:?}"
        );
    }
}
