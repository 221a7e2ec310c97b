use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::error::Result;
use crate::format::{read_polygon_file, write_polygon_file, Encoding, WriteOptions};
use crate::normals::{facet_normals, vertex_normals};

/// Command line options for `recompute-normals`.
#[derive(Parser)]
#[command(name = "recompute-normals")]
#[command(version, about = "Recompute the vertex normals of a polygon mesh file")]
pub struct Options {
    /// Polygon mesh file to read.
    pub input: PathBuf,

    /// Destination for the mesh with recomputed normals.
    pub output: PathBuf,

    /// Replace the destination file if it already exists.
    #[arg(short, long)]
    pub clobber: bool,

    /// Log progress information to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Reads the input mesh, recomputes its vertex normals, and writes the
/// result to the output path.
///
/// The output is always text encoded, whatever the input encoding was.
///
/// # Errors
///
/// Returns the first failure of the pipeline: the input cannot be opened,
/// decoded, or does not hold exactly one structurally sound polygon
/// object, or the output cannot be written. Degenerate facets are not
/// failures; they are skipped and reported as a warning.
pub fn run(options: &Options) -> Result<()> {
    let start = std::time::Instant::now();
    info!("Reading {}...", options.input.display());
    let (mut mesh, _) = read_polygon_file(&options.input)?;
    info!("{} points, {} facets", mesh.n_points(), mesh.n_facets());

    let per_facet = facet_normals(&mesh);
    let degenerate = per_facet.iter().filter(|f| f.is_degenerate()).count();
    if degenerate > 0 {
        warn!(
            "{degenerate} of {} facets have no area and were skipped",
            per_facet.len()
        );
    }
    mesh.set_vertex_normals(vertex_normals(&mesh, &per_facet));

    let write_options = WriteOptions {
        encoding: Encoding::Ascii,
        overwrite: options.clobber,
    };
    write_polygon_file(&options.output, &mesh, write_options)?;
    info!("Wrote {} in {:?}.", options.output.display(), start.elapsed());
    Ok(())
}
