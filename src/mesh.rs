use crate::error::StructureError;
use crate::math::{Point3, Vector3};

/// Phong lighting coefficients carried in a polygon object header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceProperties {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
    pub transparency: f64,
}

impl Default for SurfaceProperties {
    /// The `0.3 0.3 0.4 10 1` header that bicpl-era tools emit.
    fn default() -> Self {
        Self {
            ambient: 0.3,
            diffuse: 0.3,
            specular: 0.4,
            shininess: 10.0,
            transparency: 1.0,
        }
    }
}

/// An RGBA colour as stored in the file. Components are nominally in
/// `[0, 1]`; the format does not enforce the range and neither do we.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Colour {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Creates a colour from its four components.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }
}

/// Colour assignment for a polygon object, mirroring the format's colour
/// flag: `0` single, `1` per facet, `2` per vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum ColourTable {
    Single(Colour),
    PerFacet(Vec<Colour>),
    PerVertex(Vec<Colour>),
}

impl Default for ColourTable {
    fn default() -> Self {
        Self::Single(Colour::WHITE)
    }
}

/// A polygonal surface: vertex positions with per-vertex normals, and
/// facets stored as runs in a flat index pool.
///
/// Facet `i` covers `indices[start..end_indices[i]]` where `start` is
/// `end_indices[i - 1]` (0 for the first facet). Facet winding defines the
/// outward side by the right-hand rule; winding consistency across the mesh
/// is assumed, not verified.
#[derive(Debug, Clone, Default)]
pub struct PolygonMesh {
    pub surfprop: SurfaceProperties,
    /// Vertex positions; a vertex's identity is its index.
    pub points: Vec<Point3>,
    /// Per-vertex normals, parallel to `points`.
    pub normals: Vec<Vector3>,
    pub colours: ColourTable,
    /// Cumulative index counts, one per facet.
    pub end_indices: Vec<u32>,
    /// Flat pool of vertex indices referenced by `end_indices`.
    pub indices: Vec<u32>,
}

impl PolygonMesh {
    /// Builds a mesh from per-facet index lists, with default surface
    /// properties, a single white colour, and zeroed vertex normals.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_facets(points: Vec<Point3>, facets: &[Vec<u32>]) -> Self {
        let mut end_indices = Vec::with_capacity(facets.len());
        let mut indices = Vec::new();
        for facet in facets {
            indices.extend_from_slice(facet);
            end_indices.push(indices.len() as u32);
        }
        let normals = vec![Vector3::zeros(); points.len()];
        Self {
            surfprop: SurfaceProperties::default(),
            points,
            normals,
            colours: ColourTable::default(),
            end_indices,
            indices,
        }
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn n_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the number of facets.
    #[must_use]
    pub fn n_facets(&self) -> usize {
        self.end_indices.len()
    }

    /// Returns the ordered vertex indices of facet `i`.
    ///
    /// Requires `i < n_facets()` and a mesh that passed [`validate`]
    /// (or was produced by the reader, which validates).
    ///
    /// [`validate`]: PolygonMesh::validate
    #[must_use]
    pub fn facet(&self, i: usize) -> &[u32] {
        let start = if i == 0 {
            0
        } else {
            self.end_indices[i - 1] as usize
        };
        let end = self.end_indices[i] as usize;
        &self.indices[start..end]
    }

    /// Iterates over all facets in order.
    pub fn facets(&self) -> impl Iterator<Item = &[u32]> + '_ {
        (0..self.n_facets()).map(move |i| self.facet(i))
    }

    /// Replaces the per-vertex normals with a freshly computed array.
    ///
    /// The array must be parallel to `points`; this is the merge step that
    /// carries recomputed normals back into the mesh before writing.
    pub fn set_vertex_normals(&mut self, normals: Vec<Vector3>) {
        debug_assert_eq!(normals.len(), self.points.len());
        self.normals = normals;
    }

    /// Checks the structural invariants the rest of the crate relies on:
    /// parallel attribute arrays, strictly increasing end indices that
    /// cover the whole index pool, at least 3 vertices per facet, and
    /// every index in bounds.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a [`StructureError`].
    pub fn validate(&self) -> Result<(), StructureError> {
        if self.normals.len() != self.points.len() {
            return Err(StructureError::NormalCountMismatch {
                n_points: self.points.len(),
                n_normals: self.normals.len(),
            });
        }

        match &self.colours {
            ColourTable::Single(_) => {}
            ColourTable::PerFacet(colours) => {
                if colours.len() != self.n_facets() {
                    return Err(StructureError::ColourCountMismatch {
                        per: "per-facet",
                        expected: self.n_facets(),
                        actual: colours.len(),
                    });
                }
            }
            ColourTable::PerVertex(colours) => {
                if colours.len() != self.n_points() {
                    return Err(StructureError::ColourCountMismatch {
                        per: "per-vertex",
                        expected: self.n_points(),
                        actual: colours.len(),
                    });
                }
            }
        }

        let mut start = 0u32;
        for (facet, &end) in self.end_indices.iter().enumerate() {
            if end < start {
                return Err(StructureError::InvalidEndIndices { facet, prev: start, end });
            }
            let len = (end - start) as usize;
            if len < 3 {
                return Err(StructureError::FacetTooSmall { facet, len });
            }
            start = end;
        }
        if start as usize != self.indices.len() {
            return Err(StructureError::IndexPoolMismatch {
                end: start,
                pool: self.indices.len(),
            });
        }

        for (facet, indices) in self.facets().enumerate() {
            for &index in indices {
                if index as usize >= self.points.len() {
                    return Err(StructureError::IndexOutOfBounds {
                        facet,
                        index,
                        n_points: self.points.len(),
                    });
                }
            }
        }

        Ok(())
    }
}
