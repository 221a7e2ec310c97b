use crate::math::{Vector3, TOLERANCE};
use crate::mesh::PolygonMesh;
use crate::normals::{FacetNormal, IncidenceIndex};

/// Computes one smoothed unit normal per vertex.
///
/// Each vertex accumulates the area vectors of its incident facets, so a
/// facet's influence is proportional to its area and a degenerate facet
/// (zero weight) contributes nothing. The accumulated sum is normalized
/// when its magnitude reaches [`TOLERANCE`]; a vertex with no incident
/// facets, or only degenerate ones, keeps the exact zero vector.
///
/// The result is independent of facet order: accumulation is a plain sum.
///
/// `facet_normals` must hold one entry per facet of `mesh`, as produced by
/// [`crate::normals::facet_normals`].
#[must_use]
pub fn vertex_normals(mesh: &PolygonMesh, facet_normals: &[FacetNormal]) -> Vec<Vector3> {
    debug_assert_eq!(facet_normals.len(), mesh.n_facets());

    let incidence = IncidenceIndex::build(mesh);
    (0..incidence.n_vertices())
        .map(|vertex| {
            let mut accumulated = Vector3::zeros();
            for &facet in incidence.incident_facets(vertex) {
                accumulated += facet_normals[facet as usize].area_vector();
            }
            let norm = accumulated.norm();
            if norm < TOLERANCE {
                Vector3::zeros()
            } else {
                accumulated / norm
            }
        })
        .collect()
}
