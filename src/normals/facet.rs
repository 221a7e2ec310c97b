use crate::math::{Vector3, TOLERANCE};
use crate::mesh::PolygonMesh;

/// Unit normal of one facet, together with its accumulation weight.
///
/// The weight is the magnitude of the accumulated cross-product sum before
/// normalization (twice the facet area), which is what vertex-normal
/// smoothing uses to let larger facets dominate. A degenerate facet
/// carries the exact zero vector and zero weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacetNormal {
    pub normal: Vector3,
    pub weight: f64,
}

impl FacetNormal {
    /// Returns `true` if the facet had no measurable area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.weight == 0.0
    }

    /// Returns the normal scaled back to its pre-normalization magnitude,
    /// i.e. the facet's area vector (2 × area long).
    #[must_use]
    pub fn area_vector(&self) -> Vector3 {
        self.normal * self.weight
    }
}

/// Computes the outward unit normal of facet `facet`.
///
/// Anchors at the facet's first vertex and accumulates the cross products
/// of consecutive edge pairs around the loop (Newell's method). For a
/// triangle the sum reduces to `(p1 − p0) × (p2 − p0)`; for larger facets
/// it tolerates mild non-planarity and collinear leading vertices, which a
/// single fixed vertex triple would not.
///
/// If the accumulated magnitude falls below [`TOLERANCE`] (collinear or
/// coincident vertices) the result is the exact zero vector with zero
/// weight. Degeneracy is data, not a failure: callers keep processing the
/// remaining facets.
#[must_use]
pub fn facet_normal(mesh: &PolygonMesh, facet: usize) -> FacetNormal {
    let indices = mesh.facet(facet);
    let n = indices.len();
    let origin = &mesh.points[indices[0] as usize];

    let mut accumulated = Vector3::zeros();
    for i in 1..n {
        let a = mesh.points[indices[i] as usize] - origin;
        let b = mesh.points[indices[(i + 1) % n] as usize] - origin;
        accumulated += a.cross(&b);
    }

    let weight = accumulated.norm();
    if weight < TOLERANCE {
        FacetNormal {
            normal: Vector3::zeros(),
            weight: 0.0,
        }
    } else {
        FacetNormal {
            normal: accumulated / weight,
            weight,
        }
    }
}

/// Computes the unit normal of every facet, in facet order.
///
/// Facets are independent of each other; a degenerate facet yields a zero
/// entry and never disturbs its neighbours.
#[must_use]
pub fn facet_normals(mesh: &PolygonMesh) -> Vec<FacetNormal> {
    (0..mesh.n_facets()).map(|f| facet_normal(mesh, f)).collect()
}
