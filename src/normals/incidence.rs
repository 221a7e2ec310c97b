use crate::mesh::PolygonMesh;

/// Vertex-to-facet incidence in compressed form.
///
/// Two flat arrays replace a `Vec<Vec<u32>>`: `offsets` has one entry per
/// vertex plus a terminator, and `facets` packs every vertex's incident
/// facet ids contiguously. The facets incident to vertex `v` occupy
/// `facets[offsets[v]..offsets[v + 1]]`. Built in two passes over the
/// index pool: count references per vertex, prefix-sum into offsets, then
/// fill using a cursor per vertex.
#[derive(Debug, Clone)]
pub struct IncidenceIndex {
    offsets: Vec<u32>,
    facets: Vec<u32>,
}

impl IncidenceIndex {
    /// Builds the incidence index for `mesh`.
    ///
    /// A vertex referenced more than once by the same facet lists that
    /// facet once per reference; a vertex referenced by no facet gets an
    /// empty range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn build(mesh: &PolygonMesh) -> Self {
        let n_points = mesh.n_points();

        let mut offsets = vec![0u32; n_points + 1];
        for &index in &mesh.indices {
            offsets[index as usize + 1] += 1;
        }
        for v in 0..n_points {
            offsets[v + 1] += offsets[v];
        }

        let mut cursors: Vec<u32> = offsets[..n_points].to_vec();
        let mut facets = vec![0u32; mesh.indices.len()];
        for (facet, indices) in mesh.facets().enumerate() {
            for &index in indices {
                let slot = cursors[index as usize];
                facets[slot as usize] = facet as u32;
                cursors[index as usize] += 1;
            }
        }

        Self { offsets, facets }
    }

    /// Returns the ids of the facets incident to vertex `vertex`, in
    /// facet order.
    #[must_use]
    pub fn incident_facets(&self, vertex: usize) -> &[u32] {
        let start = self.offsets[vertex] as usize;
        let end = self.offsets[vertex + 1] as usize;
        &self.facets[start..end]
    }

    /// Returns the number of vertices the index covers.
    #[must_use]
    pub fn n_vertices(&self) -> usize {
        self.offsets.len() - 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn quad_split_mesh() -> PolygonMesh {
        // Two triangles sharing the edge 0-2.
        PolygonMesh::from_facets(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(1.0, 1.0, 0.0),
                p(0.0, 1.0, 0.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3]],
        )
    }

    #[test]
    fn shared_edge_vertices_list_both_facets() {
        let index = IncidenceIndex::build(&quad_split_mesh());
        assert_eq!(index.n_vertices(), 4);
        assert_eq!(index.incident_facets(0), &[0, 1]);
        assert_eq!(index.incident_facets(1), &[0]);
        assert_eq!(index.incident_facets(2), &[0, 1]);
        assert_eq!(index.incident_facets(3), &[1]);
    }

    #[test]
    fn offsets_partition_the_reference_pool() {
        let mesh = quad_split_mesh();
        let index = IncidenceIndex::build(&mesh);
        let total: usize = (0..index.n_vertices())
            .map(|v| index.incident_facets(v).len())
            .sum();
        assert_eq!(total, mesh.indices.len());
    }

    #[test]
    fn unreferenced_vertex_has_empty_range() {
        // Vertex 3 belongs to no facet.
        let mesh = PolygonMesh::from_facets(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(5.0, 5.0, 5.0),
            ],
            &[vec![0, 1, 2]],
        );
        let index = IncidenceIndex::build(&mesh);
        assert!(index.incident_facets(3).is_empty());
        assert_eq!(index.incident_facets(0), &[0]);
    }

    #[test]
    fn repeated_reference_lists_facet_once_per_reference() {
        let mesh = PolygonMesh::from_facets(
            vec![p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)],
            &[vec![0, 1, 2, 0]],
        );
        let index = IncidenceIndex::build(&mesh);
        assert_eq!(index.incident_facets(0), &[0, 0]);
        assert_eq!(index.incident_facets(1), &[0]);
    }

    #[test]
    fn facet_ids_come_out_in_facet_order() {
        // Vertex 0 appears in facets 0, 1 and 2; the fill pass walks the
        // facets in order, so the bucket must too.
        let mesh = PolygonMesh::from_facets(
            vec![
                p(0.0, 0.0, 0.0),
                p(1.0, 0.0, 0.0),
                p(0.0, 1.0, 0.0),
                p(0.0, 0.0, 1.0),
            ],
            &[vec![0, 1, 2], vec![0, 2, 3], vec![0, 3, 1]],
        );
        let index = IncidenceIndex::build(&mesh);
        assert_eq!(index.incident_facets(0), &[0, 1, 2]);
    }
}
