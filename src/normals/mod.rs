mod facet;
mod incidence;
mod vertex;

pub use facet::{facet_normal, facet_normals, FacetNormal};
pub use incidence::IncidenceIndex;
pub use vertex::vertex_normals;
