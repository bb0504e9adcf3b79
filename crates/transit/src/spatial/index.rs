//! R-tree nodes for spatial indexing.
//!
//! ## Two-Stage Filtering
//!
//! Site lookups use a two-stage filtering approach:
//! 1. **R-tree filter**: a degree-space circle around a padded bounding box
//!    selects candidates
//! 2. **Haversine filter**: the exact great-circle distance decides
//!
//! The candidate region is strictly larger than the search circle, so the index never
//! drops a site the plain proximity filter would keep.

use geo::Point;
use rstar::{PointDistance, RTreeObject, AABB};

// ============================================================================
// Site Spatial Node
// ============================================================================

/// A site position in the tree, pointing back into the catalog's site list
#[derive(Clone, Debug)]
pub struct SiteNode {
    pub index: usize,
    point: [f64; 2],
}

impl SiteNode {
    pub fn new(location: Point, index: usize) -> Self {
        Self {
            index,
            point: [location.x(), location.y()],
        }
    }
}

impl RTreeObject for SiteNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SiteNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}
