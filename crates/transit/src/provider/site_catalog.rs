//! In-memory site catalog with a spatial index.
//!
//! The catalog is loaded wholesale from the upstream and replaced wholesale
//! on refresh; it is never patched in place.

use std::collections::HashMap;
use std::sync::Arc;

use geo::Point;
use rstar::RTree;

use crate::models::{site::Site, traits::Located, types::Coordinates};
use crate::spatial::index::SiteNode;
use crate::spatial::proximity::is_within;
use crate::spatial::queries::bounding_box;

/// Immutable set of known sites with lookup and proximity queries.
///
/// This type is cheap to clone since all data is stored in `Arc`s.
#[derive(Clone)]
pub struct SiteCatalog {
    sites: Arc<[Site]>,
    site_map: Arc<HashMap<u32, usize>>,

    // Sites with in-range coordinates live in the tree; finite but
    // out-of-range coordinates are checked by scanning.
    site_tree: Arc<RTree<SiteNode>>,
    unindexed: Arc<[usize]>,
}

impl SiteCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::from_sites(Vec::new())
    }

    /// Build a catalog from a freshly fetched site list
    pub fn from_sites(sites: Vec<Site>) -> Self {
        let site_map: HashMap<_, _> = sites
            .iter()
            .enumerate()
            .map(|(index, site)| (site.id, index))
            .collect();

        let mut nodes = Vec::new();
        let mut unindexed = Vec::new();
        for (index, site) in sites.iter().enumerate() {
            match site.coordinates() {
                Some(at) if at.is_valid() => nodes.push(SiteNode::new(Point::from(at), index)),
                Some(_) => unindexed.push(index),
                None => {}
            }
        }

        Self {
            sites: sites.into(),
            site_map: Arc::new(site_map),
            site_tree: Arc::new(RTree::bulk_load(nodes)),
            unindexed: unindexed.into(),
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Site> {
        self.site_map.get(&id).map(|&index| &self.sites[index])
    }

    /// Sites within `radius_m` meters of `position`, in catalog order.
    ///
    /// Same result as [`crate::spatial::sites_within`] over [`Self::sites`].
    pub fn sites_near(&self, position: Coordinates, radius_m: f64) -> Vec<&Site> {
        let Some((min, max)) = bounding_box(position, radius_m) else {
            return crate::spatial::sites_within(position, &self.sites, radius_m);
        };

        // Circle around the box center reaching its corners
        let center = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];
        let half = [(max[0] - min[0]) / 2.0, (max[1] - min[1]) / 2.0];
        let max_squared_radius = half[0] * half[0] + half[1] * half[1];

        let mut hits: Vec<usize> = self
            .site_tree
            .locate_within_distance(center, max_squared_radius)
            .map(|node| node.index)
            .chain(self.unindexed.iter().copied())
            .filter(|&index| is_within(position, &self.sites[index], radius_m))
            .collect();
        hits.sort_unstable();

        hits.into_iter().map(|index| &self.sites[index]).collect()
    }
}

impl Default for SiteCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SiteCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteCatalog")
            .field("sites", &self.sites.len())
            .field("indexed", &self.site_tree.size())
            .finish()
    }
}
