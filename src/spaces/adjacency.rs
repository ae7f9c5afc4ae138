//! Neighbor detection for TFA surfaces.
//!
//! Two surfaces are neighbors when their footprints share a boundary.
//! Pairwise results feed a disjoint-set structure, so the transitive
//! closure is complete after a single pass over all pairs regardless of
//! input ordering. A surface touching nothing keeps a neighbor set of
//! just itself.

use crate::geom::relations::polygons_share_boundary;
use crate::id::Id;
use crate::spaces::tfa::TfaSurface;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Disjoint-set (union-find) over indexes 0..n with path compression.
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut cursor = i;
        while self.parent[cursor] != root {
            let next = self.parent[cursor];
            self.parent[cursor] = root;
            cursor = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let ri = self.find(i);
        let rj = self.find(j);
        if ri == rj {
            return;
        }
        if self.rank[ri] < self.rank[rj] {
            self.parent[ri] = rj;
        } else if self.rank[ri] > self.rank[rj] {
            self.parent[rj] = ri;
        } else {
            self.parent[rj] = ri;
            self.rank[ri] += 1;
        }
    }
}

/// Fills in the neighbor set of every surface.
///
/// A missing footprint counts as "not touching" for all of that surface's
/// pairs; the failure is logged, never fatal.
pub fn find_neighbors(surfaces: &mut [TfaSurface]) {
    let n = surfaces.len();
    let mut sets = DisjointSet::new(n);

    for i in 0..n {
        for j in (i + 1)..n {
            match (surfaces[i].footprint(), surfaces[j].footprint()) {
                (Some(a), Some(b)) => {
                    if polygons_share_boundary(a, b) {
                        sets.union(i, j);
                    }
                }
                _ => {
                    log::warn!(
                        "cannot intersect surfaces {} and {} (missing footprint); \
                         treating as not touching",
                        surfaces[i].id(),
                        surfaces[j].id()
                    );
                }
            }
        }
    }

    let mut members: HashMap<usize, BTreeSet<Id>> = HashMap::new();
    for i in 0..n {
        members
            .entry(sets.find(i))
            .or_default()
            .insert(surfaces[i].id());
    }
    for i in 0..n {
        let set = members[&sets.find(i)].clone();
        surfaces[i].set_neighbors(set);
    }
}

/// Partitions surfaces into their neighbor equivalence classes.
///
/// Groups come out ordered by their smallest member id; members keep
/// their input order.
pub fn bin_by_neighbors(surfaces: Vec<TfaSurface>) -> Vec<Vec<TfaSurface>> {
    let mut groups: BTreeMap<Id, Vec<TfaSurface>> = BTreeMap::new();
    for surface in surfaces {
        // Neighbor sets are reflexive, so first() always exists
        let key = *surface.neighbors().iter().next().expect("reflexive set");
        groups.entry(key).or_default().push(surface);
    }
    groups.into_values().collect()
}
