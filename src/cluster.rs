use std::cmp::Ordering;
use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::centroid::Centroid;
use crate::item::Item;

/// Items grouped under the centroid they are nearest to.
///
/// A centroid without items is not a key. Iteration follows centroid
/// ordering, which is what the cluster scorer relies on for a stable
/// traversal.
#[derive(Clone, Debug, Default)]
pub struct ClusterMap {
    clusters: BTreeMap<Centroid, Vec<Item>>,
}

impl ClusterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, centroid: Centroid, item: Item) {
        self.clusters.entry(centroid).or_default().push(item);
    }

    pub fn get(&self, centroid: &Centroid) -> Option<&[Item]> {
        self.clusters.get(centroid).map(Vec::as_slice)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, Centroid, Vec<Item>> {
        self.clusters.iter()
    }

    pub fn centroids(&self) -> impl Iterator<Item = &Centroid> {
        self.clusters.keys()
    }

    /// Number of non-empty clusters.
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }
}

impl<'a> IntoIterator for &'a ClusterMap {
    type Item = (&'a Centroid, &'a Vec<Item>);
    type IntoIter = btree_map::Iter<'a, Centroid, Vec<Item>>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

impl FromIterator<(Centroid, Item)> for ClusterMap {
    fn from_iter<T: IntoIterator<Item = (Centroid, Item)>>(iter: T) -> Self {
        let mut map = ClusterMap::new();
        for (centroid, item) in iter {
            map.assign(centroid, item);
        }
        map
    }
}

/// Same centroids with the same members, regardless of member order.
impl PartialEq for ClusterMap {
    fn eq(&self, other: &Self) -> bool {
        self.clusters.len() == other.clusters.len()
            && self.clusters.iter().all(|(centroid, members)| {
                other
                    .clusters
                    .get(centroid)
                    .is_some_and(|theirs| same_members(members, theirs))
            })
    }
}

fn same_members(a: &[Item], b: &[Item]) -> bool {
    a.len() == b.len() && sorted(a) == sorted(b)
}

fn sorted(items: &[Item]) -> Vec<&Item> {
    let mut refs: Vec<&Item> = items.iter().collect();
    refs.sort_by(|x, y| x.partial_cmp(y).unwrap_or(Ordering::Equal));
    refs
}
