//! Static-shape k-d tree with tombstone removal.
//!
//! The tree is built once, balanced on the median of each axis. Removing an
//! item only marks its node dead; once dead nodes outnumber live ones the
//! tree is rebuilt from the survivors so lookups stay logarithmic.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Rebuilds are skipped below this many dead nodes.
const MIN_DEAD_FOR_REBUILD: usize = 64;

#[derive(Debug, Clone)]
struct Node<T, const K: usize> {
    key: [i64; K],
    item: T,
    left: Option<usize>,
    right: Option<usize>,
    live: bool,
}

#[derive(Debug, Clone)]
pub struct KdTree<T, const K: usize> {
    nodes: Vec<Node<T, K>>,
    root: Option<usize>,
    /// Node slot of every live item.
    slots: HashMap<T, usize>,
    dead: usize,
}

impl<T, const K: usize> Default for KdTree<T, K>
where
    T: Copy + Ord + Hash,
{
    fn default() -> Self {
        Self::build(std::iter::empty())
    }
}

impl<T, const K: usize> KdTree<T, K>
where
    T: Copy + Ord + Hash,
{
    /// Builds a balanced tree. Later duplicates of an item are ignored.
    pub fn build(entries: impl IntoIterator<Item = (T, [i64; K])>) -> Self {
        let mut seen = HashSet::new();
        let mut entries: Vec<(T, [i64; K])> = entries
            .into_iter()
            .filter(|(item, _)| seen.insert(*item))
            .collect();

        let mut nodes = Vec::with_capacity(entries.len());
        let root = build_subtree(&mut entries, 0, &mut nodes);
        let slots = nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (node.item, slot))
            .collect();

        Self {
            nodes,
            root,
            slots,
            dead: 0,
        }
    }

    /// Number of live items.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.slots.contains_key(item)
    }

    /// Live item closest to `query` by squared Euclidean distance. Equal
    /// distances resolve to the smallest item.
    pub fn nearest(&self, query: &[i64; K]) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let mut best: Option<(i128, T)> = None;
        self.search(self.root, 0, query, &mut best);
        best.map(|(_, item)| item)
    }

    /// Removes `item`. Returns false when it was not present.
    pub fn remove(&mut self, item: &T) -> bool {
        let Some(slot) = self.slots.remove(item) else {
            return false;
        };
        self.nodes[slot].live = false;
        self.dead += 1;

        if self.dead >= MIN_DEAD_FOR_REBUILD && self.dead > self.slots.len() {
            self.rebuild();
        }
        true
    }

    /// Live items in unspecified order.
    pub fn items(&self) -> impl Iterator<Item = T> + '_ {
        self.nodes.iter().filter(|node| node.live).map(|node| node.item)
    }

    fn rebuild(&mut self) {
        let survivors: Vec<(T, [i64; K])> = self
            .nodes
            .iter()
            .filter(|node| node.live)
            .map(|node| (node.item, node.key))
            .collect();
        *self = Self::build(survivors);
    }

    fn search(
        &self,
        at: Option<usize>,
        depth: usize,
        query: &[i64; K],
        best: &mut Option<(i128, T)>,
    ) {
        let Some(slot) = at else {
            return;
        };
        let node = &self.nodes[slot];

        if node.live {
            let candidate = (squared_distance(&node.key, query), node.item);
            if best.is_none_or(|current| candidate < current) {
                *best = Some(candidate);
            }
        }

        let axis = depth % K;
        let diff = i128::from(query[axis]) - i128::from(node.key[axis]);
        let (near, far) = if diff < 0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        self.search(near, depth + 1, query, best);

        // Equal-distance items on the far side may still win the tie-break.
        if best.is_none_or(|(dist, _)| diff * diff <= dist) {
            self.search(far, depth + 1, query, best);
        }
    }
}

fn build_subtree<T: Copy, const K: usize>(
    entries: &mut [(T, [i64; K])],
    depth: usize,
    nodes: &mut Vec<Node<T, K>>,
) -> Option<usize> {
    if entries.is_empty() {
        return None;
    }
    let axis = depth % K;
    let mid = entries.len() / 2;
    entries.select_nth_unstable_by_key(mid, |(_, key)| key[axis]);

    let (item, key) = entries[mid];
    let slot = nodes.len();
    nodes.push(Node {
        key,
        item,
        left: None,
        right: None,
        live: true,
    });

    let (lower, rest) = entries.split_at_mut(mid);
    let left = build_subtree(lower, depth + 1, nodes);
    let right = build_subtree(&mut rest[1..], depth + 1, nodes);
    nodes[slot].left = left;
    nodes[slot].right = right;
    Some(slot)
}

fn squared_distance<const K: usize>(a: &[i64; K], b: &[i64; K]) -> i128 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = i128::from(*x) - i128::from(*y);
            d * d
        })
        .sum()
}
