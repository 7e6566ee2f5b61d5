// Copyright 2025 the Sinuous Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounding volume tree: construction, pairwise traversal and nearest-candidate selection.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use core::fmt;
use core::ops::ControlFlow;

use crate::types::BoundingBox;

/// Two colliding leaves, as (leaf of the receiver tree, leaf of the argument tree).
pub type LeafPair = (Arc<BoundingBox>, Arc<BoundingBox>);

// Outcome of visiting a leaf pair: stop early, keep going, or fail.
type Flow<E> = Result<ControlFlow<()>, E>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Node {
    // Leaves hold the caller's box itself; internal nodes a synthesized union tagged (0, 0).
    bbox: Arc<BoundingBox>,
    children: Vec<NodeIdx>,
}

impl Node {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Axis-aligned bounding box tree over shared leaf boxes.
///
/// The tree is immutable between calls to [`build`](Self::build) and [`clear`](Self::clear),
/// and every query takes `&self`, so a built tree can be queried from several threads at once.
/// Rebuilding needs `&mut self`, which rules out concurrent queries on the same instance.
///
/// Queries on an empty tree are no-ops: no collision, no pairs, no candidates, and an
/// infinite distance bound.
#[derive(Clone, Default)]
pub struct AabbTree {
    root: Option<NodeIdx>,
    arena: Vec<Node>,
}

impl AabbTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tree over `boxes`. See [`build`](Self::build).
    pub fn from_boxes(boxes: &[Arc<BoundingBox>]) -> Self {
        let mut tree = Self::new();
        tree.build(boxes);
        tree
    }

    /// Drop all nodes, leaving an empty tree.
    pub fn clear(&mut self) {
        self.root = None;
        self.arena.clear();
    }

    /// True if the tree holds no boxes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of leaves (indexed boxes).
    pub fn len(&self) -> usize {
        self.arena.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of levels; zero for an empty tree, one for a single leaf.
    pub fn depth(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut deepest = 0;
        let mut stack = vec![(root, 1_usize)];
        while let Some((i, level)) = stack.pop() {
            deepest = deepest.max(level);
            for &c in &self.arena[i.get()].children {
                stack.push((c, level + 1));
            }
        }
        deepest
    }

    /// Bounding box of the whole tree, `None` when empty.
    ///
    /// For a single-box tree this is the caller's box itself, tags included.
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.root.map(|r| &*self.arena[r.get()].bbox)
    }

    /// Iterate over the leaf boxes in construction order.
    pub fn leaves(&self) -> impl Iterator<Item = &Arc<BoundingBox>> + '_ {
        self.arena.iter().filter(|n| n.is_leaf()).map(|n| &n.bbox)
    }

    /// Rebuild the tree over `boxes`, discarding any previous content.
    ///
    /// Each node splits its boxes at the midpoint of its longer side, classifying a box by
    /// the midpoint of its own extent on that axis. When every box lands on one side, the
    /// second half (in input order) is moved to the other, so each level strictly shrinks.
    /// Leaves keep the input `Arc`s; no box is copied.
    pub fn build(&mut self, boxes: &[Arc<BoundingBox>]) {
        self.clear();
        // n leaves in a binary tree give at most 2n - 1 nodes
        self.arena.reserve((2 * boxes.len()).saturating_sub(1));
        self.root = self.build_node(boxes.to_vec());
        tracing::trace!(
            boxes = boxes.len(),
            nodes = self.arena.len(),
            depth = self.depth(),
            "built aabb tree"
        );
    }

    fn build_node(&mut self, mut boxes: Vec<Arc<BoundingBox>>) -> Option<NodeIdx> {
        if boxes.len() <= 1 {
            let leaf = boxes.pop()?;
            return Some(self.push(leaf, Vec::new()));
        }

        let bbox = BoundingBox::from_boxes(boxes.iter().map(|b| &**b), 0, 0);
        let (mut neg, mut pos) = split_boxes(&bbox, boxes);
        if neg.is_empty() {
            let mid = pos.len() / 2;
            neg = pos.split_off(mid);
        } else if pos.is_empty() {
            let mid = neg.len() / 2;
            pos = neg.split_off(mid);
        }

        let mut children = Vec::with_capacity(2);
        for part in [neg, pos] {
            if let Some(child) = self.build_node(part) {
                children.push(child);
            }
        }
        Some(self.push(Arc::new(bbox), children))
    }

    fn push(&mut self, bbox: Arc<BoundingBox>, children: Vec<NodeIdx>) -> NodeIdx {
        let idx = NodeIdx::new(self.arena.len());
        self.arena.push(Node { bbox, children });
        idx
    }

    fn node(&self, idx: NodeIdx) -> &Node {
        &self.arena[idx.get()]
    }

    /// Whether any pair of overlapping leaves, one from each tree, satisfies `pred`.
    ///
    /// `pred` receives the leaf of `self` first and the leaf of `other` second, and is
    /// typically an exact test between the primitives ranked by their `ipos`.
    /// The traversal stops at the first accepted pair.
    pub fn collision<F>(&self, other: &Self, mut pred: F) -> bool
    where
        F: FnMut(&BoundingBox, &BoundingBox) -> bool,
    {
        match self.try_collision(other, |a, b| Ok::<_, Infallible>(pred(a, b))) {
            Ok(hit) => hit,
            Err(never) => match never {},
        }
    }

    /// Like [`collision`](Self::collision) with a fallible predicate.
    ///
    /// The first error returned by `pred` aborts the traversal and is returned as is.
    pub fn try_collision<E, F>(&self, other: &Self, mut pred: F) -> Result<bool, E>
    where
        F: FnMut(&BoundingBox, &BoundingBox) -> Result<bool, E>,
    {
        let (Some(a), Some(b)) = (self.root, other.root) else {
            return Ok(false);
        };
        let mut visit = |x: &Arc<BoundingBox>, y: &Arc<BoundingBox>| -> Flow<E> {
            Ok(if pred(x, y)? {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        };
        let flow = visit_pairs(self, a, other, b, false, &mut visit)?;
        Ok(flow.is_break())
    }

    /// Every pair of overlapping leaves, one from each tree.
    ///
    /// Pairs are oriented (leaf of `self`, leaf of `other`) and listed in traversal order.
    /// Each pair appears once.
    pub fn intersect(&self, other: &Self) -> Vec<LeafPair> {
        self.intersect_with(other, |_, _| true)
    }

    /// Every pair of overlapping leaves that also satisfies `pred`.
    pub fn intersect_with<F>(&self, other: &Self, mut pred: F) -> Vec<LeafPair>
    where
        F: FnMut(&BoundingBox, &BoundingBox) -> bool,
    {
        match self.try_intersect_with(other, |a, b| Ok::<_, Infallible>(pred(a, b))) {
            Ok(pairs) => pairs,
            Err(never) => match never {},
        }
    }

    /// Like [`intersect_with`](Self::intersect_with) with a fallible predicate.
    ///
    /// The first error returned by `pred` aborts the traversal; no partial list is returned.
    pub fn try_intersect_with<E, F>(&self, other: &Self, mut pred: F) -> Result<Vec<LeafPair>, E>
    where
        F: FnMut(&BoundingBox, &BoundingBox) -> Result<bool, E>,
    {
        let mut out = Vec::new();
        let (Some(a), Some(b)) = (self.root, other.root) else {
            return Ok(out);
        };
        let mut visit = |x: &Arc<BoundingBox>, y: &Arc<BoundingBox>| -> Flow<E> {
            if pred(x, y)? {
                out.push((Arc::clone(x), Arc::clone(y)));
            }
            Ok(ControlFlow::Continue(()))
        };
        visit_pairs(self, a, other, b, false, &mut visit)?;
        Ok(out)
    }

    /// Smallest farthest-corner distance from the point over all leaves.
    ///
    /// Every leaf encloses a primitive no farther than its farthest corner, so this bounds
    /// the distance to the nearest primitive from above. Subtrees whose box is already
    /// farther than the running bound are skipped. Infinite for an empty tree.
    pub fn bound_distance(&self, x: f64, y: f64) -> f64 {
        let mut bound = f64::INFINITY;
        let Some(root) = self.root else {
            return bound;
        };
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let n = self.node(i);
            if n.is_leaf() {
                bound = bound.min(n.bbox.max_distance(x, y));
            } else if n.bbox.distance(x, y) <= bound {
                stack.extend(n.children.iter().rev());
            }
        }
        bound
    }

    /// Leaves whose box lies within `bound` of the point.
    pub fn select_within(&self, x: f64, y: f64, bound: f64) -> Vec<Arc<BoundingBox>> {
        let mut out = Vec::new();
        let Some(root) = self.root else {
            return out;
        };
        let mut stack = vec![root];
        while let Some(i) = stack.pop() {
            let n = self.node(i);
            if n.bbox.distance(x, y) > bound {
                continue;
            }
            if n.is_leaf() {
                out.push(Arc::clone(&n.bbox));
            } else {
                stack.extend(n.children.iter().rev());
            }
        }
        out
    }

    /// Leaves that may hold the primitive nearest to the point.
    ///
    /// The nearest primitive is always enclosed by one of the returned boxes, but more than
    /// one box may be returned; telling them apart with the real geometry is up to the caller.
    pub fn min_distance(&self, x: f64, y: f64) -> Vec<Arc<BoundingBox>> {
        let bound = self.bound_distance(x, y);
        let candidates = self.select_within(x, y, bound);
        tracing::trace!(x, y, bound, candidates = candidates.len(), "nearest candidates");
        candidates
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, idx: NodeIdx, level: usize) -> fmt::Result {
        let n = self.node(idx);
        writeln!(
            f,
            "{:indent$}BBOX xmin={:<12.4} ymin={:<12.4} xmax={:<12.4} ymax={:<12.4}",
            "",
            n.bbox.min_x,
            n.bbox.min_y,
            n.bbox.max_x,
            n.bbox.max_y,
            indent = 2 * level
        )?;
        for &c in &n.children {
            self.fmt_node(f, c, level + 1)?;
        }
        Ok(())
    }
}

/// Split `boxes` at the midpoint of the longer side of `bbox` into (low, high) halves.
fn split_boxes(
    bbox: &BoundingBox,
    boxes: Vec<Arc<BoundingBox>>,
) -> (Vec<Arc<BoundingBox>>, Vec<Arc<BoundingBox>>) {
    let split_y = bbox.height() >= bbox.width();
    let cut = if split_y {
        0.5 * (bbox.min_y + bbox.max_y)
    } else {
        0.5 * (bbox.min_x + bbox.max_x)
    };
    boxes.into_iter().partition(|b| {
        let mid = if split_y {
            0.5 * (b.min_y + b.max_y)
        } else {
            0.5 * (b.min_x + b.max_x)
        };
        mid <= cut
    })
}

/// Walk every pair of colliding subtrees of `a` and `b`, handing leaf pairs to `visit`.
///
/// `swap` records whether `a` and `b` have traded places relative to the caller, so that
/// `visit` always sees the caller's first tree first.
fn visit_pairs<E, V>(
    a: &AabbTree,
    ai: NodeIdx,
    b: &AabbTree,
    bi: NodeIdx,
    swap: bool,
    visit: &mut V,
) -> Flow<E>
where
    V: FnMut(&Arc<BoundingBox>, &Arc<BoundingBox>) -> Flow<E>,
{
    let na = a.node(ai);
    let nb = b.node(bi);
    if !nb.bbox.collision(&na.bbox) {
        return Ok(ControlFlow::Continue(()));
    }
    match (na.is_leaf(), nb.is_leaf()) {
        (true, true) => {
            if swap {
                visit(&nb.bbox, &na.bbox)
            } else {
                visit(&na.bbox, &nb.bbox)
            }
        }
        (false, true) => {
            for &c in &na.children {
                if visit_pairs(b, bi, a, c, !swap, visit)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            Ok(ControlFlow::Continue(()))
        }
        (true, false) => {
            for &c in &nb.children {
                if visit_pairs(a, ai, b, c, swap, visit)?.is_break() {
                    return Ok(ControlFlow::Break(()));
                }
            }
            Ok(ControlFlow::Continue(()))
        }
        (false, false) => {
            for &ca in &na.children {
                for &cb in &nb.children {
                    if visit_pairs(a, ca, b, cb, swap, visit)?.is_break() {
                        return Ok(ControlFlow::Break(()));
                    }
                }
            }
            Ok(ControlFlow::Continue(()))
        }
    }
}

impl fmt::Display for AabbTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            None => writeln!(f, "[EMPTY AABB tree]"),
            Some(root) => self.fmt_node(f, root, 0),
        }
    }
}

impl fmt::Debug for AabbTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AabbTree")
            .field("arena_nodes", &self.arena.len())
            .field("leaves", &self.len())
            .field("depth", &self.depth())
            .field("bbox", &self.bbox())
            .finish_non_exhaustive()
    }
}
