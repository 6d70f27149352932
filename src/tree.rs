//! RbTree: the red-black tree engine behind the sorted collections.
//!
//! Nodes live in a generational arena; child and parent links are
//! `Option<NodeId>`, so the parent back-reference is just another id and
//! ownership stays with the arena. The engine never compares keys on its
//! own: descents take a probe closure (how the target compares against a
//! node's key) and insertion takes the comparator, which keeps `Borrow`-style
//! lookups and custom comparators out of this file.
//!
//! A node keeps its id for as long as its entry lives. Deleting a node with
//! two children swaps it structurally with its in-order successor instead of
//! copying the successor's payload up, so cursors parked on the successor
//! stay valid.
//!
//! The rebalancing follows the classic CLR formulation: `None` children are
//! black leaves, and the `*_of` helpers accept `None` so the fix-up loops can
//! be written without special cases.

use core::cmp::Ordering;
use core::mem;

use slotmap::SlotMap;

use crate::traits::Direction;

slotmap::new_key_type! {
    /// Stable identity of a tree node.
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    color: Color,
}

/// Outcome of [`RbTree::insert`].
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Placed<V> {
    Fresh(NodeId),
    Replaced(NodeId, V),
}

#[derive(Debug, Clone)]
pub(crate) struct RbTree<K, V> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    root: Option<NodeId>,
    mod_count: u64,
}

impl<K, V> Default for RbTree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RbTree<K, V> {
    pub(crate) fn new() -> Self {
        RbTree {
            nodes: SlotMap::with_key(),
            root: None,
            mod_count: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn mod_count(&self) -> u64 {
        self.mod_count
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> Option<&Node<K, V>> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.mod_count += 1;
    }

    // ---- navigation ----

    fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(l) = self.nodes[id].left {
            id = l;
        }
        id
    }

    fn rightmost(&self, mut id: NodeId) -> NodeId {
        while let Some(r) = self.nodes[id].right {
            id = r;
        }
        id
    }

    pub(crate) fn first(&self) -> Option<NodeId> {
        self.root.map(|r| self.leftmost(r))
    }

    pub(crate) fn last(&self) -> Option<NodeId> {
        self.root.map(|r| self.rightmost(r))
    }

    pub(crate) fn end(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Forward => self.first(),
            Direction::Backward => self.last(),
        }
    }

    pub(crate) fn successor(&self, id: NodeId) -> Option<NodeId> {
        let n = self.nodes.get(id)?;
        if let Some(r) = n.right {
            return Some(self.leftmost(r));
        }
        let mut child = id;
        let mut up = n.parent;
        while let Some(p) = up {
            if self.nodes[p].right != Some(child) {
                break;
            }
            child = p;
            up = self.nodes[p].parent;
        }
        up
    }

    pub(crate) fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        let n = self.nodes.get(id)?;
        if let Some(l) = n.left {
            return Some(self.rightmost(l));
        }
        let mut child = id;
        let mut up = n.parent;
        while let Some(p) = up {
            if self.nodes[p].left != Some(child) {
                break;
            }
            child = p;
            up = self.nodes[p].parent;
        }
        up
    }

    pub(crate) fn step(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Forward => self.successor(id),
            Direction::Backward => self.predecessor(id),
        }
    }

    // ---- searches ----
    //
    // `probe(key)` answers how the target compares against `key`.

    pub(crate) fn search(&self, mut probe: impl FnMut(&K) -> Ordering) -> Option<NodeId> {
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = &self.nodes[id];
            cur = match probe(&n.key) {
                Ordering::Less => n.left,
                Ordering::Greater => n.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Least node `>= target`.
    pub(crate) fn ceiling(&self, probe: impl FnMut(&K) -> Ordering) -> Option<NodeId> {
        self.bound(probe, true, true)
    }

    /// Least node `> target`.
    pub(crate) fn higher(&self, probe: impl FnMut(&K) -> Ordering) -> Option<NodeId> {
        self.bound(probe, true, false)
    }

    /// Greatest node `<= target`.
    pub(crate) fn floor(&self, probe: impl FnMut(&K) -> Ordering) -> Option<NodeId> {
        self.bound(probe, false, true)
    }

    /// Greatest node `< target`.
    pub(crate) fn lower(&self, probe: impl FnMut(&K) -> Ordering) -> Option<NodeId> {
        self.bound(probe, false, false)
    }

    fn bound(
        &self,
        mut probe: impl FnMut(&K) -> Ordering,
        above: bool,
        inclusive: bool,
    ) -> Option<NodeId> {
        let mut best = None;
        let mut cur = self.root;
        while let Some(id) = cur {
            let n = &self.nodes[id];
            let ord = probe(&n.key);
            if ord == Ordering::Equal && inclusive {
                return Some(id);
            }
            // Candidates lie on the side of the target we are looking for.
            let candidate = if above {
                ord == Ordering::Less
            } else {
                ord == Ordering::Greater
            };
            if candidate {
                best = Some(id);
            }
            cur = match (ord, above) {
                (Ordering::Less, _) => n.left,
                (Ordering::Greater, _) => n.right,
                (Ordering::Equal, true) => n.right,
                (Ordering::Equal, false) => n.left,
            };
        }
        best
    }

    // ---- color and link helpers; `None` is a black leaf ----

    #[inline]
    fn color_of(&self, x: Option<NodeId>) -> Color {
        x.map_or(Color::Black, |id| self.nodes[id].color)
    }

    #[inline]
    fn set_color(&mut self, x: Option<NodeId>, c: Color) {
        if let Some(id) = x {
            self.nodes[id].color = c;
        }
    }

    #[inline]
    fn parent_of(&self, x: Option<NodeId>) -> Option<NodeId> {
        x.and_then(|id| self.nodes[id].parent)
    }

    #[inline]
    fn left_of(&self, x: Option<NodeId>) -> Option<NodeId> {
        x.and_then(|id| self.nodes[id].left)
    }

    #[inline]
    fn right_of(&self, x: Option<NodeId>) -> Option<NodeId> {
        x.and_then(|id| self.nodes[id].right)
    }

    /// Points `parent`'s link that held `old` at `new`, or the root if
    /// `parent` is `None`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let pn = &mut self.nodes[p];
                if pn.left == Some(old) {
                    pn.left = new;
                } else {
                    pn.right = new;
                }
            }
        }
    }

    fn rotate_left(&mut self, p: Option<NodeId>) {
        let Some(p) = p else { return };
        let Some(r) = self.nodes[p].right else { return };
        let rl = self.nodes[r].left;
        self.nodes[p].right = rl;
        if let Some(rl) = rl {
            self.nodes[rl].parent = Some(p);
        }
        let pp = self.nodes[p].parent;
        self.nodes[r].parent = pp;
        self.replace_child(pp, p, Some(r));
        self.nodes[r].left = Some(p);
        self.nodes[p].parent = Some(r);
    }

    fn rotate_right(&mut self, p: Option<NodeId>) {
        let Some(p) = p else { return };
        let Some(l) = self.nodes[p].left else { return };
        let lr = self.nodes[l].right;
        self.nodes[p].left = lr;
        if let Some(lr) = lr {
            self.nodes[lr].parent = Some(p);
        }
        let pp = self.nodes[p].parent;
        self.nodes[l].parent = pp;
        self.replace_child(pp, p, Some(l));
        self.nodes[l].right = Some(p);
        self.nodes[p].parent = Some(l);
    }

    // ---- insertion ----

    fn alloc(&mut self, key: K, value: V, parent: Option<NodeId>, color: Color) -> NodeId {
        self.nodes.insert(Node {
            key,
            value,
            left: None,
            right: None,
            parent,
            color,
        })
    }

    /// Inserts or overwrites. `cmp(a, b)` is the collection's comparator.
    pub(crate) fn insert(
        &mut self,
        key: K,
        value: V,
        mut cmp: impl FnMut(&K, &K) -> Ordering,
    ) -> Placed<V> {
        let Some(mut cur) = self.root else {
            let id = self.alloc(key, value, None, Color::Black);
            self.root = Some(id);
            self.mod_count += 1;
            return Placed::Fresh(id);
        };
        let go_left = loop {
            let n = &mut self.nodes[cur];
            match cmp(&key, &n.key) {
                Ordering::Less => match n.left {
                    Some(l) => cur = l,
                    None => break true,
                },
                Ordering::Greater => match n.right {
                    Some(r) => cur = r,
                    None => break false,
                },
                Ordering::Equal => {
                    let old = mem::replace(&mut n.value, value);
                    return Placed::Replaced(cur, old);
                }
            }
        };
        let id = self.alloc(key, value, Some(cur), Color::Red);
        if go_left {
            self.nodes[cur].left = Some(id);
        } else {
            self.nodes[cur].right = Some(id);
        }
        self.fix_after_insertion(id);
        self.mod_count += 1;
        Placed::Fresh(id)
    }

    fn fix_after_insertion(&mut self, x: NodeId) {
        let mut x = Some(x);
        while x.is_some() && x != self.root && self.color_of(self.parent_of(x)) == Color::Red {
            let parent = self.parent_of(x);
            let grand = self.parent_of(parent);
            if parent == self.left_of(grand) {
                let uncle = self.right_of(grand);
                if self.color_of(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    x = grand;
                } else {
                    if x == self.right_of(parent) {
                        x = parent;
                        self.rotate_left(x);
                    }
                    let parent = self.parent_of(x);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    self.rotate_right(grand);
                }
            } else {
                let uncle = self.left_of(grand);
                if self.color_of(uncle) == Color::Red {
                    self.set_color(parent, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(grand, Color::Red);
                    x = grand;
                } else {
                    if x == self.left_of(parent) {
                        x = parent;
                        self.rotate_right(x);
                    }
                    let parent = self.parent_of(x);
                    let grand = self.parent_of(parent);
                    self.set_color(parent, Color::Black);
                    self.set_color(grand, Color::Red);
                    self.rotate_left(grand);
                }
            }
        }
        self.set_color(self.root, Color::Black);
    }

    // ---- deletion ----

    /// Moves `p` (two children) into the position of its successor `s` and
    /// `s` into `p`'s, exchanging colors, so the tree shape and coloring are
    /// unchanged and `p` is left with at most a right child.
    fn swap_with_successor(&mut self, p: NodeId, s: NodeId) {
        let Node {
            parent: pp,
            left: pl,
            right: pr,
            color: pc,
            ..
        } = self.nodes[p];
        let Node {
            parent: sp,
            right: sr,
            color: sc,
            ..
        } = self.nodes[s];

        self.nodes[s].parent = pp;
        self.replace_child(pp, p, Some(s));
        self.nodes[s].left = pl;
        if let Some(l) = pl {
            self.nodes[l].parent = Some(s);
        }

        if pr == Some(s) {
            self.nodes[s].right = Some(p);
            self.nodes[p].parent = Some(s);
        } else {
            self.nodes[s].right = pr;
            if let Some(r) = pr {
                self.nodes[r].parent = Some(s);
            }
            if let Some(sp) = sp {
                self.nodes[sp].left = Some(p);
            }
            self.nodes[p].parent = sp;
        }

        self.nodes[p].left = None;
        self.nodes[p].right = sr;
        if let Some(r) = sr {
            self.nodes[r].parent = Some(p);
        }
        self.nodes[s].color = pc;
        self.nodes[p].color = sc;
    }

    /// Unlinks and frees `p`. A stale id is a no-op.
    pub(crate) fn remove_id(&mut self, p: NodeId) -> Option<(K, V)> {
        let n = self.nodes.get(p)?;
        if let (Some(_), Some(r)) = (n.left, n.right) {
            let s = self.leftmost(r);
            self.swap_with_successor(p, s);
        }

        let n = &self.nodes[p];
        let (parent, color) = (n.parent, n.color);
        let replacement = n.left.or(n.right);
        if let Some(rep) = replacement {
            self.nodes[rep].parent = parent;
            self.replace_child(parent, p, Some(rep));
            if color == Color::Black {
                self.fix_after_deletion(rep);
            }
        } else if parent.is_none() {
            self.root = None;
        } else {
            // Leaf: rebalance with it still in place, then cut it loose.
            if color == Color::Black {
                self.fix_after_deletion(p);
            }
            let parent = self.nodes[p].parent;
            if let Some(pp) = parent {
                let pn = &mut self.nodes[pp];
                if pn.left == Some(p) {
                    pn.left = None;
                } else if pn.right == Some(p) {
                    pn.right = None;
                }
            }
        }

        let node = self.nodes.remove(p)?;
        self.mod_count += 1;
        Some((node.key, node.value))
    }

    fn fix_after_deletion(&mut self, x: NodeId) {
        let mut x = Some(x);
        while x != self.root && self.color_of(x) == Color::Black {
            let parent = self.parent_of(x);
            if x == self.left_of(parent) {
                let mut sib = self.right_of(parent);
                if self.color_of(sib) == Color::Red {
                    self.set_color(sib, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_left(parent);
                    sib = self.right_of(self.parent_of(x));
                }
                if self.color_of(self.left_of(sib)) == Color::Black
                    && self.color_of(self.right_of(sib)) == Color::Black
                {
                    self.set_color(sib, Color::Red);
                    x = self.parent_of(x);
                } else {
                    if self.color_of(self.right_of(sib)) == Color::Black {
                        self.set_color(self.left_of(sib), Color::Black);
                        self.set_color(sib, Color::Red);
                        self.rotate_right(sib);
                        sib = self.right_of(self.parent_of(x));
                    }
                    let parent = self.parent_of(x);
                    self.set_color(sib, self.color_of(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.right_of(sib), Color::Black);
                    self.rotate_left(parent);
                    x = self.root;
                }
            } else {
                let mut sib = self.left_of(parent);
                if self.color_of(sib) == Color::Red {
                    self.set_color(sib, Color::Black);
                    self.set_color(parent, Color::Red);
                    self.rotate_right(parent);
                    sib = self.left_of(self.parent_of(x));
                }
                if self.color_of(self.right_of(sib)) == Color::Black
                    && self.color_of(self.left_of(sib)) == Color::Black
                {
                    self.set_color(sib, Color::Red);
                    x = self.parent_of(x);
                } else {
                    if self.color_of(self.left_of(sib)) == Color::Black {
                        self.set_color(self.right_of(sib), Color::Black);
                        self.set_color(sib, Color::Red);
                        self.rotate_left(sib);
                        sib = self.left_of(self.parent_of(x));
                    }
                    let parent = self.parent_of(x);
                    self.set_color(sib, self.color_of(parent));
                    self.set_color(parent, Color::Black);
                    self.set_color(self.left_of(sib), Color::Black);
                    self.rotate_right(parent);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }

    // ---- bulk ----

    /// In-order ids, first to last.
    pub(crate) fn ordered_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(self.len());
        let mut cur = self.first();
        while let Some(id) = cur {
            ids.push(id);
            cur = self.successor(id);
        }
        ids
    }

    pub(crate) fn iter_mut_ids(&mut self) -> impl Iterator<Item = (NodeId, &K, &mut V)> {
        self.nodes
            .iter_mut()
            .map(|(id, n)| (id, &n.key, &mut n.value))
    }

    /// Consumes the tree in key order without rebalancing on the way out.
    pub(crate) fn into_entries(self) -> IntoEntries<K, V> {
        let ids = self.ordered_ids();
        IntoEntries {
            nodes: self.nodes,
            ids: ids.into_iter(),
        }
    }

    /// Builds a balanced tree from entries already in strictly increasing
    /// order, in O(n). Only the deepest, possibly incomplete level is red.
    pub(crate) fn from_sorted(entries: Vec<(K, V)>) -> Self {
        let mut tree = RbTree::new();
        let len = entries.len();
        if len == 0 {
            return tree;
        }
        let red_level = (usize::BITS - 1 - (len + 1).leading_zeros()) as usize;
        let mut it = entries.into_iter();
        tree.root = tree.build(&mut it, 0, 0, len - 1, red_level, None);
        tree
    }

    fn build(
        &mut self,
        it: &mut std::vec::IntoIter<(K, V)>,
        level: usize,
        lo: usize,
        hi: usize,
        red_level: usize,
        parent: Option<NodeId>,
    ) -> Option<NodeId> {
        let mid = lo + (hi - lo) / 2;
        // The node is allocated after its left subtree so keys come off the
        // iterator in order; its parent link is patched in by the caller.
        let left = if mid > lo {
            self.build(it, level + 1, lo, mid - 1, red_level, None)
        } else {
            None
        };
        let (key, value) = it.next()?;
        let color = if level == red_level {
            Color::Red
        } else {
            Color::Black
        };
        let id = self.alloc(key, value, parent, color);
        self.nodes[id].left = left;
        if let Some(l) = left {
            self.nodes[l].parent = Some(id);
        }
        if mid < hi {
            let right = self.build(it, level + 1, mid + 1, hi, red_level, Some(id));
            self.nodes[id].right = right;
        }
        Some(id)
    }

    /// Panics unless every red-black and ordering invariant holds.
    #[cfg(test)]
    pub(crate) fn assert_invariants(&self, mut cmp: impl FnMut(&K, &K) -> Ordering) {
        assert_eq!(self.color_of(self.root), Color::Black, "root must be black");
        if let Some(r) = self.root {
            assert_eq!(self.nodes[r].parent, None, "root has a parent");
        }
        fn black_height<K, V>(t: &RbTree<K, V>, x: Option<NodeId>) -> usize {
            let Some(id) = x else { return 1 };
            let n = &t.nodes[id];
            for c in [n.left, n.right].into_iter().flatten() {
                assert_eq!(t.nodes[c].parent, Some(id), "child/parent link mismatch");
                if n.color == Color::Red {
                    assert_eq!(t.nodes[c].color, Color::Black, "red node with red child");
                }
            }
            let l = black_height(t, n.left);
            let r = black_height(t, n.right);
            assert_eq!(l, r, "unequal black height");
            l + usize::from(n.color == Color::Black)
        }
        black_height(self, self.root);
        let mut count = 0;
        let mut prev: Option<NodeId> = None;
        let mut cur = self.first();
        while let Some(id) = cur {
            if let Some(p) = prev {
                assert_eq!(
                    cmp(&self.nodes[p].key, &self.nodes[id].key),
                    Ordering::Less,
                    "in-order walk is not strictly increasing"
                );
            }
            count += 1;
            prev = Some(id);
            cur = self.successor(id);
        }
        assert_eq!(count, self.len(), "in-order walk misses nodes");
    }
}

pub(crate) struct IntoEntries<K, V> {
    nodes: SlotMap<NodeId, Node<K, V>>,
    ids: std::vec::IntoIter<NodeId>,
}

impl<K, V> Iterator for IntoEntries<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        let id = self.ids.next()?;
        self.nodes.remove(id).map(|n| (n.key, n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoEntries<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        let id = self.ids.next_back()?;
        self.nodes.remove(id).map(|n| (n.key, n.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_of(keys: impl IntoIterator<Item = i32>) -> RbTree<i32, i32> {
        let mut t = RbTree::new();
        for k in keys {
            t.insert(k, k * 10, |a, b| a.cmp(b));
        }
        t
    }

    fn keys(t: &RbTree<i32, i32>) -> Vec<i32> {
        let mut out = Vec::new();
        let mut cur = t.first();
        while let Some(id) = cur {
            out.push(t.nodes[id].key);
            cur = t.successor(id);
        }
        out
    }

    fn key_at(t: &RbTree<i32, i32>, id: Option<NodeId>) -> Option<i32> {
        id.map(|id| t.nodes[id].key)
    }

    #[test]
    fn ascending_inserts_stay_balanced() {
        let t = tree_of(0..200);
        t.assert_invariants(|a, b| a.cmp(b));
        assert_eq!(keys(&t), (0..200).collect::<Vec<_>>());
    }

    #[test]
    fn overwrite_is_not_structural() {
        let mut t = tree_of([1, 2, 3]);
        let mc = t.mod_count();
        assert!(matches!(t.insert(2, 0, |a, b| a.cmp(b)), Placed::Replaced(_, 20)));
        assert_eq!(t.mod_count(), mc);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn navigation_bounds() {
        let t = tree_of([10, 20, 30]);
        let probe = |x: i32| move |k: &i32| x.cmp(k);
        assert_eq!(key_at(&t, t.ceiling(probe(20))), Some(20));
        assert_eq!(key_at(&t, t.ceiling(probe(21))), Some(30));
        assert_eq!(key_at(&t, t.higher(probe(20))), Some(30));
        assert_eq!(key_at(&t, t.floor(probe(20))), Some(20));
        assert_eq!(key_at(&t, t.floor(probe(19))), Some(10));
        assert_eq!(key_at(&t, t.lower(probe(20))), Some(10));
        assert_eq!(key_at(&t, t.lower(probe(10))), None);
        assert_eq!(key_at(&t, t.higher(probe(30))), None);
        assert_eq!(key_at(&t, t.ceiling(probe(31))), None);
        assert_eq!(key_at(&t, t.floor(probe(5))), None);
        assert_eq!(key_at(&t, t.search(probe(30))), Some(30));
        assert_eq!(key_at(&t, t.search(probe(31))), None);
    }

    /// Invariant: removing a two-child node keeps the successor's id alive
    /// and pointing at the successor's own entry.
    #[test]
    fn two_child_removal_keeps_successor_id() {
        let mut t = tree_of(0..31);
        let root = t.root.unwrap();
        let root_key = t.nodes[root].key;
        let succ = t.successor(root).unwrap();
        let succ_key = t.nodes[succ].key;
        assert_eq!(t.remove_id(root), Some((root_key, root_key * 10)));
        assert_eq!(t.node(succ).map(|n| n.key), Some(succ_key));
        assert!(t.node(root).is_none());
        t.assert_invariants(|a, b| a.cmp(b));
    }

    #[test]
    fn remove_everything_in_mixed_order() {
        let mut t = tree_of((0..100).map(|i| (i * 37) % 100));
        for k in (0..100).map(|i| (i * 53) % 100) {
            let id = t.search(|x| k.cmp(x)).expect("present");
            assert_eq!(t.remove_id(id), Some((k, k * 10)));
            t.assert_invariants(|a, b| a.cmp(b));
        }
        assert_eq!(t.len(), 0);
        assert!(t.first().is_none());
    }

    #[test]
    fn predecessor_walk_mirrors_successor() {
        let t = tree_of([5, 1, 9, 3, 7]);
        let mut back = Vec::new();
        let mut cur = t.last();
        while let Some(id) = cur {
            back.push(t.nodes[id].key);
            cur = t.predecessor(id);
        }
        assert_eq!(back, [9, 7, 5, 3, 1]);
    }

    #[test]
    fn from_sorted_builds_valid_tree() {
        for n in 0..40 {
            let t: RbTree<i32, i32> = RbTree::from_sorted((0..n).map(|k| (k, k)).collect());
            assert_eq!(t.len(), n as usize);
            t.assert_invariants(|a, b| a.cmp(b));
        }
    }
}
