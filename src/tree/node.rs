//! Node storage and structural surgery shared by both balancing schemes.
//!
//! Nodes live in a `SlotMap`; child and parent links are `NodeKey`s. The
//! rotations and splices here only rewire links. Balancing metadata is the
//! caller's to maintain.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct NodeKey;
}

#[derive(Clone, Debug)]
pub struct Node<K, V, M> {
    pub key: K,
    pub value: V,
    pub left: Option<NodeKey>,
    pub right: Option<NodeKey>,
    pub parent: Option<NodeKey>,
    pub meta: M,
}

#[derive(Clone, Debug)]
pub struct Arena<K, V, M> {
    pub nodes: SlotMap<NodeKey, Node<K, V, M>>,
    pub root: Option<NodeKey>,
}

impl<K, V, M> Arena<K, V, M> {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
        }
    }

    #[inline]
    pub fn left(&self, n: NodeKey) -> Option<NodeKey> {
        self.nodes[n].left
    }

    #[inline]
    pub fn right(&self, n: NodeKey) -> Option<NodeKey> {
        self.nodes[n].right
    }

    #[inline]
    pub fn parent(&self, n: NodeKey) -> Option<NodeKey> {
        self.nodes[n].parent
    }

    pub fn min_from(&self, mut n: NodeKey) -> NodeKey {
        while let Some(l) = self.left(n) {
            n = l;
        }
        n
    }

    pub fn max_from(&self, mut n: NodeKey) -> NodeKey {
        while let Some(r) = self.right(n) {
            n = r;
        }
        n
    }

    pub fn first(&self) -> Option<NodeKey> {
        self.root.map(|r| self.min_from(r))
    }

    pub fn last(&self) -> Option<NodeKey> {
        self.root.map(|r| self.max_from(r))
    }

    pub fn successor(&self, n: NodeKey) -> Option<NodeKey> {
        if let Some(r) = self.right(n) {
            return Some(self.min_from(r));
        }
        let mut child = n;
        let mut up = self.parent(n);
        while let Some(p) = up {
            if self.left(p) == Some(child) {
                return Some(p);
            }
            child = p;
            up = self.parent(p);
        }
        None
    }

    pub fn predecessor(&self, n: NodeKey) -> Option<NodeKey> {
        if let Some(l) = self.left(n) {
            return Some(self.max_from(l));
        }
        let mut child = n;
        let mut up = self.parent(n);
        while let Some(p) = up {
            if self.right(p) == Some(child) {
                return Some(p);
            }
            child = p;
            up = self.parent(p);
        }
        None
    }

    /// Points `parent`'s link to `old` (or the root) at `new`.
    pub fn replace_child(&mut self, parent: Option<NodeKey>, old: NodeKey, new: Option<NodeKey>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let node = &mut self.nodes[p];
                if node.left == Some(old) {
                    node.left = new;
                } else {
                    node.right = new;
                }
            }
        }
    }

    /// Rotates `x` down to the left; its right child takes its place.
    /// Returns the new subtree root.
    pub fn rotate_left(&mut self, x: NodeKey) -> NodeKey {
        let y = self.nodes[x]
            .right
            .expect("rotate_left requires a right child");
        let inner = self.nodes[y].left;
        self.nodes[x].right = inner;
        if let Some(c) = inner {
            self.nodes[c].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
        y
    }

    /// Mirror of `rotate_left`.
    pub fn rotate_right(&mut self, x: NodeKey) -> NodeKey {
        let y = self.nodes[x]
            .left
            .expect("rotate_right requires a left child");
        let inner = self.nodes[y].right;
        self.nodes[x].left = inner;
        if let Some(c) = inner {
            self.nodes[c].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
        y
    }

    /// If `n` has two children, exchanges its entry with its in-order
    /// successor and returns the successor, which has no left child.
    /// Otherwise returns `n`. Either way the returned node has at most one
    /// child and holds the entry being deleted.
    pub fn prepare_removal(&mut self, n: NodeKey) -> NodeKey {
        let (Some(_), Some(r)) = (self.left(n), self.right(n)) else {
            return n;
        };
        let s = self.min_from(r);
        if let Some([a, b]) = self.nodes.get_disjoint_mut([n, s]) {
            core::mem::swap(&mut a.key, &mut b.key);
            core::mem::swap(&mut a.value, &mut b.value);
        }
        s
    }

    /// Unlinks `n` (at most one child), lifting its child into its place,
    /// and frees it. Returns the entry and the former parent.
    pub fn splice(&mut self, n: NodeKey) -> (K, V, Option<NodeKey>) {
        let node = &self.nodes[n];
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        let parent = node.parent;
        self.replace_child(parent, n, child);
        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        let node = self
            .nodes
            .remove(n)
            .expect("spliced node must exist in the arena");
        (node.key, node.value, parent)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(a: &mut Arena<u32, (), ()>, key: u32, parent: Option<NodeKey>) -> NodeKey {
        a.nodes.insert(Node {
            key,
            value: (),
            left: None,
            right: None,
            parent,
            meta: (),
        })
    }

    fn keys_in_order(a: &Arena<u32, (), ()>) -> Vec<u32> {
        let mut out = Vec::new();
        let mut cur = a.first();
        while let Some(n) = cur {
            out.push(a.nodes[n].key);
            cur = a.successor(n);
        }
        out
    }

    /// Invariant: rotations keep the in-order sequence and parent links.
    #[test]
    fn rotations_preserve_order() {
        let mut a = Arena::new();
        let root = leaf(&mut a, 2, None);
        a.root = Some(root);
        let l = leaf(&mut a, 1, Some(root));
        let r = leaf(&mut a, 4, Some(root));
        a.nodes[root].left = Some(l);
        a.nodes[root].right = Some(r);
        let rl = leaf(&mut a, 3, Some(r));
        a.nodes[r].left = Some(rl);

        let top = a.rotate_left(root);
        assert_eq!(top, r);
        assert_eq!(a.root, Some(r));
        assert_eq!(a.parent(root), Some(r));
        assert_eq!(a.right(root), Some(rl));
        assert_eq!(a.parent(rl), Some(root));
        assert_eq!(keys_in_order(&a), vec![1, 2, 3, 4]);

        a.rotate_right(r);
        assert_eq!(a.root, Some(root));
        assert_eq!(keys_in_order(&a), vec![1, 2, 3, 4]);
        assert_eq!(a.predecessor(rl), Some(root));
        assert_eq!(a.successor(r), None);
    }

    #[test]
    fn removal_swaps_with_successor_then_splices() {
        let mut a = Arena::new();
        let root = leaf(&mut a, 2, None);
        a.root = Some(root);
        let l = leaf(&mut a, 1, Some(root));
        let r = leaf(&mut a, 3, Some(root));
        a.nodes[root].left = Some(l);
        a.nodes[root].right = Some(r);

        let victim = a.prepare_removal(root);
        assert_eq!(victim, r);
        assert_eq!(a.nodes[root].key, 3);
        let (k, _, parent) = a.splice(victim);
        assert_eq!((k, parent), (2, Some(root)));
        assert_eq!(keys_in_order(&a), vec![1, 3]);
        assert_eq!(a.nodes.len(), 2);
    }
}
