//! AVL balancing: every node stores its subtree height (leaf = 1) and
//! sibling heights differ by at most one.

use super::node::{Arena, NodeKey};
use super::sealed::Sealed;
use super::Balance;

/// Height-balanced trees: shallower than red-black, more rotations on update.
#[derive(Copy, Clone, Debug, Default)]
pub struct Avl;

impl Balance for Avl {}

#[inline]
fn height<K, V>(a: &Arena<K, V, u8>, n: Option<NodeKey>) -> u8 {
    n.map_or(0, |n| a.nodes[n].meta)
}

fn update<K, V>(a: &mut Arena<K, V, u8>, n: NodeKey) {
    let h = 1 + height(a, a.left(n)).max(height(a, a.right(n)));
    a.nodes[n].meta = h;
}

fn balance_factor<K, V>(a: &Arena<K, V, u8>, n: NodeKey) -> i16 {
    i16::from(height(a, a.left(n))) - i16::from(height(a, a.right(n)))
}

fn rotate_left<K, V>(a: &mut Arena<K, V, u8>, x: NodeKey) -> NodeKey {
    let y = a.rotate_left(x);
    update(a, x);
    update(a, y);
    y
}

fn rotate_right<K, V>(a: &mut Arena<K, V, u8>, x: NodeKey) -> NodeKey {
    let y = a.rotate_right(x);
    update(a, x);
    update(a, y);
    y
}

/// Fixes a balance factor of +-2 at `n` with a single or double rotation.
/// Returns the root of the rebalanced subtree.
fn rebalance<K, V>(a: &mut Arena<K, V, u8>, n: NodeKey) -> NodeKey {
    let bf = balance_factor(a, n);
    if bf > 1 {
        if let Some(l) = a.left(n).filter(|&l| balance_factor(a, l) < 0) {
            rotate_left(a, l);
        }
        return rotate_right(a, n);
    }
    if bf < -1 {
        if let Some(r) = a.right(n).filter(|&r| balance_factor(a, r) > 0) {
            rotate_right(a, r);
        }
        return rotate_left(a, n);
    }
    n
}

/// Walks from `from` to the root refreshing heights and rotating where needed.
fn retrace<K, V>(a: &mut Arena<K, V, u8>, from: Option<NodeKey>) {
    let mut cur = from;
    while let Some(n) = cur {
        update(a, n);
        let top = rebalance(a, n);
        cur = a.parent(top);
    }
}

impl Sealed for Avl {
    type Meta = u8;

    fn leaf() -> u8 {
        1
    }

    fn after_insert<K, V>(arena: &mut Arena<K, V, u8>, node: NodeKey) {
        let parent = arena.parent(node);
        retrace(arena, parent);
    }

    fn remove<K, V>(arena: &mut Arena<K, V, u8>, node: NodeKey) -> (K, V) {
        let victim = arena.prepare_removal(node);
        let (key, value, parent) = arena.splice(victim);
        retrace(arena, parent);
        (key, value)
    }

    #[cfg(test)]
    fn assert_balanced<K, V>(arena: &Arena<K, V, u8>) {
        fn check<K, V>(a: &Arena<K, V, u8>, n: Option<NodeKey>) -> u8 {
            let Some(n) = n else { return 0 };
            let lh = check(a, a.left(n));
            let rh = check(a, a.right(n));
            assert!(lh.abs_diff(rh) <= 1, "AVL balance violated");
            assert_eq!(a.nodes[n].meta, 1 + lh.max(rh), "stale AVL height");
            1 + lh.max(rh)
        }
        check(arena, arena.root);
    }
}
