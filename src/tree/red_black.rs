//! Red-black balancing.
//!
//! Invariants
//! - The root is black.
//! - A red node has no red child.
//! - Every root-to-leaf path crosses the same number of black nodes.
//!
//! Deletion never needs a sentinel: when the unlinked node is a black leaf,
//! the double-black fixup runs while that leaf is still in the tree and the
//! leaf is spliced out afterwards.

use super::node::{Arena, NodeKey};
use super::sealed::Sealed;
use super::Balance;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Red-black trees: at most two rotations per insert and three per delete.
#[derive(Copy, Clone, Debug, Default)]
pub struct RedBlack;

impl Balance for RedBlack {}

type Tree<K, V> = Arena<K, V, Color>;

#[inline]
fn is_red<K, V>(a: &Tree<K, V>, n: Option<NodeKey>) -> bool {
    n.map_or(false, |n| a.nodes[n].meta == Color::Red)
}

#[inline]
fn color<K, V>(a: &Tree<K, V>, n: NodeKey) -> Color {
    a.nodes[n].meta
}

#[inline]
fn paint<K, V>(a: &mut Tree<K, V>, n: NodeKey, c: Color) {
    a.nodes[n].meta = c;
}

fn insert_fixup<K, V>(a: &mut Tree<K, V>, mut z: NodeKey) {
    while let Some(p) = a.parent(z).filter(|&p| color(a, p) == Color::Red) {
        let g = a.parent(p).expect("a red node always has a parent");
        let parent_is_left = a.left(g) == Some(p);
        let uncle = if parent_is_left { a.right(g) } else { a.left(g) };
        if let Some(u) = uncle.filter(|&u| color(a, u) == Color::Red) {
            paint(a, p, Color::Black);
            paint(a, u, Color::Black);
            paint(a, g, Color::Red);
            z = g;
            continue;
        }
        let mut top = p;
        if parent_is_left && a.right(p) == Some(z) {
            a.rotate_left(p);
            top = z;
        } else if !parent_is_left && a.left(p) == Some(z) {
            a.rotate_right(p);
            top = z;
        }
        paint(a, top, Color::Black);
        paint(a, g, Color::Red);
        if parent_is_left {
            a.rotate_right(g);
        } else {
            a.rotate_left(g);
        }
        break;
    }
    if let Some(r) = a.root {
        paint(a, r, Color::Black);
    }
}

/// Restores black heights around `x`, a black node whose subtree is about
/// to lose one black level.
fn delete_fixup<K, V>(a: &mut Tree<K, V>, mut x: NodeKey) {
    while a.root != Some(x) && color(a, x) == Color::Black {
        let p = a.parent(x).expect("non-root node has a parent");
        if a.left(p) == Some(x) {
            let mut w = a.right(p).expect("double-black node has a sibling");
            if color(a, w) == Color::Red {
                paint(a, w, Color::Black);
                paint(a, p, Color::Red);
                a.rotate_left(p);
                w = a.right(p).expect("double-black node has a sibling");
            }
            if !is_red(a, a.left(w)) && !is_red(a, a.right(w)) {
                paint(a, w, Color::Red);
                x = p;
                continue;
            }
            if !is_red(a, a.right(w)) {
                if let Some(wl) = a.left(w) {
                    paint(a, wl, Color::Black);
                }
                paint(a, w, Color::Red);
                a.rotate_right(w);
                w = a.right(p).expect("double-black node has a sibling");
            }
            paint(a, w, color(a, p));
            paint(a, p, Color::Black);
            if let Some(wr) = a.right(w) {
                paint(a, wr, Color::Black);
            }
            a.rotate_left(p);
        } else {
            let mut w = a.left(p).expect("double-black node has a sibling");
            if color(a, w) == Color::Red {
                paint(a, w, Color::Black);
                paint(a, p, Color::Red);
                a.rotate_right(p);
                w = a.left(p).expect("double-black node has a sibling");
            }
            if !is_red(a, a.left(w)) && !is_red(a, a.right(w)) {
                paint(a, w, Color::Red);
                x = p;
                continue;
            }
            if !is_red(a, a.left(w)) {
                if let Some(wr) = a.right(w) {
                    paint(a, wr, Color::Black);
                }
                paint(a, w, Color::Red);
                a.rotate_left(w);
                w = a.left(p).expect("double-black node has a sibling");
            }
            paint(a, w, color(a, p));
            paint(a, p, Color::Black);
            if let Some(wl) = a.left(w) {
                paint(a, wl, Color::Black);
            }
            a.rotate_right(p);
        }
        break;
    }
    paint(a, x, Color::Black);
}

impl Sealed for RedBlack {
    type Meta = Color;

    fn leaf() -> Color {
        Color::Red
    }

    fn after_insert<K, V>(arena: &mut Tree<K, V>, node: NodeKey) {
        insert_fixup(arena, node);
    }

    fn remove<K, V>(arena: &mut Tree<K, V>, node: NodeKey) -> (K, V) {
        let victim = arena.prepare_removal(node);
        if color(arena, victim) == Color::Black {
            match arena.left(victim).or(arena.right(victim)) {
                // A black node with a single child: the child is red.
                Some(child) => paint(arena, child, Color::Black),
                None => delete_fixup(arena, victim),
            }
        }
        let (key, value, _) = arena.splice(victim);
        (key, value)
    }

    #[cfg(test)]
    fn assert_balanced<K, V>(arena: &Tree<K, V>) {
        fn black_height<K, V>(a: &Tree<K, V>, n: Option<NodeKey>) -> usize {
            let Some(n) = n else { return 1 };
            let (l, r) = (a.left(n), a.right(n));
            if color(a, n) == Color::Red {
                assert!(!is_red(a, l) && !is_red(a, r), "red node with red child");
            }
            let lh = black_height(a, l);
            let rh = black_height(a, r);
            assert_eq!(lh, rh, "unequal black height");
            lh + usize::from(color(a, n) == Color::Black)
        }
        if let Some(r) = arena.root {
            assert_eq!(color(arena, r), Color::Black, "root must be black");
        }
        black_height(arena, arena.root);
    }
}
