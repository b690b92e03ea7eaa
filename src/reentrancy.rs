//! Debug-only shard re-entry detection.
//!
//! The concurrent engine runs user callbacks while holding a shard's write
//! lock. A callback that touches the same shard again would deadlock on the
//! non-reentrant lock. In debug builds every thread records the addresses of
//! the shard locks it currently holds for a callback, and entering one of
//! them a second time panics with a message instead of hanging. In release
//! builds the guard is a zero-sized no-op.

use core::marker::PhantomData;

#[cfg(debug_assertions)]
use std::cell::RefCell;

#[cfg(debug_assertions)]
thread_local! {
    static HELD: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks the lock at `addr` as held by the current thread until the guard
/// drops.
///
/// # Panics
/// In debug builds, panics if the current thread already holds `addr`.
#[inline]
pub(crate) fn enter(addr: usize) -> ReentrancyGuard {
    #[cfg(debug_assertions)]
    {
        let nested = HELD.with(|held| {
            let mut held = held.borrow_mut();
            let nested = held.contains(&addr);
            if !nested {
                held.push(addr);
            }
            nested
        });
        assert!(
            !nested,
            "reentrancy detected: callback re-entered the shard it runs under"
        );
        ReentrancyGuard {
            addr,
            _nosend: PhantomData,
        }
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = addr;
        ReentrancyGuard {
            _nosend: PhantomData,
        }
    }
}

/// Whether the current thread holds `addr` for a callback. Always false in
/// release builds.
#[inline]
pub(crate) fn is_held(addr: usize) -> bool {
    #[cfg(debug_assertions)]
    {
        HELD.with(|held| held.borrow().contains(&addr))
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = addr;
        false
    }
}

/// RAII guard returned by `enter`. Bound to the thread that created it.
pub(crate) struct ReentrancyGuard {
    #[cfg(debug_assertions)]
    addr: usize,
    _nosend: PhantomData<*mut ()>,
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if let Some(i) = held.iter().rposition(|&a| a == self.addr) {
                held.swap_remove(i);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_exit_is_ok() {
        let g = enter(1);
        drop(g);
        let _g = enter(1);
        let _other = enter(2);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_entry_panics_in_debug() {
        let res = std::panic::catch_unwind(|| {
            let _g1 = enter(7);
            let _g2 = enter(7);
        });
        assert!(res.is_err(), "expected reentrancy to panic in debug builds");
        // The unwound guard released its address.
        assert!(!is_held(7));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn addresses_are_per_thread() {
        let _g = enter(9);
        assert!(is_held(9));
        let other = std::thread::spawn(|| {
            let _g = enter(9);
            is_held(9)
        })
        .join()
        .unwrap();
        assert!(other);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nested_entry_is_noop_in_release() {
        let _g1 = enter(3);
        let _g2 = enter(3);
        assert!(!is_held(3));
    }
}
