//! Recycling cursor for throughput-sensitive iteration.
//!
//! `FastCursor` copies each entry into a single `CursorEntry` that is
//! overwritten on every `advance`. The borrow returned by `advance` ends at
//! the next call, so the aliasing trade-off of a shared mutable entry is
//! checked by the compiler instead of documented away. Values cloned out of
//! the entry are snapshots of the step they were taken at.

/// The reused record exposed by `FastCursor::advance`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorEntry<K, V> {
    key: K,
    value: V,
}

impl<K, V> CursorEntry<K, V> {
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }
}

/// Cursor over any borrowing entry iterator that recycles one entry record.
pub struct FastCursor<K, V, I> {
    inner: I,
    entry: Option<CursorEntry<K, V>>,
}

impl<'a, K, V, I> FastCursor<K, V, I>
where
    K: Clone + 'a,
    V: Clone + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    pub fn new(inner: I) -> Self {
        Self { inner, entry: None }
    }

    /// Moves to the next entry, overwriting the shared record in place.
    pub fn advance(&mut self) -> Option<&CursorEntry<K, V>> {
        let (k, v) = self.inner.next()?;
        if let Some(e) = &mut self.entry {
            e.key.clone_from(k);
            e.value.clone_from(v);
        } else {
            self.entry = Some(CursorEntry {
                key: k.clone(),
                value: v.clone(),
            });
        }
        self.entry.as_ref()
    }

    /// The record written by the last `advance`, if any.
    pub fn current(&self) -> Option<&CursorEntry<K, V>> {
        self.entry.as_ref()
    }

    pub fn for_each<F>(mut self, mut f: F)
    where
        F: FnMut(&CursorEntry<K, V>),
    {
        while let Some(e) = self.advance() {
            f(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: the cursor reuses one record and overwrites it per step.
    #[test]
    fn cursor_overwrites_single_record() {
        let data = [(1u32, 10u64), (2, 20), (3, 30)];
        let mut cur = FastCursor::new(data.iter().map(|(k, v)| (k, v)));
        assert!(cur.current().is_none());

        let first = cur.advance().map(|e| (*e.key(), *e.value()));
        assert_eq!(first, Some((1, 10)));
        let addr = cur.current().map(|e| e as *const _);

        let second = cur.advance().map(|e| (*e.key(), *e.value()));
        assert_eq!(second, Some((2, 20)));
        assert_eq!(cur.current().map(|e| e as *const _), addr);

        assert_eq!(cur.advance().map(|e| *e.key()), Some(3));
        assert!(cur.advance().is_none());
        // The last record stays readable after exhaustion.
        assert_eq!(cur.current().map(|e| *e.value()), Some(30));
    }

    #[test]
    fn for_each_visits_every_entry() {
        let data = vec![("a".to_string(), 1), ("b".to_string(), 2)];
        let mut seen = Vec::new();
        FastCursor::new(data.iter().map(|(k, v)| (k, v)))
            .for_each(|e| seen.push(format!("{}={}", e.key(), e.value())));
        assert_eq!(seen, vec!["a=1", "b=2"]);
    }
}
