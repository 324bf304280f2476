use indexmap::IndexMap;
use std::hash::Hash;

/// Insertion-ordered map of pending, unsaved edits.
///
/// An entry exists iff the operator changed that key since the last
/// load/save of the owning tab session. A pending value fully overrides the
/// last-known backend value for its key until the buffer is cleared. Setting
/// a key twice keeps the latest value at the key's original position, so one
/// save cycle issues at most one write per key, in first-edit order.
#[derive(Debug, Clone, Default)]
pub struct EditBuffer<K, V> {
    entries: IndexMap<K, V>,
}

impl<K, V> EditBuffer<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        EditBuffer {
            entries: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Records a pending edit. Last write wins per key.
    pub fn set(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// The pending value for `key` if dirty, else the given backend value.
    pub fn effective<'a>(&'a self, key: &K, backend_value: &'a V) -> &'a V {
        self.entries.get(key).unwrap_or(backend_value)
    }

    /// Drops one entry, keeping the order of the rest. Used by the submitter
    /// as rows are confirmed upstream.
    pub fn discard(&mut self, key: &K) -> Option<V> {
        self.entries.shift_remove(key)
    }

    /// Discards every pending edit, silently.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }

    /// Owned copy of the pending entries in insertion order.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_key_falls_back_to_backend_value() {
        let buffer: EditBuffer<String, u32> = EditBuffer::new();
        assert_eq!(*buffer.effective(&"Ventas".to_string(), &5), 5);
    }

    #[test]
    fn pending_value_overrides_backend_value() {
        let mut buffer = EditBuffer::new();
        buffer.set("Ventas".to_string(), 3u32);
        assert_eq!(*buffer.effective(&"Ventas".to_string(), &1), 3);
        assert_eq!(*buffer.effective(&"Soporte".to_string(), &2), 2);
    }

    #[test]
    fn last_write_wins_and_keeps_first_insertion_order() {
        let mut buffer = EditBuffer::new();
        buffer.set("a".to_string(), 1u32);
        buffer.set("b".to_string(), 2);
        buffer.set("a".to_string(), 9);

        assert_eq!(buffer.len(), 2);
        let keys: Vec<_> = buffer.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(buffer.get(&"a".to_string()), Some(&9));
    }

    #[test]
    fn discard_preserves_remaining_order() {
        let mut buffer = EditBuffer::new();
        buffer.set("a".to_string(), 1u32);
        buffer.set("b".to_string(), 2);
        buffer.set("c".to_string(), 3);

        assert_eq!(buffer.discard(&"a".to_string()), Some(1));
        let keys: Vec<_> = buffer.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut buffer = EditBuffer::new();
        buffer.set("a".to_string(), 1u32);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
