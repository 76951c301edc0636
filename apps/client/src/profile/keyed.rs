use uuid::Uuid;

/// Client-side identity of a list entry. Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKey(Uuid);

impl ItemKey {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// An ordered list whose entries keep a stable key across edits,
/// deletions and reordering.
#[derive(Debug, Clone)]
pub struct KeyedList<T> {
    items: Vec<(ItemKey, T)>,
}

impl<T> Default for KeyedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Clone> KeyedList<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            items: items.into_iter().map(|item| (ItemKey::new(), item)).collect(),
        }
    }

    pub fn push(&mut self, item: T) -> ItemKey {
        let key = ItemKey::new();
        self.items.push((key, item));
        key
    }

    /// Replaces the entry in place. Returns false when the key is gone.
    pub fn update(&mut self, key: ItemKey, item: T) -> bool {
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                slot.1 = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, key: ItemKey) -> Option<T> {
        let index = self.items.iter().position(|(k, _)| *k == key)?;
        Some(self.items.remove(index).1)
    }

    /// Key of the entry currently at `position` (0-based).
    pub fn key_at(&self, position: usize) -> Option<ItemKey> {
        self.items.get(position).map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ItemKey, &T)> {
        self.items.iter().map(|(k, item)| (*k, item))
    }

    /// The wire form: entries in order, keys dropped.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().map(|(_, item)| item.clone()).collect()
    }
}

#[cfg(test)]
impl<T: Clone> KeyedList<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, key: ItemKey) -> Option<&T> {
        self.items.iter().find(|(k, _)| *k == key).map(|(_, item)| item)
    }

    /// Moves an entry to `to` (clamped to the end). Returns false when the key is gone.
    pub fn move_to(&mut self, key: ItemKey, to: usize) -> bool {
        let Some(from) = self.items.iter().position(|(k, _)| *k == key) else {
            return false;
        };
        let entry = self.items.remove(from);
        let to = to.min(self.items.len());
        self.items.insert(to, entry);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_survive_reordering() {
        let mut list = KeyedList::from_items(vec!["a", "b", "c"]);
        let b = list.key_at(1).unwrap();

        assert!(list.move_to(b, 0));
        assert_eq!(list.to_vec(), vec!["b", "a", "c"]);

        assert!(list.update(b, "B"));
        assert_eq!(list.to_vec(), vec!["B", "a", "c"]);
    }

    #[test]
    fn test_delete_by_key_after_earlier_delete() {
        let mut list = KeyedList::from_items(vec!["a", "b", "c"]);
        let a = list.key_at(0).unwrap();
        let c = list.key_at(2).unwrap();

        assert_eq!(list.remove(a), Some("a"));
        // "c" moved to index 1 but its key still finds it
        assert_eq!(list.remove(c), Some("c"));
        assert_eq!(list.to_vec(), vec!["b"]);
    }

    #[test]
    fn test_stale_key_is_rejected() {
        let mut list = KeyedList::from_items(vec![1, 2]);
        let first = list.key_at(0).unwrap();
        list.remove(first);
        assert!(!list.update(first, 10));
        assert_eq!(list.remove(first), None);
        assert!(list.get(first).is_none());
    }

    #[test]
    fn test_push_returns_fresh_key() {
        let mut list = KeyedList::default();
        let k1 = list.push(1);
        let k2 = list.push(2);
        assert_ne!(k1, k2);
        assert_eq!(list.get(k2), Some(&2));
        assert_eq!(list.len(), 2);
    }
}
