//! Insertion-ordered entity collections with tombstoned deletion.

use crate::dispatch::names_match;

pub trait Named {
    fn name(&self) -> &str;
    fn number(&self) -> i32 {
        0
    }
}

/// Entities are never removed. `#CLEARALL` raises `disabled_count`
/// instead, hiding everything below it from lookups while outstanding
/// references stay valid.
#[derive(Debug, Clone)]
pub struct Container<T> {
    items: Vec<T>,
    disabled_count: usize,
}

impl<T> Default for Container<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            disabled_count: 0,
        }
    }
}

impl<T: Named> Container<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn disabled_count(&self) -> usize {
        self.disabled_count
    }

    pub fn push(&mut self, item: T) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.items.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.items.get_mut(idx)
    }

    /// Replace the record at `idx`.
    pub fn set(&mut self, idx: usize, item: T) {
        if let Some(slot) = self.items.get_mut(idx) {
            *slot = item;
        }
    }

    /// First active entry named `name`, searching from `start`.
    pub fn find_first(&self, name: &str, start: usize) -> Option<usize> {
        (start.max(self.disabled_count)..self.items.len())
            .find(|&i| names_match(self.items[i].name(), name))
    }

    /// Last active entry named `name`.
    pub fn find_last(&self, name: &str) -> Option<usize> {
        (self.disabled_count..self.items.len())
            .rev()
            .find(|&i| names_match(self.items[i].name(), name))
    }

    /// Move the entry at `idx` to the end, returning its new index.
    pub fn move_to_end(&mut self, idx: usize) -> usize {
        if idx < self.items.len() {
            let item = self.items.remove(idx);
            self.items.push(item);
        }
        self.items.len().saturating_sub(1)
    }

    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.find_last(name).map(|i| &self.items[i])
    }

    pub fn lookup_number(&self, number: i32) -> Option<&T> {
        if number <= 0 {
            return None;
        }
        self.active().rev().find(|t| t.number() == number)
    }

    pub fn disable_all(&mut self) {
        self.disabled_count = self.items.len();
    }

    pub fn active(&self) -> std::slice::Iter<'_, T> {
        self.items[self.disabled_count..].iter()
    }

    /// All records, tombstoned ones included.
    pub fn all(&self) -> &[T] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item(&'static str, i32);

    impl Named for Item {
        fn name(&self) -> &str {
            self.0
        }
        fn number(&self) -> i32 {
            self.1
        }
    }

    #[test]
    fn lookup_by_name_and_number() {
        let mut c = Container::new();
        c.push(Item("IMP", 3001));
        c.push(Item("DEMON", 3002));
        assert_eq!(c.lookup("imp"), Some(&Item("IMP", 3001)));
        assert_eq!(c.lookup_number(3002), Some(&Item("DEMON", 3002)));
        assert_eq!(c.lookup_number(0), None);
        assert_eq!(c.lookup("CYBER"), None);
    }

    #[test]
    fn move_to_end_keeps_others_in_order() {
        let mut c = Container::new();
        c.push(Item("A", 0));
        c.push(Item("B", 0));
        c.push(Item("C", 0));
        assert_eq!(c.move_to_end(0), 2);
        let names: Vec<_> = c.active().map(|i| i.0).collect();
        assert_eq!(names, ["B", "C", "A"]);
    }

    #[test]
    fn tombstones_hide_old_entries() {
        let mut c = Container::new();
        c.push(Item("IMP", 1));
        c.disable_all();
        assert_eq!(c.disabled_count(), 1);
        assert_eq!(c.lookup("IMP"), None);
        assert_eq!(c.find_first("IMP", 0), None);
        assert_eq!(c.all().len(), 1);

        c.push(Item("IMP", 1));
        assert_eq!(c.find_last("IMP"), Some(1));
        assert_eq!(c.active().count(), 1);
    }
}
