//! Tagged registry
//!
//! A catalog of owned records keyed by a unique string tag. Entries are kept
//! sorted by tag (byte-wise) after every mutation so lookups are a binary
//! search:
//! - inserts go straight into their sorted slot
//! - removals shift the tail down, preserving order
//! - a failed resize during removal clears the whole registry

use std::fmt;
use std::io;

use crate::error::{AssetError, RegistryError};
use crate::settings::CapacityPolicy;

/// A record that can live in a [`TaggedRegistry`]
pub trait Tagged {
    /// Unique, non-empty key. Must not change while the record is registered.
    fn tag(&self) -> &str;
}

/// Sorted, tag-indexed collection of owned records
#[derive(Debug)]
pub struct TaggedRegistry<R> {
    entries: Vec<R>,
    policy: CapacityPolicy,
    #[cfg(test)]
    fail_next_resize: bool,
}

impl<R: Tagged> Default for TaggedRegistry<R> {
    fn default() -> Self {
        Self::new(CapacityPolicy::default())
    }
}

impl<R: Tagged> TaggedRegistry<R> {
    /// Create an empty registry
    pub fn new(policy: CapacityPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
            #[cfg(test)]
            fail_next_resize: false,
        }
    }

    /// Create an empty registry with `capacity` slots reserved up front
    pub fn with_capacity(policy: CapacityPolicy, capacity: usize) -> Result<Self, RegistryError> {
        let mut registry = Self::new(policy);
        registry
            .entries
            .try_reserve_exact(capacity)
            .map_err(|_| RegistryError::AllocationFailed { len: 0 })?;
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Allocated entry slots
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Binary search for `tag`: `Ok(index)` if registered, otherwise
    /// `Err(index)` where it would be inserted
    pub fn position(&self, tag: &str) -> Result<usize, usize> {
        self.entries.binary_search_by(|entry| entry.tag().cmp(tag))
    }

    /// Look up a record by exact tag
    pub fn find(&self, tag: &str) -> Option<&R> {
        self.position(tag).ok().map(|index| &self.entries[index])
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_ok()
    }

    /// Iterate over records in tag order
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.entries.iter()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(Tagged::tag)
    }

    /// Check that `tag` could be inserted and return its sorted slot
    pub fn vacant_slot(&self, tag: &str) -> Result<usize, RegistryError> {
        if tag.is_empty() {
            return Err(RegistryError::InvalidTag);
        }
        match self.position(tag) {
            Ok(_) => Err(RegistryError::DuplicateTag(tag.to_owned())),
            Err(slot) => Ok(slot),
        }
    }

    /// Build a record for `tag` and insert it in sorted position
    ///
    /// Uniqueness is checked before `build` runs. Nothing is inserted unless
    /// the record was built and a slot was reserved for it.
    pub fn create_with<F>(&mut self, tag: &str, build: F) -> Result<&R, RegistryError>
    where
        F: FnOnce(String) -> Result<R, AssetError>,
    {
        let slot = self.vacant_slot(tag)?;

        let record = build(tag.to_owned()).map_err(|source| {
            RegistryError::PayloadConstructionFailed {
                tag: tag.to_owned(),
                source,
            }
        })?;
        debug_assert_eq!(record.tag(), tag, "record built with a different tag");

        self.reserve_slot()?;
        self.entries.insert(slot, record);
        log::debug!("registered `{}` ({} entries)", tag, self.entries.len());

        Ok(&self.entries[slot])
    }

    /// Remove the record tagged `tag`
    ///
    /// Returns `Ok(false)` if no such record exists. If the storage cannot be
    /// resized afterwards the registry is cleared and `AllocationFailed` is
    /// returned; any earlier lookups are void either way.
    pub fn remove(&mut self, tag: &str) -> Result<bool, RegistryError> {
        let Ok(index) = self.position(tag) else {
            return Ok(false);
        };

        drop(self.entries.remove(index));

        if let Err(e) = self.fit() {
            log::error!("{e} after removing `{tag}`, discarding all entries");
            self.clear();
            return Err(e);
        }

        log::debug!("removed `{}` ({} entries)", tag, self.entries.len());
        Ok(true)
    }

    /// Drop every record and release the storage
    pub fn clear(&mut self) {
        if self.entries.capacity() == 0 {
            return;
        }
        // Last in, first out
        while let Some(record) = self.entries.pop() {
            drop(record);
        }
        self.entries = Vec::new();
    }

    /// Whether tags are strictly ascending
    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].tag() < pair[1].tag())
    }

    /// Write a human-readable listing of every record
    pub fn dump<W: io::Write>(&self, out: &mut W) -> io::Result<()>
    where
        R: fmt::Display,
    {
        writeln!(out, "{} entries", self.entries.len())?;
        for entry in &self.entries {
            writeln!(out, "  {entry}")?;
        }
        Ok(())
    }

    /// Reserve room for `additional` more entries ahead of a batch of inserts
    pub fn reserve(&mut self, additional: usize) -> Result<(), RegistryError> {
        let len = self.entries.len();
        let reserved = match self.policy {
            CapacityPolicy::Exact => self.entries.try_reserve_exact(additional),
            CapacityPolicy::Amortized => self.entries.try_reserve(additional),
        };
        reserved.map_err(|_| RegistryError::AllocationFailed { len })
    }

    /// Make room for one more entry
    fn reserve_slot(&mut self) -> Result<(), RegistryError> {
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_resize) {
            return Err(RegistryError::AllocationFailed {
                len: self.entries.len(),
            });
        }
        self.reserve(1)
    }

    /// Shrink storage to the entry count if the policy asks for it
    fn fit(&mut self) -> Result<(), RegistryError> {
        let len = self.entries.len();
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_resize) {
            return Err(RegistryError::AllocationFailed { len });
        }

        if !self.policy.shrinks() || self.entries.capacity() == len {
            return Ok(());
        }

        let mut fitted = Vec::new();
        fitted
            .try_reserve_exact(len)
            .map_err(|_| RegistryError::AllocationFailed { len })?;
        fitted.append(&mut self.entries);
        self.entries = fitted;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn inject_resize_failure(&mut self) {
        self.fail_next_resize = true;
    }
}

impl<'a, R> IntoIterator for &'a TaggedRegistry<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    #[derive(Debug, PartialEq)]
    struct Entry {
        tag: String,
        value: u32,
    }

    impl Tagged for Entry {
        fn tag(&self) -> &str {
            &self.tag
        }
    }

    impl fmt::Display for Entry {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} = {}", self.tag, self.value)
        }
    }

    fn add(registry: &mut TaggedRegistry<Entry>, tag: &str, value: u32) -> Result<(), RegistryError> {
        registry
            .create_with(tag, |tag| Ok(Entry { tag, value }))
            .map(|_| ())
    }

    #[test]
    fn test_create_then_find() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "a", 7).unwrap();

        let found = registry.find("a").unwrap();
        assert_eq!(found, &Entry { tag: "a".into(), value: 7 });
        assert_eq!(registry.len(), 1);
        assert!(registry.find("b").is_none());
        assert!(registry.find("").is_none());
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "grass", 1).unwrap();

        let err = add(&mut registry, "grass", 2).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTag(ref tag) if tag == "grass"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.find("grass").unwrap().value, 1);
    }

    #[test]
    fn test_duplicate_checked_before_build() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "grass", 1).unwrap();

        let mut built = false;
        let result = registry.create_with("grass", |tag| {
            built = true;
            Ok(Entry { tag, value: 2 })
        });
        assert!(result.is_err());
        assert!(!built);
    }

    #[test]
    fn test_empty_tag_rejected() {
        let mut registry = TaggedRegistry::default();
        assert!(matches!(
            add(&mut registry, "", 1),
            Err(RegistryError::InvalidTag)
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_build_leaves_registry_untouched() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "a", 1).unwrap();

        let err = registry
            .create_with("b", |_| Err(AssetError::NotFound("b.png".into())))
            .unwrap_err();
        assert!(matches!(
            err,
            RegistryError::PayloadConstructionFailed { ref tag, source: AssetError::NotFound(_) }
                if tag == "b"
        ));
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("b"));
    }

    #[test]
    fn test_bulk_insert_is_sorted() {
        let mut registry = TaggedRegistry::default();
        for (i, tag) in ["telk", "bewn", "nror", "obne", "i_the"].into_iter().enumerate() {
            add(&mut registry, tag, i as u32).unwrap();
        }

        let tags: Vec<_> = registry.tags().collect();
        assert_eq!(tags, ["bewn", "i_the", "nror", "obne", "telk"]);
        assert!(registry.is_sorted());
    }

    #[test]
    fn test_byte_order() {
        let mut registry = TaggedRegistry::default();
        for tag in ["b", "B", "a", "_", "Z"] {
            add(&mut registry, tag, 0).unwrap();
        }
        let tags: Vec<_> = registry.tags().collect();
        assert_eq!(tags, ["B", "Z", "_", "a", "b"]);
    }

    #[test]
    fn test_remove_then_find() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "a", 1).unwrap();

        assert!(registry.remove("a").unwrap());
        assert!(registry.find("a").is_none());
        assert!(!registry.remove("a").unwrap());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut registry = TaggedRegistry::default();
        for tag in ["a", "b", "c", "d", "e"] {
            add(&mut registry, tag, 0).unwrap();
        }

        assert!(registry.remove("b").unwrap());
        let tags: Vec<_> = registry.tags().collect();
        assert_eq!(tags, ["a", "c", "d", "e"]);
        assert!(registry.find("e").is_some());
        assert!(registry.find("a").is_some());
    }

    #[test]
    fn test_exact_policy_fits_storage() {
        let mut registry = TaggedRegistry::new(CapacityPolicy::Exact);
        for tag in ["a", "b", "c"] {
            add(&mut registry, tag, 0).unwrap();
            assert_eq!(registry.capacity(), registry.len());
        }
        registry.remove("b").unwrap();
        assert_eq!(registry.capacity(), 2);
    }

    #[test]
    fn test_amortized_policy_keeps_storage() {
        let mut registry = TaggedRegistry::new(CapacityPolicy::Amortized);
        for tag in ["a", "b", "c"] {
            add(&mut registry, tag, 0).unwrap();
        }
        let capacity = registry.capacity();
        registry.remove("b").unwrap();
        assert_eq!(registry.capacity(), capacity);
    }

    #[test]
    fn test_with_capacity_reserves() {
        let registry: TaggedRegistry<Entry> =
            TaggedRegistry::with_capacity(CapacityPolicy::Amortized, 16).unwrap();
        assert!(registry.capacity() >= 16);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_reserve_is_atomic() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "a", 1).unwrap();

        registry.inject_resize_failure();
        let err = add(&mut registry, "b", 2).unwrap_err();
        assert!(matches!(err, RegistryError::AllocationFailed { len: 1 }));
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains("b"));

        add(&mut registry, "b", 2).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_failed_shrink_discards_everything() {
        let mut registry = TaggedRegistry::default();
        for tag in ["a", "b", "c"] {
            add(&mut registry, tag, 0).unwrap();
        }

        registry.inject_resize_failure();
        let err = registry.remove("b").unwrap_err();
        assert!(matches!(err, RegistryError::AllocationFailed { .. }));
        assert!(registry.is_empty());
        assert!(registry.find("a").is_none());

        // Still usable afterwards
        add(&mut registry, "a", 0).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut registry: TaggedRegistry<Entry> = TaggedRegistry::default();
        registry.clear();
        assert_eq!(registry.len(), 0);

        add(&mut registry, "a", 0).unwrap();
        add(&mut registry, "b", 0).unwrap();
        registry.clear();
        registry.clear();
        assert_eq!(registry.len(), 0);
        assert_eq!(registry.capacity(), 0);
    }

    #[test]
    fn test_dump() {
        let mut registry = TaggedRegistry::default();
        add(&mut registry, "b", 2).unwrap();
        add(&mut registry, "a", 1).unwrap();

        let mut out = Vec::new();
        registry.dump(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "2 entries\n  a = 1\n  b = 2\n");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Create(String),
        Remove(String),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-e]{0,3}".prop_map(Op::Create),
            "[a-e]{0,3}".prop_map(Op::Remove),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_ordered_set(ops in prop::collection::vec(op(), 0..64), amortized in any::<bool>()) {
            let policy = if amortized { CapacityPolicy::Amortized } else { CapacityPolicy::Exact };
            let mut registry = TaggedRegistry::new(policy);
            let mut model = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Create(tag) => {
                        let result = add(&mut registry, &tag, 0);
                        if tag.is_empty() {
                            prop_assert!(matches!(result, Err(RegistryError::InvalidTag)));
                        } else if model.contains(&tag) {
                            prop_assert!(matches!(result, Err(RegistryError::DuplicateTag(_))));
                        } else {
                            prop_assert!(result.is_ok());
                            model.insert(tag);
                        }
                    }
                    Op::Remove(tag) => {
                        let removed = registry.remove(&tag).unwrap();
                        prop_assert_eq!(removed, model.remove(&tag));
                    }
                }

                prop_assert!(registry.is_sorted());
                prop_assert_eq!(registry.len(), model.len());
                let tags: Vec<&str> = registry.tags().collect();
                let expected: Vec<&str> = model.iter().map(String::as_str).collect();
                prop_assert_eq!(tags, expected);
            }
        }
    }
}
