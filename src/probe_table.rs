use std::mem;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::hashing::probe_slot;
use crate::utils::next_prime;

/// Bucket count used by [`ProbeTable::new`]. Prime, so probe steps that
/// are not multiples of it walk the whole array.
const DEFAULT_CAPACITY: usize = 53;

/// An owned key-value pair held by an occupied bucket.
///
/// The table stores its own copies; nothing in an entry aliases caller
/// memory, and dropping the table drops every entry with it.
#[derive(Debug, Clone)]
struct Entry {
    /// The key under which the value was stored
    key: String,
    /// The value associated with the key
    value: String,
}

/// A single slot of the fixed bucket array.
#[derive(Debug, Clone)]
enum Bucket {
    /// Never held an entry; ends any probe walk that reaches it
    Empty,
    /// Holds one live entry
    Occupied(Entry),
    /// Held an entry that was since removed; probe walks continue past
    /// it, and inserts may claim it
    Tombstone,
}

/// A fixed-capacity string hash table using open addressing with double
/// hashing and tombstone deletion.
///
/// The bucket count is chosen at construction, rounded up to a prime,
/// and never changes. Collisions are resolved by walking a per-key probe
/// sequence; removals leave tombstones behind so later lookups still
/// find entries placed further along the same sequence.
///
/// Note: this implementation is not thread-safe, and a full table
/// rejects new keys instead of growing.
#[derive(Debug, Clone)]
pub struct ProbeTable {
    /// The fixed bucket array; its length never changes after construction
    buckets: Vec<Bucket>,
    /// Number of occupied buckets. Tombstones are not counted
    count: usize,
}

impl ProbeTable {
    /// Creates a table with the default prime bucket count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the bucket array cannot be reserved.
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a table with at least `min_capacity` buckets.
    ///
    /// The actual bucket count is the smallest prime that is at least
    /// `min_capacity` (and at least 2), so the double-hash step sizes
    /// stay coprime to the table length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Alloc`] if the bucket array cannot be reserved.
    pub fn with_capacity(min_capacity: usize) -> Result<Self> {
        let capacity = next_prime(min_capacity.max(2));
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(capacity)?;
        buckets.resize(capacity, Bucket::Empty);
        debug!("created table with {capacity} buckets");
        Ok(Self { buckets, count: 0 })
    }

    /// Inserts a key-value pair, copying both strings into the table.
    ///
    /// If the key is already present its value is replaced in place and
    /// the previous value is returned; the entry count does not change.
    /// A new key lands in the first tombstone its probe walk passed, or
    /// failing that in the empty bucket that ended the walk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableFull`] when every probe attempt found a
    /// live entry for another key and no tombstone was available.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<Option<String>> {
        let slot = self.find_insert_slot(key)?;
        match self.buckets.get_mut(slot) {
            Some(Bucket::Occupied(entry)) if entry.key == key => {
                Ok(Some(mem::replace(&mut entry.value, value.to_owned())))
            }
            Some(bucket) => {
                *bucket = Bucket::Occupied(Entry {
                    key: key.to_owned(),
                    value: value.to_owned(),
                });
                self.count = self.count.saturating_add(1);
                Ok(None)
            }
            // find_insert_slot only returns in-range indices
            None => Ok(None),
        }
    }

    /// Walks the probe sequence and picks the bucket `key` should land
    /// in: the bucket already holding `key`, else the first tombstone
    /// the walk passed, else the empty bucket that ended the walk.
    ///
    /// The existing-key check runs over the whole chain before any
    /// tombstone is claimed, so a key can never occupy two buckets.
    fn find_insert_slot(&self, key: &str) -> Result<usize> {
        let capacity = self.buckets.len();
        let mut first_tombstone = None;

        for attempt in 0..capacity {
            let index = probe_slot(key, capacity, attempt);
            match self.buckets.get(index) {
                Some(Bucket::Empty) => return Ok(first_tombstone.unwrap_or(index)),
                Some(Bucket::Occupied(entry)) if entry.key == key => return Ok(index),
                Some(Bucket::Tombstone) => {
                    if first_tombstone.is_none() {
                        first_tombstone = Some(index);
                    }
                }
                Some(Bucket::Occupied(_)) | None => {}
            }
        }

        // no empty bucket anywhere along the walk; fall back to the
        // earliest vacated slot, or report saturation
        first_tombstone.ok_or_else(|| {
            debug!("insert exhausted all {capacity} probe attempts");
            Error::TableFull
        })
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// An empty bucket proves the key was never inserted along its probe
    /// sequence; tombstones and entries for other keys are walked past.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        let capacity = self.buckets.len();

        for attempt in 0..capacity {
            let index = probe_slot(key, capacity, attempt);
            match self.buckets.get(index) {
                None | Some(Bucket::Empty) => return None,
                Some(Bucket::Occupied(entry)) if entry.key == key => {
                    return Some(entry.value.as_str());
                }
                Some(Bucket::Occupied(_) | Bucket::Tombstone) => {}
            }
        }

        None
    }

    /// Removes `key` from the table, returning its owned value.
    ///
    /// The bucket becomes a tombstone rather than reverting to empty, so
    /// searches for keys placed further along the same probe sequence
    /// keep working. Removing an absent key is a no-op returning `None`.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let capacity = self.buckets.len();

        for attempt in 0..capacity {
            let index = probe_slot(key, capacity, attempt);
            match self.buckets.get_mut(index) {
                None | Some(Bucket::Empty) => return None,
                Some(bucket) => {
                    if matches!(bucket, Bucket::Occupied(entry) if entry.key == key) {
                        let removed = mem::replace(bucket, Bucket::Tombstone);
                        self.count = self.count.saturating_sub(1);
                        trace!("bucket {index} tombstoned");
                        if let Bucket::Occupied(entry) = removed {
                            return Some(entry.value);
                        }
                        return None; // the matched bucket was occupied
                    }
                }
            }
        }

        None
    }

    /// Returns true if the table holds a value for `key`
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the number of live entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no live entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the fixed bucket count chosen at construction
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of live entries to total buckets
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.buckets.len() as f64
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use test_log::test;

    // "cedar", "pine", "rowan" and "willow" have degenerate probe
    // sequences at capacity 7 and are deliberately left out of the
    // fill set below
    const FILL_SEVEN: [&str; 7] = ["ash", "birch", "elm", "fir", "hazel", "oak", "maple"];

    fn filled_seven() -> ProbeTable {
        let mut table = ProbeTable::with_capacity(7).expect("allocation");
        for key in FILL_SEVEN {
            table.insert(key, "leaf").expect("table has room");
        }
        table
    }

    #[test]
    fn test_insert_and_get() {
        let mut table = ProbeTable::new().expect("allocation");
        assert_eq!(table.insert("key1", "one").expect("room"), None);
        assert_eq!(table.insert("key2", "two").expect("room"), None);
        assert_eq!(table.insert("key3", "three").expect("room"), None);

        assert_eq!(table.get("key1"), Some("one"));
        assert_eq!(table.get("key2"), Some("two"));
        assert_eq!(table.get("key3"), Some("three"));
        assert_eq!(table.get("key4"), None);
    }

    #[test]
    fn test_update_keeps_count() {
        let mut table = ProbeTable::new().expect("allocation");
        assert_eq!(table.insert("key1", "one").expect("room"), None);
        let before = table.len();
        assert_eq!(table.insert("key1", "uno").expect("room"), Some("one".to_string()));
        assert_eq!(table.len(), before);
        assert_eq!(table.get("key1"), Some("uno"));
    }

    #[test]
    fn test_remove() {
        let mut table = ProbeTable::new().expect("allocation");
        table.insert("key1", "one").expect("room");
        table.insert("key2", "two").expect("room");

        assert_eq!(table.remove("key1"), Some("one".to_string()));
        assert_eq!(table.get("key1"), None);
        assert_eq!(table.get("key2"), Some("two"));
        assert_eq!(table.remove("key1"), None);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut table = ProbeTable::new().expect("allocation");
        table.insert("key1", "one").expect("room");

        assert_eq!(table.remove("ghost"), None);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("key1"), Some("one"));
    }

    #[test]
    fn test_count_tracks_inserts_and_removes() {
        let mut table = ProbeTable::new().expect("allocation");
        for i in 0..10 {
            table.insert(&format!("key-{i}"), &i.to_string()).expect("room");
        }
        assert_eq!(table.len(), 10);

        for i in 0..4 {
            assert!(table.remove(&format!("key-{i}")).is_some());
        }
        assert_eq!(table.len(), 6);
        assert_eq!(table.get("key-5"), Some("5"));
    }

    #[test]
    fn test_full_table_rejects_new_keys() {
        let mut table = filled_seven();
        assert_eq!(table.len(), 7);
        assert_eq!(table.insert("yew", "needle"), Err(Error::TableFull));

        // updating an existing key still works on a saturated table
        assert_eq!(table.insert("oak", "acorn").expect("update"), Some("leaf".to_string()));
        assert_eq!(table.len(), 7);
        assert_eq!(table.get("oak"), Some("acorn"));
    }

    #[test]
    fn test_tombstone_reuse_without_empty_buckets() {
        let mut table = filled_seven();
        assert_eq!(table.remove("hazel"), Some("leaf".to_string()));
        assert_eq!(table.len(), 6);

        // the only vacancy is a tombstone; the insert must claim it
        assert_eq!(table.insert("yew", "needle").expect("tombstone available"), None);
        assert_eq!(table.len(), 7);
        assert_eq!(table.get("yew"), Some("needle"));
        for key in FILL_SEVEN {
            if key != "hazel" {
                assert!(table.contains_key(key), "{key} lost after tombstone reuse");
            }
        }
    }

    #[test]
    fn test_search_walks_past_tombstones() {
        // "ash" and "maple" share their starting bucket at capacity 7,
        // so removing "ash" leaves a tombstone on "maple"'s chain
        let mut table = ProbeTable::with_capacity(7).expect("allocation");
        table.insert("ash", "green").expect("room");
        table.insert("maple", "red").expect("room");

        assert_eq!(table.remove("ash"), Some("green".to_string()));
        assert_eq!(table.get("maple"), Some("red"));
    }

    #[test]
    fn test_reinsert_behind_tombstone_updates_instead_of_duplicating() {
        let mut table = ProbeTable::with_capacity(7).expect("allocation");
        table.insert("ash", "green").expect("room");
        table.insert("maple", "red").expect("room");
        table.remove("ash");

        // "maple"'s chain now starts with a tombstone; re-inserting it
        // must find the live entry further along, not a second bucket
        assert_eq!(table.insert("maple", "amber").expect("update"), Some("red".to_string()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("maple"), Some("amber"));

        table.remove("maple");
        assert_eq!(table.get("maple"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_menagerie_scenario() {
        let mut table = ProbeTable::new().expect("allocation");
        table.insert("cat", "meow").expect("room");
        table.insert("dog", "woof").expect("room");
        table.insert("mouse", "squeak").expect("room");
        assert_eq!(table.len(), 3);

        assert_eq!(table.remove("dog"), Some("woof".to_string()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("dog"), None);
        assert_eq!(table.get("mouse"), Some("squeak"));

        table.insert("bird", "tweet").expect("room");
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("bird"), Some("tweet"));
    }

    #[test]
    fn test_capacity_rounds_up_to_a_prime() {
        assert_eq!(ProbeTable::with_capacity(6).expect("allocation").capacity(), 7);
        assert_eq!(ProbeTable::with_capacity(54).expect("allocation").capacity(), 59);
        assert_eq!(ProbeTable::with_capacity(0).expect("allocation").capacity(), 2);
        assert_eq!(ProbeTable::new().expect("allocation").capacity(), 53);
    }

    #[test]
    fn test_owned_copies_outlive_the_caller_strings() {
        let mut table = ProbeTable::new().expect("allocation");
        {
            let key = String::from("ephemeral");
            let value = String::from("data");
            table.insert(&key, &value).expect("room");
        }
        assert_eq!(table.get("ephemeral"), Some("data"));
    }

    #[test]
    fn test_load_factor() {
        let mut table = ProbeTable::with_capacity(16).expect("allocation");
        assert_eq!(table.capacity(), 17);

        for i in 0..8 {
            table.insert(&format!("key-{i}"), "v").expect("room");
        }
        assert!((table.load_factor() - 8.0 / 17.0).abs() < 0.01);
    }
}
