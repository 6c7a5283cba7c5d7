use bytes::Bytes;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// The shared in-memory state: one map per value shape plus the expiry
/// index. A live key resides in exactly one of the three namespaces; every
/// write that creates or overwrites a key evicts it from the other two.
/// Expiry is lazy: each operation first checks the touched key's deadline
/// and removes the key everywhere once it has passed.
///
/// The store is shared as `Arc<Mutex<Store>>`; commands hold the lock for
/// their full duration, so each executes against a consistent snapshot.
pub struct Store {
    pub(crate) strings: HashMap<String, Bytes>,
    pub(crate) lists: HashMap<String, VecDeque<Bytes>>,
    pub(crate) hashes: HashMap<String, HashMap<String, Bytes>>,
    pub(crate) expirations: HashMap<String, Instant>,
}

impl Store {
    pub fn new() -> Store {
        Store {
            strings: HashMap::new(),
            lists: HashMap::new(),
            hashes: HashMap::new(),
            expirations: HashMap::new(),
        }
    }

    // Generic key operations

    pub fn exists(&mut self, key: &str) -> bool {
        self.evict_if_expired(key);
        self.contains(key)
    }

    /// Erases `key` from every namespace and the expiry index. Returns true
    /// if anything was removed.
    pub fn del(&mut self, key: &str) -> bool {
        self.evict_if_expired(key);

        let removed = self.strings.remove(key).is_some()
            | self.lists.remove(key).is_some()
            | self.hashes.remove(key).is_some();
        self.expirations.remove(key);

        removed
    }

    /// All live keys across the three namespaces. Order is unspecified.
    pub fn keys(&mut self) -> Vec<String> {
        self.purge_expired();

        self.strings
            .keys()
            .chain(self.lists.keys())
            .chain(self.hashes.keys())
            .cloned()
            .collect()
    }

    /// The namespace holding `key`, first-hit in the order string, list,
    /// hash; "none" if the key is absent everywhere.
    pub fn key_type(&mut self, key: &str) -> &'static str {
        self.evict_if_expired(key);

        if self.strings.contains_key(key) {
            "string"
        } else if self.lists.contains_key(key) {
            "list"
        } else if self.hashes.contains_key(key) {
            "hash"
        } else {
            "none"
        }
    }

    /// Records a deadline `seconds` from now for an existing key. Seconds at
    /// or below zero produce an already-passed deadline, so the key is gone
    /// by the time the next command touches it.
    pub fn expire(&mut self, key: &str, seconds: i64) -> bool {
        self.evict_if_expired(key);

        if !self.contains(key) {
            return false;
        }

        let deadline = if seconds <= 0 {
            Instant::now()
        } else {
            Instant::now() + Duration::from_secs(seconds as u64)
        };
        self.expirations.insert(key.to_string(), deadline);

        true
    }

    /// Moves `old` to `new` in whichever namespace it lives, carrying its
    /// expiry entry along and unconditionally overwriting `new`. Returns
    /// false only when `old` does not exist.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        self.evict_if_expired(old);
        self.evict_if_expired(new);

        let string = self.strings.remove(old);
        let list = self.lists.remove(old);
        let hash = self.hashes.remove(old);
        let expiry = self.expirations.remove(old);

        if string.is_none() && list.is_none() && hash.is_none() {
            return false;
        }

        // The destination is overwritten wholesale; its previous value and
        // expiry entry do not survive in any namespace.
        self.strings.remove(new);
        self.lists.remove(new);
        self.hashes.remove(new);
        self.expirations.remove(new);

        if let Some(value) = string {
            self.strings.insert(new.to_string(), value);
        }
        if let Some(elements) = list {
            self.lists.insert(new.to_string(), elements);
        }
        if let Some(entries) = hash {
            self.hashes.insert(new.to_string(), entries);
        }
        if let Some(deadline) = expiry {
            self.expirations.insert(new.to_string(), deadline);
        }

        true
    }

    pub fn flush_all(&mut self) {
        self.strings.clear();
        self.lists.clear();
        self.hashes.clear();
        self.expirations.clear();
    }

    // String namespace

    pub fn set(&mut self, key: String, value: Bytes) {
        self.evict_if_expired(&key);
        self.lists.remove(&key);
        self.hashes.remove(&key);
        self.strings.insert(key, value);
    }

    pub fn get(&mut self, key: &str) -> Option<&Bytes> {
        self.evict_if_expired(key);
        self.strings.get(key)
    }

    // List namespace

    pub fn llen(&mut self, key: &str) -> usize {
        self.evict_if_expired(key);
        self.lists.get(key).map_or(0, VecDeque::len)
    }

    /// Pushes each value onto the head in argument order, so the last
    /// argument ends up frontmost. Returns the new length.
    pub fn lpush(&mut self, key: &str, values: Vec<Bytes>) -> usize {
        let list = self.claim_list(key);
        for value in values {
            list.push_front(value);
        }
        list.len()
    }

    /// Appends each value at the tail in argument order. Returns the new
    /// length.
    pub fn rpush(&mut self, key: &str, values: Vec<Bytes>) -> usize {
        let list = self.claim_list(key);
        for value in values {
            list.push_back(value);
        }
        list.len()
    }

    pub fn lpop(&mut self, key: &str) -> Option<Bytes> {
        self.evict_if_expired(key);
        let value = self.lists.get_mut(key)?.pop_front();
        self.drop_list_if_empty(key);
        value
    }

    pub fn rpop(&mut self, key: &str) -> Option<Bytes> {
        self.evict_if_expired(key);
        let value = self.lists.get_mut(key)?.pop_back();
        self.drop_list_if_empty(key);
        value
    }

    /// Removes occurrences of `value`: up to `count` from the head when
    /// positive, up to `|count|` from the tail when negative, all when zero.
    /// Returns the number removed.
    pub fn lrem(&mut self, key: &str, count: i64, value: &Bytes) -> usize {
        self.evict_if_expired(key);

        let Some(list) = self.lists.get_mut(key) else {
            return 0;
        };

        let mut removed = 0;
        if count >= 0 {
            let limit = if count == 0 { usize::MAX } else { count as usize };
            let mut i = 0;
            while i < list.len() && removed < limit {
                if &list[i] == value {
                    list.remove(i);
                    removed += 1;
                } else {
                    i += 1;
                }
            }
        } else {
            let limit = count.unsigned_abs() as usize;
            let mut i = list.len();
            while i > 0 && removed < limit {
                i -= 1;
                if &list[i] == value {
                    list.remove(i);
                    removed += 1;
                }
            }
        }

        self.drop_list_if_empty(key);
        removed
    }

    pub fn lindex(&mut self, key: &str, index: i64) -> Option<&Bytes> {
        self.evict_if_expired(key);
        let list = self.lists.get(key)?;
        let position = resolve_index(list.len(), index)?;
        list.get(position)
    }

    /// Overwrites the element at `index`. Returns false when the key is
    /// missing or the index is out of range.
    pub fn lset(&mut self, key: &str, index: i64, value: Bytes) -> bool {
        self.evict_if_expired(key);

        let Some(list) = self.lists.get_mut(key) else {
            return false;
        };
        let Some(position) = resolve_index(list.len(), index) else {
            return false;
        };

        list[position] = value;
        true
    }

    // Hash namespace

    /// Writes `field`. Returns true when the write changed anything: a new
    /// field, or an existing field whose value differs.
    pub fn hset(&mut self, key: &str, field: String, value: Bytes) -> bool {
        let entries = self.claim_hash(key);
        match entries.insert(field, value.clone()) {
            Some(previous) => previous != value,
            None => true,
        }
    }

    pub fn hget(&mut self, key: &str, field: &str) -> Option<&Bytes> {
        self.evict_if_expired(key);
        self.hashes.get(key)?.get(field)
    }

    pub fn hexists(&mut self, key: &str, field: &str) -> bool {
        self.evict_if_expired(key);
        self.hashes
            .get(key)
            .is_some_and(|entries| entries.contains_key(field))
    }

    pub fn hdel(&mut self, key: &str, field: &str) -> bool {
        self.evict_if_expired(key);

        let Some(entries) = self.hashes.get_mut(key) else {
            return false;
        };
        let removed = entries.remove(field).is_some();
        if entries.is_empty() {
            self.hashes.remove(key);
        }

        removed
    }

    pub fn hgetall(&mut self, key: &str) -> Vec<(String, Bytes)> {
        self.evict_if_expired(key);
        self.hashes.get(key).map_or_else(Vec::new, |entries| {
            entries
                .iter()
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect()
        })
    }

    pub fn hkeys(&mut self, key: &str) -> Vec<String> {
        self.evict_if_expired(key);
        self.hashes
            .get(key)
            .map_or_else(Vec::new, |entries| entries.keys().cloned().collect())
    }

    pub fn hvals(&mut self, key: &str) -> Vec<Bytes> {
        self.evict_if_expired(key);
        self.hashes
            .get(key)
            .map_or_else(Vec::new, |entries| entries.values().cloned().collect())
    }

    pub fn hlen(&mut self, key: &str) -> usize {
        self.evict_if_expired(key);
        self.hashes.get(key).map_or(0, HashMap::len)
    }

    // Expiry plumbing

    fn contains(&self, key: &str) -> bool {
        self.strings.contains_key(key)
            || self.lists.contains_key(key)
            || self.hashes.contains_key(key)
    }

    /// Lazy expiry for one key: once the deadline has passed the key is
    /// removed from every namespace, as though a DEL had occurred.
    fn evict_if_expired(&mut self, key: &str) {
        let Some(&deadline) = self.expirations.get(key) else {
            return;
        };

        if deadline <= Instant::now() {
            self.strings.remove(key);
            self.lists.remove(key);
            self.hashes.remove(key);
            self.expirations.remove(key);
        }
    }

    /// Lazy expiry for whole-store operations (KEYS, snapshot dump).
    pub(crate) fn purge_expired(&mut self) {
        let now = Instant::now();
        let expired: Vec<String> = self
            .expirations
            .iter()
            .filter(|(_, &deadline)| deadline <= now)
            .map(|(key, _)| key.clone())
            .collect();

        for key in expired {
            self.strings.remove(&key);
            self.lists.remove(&key);
            self.hashes.remove(&key);
            self.expirations.remove(&key);
        }
    }

    /// Claims `key` for the list namespace, evicting it from the others,
    /// and returns the (possibly fresh) list.
    fn claim_list(&mut self, key: &str) -> &mut VecDeque<Bytes> {
        self.evict_if_expired(key);
        self.strings.remove(key);
        self.hashes.remove(key);
        self.lists.entry(key.to_string()).or_default()
    }

    fn claim_hash(&mut self, key: &str) -> &mut HashMap<String, Bytes> {
        self.evict_if_expired(key);
        self.strings.remove(key);
        self.lists.remove(key);
        self.hashes.entry(key.to_string()).or_default()
    }

    fn drop_list_if_empty(&mut self, key: &str) {
        if self.lists.get(key).is_some_and(VecDeque::is_empty) {
            self.lists.remove(key);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero-based list addressing with negative-from-tail semantics: index -1
/// is the last element. Out-of-range indices resolve to `None`.
fn resolve_index(len: usize, index: i64) -> Option<usize> {
    let index = if index < 0 {
        index.checked_add(len as i64)?
    } else {
        index
    };

    usize::try_from(index).ok().filter(|&i| i < len)
}
