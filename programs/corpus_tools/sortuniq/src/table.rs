use fnv::FnvHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug)]
pub struct Entry {
    key: Arc<[u8]>,
    count: u64,
}

impl Entry {
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// Counts of distinct lines. Entries sit in an arena in first-seen order and the
/// index maps the exact key bytes to their slot, so a key can never alias another.
#[derive(Debug, Default)]
pub struct FrequencyTable {
    index: FnvHashMap<Arc<[u8]>, EntryId>,
    entries: Vec<Entry>,
    total: u64,
}

impl FrequencyTable {
    #[cfg(test)]
    pub fn new() -> FrequencyTable {
        FrequencyTable::default()
    }

    pub fn with_capacity(capacity: usize) -> FrequencyTable {
        FrequencyTable {
            index: FnvHashMap::with_capacity_and_hasher(capacity, Default::default()),
            entries: Vec::with_capacity(capacity),
            total: 0,
        }
    }

    /// Id of the entry for `key`, inserted with a count of 0 if it wasn't there.
    /// Only a first sighting copies the key.
    pub fn get_or_create(&mut self, key: &[u8]) -> EntryId {
        if let Some(&id) = self.index.get(key) {
            return id;
        }
        let id = EntryId(self.entries.len());
        let key: Arc<[u8]> = Arc::from(key);
        self.index.insert(Arc::clone(&key), id);
        self.entries.push(Entry { key, count: 0 });
        id
    }

    pub fn increment(&mut self, id: EntryId) {
        let entry = &mut self.entries[id.0];
        entry.count = entry.count.wrapping_add(1);
        self.total = self.total.wrapping_add(1);
    }

    /// Counts one occurrence of `key` and returns its new count.
    pub fn record(&mut self, key: &[u8]) -> u64 {
        let id = self.get_or_create(key);
        self.increment(id);
        self.entry(id).count()
    }

    #[cfg(test)]
    pub fn get(&self, key: &[u8]) -> Option<u64> {
        self.index.get(key).map(|id| self.entries[id.0].count)
    }

    pub fn entry(&self, id: EntryId) -> &Entry {
        &self.entries[id.0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Increments issued so far, i.e. lines counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }
}
