use indexmap::IndexMap;
use std::hash::Hash;

/// Summary records keyed by identity, kept in first-insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCollection<TId: Hash + Eq, TSummary> {
    entries: IndexMap<TId, TSummary>,
}

impl<TId: Hash + Eq, TSummary> Default for EntityCollection<TId, TSummary> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<TId: Hash + Eq, TSummary> EntityCollection<TId, TSummary> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts new identities at the end and overwrites existing ones in place.
    /// Nothing is ever removed.
    pub fn upsert_many<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (TId, TSummary)>,
    {
        for (id, summary) in items {
            self.upsert_one(id, summary);
        }
    }

    pub fn upsert_one(&mut self, id: TId, summary: TSummary) {
        self.entries.insert(id, summary);
    }

    pub fn get(&self, id: &TId) -> Option<&TSummary> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &TId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &TId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TId, &TSummary)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<TId: Hash + Eq, TSummary: Clone> EntityCollection<TId, TSummary> {
    pub fn all(&self) -> Vec<TSummary> {
        self.entries.values().cloned().collect()
    }
}
