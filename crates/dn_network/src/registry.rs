//! Bidirectional registry: species id <-> canonical form.

use ahash::AHashMap;
use nohash_hasher::IntMap;

use crate::RegistryError;
use crate::SpeciesId;

/// At most one id per canonical form, at most one canonical form per id.
///
/// Ids are handed out sequentially, starting at 1. Lookups in both
/// directions are hash lookups, and [`SpeciesRegistry::lookup_or_insert`]
/// performs the check and the insertion under one `&mut` borrow.
#[derive(Debug, Clone)]
pub struct SpeciesRegistry {
    forms: IntMap<SpeciesId, String>,
    ids: AHashMap<String, SpeciesId>,
    next_id: SpeciesId,
}

impl Default for SpeciesRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeciesRegistry {
    pub fn new() -> Self {
        Self {
            forms: IntMap::default(),
            ids: AHashMap::default(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id_of(&self, form: &str) -> Option<SpeciesId> {
        self.ids.get(form).copied()
    }

    pub fn form_of(&self, id: SpeciesId) -> Option<&str> {
        self.forms.get(&id).map(|s| s.as_str())
    }

    pub fn contains_id(&self, id: SpeciesId) -> bool {
        self.forms.contains_key(&id)
    }

    /// Returns the id of `form`, registering it under the next free id if
    /// it is new. The flag is true for newly registered forms.
    pub fn lookup_or_insert(&mut self, form: &str) -> (SpeciesId, bool) {
        if let Some(&id) = self.ids.get(form) {
            return (id, false);
        }
        while self.forms.contains_key(&self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.forms.insert(id, form.to_string());
        self.ids.insert(form.to_string(), id);
        (id, true)
    }

    /// Registers `form` under a given id.
    ///
    /// Re-inserting an identical pair is a no-op; anything that would map
    /// one form to two ids, or one id to two forms, is rejected.
    pub fn insert(&mut self, id: SpeciesId, form: &str) -> Result<(), RegistryError> {
        if let Some(&existing) = self.ids.get(form) {
            if existing != id {
                return Err(RegistryError::FormConflict {
                    form: form.to_string(),
                    existing,
                    requested: id,
                });
            }
            return Ok(());
        }
        if let Some(existing) = self.forms.get(&id) {
            return Err(RegistryError::IdConflict {
                id,
                existing: existing.clone(),
                requested: form.to_string(),
            });
        }
        self.forms.insert(id, form.to_string());
        self.ids.insert(form.to_string(), id);
        Ok(())
    }

    /// All entries, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, &str)> + '_ {
        let mut entries: Vec<(SpeciesId, &str)> = self.forms.iter()
            .map(|(&id, form)| (id, form.as_str()))
            .collect();
        entries.sort_unstable_by_key(|&(id, _)| id);
        entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_or_insert_is_idempotent() {
        let mut reg = SpeciesRegistry::new();
        assert_eq!(reg.lookup_or_insert("<a>"), (1, true));
        assert_eq!(reg.lookup_or_insert("<b>"), (2, true));
        assert_eq!(reg.lookup_or_insert("<a>"), (1, false));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.id_of("<b>"), Some(2));
        assert_eq!(reg.form_of(1), Some("<a>"));
        assert_eq!(reg.form_of(3), None);
    }

    #[test]
    fn test_insert_rejects_conflicts() {
        let mut reg = SpeciesRegistry::new();
        reg.insert(1, "<a>").unwrap();
        reg.insert(1, "<a>").unwrap();
        assert_eq!(reg.insert(2, "<a>"), Err(RegistryError::FormConflict {
            form: "<a>".to_string(),
            existing: 1,
            requested: 2,
        }));
        assert!(matches!(reg.insert(1, "<b>"), Err(RegistryError::IdConflict { id: 1, .. })));
    }

    #[test]
    fn test_sequential_ids_skip_taken() {
        let mut reg = SpeciesRegistry::new();
        reg.insert(2, "<b>").unwrap();
        assert_eq!(reg.lookup_or_insert("<a>"), (1, true));
        assert_eq!(reg.lookup_or_insert("<c>"), (3, true));
        let ids: Vec<_> = reg.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
