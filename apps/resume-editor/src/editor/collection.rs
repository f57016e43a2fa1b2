//! Ordered, keyed storage for one entity kind.
//!
//! Records live in a map keyed by a per-collection counter; a separate
//! vector holds the display order. Ids are never handed out twice, so a
//! stale id held by the UI after a removal simply misses.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::editor::entity::{Entity, FieldValue};
use crate::errors::EditorError;

/// Identity of a record inside an [`EntityCollection<T>`].
///
/// Typed by entity kind so a skill id cannot address an experience.
pub struct EntityId<T> {
    raw: u64,
    _kind: PhantomData<fn() -> T>,
}

impl<T> EntityId<T> {
    fn new(raw: u64) -> Self {
        Self {
            raw,
            _kind: PhantomData,
        }
    }

    pub fn raw(&self) -> u64 {
        self.raw
    }
}

impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.raw)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

#[derive(Debug, Clone)]
pub struct EntityCollection<T> {
    records: HashMap<u64, T>,
    order: Vec<u64>,
    next_id: u64,
}

impl<T> Default for EntityCollection<T> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Entity> EntityCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty collection that keeps numbering where `previous` stopped,
    /// so ids issued by `previous` never reappear.
    pub fn continuing(previous: &Self) -> Self {
        Self {
            next_id: previous.next_id,
            ..Self::default()
        }
    }

    /// Appends `record` and returns its fresh id.
    pub fn add(&mut self, record: T) -> EntityId<T> {
        let raw = self.next_id;
        self.next_id += 1;
        self.records.insert(raw, record);
        self.order.push(raw);
        EntityId::new(raw)
    }

    /// Replaces one scalar field of the record with `id`.
    ///
    /// On a type mismatch the record is left as it was.
    pub fn update(
        &mut self,
        id: EntityId<T>,
        field: T::Field,
        value: impl Into<FieldValue>,
    ) -> Result<(), EditorError> {
        self.get_mut(id)?.set_field(field, value.into())
    }

    /// Removes the record and returns it.
    pub fn remove(&mut self, id: EntityId<T>) -> Result<T, EditorError> {
        let record = self.records.remove(&id.raw).ok_or(EditorError::EntityNotFound {
            kind: T::KIND,
            id: id.raw,
        })?;
        self.order.retain(|raw| *raw != id.raw);
        Ok(record)
    }

    pub fn get(&self, id: EntityId<T>) -> Option<&T> {
        self.records.get(&id.raw)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId<T>) -> Result<&mut T, EditorError> {
        self.records
            .get_mut(&id.raw)
            .ok_or(EditorError::EntityNotFound {
                kind: T::KIND,
                id: id.raw,
            })
    }

    pub fn contains(&self, id: EntityId<T>) -> bool {
        self.records.contains_key(&id.raw)
    }

    /// Records in insertion order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId<T>, &T)> + '_ {
        self.order
            .iter()
            .filter_map(|raw| self.records.get(raw).map(|record| (EntityId::new(*raw), record)))
    }

    /// Records in insertion order, without ids.
    pub fn all(&self) -> Vec<&T> {
        self.iter().map(|(_, record)| record).collect()
    }

    pub fn ids(&self) -> Vec<EntityId<T>> {
        self.order.iter().map(|raw| EntityId::new(*raw)).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<T: Entity> FromIterator<T> for EntityCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut collection = Self::new();
        for record in iter {
            collection.add(record);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::entities::{Skill, SkillField};
    use crate::editor::entity::EntityKind;

    fn skill(name: &str) -> Skill {
        Skill {
            name: name.to_string(),
            level: 3,
            category: None,
        }
    }

    fn names(c: &EntityCollection<Skill>) -> Vec<String> {
        c.all().into_iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_add_preserves_order() {
        let mut c = EntityCollection::new();
        c.add(skill("Go"));
        c.add(skill("Rust"));
        c.add(skill("SQL"));
        assert_eq!(names(&c), vec!["Go", "Rust", "SQL"]);
    }

    #[test]
    fn test_remove_keeps_survivor_order() {
        let mut c = EntityCollection::new();
        let a = c.add(skill("a"));
        let b = c.add(skill("b"));
        let _c3 = c.add(skill("c"));
        let d = c.add(skill("d"));
        c.remove(b).unwrap();
        c.add(skill("e"));
        c.remove(a).unwrap();
        c.remove(d).unwrap();
        assert_eq!(names(&c), vec!["c", "e"]);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut c = EntityCollection::new();
        let a = c.add(skill("a"));
        c.remove(a).unwrap();
        let b = c.add(skill("b"));
        assert_ne!(a, b);
        assert!(!c.contains(a));
    }

    #[test]
    fn test_update_only_touches_target() {
        let mut c = EntityCollection::new();
        let a = c.add(skill("a"));
        let b = c.add(skill("b"));
        c.update(b, SkillField::Level, 5).unwrap();
        assert_eq!(c.get(a).unwrap().level, 3);
        assert_eq!(c.get(b).unwrap().level, 5);
        assert_eq!(c.ids(), vec![a, b]);
    }

    #[test]
    fn test_stale_id_reports_not_found() {
        let mut c = EntityCollection::new();
        let a = c.add(skill("a"));
        c.remove(a).unwrap();
        assert!(matches!(
            c.update(a, SkillField::Name, "x"),
            Err(EditorError::EntityNotFound {
                kind: EntityKind::Skill,
                ..
            })
        ));
        assert!(c.remove(a).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn test_failed_update_leaves_record_unchanged() {
        let mut c = EntityCollection::new();
        let a = c.add(skill("a"));
        assert!(c.update(a, SkillField::Level, "high").is_err());
        assert_eq!(c.get(a), Some(&skill("a")));
    }

    #[test]
    fn test_continuing_collection_skips_issued_ids() {
        let mut old = EntityCollection::new();
        let stale = old.add(skill("Go"));
        old.remove(stale).unwrap();

        let mut fresh = EntityCollection::continuing(&old);
        let id = fresh.add(skill("Rust"));

        assert_ne!(id, stale);
        assert!(matches!(
            fresh.update(stale, SkillField::Level, 1),
            Err(EditorError::EntityNotFound { id: 1, .. })
        ));
        assert_eq!(names(&fresh), vec!["Rust"]);
    }
}
