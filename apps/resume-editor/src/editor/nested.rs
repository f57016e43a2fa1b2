//! Positional edits of the string arrays embedded in an entity, such as
//! an experience's achievements or a project's technologies.
//!
//! Only fields an entity declares as its `ListField` can be addressed,
//! so kinds without string arrays expose no nested operations at all.
//! Entries are addressed by index; nothing outside the parent record
//! refers to an individual entry.

use crate::editor::collection::{EntityCollection, EntityId};
use crate::editor::entity::Entity;
use crate::errors::EditorError;

impl<T: Entity> EntityCollection<T> {
    /// Appends an empty entry and returns its index.
    pub fn append_item(&mut self, parent: EntityId<T>, field: T::ListField) -> Result<usize, EditorError> {
        let list = self.get_mut(parent)?.list_mut(field);
        list.push(String::new());
        Ok(list.len() - 1)
    }

    pub fn update_item(
        &mut self,
        parent: EntityId<T>,
        field: T::ListField,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        let list = self.get_mut(parent)?.list_mut(field);
        let len = list.len();
        let slot = list
            .get_mut(index)
            .ok_or_else(|| out_of_range::<T>(field, index, len))?;
        *slot = value.into();
        Ok(())
    }

    /// Removes the entry at `index`; later entries shift down by one.
    pub fn remove_item(
        &mut self,
        parent: EntityId<T>,
        field: T::ListField,
        index: usize,
    ) -> Result<String, EditorError> {
        let list = self.get_mut(parent)?.list_mut(field);
        if index >= list.len() {
            return Err(out_of_range::<T>(field, index, list.len()));
        }
        Ok(list.remove(index))
    }

    pub fn items(&self, parent: EntityId<T>, field: T::ListField) -> Option<&[String]> {
        self.get(parent).map(|record| record.list(field).as_slice())
    }
}

fn out_of_range<T: Entity>(field: T::ListField, index: usize, len: usize) -> EditorError {
    EditorError::IndexOutOfRange {
        kind: T::KIND,
        field: T::list_name(field),
        index,
        len,
    }
}

#[cfg(test)]
mod tests {
    use crate::editor::collection::EntityCollection;
    use crate::editor::entities::{Experience, ExperienceList, Project, ProjectList};
    use crate::errors::EditorError;

    #[test]
    fn test_append_update_remove() {
        let mut c = EntityCollection::new();
        let id = c.add(Experience::default());

        assert_eq!(c.append_item(id, ExperienceList::Achievements).unwrap(), 0);
        assert_eq!(c.append_item(id, ExperienceList::Achievements).unwrap(), 1);
        c.update_item(id, ExperienceList::Achievements, 0, "Cut p99 latency by 40%")
            .unwrap();
        c.update_item(id, ExperienceList::Achievements, 1, "Led a team of 4")
            .unwrap();
        let removed = c.remove_item(id, ExperienceList::Achievements, 0).unwrap();

        assert_eq!(removed, "Cut p99 latency by 40%");
        assert_eq!(
            c.items(id, ExperienceList::Achievements).unwrap(),
            ["Led a team of 4".to_string()]
        );
        assert!(c.items(id, ExperienceList::Technologies).unwrap().is_empty());
    }

    #[test]
    fn test_lists_are_independent() {
        let mut c = EntityCollection::new();
        let id = c.add(Experience::default());
        c.append_item(id, ExperienceList::Technologies).unwrap();
        c.update_item(id, ExperienceList::Technologies, 0, "Rust").unwrap();
        assert!(c.get(id).unwrap().achievements.is_empty());
        assert_eq!(c.get(id).unwrap().technologies, vec!["Rust"]);
    }

    #[test]
    fn test_index_out_of_range() {
        let mut c = EntityCollection::new();
        let id = c.add(Project::default());
        let err = c
            .update_item(id, ProjectList::Technologies, 0, "Rust")
            .unwrap_err();
        assert!(matches!(
            err,
            EditorError::IndexOutOfRange {
                field: "technologies",
                index: 0,
                len: 0,
                ..
            }
        ));
        assert!(c.remove_item(id, ProjectList::Technologies, 3).is_err());
    }

    #[test]
    fn test_missing_parent() {
        let mut c = EntityCollection::new();
        let id = c.add(Project::default());
        c.remove(id).unwrap();
        assert!(matches!(
            c.append_item(id, ProjectList::Technologies),
            Err(EditorError::EntityNotFound { .. })
        ));
        assert!(c.items(id, ProjectList::Technologies).is_none());
    }
}
