//! Generational arena of GameObjects

use super::game_object::{GameObject, GameObjectId};
use slotmap::SlotMap;

/// GameObjects keyed by [`GameObjectId`], iterated in insertion order
#[derive(Debug, Default)]
pub struct GameObjects {
    slots: SlotMap<GameObjectId, GameObject>,
    order: Vec<GameObjectId>,
}

impl GameObjects {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, assigning its id
    pub fn insert(&mut self, object: GameObject) -> GameObjectId {
        let id = self.slots.insert(object);
        if let Some(object) = self.slots.get_mut(id) {
            object.assign_id(id);
        }
        self.order.push(id);
        id
    }

    /// Look up a live object
    pub fn get(&self, id: GameObjectId) -> Option<&GameObject> {
        self.slots.get(id)
    }

    /// Look up a live object mutably
    pub fn get_mut(&mut self, id: GameObjectId) -> Option<&mut GameObject> {
        self.slots.get_mut(id)
    }

    /// Two distinct objects borrowed mutably at once
    pub fn get_pair_mut(
        &mut self,
        first: GameObjectId,
        second: GameObjectId,
    ) -> Option<(&mut GameObject, &mut GameObject)> {
        let [a, b] = self.slots.get_disjoint_mut([first, second])?;
        Some((a, b))
    }

    /// True while `id` refers to an object in the collection
    pub fn contains(&self, id: GameObjectId) -> bool {
        self.slots.contains_key(id)
    }

    /// Number of objects, including ones marked removed but not yet swept
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> &[GameObjectId] {
        &self.order
    }

    /// Objects in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GameObject> {
        self.order.iter().filter_map(|id| self.slots.get(*id))
    }

    /// Objects mutably, in arena order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut GameObject> {
        self.slots.values_mut()
    }

    /// Visit every object mutably in insertion order
    pub fn for_each_ordered(&mut self, mut visit: impl FnMut(&mut GameObject)) {
        for id in &self.order {
            if let Some(object) = self.slots.get_mut(*id) {
                visit(object);
            }
        }
    }

    /// Erase an object, returning it
    pub fn take(&mut self, id: GameObjectId) -> Option<GameObject> {
        let object = self.slots.remove(id)?;
        self.order.retain(|other| *other != id);
        Some(object)
    }

    /// Ids of objects marked removed, in insertion order
    pub fn removed_ids(&self) -> Vec<GameObjectId> {
        self.iter()
            .filter(|object| object.is_removed())
            .filter_map(GameObject::id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_assigns_ids_in_order() {
        let mut objects = GameObjects::new();
        let a = objects.insert(GameObject::named("a"));
        let b = objects.insert(GameObject::named("b"));

        assert_eq!(objects.ids(), &[a, b]);
        assert_eq!(objects.get(b).and_then(GameObject::id), Some(b));
        let names: Vec<_> = objects.iter().map(GameObject::name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_stale_id_does_not_resolve() {
        let mut objects = GameObjects::new();
        let a = objects.insert(GameObject::named("a"));
        objects.take(a);
        let b = objects.insert(GameObject::named("b"));

        assert!(objects.get(a).is_none());
        assert!(!objects.contains(a));
        assert!(objects.contains(b));
    }

    #[test]
    fn test_pair_access_rejects_same_id() {
        let mut objects = GameObjects::new();
        let a = objects.insert(GameObject::named("a"));
        let b = objects.insert(GameObject::named("b"));

        assert!(objects.get_pair_mut(a, a).is_none());
        let (first, second) = objects.get_pair_mut(a, b).unwrap();
        assert_eq!(first.name(), "a");
        assert_eq!(second.name(), "b");
    }

    #[test]
    fn test_removed_ids_lists_marked_objects() {
        let mut objects = GameObjects::new();
        let a = objects.insert(GameObject::named("a"));
        let b = objects.insert(GameObject::named("b"));
        objects.get_mut(b).unwrap().remove();

        assert_eq!(objects.removed_ids(), vec![b]);
        assert!(!objects.removed_ids().contains(&a));
    }
}
