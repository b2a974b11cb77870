//! GameObject: an owning container of components plus one transform

use super::component::{Component, ComponentError};
use super::context::GameContext;
use crate::foundation::math::Transform;
use crate::render::RenderContext;

slotmap::new_key_type! {
    /// Generational identity of a GameObject inside a scene.
    ///
    /// Stale ids (of swept objects) never resolve to a different object.
    pub struct GameObjectId;
}

/// Owning container of components and one local transform
#[derive(Default)]
pub struct GameObject {
    name: String,
    id: Option<GameObjectId>,
    transform: Transform,
    components: Vec<Option<Box<dyn Component>>>,
    initialized: bool,
    removed: bool,
}

impl std::fmt::Debug for GameObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameObject")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("position", &self.transform.position)
            .field("components", &self.components.len())
            .field("removed", &self.removed)
            .finish()
    }
}

impl GameObject {
    /// Create an empty, unnamed object
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object with a diagnostic name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the initial transform
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a component, builder style
    pub fn with_component<T: Component>(mut self, component: T) -> Result<Self, ComponentError> {
        self.add_component(component)?;
        Ok(self)
    }

    /// Attach a component.
    ///
    /// Fails after init or when a component of the same type is present.
    /// Components added from another component's `init` are initialized in
    /// the same pass.
    pub fn add_component<T: Component>(&mut self, component: T) -> Result<(), ComponentError> {
        let type_name = std::any::type_name::<T>();
        if self.initialized {
            return Err(ComponentError::AlreadyInitialized(type_name));
        }
        if self.has::<T>() {
            return Err(ComponentError::Duplicate(type_name));
        }
        self.components.push(Some(Box::new(component)));
        Ok(())
    }

    /// Diagnostic name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scene identity, assigned on insertion
    pub fn id(&self) -> Option<GameObjectId> {
        self.id
    }

    /// Local transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable local transform
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// First component of type `T`.
    ///
    /// A component looking itself up from inside its own hook gets `None`,
    /// since it is detached while the hook runs.
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.components
            .iter()
            .flatten()
            .find_map(|component| (**component).as_any().downcast_ref::<T>())
    }

    /// First component of type `T`, mutably
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.components
            .iter_mut()
            .flatten()
            .find_map(|component| (**component).as_any_mut().downcast_mut::<T>())
    }

    /// Transform and component `T` borrowed together
    pub fn split_mut<T: Component>(&mut self) -> Option<(&mut Transform, &mut T)> {
        let component = self
            .components
            .iter_mut()
            .flatten()
            .find_map(|component| (**component).as_any_mut().downcast_mut::<T>())?;
        Some((&mut self.transform, component))
    }

    /// True when a component of type `T` is attached
    pub fn has<T: Component>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Mark for removal; the object is swept at the next flush
    pub fn remove(&mut self) {
        self.removed = true;
    }

    /// Marked for removal
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Initialized and not yet deinitialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn assign_id(&mut self, id: GameObjectId) {
        self.id = Some(id);
    }

    pub(crate) fn init(&mut self, ctx: &mut GameContext<'_>) {
        if self.initialized {
            log::warn!("GameObject '{}' initialized twice", self.name);
            return;
        }
        let mut index = 0;
        while index < self.components.len() {
            self.with_detached(index, |component, object| component.init(object, ctx));
            index += 1;
        }
        self.initialized = true;
    }

    pub(crate) fn update(&mut self, ctx: &mut GameContext<'_>) {
        if !self.initialized || self.removed {
            return;
        }
        for index in 0..self.components.len() {
            self.with_detached(index, |component, object| component.update(object, ctx));
        }
    }

    pub(crate) fn deinit(&mut self, ctx: &mut GameContext<'_>) {
        if !self.initialized {
            return;
        }
        for index in 0..self.components.len() {
            self.with_detached(index, |component, object| component.deinit(object, ctx));
        }
        self.initialized = false;
    }

    /// Render every component inside this object's transform
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        ctx.push_transform(&self.transform);
        for component in self.components.iter().flatten() {
            component.render(self, ctx);
        }
        ctx.pop_transform();
    }

    fn with_detached(
        &mut self,
        index: usize,
        hook: impl FnOnce(&mut dyn Component, &mut GameObject),
    ) {
        let Some(mut component) = self.components.get_mut(index).and_then(Option::take) else {
            return;
        };
        hook(&mut *component, self);
        self.components[index] = Some(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec2;

    struct Marker(u32);
    impl Component for Marker {}

    struct Other;
    impl Component for Other {}

    #[test]
    fn test_typed_lookup() {
        let object = GameObject::named("tracked")
            .with_component(Marker(7))
            .unwrap()
            .with_component(Other)
            .unwrap();

        assert_eq!(object.get::<Marker>().map(|m| m.0), Some(7));
        assert!(object.has::<Other>());
        assert_eq!(object.component_count(), 2);
    }

    #[test]
    fn test_lookup_miss_returns_none() {
        let object = GameObject::new().with_component(Other).unwrap();
        assert!(object.get::<Marker>().is_none());
    }

    #[test]
    fn test_duplicate_component_rejected() {
        let mut object = GameObject::new();
        object.add_component(Marker(1)).unwrap();
        assert!(matches!(
            object.add_component(Marker(2)),
            Err(ComponentError::Duplicate(_))
        ));
        assert_eq!(object.get::<Marker>().map(|m| m.0), Some(1));
    }

    #[test]
    fn test_split_mut_borrows_transform_and_component() {
        let mut object = GameObject::new().with_component(Marker(0)).unwrap();
        let (transform, marker) = object.split_mut::<Marker>().unwrap();
        transform.position = Vec2::new(1.0, 2.0);
        marker.0 = 3;
        assert_eq!(object.transform().position, Vec2::new(1.0, 2.0));
        assert_eq!(object.get::<Marker>().map(|m| m.0), Some(3));
    }

    #[test]
    fn test_remove_marks_only() {
        let mut object = GameObject::new();
        assert!(!object.is_removed());
        object.remove();
        assert!(object.is_removed());
    }
}
