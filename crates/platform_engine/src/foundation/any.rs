//! Downcasting support for trait objects

use std::any::Any;

/// Upcast to [`Any`] so trait objects can be downcast to their concrete type.
///
/// Implemented for every `'static` type. Call it on a `&dyn Trait`, never on
/// the owning `Box`, or the box itself is what gets downcast.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
