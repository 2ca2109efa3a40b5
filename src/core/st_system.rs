use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded container for long-lived systems such as the GPU device,
/// the queue and the buffer registry.
///
/// Cloning an `StSystem` clones the handle, not the system, so every renderer
/// component that needs the device can hold its own handle to the same one.
///
/// # Examples
///
/// ```rust
/// use voxel_field::core::StSystem;
///
/// let system = StSystem::new(Box::new(42u32));
/// let handle = system.clone();
///
/// *handle.get_mut() = Box::new(100u32);
/// assert_eq!(**system.get(), 100);
/// ```
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StSystem<T: ?Sized> {
    pub system: Rc<RefCell<Box<T>>>,
}

impl<T: ?Sized> StSystem<T> {
    /// Creates a new `StSystem` containing the given boxed system.
    pub fn new(system: Box<T>) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Returns an immutable reference to the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    pub fn get(&self) -> Ref<'_, Box<T>> {
        self.system.borrow()
    }

    /// Returns a mutable reference to the contained system.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    pub fn get_mut(&self) -> RefMut<'_, Box<T>> {
        self.system.borrow_mut()
    }
}

impl<T: ?Sized> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}
