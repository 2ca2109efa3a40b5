use std::{
    rc::Rc,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// Used for bookkeeping that several owners update, such as the per-buffer
/// upload statistics kept by the buffer registry.
///
/// # Examples
///
/// ```
/// use voxel_field::core::StResource;
///
/// let resource = StResource::new(vec![1, 2, 3]);
/// let clone = resource.clone();
///
/// clone.get_mut().push(4);
/// assert_eq!(resource.get().len(), 4);
/// ```
///
/// # Panics
/// - Panics if a read guard is held while acquiring a write guard on the same thread
/// - Panics if the lock is poisoned
pub struct StResource<T> {
    pub resource: Rc<RwLock<T>>,
}

impl<T> StResource<T> {
    /// Creates a new `StResource` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns a write guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn get_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
