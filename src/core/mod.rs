//! # Core Module
//!
//! Shared-ownership containers used by the renderer. Everything in this crate runs on
//! the event-loop thread, so the containers are built on `Rc` rather than `Arc`.
//!
//! ## Key Components
//! - `StResource`: reference-counted value behind a read/write guard
//! - `StSystem`: reference-counted boxed system behind a `RefCell`
//!
//! ## Usage
//! ```rust
//! use voxel_field::core::{StResource, StSystem};
//!
//! let counter = StResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let system = StSystem::new(Box::new(42u32));
//! assert_eq!(**system.get(), 42);
//! ```

pub mod st_resource;
pub mod st_system;

pub use st_resource::StResource;
pub use st_system::StSystem;
