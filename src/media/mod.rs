//! Transient resources for attachments.
//!
//! Rendering an attachment extracts its bytes from the archive into a resource the
//! presentation can point at. Resources belong to the batch that rendered them and must be
//! released when the batch leaves the window.
//!
//! [`ResourceHandle`] is deliberately not `Clone`: [`MediaStore::release`] takes it by
//! value, so a handle can be released at most once, and the window manager releases every
//! handle it owns when a batch is unloaded.

pub mod memory;
pub mod temp;

pub use memory::MemoryMediaStore;
pub use temp::TempMediaStore;
use uuid::Uuid;

use crate::error::Result;

/// Ownership token for one extracted attachment
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceHandle {
    id: Uuid,
    name: String,
    location: String,
}

impl ResourceHandle {
    pub(crate) fn new(id: Uuid, name: impl Into<String>, location: impl Into<String>) -> Self {
        Self { id, name: name.into(), location: location.into() }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Archive entry name the resource was extracted from
    pub fn name(&self) -> &str {
        &self.name
    }

    /// URL the presentation uses to reach the resource
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Creates and releases attachment resources
pub trait MediaStore {
    fn materialize(&mut self, name: &str, bytes: &[u8]) -> Result<ResourceHandle>;

    fn release(&mut self, handle: ResourceHandle);
}

/// A store shared with the caller, so counters and files stay inspectable after the store
/// has been handed to a session
impl<M: MediaStore + ?Sized> MediaStore for std::rc::Rc<std::cell::RefCell<M>> {
    fn materialize(&mut self, name: &str, bytes: &[u8]) -> Result<ResourceHandle> {
        self.borrow_mut().materialize(name, bytes)
    }

    fn release(&mut self, handle: ResourceHandle) {
        self.borrow_mut().release(handle)
    }
}
