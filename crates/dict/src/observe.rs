//! Destruction observation.
//!
//! A caller holding a reference to a dictionary object (by id) can register a
//! callback that fires when that object is removed from the dictionary. The
//! registration is tied to the returned [`ObserverGuard`]; dropping the guard
//! removes the callback without firing it.

use std::sync::Weak;

use crate::{DictObjectId, Shared};

/// Identifier for one registered observer. Unique per dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ObserverId(pub(crate) u64);

/// Callback invoked when an observed object is removed from its dictionary.
pub type DestructionCallback = Box<dyn FnMut(DictObjectId) + Send>;

/// RAII handle for a destruction observer.
///
/// While the guard is alive, removing the observed object from the dictionary
/// invokes the registered callback. Dropping the guard unregisters the
/// callback. The guard holds only a weak reference to the dictionary, so it
/// never keeps the dictionary alive on its own.
pub struct ObserverGuard {
    pub(crate) shared: Weak<Shared>,
    pub(crate) object: DictObjectId,
    pub(crate) id: ObserverId,
}

impl ObserverGuard {
    /// The object this guard observes.
    pub fn object(&self) -> DictObjectId {
        self.object
    }
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.upgrade() {
            let mut state = shared.state.lock();
            if let Some(observers) = state.observers.get_mut(&self.object) {
                observers.retain(|(id, _)| *id != self.id);
                if observers.is_empty() {
                    state.observers.remove(&self.object);
                }
            }
        }
    }
}

impl std::fmt::Debug for ObserverGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverGuard")
            .field("object", &self.object)
            .field("id", &self.id)
            .finish()
    }
}
