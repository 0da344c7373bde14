//! Schema metadata dictionary.
//!
//! A [`Dictionary`] holds table and function definitions and hands out stable
//! [`DictObjectId`]s for them. Consumers that cache an id across calls can
//! register a destruction observer so they learn when the object is removed
//! and can drop their cached reference instead of dangling.
//!
//! The dictionary is cheap to clone (all clones share state) and safe to use
//! from multiple threads.

mod observe;
mod schema;

pub use observe::{DestructionCallback, ObserverGuard};
pub use schema::{ColumnDef, FunctionDef, TableDef};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use observe::ObserverId;
use parking_lot::Mutex;

/// Stable identifier for an object held by a [`Dictionary`].
///
/// Ids are never reused within a dictionary, even after the object they named
/// is removed and a same-named object is defined again.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DictObjectId(u64);

impl fmt::Display for DictObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct TableMeta {
    id: DictObjectId,
    def: TableDef,
    /// One id per column, parallel to `def.columns`.
    column_ids: Vec<DictObjectId>,
}

struct FunctionMeta {
    id: DictObjectId,
    def: FunctionDef,
}

pub(crate) struct State {
    next_object: u64,
    next_observer: u64,
    tables: BTreeMap<String, TableMeta>,
    functions: BTreeMap<(String, usize), FunctionMeta>,
    observers: HashMap<DictObjectId, Vec<(ObserverId, DestructionCallback)>>,
}

pub(crate) struct Shared {
    pub(crate) state: Mutex<State>,
}

/// A shared, thread-safe collection of schema metadata.
#[derive(Clone)]
pub struct Dictionary {
    shared: Arc<Shared>,
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary {
    /// Creates an empty dictionary.
    pub fn new() -> Self {
        Dictionary {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    next_object: 1,
                    next_observer: 1,
                    tables: BTreeMap::new(),
                    functions: BTreeMap::new(),
                    observers: HashMap::new(),
                }),
            }),
        }
    }

    /// Defines (or redefines) a table and returns its object id.
    ///
    /// Redefining a table removes the previous definition first, firing any
    /// destruction observers registered on the old table or its columns.
    pub fn define_table(&self, def: TableDef) -> DictObjectId {
        let name = def.name.clone();
        let doomed = self.remove_table_inner(&name).unwrap_or_default();
        let id = {
            let mut state = self.shared.state.lock();
            let id = state.fresh_id();
            let column_ids = def.columns.iter().map(|_| state.fresh_id()).collect();
            tracing::debug!(table = %def.name, %id, "define table");
            state.tables.insert(
                name,
                TableMeta {
                    id,
                    def,
                    column_ids,
                },
            );
            id
        };
        fire(doomed);
        id
    }

    /// Defines (or redefines) a function and returns its object id.
    pub fn define_function(&self, def: FunctionDef) -> DictObjectId {
        let key = (def.name.clone(), def.arity);
        let (id, doomed) = {
            let mut state = self.shared.state.lock();
            let doomed = match state.functions.remove(&key) {
                Some(old) => state.take_observers(&[old.id]),
                None => Vec::new(),
            };
            let id = state.fresh_id();
            tracing::debug!(function = %def.name, arity = def.arity, %id, "define function");
            state.functions.insert(key, FunctionMeta { id, def });
            (id, doomed)
        };
        fire(doomed);
        id
    }

    /// Removes a table (and its columns), firing destruction observers for
    /// every removed object. Returns `true` when the table existed.
    pub fn remove_table(&self, name: &str) -> bool {
        match self.remove_table_inner(name) {
            Some(doomed) => {
                fire(doomed);
                true
            }
            None => false,
        }
    }

    /// Removes a function definition, firing its destruction observers.
    /// Returns `true` when the function existed.
    pub fn remove_function(&self, name: &str, arity: usize) -> bool {
        let (existed, doomed) = {
            let mut state = self.shared.state.lock();
            match state.functions.remove(&(name.to_string(), arity)) {
                Some(old) => {
                    tracing::debug!(function = name, arity, "remove function");
                    let doomed = state.take_observers(&[old.id]);
                    (true, doomed)
                }
                None => (false, Vec::new()),
            }
        };
        fire(doomed);
        existed
    }

    /// Looks up a table by exact name.
    pub fn lookup_table(&self, name: &str) -> Option<DictObjectId> {
        self.shared.state.lock().tables.get(name).map(|t| t.id)
    }

    /// Looks up a column by table name and column name.
    pub fn lookup_column(&self, table: &str, column: &str) -> Option<DictObjectId> {
        let state = self.shared.state.lock();
        let meta = state.tables.get(table)?;
        meta.def
            .columns
            .iter()
            .position(|c| c.name == column)
            .map(|pos| meta.column_ids[pos])
    }

    /// Looks up a column within a table already resolved to an id.
    pub fn lookup_column_in(&self, table: DictObjectId, column: &str) -> Option<DictObjectId> {
        let state = self.shared.state.lock();
        let meta = state.tables.values().find(|t| t.id == table)?;
        meta.def
            .columns
            .iter()
            .position(|c| c.name == column)
            .map(|pos| meta.column_ids[pos])
    }

    /// Looks up a function by name and arity.
    pub fn lookup_function(&self, name: &str, arity: usize) -> Option<DictObjectId> {
        self.shared
            .state
            .lock()
            .functions
            .get(&(name.to_string(), arity))
            .map(|f| f.id)
    }

    /// Whether the dictionary currently holds an object with this id.
    pub fn contains(&self, id: DictObjectId) -> bool {
        let state = self.shared.state.lock();
        state.tables.values().any(|t| t.id == id || t.column_ids.contains(&id))
            || state.functions.values().any(|f| f.id == id)
    }

    /// Registers a callback fired when `object` is removed from the
    /// dictionary. The registration lasts as long as the returned guard.
    pub fn observe_destruction(
        &self,
        object: DictObjectId,
        callback: DestructionCallback,
    ) -> ObserverGuard {
        let id = {
            let mut state = self.shared.state.lock();
            let id = ObserverId(state.next_observer);
            state.next_observer += 1;
            state.observers.entry(object).or_default().push((id, callback));
            id
        };
        ObserverGuard {
            shared: Arc::downgrade(&self.shared),
            object,
            id,
        }
    }

    /// Number of live observer registrations on an object.
    pub fn observer_count(&self, object: DictObjectId) -> usize {
        self.shared
            .state
            .lock()
            .observers
            .get(&object)
            .map_or(0, Vec::len)
    }

    /// Removes the table and collects the callbacks to fire, without firing
    /// them. Callbacks must run after the lock is released so they can call
    /// back into the dictionary. `None` means the table did not exist.
    fn remove_table_inner(
        &self,
        name: &str,
    ) -> Option<Vec<(DictObjectId, DestructionCallback)>> {
        let mut state = self.shared.state.lock();
        let meta = state.tables.remove(name)?;
        tracing::debug!(table = name, "remove table");
        let mut ids = vec![meta.id];
        ids.extend_from_slice(&meta.column_ids);
        Some(state.take_observers(&ids))
    }
}

impl State {
    fn fresh_id(&mut self) -> DictObjectId {
        let id = DictObjectId(self.next_object);
        self.next_object += 1;
        id
    }

    fn take_observers(
        &mut self,
        ids: &[DictObjectId],
    ) -> Vec<(DictObjectId, DestructionCallback)> {
        let mut out = Vec::new();
        for id in ids {
            if let Some(list) = self.observers.remove(id) {
                for (_, cb) in list {
                    out.push((*id, cb));
                }
            }
        }
        out
    }
}

fn fire(doomed: Vec<(DictObjectId, DestructionCallback)>) {
    for (id, mut cb) in doomed {
        cb(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn define_and_lookup() {
        let dict = Dictionary::new();
        let customers = dict.define_table(TableDef::with_columns("customers", &["id", "name"]));
        assert_eq!(dict.lookup_table("customers"), Some(customers));
        assert_eq!(dict.lookup_table("orders"), None);
        assert!(dict.lookup_column("customers", "name").is_some());
        assert!(dict.lookup_column("customers", "missing").is_none());
    }

    #[test]
    fn function_keyed_by_arity() {
        let dict = Dictionary::new();
        dict.define_function(FunctionDef {
            name: "count".into(),
            arity: 1,
        });
        assert!(dict.lookup_function("count", 1).is_some());
        assert!(dict.lookup_function("count", 2).is_none());
    }

    #[test]
    fn removal_fires_observers_once() {
        let dict = Dictionary::new();
        let id = dict.define_table(TableDef::with_columns("t", &["a"]));
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = Arc::clone(&fired);
        let _guard = dict.observe_destruction(
            id,
            Box::new(move |_| {
                fired2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert!(dict.remove_table("t"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        // The object is gone; removing again is a no-op.
        assert!(!dict.remove_table("t"));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_guard_unregisters() {
        let dict = Dictionary::new();
        let id = dict.define_table(TableDef::with_columns("t", &["a"]));
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = Arc::clone(&fired);
        let guard = dict.observe_destruction(
            id,
            Box::new(move |_| {
                fired2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(dict.observer_count(id), 1);
        drop(guard);
        assert_eq!(dict.observer_count(id), 0);
        dict.remove_table("t");
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn redefine_invalidates_old_object() {
        let dict = Dictionary::new();
        let old = dict.define_table(TableDef::with_columns("t", &["a"]));
        let fired = Arc::new(AtomicUsize::new(0));
        let fired2 = Arc::clone(&fired);
        let _guard = dict.observe_destruction(
            old,
            Box::new(move |_| {
                fired2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let new = dict.define_table(TableDef::with_columns("t", &["a", "b"]));
        assert_ne!(old, new);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!dict.contains(old));
        assert!(dict.contains(new));
    }

    #[test]
    fn callback_may_reenter_dictionary() {
        let dict = Dictionary::new();
        let id = dict.define_table(TableDef::with_columns("t", &["a"]));
        let dict2 = dict.clone();
        let saw = Arc::new(AtomicUsize::new(0));
        let saw2 = Arc::clone(&saw);
        let _guard = dict.observe_destruction(
            id,
            Box::new(move |gone| {
                // Re-entrancy: the lock is released before callbacks run.
                assert!(!dict2.contains(gone));
                saw2.fetch_add(1, Ordering::SeqCst);
            }),
        );
        dict.remove_table("t");
        assert_eq!(saw.load(Ordering::SeqCst), 1);
    }
}
