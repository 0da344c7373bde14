//! Bindings between tree parts and dictionary objects.
//!
//! Dictionary validation attaches a [`Binding`] to every part that resolved
//! to a schema object. A binding never keeps the object alive: when the
//! dictionary removes the object, the binding is invalidated in place and
//! the statement's invalidation handler (if any) is notified. Dropping a
//! binding unregisters its observer.

use std::sync::Arc;

use parking_lot::Mutex;
use sqltree_dict::{DictObjectId, Dictionary, ObserverGuard};

use crate::PartId;

/// Callback invoked when a bound dictionary object is destroyed. Receives
/// the id of the part whose binding was invalidated.
pub type InvalidatedHandler = Arc<dyn Fn(PartId) + Send + Sync>;

/// A resolved reference to a dictionary object.
#[derive(Debug)]
pub struct Binding {
    slot: Arc<Mutex<Option<DictObjectId>>>,
    _guard: ObserverGuard,
}

impl Binding {
    /// Binds `part` to `object`, registering a destruction observer that
    /// invalidates the binding and then notifies `handler`.
    pub(crate) fn new(
        dict: &Dictionary,
        object: DictObjectId,
        part: PartId,
        handler: Option<InvalidatedHandler>,
    ) -> Binding {
        let slot = Arc::new(Mutex::new(Some(object)));
        let observed = Arc::clone(&slot);
        let guard = dict.observe_destruction(
            object,
            Box::new(move |_| {
                *observed.lock() = None;
                if let Some(handler) = &handler {
                    handler(part);
                }
            }),
        );
        Binding {
            slot,
            _guard: guard,
        }
    }

    /// The bound object, or `None` once the object has been destroyed.
    pub fn object(&self) -> Option<DictObjectId> {
        *self.slot.lock()
    }

    /// Whether the bound object still exists.
    pub fn is_valid(&self) -> bool {
        self.slot.lock().is_some()
    }
}

use crate::ast::{NodeKind, Part, Tree};
use crate::error::{Error, Result};
use crate::ident;

/// Resolves name-carrying parts against a dictionary and attaches bindings.
///
/// Fields bind through the table of their enclosing INSERT or UPDATE;
/// select fields resolve through the FROM targets of their enclosing
/// SELECT, by alias, by unique column, or (for `*`) through a single
/// target. Targets are bound on demand, since the projection is visited
/// before the FROM clause.
pub(crate) struct Binder<'a> {
    dict: &'a Dictionary,
    handler: Option<InvalidatedHandler>,
}

impl<'a> Binder<'a> {
    pub fn new(dict: &'a Dictionary, handler: Option<InvalidatedHandler>) -> Self {
        Binder { dict, handler }
    }

    pub fn bind_part(&self, tree: &mut Tree, id: PartId) -> Result<()> {
        match tree.part(id) {
            Part::Table(_) => self.bind_table(tree, id).map(|_| ()),
            Part::Field(_) => self.bind_field(tree, id),
            Part::Function(_) => self.bind_function(tree, id),
            Part::SelectTarget(_) => self.bind_select_target(tree, id).map(|_| ()),
            Part::SelectField(_) => self.bind_select_field(tree, id),
            _ => Ok(()),
        }
    }

    fn set_binding(&self, tree: &mut Tree, id: PartId, object: DictObjectId) {
        let binding = Binding::new(self.dict, object, id, self.handler.clone());
        match tree.part_mut(id) {
            Part::Field(f) => f.binding = Some(binding),
            Part::Table(t) => t.binding = Some(binding),
            Part::Function(f) => f.binding = Some(binding),
            Part::SelectField(f) => f.binding = Some(binding),
            Part::SelectTarget(t) => t.binding = Some(binding),
            _ => {}
        }
    }

    /// Dictionary lookup tolerating quoted names.
    fn lookup_table_obj(&self, name: &str) -> Option<DictObjectId> {
        self.dict.lookup_table(name).or_else(|| {
            let unquoted = ident::unquote(name);
            if unquoted == name {
                None
            } else {
                self.dict.lookup_table(unquoted)
            }
        })
    }

    fn lookup_column_obj(&self, table: DictObjectId, column: &str) -> Option<DictObjectId> {
        self.dict.lookup_column_in(table, column).or_else(|| {
            let unquoted = ident::unquote(column);
            if unquoted == column {
                None
            } else {
                self.dict.lookup_column_in(table, unquoted)
            }
        })
    }

    /// Resolves `name` to a table: by dictionary name first, then as a
    /// target alias within the enclosing SELECT.
    fn resolve_table_object(&self, tree: &Tree, id: PartId, name: &str) -> Option<DictObjectId> {
        if let Some(obj) = self.lookup_table_obj(name) {
            return Some(obj);
        }
        let select = tree.ancestor_of_kind(id, NodeKind::Select)?;
        let Part::Select(s) = tree.part(select) else {
            return None;
        };
        let Part::SelectFrom(from) = tree.part(s.from?) else {
            return None;
        };
        for target in &from.targets {
            if let Part::SelectTarget(t) = tree.part(*target) {
                if t.as_alias.as_deref() == Some(name) {
                    if let Some(obj) = t.table_name.as_deref().and_then(|n| self.lookup_table_obj(n))
                    {
                        return Some(obj);
                    }
                }
            }
        }
        None
    }

    fn bind_table(&self, tree: &mut Tree, id: PartId) -> Result<DictObjectId> {
        let name = match tree.part(id) {
            Part::Table(t) => {
                if let Some(obj) = t.binding.as_ref().and_then(Binding::object) {
                    return Ok(obj);
                }
                t.table_name.clone()
            }
            _ => unreachable!(),
        };
        let obj = self
            .resolve_table_object(tree, id, &name)
            .ok_or_else(|| Error::DictElementMissing(format!("table '{name}' not found")))?;
        self.set_binding(tree, id, obj);
        Ok(obj)
    }

    fn bind_field(&self, tree: &mut Tree, id: PartId) -> Result<()> {
        let field_name = match tree.part(id) {
            Part::Field(f) => f.field_name.clone(),
            _ => unreachable!(),
        };
        let mut ancestor = tree.parent(id);
        let stmt = loop {
            match ancestor {
                None => {
                    return Err(Error::StructureContents(
                        "field is not part of an INSERT or UPDATE statement".into(),
                    ))
                }
                Some(p) if matches!(tree.kind(p), NodeKind::Insert | NodeKind::Update) => break p,
                Some(p) => ancestor = tree.parent(p),
            }
        };
        let table = match tree.part(stmt) {
            Part::Insert(i) => i.table,
            Part::Update(u) => u.table,
            _ => unreachable!(),
        }
        .ok_or_else(|| Error::StructureContents("missing table in statement".into()))?;
        let table_obj = self.bind_table(tree, table)?;
        let column = self
            .lookup_column_obj(table_obj, &field_name)
            .ok_or_else(|| Error::DictElementMissing(format!("column '{field_name}' not found")))?;
        self.set_binding(tree, id, column);
        Ok(())
    }

    fn bind_function(&self, tree: &mut Tree, id: PartId) -> Result<()> {
        let (name, arity) = match tree.part(id) {
            Part::Function(f) => (f.function_name.clone(), f.args_list.len()),
            _ => unreachable!(),
        };
        let obj = self
            .dict
            .lookup_function(&name, arity)
            .or_else(|| {
                let unquoted = ident::unquote(&name);
                if unquoted == name {
                    None
                } else {
                    self.dict.lookup_function(unquoted, arity)
                }
            })
            .ok_or_else(|| {
                Error::DictElementMissing(format!("function '{name}' ({arity} args) not found"))
            })?;
        self.set_binding(tree, id, obj);
        Ok(())
    }

    /// The identifier a select field's expression carries, split at its
    /// table qualifier: "t.id" gives `(Some("t"), "id")`.
    fn ident_of_expr(&self, tree: &Tree, id: PartId) -> Option<(Option<String>, String)> {
        let Part::SelectField(f) = tree.part(id) else {
            return None;
        };
        let Part::Expr(e) = tree.part(f.expr?) else {
            return None;
        };
        if !e.value_is_ident {
            return None;
        }
        let (table, field) = ident::split_qualified(e.value.as_deref()?);
        Some((table.map(str::to_string), field.to_string()))
    }

    /// `Ok(None)` means the target does not name a table (a sub-select).
    fn bind_select_target(&self, tree: &mut Tree, id: PartId) -> Result<Option<DictObjectId>> {
        let name = match tree.part(id) {
            Part::SelectTarget(t) => {
                if let Some(obj) = t.binding.as_ref().and_then(Binding::object) {
                    return Ok(Some(obj));
                }
                match &t.table_name {
                    Some(name) => name.clone(),
                    None => return Ok(None),
                }
            }
            _ => unreachable!(),
        };
        let obj = self
            .resolve_table_object(tree, id, &name)
            .ok_or_else(|| Error::DictElementMissing(format!("table '{name}' not found")))?;
        self.set_binding(tree, id, obj);
        Ok(Some(obj))
    }

    fn bind_select_field(&self, tree: &mut Tree, id: PartId) -> Result<()> {
        let (mut field_name, mut table_name) = match tree.part(id) {
            Part::SelectField(f) => (f.field_name.clone(), f.table_name.clone()),
            _ => unreachable!(),
        };
        if field_name.is_none() {
            // A bare identifier expression names the column directly; split
            // off any table qualifier.
            if let Some((table, field)) = self.ident_of_expr(tree, id) {
                table_name = table;
                field_name = Some(field);
            }
        }
        let Some(field_name) = field_name else {
            // Computed field, nothing to resolve.
            return Ok(());
        };
        let starred = field_name == "*";

        if let Some(table_name) = table_name {
            let table_obj = self
                .resolve_table_object(tree, id, &table_name)
                .ok_or_else(|| {
                    Error::DictElementMissing(format!("table '{table_name}' not found"))
                })?;
            if starred {
                self.set_binding(tree, id, table_obj);
                return Ok(());
            }
            let column = self.lookup_column_obj(table_obj, &field_name).ok_or_else(|| {
                Error::DictElementMissing(format!("column '{field_name}' not found"))
            })?;
            self.set_binding(tree, id, column);
            return Ok(());
        }

        // Unqualified: search the enclosing SELECT's targets.
        let select = tree.ancestor_of_kind(id, NodeKind::Select).ok_or_else(|| {
            Error::StructureContents("select field is not part of a SELECT statement".into())
        })?;
        let targets: Vec<PartId> = match tree.part(select) {
            Part::Select(s) => match s.from {
                Some(from) => match tree.part(from) {
                    Part::SelectFrom(f) => f.targets.clone(),
                    _ => Vec::new(),
                },
                None => Vec::new(),
            },
            _ => unreachable!(),
        };
        let mut target_objs = Vec::new();
        for target in &targets {
            if let Some(obj) = self.bind_select_target(tree, *target)? {
                target_objs.push(obj);
            }
        }
        let mut found = None;
        for table_obj in &target_objs {
            if let Some(column) = self.lookup_column_obj(*table_obj, &field_name) {
                if found.is_some() {
                    return Err(Error::DictElementMissing(format!(
                        "could not identify table for field '{field_name}'"
                    )));
                }
                found = Some(column);
            }
        }
        match found {
            Some(column) => {
                self.set_binding(tree, id, column);
                Ok(())
            }
            // A lone target makes an unqualified '*' unambiguous.
            None if starred && target_objs.len() == 1 => {
                self.set_binding(tree, id, target_objs[0]);
                Ok(())
            }
            None => Err(Error::DictElementMissing(format!(
                "could not identify table for field '{field_name}'"
            ))),
        }
    }
}

/// Drops the binding of one part, if it carries one.
pub(crate) fn unbind_part(tree: &mut Tree, id: PartId) {
    match tree.part_mut(id) {
        Part::Field(f) => f.binding = None,
        Part::Table(t) => t.binding = None,
        Part::Function(f) => f.binding = None,
        Part::SelectField(f) => f.binding = None,
        Part::SelectTarget(t) => t.binding = None,
        _ => {}
    }
}
