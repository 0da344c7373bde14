//! Statement container.

use std::fmt;

use serde_json::{json, Value};
use sqltree_dict::Dictionary;

use crate::ast::{NodeKind, PartId, Tree};
use crate::binding::{unbind_part, Binder, InvalidatedHandler};
use crate::error::Result;
use crate::{ident, registry, traverse, validate};

/// One SQL statement: its kind, the source text it came from (if any) and
/// the tree describing its structure.
///
/// The tree is built through [`tree_mut`](SqlStatement::tree_mut) by pushing
/// parts under the root contents node. [`check_structure`] validates the
/// tree alone; [`check_validity`] additionally resolves every named schema
/// object against a dictionary and leaves bindings in place.
pub struct SqlStatement {
    kind: NodeKind,
    sql: Option<String>,
    tree: Tree,
    root: PartId,
    bound_dict: Option<Dictionary>,
}

impl SqlStatement {
    /// Creates an empty statement of the given kind. Fails for part kinds,
    /// which have no contents to construct.
    pub fn new(kind: NodeKind) -> Result<Self> {
        let info = registry::contents_infos(kind)?;
        let mut tree = Tree::new();
        let root = tree.push(None, (info.construct)());
        Ok(SqlStatement {
            kind,
            sql: None,
            tree,
            root,
            bound_dict: None,
        })
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn sql(&self) -> Option<&str> {
        self.sql.as_deref()
    }

    /// Stores the source text, trailing whitespace trimmed.
    pub fn set_sql(&mut self, sql: impl AsRef<str>) {
        self.sql = Some(ident::chomp(sql.as_ref()).to_string());
    }

    /// The root contents node.
    pub fn root(&self) -> PartId {
        self.root
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Checks every node of the tree against the structural rules, children
    /// first. The first violation aborts the walk.
    pub fn check_structure(&self) -> Result<()> {
        traverse::foreach(&self.tree, self.root, &mut |tree, id| {
            validate::check_part(tree, id)
        })
    }

    /// Checks structure, then resolves every named schema object against
    /// `dict` and binds it. On success the statement holds on to the
    /// dictionary; `handler` is invoked with the part id whenever a bound
    /// object is later destroyed. On failure no bindings remain.
    pub fn check_validity(
        &mut self,
        dict: &Dictionary,
        handler: Option<InvalidatedHandler>,
    ) -> Result<()> {
        self.check_structure()?;
        self.check_clean();
        let binder = Binder::new(dict, handler);
        let bound = traverse::foreach_mut(&mut self.tree, self.root, &mut |tree, id| {
            binder.bind_part(tree, id)
        });
        match bound {
            Ok(()) => {
                tracing::debug!(kind = %self.kind, "statement validated against dictionary");
                self.bound_dict = Some(dict.clone());
                Ok(())
            }
            Err(err) => {
                self.check_clean();
                Err(err)
            }
        }
    }

    /// Drops every binding and the dictionary reference. Idempotent.
    pub fn check_clean(&mut self) {
        let walked = traverse::foreach_mut(&mut self.tree, self.root, &mut |tree, id| {
            unbind_part(tree, id);
            Ok(())
        });
        debug_assert!(walked.is_ok());
        self.bound_dict = None;
    }

    /// Whether the statement currently holds bindings from a validation.
    pub fn is_bound(&self) -> bool {
        self.bound_dict.is_some()
    }

    pub fn bound_dict(&self) -> Option<&Dictionary> {
        self.bound_dict.as_ref()
    }

    /// Renders the statement as JSON: source text, kind name and the full
    /// contents tree.
    pub fn serialize(&self) -> Result<Value> {
        let info = registry::contents_infos(self.kind)?;
        Ok(json!({
            "sql": self.sql.as_deref(),
            "stmt_type": info.name,
            "contents": (info.serialize)(&self.tree, self.root),
        }))
    }
}

/// Copies share no bindings: the clone starts out unbound and must be
/// validated again before its parts reference dictionary objects.
impl Clone for SqlStatement {
    fn clone(&self) -> Self {
        // Cloning a part clears its binding, so the copied tree is unbound.
        SqlStatement {
            kind: self.kind,
            sql: self.sql.clone(),
            tree: self.tree.clone(),
            root: self.root,
            bound_dict: None,
        }
    }
}

impl fmt::Debug for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlStatement")
            .field("kind", &self.kind)
            .field("sql", &self.sql)
            .field("nodes", &self.tree.len())
            .field("bound", &self.is_bound())
            .finish()
    }
}
