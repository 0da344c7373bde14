//! Builders shared by the integration tests.

#![allow(dead_code)]

use sqltree_dict::{Dictionary, TableDef};
use sqltree_statement::ast::{
    Expr, Operation, Operator, Part, SelectField, SelectFrom, SelectTarget,
};
use sqltree_statement::{NodeKind, PartId, SqlStatement};

/// Pushes a literal-value expression under `parent`.
pub fn push_value(stmt: &mut SqlStatement, parent: PartId, text: &str) -> PartId {
    stmt.tree_mut().push(Some(parent), Part::Expr(Expr::value(text)))
}

/// Pushes an identifier expression under `parent`.
pub fn push_ident(stmt: &mut SqlStatement, parent: PartId, text: &str) -> PartId {
    stmt.tree_mut().push(Some(parent), Part::Expr(Expr::ident(text)))
}

/// Pushes an operation with literal operands under `parent`.
pub fn push_operation(
    stmt: &mut SqlStatement,
    parent: PartId,
    operator: Operator,
    operands: &[&str],
) -> PartId {
    let tree = stmt.tree_mut();
    let op = tree.push(
        Some(parent),
        Part::Operation(Operation {
            operator,
            operands: Vec::new(),
        }),
    );
    let operands: Vec<PartId> = operands
        .iter()
        .map(|text| tree.push(Some(op), Part::Expr(Expr::ident(*text))))
        .collect();
    match tree.part_mut(op) {
        Part::Operation(o) => o.operands = operands,
        _ => unreachable!(),
    }
    op
}

/// Adds a projection entry to a SELECT statement. `name` of "*" projects
/// everything; `table` qualifies the column.
pub fn add_select_field(
    stmt: &mut SqlStatement,
    name: &str,
    table: Option<&str>,
    alias: Option<&str>,
) -> PartId {
    let root = stmt.root();
    let tree = stmt.tree_mut();
    let text = match table {
        Some(table) => format!("{table}.{name}"),
        None => name.to_string(),
    };
    let field = tree.push(
        Some(root),
        Part::SelectField(SelectField {
            expr: None,
            field_name: Some(name.to_string()),
            table_name: table.map(str::to_string),
            as_alias: alias.map(str::to_string),
            binding: None,
        }),
    );
    let expr = tree.push(Some(field), Part::Expr(Expr::ident(text)));
    match tree.part_mut(field) {
        Part::SelectField(f) => f.expr = Some(expr),
        _ => unreachable!(),
    }
    match tree.part_mut(root) {
        Part::Select(s) => s.fields.push(field),
        _ => unreachable!(),
    }
    field
}

/// Adds a FROM target to a SELECT statement, creating the FROM clause on
/// first use. Returns the target's id.
pub fn add_from_target(stmt: &mut SqlStatement, table: &str, alias: Option<&str>) -> PartId {
    let root = stmt.root();
    let tree = stmt.tree_mut();
    let from = match tree.part(root) {
        Part::Select(s) => s.from,
        _ => unreachable!(),
    };
    let from = match from {
        Some(from) => from,
        None => {
            let from = tree.push(Some(root), Part::SelectFrom(SelectFrom::default()));
            match tree.part_mut(root) {
                Part::Select(s) => s.from = Some(from),
                _ => unreachable!(),
            }
            from
        }
    };
    let target = tree.push(
        Some(from),
        Part::SelectTarget(SelectTarget {
            expr: None,
            table_name: Some(table.to_string()),
            as_alias: alias.map(str::to_string),
            binding: None,
        }),
    );
    let expr = tree.push(Some(target), Part::Expr(Expr::ident(table)));
    match tree.part_mut(target) {
        Part::SelectTarget(t) => t.expr = Some(expr),
        _ => unreachable!(),
    }
    match tree.part_mut(from) {
        Part::SelectFrom(f) => f.targets.push(target),
        _ => unreachable!(),
    }
    target
}

/// `SELECT <columns> FROM <table>`.
pub fn select_from(table: &str, columns: &[&str]) -> SqlStatement {
    let mut stmt = SqlStatement::new(NodeKind::Select).unwrap();
    for column in columns {
        add_select_field(&mut stmt, column, None, None);
    }
    add_from_target(&mut stmt, table, None);
    stmt
}

/// A dictionary with a small shop schema.
pub fn shop_dictionary() -> Dictionary {
    let dict = Dictionary::new();
    dict.define_table(TableDef::with_columns(
        "customers",
        &["id", "name", "email"],
    ));
    dict.define_table(TableDef::with_columns(
        "orders",
        &["id", "customer_id", "total"],
    ));
    dict
}
