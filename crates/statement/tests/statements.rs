//! Statement-level rules for INSERT, UPDATE, DELETE, COMPOUND, the
//! transaction kinds and unparsed statements.

mod common;

use common::*;
use sqltree_statement::ast::{
    CompoundType, Expr, Field, Part, SelectContents, Table, TransactionContents,
};
use sqltree_statement::{Error, NodeKind, PartId, SqlStatement};

fn assert_structure_err(stmt: &SqlStatement, needle: &str) {
    match stmt.check_structure() {
        Err(Error::StructureContents(msg)) => {
            assert!(msg.contains(needle), "unexpected message: {msg}")
        }
        other => panic!("expected structure error containing '{needle}', got {other:?}"),
    }
}

fn insert_into(table: &str, columns: &[&str], rows: &[&[&str]]) -> SqlStatement {
    let mut stmt = SqlStatement::new(NodeKind::Insert).unwrap();
    let root = stmt.root();
    let tree = stmt.tree_mut();
    let table = tree.push(Some(root), Part::Table(Table::new(table)));
    let fields: Vec<PartId> = columns
        .iter()
        .map(|c| tree.push(Some(root), Part::Field(Field::new(*c))))
        .collect();
    let values_list: Vec<Vec<PartId>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|v| tree.push(Some(root), Part::Expr(Expr::value(*v))))
                .collect()
        })
        .collect();
    match tree.part_mut(root) {
        Part::Insert(i) => {
            i.table = Some(table);
            i.fields = fields;
            i.values_list = values_list;
        }
        _ => unreachable!(),
    }
    stmt
}

#[test]
fn valid_insert_passes() {
    let stmt = insert_into("customers", &["id", "name"], &[&["1", "'ann'"]]);
    stmt.check_structure().unwrap();
}

#[test]
fn insert_needs_a_table() {
    let mut stmt = SqlStatement::new(NodeKind::Insert).unwrap();
    let root = stmt.root();
    let value = push_value(&mut stmt, root, "1");
    match stmt.tree_mut().part_mut(root) {
        Part::Insert(i) => i.values_list.push(vec![value]),
        _ => unreachable!(),
    }
    assert_structure_err(&stmt, "needs a table");
}

#[test]
fn insert_rejects_both_values_and_select() {
    let mut stmt = insert_into("customers", &[], &[&["1"]]);
    let root = stmt.root();
    let tree = stmt.tree_mut();
    // A structurally valid single-column source SELECT.
    let select = tree.push(Some(root), Part::Select(SelectContents::default()));
    let field = tree.push(
        Some(select),
        Part::SelectField(sqltree_statement::ast::SelectField::default()),
    );
    let expr = tree.push(Some(field), Part::Expr(Expr::ident("id")));
    match tree.part_mut(field) {
        Part::SelectField(f) => f.expr = Some(expr),
        _ => unreachable!(),
    }
    match tree.part_mut(select) {
        Part::Select(s) => s.fields.push(field),
        _ => unreachable!(),
    }
    match tree.part_mut(root) {
        Part::Insert(i) => i.select = Some(select),
        _ => unreachable!(),
    }
    assert_structure_err(&stmt, "values to insert and SELECT");
}

#[test]
fn insert_rows_must_be_same_length() {
    let stmt = insert_into("customers", &[], &[&["1", "2"], &["3"]]);
    assert_structure_err(&stmt, "same length");
}

#[test]
fn insert_row_length_must_match_fields() {
    let stmt = insert_into("customers", &["id", "name"], &[&["1"]]);
    assert_structure_err(&stmt, "target columns and expressions");
}

#[test]
fn insert_with_fields_needs_values() {
    let stmt = insert_into("customers", &["id"], &[]);
    assert_structure_err(&stmt, "missing values");
}

#[test]
fn insert_column_count_checked_against_select() {
    let mut stmt = insert_into("customers", &["id", "name"], &[]);
    let root = stmt.root();
    let source = {
        let tree = stmt.tree_mut();
        tree.push(Some(root), Part::Select(SelectContents::default()))
    };
    // Give the source SELECT a single projected column.
    {
        let tree = stmt.tree_mut();
        let field = tree.push(
            Some(source),
            Part::SelectField(sqltree_statement::ast::SelectField {
                expr: None,
                field_name: Some("id".into()),
                table_name: None,
                as_alias: None,
                binding: None,
            }),
        );
        let expr = tree.push(Some(field), Part::Expr(Expr::ident("id")));
        match tree.part_mut(field) {
            Part::SelectField(f) => f.expr = Some(expr),
            _ => unreachable!(),
        }
        match tree.part_mut(source) {
            Part::Select(s) => s.fields.push(field),
            _ => unreachable!(),
        }
        match tree.part_mut(root) {
            Part::Insert(i) => i.select = Some(source),
            _ => unreachable!(),
        }
    }
    assert_structure_err(&stmt, "target columns and expressions");
}

#[test]
fn update_requires_table_and_pairs() {
    let mut stmt = SqlStatement::new(NodeKind::Update).unwrap();
    let root = stmt.root();
    {
        let tree = stmt.tree_mut();
        let field = tree.push(Some(root), Part::Field(Field::new("name")));
        let value = tree.push(Some(root), Part::Expr(Expr::value("'bob'")));
        match tree.part_mut(root) {
            Part::Update(u) => {
                u.fields.push(field);
                u.expr_list.push(value);
            }
            _ => unreachable!(),
        }
    }
    assert_structure_err(&stmt, "needs a table");

    let table = {
        let tree = stmt.tree_mut();
        tree.push(Some(root), Part::Table(Table::new("customers")))
    };
    match stmt.tree_mut().part_mut(root) {
        Part::Update(u) => u.table = Some(table),
        _ => unreachable!(),
    }
    stmt.check_structure().unwrap();

    // One more SET column than expressions.
    let extra = {
        let tree = stmt.tree_mut();
        tree.push(Some(root), Part::Field(Field::new("email")))
    };
    match stmt.tree_mut().part_mut(root) {
        Part::Update(u) => u.fields.push(extra),
        _ => unreachable!(),
    }
    assert_structure_err(&stmt, "same number of target columns");
}

#[test]
fn update_must_set_something() {
    let mut stmt = SqlStatement::new(NodeKind::Update).unwrap();
    let root = stmt.root();
    let table = {
        let tree = stmt.tree_mut();
        tree.push(Some(root), Part::Table(Table::new("customers")))
    };
    match stmt.tree_mut().part_mut(root) {
        Part::Update(u) => u.table = Some(table),
        _ => unreachable!(),
    }
    assert_structure_err(&stmt, "does not set any value");
}

#[test]
fn delete_requires_table() {
    let stmt = SqlStatement::new(NodeKind::Delete).unwrap();
    assert_structure_err(&stmt, "needs a table");
}

fn compound_of(counts: &[usize]) -> SqlStatement {
    let mut stmt = SqlStatement::new(NodeKind::Compound).unwrap();
    let root = stmt.root();
    let tree = stmt.tree_mut();
    let mut stmts = Vec::new();
    for count in counts {
        let select = tree.push(Some(root), Part::Select(SelectContents::default()));
        for i in 0..*count {
            let field = tree.push(
                Some(select),
                Part::SelectField(sqltree_statement::ast::SelectField::default()),
            );
            let expr = tree.push(Some(field), Part::Expr(Expr::ident(format!("c{i}"))));
            match tree.part_mut(field) {
                Part::SelectField(f) => f.expr = Some(expr),
                _ => unreachable!(),
            }
            match tree.part_mut(select) {
                Part::Select(s) => s.fields.push(field),
                _ => unreachable!(),
            }
        }
        stmts.push(select);
    }
    match tree.part_mut(root) {
        Part::Compound(c) => {
            c.compound_type = CompoundType::Union;
            c.stmts = stmts;
        }
        _ => unreachable!(),
    }
    stmt
}

#[test]
fn compound_needs_members() {
    let stmt = compound_of(&[]);
    assert_structure_err(&stmt, "COMPOUND");
}

#[test]
fn compound_members_need_matching_widths() {
    compound_of(&[2, 2]).check_structure().unwrap();
    assert_structure_err(&compound_of(&[2, 3]), "same number of columns");
}

#[test]
fn compound_members_must_be_selects() {
    let mut stmt = compound_of(&[1]);
    let root = stmt.root();
    let tree = stmt.tree_mut();
    // Structurally fine on its own, but not a SELECT or COMPOUND.
    let rogue = tree.push(Some(root), Part::Begin(TransactionContents::default()));
    match tree.part_mut(root) {
        Part::Compound(c) => c.stmts.push(rogue),
        _ => unreachable!(),
    }
    assert_structure_err(&stmt, "SELECT or COMPOUND");
}

#[test]
fn plain_transaction_statements_pass_empty() {
    for kind in [NodeKind::Begin, NodeKind::Commit, NodeKind::Rollback] {
        let stmt = SqlStatement::new(kind).unwrap();
        stmt.check_structure().unwrap();
    }
}

#[test]
fn savepoint_kinds_require_a_name() {
    for kind in [
        NodeKind::Savepoint,
        NodeKind::RollbackSavepoint,
        NodeKind::DeleteSavepoint,
    ] {
        let mut stmt = SqlStatement::new(kind).unwrap();
        assert_structure_err(&stmt, "savepoint name");

        let root = stmt.root();
        let set_name = |t: &mut TransactionContents| t.trans_name = Some("sp1".into());
        match stmt.tree_mut().part_mut(root) {
            Part::Savepoint(t) | Part::RollbackSavepoint(t) | Part::DeleteSavepoint(t) => {
                set_name(t)
            }
            _ => unreachable!(),
        }
        stmt.check_structure().unwrap();
    }
}

#[test]
fn unknown_statement_needs_content() {
    let mut stmt = SqlStatement::new(NodeKind::Unknown).unwrap();
    assert_structure_err(&stmt, "does not contain any part");

    let root = stmt.root();
    let expr = push_value(&mut stmt, root, "VACUUM");
    match stmt.tree_mut().part_mut(root) {
        Part::Unknown(u) => u.expressions.push(expr),
        _ => unreachable!(),
    }
    stmt.check_structure().unwrap();
}

#[test]
fn statements_cannot_be_built_from_part_kinds() {
    assert!(matches!(
        SqlStatement::new(NodeKind::Expr),
        Err(Error::Unimplemented(NodeKind::Expr))
    ));
}
