//! Traversal order and coverage.

mod common;

use common::*;
use sqltree_statement::ast::{Expr, Operator, Part};
use sqltree_statement::{child_parts, foreach, Error, NodeKind, PartId, SqlStatement};

fn build_query() -> SqlStatement {
    // SELECT name FROM customers WHERE id = 1 ORDER BY name
    let mut stmt = select_from("customers", &["name"]);
    let root = stmt.root();
    let op = push_operation(&mut stmt, root, Operator::Eq, &["id", "1"]);
    let tree = stmt.tree_mut();
    let cond = tree.push(Some(root), Part::Expr(Expr::default()));
    match tree.part_mut(cond) {
        Part::Expr(e) => e.cond = Some(op),
        _ => unreachable!(),
    }
    let order_expr = tree.push(Some(root), Part::Expr(Expr::ident("name")));
    let order = tree.push(
        Some(root),
        Part::SelectOrder(sqltree_statement::ast::SelectOrder {
            expr: Some(order_expr),
            ..Default::default()
        }),
    );
    match tree.part_mut(root) {
        Part::Select(s) => {
            s.where_cond = Some(cond);
            s.order_by.push(order);
        }
        _ => unreachable!(),
    }
    stmt
}

#[test]
fn every_node_is_visited_exactly_once() {
    let stmt = build_query();
    let mut visited: Vec<PartId> = Vec::new();
    foreach(stmt.tree(), stmt.root(), &mut |_, id| {
        visited.push(id);
        Ok(())
    })
    .unwrap();
    assert_eq!(visited.len(), stmt.tree().len());
    let mut unique = visited.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), visited.len());
}

#[test]
fn children_come_before_parents() {
    let stmt = build_query();
    let mut visited: Vec<PartId> = Vec::new();
    foreach(stmt.tree(), stmt.root(), &mut |_, id| {
        visited.push(id);
        Ok(())
    })
    .unwrap();
    let position = |id: PartId| visited.iter().position(|v| *v == id).unwrap();
    for id in &visited {
        for child in child_parts(stmt.tree(), *id) {
            assert!(
                position(child) < position(*id),
                "{child} visited after parent {id}"
            );
        }
    }
    // The root contents node is visited last.
    assert_eq!(*visited.last().unwrap(), stmt.root());
}

#[test]
fn clause_order_within_select() {
    let stmt = build_query();
    let root = stmt.root();
    let children = child_parts(stmt.tree(), root);
    let kinds: Vec<NodeKind> = children.iter().map(|id| stmt.tree().kind(*id)).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::SelectField,
            NodeKind::SelectFrom,
            NodeKind::Expr,
            NodeKind::SelectOrder,
        ]
    );
}

#[test]
fn an_error_stops_the_walk() {
    let stmt = build_query();
    let mut visits = 0usize;
    let result = foreach(stmt.tree(), stmt.root(), &mut |tree, id| {
        visits += 1;
        if tree.kind(id) == NodeKind::Operation {
            return Err(Error::StructureContents("stop".into()));
        }
        Ok(())
    });
    assert!(result.is_err());
    assert!(visits < stmt.tree().len());
}

#[test]
fn parent_links_reach_the_root() {
    let stmt = build_query();
    let tree = stmt.tree();
    foreach(tree, stmt.root(), &mut |tree, id| {
        let mut cur = id;
        while let Some(parent) = tree.parent(cur) {
            cur = parent;
        }
        assert_eq!(cur, stmt.root());
        Ok(())
    })
    .unwrap();
}

#[test]
fn cloned_trees_are_independent() {
    let mut stmt = build_query();
    let copy = stmt.clone();
    assert_eq!(copy.tree().len(), stmt.tree().len());

    add_select_field(&mut stmt, "email", None, None);
    assert_eq!(copy.tree().len() + 1, stmt.tree().len());
    copy.check_structure().unwrap();
}
