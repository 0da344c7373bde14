//! JSON rendering of statement trees.
//!
//! The output mirrors the tree: one object per node, clause names as keys.
//! Optional clauses are omitted; a missing expression where one is always
//! reported (a CASE base expression, an operation operand) renders as
//! `null`. Nested statements render as `{"contents": ...}` so a sub-SELECT
//! looks the same wherever it appears.

use serde_json::{json, Map, Value};

use crate::ast::{Part, PartId, Tree};
use crate::registry;

fn opt_part(tree: &Tree, id: Option<PartId>) -> Value {
    match id {
        Some(id) => serialize_part(tree, id),
        None => Value::Null,
    }
}

fn part_list(tree: &Tree, ids: &[PartId]) -> Value {
    Value::Array(ids.iter().map(|id| serialize_part(tree, *id)).collect())
}

/// The `{"contents": ...}` wrapper used for statement nodes nested inside
/// expressions, INSERT sources and compound members.
fn nested_statement(tree: &Tree, id: PartId) -> Value {
    let contents = registry::contents_infos(tree.kind(id))
        .map(|info| (info.serialize)(tree, id))
        .unwrap_or(Value::Null);
    json!({ "contents": contents })
}

/// Serializes one part of a tree. Statement nodes get the nested form; use
/// the registry hooks for a top-level statement.
pub fn serialize_part(tree: &Tree, id: PartId) -> Value {
    let part = tree.part(id);
    if part.kind().is_statement() {
        return nested_statement(tree, id);
    }
    match part {
        Part::Expr(e) => {
            let mut map = Map::new();
            if let Some(cond) = e.cond {
                map.insert("operation".into(), serialize_part(tree, cond));
            } else if let Some(func) = e.func {
                map.insert("func".into(), serialize_part(tree, func));
            } else if let Some(select) = e.select {
                map.insert("select".into(), nested_statement(tree, select));
            } else if let Some(case_expr) = e.case_expr {
                map.insert("case".into(), serialize_part(tree, case_expr));
            } else {
                map.insert("value".into(), json_opt(&e.value));
                if let Some(spec) = &e.param_spec {
                    let mut pspec = Map::new();
                    pspec.insert("name".into(), json_opt(&spec.name));
                    if let Some(descr) = &spec.descr {
                        pspec.insert("descr".into(), json!(descr));
                    }
                    if let Some(data_type) = &spec.data_type {
                        pspec.insert("type".into(), json!(data_type));
                    }
                    pspec.insert("is_param".into(), json!(bool_str(spec.is_param)));
                    pspec.insert("nullok".into(), json!(bool_str(spec.nullok)));
                    map.insert("param_spec".into(), Value::Object(pspec));
                }
            }
            if let Some(cast_as) = &e.cast_as {
                map.insert("cast".into(), json!(cast_as));
            }
            if e.value_is_ident {
                map.insert("sqlident".into(), json!("TRUE"));
            }
            Value::Object(map)
        }
        Part::Field(f) => json!({ "field_name": f.field_name }),
        Part::Table(t) => json!({ "table_name": t.table_name }),
        Part::Function(f) => {
            let args = if f.args_list.is_empty() {
                Value::Null
            } else {
                part_list(tree, &f.args_list)
            };
            json!({ "function_name": f.function_name, "function_args": args })
        }
        Part::Operation(o) => {
            let mut map = Map::new();
            map.insert("operator".into(), json!(o.operator.as_str()));
            for (i, operand) in o.operands.iter().enumerate() {
                map.insert(format!("operand{i}"), serialize_part(tree, *operand));
            }
            Value::Object(map)
        }
        Part::Case(c) => {
            let body: Vec<Value> = c
                .when_list
                .iter()
                .zip(&c.then_list)
                .map(|(when, then)| {
                    json!({
                        "when": serialize_part(tree, *when),
                        "then": serialize_part(tree, *then),
                    })
                })
                .collect();
            json!({
                "base_expr": opt_part(tree, c.base_expr),
                "body": body,
                "else_expr": opt_part(tree, c.else_expr),
            })
        }
        Part::SelectField(f) => {
            let mut map = Map::new();
            map.insert("expr".into(), opt_part(tree, f.expr));
            if let Some(field_name) = &f.field_name {
                map.insert("field_name".into(), json!(field_name));
            }
            if let Some(table_name) = &f.table_name {
                map.insert("table_name".into(), json!(table_name));
            }
            if let Some(as_alias) = &f.as_alias {
                map.insert("as".into(), json!(as_alias));
            }
            Value::Object(map)
        }
        Part::SelectTarget(t) => {
            let mut map = Map::new();
            map.insert("expr".into(), opt_part(tree, t.expr));
            if let Some(table_name) = &t.table_name {
                map.insert("table_name".into(), json!(table_name));
            }
            if let Some(as_alias) = &t.as_alias {
                map.insert("as".into(), json!(as_alias));
            }
            Value::Object(map)
        }
        Part::SelectJoin(j) => {
            let mut map = Map::new();
            map.insert("join_type".into(), json!(j.join_type.as_str()));
            map.insert("join_pos".into(), json!(j.position.to_string()));
            if let Some(cond) = j.cond {
                map.insert("on_cond".into(), serialize_part(tree, cond));
            }
            if !j.using.is_empty() {
                map.insert("using".into(), part_list(tree, &j.using));
            }
            Value::Object(map)
        }
        Part::SelectFrom(f) => {
            let mut map = Map::new();
            map.insert("targets".into(), part_list(tree, &f.targets));
            if !f.joins.is_empty() {
                map.insert("joins".into(), part_list(tree, &f.joins));
            }
            Value::Object(map)
        }
        Part::SelectOrder(o) => {
            let mut map = Map::new();
            map.insert("expr".into(), opt_part(tree, o.expr));
            map.insert("sort".into(), json!(if o.asc { "ASC" } else { "DESC" }));
            if let Some(collation) = &o.collation_name {
                map.insert("collation".into(), json!(collation));
            }
            Value::Object(map)
        }
        _ => unreachable!("statement kinds handled above"),
    }
}

fn json_opt(s: &Option<String>) -> Value {
    match s {
        Some(s) => json!(s),
        None => Value::Null,
    }
}

fn bool_str(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

pub(crate) fn select_contents(tree: &Tree, id: PartId) -> Value {
    let Part::Select(s) = tree.part(id) else {
        unreachable!()
    };
    let mut map = Map::new();
    map.insert("distinct".into(), json!(bool_str(s.distinct)));
    if let Some(distinct_expr) = s.distinct_expr {
        map.insert("distinct_on".into(), serialize_part(tree, distinct_expr));
    }
    map.insert(
        "fields".into(),
        if s.fields.is_empty() {
            Value::Null
        } else {
            part_list(tree, &s.fields)
        },
    );
    if let Some(from) = s.from {
        map.insert("from".into(), serialize_part(tree, from));
    }
    if let Some(where_cond) = s.where_cond {
        map.insert("where".into(), serialize_part(tree, where_cond));
    }
    if !s.group_by.is_empty() {
        map.insert("group_by".into(), part_list(tree, &s.group_by));
    }
    if let Some(having_cond) = s.having_cond {
        map.insert("having".into(), serialize_part(tree, having_cond));
    }
    if !s.order_by.is_empty() {
        map.insert("order_by".into(), part_list(tree, &s.order_by));
    }
    if let Some(limit_count) = s.limit_count {
        map.insert("limit".into(), serialize_part(tree, limit_count));
        if let Some(limit_offset) = s.limit_offset {
            map.insert("offset".into(), serialize_part(tree, limit_offset));
        }
    }
    Value::Object(map)
}

pub(crate) fn insert_contents(tree: &Tree, id: PartId) -> Value {
    let Part::Insert(ins) = tree.part(id) else {
        unreachable!()
    };
    let mut map = Map::new();
    map.insert("table".into(), opt_part(tree, ins.table));
    map.insert(
        "fields".into(),
        if ins.fields.is_empty() {
            Value::Null
        } else {
            part_list(tree, &ins.fields)
        },
    );
    if !ins.values_list.is_empty() {
        let rows: Vec<Value> = ins
            .values_list
            .iter()
            .map(|row| part_list(tree, row))
            .collect();
        map.insert("values".into(), Value::Array(rows));
    }
    if let Some(select) = ins.select {
        map.insert("select".into(), nested_statement(tree, select));
    }
    if let Some(on_conflict) = &ins.on_conflict {
        map.insert("on_conflict".into(), json!(on_conflict));
    }
    Value::Object(map)
}

pub(crate) fn update_contents(tree: &Tree, id: PartId) -> Value {
    let Part::Update(u) = tree.part(id) else {
        unreachable!()
    };
    let mut map = Map::new();
    map.insert("table".into(), opt_part(tree, u.table));
    map.insert("fields".into(), part_list(tree, &u.fields));
    map.insert("expressions".into(), part_list(tree, &u.expr_list));
    if let Some(cond) = u.cond {
        map.insert("condition".into(), serialize_part(tree, cond));
    }
    if let Some(on_conflict) = &u.on_conflict {
        map.insert("on_conflict".into(), json!(on_conflict));
    }
    Value::Object(map)
}

pub(crate) fn delete_contents(tree: &Tree, id: PartId) -> Value {
    let Part::Delete(d) = tree.part(id) else {
        unreachable!()
    };
    let mut map = Map::new();
    map.insert("table".into(), opt_part(tree, d.table));
    if let Some(cond) = d.cond {
        map.insert("condition".into(), serialize_part(tree, cond));
    }
    Value::Object(map)
}

pub(crate) fn compound_contents(tree: &Tree, id: PartId) -> Value {
    let Part::Compound(c) = tree.part(id) else {
        unreachable!()
    };
    let stmts: Vec<Value> = c
        .stmts
        .iter()
        .map(|stmt| nested_statement(tree, *stmt))
        .collect();
    json!({
        "compound_type": c.compound_type.as_str(),
        "stmts": stmts,
    })
}

pub(crate) fn transaction_contents(tree: &Tree, id: PartId) -> Value {
    let trans = match tree.part(id) {
        Part::Begin(t)
        | Part::Commit(t)
        | Part::Rollback(t)
        | Part::Savepoint(t)
        | Part::RollbackSavepoint(t)
        | Part::DeleteSavepoint(t) => t,
        _ => unreachable!(),
    };
    let mut map = Map::new();
    if trans.isolation_level != crate::ast::IsolationLevel::Unknown {
        map.insert(
            "isolation_level".into(),
            json!(trans.isolation_level.as_str()),
        );
    }
    if let Some(trans_mode) = &trans.trans_mode {
        map.insert("trans_mode".into(), json!(trans_mode));
    }
    if let Some(trans_name) = &trans.trans_name {
        map.insert("trans_name".into(), json!(trans_name));
    }
    Value::Object(map)
}

pub(crate) fn unknown_contents(tree: &Tree, id: PartId) -> Value {
    let Part::Unknown(u) = tree.part(id) else {
        unreachable!()
    };
    json!({ "expressions": part_list(tree, &u.expressions) })
}
