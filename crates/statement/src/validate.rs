//! Structural checker.
//!
//! [`check_part`] verifies one node against the rules that hold regardless
//! of any schema: operand counts, clause pairings, identifier syntax. The
//! statement-level rules (a SELECT projects at least one field, an INSERT
//! has a table, ...) are registered per kind in the contents registry and
//! dispatched from here when the walk reaches a contents node.

use crate::ast::{Operator, Part, PartId, Tree};
use crate::error::{Error, Result};
use crate::{ident, registry};

fn structure(msg: impl Into<String>) -> Error {
    Error::StructureContents(msg.into())
}

fn check_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        Err(Error::MalformedIdentifier("empty identifier".into()))
    } else if !ident::is_valid_identifier(name) {
        Err(Error::MalformedIdentifier(name.to_string()))
    } else {
        Ok(())
    }
}

/// Operand counts accepted by each operator.
fn operand_count_ok(op: Operator, n: usize) -> bool {
    match op {
        Operator::Eq
        | Operator::Is
        | Operator::Like
        | Operator::NotLike
        | Operator::ILike
        | Operator::NotILike
        | Operator::Gt
        | Operator::Lt
        | Operator::Geq
        | Operator::Leq
        | Operator::Diff
        | Operator::Regexp
        | Operator::RegexpCi
        | Operator::NotRegexp
        | Operator::NotRegexpCi
        | Operator::Similar
        | Operator::Rem
        | Operator::Div
        | Operator::BitAnd
        | Operator::BitOr => n == 2,
        Operator::Between => n == 3,
        Operator::BitNot | Operator::IsNull | Operator::IsNotNull | Operator::Not => n == 1,
        Operator::And | Operator::Or | Operator::In | Operator::NotIn | Operator::Concat
        | Operator::Star => n >= 2,
        Operator::Minus | Operator::Plus => n >= 1,
    }
}

/// Checks one node. Called for every node of a statement, children first.
pub fn check_part(tree: &Tree, id: PartId) -> Result<()> {
    let part = tree.part(id);
    let kind = part.kind();
    if kind.is_statement() {
        let info = registry::contents_infos(kind)?;
        if let Some(check) = info.check_structure {
            check(tree, id)?;
        }
        return Ok(());
    }
    match part {
        Part::Expr(e) => {
            if e.cast_as.is_some() && e.param_spec.is_some() {
                return Err(structure(
                    "expression can't have both a type cast and a parameter specification",
                ));
            }
        }
        Part::Field(f) => check_identifier(&f.field_name)?,
        Part::Table(t) => check_identifier(&t.table_name)?,
        Part::Function(f) => check_identifier(&f.function_name)?,
        Part::Operation(o) => {
            if o.operands.is_empty() {
                return Err(structure("operation has no operand"));
            }
            if !operand_count_ok(o.operator, o.operands.len()) {
                return Err(structure(format!(
                    "wrong number of operands for '{}'",
                    o.operator
                )));
            }
        }
        Part::Case(c) => {
            if c.when_list.len() != c.then_list.len() {
                return Err(structure(
                    "number of WHEN is not the same as number of THEN in CASE expression",
                ));
            }
            if c.when_list.is_empty() {
                return Err(structure(
                    "CASE expression must have at least one WHEN ... THEN element",
                ));
            }
        }
        Part::SelectField(f) => {
            if f.expr.is_none() {
                return Err(structure("missing expression in select field"));
            }
        }
        Part::SelectTarget(t) => {
            if t.expr.is_none() {
                return Err(structure("missing expression in select target"));
            }
        }
        Part::SelectJoin(j) => {
            if j.cond.is_some() && !j.using.is_empty() {
                return Err(structure(
                    "join can't at the same time specify a join condition and a list of fields to join on",
                ));
            }
            if j.join_type == crate::ast::JoinType::Cross
                && (j.cond.is_some() || !j.using.is_empty())
            {
                return Err(structure(
                    "cross join can't have a join condition or a list of fields to join on",
                ));
            }
        }
        Part::SelectFrom(f) => {
            if f.targets.is_empty() {
                return Err(structure("empty FROM clause"));
            }
        }
        Part::SelectOrder(o) => {
            if o.expr.is_none() {
                return Err(structure("ORDER BY must have an expression"));
            }
        }
        // Statement kinds were handled above.
        _ => unreachable!("statement kinds dispatch through the registry"),
    }
    Ok(())
}

pub(crate) fn check_select(tree: &Tree, id: PartId) -> Result<()> {
    let Part::Select(s) = tree.part(id) else {
        unreachable!()
    };
    if s.fields.is_empty() {
        return Err(structure("SELECT does not contain any expression"));
    }
    if s.distinct_expr.is_some() && !s.distinct {
        return Err(structure(
            "SELECT can't have a DISTINCT expression if DISTINCT is not set",
        ));
    }
    if s.having_cond.is_some() && s.group_by.is_empty() {
        return Err(structure("SELECT can't have a HAVING without GROUP BY"));
    }
    if s.limit_offset.is_some() && s.limit_count.is_none() {
        return Err(structure("SELECT can't have a limit offset without a limit"));
    }
    Ok(())
}

pub(crate) fn check_insert(tree: &Tree, id: PartId) -> Result<()> {
    let Part::Insert(ins) = tree.part(id) else {
        unreachable!()
    };
    if ins.table.is_none() {
        return Err(structure("INSERT statement needs a table to insert into"));
    }
    let mut nb_values = ins.fields.len();
    if let Some(select) = ins.select {
        if !ins.values_list.is_empty() {
            return Err(structure(
                "can't specify values to insert and SELECT statement in INSERT statement",
            ));
        }
        if nb_values > 0 {
            if let Some(len) = select_column_count(tree, select) {
                if len != nb_values {
                    return Err(structure(
                        "INSERT statement does not have the same number of target columns and expressions",
                    ));
                }
            }
        }
    } else {
        if ins.values_list.is_empty() && nb_values != 0 {
            return Err(structure("missing values to insert in INSERT statement"));
        }
        for row in &ins.values_list {
            if nb_values == 0 {
                nb_values = row.len();
                if nb_values == 0 {
                    return Err(structure("missing values to insert in INSERT statement"));
                }
            } else if row.len() != nb_values {
                if ins.fields.is_empty() {
                    return Err(structure(
                        "VALUES lists must all be the same length in INSERT statement",
                    ));
                }
                return Err(structure(
                    "INSERT statement does not have the same number of target columns and expressions",
                ));
            }
        }
    }
    Ok(())
}

pub(crate) fn check_update(tree: &Tree, id: PartId) -> Result<()> {
    let Part::Update(u) = tree.part(id) else {
        unreachable!()
    };
    if u.table.is_none() {
        return Err(structure("UPDATE statement needs a table to update data"));
    }
    if u.fields.is_empty() {
        return Err(structure("UPDATE statement does not set any value"));
    }
    if u.fields.len() != u.expr_list.len() {
        return Err(structure(
            "UPDATE statement does not have the same number of target columns and expressions",
        ));
    }
    Ok(())
}

pub(crate) fn check_delete(tree: &Tree, id: PartId) -> Result<()> {
    let Part::Delete(d) = tree.part(id) else {
        unreachable!()
    };
    if d.table.is_none() {
        return Err(structure("DELETE statement needs a table to delete from"));
    }
    Ok(())
}

pub(crate) fn check_compound(tree: &Tree, id: PartId) -> Result<()> {
    let Part::Compound(c) = tree.part(id) else {
        unreachable!()
    };
    if c.stmts.is_empty() {
        return Err(structure("COMPOUND statement contains an undefined part"));
    }
    let mut expected: Option<usize> = None;
    for stmt in &c.stmts {
        match tree.part(*stmt) {
            Part::Select(_) | Part::Compound(_) => {}
            _ => {
                return Err(structure(
                    "COMPOUND statement can only contain SELECT or COMPOUND statements",
                ))
            }
        }
        if let Some(count) = select_column_count(tree, *stmt) {
            match expected {
                None => expected = Some(count),
                Some(e) if e != count => {
                    return Err(structure(
                        "all statements in a COMPOUND must have the same number of columns",
                    ))
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

pub(crate) fn check_savepoint_name(tree: &Tree, id: PartId) -> Result<()> {
    let trans = match tree.part(id) {
        Part::Savepoint(t) | Part::RollbackSavepoint(t) | Part::DeleteSavepoint(t) => t,
        _ => unreachable!(),
    };
    if trans.trans_name.as_deref().unwrap_or("").is_empty() {
        return Err(structure("missing savepoint name"));
    }
    Ok(())
}

pub(crate) fn check_unknown(tree: &Tree, id: PartId) -> Result<()> {
    let Part::Unknown(u) = tree.part(id) else {
        unreachable!()
    };
    if u.expressions.is_empty() {
        return Err(structure("unknown statement does not contain any part"));
    }
    Ok(())
}

/// Number of columns a Select or Compound node produces, `None` when a
/// starred field makes the count depend on the schema.
pub fn select_column_count(tree: &Tree, id: PartId) -> Option<usize> {
    match tree.part(id) {
        Part::Select(s) => {
            for field in &s.fields {
                if let Part::SelectField(f) = tree.part(*field) {
                    let starred = f.field_name.as_deref() == Some("*")
                        || matches!(f.expr.map(|e| tree.part(e)), Some(Part::Expr(e))
                            if e.value.as_deref().map_or(false, |v| v == "*" || v.ends_with(".*")));
                    if starred {
                        return None;
                    }
                }
            }
            Some(s.fields.len())
        }
        Part::Compound(c) => select_column_count(tree, *c.stmts.first()?),
        _ => None,
    }
}
