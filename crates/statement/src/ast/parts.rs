//! Clause-level parts: expressions, fields, tables, functions, operations,
//! CASE constructs and the SELECT-specific parts.
//!
//! Parts that name schema objects (fields, tables, functions, select fields
//! and targets) carry an optional [`Binding`] filled in by dictionary
//! validation. Bindings are deliberately not cloned: a copied part starts
//! out unbound and must be validated again.

use std::fmt;

use crate::binding::Binding;
use crate::PartId;

/// A value expression. At most one of `cond`, `func`, `select` and
/// `case_expr` is set; otherwise the expression is a literal or identifier
/// carried in `value`.
#[derive(Clone, Debug, Default)]
pub struct Expr {
    /// Literal or identifier text, kept as it appeared in the SQL.
    pub value: Option<String>,
    /// Whether `value` names a schema object rather than a literal.
    pub value_is_ident: bool,
    /// Parameter specification, when the expression is a placeholder.
    pub param_spec: Option<ParamSpec>,
    /// Function call.
    pub func: Option<PartId>,
    /// Operation (operator applied to operand expressions).
    pub cond: Option<PartId>,
    /// Sub-statement, a `Select` or `Compound` node.
    pub select: Option<PartId>,
    /// CASE construct.
    pub case_expr: Option<PartId>,
    /// Type name the expression is cast to, if any.
    pub cast_as: Option<String>,
}

impl Expr {
    pub fn value(text: impl Into<String>) -> Self {
        Expr {
            value: Some(text.into()),
            ..Expr::default()
        }
    }

    pub fn ident(text: impl Into<String>) -> Self {
        Expr {
            value: Some(text.into()),
            value_is_ident: true,
            ..Expr::default()
        }
    }
}

/// Specification of a statement parameter (name, description, type hints).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamSpec {
    pub name: Option<String>,
    pub descr: Option<String>,
    pub data_type: Option<String>,
    pub is_param: bool,
    pub nullok: bool,
}

/// A column reference inside an INSERT or UPDATE field list.
#[derive(Debug, Default)]
pub struct Field {
    pub field_name: String,
    pub binding: Option<Binding>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field {
            field_name: name.into(),
            binding: None,
        }
    }
}

impl Clone for Field {
    fn clone(&self) -> Self {
        Field {
            field_name: self.field_name.clone(),
            binding: None,
        }
    }
}

/// A table reference.
#[derive(Debug, Default)]
pub struct Table {
    pub table_name: String,
    pub binding: Option<Binding>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            table_name: name.into(),
            binding: None,
        }
    }
}

impl Clone for Table {
    fn clone(&self) -> Self {
        Table {
            table_name: self.table_name.clone(),
            binding: None,
        }
    }
}

/// A function call: a name applied to a list of argument expressions.
#[derive(Debug, Default)]
pub struct Function {
    pub function_name: String,
    pub args_list: Vec<PartId>,
    pub binding: Option<Binding>,
}

impl Clone for Function {
    fn clone(&self) -> Self {
        Function {
            function_name: self.function_name.clone(),
            args_list: self.args_list.clone(),
            binding: None,
        }
    }
}

/// An operator applied to operand expressions.
#[derive(Clone, Debug)]
pub struct Operation {
    pub operator: Operator,
    pub operands: Vec<PartId>,
}

/// A CASE construct. `when_list` and `then_list` are parallel.
#[derive(Clone, Debug, Default)]
pub struct CaseExpr {
    pub base_expr: Option<PartId>,
    pub when_list: Vec<PartId>,
    pub then_list: Vec<PartId>,
    pub else_expr: Option<PartId>,
}

/// One entry of a SELECT's projection list.
#[derive(Debug, Default)]
pub struct SelectField {
    pub expr: Option<PartId>,
    /// Column named by `expr`, when the expression is a plain identifier.
    pub field_name: Option<String>,
    /// Table qualifier of `field_name`, when the identifier is qualified.
    pub table_name: Option<String>,
    pub as_alias: Option<String>,
    pub binding: Option<Binding>,
}

impl Clone for SelectField {
    fn clone(&self) -> Self {
        SelectField {
            expr: self.expr,
            field_name: self.field_name.clone(),
            table_name: self.table_name.clone(),
            as_alias: self.as_alias.clone(),
            binding: None,
        }
    }
}

/// One entry of a FROM clause: a table or sub-select, possibly aliased.
#[derive(Debug, Default)]
pub struct SelectTarget {
    pub expr: Option<PartId>,
    /// Table named by `expr`, when the target is a plain table reference.
    pub table_name: Option<String>,
    pub as_alias: Option<String>,
    pub binding: Option<Binding>,
}

impl Clone for SelectTarget {
    fn clone(&self) -> Self {
        SelectTarget {
            expr: self.expr,
            table_name: self.table_name.clone(),
            as_alias: self.as_alias.clone(),
            binding: None,
        }
    }
}

/// A join between FROM targets.
#[derive(Clone, Debug)]
pub struct SelectJoin {
    pub join_type: JoinType,
    /// Index of the right-hand target within the FROM target list.
    pub position: usize,
    /// ON condition.
    pub cond: Option<PartId>,
    /// USING column list ([`Field`] nodes).
    pub using: Vec<PartId>,
}

/// A FROM clause: targets plus the joins relating them.
#[derive(Clone, Debug, Default)]
pub struct SelectFrom {
    pub targets: Vec<PartId>,
    pub joins: Vec<PartId>,
}

/// One entry of an ORDER BY clause.
#[derive(Clone, Debug)]
pub struct SelectOrder {
    pub expr: Option<PartId>,
    pub asc: bool,
    pub collation_name: Option<String>,
}

impl Default for SelectOrder {
    fn default() -> Self {
        SelectOrder {
            expr: None,
            asc: true,
            collation_name: None,
        }
    }
}

/// SQL operators, grouped by the operand counts they accept (see the
/// structural checker).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Eq,
    Is,
    Like,
    NotLike,
    ILike,
    NotILike,
    Between,
    Gt,
    Lt,
    Geq,
    Leq,
    Diff,
    Regexp,
    RegexpCi,
    NotRegexp,
    NotRegexpCi,
    Similar,
    IsNull,
    IsNotNull,
    Not,
    In,
    NotIn,
    Concat,
    Plus,
    Minus,
    Star,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitNot,
}

impl Operator {
    /// The operator's SQL rendering, as used by the serializer.
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Eq => "=",
            Operator::Is => "IS",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::ILike => "ILIKE",
            Operator::NotILike => "NOT ILIKE",
            Operator::Between => "BETWEEN",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Geq => ">=",
            Operator::Leq => "<=",
            Operator::Diff => "!=",
            Operator::Regexp => "RE",
            Operator::RegexpCi => "CI_RE",
            Operator::NotRegexp => "!RE",
            Operator::NotRegexpCi => "!CI_RE",
            Operator::Similar => "SIMILAR TO",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
            Operator::Not => "NOT",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Concat => "||",
            Operator::Plus => "+",
            Operator::Minus => "-",
            Operator::Star => "*",
            Operator::Div => "/",
            Operator::Rem => "%",
            Operator::BitAnd => "&",
            Operator::BitOr => "|",
            Operator::BitNot => "~",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Join flavors. Serialized with their SQL keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    Cross,
    Natural,
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinType::Cross => "CROSS",
            JoinType::Natural => "NATURAL",
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::Full => "FULL",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
