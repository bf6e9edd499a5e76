//! Small CQL statement builder.
//!
//! Statements render in a compact form with no optional whitespace:
//! `INSERT INTO t(a,b) VALUES (:a,:b);`, `UPDATE t SET a=:a WHERE id=:id;`.


use crate::value::Value;
use std::fmt::{self, Write as _};

///
/// Term
/// Right-hand side of a clause or assignment.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Term {
    /// Named bind marker, `:name`.
    Marker(String),
    /// Anonymous bind marker, `?`.
    Anonymous,
    /// Pre-rendered CQL literal.
    Literal(String),
}

impl Term {
    #[must_use]
    pub fn marker(name: impl Into<String>) -> Self {
        Self::Marker(name.into())
    }

    #[must_use]
    pub fn literal(raw: impl fmt::Display) -> Self {
        Self::Literal(raw.to_string())
    }

    /// Literal rendering of a wire value.
    #[must_use]
    pub fn value(value: &Value) -> Self {
        Self::Literal(value.to_cql_literal())
    }

    #[must_use]
    pub fn null() -> Self {
        Self::Literal("null".to_string())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marker(name) => write!(f, ":{name}"),
            Self::Anonymous => f.write_str("?"),
            Self::Literal(raw) => f.write_str(raw),
        }
    }
}

///
/// Relation
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relation {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    In,
}

impl Relation {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::In => " IN ",
        }
    }
}

///
/// Clause
/// One restriction of a WHERE clause.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clause {
    pub column: String,
    pub relation: Relation,
    pub term: Term,
}

impl Clause {
    #[must_use]
    pub fn new(column: impl Into<String>, relation: Relation, term: Term) -> Self {
        Self {
            column: column.into(),
            relation,
            term,
        }
    }

    /// `column=:column`.
    #[must_use]
    pub fn eq_marker(column: &str) -> Self {
        Self::eq(column, Term::marker(column))
    }

    #[must_use]
    pub fn eq(column: impl Into<String>, term: Term) -> Self {
        Self::new(column, Relation::Eq, term)
    }

    #[must_use]
    pub fn in_(column: impl Into<String>, term: Term) -> Self {
        Self::new(column, Relation::In, term)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.relation.as_str(), self.term)
    }
}

///
/// Assignment
/// One entry of an UPDATE's SET clause.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Assignment {
    /// `c=t`
    Set { column: String, term: Term },
    /// `c=c+t`
    Append { column: String, term: Term },
    /// `c=t+c`
    Prepend { column: String, term: Term },
    /// `c=c-t`
    Remove { column: String, term: Term },
    /// `c[i]=t`
    SetAt {
        column: String,
        index: Term,
        term: Term,
    },
}

impl Assignment {
    #[must_use]
    pub fn set(column: &str, term: Term) -> Self {
        Self::Set {
            column: column.to_string(),
            term,
        }
    }

    #[must_use]
    pub fn append(column: &str, term: Term) -> Self {
        Self::Append {
            column: column.to_string(),
            term,
        }
    }

    #[must_use]
    pub fn prepend(column: &str, term: Term) -> Self {
        Self::Prepend {
            column: column.to_string(),
            term,
        }
    }

    #[must_use]
    pub fn remove(column: &str, term: Term) -> Self {
        Self::Remove {
            column: column.to_string(),
            term,
        }
    }

    #[must_use]
    pub fn set_at(column: &str, index: Term, term: Term) -> Self {
        Self::SetAt {
            column: column.to_string(),
            index,
            term,
        }
    }

    /// Map entry assignment `c[k]=v`.
    #[must_use]
    pub fn put(column: &str, key: Term, value: Term) -> Self {
        Self::set_at(column, key, value)
    }

    /// Counter increment `c=c+t`.
    #[must_use]
    pub fn increment(column: &str, term: Term) -> Self {
        Self::append(column, term)
    }

    /// Counter decrement `c=c-t`.
    #[must_use]
    pub fn decrement(column: &str, term: Term) -> Self {
        Self::remove(column, term)
    }

    #[must_use]
    pub fn column(&self) -> &str {
        match self {
            Self::Set { column, .. }
            | Self::Append { column, .. }
            | Self::Prepend { column, .. }
            | Self::Remove { column, .. }
            | Self::SetAt { column, .. } => column,
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set { column, term } => write!(f, "{column}={term}"),
            Self::Append { column, term } => write!(f, "{column}={column}+{term}"),
            Self::Prepend { column, term } => write!(f, "{column}={term}+{column}"),
            Self::Remove { column, term } => write!(f, "{column}={column}-{term}"),
            Self::SetAt {
                column,
                index,
                term,
            } => write!(f, "{column}[{index}]={term}"),
        }
    }
}

///
/// Using
/// `USING TTL .. AND TIMESTAMP ..` options.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Using {
    pub ttl: Option<Term>,
    pub timestamp: Option<Term>,
}

impl Using {
    #[must_use]
    pub fn ttl(mut self, term: Term) -> Self {
        self.ttl = Some(term);
        self
    }

    #[must_use]
    pub fn timestamp(mut self, term: Term) -> Self {
        self.timestamp = Some(term);
        self
    }

    /// Bind markers `:ttl` and `:timestamp`.
    #[must_use]
    pub fn markers() -> Self {
        Self::default()
            .ttl(Term::marker("ttl"))
            .timestamp(Term::marker("timestamp"))
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ttl.is_none() && self.timestamp.is_none()
    }
}

impl fmt::Display for Using {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if let Some(ttl) = &self.ttl {
            parts.push(format!("TTL {ttl}"));
        }
        if let Some(ts) = &self.timestamp {
            parts.push(format!("TIMESTAMP {ts}"));
        }

        if parts.is_empty() {
            Ok(())
        } else {
            write!(f, " USING {}", parts.join(" AND "))
        }
    }
}

fn write_where(out: &mut String, clauses: &[Clause]) {
    if clauses.is_empty() {
        return;
    }

    out.push_str(" WHERE ");
    out.push_str(&join(clauses, " AND "));
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

///
/// Insert
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Insert {
    table: String,
    columns: Vec<String>,
    values: Vec<Term>,
    if_not_exists: bool,
    using: Using,
}

impl Insert {
    #[must_use]
    pub fn into(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            if_not_exists: false,
            using: Using::default(),
        }
    }

    #[must_use]
    pub fn value(mut self, column: &str, term: Term) -> Self {
        self.columns.push(column.to_string());
        self.values.push(term);
        self
    }

    /// `column` bound to `:column`.
    #[must_use]
    pub fn value_marker(self, column: &str) -> Self {
        self.value(column, Term::marker(column))
    }

    #[must_use]
    pub const fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    #[must_use]
    pub fn using(mut self, using: Using) -> Self {
        self.using = using;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl fmt::Display for Insert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = format!(
            "INSERT INTO {}({}) VALUES ({})",
            self.table,
            self.columns.join(","),
            join(&self.values, ",")
        );
        if self.if_not_exists {
            out.push_str(" IF NOT EXISTS");
        }
        let _ = write!(out, "{}", self.using);
        out.push(';');

        f.write_str(&out)
    }
}

///
/// Select
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Select {
    table: String,
    columns: Vec<String>,
    clauses: Vec<Clause>,
    limit: Option<Term>,
}

impl Select {
    #[must_use]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            clauses: Vec::new(),
            limit: None,
        }
    }

    #[must_use]
    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    #[must_use]
    pub fn where_(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    #[must_use]
    pub fn limit(mut self, term: Term) -> Self {
        self.limit = Some(term);
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl fmt::Display for Select {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = if self.columns.is_empty() {
            "*".to_string()
        } else {
            self.columns.join(",")
        };

        let mut out = format!("SELECT {columns} FROM {}", self.table);
        write_where(&mut out, &self.clauses);
        if let Some(limit) = &self.limit {
            let _ = write!(out, " LIMIT {limit}");
        }
        out.push(';');

        f.write_str(&out)
    }
}

///
/// Update
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Update {
    table: String,
    assignments: Vec<Assignment>,
    clauses: Vec<Clause>,
    using: Using,
}

impl Update {
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            assignments: Vec::new(),
            clauses: Vec::new(),
            using: Using::default(),
        }
    }

    #[must_use]
    pub fn with(mut self, assignment: Assignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    #[must_use]
    pub fn where_(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    #[must_use]
    pub fn using(mut self, using: Using) -> Self {
        self.using = using;
        self
    }

    #[must_use]
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }
}

impl fmt::Display for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = format!(
            "UPDATE {}{} SET {}",
            self.table,
            self.using,
            join(&self.assignments, ",")
        );
        write_where(&mut out, &self.clauses);
        out.push(';');

        f.write_str(&out)
    }
}

///
/// Delete
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Delete {
    table: String,
    columns: Vec<String>,
    clauses: Vec<Clause>,
    using: Using,
}

impl Delete {
    #[must_use]
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            clauses: Vec::new(),
            using: Using::default(),
        }
    }

    #[must_use]
    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    #[must_use]
    pub fn where_(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    #[must_use]
    pub fn using(mut self, using: Using) -> Self {
        self.using = using;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

impl fmt::Display for Delete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::from("DELETE ");
        if !self.columns.is_empty() {
            out.push_str(&self.columns.join(","));
            out.push(' ');
        }
        let _ = write!(out, "FROM {}{}", self.table, self.using);
        write_where(&mut out, &self.clauses);
        out.push(';');

        f.write_str(&out)
    }
}
