//! Tiny predicate language used by `filter` steps.
//!
//! Grammar (whitespace separated, no parentheses):
//! ```text
//! pred   := clause (" AND " clause)*
//! clause := column op literal | column IS [NOT] NULL
//! op     := == | != | < | <= | > | >=
//! ```
//! Literals are parsed against the column's type; strings may be quoted, and
//! a quoted string may itself contain ` AND `.

use relwire_core::schema::{DataType, Schema};

use super::yaml::DslError;
use crate::expression::{ExpressionNode, Scalar, TypeNode};
use crate::extensions::FunctionRegistry;

// At equal positions the longer symbol wins, so `<=` is never read as `<`.
const OPERATORS: [(&str, &str); 6] = [
    ("==", "equal"),
    ("!=", "not_equal"),
    ("<=", "lte"),
    (">=", "gte"),
    ("<", "lt"),
    (">", "gt"),
];

/// Compile `text` into a boolean expression over `schema`, registering every
/// function it calls.
pub fn parse_predicate(
    text: &str,
    schema: &Schema,
    registry: &mut FunctionRegistry,
) -> Result<ExpressionNode, DslError> {
    let clauses: Vec<&str> = split_and(text);
    if clauses.iter().any(|c| c.trim().is_empty()) {
        return Err(DslError::Predicate(format!("empty clause in '{text}'")));
    }

    let mut exprs = clauses
        .into_iter()
        .map(|c| parse_clause(c.trim(), schema, registry))
        .collect::<Result<Vec<_>, _>>()?;

    if exprs.len() == 1 {
        return Ok(exprs.remove(0));
    }
    let nullable = exprs.iter().any(|e| result_nullable(e));
    let anchor = registry.register("and");
    Ok(ExpressionNode::call(
        anchor,
        exprs,
        TypeNode::new(DataType::Boolean, nullable),
    ))
}

/// Split on case-insensitive ` AND `, ignoring separators inside quotes.
fn split_and(text: &str) -> Vec<&str> {
    const SEP: &[u8] = b" AND ";
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'\'' || b == b'"' => quote = Some(b),
            None if bytes[i..]
                .get(..SEP.len())
                .is_some_and(|w| w.eq_ignore_ascii_case(SEP)) =>
            {
                parts.push(&text[start..i]);
                i += SEP.len();
                start = i;
                continue;
            }
            None => {}
        }
        i += 1;
    }
    parts.push(&text[start..]);
    parts
}

fn parse_clause(
    clause: &str,
    schema: &Schema,
    registry: &mut FunctionRegistry,
) -> Result<ExpressionNode, DslError> {
    let upper = clause.to_ascii_uppercase();
    for (suffix, func) in [(" IS NOT NULL", "is_not_null"), (" IS NULL", "is_null")] {
        if upper.ends_with(suffix) {
            let column = clause[..clause.len() - suffix.len()].trim();
            let (idx, _) = resolve(column, schema)?;
            let anchor = registry.register(func);
            return Ok(ExpressionNode::call(
                anchor,
                vec![ExpressionNode::field(idx)?],
                TypeNode::new(DataType::Boolean, false),
            ));
        }
    }

    let Some((pos, symbol, func)) = OPERATORS
        .iter()
        .filter_map(|&(sym, func)| clause.find(sym).map(|pos| (pos, sym, func)))
        .min_by_key(|&(pos, sym, _)| (pos, usize::MAX - sym.len()))
    else {
        return Err(DslError::Predicate(format!(
            "no comparison operator in '{clause}'"
        )));
    };

    let column = clause[..pos].trim();
    let literal = clause[pos + symbol.len()..].trim();
    if literal.is_empty() {
        return Err(DslError::Predicate(format!("missing literal in '{clause}'")));
    }
    let (idx, dt) = resolve(column, schema)?;
    let nullable = schema.field(idx).map(|f| f.nullable).unwrap_or(true);
    let value = Scalar::parse_as(dt, literal).ok_or_else(|| {
        DslError::Predicate(format!("cannot read '{literal}' as {dt:?} for '{column}'"))
    })?;

    let anchor = registry.register(func);
    Ok(ExpressionNode::call(
        anchor,
        vec![ExpressionNode::field(idx)?, ExpressionNode::literal(value)],
        TypeNode::new(DataType::Boolean, nullable),
    ))
}

fn resolve(column: &str, schema: &Schema) -> Result<(usize, DataType), DslError> {
    if column.is_empty() {
        return Err(DslError::Predicate("missing column name".into()));
    }
    let idx = schema
        .index_of(column)
        .ok_or_else(|| DslError::UnknownColumn(column.to_string()))?;
    let dt = schema
        .field(idx)
        .map(|f| f.data_type)
        .ok_or_else(|| DslError::UnknownColumn(column.to_string()))?;
    Ok((idx, dt))
}

fn result_nullable(expr: &ExpressionNode) -> bool {
    match expr {
        ExpressionNode::ScalarFunction(f) => f.output_type().nullable,
        _ => true,
    }
}
