//! Structural validation of the wire form.
//!
//! The wire form is untyped; every malformed-structure failure lives here so
//! that downstream execution works on an AST where bad shapes are
//! unrepresentable. Both encodings are accepted: the sequence form
//! (`["set", "a", 7]`) and the tagged-map form
//! (`{"type": "set", "var": "a", "expr": 7}`).

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::ast::{
    BinaryOperator, ComparisonOperator, Condition, Expression, Program, Statement,
};
use crate::node::Node;

const PROGRAM_TAG: &str = "calc";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Program must be a sequence or map tagged '{PROGRAM_TAG}'")]
    NotAProgram,
    #[error("Statement block must be a map with a 'statements' sequence")]
    MalformedBlock,
    #[error("Statement '{tag}' expects {expected} arguments, got {got}")]
    StatementArity {
        tag: &'static str,
        expected: &'static str,
        got: usize,
    },
    #[error("Statement '{tag}' is missing its '{field}' field")]
    MissingField {
        tag: &'static str,
        field: &'static str,
    },
    #[error("Statement '{tag}' target must be a variable name")]
    ExpectedVariableName { tag: &'static str },
    #[error("A branch of 'if' must be a recognized statement")]
    UnknownBranchStatement,
    #[error("Malformed condition: expected left, comparison, right")]
    MalformedCondition,
    #[error("Unknown comparison operator '{op}'")]
    UnknownComparison { op: String },
    #[error("Malformed expression: expected constant, variable, or left-op-right")]
    MalformedExpression,
    #[error("Unknown binary operator '{op}'")]
    UnknownOperator { op: String },
}

/// Decodes a whole program. The node must be a sequence whose first element
/// is the word `calc`, or a map tagged `"type": "calc"` with a `"do"` block.
pub fn program(node: &Node) -> Result<Program, DecodeError> {
    let statements = match node {
        Node::Seq(items) => match items.split_first() {
            Some((Node::Word(tag), rest)) if tag == PROGRAM_TAG => statement_list(rest)?,
            _ => return Err(DecodeError::NotAProgram),
        },
        Node::Map(fields) => {
            if fields.get("type").and_then(Node::as_word) != Some(PROGRAM_TAG) {
                return Err(DecodeError::NotAProgram);
            }
            let block = fields.get("do").ok_or(DecodeError::NotAProgram)?;
            block_statements(block)?
        }
        _ => return Err(DecodeError::NotAProgram),
    };
    debug!(statements = statements.len(), "decoded calc program");
    Ok(Program { statements })
}

/// Decodes one statement. Returns `Ok(None)` for unrecognized statement
/// forms: the grammar is fixed, and an unknown node is a no-op rather than
/// an error. Recognized tags with the wrong shape still fail.
pub fn statement(node: &Node) -> Result<Option<Statement>, DecodeError> {
    match node {
        Node::Seq(items) => seq_statement(items),
        Node::Map(fields) => map_statement(fields),
        Node::Int(_) | Node::Word(_) => Ok(None),
    }
}

fn statement_list(items: &[Node]) -> Result<Vec<Statement>, DecodeError> {
    let mut statements = Vec::with_capacity(items.len());
    for item in items {
        if let Some(stmt) = statement(item)? {
            statements.push(stmt);
        }
    }
    Ok(statements)
}

/// A `{"statements": [...]}` block from the map encoding.
fn block_statements(node: &Node) -> Result<Vec<Statement>, DecodeError> {
    let Node::Map(fields) = node else {
        return Err(DecodeError::MalformedBlock);
    };
    let items = fields
        .get("statements")
        .and_then(Node::as_seq)
        .ok_or(DecodeError::MalformedBlock)?;
    statement_list(items)
}

/// Branch positions carry exactly one statement, so the no-op tolerance for
/// unknown forms does not apply there.
fn branch_statement(node: &Node) -> Result<Statement, DecodeError> {
    statement(node)?.ok_or(DecodeError::UnknownBranchStatement)
}

fn seq_statement(items: &[Node]) -> Result<Option<Statement>, DecodeError> {
    let Some((Node::Word(tag), args)) = items.split_first() else {
        return Ok(None);
    };
    match tag.as_str() {
        "print" => match args {
            [expr] => Ok(Some(Statement::Print(expression(expr)?))),
            _ => Err(DecodeError::StatementArity {
                tag: "print",
                expected: "1",
                got: args.len(),
            }),
        },
        "set" => match args {
            [Node::Word(name), value] => Ok(Some(Statement::Assign {
                name: name.clone(),
                value: expression(value)?,
            })),
            [_, _] => Err(DecodeError::ExpectedVariableName { tag: "set" }),
            _ => Err(DecodeError::StatementArity {
                tag: "set",
                expected: "2",
                got: args.len(),
            }),
        },
        "read" => match args {
            [Node::Word(name)] => Ok(Some(Statement::Read { name: name.clone() })),
            [_] => Err(DecodeError::ExpectedVariableName { tag: "read" }),
            _ => Err(DecodeError::StatementArity {
                tag: "read",
                expected: "1",
                got: args.len(),
            }),
        },
        "if" => match args {
            [cond, then_branch] => Ok(Some(Statement::If {
                condition: condition(cond)?,
                then_branch: Box::new(branch_statement(then_branch)?),
                else_branch: None,
            })),
            [cond, then_branch, else_branch] => Ok(Some(Statement::If {
                condition: condition(cond)?,
                then_branch: Box::new(branch_statement(then_branch)?),
                else_branch: Some(Box::new(branch_statement(else_branch)?)),
            })),
            _ => Err(DecodeError::StatementArity {
                tag: "if",
                expected: "2 or 3",
                got: args.len(),
            }),
        },
        "while" => match args.split_first() {
            Some((cond, body)) => Ok(Some(Statement::While {
                condition: condition(cond)?,
                body: statement_list(body)?,
            })),
            None => Err(DecodeError::StatementArity {
                tag: "while",
                expected: "at least 1",
                got: 0,
            }),
        },
        _ => Ok(None),
    }
}

fn map_statement(fields: &BTreeMap<String, Node>) -> Result<Option<Statement>, DecodeError> {
    let Some(tag) = fields.get("type").and_then(Node::as_word) else {
        return Ok(None);
    };
    match tag {
        "print" => {
            let expr = require(fields, "print", "expr")?;
            Ok(Some(Statement::Print(expression(expr)?)))
        }
        "set" => {
            let name = variable_field(fields, "set")?;
            let value = require(fields, "set", "expr")?;
            Ok(Some(Statement::Assign {
                name,
                value: expression(value)?,
            }))
        }
        "read" => {
            let name = variable_field(fields, "read")?;
            Ok(Some(Statement::Read { name }))
        }
        "if" => {
            let cond = require(fields, "if", "cond")?;
            let then_branch = require(fields, "if", "true")?;
            let else_branch = match fields.get("false") {
                Some(node) => Some(Box::new(branch_statement(node)?)),
                None => None,
            };
            Ok(Some(Statement::If {
                condition: condition(cond)?,
                then_branch: Box::new(branch_statement(then_branch)?),
                else_branch,
            }))
        }
        "while" => {
            let cond = require(fields, "while", "cond")?;
            let block = require(fields, "while", "do")?;
            Ok(Some(Statement::While {
                condition: condition(cond)?,
                body: block_statements(block)?,
            }))
        }
        _ => Ok(None),
    }
}

fn require<'n>(
    fields: &'n BTreeMap<String, Node>,
    tag: &'static str,
    field: &'static str,
) -> Result<&'n Node, DecodeError> {
    fields
        .get(field)
        .ok_or(DecodeError::MissingField { tag, field })
}

fn variable_field(
    fields: &BTreeMap<String, Node>,
    tag: &'static str,
) -> Result<String, DecodeError> {
    match require(fields, tag, "var")? {
        Node::Word(name) => Ok(name.clone()),
        _ => Err(DecodeError::ExpectedVariableName { tag }),
    }
}

pub fn expression(node: &Node) -> Result<Expression, DecodeError> {
    match node {
        Node::Int(value) => Ok(Expression::Constant(*value)),
        Node::Word(name) => Ok(Expression::Variable(name.clone())),
        Node::Seq(items) => match items.as_slice() {
            [left, Node::Word(op), right] => Ok(Expression::Binary {
                left: Box::new(expression(left)?),
                op: binary_operator(op)?,
                right: Box::new(expression(right)?),
            }),
            _ => Err(DecodeError::MalformedExpression),
        },
        Node::Map(fields) => {
            let (left, op, right) = triple(fields).ok_or(DecodeError::MalformedExpression)?;
            Ok(Expression::Binary {
                left: Box::new(expression(left)?),
                op: binary_operator(op)?,
                right: Box::new(expression(right)?),
            })
        }
    }
}

pub fn condition(node: &Node) -> Result<Condition, DecodeError> {
    match node {
        Node::Seq(items) => match items.as_slice() {
            [left, Node::Word(op), right] => Ok(Condition {
                left: expression(left)?,
                op: comparison_operator(op)?,
                right: expression(right)?,
            }),
            _ => Err(DecodeError::MalformedCondition),
        },
        Node::Map(fields) => {
            let (left, op, right) = triple(fields).ok_or(DecodeError::MalformedCondition)?;
            Ok(Condition {
                left: expression(left)?,
                op: comparison_operator(op)?,
                right: expression(right)?,
            })
        }
        Node::Int(_) | Node::Word(_) => Err(DecodeError::MalformedCondition),
    }
}

/// The `{left, op, right}` shape shared by map-form expressions and
/// conditions.
fn triple(fields: &BTreeMap<String, Node>) -> Option<(&Node, &str, &Node)> {
    let left = fields.get("left")?;
    let op = fields.get("op").and_then(Node::as_word)?;
    let right = fields.get("right")?;
    Some((left, op, right))
}

fn binary_operator(op: &str) -> Result<BinaryOperator, DecodeError> {
    match op {
        "+" => Ok(BinaryOperator::Add),
        "-" => Ok(BinaryOperator::Sub),
        "*" => Ok(BinaryOperator::Mul),
        "/" => Ok(BinaryOperator::Div),
        other => Err(DecodeError::UnknownOperator {
            op: other.to_string(),
        }),
    }
}

fn comparison_operator(op: &str) -> Result<ComparisonOperator, DecodeError> {
    match op {
        ">" => Ok(ComparisonOperator::Greater),
        "<" => Ok(ComparisonOperator::Less),
        "=" => Ok(ComparisonOperator::Equal),
        other => Err(DecodeError::UnknownComparison {
            op: other.to_string(),
        }),
    }
}
