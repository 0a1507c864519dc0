use thiserror::Error;

/// Runtime errors from the tree-walking evaluator. Any of these aborts the
/// rest of the program and propagates to the caller unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String },
    #[error("Invalid input for variable '{name}': '{text}' is not an integer")]
    InvalidInput { name: String, text: String },
}
