use tracing::trace;

use crate::ast::{BinaryOperator, ComparisonOperator, Condition, Expression, Program, Statement};
use crate::env::Environment;
use crate::io::{InputSource, OutputSink};

mod error;

pub use error::EvalError;

/// Tree-walking evaluator for calc programs.
///
/// Execution is a direct, blocking recursive walk: call-stack depth follows
/// the nesting depth of the program, and loop termination is the program's
/// responsibility, not the evaluator's.
pub struct Evaluator<'io> {
    input: &'io mut InputSource,
    output: &'io mut OutputSink,
}

impl<'io> Evaluator<'io> {
    pub fn new(input: &'io mut InputSource, output: &'io mut OutputSink) -> Self {
        Self { input, output }
    }

    /// Executes every statement in order, threading the environment forward,
    /// and returns the final environment.
    ///
    /// The caller's environment is never modified: writes copy the table on
    /// first mutation, and a program without `set`/`read` hands back the
    /// exact instance it was given.
    pub fn run(&mut self, program: &Program, env: Environment) -> Result<Environment, EvalError> {
        trace!(statements = program.statements.len(), "executing calc program");
        let mut env = env;
        for statement in &program.statements {
            env = self.exec_statement(statement, env)?;
        }
        Ok(env)
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        env: Environment,
    ) -> Result<Environment, EvalError> {
        match statement {
            Statement::Print(expr) => {
                self.exec_print(expr, &env)?;
                Ok(env)
            }
            Statement::Assign { name, value } => {
                let value = self.eval_expression(value, &env)?;
                let mut env = env;
                env.insert(name.clone(), value);
                Ok(env)
            }
            Statement::Read { name } => {
                self.output.print(&format!("Enter value for {name}: "));
                let line = self.input.read_line();
                let text = line.trim();
                let value: i64 = text.parse().map_err(|_| EvalError::InvalidInput {
                    name: name.clone(),
                    text: text.to_string(),
                })?;
                trace!(name = %name, value, "bound input value");
                let mut env = env;
                env.insert(name.clone(), value);
                Ok(env)
            }
            Statement::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_condition(condition, &env)? {
                    self.exec_statement(then_branch, env)
                } else if let Some(else_branch) = else_branch {
                    self.exec_statement(else_branch, env)
                } else {
                    Ok(env)
                }
            }
            Statement::While { condition, body } => {
                let mut env = env;
                while self.eval_condition(condition, &env)? {
                    for statement in body {
                        env = self.exec_statement(statement, env)?;
                    }
                }
                Ok(env)
            }
        }
    }

    // A variable reference prints as "name = value"; anything else prints the
    // bare value.
    fn exec_print(&mut self, expr: &Expression, env: &Environment) -> Result<(), EvalError> {
        let value = self.eval_expression(expr, env)?;
        match expr {
            Expression::Variable(name) => self.output.println(&format!("{name} = {value}")),
            Expression::Constant(_) | Expression::Binary { .. } => {
                self.output.println(&value.to_string());
            }
        }
        Ok(())
    }

    fn eval_expression(&self, expr: &Expression, env: &Environment) -> Result<i64, EvalError> {
        match expr {
            Expression::Constant(value) => Ok(*value),
            Expression::Variable(name) => {
                env.get(name).ok_or_else(|| EvalError::UndefinedVariable {
                    name: name.clone(),
                })
            }
            Expression::Binary { left, op, right } => {
                let left = self.eval_expression(left, env)?;
                let right = self.eval_expression(right, env)?;
                match op {
                    BinaryOperator::Add => Ok(left + right),
                    BinaryOperator::Sub => Ok(left - right),
                    BinaryOperator::Mul => Ok(left * right),
                    BinaryOperator::Div => {
                        if right == 0 {
                            return Err(EvalError::DivisionByZero);
                        }
                        // wrapping: i64::MIN / -1 must not trap
                        Ok(left.wrapping_div(right))
                    }
                }
            }
        }
    }

    fn eval_condition(&self, condition: &Condition, env: &Environment) -> Result<bool, EvalError> {
        let left = self.eval_expression(&condition.left, env)?;
        let right = self.eval_expression(&condition.right, env)?;
        Ok(match condition.op {
            ComparisonOperator::Greater => left > right,
            ComparisonOperator::Less => left < right,
            ComparisonOperator::Equal => left == right,
        })
    }
}
