//! Per-tick evaluation of a behavior program against its context.

use gene_core::{Error, Result, Signal};
use gene_lang::{
    Condition, LeftStatement, MethodCall, Program, RightStatement, RootStatement,
};

use crate::context::ExecutionContext;

/// What one tick of execution amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A left-method call produced a halting action; later root statements
    /// were skipped.
    Halted,
    /// Every root statement ran (or was skipped by its condition) without a
    /// halting action. Hosts typically treat this as "no action taken".
    NoAction,
}

/// Runs one tick: root statements in list order, stopping at the first halt.
pub fn run_tick<C: ExecutionContext>(program: &Program, context: &mut C) -> Result<TickOutcome> {
    for statement in &program.statements {
        if execute_root(statement, context)?.is_halt() {
            return Ok(TickOutcome::Halted);
        }
    }
    Ok(TickOutcome::NoAction)
}

fn execute_root<C: ExecutionContext>(statement: &RootStatement, context: &mut C) -> Result<Signal> {
    match statement {
        RootStatement::Conditional(conditional) => {
            if evaluate_condition(&conditional.condition, context)? {
                execute_left(&conditional.body, context)
            } else {
                Ok(Signal::Continue)
            }
        }
        RootStatement::Plain(left) => execute_left(left, context),
    }
}

fn evaluate_condition<C: ExecutionContext>(condition: &Condition, context: &mut C) -> Result<bool> {
    Ok(evaluate_right(&condition.expr, context)? != 0)
}

fn execute_left<C: ExecutionContext>(left: &LeftStatement, context: &mut C) -> Result<Signal> {
    match left {
        LeftStatement::MethodCall(call) => {
            let args = evaluate_arguments(call, context)?;
            Ok(context.execute_left_method(&call.signature, &args))
        }
        LeftStatement::Assignment(assignment) => {
            let value = evaluate_right(&assignment.value, context)?;
            context.write_variable(&assignment.target, value);
            Ok(Signal::Continue)
        }
    }
}

fn evaluate_right<C: ExecutionContext>(statement: &RightStatement, context: &mut C) -> Result<u8> {
    match statement {
        RightStatement::Operation(operation) => {
            let lhs = evaluate_right(&operation.lhs, context)?;
            let rhs = evaluate_right(&operation.rhs, context)?;
            Ok(operation.signature.kind.apply(lhs, rhs))
        }
        RightStatement::Variable(signature) => Ok(context.read_variable(signature)),
        RightStatement::MethodCall(call) => {
            let args = evaluate_arguments(call, context)?;
            Ok(context.execute_right_method(&call.signature, &args))
        }
        RightStatement::Literal(literal) => Ok(literal.value),
    }
}

/// Evaluates a call's argument expressions left-to-right.
fn evaluate_arguments<C: ExecutionContext>(call: &MethodCall, context: &mut C) -> Result<Vec<u8>> {
    if call.arguments.len() != call.signature.parameter_types.len() {
        return Err(Error::Invariant(format!(
            "method {} declares {} parameters but call carries {} arguments",
            call.signature.id,
            call.signature.parameter_types.len(),
            call.arguments.len()
        )));
    }
    call.arguments
        .iter()
        .map(|argument| evaluate_right(argument, context))
        .collect()
}
