//! Structural validation for behavior programs.
//!
//! Checks the global typing invariant: every node's declared return type
//! matches the type its parent slot requires. Synthesis, mutation and the
//! codec are expected to uphold this by construction; validation exists so
//! tests (and callers ingesting foreign streams) can prove it.

use gene_core::{Error, GeneType, Result};

use crate::program::{
    Assignment, LeftStatement, MethodCall, Program, RightStatement, RootStatement,
};

/// Validates the typing invariant over a whole program.
pub fn validate_program(program: &Program) -> Result<()> {
    for (index, statement) in program.statements.iter().enumerate() {
        validate_root(statement)
            .map_err(|e| Error::Invariant(format!("root statement {index}: {e}")))?;
    }
    Ok(())
}

fn validate_root(statement: &RootStatement) -> Result<()> {
    match statement {
        RootStatement::Conditional(conditional) => {
            let condition_type = conditional.condition.expr.return_type();
            if condition_type != GeneType::Bool {
                return Err(Error::Invariant(format!(
                    "condition has return type {condition_type:?}, expected Bool"
                )));
            }
            validate_right(&conditional.condition.expr)?;
            validate_left(&conditional.body)
        }
        RootStatement::Plain(left) => validate_left(left),
    }
}

fn validate_left(left: &LeftStatement) -> Result<()> {
    match left {
        LeftStatement::MethodCall(call) => validate_call(call),
        LeftStatement::Assignment(assignment) => validate_assignment(assignment),
    }
}

fn validate_assignment(assignment: &Assignment) -> Result<()> {
    let Assignment { target, value } = assignment;
    let value_type = value.return_type();
    if value_type != target.variable_type {
        return Err(Error::Invariant(format!(
            "assignment into variable {} of type {:?} from value of type {value_type:?}",
            target.id, target.variable_type
        )));
    }
    validate_right(value)
}

fn validate_right(statement: &RightStatement) -> Result<()> {
    match statement {
        RightStatement::Operation(operation) => {
            let lhs_type = operation.lhs.return_type();
            let rhs_type = operation.rhs.return_type();
            if lhs_type != operation.signature.lhs_type || rhs_type != operation.signature.rhs_type
            {
                return Err(Error::Invariant(format!(
                    "operator {:?} declared ({:?}, {:?}) but got operands ({lhs_type:?}, {rhs_type:?})",
                    operation.signature.kind,
                    operation.signature.lhs_type,
                    operation.signature.rhs_type
                )));
            }
            validate_right(&operation.lhs)?;
            validate_right(&operation.rhs)
        }
        RightStatement::MethodCall(call) => validate_call(call),
        RightStatement::Literal(literal) => {
            if !literal.value_type.contains(literal.value) {
                return Err(Error::Invariant(format!(
                    "literal value {} out of domain for {:?}",
                    literal.value, literal.value_type
                )));
            }
            Ok(())
        }
        RightStatement::Variable(_) => Ok(()),
    }
}

fn validate_call(call: &MethodCall) -> Result<()> {
    if call.arguments.len() != call.signature.parameter_types.len() {
        return Err(Error::Invariant(format!(
            "method {} declares {} parameters but call has {} arguments",
            call.signature.id,
            call.signature.parameter_types.len(),
            call.arguments.len()
        )));
    }
    for (argument, &expected) in call.arguments.iter().zip(&call.signature.parameter_types) {
        let actual = argument.return_type();
        if actual != expected {
            return Err(Error::Invariant(format!(
                "method {} argument of type {actual:?}, expected {expected:?}",
                call.signature.id
            )));
        }
        validate_right(argument)?;
    }
    Ok(())
}
