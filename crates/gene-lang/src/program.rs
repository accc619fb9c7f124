//! The statement/expression tree that forms an agent's genotype.
//!
//! Each tagged union is a Rust enum, so "exactly one branch populated" is
//! unrepresentable rather than checked. Trees are created by the synthesizer
//! or the codec, replaced subtree-at-a-time by the mutator, and consumed by
//! the interpreter; nodes are never edited in place.

use std::sync::Arc;

use gene_core::GeneType;

use crate::signature::{MethodSignature, OperatorSignature, VariableSignature};

/// An ordered sequence of root statements: the unit of persistence and
/// execution for one agent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<RootStatement>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn push(&mut self, statement: RootStatement) {
        self.statements.push(statement);
    }

    pub fn insert(&mut self, index: usize, statement: RootStatement) {
        self.statements.insert(index, statement);
    }

    pub fn remove(&mut self, index: usize) -> RootStatement {
        self.statements.remove(index)
    }
}

/// A top-level executable unit.
#[derive(Debug, Clone, PartialEq)]
pub enum RootStatement {
    Conditional(ConditionalStatement),
    Plain(LeftStatement),
}

/// Executes the body only when the condition evaluates true.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalStatement {
    pub condition: Condition,
    pub body: LeftStatement,
}

/// A Bool-typed right statement guarding a conditional.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub expr: RightStatement,
}

/// A statement that performs a write or an action.
#[derive(Debug, Clone, PartialEq)]
pub enum LeftStatement {
    /// Side-effecting, Void-returning call; signals halt for the tick.
    MethodCall(MethodCall),
    /// Writes a computed value into a read-write variable; signals continue.
    Assignment(Assignment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: VariableSignature,
    pub value: RightStatement,
}

/// A pure, value-producing expression.
#[derive(Debug, Clone, PartialEq)]
pub enum RightStatement {
    Operation(Box<OperatorExpr>),
    Variable(VariableSignature),
    MethodCall(MethodCall),
    Literal(Literal),
}

impl RightStatement {
    /// The statically declared return type, derivable without evaluation.
    pub fn return_type(&self) -> GeneType {
        match self {
            RightStatement::Operation(op) => op.signature.return_type,
            RightStatement::Variable(sig) => sig.variable_type,
            RightStatement::MethodCall(call) => call.signature.return_type,
            RightStatement::Literal(lit) => lit.value_type,
        }
    }
}

/// A binary operator applied to two typed operands.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorExpr {
    pub signature: OperatorSignature,
    pub lhs: RightStatement,
    pub rhs: RightStatement,
}

/// A method call with one argument expression per declared parameter.
///
/// The same shape serves both grammar sides: as a left statement it is the
/// halting action call, as a right statement it produces a value.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub signature: Arc<MethodSignature>,
    pub arguments: Vec<RightStatement>,
}

/// A type tag plus an 8-bit value from that type's valid domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    pub value_type: GeneType,
    pub value: u8,
}
