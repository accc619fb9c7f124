//! Immutable descriptors for the operators, variables and methods a program
//! may reference, plus the fixed operator semantics.

use gene_core::{error::ParseError, GeneType};

/// The closed set of binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Plus,
    Minus,
    And,
    Or,
    Equal,
    NotEqual,
}

impl OperatorKind {
    pub fn code(self) -> u8 {
        match self {
            OperatorKind::Plus => 0,
            OperatorKind::Minus => 1,
            OperatorKind::And => 2,
            OperatorKind::Or => 3,
            OperatorKind::Equal => 4,
            OperatorKind::NotEqual => 5,
        }
    }

    pub fn from_code(code: u8, offset: usize) -> Result<Self, ParseError> {
        match code {
            0 => Ok(OperatorKind::Plus),
            1 => Ok(OperatorKind::Minus),
            2 => Ok(OperatorKind::And),
            3 => Ok(OperatorKind::Or),
            4 => Ok(OperatorKind::Equal),
            5 => Ok(OperatorKind::NotEqual),
            _ => Err(ParseError::UnknownOperator { code, offset }),
        }
    }

    /// Applies the operator's fixed 8-bit semantics to two raw codes.
    ///
    /// Plus saturates at 255 and Minus at 0. Equal/NotEqual compare codes for
    /// identity, independent of the declared type tag.
    pub fn apply(self, lhs: u8, rhs: u8) -> u8 {
        match self {
            OperatorKind::Plus => lhs.saturating_add(rhs),
            OperatorKind::Minus => lhs.saturating_sub(rhs),
            OperatorKind::And => lhs & rhs,
            OperatorKind::Or => lhs | rhs,
            OperatorKind::Equal => u8::from(lhs == rhs),
            OperatorKind::NotEqual => u8::from(lhs != rhs),
        }
    }
}

/// Type contract of a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorSignature {
    pub kind: OperatorKind,
    pub return_type: GeneType,
    pub lhs_type: GeneType,
    pub rhs_type: GeneType,
}

/// Identity and type of a variable owned by the execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSignature {
    pub variable_type: GeneType,
    pub id: u8,
}

impl VariableSignature {
    pub fn new(id: u8, variable_type: GeneType) -> Self {
        Self { variable_type, id }
    }
}

/// Identity and type contract of a callable method on the execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub id: u8,
    pub return_type: GeneType,
    pub parameter_types: Vec<GeneType>,
}

impl MethodSignature {
    pub fn new(id: u8, return_type: GeneType, parameter_types: Vec<GeneType>) -> Self {
        Self {
            id,
            return_type,
            parameter_types,
        }
    }
}
