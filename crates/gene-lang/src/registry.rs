//! Process-wide catalog of registered operators, variables and methods.
//!
//! The registry is populated once at startup and read-only afterwards; share
//! it behind an `Arc` when multiple agents synthesize or mutate concurrently.

use std::sync::Arc;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gene_core::{Error, GeneType, Result};

use crate::signature::{MethodSignature, OperatorKind, OperatorSignature, VariableSignature};

/// Type-indexed pools of every signature available to synthesis.
#[derive(Debug, Default)]
pub struct SignatureRegistry {
    left_methods: Vec<Arc<MethodSignature>>,
    right_methods: Vec<Arc<MethodSignature>>,
    read_only_variables: Vec<VariableSignature>,
    read_write_variables: Vec<VariableSignature>,
    operators: Vec<OperatorSignature>,
}

impl SignatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_left_method(&mut self, id: u8, return_type: GeneType, params: Vec<GeneType>) {
        self.left_methods
            .push(Arc::new(MethodSignature::new(id, return_type, params)));
    }

    pub fn register_right_method(&mut self, id: u8, return_type: GeneType, params: Vec<GeneType>) {
        self.right_methods
            .push(Arc::new(MethodSignature::new(id, return_type, params)));
    }

    pub fn register_read_only_variable(&mut self, id: u8, variable_type: GeneType) {
        self.read_only_variables
            .push(VariableSignature::new(id, variable_type));
    }

    pub fn register_read_write_variable(&mut self, id: u8, variable_type: GeneType) {
        self.read_write_variables
            .push(VariableSignature::new(id, variable_type));
    }

    pub fn register_operator(
        &mut self,
        kind: OperatorKind,
        return_type: GeneType,
        lhs_type: GeneType,
        rhs_type: GeneType,
    ) {
        self.operators.push(OperatorSignature {
            kind,
            return_type,
            lhs_type,
            rhs_type,
        });
    }

    /// Registers the stock operator set: saturating arithmetic on Int,
    /// bitwise logic on Bool, identity comparison on every value kind.
    pub fn register_standard_operators(&mut self) {
        use GeneType::{Bool, Direction, Int};

        self.register_operator(OperatorKind::Plus, Int, Int, Int);
        self.register_operator(OperatorKind::Minus, Int, Int, Int);
        self.register_operator(OperatorKind::And, Bool, Bool, Bool);
        self.register_operator(OperatorKind::Or, Bool, Bool, Bool);
        for t in [Int, Bool, Direction] {
            self.register_operator(OperatorKind::Equal, Bool, t, t);
            self.register_operator(OperatorKind::NotEqual, Bool, t, t);
        }
    }

    /// Uniform choice over all registered left methods.
    pub fn select_left_method(&self, rng: &mut ChaCha8Rng) -> Result<Arc<MethodSignature>> {
        if self.left_methods.is_empty() {
            return Err(Error::EmptyRegistry {
                pool: "left_methods",
            });
        }
        let index = rng.gen_range(0..self.left_methods.len());
        Ok(Arc::clone(&self.left_methods[index]))
    }

    /// Uniform choice over all registered read-write variables.
    pub fn select_read_write_variable(&self, rng: &mut ChaCha8Rng) -> Result<VariableSignature> {
        if self.read_write_variables.is_empty() {
            return Err(Error::EmptyRegistry {
                pool: "read_write_variables",
            });
        }
        let index = rng.gen_range(0..self.read_write_variables.len());
        Ok(self.read_write_variables[index])
    }

    /// Uniform choice among operators returning `return_type`, if any.
    pub fn try_select_operator(
        &self,
        return_type: GeneType,
        rng: &mut ChaCha8Rng,
    ) -> Option<OperatorSignature> {
        let candidates: Vec<&OperatorSignature> = self
            .operators
            .iter()
            .filter(|s| s.return_type == return_type)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(*candidates[rng.gen_range(0..candidates.len())])
    }

    /// Uniform choice among right methods returning `return_type`, if any.
    pub fn try_select_right_method(
        &self,
        return_type: GeneType,
        rng: &mut ChaCha8Rng,
    ) -> Option<Arc<MethodSignature>> {
        let candidates: Vec<&Arc<MethodSignature>> = self
            .right_methods
            .iter()
            .filter(|s| s.return_type == return_type)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(Arc::clone(candidates[rng.gen_range(0..candidates.len())]))
    }

    /// Uniform choice among readable variables of `return_type`, if any.
    ///
    /// Read-write is a superset capability, so the read-write pool is unioned
    /// into the candidates.
    pub fn try_select_readable_variable(
        &self,
        return_type: GeneType,
        rng: &mut ChaCha8Rng,
    ) -> Option<VariableSignature> {
        let candidates: Vec<&VariableSignature> = self
            .read_only_variables
            .iter()
            .chain(self.read_write_variables.iter())
            .filter(|s| s.variable_type == return_type)
            .collect();
        if candidates.is_empty() {
            return None;
        }
        Some(*candidates[rng.gen_range(0..candidates.len())])
    }
}
