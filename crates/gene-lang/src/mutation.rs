//! Structural mutation of behavior programs.
//!
//! Every tree level draws independent Bernoulli trials at the configured
//! mutation chance, in a fixed order, taking the first success. A successful
//! trial replaces the node with a freshly synthesized one of the same
//! statically-required type; children are never edited in place. At the
//! program level the same chance drives statement deletion and insertion,
//! with deletion pressure proportional to current length.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gene_core::{random_literal, MutationConfig, Result};

use crate::program::{
    Assignment, Condition, ConditionalStatement, LeftStatement, Literal, MethodCall, OperatorExpr,
    Program, RightStatement, RootStatement,
};
use crate::synthesis::Synthesizer;

pub struct Mutator<'a> {
    synthesizer: Synthesizer<'a>,
    config: MutationConfig,
}

impl<'a> Mutator<'a> {
    pub fn new(synthesizer: Synthesizer<'a>, config: MutationConfig) -> Self {
        Self {
            synthesizer,
            config,
        }
    }

    /// One Bernoulli trial at the configured mutation chance.
    fn roll(&self, rng: &mut ChaCha8Rng) -> bool {
        rng.gen::<f64>() <= self.config.mutation_chance
    }

    /// Possibly mutates the program, in the fixed trial order: delete a
    /// random statement, else insert a fresh one, else recurse into a random
    /// existing statement.
    ///
    /// The deletion probability is `len / max_root_statements`, so it is
    /// certain at the cap and the program length never exceeds it; insertion
    /// fills the remaining probability mass.
    pub fn mutate(&self, program: &mut Program, rng: &mut ChaCha8Rng) -> Result<()> {
        let len = program.len();
        let delete_chance = len as f64 / self.config.max_root_statements as f64;

        if rng.gen::<f64>() <= delete_chance && len > 0 {
            let index = rng.gen_range(0..len);
            program.remove(index);
            return Ok(());
        }

        if rng.gen::<f64>() <= 1.0 - delete_chance {
            let index = if len == 0 { 0 } else { rng.gen_range(0..len) };
            let statement = self.synthesizer.root_statement(rng)?;
            program.insert(index, statement);
            return Ok(());
        }

        if len > 0 {
            let index = rng.gen_range(0..len);
            self.mutate_root(&mut program.statements[index], rng)?;
        }

        Ok(())
    }

    fn mutate_root(&self, statement: &mut RootStatement, rng: &mut ChaCha8Rng) -> Result<()> {
        if self.roll(rng) {
            *statement = RootStatement::Conditional(ConditionalStatement {
                condition: self.synthesizer.condition(0, rng),
                body: self.synthesizer.left_statement(1, rng)?,
            });
            return Ok(());
        }

        if self.roll(rng) {
            *statement = RootStatement::Plain(self.synthesizer.left_statement(0, rng)?);
            return Ok(());
        }

        match statement {
            RootStatement::Conditional(conditional) => {
                self.mutate_conditional(conditional, 0, rng)
            }
            RootStatement::Plain(left) => self.mutate_left(left, 0, rng),
        }
    }

    fn mutate_conditional(
        &self,
        conditional: &mut ConditionalStatement,
        depth: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<()> {
        if self.roll(rng) {
            conditional.condition = self.synthesizer.condition(depth, rng);
            conditional.body = self.synthesizer.left_statement(depth + 1, rng)?;
            return Ok(());
        }

        self.mutate_condition(&mut conditional.condition, depth, rng);
        self.mutate_left(&mut conditional.body, depth + 1, rng)
    }

    fn mutate_condition(&self, condition: &mut Condition, depth: u32, rng: &mut ChaCha8Rng) {
        if self.roll(rng) {
            *condition = self.synthesizer.condition(depth, rng);
            return;
        }

        self.mutate_right(&mut condition.expr, depth + 1, rng);
    }

    fn mutate_left(
        &self,
        left: &mut LeftStatement,
        depth: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<()> {
        if self.roll(rng) {
            let signature = self.synthesizer.registry().select_left_method(rng)?;
            *left = LeftStatement::MethodCall(self.fresh_call(signature, depth, rng));
            return Ok(());
        }

        if self.roll(rng) {
            *left = LeftStatement::Assignment(self.synthesizer.assignment(depth, rng)?);
            return Ok(());
        }

        // Method calls are replaced wholesale, never mutated from within.
        if let LeftStatement::Assignment(assignment) = left {
            self.mutate_assignment(assignment, depth, rng)?;
        }
        Ok(())
    }

    fn mutate_assignment(
        &self,
        assignment: &mut Assignment,
        depth: u32,
        rng: &mut ChaCha8Rng,
    ) -> Result<()> {
        if self.roll(rng) {
            *assignment = self.synthesizer.assignment(depth, rng)?;
            return Ok(());
        }

        self.mutate_right(&mut assignment.value, depth + 1, rng);
        Ok(())
    }

    /// Replacement trials in fixed order: operator expression, variable read,
    /// method call, literal. Each substitute carries the same required type
    /// as the node it replaces.
    fn mutate_right(&self, statement: &mut RightStatement, depth: u32, rng: &mut ChaCha8Rng) {
        let required = statement.return_type();
        let registry = self.synthesizer.registry();

        if self.roll(rng) {
            if let Some(signature) = registry.try_select_operator(required, rng) {
                let lhs = self.synthesizer.right_statement(signature.lhs_type, depth + 1, rng);
                let rhs = self.synthesizer.right_statement(signature.rhs_type, depth + 1, rng);
                *statement = RightStatement::Operation(Box::new(OperatorExpr {
                    signature,
                    lhs,
                    rhs,
                }));
                return;
            }
        }

        if self.roll(rng) {
            if let Some(signature) = registry.try_select_readable_variable(required, rng) {
                *statement = RightStatement::Variable(signature);
                return;
            }
        }

        if self.roll(rng) {
            if let Some(signature) = registry.try_select_right_method(required, rng) {
                *statement = RightStatement::MethodCall(self.fresh_call(signature, depth, rng));
                return;
            }
        }

        if self.roll(rng) {
            *statement = RightStatement::Literal(Literal {
                value_type: required,
                value: random_literal(required, rng),
            });
            return;
        }

        if let RightStatement::Operation(operation) = statement {
            self.mutate_operation(operation, depth, rng);
        }
    }

    fn mutate_operation(&self, operation: &mut OperatorExpr, depth: u32, rng: &mut ChaCha8Rng) {
        let registry = self.synthesizer.registry();

        if self.roll(rng) {
            if let Some(signature) =
                registry.try_select_operator(operation.signature.return_type, rng)
            {
                operation.signature = signature;
                operation.lhs = self
                    .synthesizer
                    .right_statement(signature.lhs_type, depth + 1, rng);
                operation.rhs = self
                    .synthesizer
                    .right_statement(signature.rhs_type, depth + 1, rng);
                return;
            }
        }

        if self.roll(rng) {
            operation.rhs =
                self.synthesizer
                    .right_statement(operation.signature.rhs_type, depth + 1, rng);
            return;
        }

        if self.roll(rng) {
            operation.lhs =
                self.synthesizer
                    .right_statement(operation.signature.lhs_type, depth + 1, rng);
            return;
        }

        self.mutate_right(&mut operation.rhs, depth + 1, rng);
        self.mutate_right(&mut operation.lhs, depth + 1, rng);
    }

    fn fresh_call(
        &self,
        signature: std::sync::Arc<crate::signature::MethodSignature>,
        depth: u32,
        rng: &mut ChaCha8Rng,
    ) -> MethodCall {
        let arguments = signature
            .parameter_types
            .iter()
            .map(|&param| self.synthesizer.right_statement(param, depth + 1, rng))
            .collect();
        MethodCall {
            signature,
            arguments,
        }
    }
}
