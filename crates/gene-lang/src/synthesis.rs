//! Type-directed random tree construction.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use gene_core::{random_literal, GeneType, Result, SynthesisConfig};

use crate::program::{
    Assignment, Condition, ConditionalStatement, LeftStatement, Literal, MethodCall, OperatorExpr,
    RightStatement, RootStatement,
};
use crate::registry::SignatureRegistry;
use crate::signature::MethodSignature;

/// Builds type-correct random subtrees by consulting the signature registry.
///
/// Synthesis cannot fail once the registry holds at least one left method and
/// one read-write variable: every non-terminal band falls through to the next
/// when its pool is empty, and the literal terminal is total.
pub struct Synthesizer<'a> {
    registry: &'a SignatureRegistry,
    config: SynthesisConfig,
}

impl<'a> Synthesizer<'a> {
    pub fn new(registry: &'a SignatureRegistry, config: SynthesisConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &SignatureRegistry {
        self.registry
    }

    /// Builds a random right statement of the required type.
    ///
    /// One uniform draw selects among probability bands of 0.25 each for
    /// operator expression, variable read and method call; a band whose
    /// registry lookup comes up empty falls through. At the depth limit the
    /// draw is ignored and a literal is forced, which guarantees termination.
    pub fn right_statement(
        &self,
        required: GeneType,
        depth: u32,
        rng: &mut ChaCha8Rng,
    ) -> RightStatement {
        let draw: f64 = rng.gen();

        if depth < self.config.max_depth {
            if draw < 0.25 {
                if let Some(signature) = self.registry.try_select_operator(required, rng) {
                    let lhs = self.right_statement(signature.lhs_type, depth + 1, rng);
                    let rhs = self.right_statement(signature.rhs_type, depth + 1, rng);
                    return RightStatement::Operation(Box::new(OperatorExpr {
                        signature,
                        lhs,
                        rhs,
                    }));
                }
            }

            if draw < 0.5 {
                if let Some(signature) = self.registry.try_select_readable_variable(required, rng) {
                    return RightStatement::Variable(signature);
                }
            }

            if draw < 0.75 {
                if let Some(signature) = self.registry.try_select_right_method(required, rng) {
                    let call = self.method_call(signature, depth, rng);
                    return RightStatement::MethodCall(call);
                }
            }
        }

        RightStatement::Literal(Literal {
            value_type: required,
            value: random_literal(required, rng),
        })
    }

    /// Builds a random left statement: 50/50 between a left-method call and
    /// an assignment into a random read-write variable.
    pub fn left_statement(&self, depth: u32, rng: &mut ChaCha8Rng) -> Result<LeftStatement> {
        if rng.gen::<f64>() < 0.5 {
            let signature = self.registry.select_left_method(rng)?;
            Ok(LeftStatement::MethodCall(self.method_call(
                signature, depth, rng,
            )))
        } else {
            Ok(LeftStatement::Assignment(self.assignment(depth, rng)?))
        }
    }

    /// Builds a random assignment into a random read-write variable.
    pub fn assignment(&self, depth: u32, rng: &mut ChaCha8Rng) -> Result<Assignment> {
        let target = self.registry.select_read_write_variable(rng)?;
        let value = self.right_statement(target.variable_type, depth + 1, rng);
        Ok(Assignment { target, value })
    }

    /// Builds a random condition: a Bool right statement one level down.
    pub fn condition(&self, depth: u32, rng: &mut ChaCha8Rng) -> Condition {
        Condition {
            expr: self.right_statement(GeneType::Bool, depth + 1, rng),
        }
    }

    /// Builds a random root statement: 50/50 between a conditional action and
    /// a bare one.
    pub fn root_statement(&self, rng: &mut ChaCha8Rng) -> Result<RootStatement> {
        if rng.gen::<f64>() < 0.5 {
            Ok(RootStatement::Conditional(ConditionalStatement {
                condition: self.condition(0, rng),
                body: self.left_statement(1, rng)?,
            }))
        } else {
            Ok(RootStatement::Plain(self.left_statement(0, rng)?))
        }
    }

    /// Builds a call with one argument expression per declared parameter,
    /// each type-matched and one level deeper.
    fn method_call(
        &self,
        signature: std::sync::Arc<MethodSignature>,
        depth: u32,
        rng: &mut ChaCha8Rng,
    ) -> MethodCall {
        let arguments = signature
            .parameter_types
            .iter()
            .map(|&param| self.right_statement(param, depth + 1, rng))
            .collect();
        MethodCall {
            signature,
            arguments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gene_core::SynthesisConfig;
    use rand::SeedableRng;

    fn populated_registry() -> SignatureRegistry {
        let mut registry = SignatureRegistry::new();
        registry.register_standard_operators();
        registry.register_read_only_variable(0, GeneType::Int);
        registry.register_read_write_variable(1, GeneType::Int);
        registry.register_read_write_variable(2, GeneType::Bool);
        registry.register_read_write_variable(3, GeneType::Direction);
        registry.register_left_method(0, GeneType::Void, vec![GeneType::Direction]);
        registry.register_right_method(1, GeneType::Bool, vec![GeneType::Direction]);
        registry
    }

    fn max_expr_depth(statement: &RightStatement) -> u32 {
        match statement {
            RightStatement::Operation(op) => {
                1 + max_expr_depth(&op.lhs).max(max_expr_depth(&op.rhs))
            }
            RightStatement::MethodCall(call) => {
                1 + call.arguments.iter().map(max_expr_depth).max().unwrap_or(0)
            }
            RightStatement::Variable(_) | RightStatement::Literal(_) => 1,
        }
    }

    #[test]
    fn test_depth_limit_forces_literal() {
        let registry = populated_registry();
        let synth = Synthesizer::new(&registry, SynthesisConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..100 {
            let statement = synth.right_statement(GeneType::Int, 5, &mut rng);
            assert!(matches!(statement, RightStatement::Literal(_)));
        }
    }

    #[test]
    fn test_tree_depth_is_bounded() {
        let registry = populated_registry();
        let synth = Synthesizer::new(&registry, SynthesisConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        for _ in 0..200 {
            let statement = synth.right_statement(GeneType::Bool, 0, &mut rng);
            // Each recursion level adds one to depth; the limit plus the
            // terminal literal bounds the whole expression.
            assert!(max_expr_depth(&statement) <= 6);
        }
    }

    #[test]
    fn test_synthesized_type_matches_request() {
        let registry = populated_registry();
        let synth = Synthesizer::new(&registry, SynthesisConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for required in [GeneType::Int, GeneType::Bool, GeneType::Direction] {
            for depth in 0..6 {
                let statement = synth.right_statement(required, depth, &mut rng);
                assert_eq!(statement.return_type(), required);
            }
        }
    }

    #[test]
    fn test_empty_registry_still_yields_literal() {
        let registry = SignatureRegistry::new();
        let synth = Synthesizer::new(&registry, SynthesisConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        for required in [GeneType::Int, GeneType::Bool, GeneType::Direction] {
            let statement = synth.right_statement(required, 0, &mut rng);
            assert!(matches!(statement, RightStatement::Literal(_)));
            assert_eq!(statement.return_type(), required);
        }
    }

    #[test]
    fn test_left_statement_needs_populated_pools() {
        let registry = SignatureRegistry::new();
        let synth = Synthesizer::new(&registry, SynthesisConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        // With no left methods and no read-write variables either branch of
        // the 50/50 fails with EmptyRegistry.
        assert!(synth.left_statement(0, &mut rng).is_err());
    }

    #[test]
    fn test_root_statement_variants_both_occur() {
        let registry = populated_registry();
        let synth = Synthesizer::new(&registry, SynthesisConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        let mut saw_conditional = false;
        let mut saw_plain = false;
        for _ in 0..100 {
            match synth.root_statement(&mut rng).unwrap() {
                RootStatement::Conditional(c) => {
                    assert_eq!(c.condition.expr.return_type(), GeneType::Bool);
                    saw_conditional = true;
                }
                RootStatement::Plain(_) => saw_plain = true,
            }
        }
        assert!(saw_conditional && saw_plain);
    }
}
