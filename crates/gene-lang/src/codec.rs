//! Binary program codec.
//!
//! Depth-first pre-order tagged records, one byte of tag per node. There is
//! no header, version byte or length prefix; signatures are re-encoded by
//! value at every use site, so records are self-contained. Decoding at the
//! program level is recovered per root statement: a malformed record is
//! logged and dropped, and scanning resumes at the next root-statement tag,
//! which confines bit rot or version skew to individual statements.

use std::sync::Arc;

use tracing::warn;

use gene_core::{error::ParseError, GeneType};

use crate::program::{
    Assignment, Condition, ConditionalStatement, LeftStatement, Literal, MethodCall, OperatorExpr,
    Program, RightStatement, RootStatement,
};
use crate::signature::{MethodSignature, OperatorKind, OperatorSignature, VariableSignature};

/// One-byte kind tags. The numbering is part of the wire format.
pub mod tag {
    pub const ASSIGNMENT: u8 = 0;
    pub const CONDITION: u8 = 1;
    pub const CONDITIONAL_LEFT_STATEMENT: u8 = 2;
    pub const LEFT_METHOD_CALL: u8 = 3;
    pub const LEFT_STATEMENT: u8 = 4;
    pub const LITERAL_VALUE: u8 = 5;
    pub const READ_ONLY_VARIABLE: u8 = 6;
    pub const READ_WRITE_VARIABLE: u8 = 7;
    pub const RIGHT_METHOD_CALL: u8 = 8;
    pub const RIGHT_STATEMENT: u8 = 9;
    pub const RIGHT_STATEMENT_OPERATION: u8 = 10;
    pub const ROOT_STATEMENT: u8 = 11;
    pub const METHOD_SIGNATURE: u8 = 12;
}

/// Serializes a program to its wire form.
pub fn encode_program(program: &Program) -> Vec<u8> {
    let mut out = Vec::new();
    for statement in &program.statements {
        encode_root(statement, &mut out);
    }
    out
}

fn encode_root(statement: &RootStatement, out: &mut Vec<u8>) {
    out.push(tag::ROOT_STATEMENT);
    match statement {
        RootStatement::Conditional(conditional) => encode_conditional(conditional, out),
        RootStatement::Plain(left) => encode_left(left, out),
    }
}

fn encode_conditional(conditional: &ConditionalStatement, out: &mut Vec<u8>) {
    out.push(tag::CONDITIONAL_LEFT_STATEMENT);
    out.push(tag::CONDITION);
    encode_right(&conditional.condition.expr, out);
    encode_left(&conditional.body, out);
}

fn encode_left(left: &LeftStatement, out: &mut Vec<u8>) {
    out.push(tag::LEFT_STATEMENT);
    match left {
        LeftStatement::MethodCall(call) => {
            out.push(tag::LEFT_METHOD_CALL);
            encode_method_call_body(call, out);
        }
        LeftStatement::Assignment(assignment) => encode_assignment(assignment, out),
    }
}

fn encode_assignment(assignment: &Assignment, out: &mut Vec<u8>) {
    out.push(tag::ASSIGNMENT);
    out.push(tag::READ_WRITE_VARIABLE);
    encode_variable_signature(&assignment.target, out);
    encode_right(&assignment.value, out);
}

fn encode_right(statement: &RightStatement, out: &mut Vec<u8>) {
    out.push(tag::RIGHT_STATEMENT);
    match statement {
        RightStatement::Operation(operation) => {
            out.push(tag::RIGHT_STATEMENT_OPERATION);
            encode_operator_signature(&operation.signature, out);
            encode_right(&operation.lhs, out);
            encode_right(&operation.rhs, out);
        }
        RightStatement::Variable(signature) => {
            out.push(tag::READ_ONLY_VARIABLE);
            encode_variable_signature(signature, out);
        }
        RightStatement::MethodCall(call) => {
            out.push(tag::RIGHT_METHOD_CALL);
            encode_method_call_body(call, out);
        }
        RightStatement::Literal(literal) => {
            out.push(tag::LITERAL_VALUE);
            out.push(literal.value_type.code());
            out.push(literal.value);
        }
    }
}

fn encode_method_call_body(call: &MethodCall, out: &mut Vec<u8>) {
    encode_method_signature(&call.signature, out);
    for argument in &call.arguments {
        encode_right(argument, out);
    }
}

fn encode_method_signature(signature: &MethodSignature, out: &mut Vec<u8>) {
    // The wire format stores the parameter count in one byte.
    debug_assert!(
        signature.parameter_types.len() <= u8::MAX as usize,
        "method {} declares {} parameters, more than the wire format can carry",
        signature.id,
        signature.parameter_types.len()
    );
    out.push(tag::METHOD_SIGNATURE);
    out.push(signature.id);
    out.push(signature.return_type.code());
    out.push(signature.parameter_types.len() as u8);
    for param in &signature.parameter_types {
        out.push(param.code());
    }
}

fn encode_variable_signature(signature: &VariableSignature, out: &mut Vec<u8>) {
    out.push(signature.variable_type.code());
    out.push(signature.id);
}

fn encode_operator_signature(signature: &OperatorSignature, out: &mut Vec<u8>) {
    out.push(signature.kind.code());
    out.push(signature.return_type.code());
    out.push(signature.lhs_type.code());
    out.push(signature.rhs_type.code());
}

/// Deserializes a program from its wire form.
///
/// Malformed root statements are dropped with a warning rather than failing
/// the whole read; an empty input yields an empty program.
pub fn decode_program(bytes: &[u8]) -> Program {
    let mut decoder = Decoder { bytes, pos: 0 };
    let mut program = Program::new();
    let mut dropped = 0usize;

    while let Some(byte) = decoder.peek() {
        if byte != tag::ROOT_STATEMENT {
            decoder.pos += 1;
            continue;
        }
        decoder.pos += 1;
        let start = decoder.pos - 1;
        match decoder.root_statement() {
            Ok(statement) => program.push(statement),
            Err(err) => {
                // Expected with version skew or damaged streams; the rest of
                // the program is still worth recovering.
                warn!(offset = start, error = %err, "dropping unparseable root statement");
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        warn!(
            dropped,
            kept = program.len(),
            "program decoded with damaged root statements"
        );
    }
    program
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Decoder<'_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn read_u8(&mut self) -> Result<u8, ParseError> {
        let byte = self
            .bytes
            .get(self.pos)
            .copied()
            .ok_or(ParseError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    fn expect_tag(&mut self, expected: &[u8]) -> Result<u8, ParseError> {
        let offset = self.pos;
        let actual = self.read_u8()?;
        if expected.contains(&actual) {
            Ok(actual)
        } else {
            Err(ParseError::UnexpectedTag {
                expected: expected.to_vec(),
                actual,
                offset,
            })
        }
    }

    fn gene_type(&mut self) -> Result<GeneType, ParseError> {
        let offset = self.pos;
        let code = self.read_u8()?;
        GeneType::from_code(code, offset)
    }

    /// Decodes the body following a root-statement tag.
    fn root_statement(&mut self) -> Result<RootStatement, ParseError> {
        match self.expect_tag(&[tag::CONDITIONAL_LEFT_STATEMENT, tag::LEFT_STATEMENT])? {
            tag::CONDITIONAL_LEFT_STATEMENT => {
                self.expect_tag(&[tag::CONDITION])?;
                let condition = Condition {
                    expr: self.right_statement()?,
                };
                let body = self.left_statement()?;
                Ok(RootStatement::Conditional(ConditionalStatement {
                    condition,
                    body,
                }))
            }
            _ => Ok(RootStatement::Plain(self.left_statement_body()?)),
        }
    }

    fn left_statement(&mut self) -> Result<LeftStatement, ParseError> {
        self.expect_tag(&[tag::LEFT_STATEMENT])?;
        self.left_statement_body()
    }

    fn left_statement_body(&mut self) -> Result<LeftStatement, ParseError> {
        match self.expect_tag(&[tag::LEFT_METHOD_CALL, tag::ASSIGNMENT])? {
            tag::LEFT_METHOD_CALL => Ok(LeftStatement::MethodCall(self.method_call()?)),
            _ => {
                self.expect_tag(&[tag::READ_WRITE_VARIABLE])?;
                let target = self.variable_signature()?;
                let value = self.right_statement()?;
                Ok(LeftStatement::Assignment(Assignment { target, value }))
            }
        }
    }

    fn right_statement(&mut self) -> Result<RightStatement, ParseError> {
        self.expect_tag(&[tag::RIGHT_STATEMENT])?;
        match self.expect_tag(&[
            tag::RIGHT_STATEMENT_OPERATION,
            tag::READ_ONLY_VARIABLE,
            tag::RIGHT_METHOD_CALL,
            tag::LITERAL_VALUE,
        ])? {
            tag::RIGHT_STATEMENT_OPERATION => {
                let signature = self.operator_signature()?;
                let lhs = self.right_statement()?;
                let rhs = self.right_statement()?;
                Ok(RightStatement::Operation(Box::new(OperatorExpr {
                    signature,
                    lhs,
                    rhs,
                })))
            }
            tag::READ_ONLY_VARIABLE => Ok(RightStatement::Variable(self.variable_signature()?)),
            tag::RIGHT_METHOD_CALL => Ok(RightStatement::MethodCall(self.method_call()?)),
            _ => {
                let type_offset = self.pos;
                let value_type = self.gene_type()?;
                let value = self.read_u8()?;
                if !value_type.contains(value) {
                    return Err(ParseError::InvalidLiteral {
                        type_code: value_type.code(),
                        value,
                        offset: type_offset,
                    });
                }
                Ok(RightStatement::Literal(Literal { value_type, value }))
            }
        }
    }

    fn method_call(&mut self) -> Result<MethodCall, ParseError> {
        self.expect_tag(&[tag::METHOD_SIGNATURE])?;
        let signature = Arc::new(self.method_signature()?);
        let mut arguments = Vec::with_capacity(signature.parameter_types.len());
        for _ in 0..signature.parameter_types.len() {
            arguments.push(self.right_statement()?);
        }
        Ok(MethodCall {
            signature,
            arguments,
        })
    }

    fn method_signature(&mut self) -> Result<MethodSignature, ParseError> {
        let id = self.read_u8()?;
        let return_type = self.gene_type()?;
        let count = self.read_u8()?;
        let mut parameter_types = Vec::with_capacity(count as usize);
        for _ in 0..count {
            parameter_types.push(self.gene_type()?);
        }
        Ok(MethodSignature {
            id,
            return_type,
            parameter_types,
        })
    }

    fn variable_signature(&mut self) -> Result<VariableSignature, ParseError> {
        let variable_type = self.gene_type()?;
        let id = self.read_u8()?;
        Ok(VariableSignature { variable_type, id })
    }

    fn operator_signature(&mut self) -> Result<OperatorSignature, ParseError> {
        let offset = self.pos;
        let kind = OperatorKind::from_code(self.read_u8()?, offset)?;
        let return_type = self.gene_type()?;
        let lhs_type = self.gene_type()?;
        let rhs_type = self.gene_type()?;
        Ok(OperatorSignature {
            kind,
            return_type,
            lhs_type,
            rhs_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SignatureRegistry;
    use crate::synthesis::Synthesizer;
    use gene_core::SynthesisConfig;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_registry() -> SignatureRegistry {
        let mut registry = SignatureRegistry::new();
        registry.register_standard_operators();
        registry.register_read_only_variable(0, GeneType::Int);
        registry.register_read_write_variable(1, GeneType::Int);
        registry.register_read_write_variable(2, GeneType::Direction);
        registry.register_left_method(0, GeneType::Void, vec![GeneType::Direction]);
        registry.register_left_method(1, GeneType::Void, vec![]);
        registry.register_right_method(2, GeneType::Bool, vec![GeneType::Direction]);
        registry
    }

    fn explicit_program() -> Program {
        // One statement of every node kind, written out by hand so the test
        // does not depend on synthesis.
        let call_sig = Arc::new(MethodSignature::new(
            7,
            GeneType::Bool,
            vec![GeneType::Direction],
        ));
        let condition = Condition {
            expr: RightStatement::Operation(Box::new(OperatorExpr {
                signature: OperatorSignature {
                    kind: OperatorKind::Equal,
                    return_type: GeneType::Bool,
                    lhs_type: GeneType::Int,
                    rhs_type: GeneType::Int,
                },
                lhs: RightStatement::Variable(VariableSignature::new(0, GeneType::Int)),
                rhs: RightStatement::Literal(Literal {
                    value_type: GeneType::Int,
                    value: 42,
                }),
            })),
        };
        let body = LeftStatement::Assignment(Assignment {
            target: VariableSignature::new(1, GeneType::Bool),
            value: RightStatement::MethodCall(MethodCall {
                signature: Arc::clone(&call_sig),
                arguments: vec![RightStatement::Literal(Literal {
                    value_type: GeneType::Direction,
                    value: 2,
                })],
            }),
        });
        let action_sig = Arc::new(MethodSignature::new(3, GeneType::Void, vec![]));

        Program {
            statements: vec![
                RootStatement::Conditional(ConditionalStatement { condition, body }),
                RootStatement::Plain(LeftStatement::MethodCall(MethodCall {
                    signature: action_sig,
                    arguments: vec![],
                })),
            ],
        }
    }

    #[test]
    fn test_empty_stream_decodes_to_empty_program() {
        let program = decode_program(&[]);
        assert!(program.is_empty());
    }

    #[test]
    fn test_explicit_round_trip() {
        let program = explicit_program();
        let bytes = encode_program(&program);
        let decoded = decode_program(&bytes);
        assert_eq!(decoded, program);
        assert_eq!(encode_program(&decoded), bytes);
    }

    #[test]
    fn test_corrupt_record_is_isolated() {
        let program = explicit_program();
        let first = Program {
            statements: vec![program.statements[0].clone()],
        };
        let second = Program {
            statements: vec![program.statements[1].clone()],
        };

        let mut bytes = encode_program(&first);
        // A root-statement tag followed by a byte that is no valid child tag.
        bytes.push(tag::ROOT_STATEMENT);
        bytes.push(200);
        bytes.extend_from_slice(&encode_program(&second));

        let decoded = decode_program(&bytes);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded.statements[0], first.statements[0]);
        assert_eq!(decoded.statements[1], second.statements[0]);
    }

    #[test]
    fn test_truncated_tail_keeps_earlier_statements() {
        let program = explicit_program();
        let mut bytes = encode_program(&program);
        // Start a new statement and cut it off mid-record.
        bytes.push(tag::ROOT_STATEMENT);
        bytes.push(tag::CONDITIONAL_LEFT_STATEMENT);

        let decoded = decode_program(&bytes);
        assert_eq!(decoded.len(), program.len());
    }

    #[test]
    fn test_out_of_domain_literal_is_rejected() {
        let program = Program {
            statements: vec![RootStatement::Plain(LeftStatement::Assignment(
                Assignment {
                    target: VariableSignature::new(1, GeneType::Bool),
                    value: RightStatement::Literal(Literal {
                        value_type: GeneType::Bool,
                        value: 1,
                    }),
                },
            ))],
        };
        let mut bytes = encode_program(&program);
        // Corrupt the literal payload (last byte) to an invalid Bool code.
        *bytes.last_mut().unwrap() = 9;

        let decoded = decode_program(&bytes);
        assert!(decoded.is_empty());
    }

    #[test]
    #[should_panic(expected = "more than the wire format can carry")]
    fn test_oversized_parameter_list_is_rejected() {
        let signature = Arc::new(MethodSignature::new(
            0,
            GeneType::Void,
            vec![GeneType::Int; 256],
        ));
        let program = Program {
            statements: vec![RootStatement::Plain(LeftStatement::MethodCall(
                MethodCall {
                    signature,
                    arguments: vec![
                        RightStatement::Literal(Literal {
                            value_type: GeneType::Int,
                            value: 0,
                        });
                        256
                    ],
                },
            ))],
        };
        encode_program(&program);
    }

    proptest! {
        #[test]
        fn prop_synthesized_programs_round_trip(seed in any::<u64>(), len in 0usize..12) {
            let registry = sample_registry();
            let synth = Synthesizer::new(&registry, SynthesisConfig::default());
            let mut rng = ChaCha8Rng::seed_from_u64(seed);

            let mut program = Program::new();
            for _ in 0..len {
                program.push(synth.root_statement(&mut rng).unwrap());
            }

            let bytes = encode_program(&program);
            let decoded = decode_program(&bytes);
            prop_assert_eq!(&decoded, &program);
            prop_assert_eq!(encode_program(&decoded), bytes);
        }
    }
}
