//! The evolvable behavior-program language.
//!
//! This crate defines the typed statement/expression tree that serves as an
//! agent's genotype, and the operations that create and transform it:
//! - Signatures + registry: the catalog of operators, variables and methods
//!   that trees may reference
//! - Synthesis: type-directed random construction, bounded by a depth limit
//! - Mutation: probabilistic subtree replacement plus statement
//!   insertion/deletion
//! - Codec: the compact tagged binary form used for persistence

pub mod codec;
pub mod mutation;
pub mod program;
pub mod registry;
pub mod signature;
pub mod synthesis;
pub mod validation;

pub use codec::{decode_program, encode_program};
pub use mutation::Mutator;
pub use program::{
    Assignment, Condition, ConditionalStatement, LeftStatement, Literal, MethodCall, OperatorExpr,
    Program, RightStatement, RootStatement,
};
pub use registry::SignatureRegistry;
pub use signature::{MethodSignature, OperatorKind, OperatorSignature, VariableSignature};
pub use synthesis::Synthesizer;
pub use validation::validate_program;
