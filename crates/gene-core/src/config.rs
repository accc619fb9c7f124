//! Configuration for synthesis and mutation.

use serde::{Deserialize, Serialize};

/// Limits for type-directed random tree construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Depth at which right-statement synthesis is forced down to a literal.
    pub max_depth: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self { max_depth: 5 }
    }
}

/// Parameters for the structural mutation operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Probability for each Bernoulli mutation trial.
    pub mutation_chance: f64,
    /// Hard cap on program length. The statement-deletion probability scales
    /// with `len / max_root_statements`, so deletion is certain at the cap.
    pub max_root_statements: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            mutation_chance: 0.01,
            max_root_statements: 10_000,
        }
    }
}
