//! The host-side collaborator a program executes against.

use gene_core::Signal;
use gene_lang::{MethodSignature, VariableSignature};

/// Typed surface the host exposes to an executing program.
///
/// The core consumes this trait and never implements it; the host decides
/// what the registered variable and method ids mean. Left methods are the
/// action-producing calls: their signal ends the tick when it is
/// [`Signal::Halt`].
pub trait ExecutionContext {
    /// Reads the current code of a context-owned variable.
    fn read_variable(&self, signature: &VariableSignature) -> u8;

    /// Stores a computed code into a read-write variable.
    fn write_variable(&mut self, signature: &VariableSignature, value: u8);

    /// Performs a side-effecting action; the returned signal decides whether
    /// the tick continues.
    fn execute_left_method(&mut self, signature: &MethodSignature, args: &[u8]) -> Signal;

    /// Computes a value from host state without consuming the tick.
    fn execute_right_method(&mut self, signature: &MethodSignature, args: &[u8]) -> u8;
}
