//! Genetic value kinds and their one-byte codes.
//!
//! Every genetic value travels as a single `u8`; a [`GeneType`] tag gives the
//! byte its meaning. Types form a small closed set so the wire format and the
//! literal generators stay total.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The closed set of genetic value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneType {
    Int,
    Bool,
    Direction,
    /// Only valid as a method return type, never as a value slot.
    Void,
}

impl GeneType {
    /// One-byte wire code for this type.
    pub fn code(self) -> u8 {
        match self {
            GeneType::Int => 0,
            GeneType::Bool => 1,
            GeneType::Direction => 2,
            GeneType::Void => 3,
        }
    }

    pub fn from_code(code: u8, offset: usize) -> Result<Self, ParseError> {
        match code {
            0 => Ok(GeneType::Int),
            1 => Ok(GeneType::Bool),
            2 => Ok(GeneType::Direction),
            3 => Ok(GeneType::Void),
            _ => Err(ParseError::UnknownType { code, offset }),
        }
    }

    /// Returns true if `value` is a valid code for this type.
    pub fn contains(self, value: u8) -> bool {
        match self {
            GeneType::Int => true,
            GeneType::Bool => value <= 1,
            GeneType::Direction => value <= 3,
            GeneType::Void => value == 0,
        }
    }
}

/// One of four cardinal grid directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn code(self) -> u8 {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Direction::North),
            1 => Some(Direction::East),
            2 => Some(Direction::South),
            3 => Some(Direction::West),
            _ => None,
        }
    }
}

/// Draws a uniformly random valid code for `gene_type`.
///
/// Total for every type: this is the guaranteed fallback that keeps tree
/// synthesis from ever failing.
pub fn random_literal<R: Rng>(gene_type: GeneType, rng: &mut R) -> u8 {
    match gene_type {
        GeneType::Int => rng.gen::<u8>(),
        GeneType::Bool => rng.gen_range(0..=1),
        GeneType::Direction => rng.gen_range(0..=3),
        GeneType::Void => 0,
    }
}

/// The per-tick control signal produced by executing a left statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Halt,
}

impl Signal {
    pub fn code(self) -> u8 {
        match self {
            Signal::Continue => 0,
            Signal::Halt => 1,
        }
    }

    /// Any nonzero code halts.
    pub fn from_code(code: u8) -> Self {
        if code == 0 {
            Signal::Continue
        } else {
            Signal::Halt
        }
    }

    pub fn is_halt(self) -> bool {
        matches!(self, Signal::Halt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_type_code_round_trip() {
        for t in [
            GeneType::Int,
            GeneType::Bool,
            GeneType::Direction,
            GeneType::Void,
        ] {
            assert_eq!(GeneType::from_code(t.code(), 0).unwrap(), t);
        }
        assert!(GeneType::from_code(4, 0).is_err());
    }

    #[test]
    fn test_type_domains() {
        assert!(GeneType::Int.contains(255));
        assert!(GeneType::Bool.contains(1));
        assert!(!GeneType::Bool.contains(2));
        assert!(GeneType::Direction.contains(3));
        assert!(!GeneType::Direction.contains(4));
    }

    #[test]
    fn test_random_literal_stays_in_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            for t in [GeneType::Int, GeneType::Bool, GeneType::Direction] {
                assert!(t.contains(random_literal(t, &mut rng)));
            }
        }
    }

    #[test]
    fn test_direction_round_trip() {
        for d in [
            Direction::North,
            Direction::East,
            Direction::South,
            Direction::West,
        ] {
            assert_eq!(Direction::from_code(d.code()), Some(d));
        }
        assert_eq!(Direction::from_code(9), None);
    }

    #[test]
    fn test_signal_codes() {
        assert_eq!(Signal::from_code(0), Signal::Continue);
        assert_eq!(Signal::from_code(1), Signal::Halt);
        assert_eq!(Signal::from_code(200), Signal::Halt);
        assert!(Signal::Halt.is_halt());
        assert!(!Signal::Continue.is_halt());
    }
}
