//! Order diagnostics and fatal compile errors.
//!
//! A rejected order is logged to the ordering species' transcript and
//! parsing carries on. A fatal error breaks a capacity bound the tactical
//! resolver relies on and aborts the whole run.

use thiserror::Error;

use crate::galaxy::{Sector, SpeciesId};
use crate::protocol::TokenError;

/// Why a single order was ignored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("no BATTLE order is in effect")]
    NoBattle,

    #[error(transparent)]
    Operand(#[from] TokenError),

    #[error("you have nothing at sector {0}")]
    NotPresent(Sector),

    #[error("{what} must be between {min} and {max}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("no more than {0} ENGAGE options are allowed")]
    TooManyEngageOptions(usize),

    #[error("you have no ship named '{0}'")]
    NoSuchShip(String),

    #[error("ship '{0}' is not landed")]
    ShipNotLanded(String),

    #[error("unknown or ambiguous species name '{0}'")]
    UnknownSpecies(String),
}

/// Capacity violations that abort the run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompileError {
    #[error("more than {0} battle locations in one turn")]
    TooManyBattles(usize),

    #[error("species {species} names more than {max} enemies at sector {sector}")]
    TooManyEnemies {
        species: SpeciesId,
        sector: Sector,
        max: usize,
    },
}

/// Outcome of a failed order handler.
#[derive(Debug, PartialEq, Eq)]
pub enum OrderFault {
    Rejected(OrderError),
    Fatal(CompileError),
}

impl From<OrderError> for OrderFault {
    fn from(e: OrderError) -> Self {
        OrderFault::Rejected(e)
    }
}

impl From<TokenError> for OrderFault {
    fn from(e: TokenError) -> Self {
        OrderFault::Rejected(OrderError::Operand(e))
    }
}

impl From<CompileError> for OrderFault {
    fn from(e: CompileError) -> Self {
        OrderFault::Fatal(e)
    }
}

/// Reads an integer operand and checks it against an inclusive range.
pub(crate) fn int_in_range(
    ops: &mut crate::protocol::Operands<'_>,
    what: &'static str,
    min: i64,
    max: i64,
) -> Result<i64, OrderError> {
    let value = ops.int(what)?;
    if value < min || value > max {
        return Err(OrderError::OutOfRange {
            what,
            value,
            min,
            max,
        });
    }
    Ok(value)
}
