//! Error types of the network crate.
//!
//! Registry errors are invariant violations: once raised, the discovered
//! network can no longer be trusted and exploration must stop.

use thiserror::Error;
use dn_structure::StructureError;

use crate::SpeciesId;

/// Violations of the one-id-per-canonical-form invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The canonical form is already registered under a different id.
    #[error("canonical form '{form}' is registered as {existing}, not {requested}")]
    FormConflict {
        form: String,
        existing: SpeciesId,
        requested: SpeciesId,
    },

    /// The id is already taken by a different canonical form.
    #[error("species id {id} is taken by '{existing}', cannot assign '{requested}'")]
    IdConflict {
        id: SpeciesId,
        existing: String,
        requested: String,
    },
}

/// Errors raised while building species or exploring a reaction network.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error("registry invariant violated: {0}")]
    Registry(#[from] RegistryError),

    /// A reaction refers to a type missing from the kinetics table.
    #[error("no rate for reaction type '{0}'")]
    UnknownReactionType(String),

    /// A reaction refers to a species id that was never registered.
    #[error("species {0} is not registered")]
    UnregisteredSpecies(SpeciesId),

    /// A species needs at least one strand.
    #[error("cannot build a species without strands")]
    EmptySpecies,

    #[error("failed to read configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The background exploration thread panicked.
    #[error("exploration worker panicked")]
    WorkerPanicked,
}
