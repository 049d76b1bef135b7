//! The dn_network crate.
//!
//! Species identity and reaction network discovery for domain-level
//! strand displacement systems:
//!  - Canonical forms of connected complexes (Species).
//!  - The id <-> canonical form registry and the ReactionNetwork.
//!  - The exploration driver, which grows a network to a fixpoint using
//!    a pluggable ReactionGenerator, and a background worker around it.
//!

mod error;
mod canonical;
mod species;
mod registry;
mod reactions;
mod network;
mod system;
mod explore;
mod worker;

pub use error::*;
pub use species::*;
pub use registry::*;
pub use reactions::*;
pub use network::*;
pub use system::*;
pub use explore::*;
pub use worker::*;

/// Sequential species id, assigned by the registry starting at 1.
pub type SpeciesId = usize;
