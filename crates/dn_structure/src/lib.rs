//! The dn_structure crate.
//!
//! Provides the low-level representations of domain-level strand
//! displacement systems:
//!  - Domains and Strands (plus the notation lexer).
//!  - Bonds and the BondGraph, an undirected multigraph over strands.
//!  - Loop discovery and hidden-domain analysis on top of the BondGraph.
//!

mod error;
mod domain;
mod strand;
mod lexer;
mod bond;
mod bond_graph;
mod loops;

pub use error::*;
pub use domain::*;
pub use strand::*;
pub use lexer::*;
pub use bond::*;
pub use bond_graph::*;

/// Index of a strand (vertex) within a BondGraph.
pub type StrandIdx = usize;

/// Index of a domain within its strand.
pub type DomainIdx = usize;

/// Origin tag of a strand: which input line introduced its strand type.
pub type Color = usize;

/// A domain position: (strand, domain).
pub type Site = (StrandIdx, DomainIdx);
