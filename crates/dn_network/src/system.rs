use log::info;
use log::warn;

use dn_structure::Strand;
use dn_structure::StructureError;
use dn_structure::assign_colors;
use dn_structure::lex_strand;

use crate::NetworkError;
use crate::ReactionNetwork;
use crate::Species;

/// Splits strand notation into blocks of strands.
///
/// One strand per line; a line `//` separates blocks, a line `--` ends the
/// input. Blank lines are ignored. Every strand is tagged with its running
/// position in the input, starting at 1.
pub fn parse_blocks(text: &str) -> Result<Vec<Vec<Strand>>, StructureError> {
    let mut blocks = vec![Vec::new()];
    let mut count = 0;
    for line in text.lines() {
        match line.trim() {
            "" => (),
            "--" => break,
            "//" => blocks.push(Vec::new()),
            strand => {
                count += 1;
                let strand = lex_strand(&format!("{strand}\n"), count)?;
                if let Some(block) = blocks.last_mut() {
                    block.push(strand);
                }
            }
        }
    }
    blocks.retain(|b| !b.is_empty());
    Ok(blocks)
}

/// The registered species of the input, before any exploration.
#[derive(Debug, Clone)]
pub struct InitialSystem {
    network: ReactionNetwork,
    strand_types: usize,
}

impl InitialSystem {
    /// Tags all strands by type (across blocks), then registers one
    /// species per connected component of every block.
    pub fn from_blocks(mut blocks: Vec<Vec<Strand>>) -> Result<Self, NetworkError> {
        let strand_types = assign_colors(blocks.iter_mut().flatten());
        let mut network = ReactionNetwork::new();
        for (b, block) in blocks.into_iter().enumerate() {
            if block.is_empty() {
                continue;
            }
            for species in Species::from_strands(block)? {
                let (id, is_new) = network.register(species)?;
                if !is_new {
                    warn!("Block {} repeats species {}, ignoring the duplicate.", b + 1, id);
                }
            }
        }
        info!("Initial system: {} species over {} strand types.", network.len(), strand_types);
        Ok(InitialSystem { network, strand_types })
    }

    pub fn from_text(text: &str) -> Result<Self, NetworkError> {
        Self::from_blocks(parse_blocks(text)?)
    }

    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    pub fn into_network(self) -> ReactionNetwork {
        self.network
    }

    /// Number of initial species.
    pub fn len(&self) -> usize {
        self.network.len()
    }

    pub fn is_empty(&self) -> bool {
        self.network.is_empty()
    }

    /// Number of distinct strand types (origin tags) in the input.
    pub fn strand_types(&self) -> usize {
        self.strand_types
    }
}
