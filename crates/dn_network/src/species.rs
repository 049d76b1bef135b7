//! Species: connected complexes of bonded strands, identified by their
//! canonical form.

use std::fmt;
use std::collections::BTreeMap;
use log::debug;

use dn_structure::BondGraph;
use dn_structure::Color;
use dn_structure::Strand;
use dn_structure::StrandIdx;

use crate::canonical::derive_canonical_form;
use crate::NetworkError;
use crate::SpeciesId;

/// One connected complex.
///
/// Once built, a species only changes by receiving its id from the
/// registry. Its strands are reconstructed from the canonical form, in
/// parsing order, so two species with the same canonical form also have
/// identical strands.
#[derive(Debug, Clone)]
pub struct Species {
    id: Option<SpeciesId>,
    nodes: Vec<StrandIdx>,
    colormap: BTreeMap<Color, Vec<StrandIdx>>,
    canonical_form: String,
    parsing_seq: Vec<StrandIdx>,
    strands: Vec<Strand>,
}

impl Species {
    /// The species formed by the component `nodes` of `graph`, whose
    /// vertices index into `strands`.
    ///
    /// `nodes` must be exactly one connected component of `graph`.
    pub fn new(
        nodes: Vec<StrandIdx>,
        graph: &BondGraph,
        strands: &[Strand],
    ) -> Result<Self, NetworkError> {
        if nodes.is_empty() {
            return Err(NetworkError::EmptySpecies);
        }
        debug_assert!(nodes.iter().all(|&v| graph.component_of(v) == graph.component_of(nodes[0])));

        let colormap = graph.color_map(&nodes);
        let (canonical_form, parsing_seq) = derive_canonical_form(&colormap, graph, strands);
        debug!("Species over strands {:?}: {}", nodes, canonical_form);

        let mut species = Species {
            id: None,
            nodes,
            colormap,
            canonical_form,
            parsing_seq,
            strands: Vec::new(),
        };
        species.strands = species.construct_strands(graph)?;
        Ok(species)
    }

    /// One species per connected component of a set of strands, in
    /// component order.
    pub fn from_strands(strands: Vec<Strand>) -> Result<Vec<Self>, NetworkError> {
        if strands.is_empty() {
            return Err(NetworkError::EmptySpecies);
        }
        let graph = BondGraph::from_strands(&strands)?;
        graph.components()
            .into_iter()
            .map(|nodes| Species::new(nodes, &graph, &strands))
            .collect()
    }

    /// Reverse construction: canonical form -> strands, with origin tags.
    fn construct_strands(&self, graph: &BondGraph) -> Result<Vec<Strand>, NetworkError> {
        self.canonical_form
            .split('|')
            .zip(&self.parsing_seq)
            .map(|(part, &v)| {
                let mut strand = Strand::try_from(part)?;
                strand.add_color(graph.color(v));
                Ok(strand)
            })
            .collect()
    }

    /// Rebuilds the bond graph of this species from its strands.
    pub fn bond_graph(&self) -> Result<BondGraph, NetworkError> {
        Ok(BondGraph::from_strands(&self.strands)?)
    }

    pub fn id(&self) -> Option<SpeciesId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: SpeciesId) {
        self.id = Some(id);
    }

    pub fn canonical_form(&self) -> &str {
        &self.canonical_form
    }

    /// Strands in parsing order.
    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    /// Vertices of the source graph, in the order they were parsed.
    pub fn parsing_seq(&self) -> &[StrandIdx] {
        &self.parsing_seq
    }

    /// Vertices of the source graph forming this species.
    pub fn nodes(&self) -> &[StrandIdx] {
        &self.nodes
    }

    pub fn colormap(&self) -> &BTreeMap<Color, Vec<StrandIdx>> {
        &self.colormap
    }

    pub fn colorset(&self) -> impl Iterator<Item = Color> + '_ {
        self.colormap.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.strands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strands.is_empty()
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        self.canonical_form == other.canonical_form
    }
}

impl Eq for Species {}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => writeln!(f, "{id}")?,
            None => writeln!(f, "-")?,
        }
        for strand in &self.strands {
            writeln!(f, "{strand}")?;
        }
        Ok(())
    }
}
