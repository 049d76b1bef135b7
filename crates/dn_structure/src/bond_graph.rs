//! The bond graph: an undirected multigraph with strands as vertices.
//!
//! Every vertex keeps one coalesced [`Bond`] per neighbor (itself included,
//! for hairpins), and the adjacency is kept symmetric: if `a` has a bond to
//! `b` with `(dom, dom2)`, then `b` has the mirrored bond to `a`.
//!
//! After construction, [`BondGraph::analyze`] labels connected components,
//! records the loops of the graph and computes the hidden domains.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use ahash::AHashMap;
use ahash::AHashSet;
use nohash_hasher::IntSet;

use crate::Bond;
use crate::Color;
use crate::DomainIdx;
use crate::Site;
use crate::Strand;
use crate::StrandIdx;
use crate::StructureError;

#[derive(Debug, Clone, Default)]
pub struct BondGraph {
    pub(crate) adj: Vec<Vec<Bond>>,
    pub(crate) color: Vec<Color>,
    pub(crate) loops: Vec<Vec<StrandIdx>>,
    pub(crate) hidden: BTreeSet<Site>,
    pub(crate) species: Vec<usize>,
    pub(crate) species_num: usize,
}

impl BondGraph {
    /// An unbonded graph over `colors.len()` strands.
    pub fn new(colors: Vec<Color>) -> Self {
        BondGraph {
            adj: vec![Vec::new(); colors.len()],
            species: (0..colors.len()).collect(),
            species_num: colors.len(),
            color: colors,
            loops: Vec::new(),
            hidden: BTreeSet::new(),
        }
    }

    /// Builds and analyzes the graph of one block of strands.
    ///
    /// Domains are paired by bond label: every label must occur exactly
    /// twice within the block. Strands without an origin tag get color 0.
    pub fn from_strands(strands: &[Strand]) -> Result<Self, StructureError> {
        let colors = strands.iter().map(|s| s.color().unwrap_or(0)).collect();
        let mut graph = BondGraph::new(colors);

        let mut open: AHashMap<&str, Site> = AHashMap::default();
        let mut closed: AHashSet<&str> = AHashSet::default();
        for (v, strand) in strands.iter().enumerate() {
            for (d, label) in strand.bonded_positions() {
                if closed.contains(label) {
                    return Err(StructureError::OverboundLabel(label.to_string()));
                }
                match open.remove(label) {
                    Some((v1, d1)) => {
                        graph.add_edges(v1, v, d1, d);
                        closed.insert(label);
                    }
                    None => {
                        open.insert(label, (v, d));
                    }
                }
            }
        }
        if let Some(label) = open.keys().min() {
            return Err(StructureError::UnpairedBond(label.to_string()));
        }

        graph.analyze();
        Ok(graph)
    }

    /// Number of strands (vertices).
    pub fn len(&self) -> usize {
        self.adj.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adj.is_empty()
    }

    /// Registers a bidirectional bond between domain `d1` of `v1` and
    /// domain `d2` of `v2`.
    ///
    /// Bonds between the same two strands coalesce into one multi-domain
    /// [`Bond`].
    pub fn add_edges(&mut self, v1: StrandIdx, v2: StrandIdx, d1: DomainIdx, d2: DomainIdx) {
        self.create_bond(v1, v2, d1, d2);
        self.create_bond(v2, v1, d2, d1);
    }

    fn create_bond(&mut self, v1: StrandIdx, v2: StrandIdx, d1: DomainIdx, d2: DomainIdx) {
        match self.adj[v1].iter_mut().find(|b| b.node2 == v2) {
            Some(bond) => bond.append_dom(d1, d2),
            None => self.adj[v1].push(Bond::new(v1, v2, d1, d2)),
        }
    }

    /// Labels components, finds loops and hidden domains.
    ///
    /// Previous analysis results are discarded.
    pub fn analyze(&mut self) {
        self.loops.clear();
        self.hidden.clear();
        self.find_loops();
        self.store_hidden();
    }

    /// Bonds of strand `v`, in insertion order.
    pub fn adj(&self, v: StrandIdx) -> &[Bond] {
        &self.adj[v]
    }

    pub fn color(&self, v: StrandIdx) -> Color {
        self.color[v]
    }

    pub fn colors(&self) -> &[Color] {
        &self.color
    }

    /// Recorded loops as ordered vertex cycles. A hairpin is a loop of
    /// length one.
    pub fn loops(&self) -> &[Vec<StrandIdx>] {
        &self.loops
    }

    pub fn hidden(&self) -> &BTreeSet<Site> {
        &self.hidden
    }

    pub fn is_hidden(&self, v: StrandIdx, d: DomainIdx) -> bool {
        self.hidden.contains(&(v, d))
    }

    /// Component id of strand `v`.
    pub fn component_of(&self, v: StrandIdx) -> usize {
        self.species[v]
    }

    pub fn component_count(&self) -> usize {
        self.species_num
    }

    /// Strands of every component, in component order.
    pub fn components(&self) -> Vec<Vec<StrandIdx>> {
        let mut nodes = vec![Vec::new(); self.species_num];
        for (v, &c) in self.species.iter().enumerate() {
            nodes[c].push(v);
        }
        nodes
    }

    /// Number of distinct undirected bonds, hairpins included.
    pub fn edge_count(&self) -> usize {
        self.adj.iter()
            .flatten()
            .filter(|b| b.node1 <= b.node2)
            .count()
    }

    /// The coalesced bond from `v1` to `v2`.
    pub fn get_bond(&self, v1: StrandIdx, v2: StrandIdx) -> Option<&Bond> {
        self.adj[v1].iter().find(|b| b.node2 == v2)
    }

    /// The site on the other end of a bond at domain `d` of strand `v`.
    pub fn check_bonded(&self, v: StrandIdx, d: DomainIdx) -> Option<Site> {
        self.adj[v].iter()
            .find_map(|b| b.partner_of(d).map(|d2| (b.node2, d2)))
    }

    /// All bonded domain indices of strand `v`.
    pub fn bonded_domains(&self, v: StrandIdx) -> Vec<DomainIdx> {
        self.adj[v].iter()
            .flat_map(|b| b.dom.iter().copied())
            .collect()
    }

    /// Bonds of a group of strands, treated as one merged vertex, without
    /// those leading into `excluded`.
    pub fn merge_bonds_ignoring_nodes<'a>(
        &'a self,
        group: &'a [StrandIdx],
        excluded: &'a IntSet<StrandIdx>,
    ) -> impl Iterator<Item = &'a Bond> + 'a {
        group.iter()
            .flat_map(move |&v| self.adj[v].iter())
            .filter(move |b| !excluded.contains(&b.node2))
    }

    /// Shortest chain of bonds from site `start` to strand `end`.
    ///
    /// Returns the visited sites from `start` to the site reached on `end`,
    /// entering each strand at the largest domain of the bond used.
    pub fn get_connection(&self, start: Site, end: StrandIdx) -> Option<Vec<Site>> {
        let mut queue = VecDeque::from([start]);
        let mut visited: IntSet<StrandIdx> = IntSet::default();
        let mut prev: AHashMap<Site, Site> = AHashMap::default();
        visited.insert(start.0);

        while let Some(cur) = queue.pop_front() {
            if cur.0 == end {
                let mut path = vec![cur];
                let mut key = cur;
                while let Some(&p) = prev.get(&key) {
                    path.push(p);
                    key = p;
                }
                path.reverse();
                return Some(path);
            }
            for bond in &self.adj[cur.0] {
                if visited.insert(bond.node2) {
                    let d2 = bond.dom2.iter().copied().max().unwrap_or(0);
                    prev.insert((bond.node2, d2), cur);
                    queue.push_back((bond.node2, d2));
                }
            }
        }
        None
    }

    /// Vertices per origin tag, restricted to `nodes`.
    pub fn color_map(&self, nodes: &[StrandIdx]) -> BTreeMap<Color, Vec<StrandIdx>> {
        let mut map: BTreeMap<Color, Vec<StrandIdx>> = BTreeMap::new();
        for &v in nodes {
            map.entry(self.color[v]).or_default().push(v);
        }
        map
    }
}
