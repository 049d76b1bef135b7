//! Canonical forms of connected complexes.
//!
//! A canonical form is produced by a breadth-first traversal from a root
//! strand, numbering bonds in the order they are first met. Given the
//! root, the traversal is fully determined by the bond structure, so the
//! whole problem reduces to picking the root in a way that does not depend
//! on vertex numbering:
//!
//!  1. Take the origin-tag class with the fewest strands (lowest tag on ties).
//!  2. If it has more than one strand, refine: every candidate is scored by
//!     the sorted list of its outgoing bonds (own domain, neighbor tag,
//!     neighbor domain). Only the minimal candidates survive, and their
//!     neighbors form the next layer of candidates under the same root.
//!  3. If several roots survive refinement, the one producing the smallest
//!     canonical string wins.
//!

use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::fmt::Write;
use ahash::AHashMap;
use log::warn;
use nohash_hasher::IntSet;

use dn_structure::BondGraph;
use dn_structure::Color;
use dn_structure::DomainIdx;
use dn_structure::Site;
use dn_structure::Strand;
use dn_structure::StrandIdx;

/// A candidate of the root refinement: a group of strands that are
/// treated as one merged vertex, descending from candidate root `root`.
#[derive(Debug, Clone)]
struct Candidate {
    members: Vec<StrandIdx>,
    root: StrandIdx,
}

/// Local bond signature of a candidate; ordered by bond count first, then
/// element-wise by own domain, neighbor tag and neighbor domain.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Signature {
    len: usize,
    dom: Vec<DomainIdx>,
    color2: Vec<Color>,
    dom2: Vec<DomainIdx>,
}

impl Signature {
    /// Signature and next-layer members of one candidate.
    fn of(
        candidate: &Candidate,
        graph: &BondGraph,
        excluded: &IntSet<StrandIdx>,
    ) -> (Signature, Vec<StrandIdx>) {
        let mut info: Vec<(DomainIdx, Color, DomainIdx, StrandIdx)> = graph
            .merge_bonds_ignoring_nodes(&candidate.members, excluded)
            .flat_map(|b| b.pairs())
            .map(|((_, d), (n2, d2))| (d, graph.color(n2), d2, n2))
            .collect();
        info.sort_by_key(|&(d, c2, d2, _)| (d, c2, d2));

        let mut next: Vec<StrandIdx> = info.iter().map(|x| x.3).collect();
        next.sort_unstable();
        next.dedup();

        let sig = Signature {
            len: info.len(),
            dom: info.iter().map(|x| x.0).collect(),
            color2: info.iter().map(|x| x.1).collect(),
            dom2: info.iter().map(|x| x.2).collect(),
        };
        (sig, next)
    }
}

/// The origin-tag class to start from: fewest strands, lowest tag on ties.
pub(crate) fn starting_class(colormap: &BTreeMap<Color, Vec<StrandIdx>>) -> &[StrandIdx] {
    colormap.values()
        .min_by_key(|nodes| nodes.len())
        .map(|nodes| nodes.as_slice())
        .unwrap_or(&[])
}

/// All roots that survive the refinement, ascending.
///
/// Every round consumes the current layer, and the next layer only holds
/// strands not seen before, so this stops after at most one round per
/// strand of the component.
pub(crate) fn get_starting_vertices(
    colormap: &BTreeMap<Color, Vec<StrandIdx>>,
    graph: &BondGraph,
) -> Vec<StrandIdx> {
    let class = starting_class(colormap);
    if class.len() <= 1 {
        return class.to_vec();
    }
    let layer = class.iter()
        .map(|&v| Candidate { members: vec![v], root: v })
        .collect();
    prune_starting_vertices(layer, graph)
}

fn prune_starting_vertices(mut layer: Vec<Candidate>, graph: &BondGraph) -> Vec<StrandIdx> {
    let mut excluded: IntSet<StrandIdx> = IntSet::default();
    let mut seen: IntSet<StrandIdx> = layer.iter()
        .flat_map(|c| c.members.iter().copied())
        .collect();

    while layer.len() > 1 {
        let mut best: Option<Signature> = None;
        let mut survivors: Vec<Candidate> = Vec::new();

        for candidate in &layer {
            let (sig, next) = Signature::of(candidate, graph, &excluded);
            let next = Candidate { members: next, root: candidate.root };
            match best.as_ref().map(|b| sig.cmp(b)) {
                Some(std::cmp::Ordering::Greater) => (),
                Some(std::cmp::Ordering::Equal) => survivors.push(next),
                _ => {
                    best = Some(sig);
                    survivors = vec![next];
                }
            }
        }

        if survivors.len() == 1 {
            return vec![survivors[0].root];
        }

        excluded.extend(layer.iter().flat_map(|c| c.members.iter().copied()));
        for s in survivors.iter_mut() {
            s.members.retain(|v| !seen.contains(v));
        }
        if survivors.iter().all(|s| s.members.is_empty()) {
            layer = survivors;
            break;
        }
        seen.extend(survivors.iter().flat_map(|s| s.members.iter().copied()));
        layer = survivors;
    }

    let mut roots: Vec<StrandIdx> = layer.iter().map(|c| c.root).collect();
    roots.sort_unstable();
    roots.dedup();
    roots
}

/// Breadth-first traversal from `root`, returning the canonical string
/// and the order in which strands were visited.
pub(crate) fn traverse(
    root: StrandIdx,
    graph: &BondGraph,
    strands: &[Strand],
) -> (String, Vec<StrandIdx>) {
    let mut canonical = String::new();
    let mut parsing_seq = Vec::new();
    let mut queue = VecDeque::from([root]);
    let mut enqueued: IntSet<StrandIdx> = IntSet::default();
    let mut pending: AHashMap<Site, usize> = AHashMap::default();
    let mut bondnum = 0;
    enqueued.insert(root);

    while let Some(v) = queue.pop_front() {
        if !parsing_seq.is_empty() {
            canonical.push('|');
        }
        parsing_seq.push(v);

        let mut edges: Vec<(Site, Site)> = graph.adj(v).iter()
            .flat_map(|b| b.pairs())
            .collect();
        edges.sort_unstable_by_key(|&((_, d), _)| d);
        let mut cursor = 0;

        canonical.push('<');
        for (i, domain) in strands[v].domains().iter().enumerate() {
            if i > 0 {
                canonical.push(' ');
            }
            // Writing into a String cannot fail.
            let _ = domain.write_type(&mut canonical);

            while cursor < edges.len() && edges[cursor].0.1 < i {
                cursor += 1;
            }
            if let Some(num) = pending.remove(&(v, i)) {
                let _ = write!(canonical, "!{num}");
            } else if cursor < edges.len() && edges[cursor].0.1 == i {
                let far = edges[cursor].1;
                bondnum += 1;
                let _ = write!(canonical, "!{bondnum}");
                pending.insert(far, bondnum);
                if enqueued.insert(far.0) {
                    queue.push_back(far.0);
                }
            }
        }
        canonical.push('>');
    }
    (canonical, parsing_seq)
}

/// Canonical form and parsing sequence of the component `colormap`
/// describes.
pub(crate) fn derive_canonical_form(
    colormap: &BTreeMap<Color, Vec<StrandIdx>>,
    graph: &BondGraph,
    strands: &[Strand],
) -> (String, Vec<StrandIdx>) {
    let roots = get_starting_vertices(colormap, graph);
    if roots.len() > 1 {
        warn!("Ambiguous canonical root among strands {:?}, using the smallest form.", roots);
    }
    roots.into_iter()
        .map(|root| traverse(root, graph, strands))
        .min_by(|a, b| a.0.cmp(&b.0))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dn_structure::assign_colors;

    fn colored(lines: &[&str]) -> Vec<Strand> {
        let mut strands: Vec<Strand> = lines.iter()
            .map(|l| Strand::try_from(*l).unwrap())
            .collect();
        assign_colors(strands.iter_mut());
        strands
    }

    fn setup(lines: &[&str]) -> (Vec<Strand>, BondGraph, BTreeMap<Color, Vec<StrandIdx>>) {
        let strands = colored(lines);
        let graph = BondGraph::from_strands(&strands).unwrap();
        let nodes: Vec<StrandIdx> = (0..strands.len()).collect();
        let colormap = graph.color_map(&nodes);
        (strands, graph, colormap)
    }

    #[test]
    fn test_starting_class_prefers_rare_tags() {
        let (_, _, colormap) = setup(&["<a!1>", "<b!1 c!2>", "<a!2>"]);
        assert_eq!(starting_class(&colormap), &[1]);
        let (_, _, colormap) = setup(&["<a!1>", "<b!1>"]);
        assert_eq!(starting_class(&colormap), &[0]);
    }

    #[test]
    fn test_refinement_breaks_tie_by_bond_position() {
        // Two strands of type <a b>, bonded at different domains.
        let (_, graph, colormap) = setup(&[
            "<a b!2>", "<a!1 b>", "<c!1 d!3>", "<c!2 d!3>",
        ]);
        assert_eq!(starting_class(&colormap), &[0, 1]);
        assert_eq!(get_starting_vertices(&colormap, &graph), vec![1]);
    }

    #[test]
    fn test_refinement_looks_past_first_layer() {
        // Both <a b> strands bind <c d> at domain 0; they only differ in
        // what the <c d> partner is bonded to next.
        let (_, graph, colormap) = setup(&[
            "<a!1 b>", "<a!2 b>",
            "<c!1 d!3>", "<c!2 d!4>",
            "<e!3 f>", "<e f!4>",
        ]);
        assert_eq!(starting_class(&colormap), &[0, 1]);
        assert_eq!(get_starting_vertices(&colormap, &graph), vec![0]);
    }

    #[test]
    fn test_symmetric_ring_terminates() {
        let (strands, graph, colormap) = setup(&["<x!1 y!2>", "<x!2 y!3>", "<x!3 y!1>"]);
        assert_eq!(get_starting_vertices(&colormap, &graph), vec![0, 1, 2]);
        let (form, seq) = derive_canonical_form(&colormap, &graph, &strands);
        assert_eq!(form, "<x!1 y!2>|<x!3 y!1>|<x!2 y!3>");
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_traverse_numbers_bonds_in_order() {
        let (strands, graph, _) = setup(&["<a b!1>", "<b!1 c>"]);
        assert_eq!(traverse(0, &graph, &strands), ("<a b!1>|<b!1 c>".to_string(), vec![0, 1]));
        assert_eq!(traverse(1, &graph, &strands), ("<b!1 c>|<a b!1>".to_string(), vec![1, 0]));
    }

    #[test]
    fn test_traverse_hairpin() {
        let (strands, graph, _) = setup(&["<a b!x c b!x>"]);
        assert_eq!(traverse(0, &graph, &strands).0, "<a b!1 c b!1>");
    }

    #[test]
    fn test_traverse_renumbers_labels() {
        let (strands, graph, colormap) = setup(&["<t^* x!7 y!9>", "<y!9 z>", "<x!7>"]);
        let (form, seq) = derive_canonical_form(&colormap, &graph, &strands);
        assert_eq!(form, "<t^* x!1 y!2>|<x!1>|<y!2 z>");
        assert_eq!(seq, vec![0, 2, 1]);
    }
}
