//! Loop discovery and hidden-domain analysis on a BondGraph.
//!
//! Loops are found from a spanning forest: every bond that is not a tree
//! edge closes exactly one cycle, which is recovered as the tree path
//! between its endpoints. Hidden domains are those sitting underneath a
//! multi-domain bond, a hairpin, or inside a loop.

use ahash::AHashSet;
use log::debug;
use nohash_hasher::IntSet;

use crate::BondGraph;
use crate::StrandIdx;

/// Directed tree edges of the spanning forest.
type TreeEdges = AHashSet<(StrandIdx, StrandIdx)>;

impl BondGraph {
    /// Builds a spanning forest, labels components and records one loop
    /// per bond outside of the forest.
    pub(crate) fn find_loops(&mut self) {
        let n = self.len();
        let mut mark = vec![false; n];
        let mut times = vec![0; n];
        let mut tree = TreeEdges::default();
        let mut depth = 0;

        for i in 0..n {
            if mark[i] {
                continue;
            }
            mark[i] = true;
            times[i] = depth;
            self.spanning(i, depth, &mut mark, &mut times, &mut tree);

            let chords: Vec<(StrandIdx, StrandIdx)> = (0..n)
                .filter(|&j| mark[j] && times[j] == depth)
                .flat_map(|j| self.adj[j].iter())
                .filter(|b| mark[b.node2] && !tree.contains(&(b.node1, b.node2)))
                .map(|b| (b.node1, b.node2))
                .collect();

            for (u, v) in chords {
                if u != v && self.check_in_loop(u, v) {
                    continue;
                }
                if let Some(cycle) = self.search_path(u, v, &tree) {
                    debug!("Loop over strands {:?}", cycle);
                    self.loops.push(cycle);
                }
            }
            depth += 1;
        }
        self.species = times;
        self.species_num = depth;
    }

    /// Depth-first expansion from `start`; both directions of every tree
    /// edge are recorded.
    fn spanning(
        &self,
        start: StrandIdx,
        depth: usize,
        mark: &mut [bool],
        times: &mut [usize],
        tree: &mut TreeEdges,
    ) {
        let mut stack: Vec<(StrandIdx, usize)> = vec![(start, 0)];
        while let Some(top) = stack.last_mut() {
            let (u, k) = *top;
            let Some(bond) = self.adj[u].get(k) else {
                stack.pop();
                continue;
            };
            top.1 += 1;
            let v = bond.node2;
            if !mark[v] {
                tree.insert((u, v));
                if self.get_bond(v, u).is_some() {
                    tree.insert((v, u));
                }
                mark[v] = true;
                times[v] = depth;
                stack.push((v, 0));
            }
        }
    }

    /// True if `u` and `v` are neighbors on an already recorded loop, i.e.
    /// the bond between them already closes a recorded cycle.
    fn check_in_loop(&self, u: StrandIdx, v: StrandIdx) -> bool {
        self.loops.iter().any(|cycle| {
            let len = cycle.len();
            (0..len).any(|k| {
                let (a, b) = (cycle[k], cycle[(k + 1) % len]);
                (a == u && b == v) || (a == v && b == u)
            })
        })
    }

    /// Path from `start` to `end` along tree edges only.
    fn search_path(
        &self,
        start: StrandIdx,
        end: StrandIdx,
        tree: &TreeEdges,
    ) -> Option<Vec<StrandIdx>> {
        let mut path = vec![start];
        let mut next = vec![0usize];
        let mut on_path: IntSet<StrandIdx> = IntSet::default();
        on_path.insert(start);

        while let Some(&u) = path.last() {
            if u == end {
                return Some(path);
            }
            let k = next.last_mut()?;
            let step = self.adj[u][*k..].iter()
                .position(|b| tree.contains(&(u, b.node2)) && !on_path.contains(&b.node2));
            match step {
                Some(offset) => {
                    let v = self.adj[u][*k + offset].node2;
                    *k += offset + 1;
                    path.push(v);
                    next.push(0);
                    on_path.insert(v);
                }
                None => {
                    path.pop();
                    next.pop();
                    on_path.remove(&u);
                }
            }
        }
        None
    }

    /// Marks the domains underneath multi-domain bonds, hairpins and loops.
    pub(crate) fn store_hidden(&mut self) {
        for bond in self.adj.iter().flatten() {
            if bond.is_hairpin() || bond.len() > 1 {
                let lo = bond.dom.iter().copied().min().unwrap_or(0);
                let hi = bond.dom.iter().copied().max().unwrap_or(0);
                for d in lo + 1..hi {
                    self.hidden.insert((bond.node1, d));
                }
            }
        }

        for cycle in &self.loops {
            let len = cycle.len();
            if len < 2 {
                continue;
            }
            for k in 0..len {
                let v = cycle[k];
                let next = cycle[(k + 1) % len];
                let prev = cycle[(k + len - 1) % len];
                let (Some(to_next), Some(to_prev)) = (self.get_bond(v, next), self.get_bond(v, prev)) else {
                    continue;
                };
                let a = to_next.dom.iter().copied().max().unwrap_or(0);
                let b = to_prev.dom.iter().copied().max().unwrap_or(0);
                for d in a.min(b) + 1..a.max(b) {
                    self.hidden.insert((v, d));
                }
            }
        }
    }
}
