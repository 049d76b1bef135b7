//! The exploration driver.
//!
//! Starting from the initial species, the driver repeatedly hands species
//! (unimolecular) and species pairs (bimolecular) to a ReactionGenerator,
//! which registers whatever it produces in the network. An iteration first
//! runs `mono` on every unvisited species of the frontier, then `bi` on the
//! pairs scheduled by [`get_combinations`]. Exploration is complete once an
//! iteration adds no species.
//!

use ahash::AHashSet;
use itertools::Itertools;
use log::debug;
use log::info;
use serde::Deserialize;
use serde::Serialize;

use crate::Kinetics;
use crate::NetworkError;
use crate::ReactionNetwork;

/// Unimolecular and bimolecular reaction generation.
///
/// Arguments are indices into `network.species()`. Implementations must
/// create species only through [`ReactionNetwork::register`], and add
/// reactions only between registered species.
pub trait ReactionGenerator {
    fn mono(
        &self,
        index: usize,
        network: &mut ReactionNetwork,
        kinetics: &Kinetics,
    ) -> Result<(), NetworkError>;

    fn bi(
        &self,
        pair: (usize, usize),
        network: &mut ReactionNetwork,
        kinetics: &Kinetics,
    ) -> Result<(), NetworkError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Maximum number of iterations.
    pub threshold: usize,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        ExploreConfig { threshold: 100 }
    }
}

impl ExploreConfig {
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExploreStatus {
    /// The last iteration produced no new species.
    Complete,
    /// The iteration bound was hit before reaching a fixpoint.
    Truncated,
    /// Stopped on request, between two iterations.
    Stopped,
}

/// Summary of an exploration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exploration {
    pub status: ExploreStatus,
    pub iterations: usize,
    pub species: usize,
    pub reactions: usize,
}

/// Candidate pairs for the bimolecular step of one iteration.
///
/// - all pairs among `indexlist[cursor..oldlen]` (the frontier),
/// - every index below `oldlen` with every index in `oldlen..newlen`
///   (species added by the unimolecular step),
/// - the self-pair of every index below `oldlen`.
pub fn get_combinations(
    oldlen: usize,
    newlen: usize,
    cursor: usize,
    indexlist: &[usize],
) -> Vec<(usize, usize)> {
    let frontier = indexlist.get(cursor..oldlen).unwrap_or(&[]);
    let mut comb: Vec<(usize, usize)> = frontier.iter()
        .copied()
        .tuple_combinations()
        .collect();
    if oldlen != newlen {
        comb.extend((0..oldlen).cartesian_product(oldlen..newlen));
    }
    comb.extend((0..oldlen).map(|i| (i, i)));
    comb
}

/// Fixpoint exploration of a reaction network, one iteration at a time.
pub struct Explorer<G> {
    generator: G,
    network: ReactionNetwork,
    kinetics: Kinetics,
    config: ExploreConfig,
    visited: Vec<bool>,
    cursor: usize,
    /// First index added by the bimolecular step of the last iteration.
    late_start: usize,
    iteration: usize,
    tried: AHashSet<(usize, usize)>,
}

impl<G: ReactionGenerator> Explorer<G> {
    pub fn new(
        network: ReactionNetwork,
        generator: G,
        kinetics: Kinetics,
        config: ExploreConfig,
    ) -> Self {
        let len = network.len();
        Explorer {
            generator,
            network,
            kinetics,
            config,
            visited: vec![false; len],
            cursor: 0,
            late_start: len,
            iteration: 0,
            tried: AHashSet::default(),
        }
    }

    /// No unvisited species left at the cursor.
    pub fn is_exhausted(&self) -> bool {
        self.visited.get(self.cursor).is_none_or(|&v| v)
    }

    pub fn is_finished(&self) -> bool {
        self.is_exhausted() || self.iteration >= self.config.threshold
    }

    /// Runs one iteration. Returns false, without doing anything, if
    /// exploration is already finished.
    pub fn step(&mut self) -> Result<bool, NetworkError> {
        if self.is_finished() {
            return Ok(false);
        }
        let cursor = self.cursor;
        let oldlen = self.network.len();

        for i in cursor..oldlen {
            if !self.visited[i] {
                self.generator.mono(i, &mut self.network, &self.kinetics)?;
                self.visited[i] = true;
            }
        }
        let newlen = self.network.len();

        // Species from the last bimolecular step still need to meet every
        // species below the cursor.
        let indexlist: Vec<usize> = (0..newlen).collect();
        let late = (0..cursor).cartesian_product(self.late_start.min(oldlen)..oldlen);
        let pairs: Vec<(usize, usize)> = get_combinations(oldlen, newlen, cursor, &indexlist)
            .into_iter()
            .chain(late)
            .filter(|&pair| self.tried.insert(pair))
            .collect();
        debug!("Iteration {}: {} candidate pairs.", self.iteration, pairs.len());

        for pair in pairs {
            self.generator.bi(pair, &mut self.network, &self.kinetics)?;
        }

        let len = self.network.len();
        self.cursor = if len != oldlen { oldlen } else { oldlen - 1 };
        self.late_start = newlen;
        self.visited.resize(len, false);
        self.iteration += 1;
        info!("Iteration {}: {} species, {} reactions.",
            self.iteration, len, self.network.reactions().len());
        Ok(true)
    }

    /// Iterates until a fixpoint or the iteration bound.
    pub fn run(&mut self) -> Result<Exploration, NetworkError> {
        while self.step()? {}
        let outcome = self.outcome();
        match outcome.status {
            ExploreStatus::Truncated => info!(
                "Exploration truncated after {} iterations: {} species, {} reactions.",
                outcome.iterations, outcome.species, outcome.reactions),
            _ => info!(
                "Exploration complete after {} iterations: {} species, {} reactions.",
                outcome.iterations, outcome.species, outcome.reactions),
        }
        Ok(outcome)
    }

    pub fn outcome(&self) -> Exploration {
        Exploration {
            status: if self.is_exhausted() {
                ExploreStatus::Complete
            } else {
                ExploreStatus::Truncated
            },
            iterations: self.iteration,
            species: self.network.len(),
            reactions: self.network.reactions().len(),
        }
    }
}

impl<G> Explorer<G> {
    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    pub fn into_network(self) -> ReactionNetwork {
        self.network
    }

    pub fn kinetics(&self) -> &Kinetics {
        &self.kinetics
    }

    pub fn config(&self) -> &ExploreConfig {
        &self.config
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use dn_structure::Domain;
    use dn_structure::Strand;
    use crate::Species;

    fn chain(n: usize) -> Species {
        let line = format!("<{}>", vec!["g"; n].join(" "));
        Species::from_strands(vec![Strand::try_from(line.as_str()).unwrap()]).unwrap().remove(0)
    }

    fn strand_len(network: &ReactionNetwork, i: usize) -> usize {
        network.species()[i].strands()[0].len()
    }

    /// `<a>` + `<a*>` <=> `<a!1>|<a*!1>`.
    struct BindUnbind;

    fn unbound(strand: &Strand) -> Strand {
        let mut s = Strand::new(strand.domains().iter()
            .map(|d| Domain::new(d.name(), d.is_toehold(), d.is_complementary()))
            .collect());
        if let Some(c) = strand.color() {
            s.add_color(c);
        }
        s
    }

    impl ReactionGenerator for BindUnbind {
        fn mono(&self, index: usize, network: &mut ReactionNetwork, kinetics: &Kinetics) -> Result<(), NetworkError> {
            let strands = network.species()[index].strands().to_vec();
            if strands.len() != 2 {
                return Ok(());
            }
            let parts = Species::from_strands(strands.iter().map(unbound).collect())?;
            let mut products = Vec::new();
            for p in parts {
                products.push(network.register(p)?.0);
            }
            let id = network.species()[index].id().unwrap();
            network.add_reaction(vec![id], products, "unbind", kinetics)
        }

        fn bi(&self, (i, j): (usize, usize), network: &mut ReactionNetwork, kinetics: &Kinetics) -> Result<(), NetworkError> {
            let (a, b) = (&network.species()[i], &network.species()[j]);
            if i == j || a.len() != 1 || b.len() != 1 {
                return Ok(());
            }
            let (da, db) = (&a.strands()[0].domains()[0], &b.strands()[0].domains()[0]);
            if !da.same_type(&Domain::new(db.name(), db.is_toehold(), !db.is_complementary())) {
                return Ok(());
            }
            let reactants = vec![a.id().unwrap(), b.id().unwrap()];
            let product = Species::from_strands(vec![
                Strand::new(vec![da.clone().with_bond("1")]),
                Strand::new(vec![db.clone().with_bond("1")]),
            ])?.remove(0);
            let (id, _) = network.register(product)?;
            network.add_reaction(reactants, vec![id], "bind", kinetics)
        }
    }

    /// Every species spawns a longer one through `mono`, forever.
    struct Grow;

    impl ReactionGenerator for Grow {
        fn mono(&self, index: usize, network: &mut ReactionNetwork, kinetics: &Kinetics) -> Result<(), NetworkError> {
            let n = strand_len(network, index);
            let (id, _) = network.register(chain(n + 1))?;
            let from = network.species()[index].id().unwrap();
            network.add_reaction(vec![from], vec![id], "grow", kinetics)
        }

        fn bi(&self, _: (usize, usize), _: &mut ReactionNetwork, _: &Kinetics) -> Result<(), NetworkError> {
            Ok(())
        }
    }

    /// Bounded growth through both steps, recording every pair it sees.
    #[derive(Default)]
    struct Recorder {
        pairs: RefCell<Vec<(usize, usize)>>,
    }

    impl ReactionGenerator for Recorder {
        fn mono(&self, index: usize, network: &mut ReactionNetwork, _: &Kinetics) -> Result<(), NetworkError> {
            let n = strand_len(network, index);
            if n < 3 {
                network.register(chain(n + 1))?;
            }
            Ok(())
        }

        fn bi(&self, (i, j): (usize, usize), network: &mut ReactionNetwork, _: &Kinetics) -> Result<(), NetworkError> {
            self.pairs.borrow_mut().push((i, j));
            let n = strand_len(network, i) + strand_len(network, j);
            if n <= 7 {
                network.register(chain(n))?;
            }
            Ok(())
        }
    }

    fn initial(lines: &[&str]) -> ReactionNetwork {
        let mut net = ReactionNetwork::new();
        for line in lines {
            for s in Species::from_strands(vec![Strand::try_from(*line).unwrap()]).unwrap() {
                net.register(s).unwrap();
            }
        }
        net
    }

    fn kinetics() -> Kinetics {
        [("bind", 1.0), ("unbind", 0.1), ("grow", 2.0)].into_iter().collect()
    }

    #[test]
    fn test_get_combinations() {
        let comb = get_combinations(2, 5, 0, &[0, 1, 2, 3, 4]);
        assert_eq!(comb, vec![
            (0, 1),
            (0, 2), (0, 3), (0, 4), (1, 2), (1, 3), (1, 4),
            (0, 0), (1, 1),
        ]);
        let unique: AHashSet<_> = comb.iter().collect();
        assert_eq!(unique.len(), comb.len());

        // No growth: frontier pairs and self-pairs only.
        assert_eq!(get_combinations(4, 4, 2, &[0, 1, 2, 3]),
            vec![(2, 3), (0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_config_defaults() {
        assert_eq!(ExploreConfig::from_json("{}").unwrap().threshold, 100);
        assert_eq!(ExploreConfig::from_json(r#"{"threshold": 7}"#).unwrap().threshold, 7);
        assert!(ExploreConfig::from_json(r#"{"threshold": -1}"#).is_err());
    }

    #[test]
    fn test_bind_unbind_reaches_fixpoint() {
        let mut explorer = Explorer::new(initial(&["<a>", "<a*>"]), BindUnbind, kinetics(), ExploreConfig::default());
        let outcome = explorer.run().unwrap();
        assert_eq!(outcome, Exploration {
            status: ExploreStatus::Complete,
            iterations: 2,
            species: 3,
            reactions: 2,
        });
        let net = explorer.network();
        assert_eq!(net.species()[2].canonical_form(), "<a!1>|<a*!1>");
        let lines: Vec<_> = net.reactions().iter().map(|r| r.to_string()).collect();
        assert_eq!(lines, vec!["1 + 2 -> 3 (bind, 1)", "3 -> 1 + 2 (unbind, 0.1)"]);
        assert!(!explorer.step().unwrap());
    }

    #[test]
    fn test_threshold_truncates() {
        let config = ExploreConfig { threshold: 5 };
        let mut explorer = Explorer::new(initial(&["<g>"]), Grow, kinetics(), config);
        let outcome = explorer.run().unwrap();
        assert_eq!(outcome.status, ExploreStatus::Truncated);
        assert_eq!(outcome.iterations, 5);
        assert_eq!(outcome.species, 6);
        assert_eq!(outcome.reactions, 5);
    }

    #[test]
    fn test_every_pair_tried_once() {
        let mut explorer = Explorer::new(initial(&["<g>"]), Recorder::default(), kinetics(), ExploreConfig::default());
        let outcome = explorer.run().unwrap();
        assert_eq!(outcome.status, ExploreStatus::Complete);
        assert_eq!(outcome.species, 7);

        let mut seen = explorer.generator().pairs.borrow().clone();
        seen.sort_unstable();
        let expected: Vec<(usize, usize)> = (0..outcome.species)
            .flat_map(|j| (0..=j).map(move |i| (i, j)))
            .sorted()
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_empty_network_is_complete() {
        let mut explorer = Explorer::new(ReactionNetwork::new(), Grow, kinetics(), ExploreConfig::default());
        assert_eq!(explorer.run().unwrap().status, ExploreStatus::Complete);
        assert_eq!(explorer.iteration(), 0);
    }

    #[test]
    fn test_missing_rate_aborts() {
        let mut explorer = Explorer::new(initial(&["<g>"]), Grow, Kinetics::new(), ExploreConfig::default());
        assert!(matches!(explorer.run(), Err(NetworkError::UnknownReactionType(k)) if k == "grow"));
    }
}
