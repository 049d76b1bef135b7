//! Bonds: the (multi-)edges of a BondGraph.

use std::fmt;

use crate::DomainIdx;
use crate::StrandIdx;
use crate::Site;

/// All base-paired domains between `node1` and `node2`, seen from `node1`.
///
/// `dom[k]` on `node1` pairs with `dom2[k]` on `node2`. A bond with
/// `node1 == node2` is a hairpin; it then lists every pairing in both
/// directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bond {
    pub node1: StrandIdx,
    pub node2: StrandIdx,
    pub dom: Vec<DomainIdx>,
    pub dom2: Vec<DomainIdx>,
}

impl Bond {
    pub fn new(node1: StrandIdx, node2: StrandIdx, d1: DomainIdx, d2: DomainIdx) -> Self {
        Bond {
            node1,
            node2,
            dom: vec![d1],
            dom2: vec![d2],
        }
    }

    pub fn append_dom(&mut self, d1: DomainIdx, d2: DomainIdx) {
        self.dom.push(d1);
        self.dom2.push(d2);
    }

    /// Number of paired domains in this bond.
    pub fn len(&self) -> usize {
        self.dom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dom.is_empty()
    }

    pub fn is_hairpin(&self) -> bool {
        self.node1 == self.node2
    }

    /// The same bond seen from `node2`.
    pub fn mirrored(&self) -> Bond {
        Bond {
            node1: self.node2,
            node2: self.node1,
            dom: self.dom2.clone(),
            dom2: self.dom.clone(),
        }
    }

    /// Every paired domain as a `(near site, far site)` tuple.
    pub fn pairs(&self) -> impl Iterator<Item = (Site, Site)> + '_ {
        self.dom.iter()
            .zip(&self.dom2)
            .map(|(&d1, &d2)| ((self.node1, d1), (self.node2, d2)))
    }

    /// The domain on `node2` paired with domain `d` of `node1`.
    pub fn partner_of(&self, d: DomainIdx) -> Option<DomainIdx> {
        self.dom.iter()
            .position(|&x| x == d)
            .map(|k| self.dom2[k])
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} {:?}~{:?}", self.node1, self.node2, self.dom, self.dom2)
    }
}
