//! Strands: ordered sequences of domains with origin tags.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::collections::BTreeSet;
use ahash::AHashMap;

use crate::Color;
use crate::Domain;

/// A strand, e.g. `<t^ a b!1>`.
///
/// Equality and hashing only look at the domain sequence; the origin tags
/// are bookkeeping and never part of the identity of a strand.
#[derive(Debug, Clone, Default)]
pub struct Strand {
    domains: Vec<Domain>,
    colors: BTreeSet<Color>,
}

impl Strand {
    pub fn new(domains: Vec<Domain>) -> Self {
        Strand {
            domains,
            colors: BTreeSet::new(),
        }
    }

    pub fn domains(&self) -> &[Domain] {
        &self.domains
    }

    pub fn domain(&self, i: usize) -> Option<&Domain> {
        self.domains.get(i)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn push(&mut self, domain: Domain) {
        self.domains.push(domain);
    }

    pub fn add_color(&mut self, color: Color) {
        self.colors.insert(color);
    }

    pub fn colors(&self) -> &BTreeSet<Color> {
        &self.colors
    }

    /// The primary origin tag (the smallest one), if any was attached.
    pub fn color(&self) -> Option<Color> {
        self.colors.first().copied()
    }

    /// Two strands are of the same type if their domain sequences only
    /// differ in bond labels.
    pub fn same_type(&self, other: &Strand) -> bool {
        self.len() == other.len()
            && self.domains.iter()
                .zip(&other.domains)
                .all(|(a, b)| a.same_type(b))
    }

    /// Domain indices carrying a bond label, in strand order.
    pub fn bonded_positions(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.domains.iter()
            .enumerate()
            .filter_map(|(i, d)| d.bond_label().map(|l| (i, l)))
    }

    fn type_key(&self) -> Vec<(&str, bool, bool)> {
        self.domains.iter()
            .map(|d| (d.name(), d.is_toehold(), d.is_complementary()))
            .collect()
    }
}

impl PartialEq for Strand {
    fn eq(&self, other: &Self) -> bool {
        self.domains == other.domains
    }
}

impl Eq for Strand {}

impl Hash for Strand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domains.hash(state);
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, d) in self.domains.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, ">")
    }
}

/// Assigns origin tags to strands read from input, in input order.
///
/// The first strand of every strand type gets the next tag (starting at 1),
/// later strands of the same type share the tag of the first. Previously
/// attached tags are replaced. Returns the number of distinct strand types.
pub fn assign_colors<'a, I>(strands: I) -> usize
where
    I: IntoIterator<Item = &'a mut Strand>,
{
    let mut strands: Vec<&'a mut Strand> = strands.into_iter().collect();
    let mut tags: Vec<Color> = Vec::with_capacity(strands.len());
    {
        let mut seen: AHashMap<Vec<(&str, bool, bool)>, Color> = AHashMap::default();
        for strand in strands.iter() {
            let next = seen.len() + 1;
            let tag = *seen.entry(strand.type_key()).or_insert(next);
            tags.push(tag);
        }
    }
    let types = tags.iter().copied().max().unwrap_or(0);
    for (strand, tag) in strands.iter_mut().zip(tags) {
        strand.colors.clear();
        strand.colors.insert(tag);
    }
    types
}
