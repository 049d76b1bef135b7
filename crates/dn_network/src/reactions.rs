//! Reactions and the kinetics table their rates come from.

use std::fmt;
use std::collections::BTreeMap;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::NetworkError;
use crate::SpeciesId;

/// Reaction-type key -> rate constant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kinetics(BTreeMap<String, f64>);

impl Kinetics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a JSON object of `"type": rate` entries.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, kind: impl Into<String>, rate: f64) {
        self.0.insert(kind.into(), rate);
    }

    pub fn rate(&self, kind: &str) -> Option<f64> {
        self.0.get(kind).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Kinetics {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Kinetics(iter.into_iter().map(|(k, r)| (k.into(), r)).collect())
    }
}

/// A reaction between registered species.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    reactants: Vec<SpeciesId>,
    products: Vec<SpeciesId>,
    kind: String,
    rate: f64,
}

impl Reaction {
    /// A reaction of type `kind`, with its rate looked up in `kinetics`.
    pub fn new(
        reactants: Vec<SpeciesId>,
        products: Vec<SpeciesId>,
        kind: &str,
        kinetics: &Kinetics,
    ) -> Result<Self, NetworkError> {
        let rate = kinetics.rate(kind)
            .ok_or_else(|| NetworkError::UnknownReactionType(kind.to_string()))?;
        Ok(Reaction {
            reactants,
            products,
            kind: kind.to_string(),
            rate,
        })
    }

    pub fn reactants(&self) -> &[SpeciesId] {
        &self.reactants
    }

    pub fn products(&self) -> &[SpeciesId] {
        &self.products
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Every species id this reaction refers to.
    pub fn species(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.reactants.iter().chain(&self.products).copied()
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({}, {})",
            self.reactants.iter().join(" + "),
            self.products.iter().join(" + "),
            self.kind,
            self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinetics_from_json() {
        let k = Kinetics::from_json(r#"{"bind": 0.5, "unbind": 2e-3}"#).unwrap();
        assert_eq!(k.len(), 2);
        assert_eq!(k.rate("bind"), Some(0.5));
        assert_eq!(k.rate("unbind"), Some(0.002));
        assert_eq!(k.rate("migrate"), None);
        assert!(matches!(Kinetics::from_json("[1, 2]"), Err(NetworkError::Config(_))));
    }

    #[test]
    fn test_reaction_rate_lookup() {
        let k: Kinetics = [("bind", 0.5)].into_iter().collect();
        let r = Reaction::new(vec![1, 2], vec![3], "bind", &k).unwrap();
        assert_eq!(r.rate(), 0.5);
        assert_eq!(r.species().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(r.to_string(), "1 + 2 -> 3 (bind, 0.5)");

        let err = Reaction::new(vec![3], vec![1, 2], "unbind", &k).unwrap_err();
        assert!(matches!(err, NetworkError::UnknownReactionType(kind) if kind == "unbind"));
    }
}
