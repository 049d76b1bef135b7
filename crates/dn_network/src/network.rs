use ahash::AHashSet;
use ndarray::Array2;
use nohash_hasher::IntMap;

use crate::Kinetics;
use crate::NetworkError;
use crate::Reaction;
use crate::RegistryError;
use crate::Species;
use crate::SpeciesId;
use crate::SpeciesRegistry;

/// The species discovered so far, their registry, and the reactions
/// between them.
///
/// The species list only grows. Every species in it is registered, and
/// every reaction refers to registered species only.
#[derive(Debug, Clone, Default)]
pub struct ReactionNetwork {
    species: Vec<Species>,
    registry: SpeciesRegistry,
    reactions: Vec<Reaction>,
    index: IntMap<SpeciesId, usize>,
}

/// Species x edge incidence matrix of a network.
///
/// There is one column per distinct (reactant -> product) pair, in the
/// order the pairs first appear in the reaction list. A column holds `+1`
/// at the reactant row and `-1` at the product row; if reactant and
/// product coincide, the entry is `-1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Incidence {
    pub species: Vec<SpeciesId>,
    pub edges: Vec<(SpeciesId, SpeciesId)>,
    pub matrix: Array2<i32>,
}

impl ReactionNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a species by canonical form.
    ///
    /// New species receive the next sequential id and are appended to the
    /// species list; known ones are dropped in favor of the registered
    /// copy. A species that already carries an id must match the registry.
    pub fn register(&mut self, mut species: Species) -> Result<(SpeciesId, bool), NetworkError> {
        let form = species.canonical_form();
        let (id, is_new) = match species.id() {
            Some(id) => {
                let is_new = self.registry.id_of(form).is_none();
                self.registry.insert(id, form)?;
                (id, is_new)
            }
            None => self.registry.lookup_or_insert(form),
        };
        if is_new {
            species.set_id(id);
            self.index.insert(id, self.species.len());
            self.species.push(species);
        }
        Ok((id, is_new))
    }

    /// Appends a reaction of type `kind` between registered species.
    pub fn add_reaction(
        &mut self,
        reactants: Vec<SpeciesId>,
        products: Vec<SpeciesId>,
        kind: &str,
        kinetics: &Kinetics,
    ) -> Result<(), NetworkError> {
        if let Some(&id) = reactants.iter().chain(&products).find(|id| !self.index.contains_key(id)) {
            return Err(NetworkError::UnregisteredSpecies(id));
        }
        let reaction = Reaction::new(reactants, products, kind, kinetics)?;
        self.reactions.push(reaction);
        Ok(())
    }

    /// Checks that list, index and registry agree with each other.
    pub fn verify(&self) -> Result<(), RegistryError> {
        for (i, s) in self.species.iter().enumerate() {
            let form = s.canonical_form();
            let id = s.id().unwrap_or_default();
            match self.registry.id_of(form) {
                Some(existing) if existing == id && self.index.get(&id) == Some(&i) => (),
                Some(existing) => return Err(RegistryError::FormConflict {
                    form: form.to_string(),
                    existing,
                    requested: id,
                }),
                None => return Err(RegistryError::IdConflict {
                    id,
                    existing: self.registry.form_of(id).unwrap_or_default().to_string(),
                    requested: form.to_string(),
                }),
            }
        }
        Ok(())
    }

    /// Species in registration order.
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    pub fn species_by_id(&self, id: SpeciesId) -> Option<&Species> {
        self.index.get(&id).map(|&i| &self.species[i])
    }

    pub fn reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn registry(&self) -> &SpeciesRegistry {
        &self.registry
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    pub fn incidence_matrix(&self) -> Incidence {
        let species: Vec<SpeciesId> = self.species.iter()
            .filter_map(|s| s.id())
            .collect();

        let mut seen: AHashSet<(SpeciesId, SpeciesId)> = AHashSet::default();
        let mut edges = Vec::new();
        for r in &self.reactions {
            for &a in r.reactants() {
                for &b in r.products() {
                    if seen.insert((a, b)) {
                        edges.push((a, b));
                    }
                }
            }
        }

        let mut matrix = Array2::<i32>::zeros((species.len(), edges.len()));
        for (col, &(a, b)) in edges.iter().enumerate() {
            // Every reaction id is registered, and therefore indexed.
            matrix[[self.index[&a], col]] = 1;
            matrix[[self.index[&b], col]] = -1;
        }
        Incidence { species, edges, matrix }
    }
}
