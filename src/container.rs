use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use petgraph::graphmap::UnGraphMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::atom::Atom;
use crate::bond::Bond;

/// Identifier of an atom within one graph. Identifiers are reused and
/// remapped freely between graphs; they are not a global identity.
pub type AtomId = u32;

/// Free-form key/value metadata attached to a graph or a template.
pub type Meta = BTreeMap<String, String>;

/// Atom correspondence from one graph's identifiers to another's.
pub type Mapping = BTreeMap<AtomId, AtomId>;

/// The closed set of graph variants. The variant decides which attribute
/// marks are meaningful and which comparator a search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphKind {
    /// A single-state structure.
    Molecule,
    /// Condensed graph of reaction carrying reactant and product states.
    Cgr,
    /// Pattern graph whose attributes may be sets of acceptable values.
    Query,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("atom {0} already exists")]
    DuplicateAtom(AtomId),
    #[error("atom {0} does not exist")]
    MissingAtom(AtomId),
    #[error("atom {0} cannot bond to itself")]
    SelfLoop(AtomId),
    #[error("cannot combine a {left:?} graph with a {right:?} graph")]
    KindMismatch { left: GraphKind, right: GraphKind },
    #[error("remapping sends more than one atom to {0}")]
    IdCollision(AtomId),
}

/// Attributed undirected graph of atoms and bonds keyed by [`AtomId`].
///
/// Atoms are stored in identifier order; the bond topology is a petgraph
/// `UnGraphMap` whose nodes mirror the atom keys. At most one bond joins a
/// pair of atoms.
#[derive(Clone, Serialize, Deserialize)]
#[serde(into = "ContainerRepr", try_from = "ContainerRepr")]
pub struct Container {
    kind: GraphKind,
    meta: Meta,
    atoms: BTreeMap<AtomId, Atom>,
    graph: UnGraphMap<AtomId, Bond>,
}

impl Container {
    pub fn new(kind: GraphKind) -> Self {
        Self {
            kind,
            meta: Meta::new(),
            atoms: BTreeMap::new(),
            graph: UnGraphMap::new(),
        }
    }

    pub fn kind(&self) -> GraphKind {
        self.kind
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        &mut self.meta
    }

    /// An empty graph of the same kind carrying a copy of this graph's
    /// metadata.
    pub fn fresh(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            ..Self::new(self.kind)
        }
    }

    /// Insert an atom, returning the atom it replaced. Bonds of a replaced
    /// atom are kept.
    pub fn add_atom(&mut self, id: AtomId, atom: Atom) -> Option<Atom> {
        self.graph.add_node(id);
        self.atoms.insert(id, atom)
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id)
    }

    pub fn atom_mut(&mut self, id: AtomId) -> Option<&mut Atom> {
        self.atoms.get_mut(&id)
    }

    pub fn contains(&self, id: AtomId) -> bool {
        self.atoms.contains_key(&id)
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn atom_ids(&self) -> impl Iterator<Item = AtomId> + '_ {
        self.atoms.keys().copied()
    }

    /// Atoms in ascending identifier order.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> + '_ {
        self.atoms.iter().map(|(&id, atom)| (id, atom))
    }

    pub fn atoms_mut(&mut self) -> impl Iterator<Item = (AtomId, &mut Atom)> + '_ {
        self.atoms.iter_mut().map(|(&id, atom)| (id, atom))
    }

    /// Insert or replace the bond between `a` and `b`, returning the bond it
    /// replaced.
    pub fn add_bond(
        &mut self,
        a: AtomId,
        b: AtomId,
        bond: Bond,
    ) -> Result<Option<Bond>, GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        for id in [a, b] {
            if !self.contains(id) {
                return Err(GraphError::MissingAtom(id));
            }
        }
        Ok(self.graph.add_edge(a, b, bond))
    }

    pub fn bond(&self, a: AtomId, b: AtomId) -> Option<&Bond> {
        self.graph.edge_weight(a, b)
    }

    pub fn bond_mut(&mut self, a: AtomId, b: AtomId) -> Option<&mut Bond> {
        self.graph.edge_weight_mut(a, b)
    }

    pub fn has_bond(&self, a: AtomId, b: AtomId) -> bool {
        self.graph.contains_edge(a, b)
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Bonds as `(low, high, bond)` with `low < high`.
    pub fn bonds(&self) -> impl Iterator<Item = (AtomId, AtomId, &Bond)> + '_ {
        self.graph
            .all_edges()
            .map(|(a, b, bond)| (a.min(b), a.max(b), bond))
    }

    pub fn neighbors(&self, id: AtomId) -> impl Iterator<Item = AtomId> + '_ {
        self.graph.neighbors(id)
    }

    pub fn degree(&self, id: AtomId) -> usize {
        self.graph.neighbors(id).count()
    }

    /// Disjoint union. Both graphs must be of the same kind and share no
    /// atom identifier. Metadata of `self` wins on key clashes.
    pub fn union(&self, other: &Container) -> Result<Container, GraphError> {
        if self.kind != other.kind {
            return Err(GraphError::KindMismatch {
                left: self.kind,
                right: other.kind,
            });
        }
        if let Some(id) = other.atom_ids().find(|&id| self.contains(id)) {
            return Err(GraphError::DuplicateAtom(id));
        }

        let mut result = self.clone();
        for (key, value) in &other.meta {
            result
                .meta
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        for (id, atom) in other.atoms() {
            result.add_atom(id, atom.clone());
        }
        for (a, b, bond) in other.bonds() {
            result.graph.add_edge(a, b, bond.clone());
        }
        Ok(result)
    }

    /// Copy of this graph with atoms renamed through `mapping`. Atoms missing
    /// from the mapping keep their identifier.
    pub fn remapped(&self, mapping: &Mapping) -> Result<Container, GraphError> {
        let rename = |id: AtomId| mapping.get(&id).copied().unwrap_or(id);
        let mut seen = BTreeSet::new();
        for id in self.atom_ids().map(rename) {
            if !seen.insert(id) {
                return Err(GraphError::IdCollision(id));
            }
        }
        Ok(self.relabeled(rename))
    }

    /// In-place variant of [`Container::remapped`]. On error the graph is
    /// left untouched.
    pub fn remap(&mut self, mapping: &Mapping) -> Result<(), GraphError> {
        *self = self.remapped(mapping)?;
        Ok(())
    }

    /// Rename every atom through `rename`, which must be injective on this
    /// graph's identifiers.
    pub(crate) fn relabeled(&self, rename: impl Fn(AtomId) -> AtomId) -> Container {
        let mut result = self.fresh();
        for (id, atom) in self.atoms() {
            result.add_atom(rename(id), atom.clone());
        }
        for (a, b, bond) in self.bonds() {
            result.graph.add_edge(rename(a), rename(b), bond.clone());
        }
        result
    }
}

impl PartialEq for Container {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.meta == other.meta
            && self.atoms == other.atoms
            && self.bond_count() == other.bond_count()
            && self
                .bonds()
                .all(|(a, b, bond)| other.bond(a, b) == Some(bond))
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut bonds: Vec<_> = self.bonds().collect();
        bonds.sort_by_key(|&(a, b, _)| (a, b));
        f.debug_struct("Container")
            .field("kind", &self.kind)
            .field("meta", &self.meta)
            .field("atoms", &self.atoms)
            .field("bonds", &bonds)
            .finish()
    }
}

/// Flat serialized form of a [`Container`].
#[derive(Serialize, Deserialize)]
struct ContainerRepr {
    kind: GraphKind,
    #[serde(default)]
    meta: Meta,
    #[serde(default)]
    atoms: BTreeMap<AtomId, Atom>,
    #[serde(default)]
    bonds: Vec<(AtomId, AtomId, Bond)>,
}

impl From<Container> for ContainerRepr {
    fn from(c: Container) -> Self {
        let mut bonds: Vec<_> = c
            .bonds()
            .map(|(a, b, bond)| (a, b, bond.clone()))
            .collect();
        bonds.sort_by_key(|&(a, b, _)| (a, b));
        Self {
            kind: c.kind,
            meta: c.meta,
            atoms: c.atoms,
            bonds,
        }
    }
}

impl TryFrom<ContainerRepr> for Container {
    type Error = GraphError;

    fn try_from(repr: ContainerRepr) -> Result<Self, Self::Error> {
        let mut c = Container::new(repr.kind);
        c.meta = repr.meta;
        for (id, atom) in repr.atoms {
            c.add_atom(id, atom);
        }
        for (a, b, bond) in repr.bonds {
            c.add_bond(a, b, bond)?;
        }
        Ok(c)
    }
}
