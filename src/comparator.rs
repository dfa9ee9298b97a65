use serde::{Deserialize, Serialize};

use crate::atom::{Atom, AtomMark};
use crate::bond::{Bond, BondMark};
use crate::container::GraphKind;
use crate::isomorphism::Equivalence;
use crate::value::Value;

/// Which attribute families take part in matching.
///
/// # Examples
///
/// ```
/// use cgrcrab::MatchOptions;
///
/// let options = MatchOptions::default().with_stereo(true);
/// assert!(options.element);
/// assert!(options.stereo);
/// assert!(!options.isotope);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Compare mass numbers.
    pub isotope: bool,
    /// Compare element, charge and radical state.
    pub element: bool,
    /// Compare hybridization and neighbor count.
    pub extralabels: bool,
    /// Compare atom and bond stereo labels.
    pub stereo: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            isotope: false,
            element: true,
            extralabels: false,
            stereo: false,
        }
    }
}

impl MatchOptions {
    pub fn with_isotope(mut self, on: bool) -> Self {
        self.isotope = on;
        self
    }

    pub fn with_element(mut self, on: bool) -> Self {
        self.element = on;
        self
    }

    pub fn with_extralabels(mut self, on: bool) -> Self {
        self.extralabels = on;
        self
    }

    pub fn with_stereo(mut self, on: bool) -> Self {
        self.stereo = on;
        self
    }

    fn atom_marks(&self, states: States) -> Vec<AtomMark> {
        use AtomMark::*;

        let mut marks = Vec::new();
        if self.isotope {
            marks.push(Isotope);
        }
        if self.element {
            marks.push(Element);
            marks.extend(states.pick(&[SCharge, SRadical], &[PCharge, PRadical]));
        }
        if self.extralabels {
            marks.extend(states.pick(&[SNeighbors, SHyb], &[PNeighbors, PHyb]));
        }
        if self.stereo {
            marks.extend(states.pick(&[SStereo], &[PStereo]));
        }
        marks
    }

    fn bond_marks(&self, states: States) -> Vec<BondMark> {
        use BondMark::*;

        let mut marks = states.pick(&[SBond], &[PBond]);
        if self.stereo {
            marks.extend(states.pick(&[SStereo], &[PStereo]));
        }
        marks
    }
}

#[derive(Clone, Copy)]
enum States {
    Reactant,
    Both,
}

impl States {
    fn pick<T: Copy>(self, reactant: &[T], product: &[T]) -> Vec<T> {
        match self {
            Self::Reactant => reactant.to_vec(),
            Self::Both => reactant.iter().chain(product).copied().collect(),
        }
    }
}

/// How a single attribute of the searched graph (`g`) is compared with the
/// pattern's (`h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// `h` is the pattern: absent in `h` matches anything, a literal must be
    /// equal, a set must contain `g`'s literal.
    List,
    /// `g` is the pattern (a query graph searched for a concrete graph).
    Set,
    /// Plain equality, absence only equals absence.
    Exact,
}

impl Policy {
    pub fn accepts(self, g: Option<&Value>, h: Option<&Value>) -> bool {
        match self {
            Self::List => pattern_accepts(h, g),
            Self::Set => pattern_accepts(g, h),
            Self::Exact => g == h,
        }
    }
}

fn pattern_accepts(pattern: Option<&Value>, concrete: Option<&Value>) -> bool {
    match (pattern, concrete) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(p), Some(c)) => p.accepts(c),
    }
}

/// Node and edge equivalence over a fixed list of marks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparator {
    atom_marks: Vec<AtomMark>,
    bond_marks: Vec<BondMark>,
    policy: Policy,
}

impl Comparator {
    pub fn new(atom_marks: Vec<AtomMark>, bond_marks: Vec<BondMark>, policy: Policy) -> Self {
        Self {
            atom_marks,
            bond_marks,
            policy,
        }
    }

    pub fn atom_marks(&self) -> &[AtomMark] {
        &self.atom_marks
    }

    pub fn bond_marks(&self) -> &[BondMark] {
        &self.bond_marks
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }
}

impl Equivalence for Comparator {
    fn atoms_match(&self, g: &Atom, h: &Atom) -> bool {
        self.atom_marks
            .iter()
            .all(|&m| self.policy.accepts(g.get(m), h.get(m)))
    }

    fn bonds_match(&self, g: &Bond, h: &Bond) -> bool {
        self.bond_marks
            .iter()
            .all(|&m| self.policy.accepts(g.get(m), h.get(m)))
    }
}

/// The comparators of one reactor, built once from [`MatchOptions`] and
/// never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparators {
    options: MatchOptions,
    cgr: Comparator,
    query: Comparator,
    molecule: Comparator,
    products: Comparator,
}

impl Comparators {
    pub fn new(options: MatchOptions) -> Self {
        let both = (
            options.atom_marks(States::Both),
            options.bond_marks(States::Both),
        );
        let reactant = (
            options.atom_marks(States::Reactant),
            options.bond_marks(States::Reactant),
        );

        Self {
            options,
            cgr: Comparator::new(both.0.clone(), both.1.clone(), Policy::List),
            query: Comparator::new(both.0, both.1, Policy::Set),
            molecule: Comparator::new(reactant.0, reactant.1, Policy::List),
            products: Comparator::new(
                vec![AtomMark::Element, AtomMark::PCharge, AtomMark::PRadical],
                vec![BondMark::PBond, BondMark::PStereo],
                Policy::Exact,
            ),
        }
    }

    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Comparator for a search over a graph of the given kind.
    pub fn for_kind(&self, kind: GraphKind) -> &Comparator {
        match kind {
            GraphKind::Cgr => &self.cgr,
            GraphKind::Query => &self.query,
            GraphKind::Molecule => &self.molecule,
        }
    }

    /// Product-state comparator for CGR-vs-CGR balancing checks. Ignores the
    /// options.
    pub fn products(&self) -> &Comparator {
        &self.products
    }
}

impl Default for Comparators {
    fn default() -> Self {
        Self::new(MatchOptions::default())
    }
}
