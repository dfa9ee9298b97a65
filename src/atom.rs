use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Cartesian coordinates of an atom in one state.
pub type Point = [f64; 3];

/// Attribute keys an atom can carry.
///
/// `S*` marks describe the reactant state and `P*` marks the product state of
/// a condensed graph of reaction. Molecules only use the `S*` marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtomMark {
    Element,
    Isotope,
    SCharge,
    PCharge,
    SRadical,
    PRadical,
    SHyb,
    PHyb,
    SNeighbors,
    PNeighbors,
    SStereo,
    PStereo,
    /// Atom-to-atom mapping number.
    Map,
    /// Free-form user label.
    Mark,
}

impl AtomMark {
    /// Marks describing chemistry, as opposed to bookkeeping labels.
    pub const CHEMICAL: [AtomMark; 12] = [
        AtomMark::Element,
        AtomMark::Isotope,
        AtomMark::SCharge,
        AtomMark::PCharge,
        AtomMark::SRadical,
        AtomMark::PRadical,
        AtomMark::SHyb,
        AtomMark::PHyb,
        AtomMark::SNeighbors,
        AtomMark::PNeighbors,
        AtomMark::SStereo,
        AtomMark::PStereo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Isotope => "isotope",
            Self::SCharge => "s_charge",
            Self::PCharge => "p_charge",
            Self::SRadical => "s_radical",
            Self::PRadical => "p_radical",
            Self::SHyb => "s_hyb",
            Self::PHyb => "p_hyb",
            Self::SNeighbors => "s_neighbors",
            Self::PNeighbors => "p_neighbors",
            Self::SStereo => "s_stereo",
            Self::PStereo => "p_stereo",
            Self::Map => "map",
            Self::Mark => "mark",
        }
    }
}

impl fmt::Display for AtomMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node payload of a [`Container`](crate::Container).
///
/// Attributes live in a mark-keyed map; an absent mark is a wildcard when the
/// atom belongs to a pattern. Coordinates are kept apart from the marks since
/// they never take part in matching.
///
/// # Examples
///
/// ```
/// use cgrcrab::{Atom, AtomMark, Value};
///
/// let carbon = Atom::new()
///     .with(AtomMark::Element, "C")
///     .with(AtomMark::SCharge, 0);
/// assert_eq!(carbon.get(AtomMark::Element), Some(&Value::from("C")));
/// assert_eq!(carbon.get(AtomMark::Isotope), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    #[serde(default)]
    pub marks: BTreeMap<AtomMark, Value>,
    /// Reactant-state coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_xyz: Option<Point>,
    /// Product-state coordinates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_xyz: Option<Point>,
}

impl Atom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, mark: AtomMark, value: impl Into<Value>) -> Self {
        self.marks.insert(mark, value.into());
        self
    }

    pub fn get(&self, mark: AtomMark) -> Option<&Value> {
        self.marks.get(&mark)
    }

    pub fn set(&mut self, mark: AtomMark, value: impl Into<Value>) -> Option<Value> {
        self.marks.insert(mark, value.into())
    }

    pub fn clear_coordinates(&mut self) {
        self.s_xyz = None;
        self.p_xyz = None;
    }
}
