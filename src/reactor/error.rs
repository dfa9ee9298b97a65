use std::fmt;

use thiserror::Error;

use crate::atom::AtomMark;
use crate::bond::BondMark;
use crate::container::{AtomId, GraphError, GraphKind};

/// Error returned by the search facade for an invalid argument.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReactorError {
    #[error("substructure mapping limit must be non-zero")]
    InvalidLimit,
}

/// Which half of a raw template an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reagents,
    Products,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reagents => f.write_str("reagents"),
            Self::Products => f.write_str("products"),
        }
    }
}

/// Error returned when a raw template fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template has no {0}")]
    Empty(Side),
    #[error("template {side} must be query graphs, got {kind:?}")]
    NotQuery { side: Side, kind: GraphKind },
    #[error("cannot combine template {side}: {source}")]
    Union {
        side: Side,
        #[source]
        source: GraphError,
    },
    #[error("new atoms can't be variable: atom {atom} has a set of {mark} values")]
    VariableNewAtom { atom: AtomId, mark: AtomMark },
    #[error("new bonds can't be variable: bond {first}-{second} has a set of {mark} values")]
    VariableNewBond {
        first: AtomId,
        second: AtomId,
        mark: BondMark,
    },
    #[error("variable {mark} of atom {atom} pairs {reagent} reagent values with {product} product values")]
    UnpairedAtomValues {
        atom: AtomId,
        mark: AtomMark,
        reagent: usize,
        product: usize,
    },
    #[error("variable {mark} of bond {first}-{second} pairs {reagent} reagent values with {product} product values")]
    UnpairedBondValues {
        first: AtomId,
        second: AtomId,
        mark: BondMark,
        reagent: usize,
        product: usize,
    },
    #[error("atom {0} cannot be moved into the template identifier band")]
    IdOutOfBand(AtomId),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Error returned when a patch cannot be applied to a structure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("cannot patch a {0:?} graph")]
    UnsupportedKind(GraphKind),
    #[error("no {mark} value of atom {atom} in the structure is covered by the patch")]
    UnresolvedAtom { atom: AtomId, mark: AtomMark },
    #[error("no {mark} value of bond {first}-{second} in the structure is covered by the patch")]
    UnresolvedBond {
        first: AtomId,
        second: AtomId,
        mark: BondMark,
    },
    #[error(transparent)]
    Graph(#[from] GraphError),
}
