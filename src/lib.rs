//! Matching and rewriting of condensed graphs of reaction.
//!
//! Molecules, CGRs and query patterns share one attributed graph type,
//! [`Container`]. A [`Reactor`] searches one graph inside another under the
//! attribute families selected by [`MatchOptions`], finds prepared reaction
//! templates in structures and applies their patches.

pub mod atom;
pub mod bond;
pub mod comparator;
pub mod container;
pub mod isomorphism;
pub mod reactor;
pub mod value;

pub use atom::{Atom, AtomMark, Point};
pub use bond::{Bond, BondMark};
pub use comparator::{Comparator, Comparators, MatchOptions, Policy};
pub use container::{AtomId, Container, GraphError, GraphKind, Mapping, Meta};
pub use isomorphism::{Equivalence, Occurrences, Predicates, Problem};
pub use reactor::{
    patch, prepare_templates, Match, PatchError, RawTemplate, Reactor, ReactorError, Side,
    SubstructureMappings, Template, TemplateError, TemplateMatches, TemplateSearcher,
    TemplateSource, TEMPLATE_ID_OFFSET,
};
pub use value::{Scalar, Value};

#[cfg(test)]
mod test_utils;
