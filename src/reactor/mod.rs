//! Isomorphism search and template-driven rewriting of attributed graphs.
//!
//! A [`Reactor`] owns the comparators built from one [`MatchOptions`] and
//! answers substructure and full-graph isomorphism queries with them. The
//! comparator is always picked by the kind of the searched graph `g`.
//! Templates prepared with [`prepare_templates`] are located with a
//! [`TemplateSearcher`], and each [`Match`] can be applied with [`patch`].

pub mod error;
mod patcher;
mod search;
mod template;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::comparator::{Comparator, Comparators, MatchOptions};
use crate::container::{Container, Mapping};
use crate::isomorphism::Occurrences;

pub use error::{PatchError, ReactorError, Side, TemplateError};
pub use patcher::patch;
pub use search::{Match, TemplateMatches, TemplateSearcher};
pub use template::{
    prepare_templates, RawTemplate, Template, TemplateSource, TEMPLATE_ID_OFFSET,
};

/// Isomorphism search facade.
///
/// Serializes as its [`MatchOptions`]; comparators are rebuilt on load.
///
/// # Examples
///
/// ```
/// use cgrcrab::{Atom, AtomMark, Bond, BondMark, Container, GraphKind, Reactor};
///
/// let mut ethanol = Container::new(GraphKind::Molecule);
/// for (id, symbol) in [(1, "C"), (2, "C"), (3, "O")] {
///     ethanol.add_atom(id, Atom::new().with(AtomMark::Element, symbol));
/// }
/// ethanol.add_bond(1, 2, Bond::new().with(BondMark::SBond, 1)).unwrap();
/// ethanol.add_bond(2, 3, Bond::new().with(BondMark::SBond, 1)).unwrap();
///
/// let mut hydroxyl = Container::new(GraphKind::Molecule);
/// hydroxyl.add_atom(1, Atom::new().with(AtomMark::Element, "C"));
/// hydroxyl.add_atom(2, Atom::new().with(AtomMark::Element, "O"));
/// hydroxyl.add_bond(1, 2, Bond::new().with(BondMark::SBond, 1)).unwrap();
///
/// let reactor = Reactor::default();
/// assert!(reactor.is_substructure(&ethanol, &hydroxyl));
/// assert!(!reactor.is_equal(&ethanol, &hydroxyl));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "MatchOptions", into = "MatchOptions")]
pub struct Reactor {
    comparators: Comparators,
}

impl From<MatchOptions> for Reactor {
    fn from(options: MatchOptions) -> Self {
        Self::new(options)
    }
}

impl From<Reactor> for MatchOptions {
    fn from(reactor: Reactor) -> Self {
        reactor.options()
    }
}

/// Result of [`Reactor::get_substructure_mapping`], shaped by the limit.
pub enum SubstructureMappings<'a> {
    /// `limit == 1`: the first occurrence, if any.
    First(Option<Mapping>),
    /// `limit < 0`: every occurrence, lazily.
    All(Occurrences<'a, Comparator>),
    /// `limit > 1`: at most `limit` occurrences.
    Limited(Vec<Mapping>),
}

impl SubstructureMappings<'_> {
    /// Collect whatever this holds, draining a lazy enumeration.
    pub fn into_vec(self) -> Vec<Mapping> {
        match self {
            Self::First(mapping) => mapping.into_iter().collect(),
            Self::All(occurrences) => occurrences.collect(),
            Self::Limited(mappings) => mappings,
        }
    }
}

impl Reactor {
    pub fn new(options: MatchOptions) -> Self {
        Self {
            comparators: Comparators::new(options),
        }
    }

    pub fn options(&self) -> MatchOptions {
        self.comparators.options()
    }

    /// Lazily enumerate every occurrence of `h` in `g` (`h` id -> `g` id).
    pub fn occurrences<'a>(
        &'a self,
        g: &'a Container,
        h: &'a Container,
    ) -> Occurrences<'a, Comparator> {
        Occurrences::subgraph(g, h, self.comparators.for_kind(g.kind()))
    }

    /// Whether some induced subgraph of `g` is isomorphic to `h`.
    pub fn is_substructure(&self, g: &Container, h: &Container) -> bool {
        self.occurrences(g, h).next().is_some()
    }

    /// Whether `g` and `h` are isomorphic.
    pub fn is_equal(&self, g: &Container, h: &Container) -> bool {
        self.get_mapping(g, h).is_some()
    }

    /// One isomorphism of `h` onto `g`.
    pub fn get_mapping(&self, g: &Container, h: &Container) -> Option<Mapping> {
        Occurrences::exact(g, h, self.comparators.for_kind(g.kind())).next()
    }

    /// Occurrences of `h` in `g`.
    ///
    /// A negative `limit` returns the lazy enumeration itself, `1` returns
    /// only the first occurrence and larger limits collect at most that many.
    /// A zero limit is rejected.
    pub fn get_substructure_mapping<'a>(
        &'a self,
        g: &'a Container,
        h: &'a Container,
        limit: i64,
    ) -> Result<SubstructureMappings<'a>, ReactorError> {
        let mut occurrences = self.occurrences(g, h);
        let mappings = match limit {
            0 => return Err(ReactorError::InvalidLimit),
            1 => SubstructureMappings::First(occurrences.next()),
            n if n < 0 => SubstructureMappings::All(occurrences),
            n => {
                let take = usize::try_from(n).unwrap_or(usize::MAX);
                let found: Vec<_> = occurrences.take(take).collect();
                debug!("collected {} of at most {n} substructure mappings", found.len());
                SubstructureMappings::Limited(found)
            }
        };
        Ok(mappings)
    }

    /// Whether two CGRs describe the same product state.
    pub fn is_product_equal(&self, g: &Container, h: &Container) -> bool {
        self.get_product_mapping(g, h).is_some()
    }

    /// One isomorphism of `h` onto `g` comparing product-state marks only.
    pub fn get_product_mapping(&self, g: &Container, h: &Container) -> Option<Mapping> {
        Occurrences::exact(g, h, self.comparators.products()).next()
    }

    pub fn template_searcher<'t>(&'t self, templates: &'t [Template]) -> TemplateSearcher<'t> {
        TemplateSearcher::new(self, templates)
    }
}
