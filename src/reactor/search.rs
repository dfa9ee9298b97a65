use std::collections::HashSet;
use std::slice;

use log::trace;

use crate::comparator::Comparator;
use crate::container::{AtomId, Container, Mapping, Meta};
use crate::isomorphism::Occurrences;

use super::error::PatchError;
use super::patcher::patch;
use super::template::Template;
use super::Reactor;

/// One occurrence of a template in a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    /// Template pattern atom -> structure atom.
    pub mapping: Mapping,
    /// The template patch renumbered into the structure's identifiers. Atoms
    /// created by the template carry identifiers unused by the structure.
    pub patch: Container,
    pub meta: Meta,
}

impl Match {
    /// Apply this match's patch to `structure`, which should be the graph the
    /// match was found in.
    pub fn apply(&self, structure: &Container) -> Result<Container, PatchError> {
        patch(structure, &self.patch)
    }
}

/// Searches a fixed set of prepared templates in structures.
#[derive(Clone, Copy)]
pub struct TemplateSearcher<'t> {
    reactor: &'t Reactor,
    templates: &'t [Template],
}

impl<'t> TemplateSearcher<'t> {
    pub fn new(reactor: &'t Reactor, templates: &'t [Template]) -> Self {
        Self { reactor, templates }
    }

    /// Lazily enumerate matches of every template, in template order.
    ///
    /// With `skip_intersection`, an occurrence sharing an atom with a match
    /// already yielded by this call is skipped. Atoms created by different
    /// matches of one call never share an identifier.
    pub fn search<'a>(
        &self,
        structure: &'a Container,
        skip_intersection: bool,
    ) -> TemplateMatches<'a>
    where
        't: 'a,
    {
        TemplateMatches {
            reactor: self.reactor,
            templates: self.templates.iter(),
            structure,
            current: None,
            claimed: skip_intersection.then(HashSet::new),
            fresh: FreshIds::new(structure),
        }
    }

    /// [`TemplateSearcher::search`] with overlapping occurrences skipped.
    pub fn find<'a>(&self, structure: &'a Container) -> TemplateMatches<'a>
    where
        't: 'a,
    {
        self.search(structure, true)
    }
}

/// Single-pass iterator over the matches of a template search.
pub struct TemplateMatches<'a> {
    reactor: &'a Reactor,
    templates: slice::Iter<'a, Template>,
    structure: &'a Container,
    current: Option<(&'a Template, Occurrences<'a, Comparator>)>,
    claimed: Option<HashSet<AtomId>>,
    fresh: FreshIds<'a>,
}

impl Iterator for TemplateMatches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        loop {
            if let Some((template, occurrences)) = &mut self.current {
                for mapping in occurrences.by_ref() {
                    if let Some(claimed) = &mut self.claimed {
                        if mapping.values().any(|id| claimed.contains(id)) {
                            trace!("skipping occurrence overlapping earlier match: {mapping:?}");
                            continue;
                        }
                        claimed.extend(mapping.values().copied());
                    }
                    return Some(build_match(template, mapping, &mut self.fresh));
                }
            }

            let template = self.templates.next()?;
            let occurrences = self.reactor.occurrences(self.structure, template.pattern());
            self.current = Some((template, occurrences));
        }
    }
}

fn build_match(template: &Template, mapping: Mapping, fresh: &mut FreshIds<'_>) -> Match {
    let mut renumber = mapping.clone();
    for id in template.patch().atom_ids() {
        if !renumber.contains_key(&id) {
            let new_id = fresh.allocate(template.pattern());
            trace!("template atom {id} becomes new atom {new_id}");
            renumber.insert(id, new_id);
        }
    }

    // every patch atom is a key of `renumber`, mapped onto distinct structure
    // atoms or onto identifiers absent from the structure
    let patch = template.patch().relabeled(|id| renumber[&id]);

    Match {
        mapping,
        patch,
        meta: template.meta().clone(),
    }
}

/// Hands out identifiers used by neither the structure nor the template
/// pattern, in ascending order. An identifier is handed out at most once.
struct FreshIds<'a> {
    structure: &'a Container,
    next: AtomId,
}

impl<'a> FreshIds<'a> {
    fn new(structure: &'a Container) -> Self {
        Self { structure, next: 1 }
    }

    fn allocate(&mut self, pattern: &Container) -> AtomId {
        while self.structure.contains(self.next) || pattern.contains(self.next) {
            self.next += 1;
        }
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::AtomMark;
    use crate::comparator::MatchOptions;
    use crate::container::GraphKind;
    use crate::reactor::template::{prepare_templates, RawTemplate};
    use crate::test_utils::{bond, chain, element, graph};
    use crate::value::Value;

    fn template(reagent: Container, product: Container) -> RawTemplate {
        RawTemplate {
            reagents: vec![reagent],
            products: vec![product],
            meta: Meta::new(),
        }
    }

    /// Charges any carbon.
    fn charge_carbon() -> RawTemplate {
        template(
            chain(GraphKind::Query, &["C"]),
            graph(
                GraphKind::Query,
                &[(1, element("C").with(AtomMark::SCharge, 1))],
                &[],
            ),
        )
    }

    /// Attaches an oxygen to any carbon.
    fn oxidize_carbon() -> RawTemplate {
        template(
            chain(GraphKind::Query, &["C"]),
            chain(GraphKind::Query, &["C", "O"]),
        )
    }

    #[test]
    fn overlapping_occurrences_are_skipped() {
        let reactor = Reactor::new(MatchOptions::default());
        let templates = prepare_templates([charge_carbon(), oxidize_carbon()]).unwrap();
        let structure = chain(GraphKind::Molecule, &["C", "N"]);

        let found: Vec<_> = reactor.template_searcher(&templates).find(&structure).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].mapping, Mapping::from([(1001, 1)]));

        let all: Vec<_> = reactor
            .template_searcher(&templates)
            .search(&structure, false)
            .collect();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn disjoint_occurrences_are_all_found() {
        let reactor = Reactor::default();
        let templates = prepare_templates([charge_carbon()]).unwrap();
        let structure = chain(GraphKind::Molecule, &["C", "N", "C"]);
        let found: Vec<_> = reactor.template_searcher(&templates).find(&structure).collect();
        let touched: Vec<_> = found.iter().map(|m| m.mapping[&1001]).collect();
        assert_eq!(touched, vec![1, 3]);
    }

    #[test]
    fn first_match_claims_atoms() {
        // C-C pattern in a three carbon chain: (1,2) claims both, (2,3) is skipped
        let reactor = Reactor::default();
        let templates = prepare_templates([template(
            chain(GraphKind::Query, &["C", "C"]),
            chain(GraphKind::Query, &["C", "C"]),
        )])
        .unwrap();
        let structure = chain(GraphKind::Molecule, &["C", "C", "C"]);
        let found: Vec<_> = reactor.template_searcher(&templates).find(&structure).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].mapping,
            Mapping::from([(1001, 1), (1002, 2)])
        );
    }

    #[test]
    fn patch_is_renumbered_into_structure_ids() {
        let reactor = Reactor::default();
        let templates = prepare_templates([oxidize_carbon()]).unwrap();
        let structure = graph(
            GraphKind::Molecule,
            &[(1, element("N")), (2, element("N")), (5, element("C"))],
            &[
                (1, 2, bond(GraphKind::Molecule, 1)),
                (2, 5, bond(GraphKind::Molecule, 1)),
            ],
        );
        let m = reactor
            .template_searcher(&templates)
            .find(&structure)
            .next()
            .unwrap();
        assert_eq!(m.mapping, Mapping::from([(1001, 5)]));
        // lowest identifier unused by the structure
        assert_eq!(m.patch.atom_ids().collect::<Vec<_>>(), vec![3, 5]);
        assert!(m.patch.has_bond(3, 5));
        assert_eq!(m.patch.atom(3).unwrap().get(AtomMark::Element), Some(&Value::from("O")));
    }

    #[test]
    fn new_atoms_of_separate_matches_stay_apart() {
        let reactor = Reactor::default();
        let templates = prepare_templates([oxidize_carbon()]).unwrap();
        let structure = graph(
            GraphKind::Molecule,
            &[(1, element("C")), (2, element("C"))],
            &[],
        );
        let found: Vec<_> = reactor.template_searcher(&templates).find(&structure).collect();
        let patched: Vec<Vec<AtomId>> = found
            .iter()
            .map(|m| m.patch.atom_ids().collect())
            .collect();
        assert_eq!(patched, vec![vec![1, 3], vec![2, 4]]);

        let mut result = structure.clone();
        for m in &found {
            result = m.apply(&result).unwrap();
        }
        assert_eq!(result.atom_count(), 4);
        let mut bonds: Vec<_> = result.bonds().map(|(a, b, _)| (a, b)).collect();
        bonds.sort();
        assert_eq!(bonds, vec![(1, 3), (2, 4)]);
    }

    #[test]
    fn fresh_ids_never_collide() {
        let mut structure = Container::new(GraphKind::Molecule);
        for id in 1..=1200 {
            structure.add_atom(id, element("N"));
        }
        structure.add_atom(1300, element("C"));
        let reactor = Reactor::default();
        let templates = prepare_templates([oxidize_carbon()]).unwrap();
        let m = reactor
            .template_searcher(&templates)
            .find(&structure)
            .next()
            .unwrap();
        let new_ids: Vec<_> = m.patch.atom_ids().filter(|&id| id != 1300).collect();
        assert_eq!(new_ids.len(), 1);
        assert!(!structure.contains(new_ids[0]));
        assert!(!templates[0].pattern().contains(new_ids[0]));
    }

    #[test]
    fn match_carries_template_meta() {
        let mut raw = charge_carbon();
        raw.meta.insert("rule".into(), "charge".into());
        let templates = prepare_templates([raw]).unwrap();
        let reactor = Reactor::default();
        let structure = chain(GraphKind::Molecule, &["C"]);
        let m = reactor
            .template_searcher(&templates)
            .find(&structure)
            .next()
            .unwrap();
        assert_eq!(m.meta.get("rule").map(String::as_str), Some("charge"));
    }

    #[test]
    fn no_templates_no_matches() {
        let reactor = Reactor::default();
        let structure = chain(GraphKind::Molecule, &["C"]);
        assert_eq!(reactor.template_searcher(&[]).find(&structure).count(), 0);
    }

    #[test]
    fn search_restarts_with_a_new_call() {
        let reactor = Reactor::default();
        let templates = prepare_templates([charge_carbon()]).unwrap();
        let structure = chain(GraphKind::Molecule, &["C", "C"]);
        let searcher = reactor.template_searcher(&templates);
        let mut first = searcher.find(&structure);
        assert!(first.next().is_some());
        assert_eq!(searcher.find(&structure).count(), 2);
    }
}
