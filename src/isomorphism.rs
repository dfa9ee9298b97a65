use std::collections::HashSet;

use crate::atom::Atom;
use crate::bond::Bond;
use crate::container::{AtomId, Container, Mapping};

/// Node and edge equivalence used while searching. The first argument always
/// belongs to the searched graph, the second to the pattern.
pub trait Equivalence {
    fn atoms_match(&self, g: &Atom, h: &Atom) -> bool;
    fn bonds_match(&self, g: &Bond, h: &Bond) -> bool;
}

/// Ad hoc equivalence from a pair of closures.
pub struct Predicates<FA, FB>(pub FA, pub FB);

impl<FA, FB> Equivalence for Predicates<FA, FB>
where
    FA: Fn(&Atom, &Atom) -> bool,
    FB: Fn(&Bond, &Bond) -> bool,
{
    fn atoms_match(&self, g: &Atom, h: &Atom) -> bool {
        (self.0)(g, h)
    }

    fn bonds_match(&self, g: &Bond, h: &Bond) -> bool {
        (self.1)(g, h)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
    /// The pattern maps onto an induced subgraph of the searched graph.
    Subgraph,
    /// The pattern maps onto the whole searched graph.
    Exact,
}

/// Lazy enumeration of pattern-to-graph mappings.
///
/// Yields each distinct injective mapping (pattern id -> graph id) exactly
/// once. Matching is node-induced: two pattern atoms are bonded iff their
/// images are. The sequence is single-pass; enumerating again requires a new
/// `Occurrences`.
pub struct Occurrences<'a, E: ?Sized> {
    pattern: &'a Container,
    target: &'a Container,
    equivalence: &'a E,
    order: Vec<(AtomId, &'a Atom)>,
    candidates: Vec<(AtomId, &'a Atom)>,
    cursors: Vec<usize>,
    assigned: Vec<AtomId>,
    used: HashSet<AtomId>,
    exhausted: bool,
}

impl<'a, E: Equivalence + ?Sized> Occurrences<'a, E> {
    pub fn new(
        target: &'a Container,
        pattern: &'a Container,
        equivalence: &'a E,
        problem: Problem,
    ) -> Self {
        let mut order: Vec<(AtomId, &Atom)> = pattern.atoms().collect();
        order.sort_by(|&(a, _), &(b, _)| {
            pattern
                .degree(b)
                .cmp(&pattern.degree(a))
                .then(a.cmp(&b))
        });

        let exhausted = match problem {
            Problem::Subgraph => pattern.atom_count() > target.atom_count(),
            Problem::Exact => {
                pattern.atom_count() != target.atom_count()
                    || pattern.bond_count() != target.bond_count()
            }
        };

        Self {
            pattern,
            target,
            equivalence,
            order,
            candidates: target.atoms().collect(),
            cursors: vec![0],
            assigned: Vec::new(),
            used: HashSet::new(),
            exhausted,
        }
    }

    pub fn subgraph(target: &'a Container, pattern: &'a Container, equivalence: &'a E) -> Self {
        Self::new(target, pattern, equivalence, Problem::Subgraph)
    }

    pub fn exact(target: &'a Container, pattern: &'a Container, equivalence: &'a E) -> Self {
        Self::new(target, pattern, equivalence, Problem::Exact)
    }

    fn current_mapping(&self) -> Mapping {
        self.order
            .iter()
            .map(|&(q, _)| q)
            .zip(self.assigned.iter().copied())
            .collect()
    }

    /// Undo the deepest assignment. Returns `false` once the search tree is
    /// exhausted.
    fn backtrack(&mut self) -> bool {
        self.cursors.pop();
        match self.assigned.pop() {
            Some(t) => {
                self.used.remove(&t);
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }

    fn is_feasible(&self, depth: usize, target_node: AtomId, target_atom: &Atom) -> bool {
        let (query_node, query_atom) = self.order[depth];
        if !self.equivalence.atoms_match(target_atom, query_atom) {
            return false;
        }

        for (&(q_prev, _), &t_prev) in self.order[..depth].iter().zip(&self.assigned) {
            match (
                self.pattern.bond(query_node, q_prev),
                self.target.bond(target_node, t_prev),
            ) {
                (Some(q_bond), Some(t_bond)) => {
                    if !self.equivalence.bonds_match(t_bond, q_bond) {
                        return false;
                    }
                }
                (None, None) => {}
                _ => return false,
            }
        }

        true
    }
}

impl<E: Equivalence + ?Sized> Iterator for Occurrences<'_, E> {
    type Item = Mapping;

    fn next(&mut self) -> Option<Mapping> {
        if self.exhausted {
            return None;
        }

        loop {
            let depth = self.assigned.len();
            if depth == self.order.len() {
                let mapping = self.current_mapping();
                self.backtrack();
                return Some(mapping);
            }

            let mut found = None;
            while let Some(&(t_node, t_atom)) = self.candidates.get(self.cursors[depth]) {
                self.cursors[depth] += 1;
                if !self.used.contains(&t_node) && self.is_feasible(depth, t_node, t_atom) {
                    found = Some(t_node);
                    break;
                }
            }

            match found {
                Some(t_node) => {
                    self.assigned.push(t_node);
                    self.used.insert(t_node);
                    self.cursors.push(0);
                }
                None => {
                    if !self.backtrack() {
                        return None;
                    }
                }
            }
        }
    }
}
