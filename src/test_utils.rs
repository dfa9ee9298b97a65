use crate::atom::{Atom, AtomMark};
use crate::bond::{Bond, BondMark};
use crate::container::{AtomId, Container, GraphKind};

pub(crate) fn element(symbol: &str) -> Atom {
    Atom::new().with(AtomMark::Element, symbol)
}

/// Bond of the given order in every state `kind` carries.
pub(crate) fn bond(kind: GraphKind, order: i32) -> Bond {
    match kind {
        GraphKind::Molecule => Bond::new().with(BondMark::SBond, order),
        GraphKind::Cgr | GraphKind::Query => Bond::new()
            .with(BondMark::SBond, order)
            .with(BondMark::PBond, order),
    }
}

pub(crate) fn graph(
    kind: GraphKind,
    atoms: &[(AtomId, Atom)],
    bonds: &[(AtomId, AtomId, Bond)],
) -> Container {
    let mut c = Container::new(kind);
    for (id, atom) in atoms {
        c.add_atom(*id, atom.clone());
    }
    for (a, b, bond) in bonds {
        c.add_bond(*a, *b, bond.clone()).unwrap();
    }
    c
}

/// Linear chain of single bonds, atoms numbered from 1.
pub(crate) fn chain(kind: GraphKind, elements: &[&str]) -> Container {
    let mut c = Container::new(kind);
    for (i, symbol) in elements.iter().enumerate() {
        c.add_atom(i as AtomId + 1, element(symbol));
    }
    for i in 1..elements.len() as AtomId {
        c.add_bond(i, i + 1, bond(kind, 1)).unwrap();
    }
    c
}

/// Ring of single bonds, atoms numbered from 1.
pub(crate) fn ring(kind: GraphKind, elements: &[&str]) -> Container {
    let mut c = chain(kind, elements);
    let n = elements.len() as AtomId;
    c.add_bond(n, 1, bond(kind, 1)).unwrap();
    c
}
