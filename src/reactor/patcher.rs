use crate::atom::{Atom, AtomMark};
use crate::bond::{Bond, BondMark};
use crate::container::{AtomId, Container, GraphKind};

use super::error::PatchError;

const MOLECULE_ATOM_MARKS: &[AtomMark] = &[
    AtomMark::Element,
    AtomMark::Isotope,
    AtomMark::SCharge,
    AtomMark::SHyb,
    AtomMark::SNeighbors,
    AtomMark::SStereo,
    AtomMark::SRadical,
    AtomMark::Map,
    AtomMark::Mark,
];

const CGR_ATOM_MARKS: &[AtomMark] = &[
    AtomMark::Element,
    AtomMark::Isotope,
    AtomMark::SCharge,
    AtomMark::SHyb,
    AtomMark::SNeighbors,
    AtomMark::SStereo,
    AtomMark::SRadical,
    AtomMark::PCharge,
    AtomMark::PHyb,
    AtomMark::PNeighbors,
    AtomMark::PStereo,
    AtomMark::PRadical,
    AtomMark::Map,
    AtomMark::Mark,
];

const MOLECULE_BOND_MARKS: &[BondMark] = &[BondMark::SBond, BondMark::SStereo];

const CGR_BOND_MARKS: &[BondMark] = &[
    BondMark::SBond,
    BondMark::SStereo,
    BondMark::PBond,
    BondMark::PStereo,
];

/// Attributes a patch may write into a structure of a given kind.
struct Family {
    atoms: &'static [AtomMark],
    bonds: &'static [BondMark],
    product_coordinates: bool,
}

impl Family {
    fn of(kind: GraphKind) -> Result<Self, PatchError> {
        match kind {
            GraphKind::Molecule => Ok(Self {
                atoms: MOLECULE_ATOM_MARKS,
                bonds: MOLECULE_BOND_MARKS,
                product_coordinates: false,
            }),
            GraphKind::Cgr => Ok(Self {
                atoms: CGR_ATOM_MARKS,
                bonds: CGR_BOND_MARKS,
                product_coordinates: true,
            }),
            GraphKind::Query => Err(PatchError::UnsupportedKind(kind)),
        }
    }

    fn new_atom(&self, id: AtomId, update: &Atom) -> Result<Atom, PatchError> {
        let mut atom = Atom {
            s_xyz: update.s_xyz,
            p_xyz: update.p_xyz.filter(|_| self.product_coordinates),
            ..Atom::default()
        };
        self.overlay_atom(id, &mut atom, None, update)?;
        Ok(atom)
    }

    fn patched_atom(&self, id: AtomId, current: &Atom, update: &Atom) -> Result<Atom, PatchError> {
        let mut atom = current.clone();
        self.overlay_atom(id, &mut atom, Some(current), update)?;
        Ok(atom)
    }

    fn overlay_atom(
        &self,
        id: AtomId,
        atom: &mut Atom,
        current: Option<&Atom>,
        update: &Atom,
    ) -> Result<(), PatchError> {
        for &mark in self.atoms {
            let Some(value) = update.get(mark) else {
                continue;
            };
            let resolved = value
                .resolve(current.and_then(|a| a.get(mark)))
                .ok_or(PatchError::UnresolvedAtom { atom: id, mark })?;
            atom.set(mark, resolved);
        }
        Ok(())
    }

    fn patched_bond(
        &self,
        (first, second): (AtomId, AtomId),
        current: Option<&Bond>,
        update: &Bond,
    ) -> Result<Bond, PatchError> {
        let mut bond = Bond::new();
        for &mark in self.bonds {
            let Some(value) = update.get(mark) else {
                continue;
            };
            let resolved = value
                .resolve(current.and_then(|b| b.get(mark)))
                .ok_or(PatchError::UnresolvedBond {
                    first,
                    second,
                    mark,
                })?;
            bond.set(mark, resolved);
        }
        Ok(bond)
    }
}

/// Overlay `patch` onto `structure`, returning the rewritten graph.
///
/// Bonds between two patch atoms are replaced by the patch's bonds, so a bond
/// the patch omits is removed. Patch atoms unknown to the structure are added;
/// known ones have the patched attributes overwritten, with positional
/// mappings resolved against the structure's current values. Neither input is
/// modified.
pub fn patch(structure: &Container, patch: &Container) -> Result<Container, PatchError> {
    let family = Family::of(structure.kind())?;

    let mut result = structure.fresh();
    for (id, atom) in structure.atoms() {
        result.add_atom(id, atom.clone());
    }
    for (a, b, bond) in structure.bonds() {
        if patch.contains(a) && patch.contains(b) {
            continue;
        }
        result.add_bond(a, b, bond.clone())?;
    }

    for (id, update) in patch.atoms() {
        let atom = match structure.atom(id) {
            Some(current) => family.patched_atom(id, current, update)?,
            None => family.new_atom(id, update)?,
        };
        result.add_atom(id, atom);
    }

    for (a, b, update) in patch.bonds() {
        let bond = family.patched_bond((a, b), structure.bond(a, b), update)?;
        result.add_bond(a, b, bond)?;
    }

    Ok(result)
}
