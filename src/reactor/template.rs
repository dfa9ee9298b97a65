use log::debug;
use serde::{Deserialize, Serialize};

use crate::atom::AtomMark;
use crate::bond::BondMark;
use crate::container::{AtomId, Container, GraphKind, Mapping, Meta};
use crate::value::{Scalar, Value};

use super::error::{Side, TemplateError};

/// Offset added to every template atom identifier during preparation, moving
/// templates into a band of identifiers ordinary structures do not use.
pub const TEMPLATE_ID_OFFSET: AtomId = 1000;

/// A reaction template as written: reagent and product query graphs whose
/// shared atom identifiers denote persistent atoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTemplate {
    pub reagents: Vec<Container>,
    pub products: Vec<Container>,
    #[serde(default)]
    pub meta: Meta,
}

/// A validated template ready for searching: the `pattern` is located in a
/// structure and the `patch` describes what the matched region becomes.
///
/// Variable attributes of the patch are stored as [`Value::Mapping`]s keyed by
/// the values the pattern accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pattern: Container,
    patch: Container,
    meta: Meta,
}

impl Template {
    pub fn pattern(&self) -> &Container {
        &self.pattern
    }

    pub fn patch(&self) -> &Container {
        &self.patch
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }
}

/// Input to [`prepare_templates`]. Prepared templates pass through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateSource {
    Raw(RawTemplate),
    Prepared(Template),
}

impl From<RawTemplate> for TemplateSource {
    fn from(t: RawTemplate) -> Self {
        Self::Raw(t)
    }
}

impl From<Template> for TemplateSource {
    fn from(t: Template) -> Self {
        Self::Prepared(t)
    }
}

/// Validate and normalize a batch of templates.
///
/// Fails on the first invalid template; no partial batch is returned.
///
/// # Examples
///
/// ```
/// use cgrcrab::{Atom, AtomMark, Container, GraphKind, RawTemplate, prepare_templates};
///
/// let mut reagent = Container::new(GraphKind::Query);
/// reagent.add_atom(1, Atom::new().with(AtomMark::Element, "C"));
/// let mut product = Container::new(GraphKind::Query);
/// product.add_atom(1, Atom::new().with(AtomMark::Element, "C").with(AtomMark::SCharge, 1));
///
/// let raw = RawTemplate { reagents: vec![reagent], products: vec![product], meta: Default::default() };
/// let templates = prepare_templates([raw]).unwrap();
/// assert_eq!(templates[0].patch().atom_ids().collect::<Vec<_>>(), vec![1001]);
/// ```
pub fn prepare_templates<I>(templates: I) -> Result<Vec<Template>, TemplateError>
where
    I: IntoIterator,
    I::Item: Into<TemplateSource>,
{
    let prepared = templates
        .into_iter()
        .map(|t| match t.into() {
            TemplateSource::Prepared(t) => Ok(t),
            TemplateSource::Raw(raw) => prepare(&raw),
        })
        .collect::<Result<Vec<_>, _>>()?;
    debug!("prepared {} reaction templates", prepared.len());
    Ok(prepared)
}

fn prepare(raw: &RawTemplate) -> Result<Template, TemplateError> {
    let mut reagents = combine(&raw.reagents, Side::Reagents)?;
    let mut products = combine(&raw.products, Side::Products)?;

    for (id, atom) in products.atoms_mut() {
        let Some(reagent) = reagents.atom(id) else {
            if let Some(&mark) = AtomMark::CHEMICAL
                .iter()
                .find(|&&m| atom.get(m).is_some_and(Value::is_set))
            {
                return Err(TemplateError::VariableNewAtom { atom: id, mark });
            }
            continue;
        };

        for mark in AtomMark::CHEMICAL {
            let table = match atom.get(mark) {
                Some(Value::Set(values)) => {
                    positional(reagent.get(mark), values).map_err(|reagent| {
                        TemplateError::UnpairedAtomValues {
                            atom: id,
                            mark,
                            reagent,
                            product: values.len(),
                        }
                    })?
                }
                _ => continue,
            };
            atom.set(mark, table);
        }
        atom.clear_coordinates();
    }

    let pairs: Vec<(AtomId, AtomId)> = products.bonds().map(|(a, b, _)| (a, b)).collect();
    for (first, second) in pairs {
        let reagent = reagents.bond(first, second);
        let Some(bond) = products.bond_mut(first, second) else {
            continue;
        };
        for mark in BondMark::ALL {
            let Some(Value::Set(values)) = bond.get(mark) else {
                continue;
            };
            let Some(reagent) = reagent else {
                return Err(TemplateError::VariableNewBond {
                    first,
                    second,
                    mark,
                });
            };
            let table = positional(reagent.get(mark), values).map_err(|reagent| {
                TemplateError::UnpairedBondValues {
                    first,
                    second,
                    mark,
                    reagent,
                    product: values.len(),
                }
            })?;
            bond.set(mark, table);
        }
    }

    let shift = reagents
        .atom_ids()
        .chain(products.atom_ids())
        .map(|id| {
            id.checked_add(TEMPLATE_ID_OFFSET)
                .map(|shifted| (id, shifted))
                .ok_or(TemplateError::IdOutOfBand(id))
        })
        .collect::<Result<Mapping, _>>()?;
    reagents.remap(&shift)?;
    products.remap(&shift)?;

    Ok(Template {
        pattern: reagents,
        patch: products,
        meta: raw.meta.clone(),
    })
}

fn combine(parts: &[Container], side: Side) -> Result<Container, TemplateError> {
    let (first, rest) = parts.split_first().ok_or(TemplateError::Empty(side))?;
    let combined = rest
        .iter()
        .try_fold(first.clone(), |acc, part| acc.union(part))
        .map_err(|source| TemplateError::Union { side, source })?;
    if combined.kind() != GraphKind::Query {
        return Err(TemplateError::NotQuery {
            side,
            kind: combined.kind(),
        });
    }
    Ok(combined)
}

/// Pair reagent values with product values by position. An empty product list
/// never pairs. On failure returns how many reagent values there were.
fn positional(reagent: Option<&Value>, product: &[Scalar]) -> Result<Value, usize> {
    let keys = reagent.and_then(Value::as_list).ok_or(0usize)?;
    if product.is_empty() || keys.len() != product.len() {
        return Err(keys.len());
    }
    Ok(Value::Mapping(
        keys.into_iter().cloned().zip(product.iter().cloned()).collect(),
    ))
}
