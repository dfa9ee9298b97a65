use std::fmt;

use serde::{Deserialize, Serialize};

/// A single attribute literal: an integer (charge, bond order, mass number)
/// or a text token (element symbol, stereo label).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i32),
    Text(String),
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// The value stored under an atom or bond mark.
///
/// Structures hold [`Value::Literal`]s. Query graphs may hold a
/// [`Value::Set`] of acceptable literals. Prepared template patches replace
/// the sets of persistent atoms and bonds with a [`Value::Mapping`]: a
/// positional table from the value seen in the matched structure to the value
/// the patch writes back.
///
/// Serialized untagged: `6`, `"C"`, `[6, 7]` and `[[6, 7], [7, 8]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Literal(Scalar),
    Set(Vec<Scalar>),
    Mapping(Vec<(Scalar, Scalar)>),
}

impl Value {
    pub fn set<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Scalar>,
    {
        Self::Set(items.into_iter().map(Into::into).collect())
    }

    pub fn mapping<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Scalar>,
        V: Into<Scalar>,
    {
        Self::Mapping(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_literal(&self) -> Option<&Scalar> {
        match self {
            Self::Literal(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// The value viewed as an ordered list of literals. A literal is a
    /// one-element list; mappings have no list form.
    pub fn as_list(&self) -> Option<Vec<&Scalar>> {
        match self {
            Self::Literal(v) => Some(vec![v]),
            Self::Set(vs) => Some(vs.iter().collect()),
            Self::Mapping(_) => None,
        }
    }

    /// Whether this value, taken as a pattern, accepts `concrete`.
    ///
    /// A concrete set is accepted only if every member is.
    pub fn accepts(&self, concrete: &Value) -> bool {
        match concrete {
            Self::Literal(c) => self.accepts_scalar(c),
            Self::Set(cs) => cs.iter().all(|c| self.accepts_scalar(c)),
            Self::Mapping(_) => self == concrete,
        }
    }

    fn accepts_scalar(&self, concrete: &Scalar) -> bool {
        match self {
            Self::Literal(p) => p == concrete,
            Self::Set(ps) => ps.contains(concrete),
            Self::Mapping(_) => false,
        }
    }

    /// Resolve the value a patch writes, given the value currently held by
    /// the structure. Literals and sets are written as-is; a mapping is looked
    /// up by the current literal and yields `None` when it has no entry.
    pub fn resolve(&self, current: Option<&Value>) -> Option<Value> {
        match self {
            Self::Mapping(pairs) => {
                let key = current?.as_literal()?;
                pairs
                    .iter()
                    .find(|(from, _)| from == key)
                    .map(|(_, to)| Self::Literal(to.clone()))
            }
            _ => Some(self.clone()),
        }
    }
}

impl From<Scalar> for Value {
    fn from(v: Scalar) -> Self {
        Self::Literal(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Literal(v.into())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Literal(v.into())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Literal(v.into())
    }
}
