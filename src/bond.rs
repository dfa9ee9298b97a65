use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BondMark {
    SBond,
    PBond,
    SStereo,
    PStereo,
}

impl BondMark {
    pub const ALL: [BondMark; 4] = [
        BondMark::SBond,
        BondMark::PBond,
        BondMark::SStereo,
        BondMark::PStereo,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::SBond => "s_bond",
            Self::PBond => "p_bond",
            Self::SStereo => "s_stereo",
            Self::PStereo => "p_stereo",
        }
    }
}

impl fmt::Display for BondMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge payload of a [`Container`](crate::Container).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bond {
    pub marks: BTreeMap<BondMark, Value>,
}

impl Bond {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, mark: BondMark, value: impl Into<Value>) -> Self {
        self.marks.insert(mark, value.into());
        self
    }

    pub fn get(&self, mark: BondMark) -> Option<&Value> {
        self.marks.get(&mark)
    }

    pub fn set(&mut self, mark: BondMark, value: impl Into<Value>) -> Option<Value> {
        self.marks.insert(mark, value.into())
    }
}
