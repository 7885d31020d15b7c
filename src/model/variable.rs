use serde::{Deserialize, Serialize};

use super::Value;

/// Index of a variable in the solver's arena.
pub type VarId = usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub domain: Vec<Value>,
    /// Absent until the search assigns it.
    pub value: Option<Value>,
}

impl Variable {
    pub fn new(name: impl Into<String>, domain: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            domain,
            value: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.value.is_some()
    }

    pub fn domain_size(&self) -> usize {
        self.domain.len()
    }
}
