use std::{collections::BTreeMap, fmt, rc::Rc};

use super::{Value, VarId, Variable};

/// Predicate over a (possibly partial) assignment.
///
/// Implementations must return `true` while any variable of their scope is
/// still unassigned.
pub type Predicate = Rc<dyn Fn(&Assignment<'_>) -> bool>;

#[derive(Clone)]
pub struct Constraint {
    pub name: String,
    pub scope: Vec<String>,
    pub(crate) scope_ids: Vec<VarId>,
    pub(crate) predicate: Predicate,
}

impl Constraint {
    pub fn is_satisfied(&self, assignment: &Assignment<'_>) -> bool {
        (self.predicate)(assignment)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.scope.join(", "))
    }
}

/// Read-only view of the values currently held by the solver's variables.
#[derive(Clone, Copy)]
pub struct Assignment<'a> {
    index: &'a BTreeMap<String, VarId>,
    variables: &'a [Variable],
}

impl<'a> Assignment<'a> {
    pub(crate) fn new(index: &'a BTreeMap<String, VarId>, variables: &'a [Variable]) -> Self {
        Self { index, variables }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        let id = *self.index.get(name)?;
        let variables: &'a [Variable] = self.variables;
        variables[id].value.as_ref()
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn all_assigned<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.iter().all(|name| self.is_assigned(name.as_ref()))
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.variables.iter().filter(|v| v.is_assigned()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Assignment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.variables
                    .iter()
                    .filter_map(|v| v.value.as_ref().map(|value| (&v.name, value))),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_view() {
        let mut variables = vec![
            Variable::new("a", Value::ints([1, 2])),
            Variable::new("b", vec![Value::from("x")]),
        ];
        variables[0].value = Some(Value::Int(2));
        let index: BTreeMap<String, VarId> =
            [("a".to_string(), 0), ("b".to_string(), 1)].into_iter().collect();

        let assignment = Assignment::new(&index, &variables);
        assert_eq!(assignment.get_int("a"), Some(2));
        assert!(!assignment.is_assigned("b"));
        assert!(!assignment.is_assigned("missing"));
        assert!(!assignment.all_assigned(&["a", "b"]));
        assert_eq!(assignment.len(), 1);
    }
}
