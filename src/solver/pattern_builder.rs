use std::collections::BTreeMap;

use log::trace;

use crate::{error::ConstraintError, model::Value};

use super::ConstraintSolver;

/// An integer relation over a fixed list of variables.
pub trait IntConstraint: std::fmt::Debug {
    fn name(&self) -> &'static str;
    /// Variables involved, in the order `valid` receives their values.
    fn vars(&self) -> Vec<String>;
    fn valid(&self, values: &[i64]) -> bool;
}

#[derive(Debug, Clone)]
pub struct LessThanConstraint {
    pub a: String,
    pub b: String,
}

impl IntConstraint for LessThanConstraint {
    fn name(&self) -> &'static str {
        "less_than"
    }

    fn vars(&self) -> Vec<String> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn valid(&self, values: &[i64]) -> bool {
        values[0] < values[1]
    }
}

#[derive(Debug, Clone)]
pub struct NotEqualConstraint {
    pub a: String,
    pub b: String,
}

impl IntConstraint for NotEqualConstraint {
    fn name(&self) -> &'static str {
        "not_equal"
    }

    fn vars(&self) -> Vec<String> {
        vec![self.a.clone(), self.b.clone()]
    }

    fn valid(&self, values: &[i64]) -> bool {
        values[0] != values[1]
    }
}

#[derive(Debug, Clone)]
pub struct SumConstraint {
    pub vars: Vec<String>,
    pub target: i64,
}

impl IntConstraint for SumConstraint {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn vars(&self) -> Vec<String> {
        self.vars.clone()
    }

    fn valid(&self, values: &[i64]) -> bool {
        values.iter().sum::<i64>() == self.target
    }
}

/// Integer-domain constraint patterns layered over a `ConstraintSolver`.
#[derive(Debug)]
pub struct PatternBuilder {
    solver: ConstraintSolver,
}

impl PatternBuilder {
    pub fn new(seed: u64) -> Self {
        Self::with_solver(ConstraintSolver::new(seed))
    }

    pub fn with_solver(solver: ConstraintSolver) -> Self {
        Self { solver }
    }

    pub fn add_element(
        &mut self,
        name: impl Into<String>,
        domain: impl IntoIterator<Item = i64>,
    ) -> Result<(), ConstraintError> {
        self.solver.add_variable(name, Value::ints(domain))
    }

    /// Requires each variable to be strictly less than the next one.
    pub fn add_sequence_constraint<S: AsRef<str>>(
        &mut self,
        ordered: &[S],
    ) -> Result<(), ConstraintError> {
        self.check_arguments("sequence", ordered, 2)?;
        for pair in ordered.windows(2) {
            self.add(LessThanConstraint {
                a: pair[0].as_ref().to_string(),
                b: pair[1].as_ref().to_string(),
            })?;
        }
        Ok(())
    }

    /// Requires every pair of variables to differ.
    pub fn add_uniqueness_constraint<S: AsRef<str>>(
        &mut self,
        names: &[S],
    ) -> Result<(), ConstraintError> {
        self.check_arguments("uniqueness", names, 2)?;
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                self.add(NotEqualConstraint {
                    a: a.as_ref().to_string(),
                    b: b.as_ref().to_string(),
                })?;
            }
        }
        Ok(())
    }

    pub fn add_sum_constraint<S: AsRef<str>>(
        &mut self,
        names: &[S],
        target: i64,
    ) -> Result<(), ConstraintError> {
        self.check_arguments("sum", names, 1)?;
        self.add(SumConstraint {
            vars: names.iter().map(|n| n.as_ref().to_string()).collect(),
            target,
        })
    }

    /// Registers an arbitrary integer relation. It holds vacuously until all
    /// of its variables carry integer values.
    pub fn add(&mut self, constraint: impl IntConstraint + 'static) -> Result<(), ConstraintError> {
        trace!(target: "pattern_builder", "Adding {:?}", constraint);
        let name = constraint.name();
        let vars = constraint.vars();
        let scope = vars.clone();
        self.solver.add_constraint(name, &scope, move |assignment| {
            let values: Option<Vec<i64>> = vars.iter().map(|v| assignment.get_int(v)).collect();
            match values {
                Some(values) => constraint.valid(&values),
                None => true,
            }
        })
    }

    pub fn solve(&mut self) -> Result<BTreeMap<String, i64>, ConstraintError> {
        self.solver
            .solve()?
            .into_iter()
            .map(|(name, value)| match value.as_int() {
                Some(v) => Ok((name, v)),
                None => Err(ConstraintError::NonIntegerValue(name)),
            })
            .collect()
    }

    pub fn solver(&self) -> &ConstraintSolver {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut ConstraintSolver {
        &mut self.solver
    }

    /// Validates arity and that every name is registered before anything is added.
    fn check_arguments<S: AsRef<str>>(
        &self,
        pattern: &'static str,
        names: &[S],
        required: usize,
    ) -> Result<(), ConstraintError> {
        if names.len() < required {
            return Err(ConstraintError::InsufficientArguments {
                pattern,
                required,
                given: names.len(),
            });
        }
        for name in names {
            let name = name.as_ref();
            if self.solver.variable(name).is_none() {
                return Err(ConstraintError::UnknownVariable(name.to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_context::test_context;

    use crate::tests::UsingLogger;

    use super::*;

    #[test_context(UsingLogger)]
    #[test]
    fn test_sequence_is_strictly_increasing(_: &mut UsingLogger) {
        let names = ["var1", "var2", "var3", "var4"];
        let mut builder = PatternBuilder::new(3);
        for name in names {
            builder.add_element(name, 1..=4).unwrap();
        }
        builder.add_sequence_constraint(&names).unwrap();
        assert_eq!(builder.solver().constraint_count(), 3);

        let solution = builder.solve().unwrap();
        let values: Vec<i64> = names.iter().map(|n| solution[*n]).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(values, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sequence_without_room_fails() {
        let names = ["a", "b", "c"];
        let mut builder = PatternBuilder::new(3);
        for name in names {
            builder.add_element(name, 1..=2).unwrap();
        }
        builder.add_sequence_constraint(&names).unwrap();
        assert_eq!(builder.solve(), Err(ConstraintError::NoSolution));
    }

    #[test]
    fn test_uniqueness_adds_every_pair() {
        let names = ["a", "b", "c", "d"];
        let mut builder = PatternBuilder::new(3);
        for name in names {
            builder.add_element(name, [2, 2, 3, 5, 8]).unwrap();
        }
        builder.add_uniqueness_constraint(&names).unwrap();
        assert_eq!(builder.solver().constraint_count(), 6);

        let solution = builder.solve().unwrap();
        let mut values: Vec<i64> = solution.values().copied().collect();
        values.sort();
        values.dedup();
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn test_sum_with_uniqueness() {
        let names = ["a", "b", "c"];
        let mut builder = PatternBuilder::new(3);
        for name in names {
            builder.add_element(name, 1..=9).unwrap();
        }
        builder.add_uniqueness_constraint(&names).unwrap();
        builder.add_sum_constraint(&names, 24).unwrap();

        let solution = builder.solve().unwrap();
        assert_eq!(solution.values().sum::<i64>(), 24);
        let mut values: Vec<i64> = solution.values().copied().collect();
        values.sort();
        assert_eq!(values, vec![7, 8, 9]);
    }

    #[test]
    fn test_single_variable_sum() {
        let mut builder = PatternBuilder::new(3);
        builder.add_element("only", [1, 4, 9]).unwrap();
        builder.add_sum_constraint(&["only"], 9).unwrap();
        assert_eq!(builder.solve().unwrap()["only"], 9);
    }

    #[test]
    fn test_insufficient_arguments() {
        let mut builder = PatternBuilder::new(3);
        builder.add_element("a", 1..=3).unwrap();
        assert_eq!(
            builder.add_sequence_constraint(&["a"]),
            Err(ConstraintError::InsufficientArguments {
                pattern: "sequence",
                required: 2,
                given: 1
            })
        );
        assert!(matches!(
            builder.add_uniqueness_constraint(&["a"]),
            Err(ConstraintError::InsufficientArguments { given: 1, .. })
        ));
        let empty: [&str; 0] = [];
        assert!(matches!(
            builder.add_sum_constraint(&empty, 3),
            Err(ConstraintError::InsufficientArguments { required: 1, .. })
        ));
        assert_eq!(builder.solver().constraint_count(), 0);
    }

    #[test]
    fn test_unknown_name_adds_nothing() {
        let mut builder = PatternBuilder::new(3);
        builder.add_element("a", 1..=3).unwrap();
        builder.add_element("b", 1..=3).unwrap();
        assert_eq!(
            builder.add_uniqueness_constraint(&["a", "b", "ghost"]),
            Err(ConstraintError::UnknownVariable("ghost".to_string()))
        );
        assert_eq!(builder.solver().constraint_count(), 0);
    }

    #[test]
    fn test_non_integer_value_is_reported() {
        let mut builder = PatternBuilder::new(3);
        builder.add_element("a", 1..=3).unwrap();
        builder
            .solver_mut()
            .add_variable("colour", vec![Value::from("red")])
            .unwrap();
        assert_eq!(
            builder.solve(),
            Err(ConstraintError::NonIntegerValue("colour".to_string()))
        );
    }
}
