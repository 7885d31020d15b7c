use std::{collections::BTreeMap, rc::Rc};

use log::{debug, trace};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::{
    error::ConstraintError,
    model::{Assignment, Constraint, Value, VarId, Variable},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolverStats {
    /// Tentative assignments made.
    pub nodes: u64,
    /// Domains exhausted without finding a consistent value.
    pub backtracks: u64,
}

/// Backtracking solver over named variables.
///
/// - `variables` is an arena in registration order; a variable's `value` slot
///   holds its current assignment during and after the search.
/// - `index` maps names to arena ids and rejects duplicates.
/// - `constraints_by_var` lists, per variable, the constraints whose scope
///   contains it, so a new assignment only re-checks what it can affect.
#[derive(Debug)]
pub struct ConstraintSolver {
    variables: Vec<Variable>,
    index: BTreeMap<String, VarId>,
    constraints: Vec<Constraint>,
    constraints_by_var: Vec<Vec<usize>>,
    rng: StdRng,
    node_limit: Option<u64>,
    stats: SolverStats,
}

impl ConstraintSolver {
    pub fn new(seed: u64) -> Self {
        Self {
            variables: Vec::new(),
            index: BTreeMap::new(),
            constraints: Vec::new(),
            constraints_by_var: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            node_limit: None,
            stats: SolverStats::default(),
        }
    }

    /// Caps the number of tentative assignments a single `solve` may make.
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn set_node_limit(&mut self, limit: Option<u64>) {
        self.node_limit = limit;
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        domain: Vec<Value>,
    ) -> Result<(), ConstraintError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(ConstraintError::DuplicateVariable(name));
        }
        trace!(
            target: "constraint_solver",
            "Adding variable {} with domain {:?}",
            name,
            domain
        );
        self.index.insert(name.clone(), self.variables.len());
        self.variables.push(Variable::new(name, domain));
        self.constraints_by_var.push(Vec::new());
        Ok(())
    }

    /// Registers a constraint over `scope`. The predicate is only evaluated
    /// once every variable of the scope is assigned.
    pub fn add_constraint<S, F>(
        &mut self,
        name: impl Into<String>,
        scope: &[S],
        predicate: F,
    ) -> Result<(), ConstraintError>
    where
        S: AsRef<str>,
        F: Fn(&Assignment<'_>) -> bool + 'static,
    {
        let mut scope_ids = Vec::with_capacity(scope.len());
        for var in scope {
            let var = var.as_ref();
            let id = *self
                .index
                .get(var)
                .ok_or_else(|| ConstraintError::UnknownVariable(var.to_string()))?;
            if !scope_ids.contains(&id) {
                scope_ids.push(id);
            }
        }

        let constraint_idx = self.constraints.len();
        for &id in &scope_ids {
            self.constraints_by_var[id].push(constraint_idx);
        }
        let constraint = Constraint {
            name: name.into(),
            scope: scope.iter().map(|s| s.as_ref().to_string()).collect(),
            scope_ids,
            predicate: Rc::new(predicate),
        };
        trace!(target: "constraint_solver", "Adding constraint {:?}", constraint);
        self.constraints.push(constraint);
        Ok(())
    }

    /// Permutes the stored domain of `name` with the solver's seeded RNG.
    /// The search itself never consumes randomness.
    pub fn shuffle_domain(&mut self, name: &str) -> Result<(), ConstraintError> {
        let id = self.var_id(name)?;
        self.variables[id].domain.shuffle(&mut self.rng);
        Ok(())
    }

    /// Clears every assignment, keeping variables and constraints.
    pub fn reset(&mut self) {
        for variable in self.variables.iter_mut() {
            variable.value = None;
        }
    }

    pub fn solve(&mut self) -> Result<BTreeMap<String, Value>, ConstraintError> {
        self.reset();
        self.stats = SolverStats::default();
        trace!(
            target: "constraint_solver",
            "Solving {} variables under {} constraints",
            self.variables.len(),
            self.constraints.len()
        );

        let result = self.backtrack(0);
        debug!(target: "constraint_solver", "Search finished: {:?}", self.stats);
        match result {
            Ok(true) => Ok(self
                .variables
                .iter()
                .filter_map(|v| v.value.clone().map(|value| (v.name.clone(), value)))
                .collect()),
            Ok(false) => Err(ConstraintError::NoSolution),
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn backtrack(&mut self, n_assigned: usize) -> Result<bool, ConstraintError> {
        if n_assigned == self.variables.len() {
            return Ok(true);
        }
        let Some(var) = self.select_unassigned_variable() else {
            return Ok(false);
        };

        let domain = self.variables[var].domain.clone();
        for value in domain {
            self.stats.nodes += 1;
            if let Some(limit) = self.node_limit {
                if self.stats.nodes > limit {
                    return Err(ConstraintError::NodeLimitExceeded(limit));
                }
            }

            trace!(
                target: "constraint_solver",
                "Trying {} = {}",
                self.variables[var].name,
                value
            );
            self.variables[var].value = Some(value);
            if self.is_consistent(var) && self.backtrack(n_assigned + 1)? {
                return Ok(true);
            }
            self.variables[var].value = None;
        }

        trace!(
            target: "constraint_solver",
            "Domain of {} exhausted, backtracking",
            self.variables[var].name
        );
        self.stats.backtracks += 1;
        Ok(false)
    }

    /// Minimum remaining values, ties broken by name.
    fn select_unassigned_variable(&self) -> Option<VarId> {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_assigned())
            .min_by(|(_, a), (_, b)| {
                a.domain_size()
                    .cmp(&b.domain_size())
                    .then_with(|| a.name.cmp(&b.name))
            })
            .map(|(id, _)| id)
    }

    /// Checks the constraints touching `var` whose scope is now fully assigned.
    fn is_consistent(&self, var: VarId) -> bool {
        let assignment = self.assignment();
        self.constraints_by_var[var]
            .iter()
            .map(|&idx| &self.constraints[idx])
            .filter(|c| c.scope_ids.iter().all(|&id| self.variables[id].is_assigned()))
            .all(|c| {
                let satisfied = c.is_satisfied(&assignment);
                if !satisfied {
                    trace!(target: "constraint_solver", "Violated {:?} by {:?}", c, assignment);
                }
                satisfied
            })
    }

    fn var_id(&self, name: &str) -> Result<VarId, ConstraintError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| ConstraintError::UnknownVariable(name.to_string()))
    }

    pub fn assignment(&self) -> Assignment<'_> {
        Assignment::new(&self.index, &self.variables)
    }

    /// Variable names in registration order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&id| &self.variables[id])
    }

    pub fn domain_size(&self, name: &str) -> Option<usize> {
        self.variable(name).map(Variable::domain_size)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Statistics of the last `solve`.
    pub fn stats(&self) -> SolverStats {
        self.stats
    }
}
