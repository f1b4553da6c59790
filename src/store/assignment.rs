//! Index-based assignments and their evaluation.

use super::score::{Mode, Score};
use crate::model::Model;

/// A relation between assistants and groups, stored per group.
///
/// Each group's member list is sorted ascending and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Assignment {
    groups: Vec<Vec<usize>>,
}

impl Assignment {
    /// An assignment with `num_groups` empty groups.
    pub fn empty(num_groups: usize) -> Self {
        Self {
            groups: vec![Vec::new(); num_groups],
        }
    }

    /// Builds an assignment from `(assistant, group)` pairs.
    ///
    /// # Panics
    ///
    /// Panics if a group index is `>= num_groups`.
    pub fn from_pairs<I>(num_groups: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut assignment = Self::empty(num_groups);
        for (a, g) in pairs {
            assignment.groups[g].push(a);
        }
        for members in &mut assignment.groups {
            members.sort_unstable();
            members.dedup();
        }
        assignment
    }

    #[inline]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Assistants assigned to group `g`, ascending.
    #[inline]
    pub fn group(&self, g: usize) -> &[usize] {
        &self.groups[g]
    }

    /// Whether assistant `a` is assigned to group `g`.
    pub fn contains(&self, a: usize, g: usize) -> bool {
        self.groups[g].binary_search(&a).is_ok()
    }

    /// All `(assistant, group)` pairs, by group then assistant.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(g, members)| members.iter().map(move |&a| (a, g)))
    }

    /// Number of groups per assistant.
    pub fn loads(&self, num_assistants: usize) -> Vec<u32> {
        let mut loads = vec![0; num_assistants];
        for (a, _) in self.pairs() {
            loads[a] += 1;
        }
        loads
    }

    /// Soft objective cost, computed from scratch.
    pub fn cost(&self, model: &Model) -> i64 {
        let w = model.weights();
        let balance: i64 = self
            .loads(model.num_assistants())
            .iter()
            .map(|&l| i64::from(l) * i64::from(l))
            .sum();
        let preference: i64 = self.pairs().map(|(a, g)| model.preference(a, g)).sum();
        let consecutive = model
            .groups()
            .iter()
            .enumerate()
            .filter_map(|(g, group)| group.pred.map(|p| (g, p)))
            .map(|(g, p)| {
                self.groups[g]
                    .iter()
                    .filter(|&&a| self.contains(a, p))
                    .count() as i64
            })
            .sum::<i64>();
        w.balance * balance - w.preference * preference + w.consecutive * consecutive
    }

    /// Weighted shortfall of group minimums and assistant load minimums.
    pub fn violation(&self, model: &Model) -> i64 {
        let w = model.weights();
        let shortfall: i64 = model
            .groups()
            .iter()
            .zip(&self.groups)
            .map(|(group, members)| i64::from(group.min.saturating_sub(members.len() as u32)))
            .sum();
        let underload: i64 = model
            .assistants()
            .iter()
            .zip(self.loads(model.num_assistants()))
            .map(|(assistant, load)| i64::from(assistant.load_min.saturating_sub(load)))
            .sum();
        w.shortfall * shortfall + w.underload * underload
    }

    /// Score under the given mode.
    pub fn score(&self, model: &Model, mode: Mode) -> Score {
        match mode {
            Mode::Strict => Score::feasible(self.cost(model)),
            Mode::Relaxed => Score::new(self.violation(model), self.cost(model)),
        }
    }

    /// Whether every hard constraint holds.
    pub fn is_feasible(&self, model: &Model) -> bool {
        if self.groups.len() != model.num_groups() {
            return false;
        }
        let eligible = self.pairs().all(|(a, g)| {
            a < model.num_assistants() && model.is_eligible(a, g)
        });
        if !eligible {
            return false;
        }
        let groups_ok = model.groups().iter().zip(&self.groups).all(|(group, members)| {
            let n = members.len() as u32;
            group.min <= n && n <= group.max
        });
        let loads_ok = model
            .assistants()
            .iter()
            .zip(self.loads(model.num_assistants()))
            .all(|(assistant, load)| assistant.load_min <= load && load <= assistant.load_max);
        groups_ok && loads_ok
    }
}
