//! Seeded random instances for benchmarks and budget tests.

use crate::model::{AssistantSpec, GroupSpec, Instance};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random instance generator.
///
/// Every group receives at least `group_max` eligible assistants and every
/// assistant at least one eligible group, so instances with small group
/// minimums are normally feasible.
///
/// # Examples
///
/// ```
/// use ta_assign::generator::InstanceGenerator;
///
/// let instance = InstanceGenerator::new(12, 4).with_seed(7).generate();
/// assert_eq!(instance.assistants.len(), 12);
/// assert_eq!(instance.groups.len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    pub assistants: usize,
    pub groups: usize,
    /// Probability that an assistant is eligible for a group.
    pub eligibility: f64,
    /// Group minimum and maximum.
    pub group_bounds: (i64, i64),
    /// Assistant load bounds; `None` keeps the defaults.
    pub load_bounds: Option<(i64, i64)>,
    /// Probability that an eligible pair carries a preference weight.
    pub preference_rate: f64,
    /// Preference weights are drawn from `-range..=range`.
    pub preference_range: i64,
    /// Chain every odd-indexed group to its predecessor.
    pub consecutive: bool,
    pub seed: u64,
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self {
            assistants: 10,
            groups: 5,
            eligibility: 0.5,
            group_bounds: (1, 2),
            load_bounds: Some((0, 3)),
            preference_rate: 0.3,
            preference_range: 3,
            consecutive: true,
            seed: 42,
        }
    }
}

impl InstanceGenerator {
    /// A generator for `assistants` x `groups` with default parameters.
    pub fn new(assistants: usize, groups: usize) -> Self {
        Self {
            assistants,
            groups,
            ..Self::default()
        }
    }

    pub fn with_eligibility(mut self, p: f64) -> Self {
        self.eligibility = p;
        self
    }

    pub fn with_group_bounds(mut self, min: i64, max: i64) -> Self {
        self.group_bounds = (min, max);
        self
    }

    pub fn with_load_bounds(mut self, bounds: Option<(i64, i64)>) -> Self {
        self.load_bounds = bounds;
        self
    }

    pub fn with_preferences(mut self, rate: f64, range: i64) -> Self {
        self.preference_rate = rate;
        self.preference_range = range;
        self
    }

    pub fn with_consecutive(mut self, on: bool) -> Self {
        self.consecutive = on;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.groups == 0 && self.assistants > 0 {
            return Err("assistants need at least one group".into());
        }
        if !(0.0..=1.0).contains(&self.eligibility) {
            return Err("eligibility must be in [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.preference_rate) {
            return Err("preference_rate must be in [0, 1]".into());
        }
        if self.preference_range < 0 {
            return Err("preference_range must be non-negative".into());
        }
        let (min, max) = self.group_bounds;
        if min < 0 || min > max {
            return Err(format!("invalid group bounds [{min}, {max}]"));
        }
        if let Some((lmin, lmax)) = self.load_bounds {
            if lmin < 0 || lmin > lmax {
                return Err(format!("invalid load bounds [{lmin}, {lmax}]"));
            }
        }
        Ok(())
    }

    /// Draws an instance. Identical parameters give identical instances.
    ///
    /// # Panics
    ///
    /// Panics if [`validate`](Self::validate) fails.
    pub fn generate(&self) -> Instance {
        if let Err(e) = self.validate() {
            panic!("invalid InstanceGenerator: {e}");
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let na = self.assistants;
        let ng = self.groups;
        let a_ids: Vec<String> = (0..na).map(|a| padded_id('A', a, na)).collect();
        let g_ids: Vec<String> = (0..ng).map(|g| padded_id('G', g, ng)).collect();

        let mut eligible = vec![vec![false; ng]; na];
        for row in &mut eligible {
            for cell in row.iter_mut() {
                *cell = rng.random_bool(self.eligibility);
            }
        }
        let (gmin, gmax) = self.group_bounds;
        let wanted = usize::try_from(gmax).unwrap_or(0).min(na);
        for g in 0..ng {
            let mut pool = eligible.iter().filter(|row| row[g]).count();
            let mut a = (g * 7) % na.max(1);
            while pool < wanted {
                if !eligible[a][g] {
                    eligible[a][g] = true;
                    pool += 1;
                }
                a = (a + 1) % na;
            }
        }
        for (a, row) in eligible.iter_mut().enumerate() {
            if !row.iter().any(|&e| e) {
                row[a % ng] = true;
            }
        }

        let mut instance = Instance::new();
        for (g, gid) in g_ids.iter().enumerate() {
            let mut spec = GroupSpec::new(gid.clone(), gmin, gmax);
            for (a, row) in eligible.iter().enumerate() {
                if row[g] && rng.random_bool(self.preference_rate) {
                    let weight = rng.random_range(-self.preference_range..=self.preference_range);
                    if weight != 0 {
                        spec = spec.with_preference(a_ids[a].clone(), weight);
                    }
                }
            }
            if self.consecutive && g % 2 == 1 {
                spec = spec.with_pred(g_ids[g - 1].clone());
            }
            instance = instance.with_group(spec);
        }
        for (a, aid) in a_ids.iter().enumerate() {
            let groups = (0..ng).filter(|&g| eligible[a][g]).map(|g| g_ids[g].clone());
            let mut spec = AssistantSpec::new(aid.clone()).with_eligible(groups);
            if let Some((lmin, lmax)) = self.load_bounds {
                spec = spec.with_load(lmin, lmax);
            }
            instance = instance.with_assistant(spec);
        }
        instance
    }
}

/// `prefix` followed by `index` zero-padded to the width of `count - 1`.
fn padded_id(prefix: char, index: usize, count: usize) -> String {
    let width = count.saturating_sub(1).to_string().len();
    format!("{prefix}{index:0width$}")
}
