//! Plan state with undo/redo history.
//!
//! A [`Plan`] is an immutable-by-convention snapshot of every input the engine
//! reads. [`PlanStore`] applies commands to it, pushing the previous snapshot
//! onto `past` only when the command actually changed something.

pub mod share;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::{
    sort_rounds_by_date, Company, Decimal, EmployeeGrant, EmployeeUpdate, EntityId, ExitScenario,
    Founder, FounderUpdate, FundingRound, OptionPool, RoundUpdate, ScenarioUpdate,
    StakeholderType,
};
use crate::engine::dilution::{current_ownership, round_dilutions, CapTable};
use crate::engine::valuation::fully_diluted_shares;
use crate::engine::vesting::{vest_grants, VestedGrant};
use crate::engine::warnings::{
    check_cumulative_dilution, check_excessive_dilution, check_founder_split,
    check_liquidation_preference, check_option_pool, check_vesting_schedule, Warning,
};
use crate::engine::waterfall::{waterfall, WaterfallResult};

pub use share::ShareError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub company: Company,
    #[serde(default)]
    pub founders: Vec<Founder>,
    #[serde(default)]
    pub rounds: Vec<FundingRound>,
    #[serde(default)]
    pub employees: Vec<EmployeeGrant>,
    #[serde(default)]
    pub option_pool: OptionPool,
    #[serde(default)]
    pub scenarios: Vec<ExitScenario>,
}

impl Plan {
    pub fn new(company: Company) -> Self {
        Self {
            company,
            founders: Vec::new(),
            rounds: Vec::new(),
            employees: Vec::new(),
            option_pool: OptionPool::default(),
            scenarios: Vec::new(),
        }
    }

    /// Employee grants vested as of the company's current date.
    pub fn vested_grants(&self) -> Vec<VestedGrant> {
        vest_grants(&self.employees, self.company.current_date)
    }

    pub fn cap_table(&self) -> CapTable {
        current_ownership(&self.founders, &self.rounds, &self.vested_grants())
    }

    /// Waterfall for one saved exit scenario, or `None` for an unknown id.
    pub fn waterfall_for(&self, scenario_id: &EntityId) -> Option<WaterfallResult> {
        let scenario = self.scenarios.iter().find(|s| &s.id == scenario_id)?;
        let cap_table = self.cap_table();
        Some(waterfall(
            scenario.exit_valuation,
            &cap_table.stakeholders,
            &self.rounds,
        ))
    }

    /// SHA-256 hex digest of the plan's JSON form.
    ///
    /// Equal plans always produce equal fingerprints, so this works as a
    /// memoization key for derived results.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }
}

/// Every advisory check for a plan, in a fixed order: founders, option pool,
/// founder vesting, then each round in date order.
pub fn plan_warnings(plan: &Plan) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let cap_table = plan.cap_table();

    if let Some(w) = check_founder_split(&plan.founders) {
        warnings.push(w.with_source("founders"));
    }

    let initial: Decimal = plan.founders.iter().map(|f| f.equity).sum();
    let current = cap_table.ownership_of(StakeholderType::Founder);
    if let Some(w) = check_cumulative_dilution(initial, current) {
        warnings.push(w.with_source("founders"));
    }

    let pool_pct = plan.option_pool.size_percent;
    let fully_diluted = fully_diluted_shares(cap_table.total_shares, pool_pct);
    let pool_shares = (pool_pct.safe_div(Decimal::hundred()) * Decimal::from(fully_diluted))
        .round_half_up()
        .to_i64();
    if let Some(w) = check_option_pool(&plan.option_pool, pool_shares) {
        warnings.push(w.with_source("optionPool"));
    }

    for founder in &plan.founders {
        if let Some(w) = check_vesting_schedule(founder.cliff_months, founder.vesting_months) {
            warnings.push(w.with_source(format!("founder-{}", founder.id)));
        }
    }

    let mut rounds = plan.rounds.clone();
    sort_rounds_by_date(&mut rounds);
    let dilutions = round_dilutions(&rounds);
    for (index, (round, dilution)) in rounds.iter().zip(dilutions).enumerate() {
        let source = format!("round-{index}");
        let checks = [
            check_excessive_dilution(dilution),
            check_liquidation_preference(round.liquidation_preference, round.participating),
        ];
        for w in checks.into_iter().flatten() {
            let mut w = w.with_source(source.clone());
            w.round_type = Some(round.round_type);
            warnings.push(w);
        }
    }

    warnings
}

/// Current plan plus undo/redo stacks.
#[derive(Debug, Clone)]
pub struct PlanStore {
    plan: Plan,
    initial: Plan,
    past: Vec<Plan>,
    future: Vec<Plan>,
}

impl PlanStore {
    pub fn new(plan: Plan) -> Self {
        Self {
            initial: plan.clone(),
            plan,
            past: Vec::new(),
            future: Vec::new(),
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Run `change` against a copy of the plan and commit it if it reports a
    /// change. Returns whether anything was committed.
    fn commit<F>(&mut self, command: &'static str, change: F) -> bool
    where
        F: FnOnce(&mut Plan) -> bool,
    {
        let mut next = self.plan.clone();
        if !change(&mut next) {
            debug!(command, "Command matched nothing; plan unchanged");
            return false;
        }
        let previous = std::mem::replace(&mut self.plan, next);
        self.past.push(previous);
        self.future.clear();
        debug!(command, history = self.past.len(), "Committed plan change");
        true
    }

    pub fn set_company(&mut self, company: Company) -> bool {
        self.commit("set_company", |plan| {
            plan.company = company;
            true
        })
    }

    pub fn add_founder(&mut self, founder: Founder) -> EntityId {
        let id = founder.id.clone();
        self.commit("add_founder", |plan| {
            plan.founders.push(founder);
            true
        });
        id
    }

    pub fn update_founder(&mut self, id: &EntityId, update: &FounderUpdate) -> bool {
        self.commit("update_founder", |plan| {
            match plan.founders.iter_mut().find(|f| &f.id == id) {
                Some(founder) => {
                    update.apply(founder);
                    true
                }
                None => false,
            }
        })
    }

    pub fn remove_founder(&mut self, id: &EntityId) -> bool {
        self.commit("remove_founder", |plan| {
            let before = plan.founders.len();
            plan.founders.retain(|f| &f.id != id);
            plan.founders.len() != before
        })
    }

    pub fn mark_founder_departed(&mut self, id: &EntityId, departure_date: NaiveDate) -> bool {
        self.commit("mark_founder_departed", |plan| {
            match plan.founders.iter_mut().find(|f| &f.id == id) {
                Some(founder) => {
                    founder.departed = true;
                    founder.departure_date = Some(departure_date);
                    true
                }
                None => false,
            }
        })
    }

    pub fn add_round(&mut self, round: FundingRound) -> EntityId {
        let id = round.id.clone();
        self.commit("add_round", |plan| {
            plan.rounds.push(round);
            sort_rounds_by_date(&mut plan.rounds);
            true
        });
        id
    }

    pub fn update_round(&mut self, id: &EntityId, update: &RoundUpdate) -> bool {
        self.commit("update_round", |plan| {
            match plan.rounds.iter_mut().find(|r| &r.id == id) {
                Some(round) => {
                    update.apply(round);
                    sort_rounds_by_date(&mut plan.rounds);
                    true
                }
                None => false,
            }
        })
    }

    pub fn remove_round(&mut self, id: &EntityId) -> bool {
        self.commit("remove_round", |plan| {
            let before = plan.rounds.len();
            plan.rounds.retain(|r| &r.id != id);
            plan.rounds.len() != before
        })
    }

    pub fn add_employee(&mut self, grant: EmployeeGrant) -> EntityId {
        let id = grant.id.clone();
        self.commit("add_employee", |plan| {
            plan.employees.push(grant);
            plan.option_pool.allocated = OptionPool::allocated_from(&plan.employees);
            true
        });
        id
    }

    pub fn update_employee(&mut self, id: &EntityId, update: &EmployeeUpdate) -> bool {
        self.commit("update_employee", |plan| {
            match plan.employees.iter_mut().find(|e| &e.id == id) {
                Some(grant) => {
                    update.apply(grant);
                    plan.option_pool.allocated = OptionPool::allocated_from(&plan.employees);
                    true
                }
                None => false,
            }
        })
    }

    pub fn remove_employee(&mut self, id: &EntityId) -> bool {
        self.commit("remove_employee", |plan| {
            let before = plan.employees.len();
            plan.employees.retain(|e| &e.id != id);
            if plan.employees.len() == before {
                return false;
            }
            plan.option_pool.allocated = OptionPool::allocated_from(&plan.employees);
            true
        })
    }

    /// Replace the pool's target size. Allocation stays derived from grants.
    pub fn set_option_pool(&mut self, size_percent: Decimal) -> bool {
        self.commit("set_option_pool", |plan| {
            plan.option_pool.size_percent = size_percent;
            true
        })
    }

    pub fn add_scenario(&mut self, scenario: ExitScenario) -> EntityId {
        let id = scenario.id.clone();
        self.commit("add_scenario", |plan| {
            plan.scenarios.push(scenario);
            true
        });
        id
    }

    pub fn update_scenario(&mut self, id: &EntityId, update: &ScenarioUpdate) -> bool {
        self.commit("update_scenario", |plan| {
            match plan.scenarios.iter_mut().find(|s| &s.id == id) {
                Some(scenario) => {
                    update.apply(scenario);
                    true
                }
                None => false,
            }
        })
    }

    pub fn remove_scenario(&mut self, id: &EntityId) -> bool {
        self.commit("remove_scenario", |plan| {
            let before = plan.scenarios.len();
            plan.scenarios.retain(|s| &s.id != id);
            plan.scenarios.len() != before
        })
    }

    /// Step back one change. No-op on an empty history.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.plan, previous);
        self.future.push(current);
        true
    }

    /// Re-apply the last undone change. No-op when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.plan, next);
        self.past.push(current);
        true
    }

    /// Restore the plan the store was created with and drop all history.
    pub fn reset(&mut self) {
        self.plan = self.initial.clone();
        self.past.clear();
        self.future.clear();
    }

    /// Replace the whole plan. Undoable like any other command.
    pub fn load(&mut self, plan: Plan) -> bool {
        self.commit("load", |current| {
            *current = plan;
            true
        })
    }
}
