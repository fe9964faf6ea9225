pub mod calculator;
pub mod details;
pub mod model;
pub mod skills;
pub mod stacking;

pub use calculator::{
    apply_guard, base_defense, calculate, damage_reduction_rate, guard_applies,
    passive_defense_bonus, GUARD_REDUCTION_RATE, MAX_DAMAGE_REDUCTION_RATE,
};
pub use details::{calculation_details, format_whole, DETAIL_SEPARATOR};
pub use model::{
    AppliedModifiers, DamageCalculationRequest, DamageCalculationResult, ValidationIssue,
    MAX_LEADER_SKILL_MULTIPLIER, MIN_LEADER_SKILL_MULTIPLIER,
};
pub use skills::{infinite_stacking_bonus, skill_effect, SkillContext, SkillEffect};
pub use stacking::{BonusSource, DefenseBonusTotals};
