//! Damage received by a defending character from one enemy attack.
//!
//! ```text
//! base      = DEF × leader multiplier
//! effective = base + Σ passive bonuses (character multiplier, defense boosts, stacking)
//! reduction = min(100, character reduction + Σ damage_reduction skills)   [percent]
//! raw       = max(0, enemy ATK − effective)
//! final     = raw × (1 − reduction / 100) × (guard ? 0.5 : 1)
//! ```
//!
//! Pure and infallible for validated requests: same inputs, bit-identical output.

use crate::damage::details::{calculation_details, DetailFigures};
use crate::damage::model::{AppliedModifiers, DamageCalculationRequest, DamageCalculationResult};
use crate::damage::skills::{active_effects, SkillContext, SkillEffect};
use crate::damage::stacking::{BonusSource, DefenseBonusTotals};
use crate::data::character::Character;

pub const MAX_DAMAGE_REDUCTION_RATE: f64 = 100.0;
/// Fraction of the remaining damage removed by guard.
pub const GUARD_REDUCTION_RATE: f64 = 0.5;

pub fn calculate(
    request: &DamageCalculationRequest,
    character: &Character,
) -> DamageCalculationResult {
    tracing::info!(
        character = %character.name,
        def_stat = request.def_stat,
        "damage calculation started"
    );

    let base_defense = base_defense(request.def_stat, request.leader_skill_multiplier);
    let bonus = passive_defense_bonus(character, base_defense, request.attack_count());
    let passive_bonus = bonus.total();
    let effective_defense = base_defense + passive_bonus;

    let reduction_rate = damage_reduction_rate(character);

    let raw_damage = (request.enemy_attack as f64 - effective_defense).max(0.0);
    let mut final_damage = raw_damage * (1.0 - reduction_rate / 100.0);
    if guard_applies(character) {
        final_damage = apply_guard(final_damage);
    }

    let applied_modifiers = AppliedModifiers {
        leader_skill: request.leader_skill_multiplier,
        passive_skills: character.passive_skills.clone(),
        stacking_bonus: character.infinite_defense_stacking.then_some(passive_bonus),
    };

    let calculation_details = calculation_details(
        request,
        character,
        DetailFigures {
            base_defense,
            effective_defense,
            final_damage,
        },
    );

    tracing::info!(
        effective_defense,
        damage = final_damage,
        stacking = bonus.infinite_stacking,
        "damage calculation finished"
    );

    DamageCalculationResult {
        effective_defense,
        damage_received: final_damage.max(0.0),
        applied_modifiers,
        calculation_details,
    }
}

pub fn base_defense(def_stat: i64, leader_skill_multiplier: f64) -> f64 {
    def_stat as f64 * leader_skill_multiplier
}

/// Sum of every defense bonus, in order: the character multiplier first, then each
/// passive skill as listed.
pub fn passive_defense_bonus(
    character: &Character,
    base_defense: f64,
    attack_count: i64,
) -> DefenseBonusTotals {
    let mut totals = DefenseBonusTotals::new();

    if let Some(multiplier) = character.defense_multiplier {
        totals.apply(
            BonusSource::CharacterMultiplier,
            base_defense * (multiplier / 100.0),
        );
    }

    let context = SkillContext::for_character(character, base_defense, attack_count);
    for (_, effect) in active_effects(character, &context) {
        match effect {
            SkillEffect::DefenseBoost(value) => totals.apply(BonusSource::DefenseBoost, value),
            SkillEffect::StackingBoost(value) => totals.apply(BonusSource::InfiniteStacking, value),
            SkillEffect::DamageReduction(_) | SkillEffect::Inert => {}
        }
    }

    totals
}

/// Percentage; clamped at 100 however many reduction sources stack up.
pub fn damage_reduction_rate(character: &Character) -> f64 {
    let context = SkillContext::for_character(character, 0.0, 0);
    let rate = active_effects(character, &context).fold(
        character.damage_reduction.unwrap_or(0.0),
        |rate, (_, effect)| match effect {
            SkillEffect::DamageReduction(value) => rate + value,
            _ => rate,
        },
    );
    rate.min(MAX_DAMAGE_REDUCTION_RATE)
}

/// Guard has no attack-type or element gating: the capability flag alone decides.
pub fn guard_applies(character: &Character) -> bool {
    character.guard_ability
}

pub fn apply_guard(damage: f64) -> f64 {
    damage * (1.0 - GUARD_REDUCTION_RATE)
}
