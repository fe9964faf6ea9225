//! Per-type dispatch for passive skills. Each [SkillType] maps to exactly one
//! [SkillEffect]; the match below is exhaustive, so a new skill type does not compile
//! until it is given an effect here.

use crate::data::character::{Character, PassiveSkill, SkillType};

/// What a single passive skill does to one calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    /// Flat defense added on top of base defense.
    DefenseBoost(f64),
    /// Defense added by infinite stacking.
    StackingBoost(f64),
    /// Percentage points of damage reduction.
    DamageReduction(f64),
    /// No numeric effect in this calculation.
    Inert,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillContext {
    pub base_defense: f64,
    pub attack_count: i64,
    pub infinite_stacking_enabled: bool,
}

impl SkillContext {
    pub fn for_character(character: &Character, base_defense: f64, attack_count: i64) -> Self {
        Self {
            base_defense,
            attack_count,
            infinite_stacking_enabled: character.infinite_defense_stacking,
        }
    }
}

pub fn skill_effect(skill: &PassiveSkill, context: &SkillContext) -> SkillEffect {
    match skill.skill_type {
        SkillType::DefenseBoost => {
            SkillEffect::DefenseBoost(context.base_defense * (skill.value / 100.0))
        }
        SkillType::InfiniteStacking if context.infinite_stacking_enabled => {
            SkillEffect::StackingBoost(infinite_stacking_bonus(
                skill.value,
                context.base_defense,
                context.attack_count,
            ))
        }
        SkillType::InfiniteStacking => SkillEffect::Inert,
        SkillType::DamageReduction => SkillEffect::DamageReduction(skill.value),
        // Guard is driven by the character's guard_ability flag, not by skills.
        SkillType::Guard => SkillEffect::Inert,
    }
}

/// `value` percent of base defense per attack taken. Uncapped.
pub fn infinite_stacking_bonus(value: f64, base_defense: f64, attack_count: i64) -> f64 {
    if attack_count <= 0 {
        return 0.0;
    }
    let total_rate = value * attack_count as f64;
    base_defense * (total_rate / 100.0)
}

pub fn active_effects<'a>(
    character: &'a Character,
    context: &'a SkillContext,
) -> impl Iterator<Item = (&'a PassiveSkill, SkillEffect)> + 'a {
    character
        .passive_skills
        .iter()
        .map(move |skill| (skill, skill_effect(skill, context)))
        .filter(|(_, effect)| *effect != SkillEffect::Inert)
}
