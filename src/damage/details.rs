//! Human-readable breakdown of a calculation, e.g.
//! `Base DEF: 15,000 → Leader skill: ×1.7 → Base defense: 25,500 → Enemy ATK: 50,000 → Damage received: 24,500`.

use crate::damage::model::DamageCalculationRequest;
use crate::data::character::Character;

pub const DETAIL_SEPARATOR: &str = " → ";

/// Inputs to [calculation_details] that the calculator derives along the way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailFigures {
    pub base_defense: f64,
    pub effective_defense: f64,
    pub final_damage: f64,
}

pub fn calculation_details(
    request: &DamageCalculationRequest,
    character: &Character,
    figures: DetailFigures,
) -> String {
    let mut details: Vec<String> = Vec::with_capacity(7);

    details.push(format!("Base DEF: {}", group_thousands(request.def_stat)));
    details.push(format!(
        "Leader skill: ×{}",
        format_multiplier(request.leader_skill_multiplier)
    ));
    details.push(format!("Base defense: {}", format_whole(figures.base_defense)));

    let has_defense_multiplier = character
        .defense_multiplier
        .is_some_and(|multiplier| multiplier != 0.0);
    if has_defense_multiplier || !character.passive_skills.is_empty() {
        details.push(format!(
            "After passives: {}",
            format_whole(figures.effective_defense)
        ));
    }

    if character.infinite_defense_stacking && request.attack_count() != 0 {
        details.push(format!("After {} attacks", request.attack_count()));
    }

    details.push(format!("Enemy ATK: {}", group_thousands(request.enemy_attack)));
    details.push(format!("Damage received: {}", format_whole(figures.final_damage)));

    details.join(DETAIL_SEPARATOR)
}

/// Rounds to zero decimals and inserts thousands separators: `24499.6` -> `24,500`.
pub fn format_whole(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{value:.0}");
    let (negative, digits) = match rounded.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, rounded.as_str()),
    };
    let grouped = group_digits(digits);
    if negative && grouped != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn group_thousands(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Shortest round-trip form, always with a fractional part: `1.7`, `2.0`.
pub fn format_multiplier(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

fn group_digits(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
