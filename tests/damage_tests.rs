use dokkan_calc::damage::{
    apply_guard, base_defense, calculate, damage_reduction_rate, infinite_stacking_bonus,
    passive_defense_bonus, DamageCalculationRequest, DETAIL_SEPARATOR,
};
use dokkan_calc::data::samples::{find_sample, GOKU_UI_ID, VEGETA_EVOLUTION_ID};
use dokkan_calc::data::{Character, ElementType, PassiveSkill, SkillType};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn plain_character() -> Character {
    Character {
        id: "plain".to_string(),
        name: "Plain Fighter".to_string(),
        rarity: 5,
        element: ElementType::Teq,
        passive_skills: Vec::new(),
        defense_multiplier: None,
        damage_reduction: None,
        guard_ability: false,
        infinite_defense_stacking: false,
    }
}

fn skill(id: &str, skill_type: SkillType, value: f64) -> PassiveSkill {
    PassiveSkill {
        id: id.to_string(),
        skill_type,
        value,
        condition: None,
        stackable: skill_type == SkillType::InfiniteStacking,
    }
}

fn request(
    character_id: &str,
    def_stat: i64,
    leader: f64,
    enemy_attack: i64,
    attack_count: Option<i64>,
) -> DamageCalculationRequest {
    DamageCalculationRequest {
        def_stat,
        leader_skill_multiplier: leader,
        character_id: character_id.to_string(),
        enemy_attack,
        attack_count,
    }
}

#[test]
fn plain_character_takes_attack_minus_defense() {
    let character = plain_character();
    let result = calculate(&request("plain", 15_000, 1.7, 50_000, None), &character);

    approx_eq(result.effective_defense, 25_500.0, 1e-6);
    approx_eq(result.damage_received, 24_500.0, 1e-6);
    assert_eq!(result.applied_modifiers.leader_skill, 1.7);
    assert!(result.applied_modifiers.passive_skills.is_empty());
    assert_eq!(result.applied_modifiers.stacking_bonus, None);
    assert_eq!(
        result.calculation_details,
        "Base DEF: 15,000 → Leader skill: ×1.7 → Base defense: 25,500 → Enemy ATK: 50,000 → Damage received: 24,500"
    );
}

#[test]
fn guard_halves_the_remaining_damage() {
    let mut character = plain_character();
    character.guard_ability = true;

    let result = calculate(&request("plain", 15_000, 1.7, 50_000, None), &character);

    approx_eq(result.damage_received, 12_250.0, 1e-6);
    approx_eq(apply_guard(100.0), 50.0, 1e-12);
}

#[test]
fn infinite_stacking_grows_with_attack_count() {
    let mut character = plain_character();
    character.infinite_defense_stacking = true;
    character.passive_skills = vec![skill("stack", SkillType::InfiniteStacking, 30.0)];

    let result = calculate(&request("plain", 1_000, 1.0, 10_000, Some(3)), &character);

    approx_eq(result.effective_defense, 1_900.0, 1e-9);
    assert_eq!(result.applied_modifiers.stacking_bonus, Some(900.0));
    assert!(result.calculation_details.contains("After 3 attacks"));
    assert!(result.calculation_details.contains("After passives: 1,900"));
}

#[test]
fn stacking_bonus_reports_the_whole_passive_bonus() {
    let mut character = plain_character();
    character.infinite_defense_stacking = true;
    character.defense_multiplier = Some(130.0);
    character.passive_skills = vec![skill("stack", SkillType::InfiniteStacking, 30.0)];

    let result = calculate(&request("plain", 1_000, 1.0, 10_000, Some(3)), &character);

    let bonus = passive_defense_bonus(&character, 1_000.0, 3);
    approx_eq(bonus.character_multiplier, 1_300.0, 1e-9);
    approx_eq(bonus.infinite_stacking, 900.0, 1e-9);

    let stacking_bonus = result
        .applied_modifiers
        .stacking_bonus
        .expect("stacking characters report a bonus");
    approx_eq(stacking_bonus, 2_200.0, 1e-9);
    approx_eq(result.effective_defense, 3_200.0, 1e-9);
}

#[test]
fn stacking_skill_is_inert_without_the_character_flag() {
    let mut character = plain_character();
    character.passive_skills = vec![skill("stack", SkillType::InfiniteStacking, 30.0)];

    let result = calculate(&request("plain", 1_000, 1.0, 10_000, Some(3)), &character);

    approx_eq(result.effective_defense, 1_000.0, 1e-9);
    assert_eq!(result.applied_modifiers.stacking_bonus, None);
    assert!(!result.calculation_details.contains("attacks"));
}

#[test]
fn zero_or_missing_attack_count_adds_no_stacking() {
    assert_eq!(infinite_stacking_bonus(30.0, 1_000.0, 0), 0.0);
    assert_eq!(infinite_stacking_bonus(30.0, 1_000.0, -2), 0.0);

    let character = find_sample(VEGETA_EVOLUTION_ID).expect("vegeta sample exists");
    let result = calculate(&request(VEGETA_EVOLUTION_ID, 1_000, 1.0, 10_000, None), &character);
    assert!(!result.calculation_details.contains("attacks"));
}

#[test]
fn defense_above_attack_means_no_damage() {
    let character = plain_character();
    let result = calculate(&request("plain", 5_000, 1.0, 1_000, None), &character);

    assert_eq!(result.damage_received, 0.0);
    assert!(result.calculation_details.ends_with("Damage received: 0"));
}

#[test]
fn damage_reduction_is_capped_at_one_hundred_percent() {
    let mut character = plain_character();
    character.damage_reduction = Some(80.0);
    character.passive_skills = vec![
        skill("dr1", SkillType::DamageReduction, 30.0),
        skill("dr2", SkillType::DamageReduction, 25.0),
    ];

    assert_eq!(damage_reduction_rate(&character), 100.0);

    let result = calculate(&request("plain", 100, 1.0, 1_000_000, None), &character);
    assert_eq!(result.damage_received, 0.0);
}

#[test]
fn reduction_sources_add_up_below_the_cap() {
    let mut character = plain_character();
    character.damage_reduction = Some(20.0);
    character.passive_skills = vec![skill("dr", SkillType::DamageReduction, 30.0)];

    assert_eq!(damage_reduction_rate(&character), 50.0);

    let result = calculate(&request("plain", 0, 1.0, 10_000, None), &character);
    approx_eq(result.damage_received, 5_000.0, 1e-9);
}

#[test]
fn guard_skill_entries_do_not_trigger_guard() {
    let mut character = plain_character();
    character.passive_skills = vec![skill("guard", SkillType::Guard, 100.0)];

    let result = calculate(&request("plain", 0, 1.0, 10_000, None), &character);
    approx_eq(result.damage_received, 10_000.0, 1e-9);
}

#[test]
fn goku_sample_applies_every_modifier() {
    let character = find_sample(GOKU_UI_ID).expect("goku sample exists");
    let result = calculate(&request(GOKU_UI_ID, 15_000, 1.7, 200_000, None), &character);

    approx_eq(base_defense(15_000, 1.7), 25_500.0, 1e-6);
    approx_eq(result.effective_defense, 94_350.0, 1e-6);
    approx_eq(result.damage_received, 36_977.5, 1e-6);
    assert_eq!(result.applied_modifiers.passive_skills.len(), 1);
    assert_eq!(result.applied_modifiers.stacking_bonus, None);
    assert_eq!(
        result.calculation_details.split(DETAIL_SEPARATOR).count(),
        6,
        "goku has passives but no stacking"
    );
}

#[test]
fn calculation_is_deterministic() {
    let character = find_sample(VEGETA_EVOLUTION_ID).expect("vegeta sample exists");
    let req = request(VEGETA_EVOLUTION_ID, 12_345, 2.3, 87_654, Some(4));

    let first = calculate(&req, &character);
    let second = calculate(&req, &character);
    assert_eq!(first, second);
}

#[test]
fn results_stay_in_bounds_across_inputs() {
    let characters = [
        plain_character(),
        find_sample(GOKU_UI_ID).expect("goku sample exists"),
        find_sample(VEGETA_EVOLUTION_ID).expect("vegeta sample exists"),
    ];

    for character in &characters {
        for def_stat in [0, 1, 9_999, 250_000] {
            for leader in [1.0, 1.7, 4.0, 10.0] {
                for enemy_attack in [0, 5_000, 1_000_000] {
                    let req = request(&character.id, def_stat, leader, enemy_attack, Some(2));
                    let result = calculate(&req, character);

                    let base = base_defense(def_stat, leader);
                    assert!(result.effective_defense >= base - 1e-9);
                    assert!(result.damage_received >= 0.0);
                    assert!(result.damage_received <= enemy_attack as f64 + 1e-9);
                }
            }
        }
    }
}
