//! Built-in character data. [mock_records] is what the simulated external API serves;
//! [sample_characters] is the fallback set used whenever that API cannot be reached.

use serde_json::{json, Value};

use crate::data::character::{Character, ElementType, PassiveSkill, SkillType};

pub const GOKU_UI_ID: &str = "goku_ui";
pub const VEGETA_EVOLUTION_ID: &str = "vegeta_evolution";

/// Raw records in the external API's wire shape.
pub fn mock_records() -> Vec<Value> {
    vec![
        json!({
            "id": GOKU_UI_ID,
            "name": "Goku (Ultra Instinct)",
            "rarity": 6,
            "type": "AGL",
            "defense_multiplier": 150.0,
            "damage_reduction": 30.0,
            "guard_ability": true,
            "infinite_defense_stacking": false,
            "passive_skills": [
                {
                    "id": "ui_defense",
                    "type": "defense_boost",
                    "value": 120.0,
                    "condition": "HP 80% or above",
                    "stackable": false
                }
            ]
        }),
        json!({
            "id": VEGETA_EVOLUTION_ID,
            "name": "Vegeta (Evolution)",
            "rarity": 6,
            "type": "STR",
            "defense_multiplier": 130.0,
            "damage_reduction": 20.0,
            "guard_ability": false,
            "infinite_defense_stacking": true,
            "passive_skills": [
                {
                    "id": "evolution_stacking",
                    "type": "infinite_stacking",
                    "value": 30.0,
                    "condition": "On attack",
                    "stackable": true
                }
            ]
        }),
    ]
}

pub fn sample_characters() -> Vec<Character> {
    vec![
        Character {
            id: GOKU_UI_ID.to_string(),
            name: "Goku (Ultra Instinct)".to_string(),
            rarity: 6,
            element: ElementType::Agl,
            passive_skills: vec![PassiveSkill {
                id: "ui_defense".to_string(),
                skill_type: SkillType::DefenseBoost,
                value: 120.0,
                condition: Some("HP 80% or above".to_string()),
                stackable: false,
            }],
            defense_multiplier: Some(150.0),
            damage_reduction: Some(30.0),
            guard_ability: true,
            infinite_defense_stacking: false,
        },
        Character {
            id: VEGETA_EVOLUTION_ID.to_string(),
            name: "Vegeta (Evolution)".to_string(),
            rarity: 6,
            element: ElementType::Str,
            passive_skills: vec![PassiveSkill {
                id: "evolution_stacking".to_string(),
                skill_type: SkillType::InfiniteStacking,
                value: 30.0,
                condition: Some("On attack".to_string()),
                stackable: true,
            }],
            defense_multiplier: Some(130.0),
            damage_reduction: Some(20.0),
            guard_ability: false,
            infinite_defense_stacking: true,
        },
    ]
}

pub fn find_sample(id: &str) -> Option<Character> {
    sample_characters()
        .into_iter()
        .find(|character| character.id == id)
}
