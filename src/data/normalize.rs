//! Raw source record -> [Character]. Each field is read and checked on its own so a bad
//! record reports the exact field at fault; optional fields fall back to their defaults.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::data::character::{Character, ElementType, PassiveSkill, SkillType};

pub const MIN_RARITY: i64 = 1;
pub const MAX_RARITY: i64 = 6;
pub const MAX_DAMAGE_REDUCTION: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("character name must not be empty")]
    EmptyName,

    #[error("invalid element type '{0}', expected one of AGL, TEQ, INT, STR, PHY")]
    InvalidElement(String),

    #[error("unknown passive skill type '{0}'")]
    UnknownSkillType(String),

    #[error("passive skill #{index}: {reason}")]
    Skill {
        index: usize,
        reason: Box<NormalizeError>,
    },
}

pub fn normalize_character(raw: &Value) -> Result<Character, NormalizeError> {
    let record = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

    let id = required_str(record, "id")?.to_string();
    let name = required_str(record, "name")?;
    if name.is_empty() {
        return Err(NormalizeError::EmptyName);
    }

    let rarity = required_i64(record, "rarity")?;
    if !(MIN_RARITY..=MAX_RARITY).contains(&rarity) {
        return Err(NormalizeError::OutOfRange {
            field: "rarity",
            value: rarity as f64,
        });
    }

    let element: ElementType = required_str(record, "type")?.parse()?;

    let passive_skills = match record.get("passive_skills") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                normalize_skill(item).map_err(|reason| NormalizeError::Skill {
                    index,
                    reason: Box::new(reason),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(NormalizeError::WrongType {
                field: "passive_skills",
                expected: "an array",
            })
        }
    };

    let defense_multiplier = optional_f64(record, "defense_multiplier")?;
    if let Some(value) = defense_multiplier {
        if value < 0.0 {
            return Err(NormalizeError::OutOfRange {
                field: "defense_multiplier",
                value,
            });
        }
    }

    let damage_reduction = optional_f64(record, "damage_reduction")?;
    if let Some(value) = damage_reduction {
        if !(0.0..=MAX_DAMAGE_REDUCTION).contains(&value) {
            return Err(NormalizeError::OutOfRange {
                field: "damage_reduction",
                value,
            });
        }
    }

    Ok(Character {
        id,
        name: name.to_string(),
        rarity: rarity as u8,
        element,
        passive_skills,
        defense_multiplier,
        damage_reduction,
        guard_ability: optional_bool(record, "guard_ability")?.unwrap_or(false),
        infinite_defense_stacking: optional_bool(record, "infinite_defense_stacking")?
            .unwrap_or(false),
    })
}

pub fn normalize_skill(raw: &Value) -> Result<PassiveSkill, NormalizeError> {
    let record = raw.as_object().ok_or(NormalizeError::NotAnObject)?;

    let id = required_str(record, "id")?.to_string();
    let skill_type: SkillType = required_str(record, "type")?.parse()?;
    let value = optional_f64(record, "value")?.ok_or(NormalizeError::MissingField("value"))?;
    if value < 0.0 {
        return Err(NormalizeError::OutOfRange {
            field: "value",
            value,
        });
    }

    let condition = match record.get("condition") {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text.clone()),
        Some(_) => {
            return Err(NormalizeError::WrongType {
                field: "condition",
                expected: "a string",
            })
        }
    };

    Ok(PassiveSkill {
        id,
        skill_type,
        value,
        condition,
        stackable: optional_bool(record, "stackable")?.unwrap_or(false),
    })
}

fn required_str<'a>(
    record: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a str, NormalizeError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(NormalizeError::MissingField(field)),
        Some(Value::String(text)) => Ok(text),
        Some(_) => Err(NormalizeError::WrongType {
            field,
            expected: "a string",
        }),
    }
}

fn required_i64(record: &Map<String, Value>, field: &'static str) -> Result<i64, NormalizeError> {
    match record.get(field) {
        None | Some(Value::Null) => Err(NormalizeError::MissingField(field)),
        Some(value) => value.as_i64().ok_or(NormalizeError::WrongType {
            field,
            expected: "an integer",
        }),
    }
}

fn optional_f64(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<f64>, NormalizeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(NormalizeError::WrongType {
            field,
            expected: "a number",
        }),
    }
}

fn optional_bool(
    record: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<bool>, NormalizeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(flag)) => Ok(Some(*flag)),
        Some(_) => Err(NormalizeError::WrongType {
            field,
            expected: "a boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_optional_fields_take_defaults() {
        let character = normalize_character(&json!({
            "id": "plain",
            "name": "Plain Fighter",
            "rarity": 3,
            "type": "int"
        }))
        .expect("minimal record should normalize");

        assert_eq!(character.element, ElementType::Int);
        assert!(character.passive_skills.is_empty());
        assert_eq!(character.defense_multiplier, None);
        assert_eq!(character.damage_reduction, None);
        assert!(!character.guard_ability);
        assert!(!character.infinite_defense_stacking);
    }

    #[test]
    fn skill_defaults_apply_when_fields_absent() {
        let skill = normalize_skill(&json!({
            "id": "wall",
            "type": "damage_reduction",
            "value": 25
        }))
        .expect("skill should normalize");

        assert_eq!(skill.skill_type, SkillType::DamageReduction);
        assert_eq!(skill.value, 25.0);
        assert_eq!(skill.condition, None);
        assert!(!skill.stackable);
    }

    #[test]
    fn invalid_element_type_is_rejected() {
        let err = normalize_character(&json!({
            "id": "x",
            "name": "X",
            "rarity": 5,
            "type": "WATER"
        }))
        .expect_err("unknown element should fail");

        assert_eq!(err, NormalizeError::InvalidElement("WATER".to_string()));
    }

    #[test]
    fn rarity_outside_one_to_six_is_rejected() {
        let err = normalize_character(&json!({
            "id": "x",
            "name": "X",
            "rarity": 7,
            "type": "AGL"
        }))
        .expect_err("rarity 7 should fail");

        assert!(matches!(
            err,
            NormalizeError::OutOfRange {
                field: "rarity",
                ..
            }
        ));
    }

    #[test]
    fn damage_reduction_above_hundred_is_rejected() {
        let err = normalize_character(&json!({
            "id": "x",
            "name": "X",
            "rarity": 5,
            "type": "AGL",
            "damage_reduction": 120.0
        }))
        .expect_err("reduction above 100 should fail");

        assert!(matches!(
            err,
            NormalizeError::OutOfRange {
                field: "damage_reduction",
                ..
            }
        ));
    }

    #[test]
    fn bad_skill_reports_its_index() {
        let err = normalize_character(&json!({
            "id": "x",
            "name": "X",
            "rarity": 5,
            "type": "AGL",
            "passive_skills": [
                { "id": "ok", "type": "guard", "value": 0 },
                { "id": "bad", "type": "teleport", "value": 10 }
            ]
        }))
        .expect_err("unknown skill type should fail");

        assert_eq!(
            err,
            NormalizeError::Skill {
                index: 1,
                reason: Box::new(NormalizeError::UnknownSkillType("teleport".to_string())),
            }
        );
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = normalize_character(&json!({
            "id": "x",
            "name": "",
            "rarity": 5,
            "type": "AGL"
        }))
        .expect_err("empty name should fail");

        assert_eq!(err, NormalizeError::EmptyName);
    }
}
