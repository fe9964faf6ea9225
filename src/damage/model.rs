use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::data::character::PassiveSkill;

pub const MIN_LEADER_SKILL_MULTIPLIER: f64 = 1.0;
pub const MAX_LEADER_SKILL_MULTIPLIER: f64 = 10.0;

const FIELD_REQUIRED: &str = "Field required";
const EXPECTED_INTEGER: &str = "Input should be a valid integer";
const EXPECTED_NUMBER: &str = "Input should be a valid number";
const EXPECTED_STRING: &str = "Input should be a valid string";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageCalculationRequest {
    pub def_stat: i64,
    pub leader_skill_multiplier: f64,
    pub character_id: String,
    pub enemy_attack: i64,
    /// Only read by infinite-stacking skills. Absent or null means 0.
    pub attack_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

impl ValidationIssue {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            messages: vec![message.into()],
        }
    }
}

impl DamageCalculationRequest {
    /// Read a request body field by field, reporting every missing or mistyped field.
    /// Integers also accept integral floats (`15000.0`) and numeric strings; numbers
    /// accept numeric strings. Range checks are left to [validate](Self::validate).
    pub fn from_json(raw: &Value) -> Result<Self, Vec<ValidationIssue>> {
        let Some(record) = raw.as_object() else {
            return Err(vec![ValidationIssue::new(
                "body",
                "Input should be a valid dictionary",
            )]);
        };

        let mut issues = Vec::new();
        let def_stat = required(record, "def_stat", lax_i64, EXPECTED_INTEGER, &mut issues);
        let leader_skill_multiplier = required(
            record,
            "leader_skill_multiplier",
            lax_f64,
            EXPECTED_NUMBER,
            &mut issues,
        );
        let character_id = required(
            record,
            "character_id",
            strict_string,
            EXPECTED_STRING,
            &mut issues,
        );
        let enemy_attack = required(record, "enemy_attack", lax_i64, EXPECTED_INTEGER, &mut issues);
        let attack_count = optional(record, "attack_count", lax_i64, EXPECTED_INTEGER, &mut issues);

        match (def_stat, leader_skill_multiplier, character_id, enemy_attack) {
            (Some(def_stat), Some(leader_skill_multiplier), Some(character_id), Some(enemy_attack))
                if issues.is_empty() =>
            {
                Ok(Self {
                    def_stat,
                    leader_skill_multiplier,
                    character_id,
                    enemy_attack,
                    attack_count,
                })
            }
            _ => Err(issues),
        }
    }

    pub fn attack_count(&self) -> i64 {
        self.attack_count.unwrap_or(0)
    }

    /// Field-level range checks. The calculator assumes these have passed.
    pub fn validate(&self) -> Result<(), Vec<ValidationIssue>> {
        let mut errors: Vec<ValidationIssue> = Vec::new();

        if self.def_stat < 0 {
            errors.push(ValidationIssue::new("def_stat", "must be greater than or equal to 0"));
        }

        if !(MIN_LEADER_SKILL_MULTIPLIER..=MAX_LEADER_SKILL_MULTIPLIER)
            .contains(&self.leader_skill_multiplier)
        {
            errors.push(ValidationIssue::new(
                "leader_skill_multiplier",
                format!(
                    "must be between {MIN_LEADER_SKILL_MULTIPLIER:.1} and {MAX_LEADER_SKILL_MULTIPLIER:.1}"
                ),
            ));
        }

        if self.enemy_attack < 0 {
            errors.push(ValidationIssue::new("enemy_attack", "must be greater than or equal to 0"));
        }

        if self.attack_count() < 0 {
            errors.push(ValidationIssue::new("attack_count", "must be greater than or equal to 0"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedModifiers {
    pub leader_skill: f64,
    pub passive_skills: Vec<PassiveSkill>,
    /// Set only for characters with infinite defense stacking. Carries the whole
    /// passive defense bonus, not just the stacking share.
    pub stacking_bonus: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageCalculationResult {
    pub effective_defense: f64,
    pub damage_received: f64,
    pub applied_modifiers: AppliedModifiers,
    pub calculation_details: String,
}

impl DamageCalculationResult {
    /// False when an unbounded bonus has overflowed; JSON cannot carry such values.
    pub fn is_finite(&self) -> bool {
        self.effective_defense.is_finite()
            && self.damage_received.is_finite()
            && self
                .applied_modifiers
                .stacking_bonus
                .map_or(true, f64::is_finite)
    }
}

fn required<T>(
    record: &Map<String, Value>,
    field: &'static str,
    read: fn(&Value) -> Option<T>,
    expected: &'static str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    match record.get(field) {
        None => {
            issues.push(ValidationIssue::new(field, FIELD_REQUIRED));
            None
        }
        Some(value) => read_field(field, value, read, expected, issues),
    }
}

fn optional<T>(
    record: &Map<String, Value>,
    field: &'static str,
    read: fn(&Value) -> Option<T>,
    expected: &'static str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    match record.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => read_field(field, value, read, expected, issues),
    }
}

fn read_field<T>(
    field: &'static str,
    value: &Value,
    read: fn(&Value) -> Option<T>,
    expected: &'static str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<T> {
    let parsed = read(value);
    if parsed.is_none() {
        issues.push(ValidationIssue::new(field, expected));
    }
    parsed
}

fn lax_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|float| float.fract() == 0.0)
                .filter(|float| (i64::MIN as f64..i64::MAX as f64).contains(float))
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn lax_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn strict_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
