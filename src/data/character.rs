//! Character data: the canonical character entity and its passive skills.
//! Built by [normalize_character](crate::data::normalize::normalize_character) from raw source records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::normalize::NormalizeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum ElementType {
    Agl,
    Teq,
    Int,
    Str,
    Phy,
}

impl ElementType {
    pub const ALL: [ElementType; 5] = [Self::Agl, Self::Teq, Self::Int, Self::Str, Self::Phy];

    pub const fn code(self) -> &'static str {
        match self {
            Self::Agl => "AGL",
            Self::Teq => "TEQ",
            Self::Int => "INT",
            Self::Str => "STR",
            Self::Phy => "PHY",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Case-insensitive: `"agl"`, `"Agl"` and `"AGL"` all resolve to [ElementType::Agl].
impl FromStr for ElementType {
    type Err = NormalizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let upper = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|element| element.code() == upper)
            .ok_or_else(|| NormalizeError::InvalidElement(value.to_string()))
    }
}

impl TryFrom<String> for ElementType {
    type Error = NormalizeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Closed set of passive skill kinds. Adding a variant forces every dispatch
/// site in [damage::skills](crate::damage::skills) to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    DefenseBoost,
    DamageReduction,
    Guard,
    InfiniteStacking,
}

impl SkillType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DefenseBoost => "defense_boost",
            Self::DamageReduction => "damage_reduction",
            Self::Guard => "guard",
            Self::InfiniteStacking => "infinite_stacking",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillType {
    type Err = NormalizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "defense_boost" => Ok(Self::DefenseBoost),
            "damage_reduction" => Ok(Self::DamageReduction),
            "guard" => Ok(Self::Guard),
            "infinite_stacking" => Ok(Self::InfiniteStacking),
            other => Err(NormalizeError::UnknownSkillType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassiveSkill {
    pub id: String,
    #[serde(rename = "type")]
    pub skill_type: SkillType,
    /// Percentage for every current skill type.
    pub value: f64,
    /// Informational only; never evaluated.
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub stackable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// Star rating, 1 to 6.
    pub rarity: u8,
    #[serde(rename = "type")]
    pub element: ElementType,
    #[serde(default)]
    pub passive_skills: Vec<PassiveSkill>,
    /// Flat percentage bonus applied to base defense.
    #[serde(default)]
    pub defense_multiplier: Option<f64>,
    /// Percentage, 0 to 100.
    #[serde(default)]
    pub damage_reduction: Option<f64>,
    #[serde(default)]
    pub guard_ability: bool,
    /// Gates whether `infinite_stacking` skills contribute.
    #[serde(default)]
    pub infinite_defense_stacking: bool,
}
