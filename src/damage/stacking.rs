//! Accumulator for the passive defense bonus, split by where each part came from.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusSource {
    /// The character's own `defense_multiplier`.
    CharacterMultiplier,
    /// `defense_boost` skills.
    DefenseBoost,
    /// `infinite_stacking` skills.
    InfiniteStacking,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DefenseBonusTotals {
    pub character_multiplier: f64,
    pub defense_boost: f64,
    pub infinite_stacking: f64,
    /// Running sum in application order.
    total: f64,
}

impl DefenseBonusTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, source: BonusSource, value: f64) {
        match source {
            BonusSource::CharacterMultiplier => self.character_multiplier += value,
            BonusSource::DefenseBoost => self.defense_boost += value,
            BonusSource::InfiniteStacking => self.infinite_stacking += value,
        }
        self.total += value;
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}
