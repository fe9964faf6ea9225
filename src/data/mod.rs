pub mod cache;
pub mod character;
pub mod normalize;
pub mod repository;
pub mod samples;
pub mod source;

pub use cache::{Clock, ManualClock, SystemClock, TtlCache};
pub use character::{Character, ElementType, PassiveSkill, SkillType};
pub use normalize::{normalize_character, normalize_skill, NormalizeError};
pub use repository::{CharacterRepository, RepositoryConfig, RepositoryError};
pub use samples::{mock_records, sample_characters};
pub use source::{fetch_with_retry, CharacterSource, MockCharacterSource, SourceError};
