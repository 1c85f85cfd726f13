/// Policy settings for the conflict checker
use super::format::{DayNames, MessageCatalog};
use serde::{Deserialize, Serialize};

/// Default travel time an instructor needs between two classes.
pub const DEFAULT_INSTRUCTOR_BUFFER_MINUTES: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Minutes appended to both end times when comparing an instructor's slots
    pub instructor_buffer_minutes: u32,
    /// Whether class creation should be refused when a check could not run
    pub block_on_check_failure: bool,
    pub day_names: DayNames,
    pub messages: MessageCatalog,
}

impl CheckerConfig {
    pub fn with_buffer(mut self, minutes: u32) -> Self {
        self.instructor_buffer_minutes = minutes;
        self
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            instructor_buffer_minutes: DEFAULT_INSTRUCTOR_BUFFER_MINUTES,
            block_on_check_failure: true,
            day_names: DayNames::default(),
            messages: MessageCatalog::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: CheckerConfig =
            serde_json::from_str(r#"{ "instructor_buffer_minutes": 15 }"#).unwrap();
        assert_eq!(config.instructor_buffer_minutes, 15);
        assert!(config.block_on_check_failure);
        assert_eq!(config.day_names, DayNames::korean());
    }
}
