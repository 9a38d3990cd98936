use thiserror::Error;

use super::types::ItemKind;

/// Errors that can occur when validating checklists or answers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("VIN too long (max 17 characters, got {0})")]
    VinTooLong(usize),
    #[error("\"{value}\" is not a valid answer for a {kind:?} question")]
    InvalidAnswer { kind: ItemKind, value: String },
    #[error("Year {0} is out of range (0 to 9999)")]
    YearOutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checklist_error_display() {
        assert_eq!(
            ChecklistError::VinTooLong(18).to_string(),
            "VIN too long (max 17 characters, got 18)"
        );
        assert_eq!(
            ChecklistError::InvalidAnswer {
                kind: ItemKind::YesNo,
                value: "MAYBE".to_string(),
            }
            .to_string(),
            "\"MAYBE\" is not a valid answer for a YesNo question"
        );
        assert_eq!(
            ChecklistError::YearOutOfRange(10000).to_string(),
            "Year 10000 is out of range (0 to 9999)"
        );
    }
}
