//! JSON output formatting.

/// Format a value as JSON.
pub fn format_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use carcheck_core::checklist::{ChecklistItem, ItemKind, Section};

    #[test]
    fn test_item_json_uses_stored_tags() {
        let item = ChecklistItem::new(2, Section::GasTank, "Leaks", ItemKind::YesNo)
            .with_id(40)
            .with_value("NO");

        let json: serde_json::Value = serde_json::from_str(&format_json(&item)).unwrap();

        assert_eq!(json["id"], 40);
        assert_eq!(json["section"], "GAS_TANK");
        assert_eq!(json["kind"], "YES_NO");
        assert_eq!(json["value"], "NO");
    }
}
