use rusqlite::types::ValueRef;

/// Render a SQLite cell the way it should appear in a CSV export. NULL → `None`.
pub fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Numeric cell as seconds; text cells are parsed, anything else is `None`.
pub fn value_to_f64(value: ValueRef<'_>) -> Option<f64> {
    match value {
        ValueRef::Integer(i) => Some(i as f64),
        ValueRef::Real(f) => Some(f),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
        ValueRef::Null | ValueRef::Blob(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_storage_class() {
        assert_eq!(value_to_text(ValueRef::Null), None);
        assert_eq!(value_to_text(ValueRef::Integer(42)).as_deref(), Some("42"));
        assert_eq!(value_to_text(ValueRef::Real(1.5)).as_deref(), Some("1.5"));
        assert_eq!(value_to_text(ValueRef::Text(b"user")).as_deref(), Some("user"));
    }

    #[test]
    fn timestamps_accept_text_and_numbers() {
        assert_eq!(value_to_f64(ValueRef::Real(1.25)), Some(1.25));
        assert_eq!(value_to_f64(ValueRef::Integer(3)), Some(3.0));
        assert_eq!(value_to_f64(ValueRef::Text(b" 7.5 ")), Some(7.5));
        assert_eq!(value_to_f64(ValueRef::Text(b"soon")), None);
        assert_eq!(value_to_f64(ValueRef::Null), None);
    }
}
