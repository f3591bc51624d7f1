use serde::{Deserialize, Deserializer};

/// Tells an explicit `null` apart from a missing field: missing stays `None`
/// (through `#[serde(default)]`), `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Text must keep at least one character once surrounding whitespace is removed.
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("may not be blank"));
    }

    Ok(())
}

/// [`not_blank`] for a patchable field: absent is fine, `null` is not.
pub fn not_blank_if_present(value: &Option<Option<String>>, ctx: &()) -> garde::Result {
    match value {
        None => Ok(()),
        Some(None) => Err(garde::Error::new("may not be null")),
        Some(Some(text)) => not_blank(text, ctx),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::{double_option, not_blank, not_blank_if_present};

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        group: Option<Option<i32>>,
    }

    #[test]
    fn separates_missing_from_null() {
        let missing: Patch = serde_json::from_str("{}").unwrap();
        let null: Patch = serde_json::from_str(r#"{"group": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"group": 3}"#).unwrap();

        assert_eq!(missing.group, None);
        assert_eq!(null.group, Some(None));
        assert_eq!(set.group, Some(Some(3)));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(not_blank("hello", &()).is_ok());
        assert!(not_blank("  padded  ", &()).is_ok());
        assert!(not_blank("", &()).is_err());
        assert!(not_blank(" \n\t ", &()).is_err());
    }

    #[test]
    fn patched_text_may_be_absent_but_not_null_or_blank() {
        assert!(not_blank_if_present(&None, &()).is_ok());
        assert!(not_blank_if_present(&Some(Some(String::from("edited"))), &()).is_ok());
        assert!(not_blank_if_present(&Some(None), &()).is_err());
        assert!(not_blank_if_present(&Some(Some(String::from("   "))), &()).is_err());
    }
}
