//! Formatting-preserving edits of dictionary files.

use jsonc_parser::ParseOptions;
use jsonc_parser::cst::{
    CstInputValue,
    CstRootNode,
};

/// Sets string leaves in a JSON document using CST to preserve formatting.
///
/// Each update is an object path and its new value. Existing properties are
/// updated in place, missing ones (and missing parent objects) are appended.
/// Returns `None` if the text cannot be parsed.
#[must_use]
pub fn set_values_in_json_text(json_text: &str, updates: &[(Vec<String>, String)]) -> Option<String> {
    let root = CstRootNode::parse(json_text, &ParseOptions::default()).ok()?;
    let root_obj = root.object_value_or_set();

    for (path, value) in updates {
        let Some((last, parents)) = path.split_last() else {
            continue;
        };

        let mut current_obj = root_obj.clone();
        for part in parents {
            current_obj = current_obj.object_value_or_set(part);
        }

        match current_obj.get(last) {
            Some(prop) => prop.set_value(CstInputValue::String(value.clone())),
            None => {
                current_obj.append(last, CstInputValue::String(value.clone()));
            }
        }
    }

    Some(root.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;
    use serde_json::{
        Value,
        json,
    };

    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| (*p).to_string()).collect()
    }

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[rstest]
    fn updates_existing_value_in_place() {
        let json_text = "{\n  \"nav\": {\n    \"home\": \"Home\"\n  }\n}\n";

        let result =
            set_values_in_json_text(json_text, &[(path(&["nav", "home"]), "Accueil".to_string())])
                .unwrap();

        assert_that!(result, eq("{\n  \"nav\": {\n    \"home\": \"Accueil\"\n  }\n}\n"));
    }

    #[rstest]
    fn appends_missing_keys_and_parents() {
        let json_text = r#"{
  "nav": {
    "home": "Accueil"
  }
}"#;

        let result = set_values_in_json_text(
            json_text,
            &[
                (path(&["nav", "shop"]), "Boutique".to_string()),
                (path(&["checkout", "pay"]), "Payer".to_string()),
            ],
        )
        .unwrap();

        assert_that!(
            parse(&result),
            eq(&json!({
                "nav": { "home": "Accueil", "shop": "Boutique" },
                "checkout": { "pay": "Payer" }
            }))
        );
    }

    #[rstest]
    fn empty_object_document() {
        let result =
            set_values_in_json_text("{}", &[(path(&["home.hero"]), "Kunst".to_string())]).unwrap();

        assert_that!(parse(&result), eq(&json!({ "home.hero": "Kunst" })));
    }

    #[rstest]
    fn applying_twice_is_stable() {
        let updates = [(path(&["a", "b"]), "X".to_string())];

        let once = set_values_in_json_text("{\n  \"c\": \"C\"\n}", &updates).unwrap();
        let twice = set_values_in_json_text(&once, &updates).unwrap();

        assert_that!(twice, eq(&once));
    }

    #[rstest]
    fn keeps_comments() {
        let json_text = "{\n  // header\n  \"a\": \"A\"\n}";

        let result = set_values_in_json_text(json_text, &[(path(&["a"]), "B".to_string())]).unwrap();

        assert_that!(result, contains_substring("// header"));
        assert_that!(result, contains_substring("\"B\""));
    }

    #[rstest]
    fn invalid_text_returns_none() {
        assert_that!(set_values_in_json_text("{ not json", &[]), none());
    }
}
