//! Variable substitution engine for card templates

use serde_json::{Map, Value};

/// Substitute {{variable}} placeholders in every string value of a JSON tree.
///
/// Variables are applied one after another in map order, each as a literal
/// replace over the current text, so a value containing another placeholder
/// is only expanded if that placeholder's variable comes later. Placeholders
/// with no matching variable are left untouched. Object keys are never
/// rewritten.
pub(super) fn substitute_value(value: &Value, variables: &Map<String, Value>) -> Value {
    match value {
        Value::String(s) => Value::String(substitute_string(s, variables)),
        Value::Array(arr) => Value::Array(
            arr.iter()
                .map(|v| substitute_value(v, variables))
                .collect(),
        ),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(key, val)| (key.clone(), substitute_value(val, variables)))
                .collect(),
        ),
        // Numbers, booleans, null are passed through as-is
        _ => value.clone(),
    }
}

fn substitute_string(template: &str, variables: &Map<String, Value>) -> String {
    let mut result = template.to_string();

    for (key, value) in variables {
        let pattern = format!("{{{{{}}}}}", key);
        if !result.contains(&pattern) {
            continue;
        }
        let replacement = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            _ => value.to_string(),
        };
        result = result.replace(&pattern, &replacement);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn vars(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_substitute_simple() {
        let template = json!({"text": "Account: {{account}}"});
        let result = substitute_value(&template, &vars(&[("account", json!("ACME Corp"))]));
        assert_eq!(result["text"], "Account: ACME Corp");
    }

    #[test]
    fn test_substitute_repeated_and_multiple() {
        let template = json!({"text": "{{account}} / {{opportunity}} / {{account}}"});
        let variables = vars(&[
            ("account", json!("ACME")),
            ("opportunity", json!("Q4 Expansion")),
        ]);

        let result = substitute_value(&template, &variables);
        assert_eq!(result["text"], "ACME / Q4 Expansion / ACME");
    }

    #[test]
    fn test_substitute_nested_arrays() {
        let template = json!({
            "body": [
                {"type": "TextBlock", "text": "{{amount}}"},
                {"type": "FactSet", "facts": [{"title": "Due", "value": "{{due}}"}]}
            ]
        });
        let variables = vars(&[("amount", json!("$50,000")), ("due", json!("2025-10-01"))]);

        let result = substitute_value(&template, &variables);
        assert_eq!(result["body"][0]["text"], "$50,000");
        assert_eq!(result["body"][1]["facts"][0]["value"], "2025-10-01");
    }

    #[test]
    fn test_null_variable_becomes_empty() {
        let template = json!({"text": "Due: {{due}}"});
        let result = substitute_value(&template, &vars(&[("due", Value::Null)]));
        assert_eq!(result["text"], "Due: ");
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let template = json!({"text": "{{unknown}} and {{account}}"});
        let result = substitute_value(&template, &vars(&[("account", json!("ACME"))]));
        assert_eq!(result["text"], "{{unknown}} and ACME");
    }

    #[test]
    fn test_keys_and_non_strings_untouched() {
        let template = json!({"{{account}}": 3, "flag": true, "none": null});
        let result = substitute_value(&template, &vars(&[("account", json!("ACME"))]));
        assert_eq!(result["{{account}}"], 3);
        assert_eq!(result["flag"], true);
        assert!(result["none"].is_null());
    }

    #[test]
    fn test_variables_applied_in_insertion_order() {
        let template = json!({"text": "{{second}}|{{first}}"});

        // "first" runs before "second" introduces {{first}}, so it stays
        let forward = vars(&[("first", json!("1")), ("second", json!("{{first}}"))]);
        assert_eq!(substitute_value(&template, &forward)["text"], "{{first}}|1");

        let reverse = vars(&[("second", json!("{{first}}")), ("first", json!("1"))]);
        assert_eq!(substitute_value(&template, &reverse)["text"], "1|1");
    }
}
