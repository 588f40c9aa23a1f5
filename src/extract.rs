//! Structured field extraction from cleaned label text
//!
//! Fields are filled from an ordered rule table. Rules for one field are
//! tried in order and the first match wins; fields never influence each
//! other. Supporting a new label wording means adding a row to [`RULES`].

use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// A label field the extractor knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Maximum retail price
    Mrp,
    NetQuantity,
    CountryOfOrigin,
}

/// Extracted fields; a missing key means the field was not found
pub type StructuredInfo = BTreeMap<Field, String>;

/// Turns a pattern match into the field value
type ValueFn = fn(&Captures) -> Option<String>;

struct Rule {
    field: Field,
    pattern: &'static str,
    value: ValueFn,
}

const RULES: &[Rule] = &[
    // ── Price ────────────────────────────────────────────────────────────────
    Rule {
        field: Field::Mrp,
        pattern: r"MRP[\s:]*[₹Rs\.]*\s*(\d+[\.\d]*)",
        value: group_1,
    },
    Rule {
        field: Field::Mrp,
        pattern: r"M\.R\.P[\s:]*[₹Rs\.]*\s*(\d+[\.\d]*)",
        value: group_1,
    },
    Rule {
        field: Field::Mrp,
        pattern: r"Maximum Retail Price[\s:]*[₹Rs\.]*\s*(\d+[\.\d]*)",
        value: group_1,
    },
    // ── Net quantity ─────────────────────────────────────────────────────────
    Rule {
        field: Field::NetQuantity,
        pattern: r"Net\s*(Quantity|Qty|Wt|Weight)[\s:]*(\d+[\.\d]*)\s*(kg|g|ml|l|mg)",
        value: amount_after_label,
    },
    Rule {
        field: Field::NetQuantity,
        pattern: r"(\d+[\.\d]*)\s*(kg|g|ml|l|mg)\s*Net",
        value: amount_before_label,
    },
    // ── Origin ───────────────────────────────────────────────────────────────
    Rule {
        field: Field::CountryOfOrigin,
        pattern: r"Made in\s*([A-Za-z\s]+)",
        value: group_1_trimmed,
    },
    Rule {
        field: Field::CountryOfOrigin,
        pattern: r"Country of Origin[\s:]*([A-Za-z\s]+)",
        value: group_1_trimmed,
    },
    Rule {
        field: Field::CountryOfOrigin,
        pattern: r"Manufactured in\s*([A-Za-z\s]+)",
        value: group_1_trimmed,
    },
];

fn group_1(c: &Captures) -> Option<String> {
    Some(c.get(1)?.as_str().to_string())
}

fn group_1_trimmed(c: &Captures) -> Option<String> {
    let value = c.get(1)?.as_str().trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn amount_after_label(c: &Captures) -> Option<String> {
    Some(format!("{} {}", c.get(2)?.as_str(), c.get(3)?.as_str()))
}

fn amount_before_label(c: &Captures) -> Option<String> {
    Some(format!("{} {}", c.get(1)?.as_str(), c.get(2)?.as_str()))
}

/// The rule table with every pattern compiled case-insensitively, built once
fn compiled_rules() -> &'static [(Field, Regex, ValueFn)] {
    static COMPILED: OnceLock<Vec<(Field, Regex, ValueFn)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| {
                let re = Regex::new(&format!("(?i){}", rule.pattern)).expect("invalid regex");
                (rule.field, re, rule.value)
            })
            .collect()
    })
}

/// Extract every field the rule table can find in `text`
pub fn extract(text: &str) -> StructuredInfo {
    let mut info = StructuredInfo::new();

    for (field, re, value) in compiled_rules() {
        if info.contains_key(field) {
            continue;
        }
        if let Some(found) = re.captures(text).and_then(|c| value(&c)) {
            info.insert(*field, found);
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(field: Field, value: &str) -> StructuredInfo {
        StructuredInfo::from([(field, value.to_string())])
    }

    #[test]
    fn test_mrp_with_rupee_prefix() {
        assert_eq!(extract("MRP Rs. 150"), single(Field::Mrp, "150"));
        assert_eq!(extract("MRP: ₹199.00 (approx)"), single(Field::Mrp, "199.00"));
    }

    #[test]
    fn test_mrp_label_variants() {
        assert_eq!(extract("M.R.P ₹45"), single(Field::Mrp, "45"));
        assert_eq!(
            extract("maximum retail price: 1200.50 incl. of all taxes"),
            single(Field::Mrp, "1200.50")
        );
    }

    #[test]
    fn test_net_quantity_label_first() {
        assert_eq!(extract("Net Wt 250 g"), single(Field::NetQuantity, "250 g"));
        assert_eq!(
            extract("NET QUANTITY: 1.5 kg"),
            single(Field::NetQuantity, "1.5 kg")
        );
    }

    #[test]
    fn test_net_quantity_value_first() {
        assert_eq!(extract("500 ml Net"), single(Field::NetQuantity, "500 ml"));
    }

    #[test]
    fn test_country_of_origin_variants() {
        assert_eq!(extract("Made in India"), single(Field::CountryOfOrigin, "India"));
        assert_eq!(
            extract("Country of Origin: Sri Lanka"),
            single(Field::CountryOfOrigin, "Sri Lanka")
        );
        assert_eq!(
            extract("Manufactured in Viet Nam"),
            single(Field::CountryOfOrigin, "Viet Nam")
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both origin phrasings present: the "Made in" rule comes first
        let info = extract("Country of Origin: Nepal. Made in India");
        assert_eq!(info.get(&Field::CountryOfOrigin).unwrap(), "India");
    }

    #[test]
    fn test_all_fields_together() {
        let info = extract("Tea MRP Rs. 150 Net Wt 250 g Made in India");
        assert_eq!(info.get(&Field::Mrp).unwrap(), "150");
        assert_eq!(info.get(&Field::NetQuantity).unwrap(), "250 g");
        assert_eq!(info.get(&Field::CountryOfOrigin).unwrap(), "India");
    }

    #[test]
    fn test_no_match_is_empty() {
        assert!(extract("Best before six months from packaging").is_empty());
        assert!(extract("").is_empty());
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let text = "MRP Rs. 150 Net Wt 250 g Made in India";
        let first = extract(text);
        for _ in 0..3 {
            assert_eq!(extract(text), first);
        }
    }

    #[test]
    fn test_serializes_with_snake_case_keys() {
        let json = serde_json::to_string(&extract("MRP 10 Made in India")).unwrap();
        assert_eq!(json, r#"{"mrp":"10","country_of_origin":"India"}"#);
    }
}
