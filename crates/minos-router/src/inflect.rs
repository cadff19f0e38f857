//! English singularization for resource names.
//!
//! Rules follow the usual Rails inflection table. The last matching rule in
//! [`RULES`] wins, so more specific rules are listed after general ones.

use std::sync::OnceLock;

use regex::Regex;

const RULES: &[(&str, &str)] = &[
    (r"(?i)s$", ""),
    (r"(?i)(ss)$", "$1"),
    (r"(?i)(n)ews$", "${1}ews"),
    (r"(?i)([ti])a$", "${1}um"),
    (
        r"(?i)((a)naly|(b)a|(d)iagno|(p)arenthe|(p)rogno|(s)ynop|(t)he)(sis|ses)$",
        "${1}sis",
    ),
    (r"(?i)(^analy)(sis|ses)$", "${1}sis"),
    (r"(?i)([^f])ves$", "${1}fe"),
    (r"(?i)(hive)s$", "$1"),
    (r"(?i)(tive)s$", "$1"),
    (r"(?i)([lr])ves$", "${1}f"),
    (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
    (r"(?i)(s)eries$", "${1}eries"),
    (r"(?i)(m)ovies$", "${1}ovie"),
    (r"(?i)(x|ch|ss|sh)es$", "$1"),
    (r"(?i)^(m|l)ice$", "${1}ouse"),
    (r"(?i)(bus)(es)?$", "$1"),
    (r"(?i)(o)es$", "$1"),
    (r"(?i)(shoe)s$", "$1"),
    (r"(?i)(cris|test)(is|es)$", "${1}is"),
    (r"(?i)^(a)x[ie]s$", "${1}xis"),
    (r"(?i)(octop|vir)(us|i)$", "${1}us"),
    (r"(?i)(alias|status)(es)?$", "$1"),
    (r"(?i)^(ox)en", "$1"),
    (r"(?i)(vert|ind)ices$", "${1}ex"),
    (r"(?i)(matr)ices$", "${1}ix"),
    (r"(?i)(quiz)zes$", "$1"),
    (r"(?i)(database)s$", "$1"),
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("children", "child"),
    ("sexes", "sex"),
    ("moves", "move"),
    ("zombies", "zombie"),
];

const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

fn compiled_rules() -> &'static [(Regex, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(pattern).ok().map(|regex| (regex, *replacement))
            })
            .collect()
    })
}

/// Returns the singular form of an English noun.
///
/// # Example
///
/// ```rust
/// use minos_router::singularize;
///
/// assert_eq!(singularize("users"), "user");
/// assert_eq!(singularize("categories"), "category");
/// assert_eq!(singularize("people"), "person");
/// assert_eq!(singularize("sheep"), "sheep");
/// ```
#[must_use]
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();

    if word.is_empty() || UNCOUNTABLE.iter().any(|u| lower.ends_with(u)) {
        return word.to_string();
    }

    for (plural, singular) in IRREGULAR {
        if lower == *plural {
            return keep_initial_case(word, singular);
        }
    }

    compiled_rules()
        .iter()
        .rev()
        .find(|(regex, _)| regex.is_match(word))
        .map(|(regex, replacement)| regex.replace(word, *replacement).into_owned())
        .unwrap_or_else(|| word.to_string())
}

fn keep_initial_case(original: &str, replacement: &str) -> String {
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(repl_first)) if first.is_uppercase() => {
            repl_first.to_uppercase().chain(chars).collect()
        }
        _ => replacement.to_string(),
    }
}
