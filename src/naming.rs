//! Display-name helpers for folders and request items.

/// Words whose singular and plural forms are identical.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "feedback",
    "information",
    "media",
    "metadata",
    "news",
    "series",
    "settings",
    "sheep",
    "species",
    "status",
];

/// Irregular plurals, checked before the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("geese", "goose"),
    ("indices", "index"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "person"),
    ("teeth", "tooth"),
    ("women", "woman"),
];

/// Plurals ending in `ves` whose singular ends in `f`/`fe`.
const VES_TO_F: &[(&str, &str)] = &[
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("shelves", "shelf"),
    ("wives", "wife"),
    ("wolves", "wolf"),
];

/// Upper-cases the first character, leaving the rest untouched.
pub fn ucfirst(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Edit turning a plural into its singular
#[derive(Debug, PartialEq, Eq)]
enum Singular {
    Unchanged,
    /// Whole-word replacement (irregulars, `ves` plurals)
    Word(&'static str),
    /// Drop this many trailing bytes
    Strip(usize),
    /// Drop a trailing `ies` and append `y`
    IesToY,
}

/// Best-effort singularization for common English plurals.
///
/// The suffix rules are matched case-insensitively and the edit is applied to the word as
/// written, so inner capitals survive: `"Users"` becomes `"User"`, `"orderItems"` becomes
/// `"orderItem"` and `"FAQs"` becomes `"FAQ"`. Whole-word replacements keep the case of the
/// first letter (`"People"` -> `"Person"`).
pub fn singularize(word: &str) -> String {
    // ASCII lowering keeps byte offsets aligned with `word`
    let lower = word.to_ascii_lowercase();

    match singular_edit(&lower) {
        Singular::Unchanged => word.to_string(),
        Singular::Word(singular) => {
            if word.chars().next().is_some_and(char::is_uppercase) {
                ucfirst(singular)
            } else {
                singular.to_string()
            }
        }
        Singular::Strip(n) => word[..word.len() - n].to_string(),
        Singular::IesToY => {
            let (stem, suffix) = word.split_at(word.len() - 3);
            let y = if suffix.ends_with('S') { 'Y' } else { 'y' };
            format!("{}{}", stem, y)
        }
    }
}

fn singular_edit(word: &str) -> Singular {
    if word.len() < 3 || UNCOUNTABLE.contains(&word) {
        return Singular::Unchanged;
    }

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return Singular::Word(*singular);
    }
    if let Some((_, singular)) = VES_TO_F.iter().find(|(plural, _)| *plural == word) {
        return Singular::Word(*singular);
    }

    if word.ends_with("ies") {
        return Singular::IesToY;
    }

    if ["sses", "shes", "ches", "xes", "zes"]
        .iter()
        .any(|suffix| word.ends_with(suffix))
    {
        return Singular::Strip(2);
    }

    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return Singular::Unchanged;
    }

    if word.ends_with('s') {
        Singular::Strip(1)
    } else {
        Singular::Unchanged
    }
}
