//! crates/grocery_compare_core/src/normalize.rs
//!
//! Canonicalizes free-text product names and unit strings before matching.

/// Canonical brand names and the alias substrings folded into them.
/// Iterated in declaration order so overlapping aliases fold
/// deterministically.
const BRAND_ALIASES: &[(&str, &[&str])] = &[
    ("coca-cola", &["coke", "coca cola", "cocacola"]),
    ("pepsi", &["pepsi-cola", "pepsicola"]),
    ("general mills", &["gm"]),
    ("kellogg's", &["kelloggs", "kellogg"]),
    ("nabisco", &[]),
    ("kraft", &[]),
    ("nestle", &["nestlé"]),
    ("campbell's", &["campbells", "campbell"]),
    ("oscar mayer", &["oscar meyer"]),
    ("tyson", &[]),
    ("tropicana", &[]),
    ("folgers", &["folger's"]),
];

/// Words that carry no signal for matching, stripped as whole tokens.
const FILLER_WORDS: &[&str] = &["the", "a", "an", "original", "classic", "natural", "organic"];

/// Unit synonyms mapped to their short canonical form.
const UNIT_SYNONYMS: &[(&str, &str)] = &[
    ("ounce", "oz"),
    ("ounces", "oz"),
    ("pound", "lb"),
    ("pounds", "lb"),
    ("lbs", "lb"),
    ("gallon", "gal"),
    ("gallons", "gal"),
    ("liter", "l"),
    ("liters", "l"),
    ("litre", "l"),
    ("litres", "l"),
    ("count", "ct"),
    ("pack", "ct"),
    ("each", "ea"),
    ("piece", "ea"),
    ("pieces", "ea"),
];

/// Normalize a product name for matching: brand-first concatenation,
/// lowercasing, brand-alias folding, filler-word stripping, and
/// whitespace collapse.
pub fn normalize_name(name: &str, brand: Option<&str>) -> String {
    let full_name = match brand {
        Some(brand) => format!("{} {}", brand, name),
        None => name.to_string(),
    };

    let mut normalized = full_name.to_lowercase();

    for (canonical, aliases) in BRAND_ALIASES {
        for alias in *aliases {
            if normalized.contains(alias) {
                normalized = normalized.replace(alias, canonical);
            }
        }
    }

    normalized
        .split_whitespace()
        .filter(|token| !FILLER_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a unit string: lowercase, trim, and map through the synonym
/// table. Unknown units pass through lowercased and trimmed.
pub fn normalize_unit(unit: &str) -> String {
    let unit_lower = unit.trim().to_lowercase();
    for (synonym, canonical) in UNIT_SYNONYMS {
        if unit_lower == *synonym {
            return (*canonical).to_string();
        }
    }
    unit_lower
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combines_brand_and_name_lowercased() {
        assert_eq!(
            normalize_name("Frosted Flakes", Some("Kellogg's")),
            "kellogg's frosted flakes"
        );
    }

    #[test]
    fn folds_brand_aliases_to_canonical_form() {
        assert_eq!(normalize_name("Coke", None), "coca-cola");
        assert_eq!(normalize_name("Coca Cola", None), "coca-cola");
        assert_eq!(normalize_name("cocacola 12 pack", None), "coca-cola 12 pack");
        assert_eq!(normalize_name("Kelloggs Corn Flakes", None), "kellogg's corn flakes");
        assert_eq!(normalize_name("Oscar Meyer Bacon", None), "oscar mayer bacon");
    }

    #[test]
    fn strips_filler_words_as_whole_tokens() {
        assert_eq!(normalize_name("The Original Potato Chips", None), "potato chips");
        assert_eq!(normalize_name("Organic Valley Whole Milk", None), "valley whole milk");
        // "an" inside a word must survive
        assert_eq!(normalize_name("Banana Bread", None), "banana bread");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_name("  Whole   Milk  ", None), "whole milk");
    }

    #[test]
    fn empty_name_stays_empty() {
        assert_eq!(normalize_name("", None), "");
    }

    #[test]
    fn normalizes_known_units() {
        assert_eq!(normalize_unit("ounce"), "oz");
        assert_eq!(normalize_unit("Ounces"), "oz");
        assert_eq!(normalize_unit("pound"), "lb");
        assert_eq!(normalize_unit("LBS"), "lb");
        assert_eq!(normalize_unit("gallons"), "gal");
        assert_eq!(normalize_unit("litres"), "l");
        assert_eq!(normalize_unit("count"), "ct");
        assert_eq!(normalize_unit("pack"), "ct");
        assert_eq!(normalize_unit("each"), "ea");
        assert_eq!(normalize_unit("pieces"), "ea");
    }

    #[test]
    fn unknown_units_pass_through_lowercased() {
        assert_eq!(normalize_unit(" Bunch "), "bunch");
        assert_eq!(normalize_unit("oz"), "oz");
    }
}
