use std::fmt;

use serde::{Serialize, Serializer};

/// Canonical beer-style labels offered as filter choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    Ipa,
    Bitter,
    GoldenAle,
    PaleAle,
    AmberAle,
    BrownAle,
    Mild,
    OldAle,
    StrongAle,
    BarleyWine,
    Stout,
    Porter,
    WheatBeer,
    Pilsner,
    Lager,
    Saison,
    Sour,
    Cider,
    Perry,
    Ale,
}

impl StyleCategory {
    pub fn label(self) -> &'static str {
        match self {
            StyleCategory::Ipa => "IPA",
            StyleCategory::Bitter => "Bitter",
            StyleCategory::GoldenAle => "Golden Ale",
            StyleCategory::PaleAle => "Pale Ale",
            StyleCategory::AmberAle => "Amber Ale",
            StyleCategory::BrownAle => "Brown Ale",
            StyleCategory::Mild => "Mild",
            StyleCategory::OldAle => "Old Ale",
            StyleCategory::StrongAle => "Strong Ale",
            StyleCategory::BarleyWine => "Barley Wine",
            StyleCategory::Stout => "Stout",
            StyleCategory::Porter => "Porter",
            StyleCategory::WheatBeer => "Wheat Beer",
            StyleCategory::Pilsner => "Pilsner",
            StyleCategory::Lager => "Lager",
            StyleCategory::Saison => "Saison",
            StyleCategory::Sour => "Sour",
            StyleCategory::Cider => "Cider",
            StyleCategory::Perry => "Perry",
            StyleCategory::Ale => "Ale",
        }
    }
}

impl fmt::Display for StyleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for StyleCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Label shown for styles no rule recognises.
pub const UNCLASSIFIED: &str = "unclassified";

pub struct StyleRule {
    pub keywords: &'static [&'static str],
    pub category: StyleCategory,
}

/// Ordered classification table, evaluated top to bottom; the first rule with
/// a keyword contained in the lower-cased style wins. Specific styles must sit
/// above the ones whose keywords they contain ("india pale ale" vs "ale").
pub const STYLE_RULES: &[StyleRule] = &[
    StyleRule { keywords: &["ipa", "india pale"], category: StyleCategory::Ipa },
    StyleRule { keywords: &["barley wine", "barleywine"], category: StyleCategory::BarleyWine },
    StyleRule { keywords: &["golden", "blonde", "summer ale"], category: StyleCategory::GoldenAle },
    StyleRule { keywords: &["pale ale", "pale"], category: StyleCategory::PaleAle },
    StyleRule { keywords: &["amber", "red ale", "ruby"], category: StyleCategory::AmberAle },
    StyleRule { keywords: &["brown"], category: StyleCategory::BrownAle },
    StyleRule { keywords: &["bitter", "esb"], category: StyleCategory::Bitter },
    StyleRule { keywords: &["mild"], category: StyleCategory::Mild },
    StyleRule { keywords: &["old ale"], category: StyleCategory::OldAle },
    StyleRule { keywords: &["strong", "scotch ale", "wee heavy"], category: StyleCategory::StrongAle },
    StyleRule { keywords: &["stout"], category: StyleCategory::Stout },
    StyleRule { keywords: &["porter"], category: StyleCategory::Porter },
    StyleRule { keywords: &["sour", "gose", "lambic", "gueuze", "kriek", "berliner"], category: StyleCategory::Sour },
    StyleRule { keywords: &["wheat", "weiss", "weizen", "witbier", "hefe"], category: StyleCategory::WheatBeer },
    StyleRule { keywords: &["pilsner", "pils"], category: StyleCategory::Pilsner },
    StyleRule { keywords: &["lager", "helles", "kolsch", "kölsch", "märzen", "marzen"], category: StyleCategory::Lager },
    StyleRule { keywords: &["saison", "farmhouse"], category: StyleCategory::Saison },
    StyleRule { keywords: &["cider"], category: StyleCategory::Cider },
    StyleRule { keywords: &["perry"], category: StyleCategory::Perry },
    StyleRule { keywords: &["ale"], category: StyleCategory::Ale },
];

/// Maps free-text style to a canonical category; `None` means unclassified.
pub fn classify(raw_style: &str) -> Option<StyleCategory> {
    classify_with(STYLE_RULES, raw_style)
}

pub fn classify_with(rules: &[StyleRule], raw_style: &str) -> Option<StyleCategory> {
    let lowered = raw_style.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| rule.category)
}

/// Label used for display and for the style filter's category check.
pub fn category_label(raw_style: &str) -> &'static str {
    classify(raw_style).map_or(UNCLASSIFIED, StyleCategory::label)
}
