//! Locale negotiation for guest-facing pages.
//!
//! Resolution order: geolocation country header, then `Accept-Language`,
//! then the site default. The result is always a member of
//! [`SUPPORTED_LOCALES`].

/// Wedding is in Korea, so unresolvable visitors read Korean.
pub const DEFAULT_LOCALE: &str = "ko";

pub const SUPPORTED_LOCALES: &[&str] = &[
    "en", "ko", "es", "pt", "ca", "sv", "da", "nb", "ar", "de", "zh", "gn",
];

/// ISO 3166-1 alpha-2 country code to site language.
const COUNTRY_LANGUAGES: &[(&str, &str)] = &[
    // English speaking countries
    ("US", "en"),
    ("GB", "en"),
    ("CA", "en"),
    ("AU", "en"),
    ("NZ", "en"),
    ("IE", "en"),
    ("IN", "en"),
    ("SG", "en"),
    ("ZA", "en"),
    // Korean
    ("KR", "ko"),
    // Spanish speaking countries
    ("ES", "es"),
    ("MX", "es"),
    ("AR", "es"),
    ("CO", "es"),
    ("CL", "es"),
    ("PE", "es"),
    ("VE", "es"),
    ("EC", "es"),
    ("GT", "es"),
    ("CU", "es"),
    ("BO", "es"),
    ("DO", "es"),
    ("HN", "es"),
    ("PY", "es"),
    ("SV", "es"),
    ("NI", "es"),
    ("CR", "es"),
    ("PA", "es"),
    ("UY", "es"),
    // Portuguese speaking countries
    ("PT", "pt"),
    ("BR", "pt"),
    ("AO", "pt"),
    ("MZ", "pt"),
    // Catalan (Andorra)
    ("AD", "ca"),
    // Scandinavia
    ("SE", "sv"),
    ("DK", "da"),
    ("NO", "nb"),
    // Arabic speaking countries
    ("SA", "ar"),
    ("EG", "ar"),
    ("AE", "ar"),
    ("IQ", "ar"),
    ("MA", "ar"),
    ("DZ", "ar"),
    ("SD", "ar"),
    ("SY", "ar"),
    ("YE", "ar"),
    ("JO", "ar"),
    ("TN", "ar"),
    ("LY", "ar"),
    ("LB", "ar"),
    ("OM", "ar"),
    ("KW", "ar"),
    ("QA", "ar"),
    ("BH", "ar"),
    // German
    ("DE", "de"),
    ("AT", "de"),
    ("CH", "de"),
    ("LI", "de"),
    // Chinese
    ("CN", "zh"),
    ("TW", "zh"),
    ("HK", "zh"),
    ("MO", "zh"),
];

/// Region-specific tags that collapse onto a supported locale even though
/// their primary subtag alone would not match.
const VARIANT_ALIASES: &[(&str, &str)] = &[
    ("no", "nb"),
    ("nn", "nb"),
    ("zh-cn", "zh"),
    ("zh-tw", "zh"),
    ("zh-hk", "zh"),
    ("pt-br", "pt"),
    ("pt-pt", "pt"),
    ("en-us", "en"),
    ("en-gb", "en"),
];

pub fn is_supported(tag: &str) -> bool {
    SUPPORTED_LOCALES.contains(&tag)
}

/// Looks up a country code, case-insensitively. Unmapped countries yield
/// `None` so the caller can fall back to `Accept-Language`.
pub fn language_for_country(code: &str) -> Option<&'static str> {
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    COUNTRY_LANGUAGES
        .iter()
        .find(|(country, _)| country.eq_ignore_ascii_case(code))
        .map(|(_, language)| *language)
}

#[derive(Debug, PartialEq)]
struct LanguagePreference {
    /// Whole tag, lowercased, e.g. `pt-br`.
    full: String,
    /// Primary subtag, e.g. `pt`.
    primary: String,
    quality: f32,
}

/// Splits an `Accept-Language` value into preferences ordered by quality,
/// highest first. Entries without a parseable `q=` weight count as 1.0.
/// The sort is stable, so equal weights keep their header order.
fn parse_accept_language(header: &str) -> Vec<LanguagePreference> {
    let mut preferences: Vec<LanguagePreference> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.trim().split(';');
            let full = parts.next()?.trim().to_ascii_lowercase();
            if full.is_empty() {
                return None;
            }
            let quality = parts
                .next()
                .and_then(|param| param.trim().strip_prefix("q="))
                .and_then(|weight| weight.parse::<f32>().ok())
                .unwrap_or(1.0);
            let primary = full.split('-').next().unwrap_or_default().to_string();
            Some(LanguagePreference { full, primary, quality })
        })
        .collect();
    preferences.sort_by(|a, b| {
        b.quality
            .partial_cmp(&a.quality)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    preferences
}

/// Picks the best supported locale from an `Accept-Language` header.
/// Known variants win over primary subtags at the same position, e.g.
/// `pt-BR` maps through the alias table rather than to bare `pt`.
pub fn language_from_header(header: &str) -> Option<&'static str> {
    for preference in parse_accept_language(header) {
        let alias = VARIANT_ALIASES
            .iter()
            .find(|(variant, _)| *variant == preference.full)
            .map(|(_, language)| *language);
        if let Some(language) = alias {
            return Some(language);
        }
        if let Some(language) = SUPPORTED_LOCALES
            .iter()
            .find(|supported| **supported == preference.primary)
            .copied()
        {
            return Some(language);
        }
    }
    None
}

/// Full resolution chain: country first, then header, then [`DEFAULT_LOCALE`].
pub fn resolve_locale(country: Option<&str>, accept_language: Option<&str>) -> &'static str {
    if let Some(language) = country.and_then(language_for_country) {
        return language;
    }
    if let Some(language) = accept_language.and_then(language_from_header) {
        return language;
    }
    DEFAULT_LOCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_lookup_is_case_insensitive() {
        assert_eq!(language_for_country("KR"), Some("ko"));
        assert_eq!(language_for_country("kr"), Some("ko"));
        assert_eq!(language_for_country(" se "), Some("sv"));
        assert_eq!(language_for_country("FR"), None);
        assert_eq!(language_for_country(""), None);
    }

    #[test]
    fn header_picks_first_supported_primary() {
        assert_eq!(language_from_header("fr-FR,en;q=0.8"), Some("en"));
        assert_eq!(language_from_header("da, en-gb;q=0.8, en;q=0.7"), Some("da"));
        assert_eq!(language_from_header("fr,it;q=0.9"), None);
    }

    #[test]
    fn header_honours_quality_ordering() {
        assert_eq!(language_from_header("en;q=0.4,sv;q=0.9"), Some("sv"));
        // Equal weights keep header order.
        assert_eq!(language_from_header("de;q=0.5,es;q=0.5"), Some("de"));
    }

    #[test]
    fn malformed_quality_counts_as_full_weight() {
        assert_eq!(language_from_header("sv;q=abc,en;q=0.9"), Some("sv"));
        assert_eq!(language_from_header("sv;q=,en;q=0.9"), Some("sv"));
    }

    #[test]
    fn variant_aliases_beat_primary_subtags() {
        assert_eq!(language_from_header("pt-BR"), Some("pt"));
        assert_eq!(language_from_header("zh-TW,en;q=0.5"), Some("zh"));
        assert_eq!(language_from_header("no"), Some("nb"));
        assert_eq!(language_from_header("nn,en;q=0.1"), Some("nb"));
    }

    #[test]
    fn resolution_prefers_country_then_header_then_default() {
        assert_eq!(resolve_locale(Some("KR"), Some("en")), "ko");
        assert_eq!(resolve_locale(Some("FR"), Some("fr-FR,en;q=0.8")), "en");
        assert_eq!(resolve_locale(None, Some("fr-FR,en;q=0.8")), "en");
        assert_eq!(resolve_locale(Some("FR"), Some("fr")), "ko");
        assert_eq!(resolve_locale(None, None), "ko");
    }

    #[test]
    fn resolution_always_lands_in_supported_set() {
        let headers = ["xx-YY,zz;q=0.3", "", "en-US,en;q=0.9", "ar"];
        for header in headers {
            assert!(is_supported(resolve_locale(None, Some(header))));
        }
        assert!(is_supported(resolve_locale(Some("ZZ"), None)));
    }
}
