//! Locale negotiation boundary
//!
//! Translation loading and page rendering live downstream; this module only
//! decides which locale a root-host request gets. Preference order: the
//! locale cookie, then Accept-Language q-values, then the default. Never
//! invoked for tenant-host traffic.

/// Locales the downstream renderer ships translations for
pub const SUPPORTED_LOCALES: &[&str] = &["en", "es"];

/// Fallback when nothing matches
pub const DEFAULT_LOCALE: &str = "en";

/// Cookie carrying an explicit locale choice
pub const LOCALE_COOKIE: &str = "locale";

/// The negotiated locale for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locale(pub &'static str);

/// Negotiate the locale for a root-host request.
pub fn negotiate(cookie: Option<&str>, accept_language: Option<&str>) -> Locale {
    if let Some(locale) = cookie.and_then(match_supported) {
        return Locale(locale);
    }

    if let Some(header) = accept_language {
        let mut candidates: Vec<(&str, f32)> = header
            .split(',')
            .filter_map(|entry| {
                let mut parts = entry.split(';');
                let tag = parts.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let quality = parts
                    .filter_map(|p| p.trim().strip_prefix("q="))
                    .find_map(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, quality))
            })
            .collect();

        // Stable sort keeps header order among equal qualities
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        for (tag, _) in candidates {
            if let Some(locale) = match_supported(tag) {
                return Locale(locale);
            }
        }
    }

    Locale(DEFAULT_LOCALE)
}

/// Match a language tag against the supported set, exact first, then by
/// primary subtag ("es-MX" -> "es").
fn match_supported(tag: &str) -> Option<&'static str> {
    let tag = tag.trim();
    let primary = tag.split('-').next().unwrap_or(tag);

    SUPPORTED_LOCALES
        .iter()
        .find(|&&supported| supported.eq_ignore_ascii_case(tag))
        .or_else(|| {
            SUPPORTED_LOCALES
                .iter()
                .find(|&&supported| supported.eq_ignore_ascii_case(primary))
        })
        .copied()
}
