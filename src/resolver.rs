//! Multi-strategy address resolution.
//!
//! Free text goes through an ordered chain of geocoding strategies, each
//! scored for relevance against the original input. The chain never
//! hard-fails: when every live attempt is exhausted, a synthetic result is
//! built from the city-centroid table at a fixed low confidence.

use crate::cities;
use crate::config::PlannerConfig;
use crate::constants::{RELEVANCE_ACCEPT_THRESHOLD, SYNTHETIC_CONFIDENCE};
use crate::constants::{
    SCORE_COMPLETENESS_BONUS, SCORE_COUNTRY_PARTIAL, SCORE_LOCALITY_EXACT,
    SCORE_LOCALITY_MISS_PENALTY, SCORE_LOCALITY_PARTIAL, SCORE_NAME_EXACT, SCORE_NAME_PARTIAL,
    SCORE_STREET_EXACT, SCORE_STREET_PARTIAL,
};
use crate::error::{PlanError, Result};
use crate::models::{Coordinates, ResolvedAddress};
use crate::services::geocoding::{Geocoder, Placemark, ReverseGeocoder};
use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// Device location collaborator. `current_fix` may take arbitrarily long;
/// the resolver bounds the wait.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_fix(&self) -> Result<Coordinates>;
}

pub struct AddressResolver {
    geocoder: Arc<dyn Geocoder>,
    reverse: Arc<dyn ReverseGeocoder>,
    config: PlannerConfig,
}

impl AddressResolver {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        reverse: Arc<dyn ReverseGeocoder>,
        config: PlannerConfig,
    ) -> Self {
        AddressResolver {
            geocoder,
            reverse,
            config,
        }
    }

    /// Resolve free-text input to a coordinate with a confidence score.
    ///
    /// Empty input is rejected; callers with no text must supply a device
    /// coordinate via [`resolve_device_fix`](Self::resolve_device_fix)
    /// instead. A literal "lat,lng" pair short-circuits to the coordinate
    /// plus a best-effort reverse lookup for the display name.
    pub async fn resolve(&self, text: &str) -> Result<ResolvedAddress> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PlanError::InvalidRequest(
                "Empty address text; supply a device coordinate instead".to_string(),
            ));
        }

        if let Ok(point) = text.parse::<Coordinates>() {
            let display_name = self.reverse_display_name(&point).await;
            return Ok(ResolvedAddress::new(
                text.to_string(),
                point,
                display_name.unwrap_or_else(|| text.to_string()),
                1.0,
                false,
            ));
        }

        let queries = build_queries(text);
        let last_attempt = queries.len() - 1;

        for (attempt, query) in queries.iter().enumerate() {
            let Some(placemarks) = self.geocode_with_retry(query).await else {
                continue;
            };

            let best = placemarks
                .iter()
                .map(|pm| (relevance_score(text, pm), pm))
                .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let Some((score, placemark)) = best else {
                tracing::debug!(attempt = attempt + 1, query = %query, "No placemark returned");
                continue;
            };

            // The final live attempt accepts any placemark, even below the
            // relevance threshold, so the chain cannot loop forever. Flagged
            // as deliberate leniency; see the crate docs before changing.
            if score >= RELEVANCE_ACCEPT_THRESHOLD || attempt == last_attempt {
                if score < RELEVANCE_ACCEPT_THRESHOLD {
                    tracing::warn!(
                        score = %format!("{:.2}", score),
                        query = %query,
                        "Accepting low-confidence geocoding result on final live attempt"
                    );
                }
                tracing::debug!(
                    attempt = attempt + 1,
                    score = %format!("{:.2}", score),
                    "Address resolved"
                );
                return Ok(ResolvedAddress::new(
                    text.to_string(),
                    placemark.coordinates,
                    display_name_for(placemark, text),
                    score,
                    false,
                ));
            }

            tracing::debug!(
                attempt = attempt + 1,
                score = %format!("{:.2}", score),
                "Result below relevance threshold, trying next strategy"
            );
        }

        Ok(self.synthetic_fallback(text))
    }

    /// Resolve several addresses, strictly in input order.
    ///
    /// Sequential on purpose: downstream route construction relies on the
    /// output order matching the input, and sequential calls avoid burst
    /// rate-limiting on the geocoding collaborator. For multi-address trips,
    /// fewer than two reliable resolutions is fatal.
    pub async fn resolve_many(&self, texts: &[String]) -> Result<Vec<ResolvedAddress>> {
        let mut resolved = Vec::with_capacity(texts.len());
        for text in texts {
            resolved.push(self.resolve(text).await?);
        }

        if texts.len() >= 2 {
            let reliable = resolved.iter().filter(|a| a.is_reliable()).count();
            if reliable < 2 {
                tracing::warn!(
                    reliable = reliable,
                    requested = texts.len(),
                    "Too few reliable addresses for a multi-address trip"
                );
                return Err(PlanError::InsufficientAddresses {
                    resolved: reliable,
                    requested: texts.len(),
                });
            }
        }

        Ok(resolved)
    }

    /// Resolve from a live device location fix, bounded by the configured
    /// timeout. Not retried automatically on timeout.
    pub async fn resolve_device_fix(&self, source: &dyn LocationSource) -> Result<ResolvedAddress> {
        let bound_secs = self.config.location_fix_timeout_secs;
        let point = tokio::time::timeout(Duration::from_secs(bound_secs), source.current_fix())
            .await
            .map_err(|_| PlanError::LocationTimeout(bound_secs))??;

        let display_name = self.reverse_display_name(&point).await;
        Ok(ResolvedAddress::new(
            point.to_string(),
            point,
            display_name.unwrap_or_else(|| point.to_string()),
            1.0,
            false,
        ))
    }

    /// One geocoding attempt with a single retry after a transient failure.
    /// `None` means both calls failed; the caller moves to the next strategy.
    async fn geocode_with_retry(&self, query: &str) -> Option<Vec<Placemark>> {
        match self.geocoder.geocode(query).await {
            Ok(placemarks) => Some(placemarks),
            Err(e) => {
                tracing::warn!(error = %e, query = %query, "Geocoding attempt failed, retrying once");
                tokio::time::sleep(Duration::from_millis(self.config.geocode_retry_delay_ms)).await;
                match self.geocoder.geocode(query).await {
                    Ok(placemarks) => Some(placemarks),
                    Err(e) => {
                        tracing::warn!(error = %e, query = %query, "Retry failed, moving to next strategy");
                        None
                    }
                }
            }
        }
    }

    /// Best-effort reverse lookup; failures are logged and ignored.
    async fn reverse_display_name(&self, point: &Coordinates) -> Option<String> {
        match self.reverse.reverse_geocode(point).await {
            Ok(pm) => pm.name.or(pm.locality),
            Err(e) => {
                tracing::debug!(error = %e, "Reverse lookup failed, keeping raw input");
                None
            }
        }
    }

    fn synthetic_fallback(&self, text: &str) -> ResolvedAddress {
        let (city, point) = cities::centroid_for_fallback(text, &self.config.default_city);
        let display_name = text
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(text)
            .to_string();

        tracing::warn!(
            city = %city,
            query = %text,
            "All geocoding attempts exhausted, synthesising city-centroid result"
        );

        ResolvedAddress::new(
            text.to_string(),
            point,
            display_name,
            SYNTHETIC_CONFIDENCE,
            true,
        )
    }
}

/// Build the ordered list of live geocoding queries for an input text.
/// Transformations that change nothing are skipped, so the list length
/// varies between one and four.
fn build_queries(text: &str) -> Vec<String> {
    let mut queries = vec![text.to_string()];

    let stripped = strip_postal_codes(text);
    if !stripped.is_empty() && !queries.contains(&stripped) {
        queries.push(stripped);
    }

    // "POI name, street, city" inputs often geocode better without the
    // leading POI segment.
    if let Some((_, remainder)) = text.split_once(',') {
        let remainder = remainder.trim().to_string();
        if !remainder.is_empty() && !queries.contains(&remainder) {
            queries.push(remainder);
        }
    }

    if let Some((city, _)) = cities::find_city(text) {
        let city = city.to_string();
        if !queries.contains(&city) {
            queries.push(city);
        }
    }

    queries
}

/// Remove 4-5 digit runs (postal-code-like tokens) and collapse whitespace.
fn strip_postal_codes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut digits = String::new();

    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            if !(4..=5).contains(&digits.len()) {
                out.push_str(&digits);
            }
            digits.clear();
            out.push(c);
        }
    }
    if !(4..=5).contains(&digits.len()) {
        out.push_str(&digits);
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn query_words(text: &str) -> Vec<String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

fn shares_word(words: &[String], field: &str) -> bool {
    let field = field.to_lowercase();
    words.iter().any(|w| field.contains(w.as_str()))
}

/// Heuristic relevance of a placemark for the original query, in `[0, 1]`.
/// Weighted contributions are summed and clamped; this is a ranking signal,
/// not a probability.
pub fn relevance_score(query: &str, placemark: &Placemark) -> f64 {
    let q = query.trim().to_lowercase();
    let words = query_words(&q);
    let mut score = 0.0;

    let name = placemark.name.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let street = placemark
        .street
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let locality = placemark
        .locality
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if let Some(name) = name {
        let n = name.to_lowercase();
        if n == q {
            score += SCORE_NAME_EXACT;
        } else if q.contains(&n) || n.contains(&q) {
            score += SCORE_NAME_PARTIAL;
        }
    }

    if let Some(street) = street {
        let s = street.to_lowercase();
        if q.contains(&s) {
            score += SCORE_STREET_EXACT;
        } else if shares_word(&words, &s) {
            score += SCORE_STREET_PARTIAL;
        }
    }

    if let Some(locality) = locality {
        let l = locality.to_lowercase();
        if q.contains(&l) {
            score += SCORE_LOCALITY_EXACT;
        } else if shares_word(&words, &l) {
            score += SCORE_LOCALITY_PARTIAL;
        } else {
            score -= SCORE_LOCALITY_MISS_PENALTY;
        }
    }

    if let Some(country) = placemark.country.as_deref() {
        if !country.is_empty() && q.contains(&country.to_lowercase()) {
            score += SCORE_COUNTRY_PARTIAL;
        }
    }

    if name.is_some() && street.is_some() && locality.is_some() {
        score += SCORE_COMPLETENESS_BONUS;
    }

    score.clamp(0.0, 1.0)
}

fn display_name_for(placemark: &Placemark, fallback: &str) -> String {
    placemark
        .name
        .clone()
        .or_else(|| placemark.locality.clone())
        .unwrap_or_else(|| fallback.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placemark(
        name: Option<&str>,
        street: Option<&str>,
        locality: Option<&str>,
        country: Option<&str>,
    ) -> Placemark {
        Placemark {
            coordinates: Coordinates::new(51.5033, -0.1276).unwrap(),
            name: name.map(String::from),
            street: street.map(String::from),
            locality: locality.map(String::from),
            country: country.map(String::from),
        }
    }

    #[test]
    fn test_strip_postal_codes() {
        assert_eq!(strip_postal_codes("12 Rue Oberkampf, 75011 Paris"), "12 Rue Oberkampf, Paris");
        assert_eq!(strip_postal_codes("10 Downing Street"), "10 Downing Street");
        assert_eq!(strip_postal_codes("90210 Beverly Hills"), "Beverly Hills");
        // 6-digit runs are not postal-code-like here
        assert_eq!(strip_postal_codes("123456 Somewhere"), "123456 Somewhere");
    }

    #[test]
    fn test_build_queries_strategies() {
        let queries = build_queries("Cafe du Port, 33000 Bordeaux");
        assert_eq!(queries[0], "Cafe du Port, 33000 Bordeaux");
        assert_eq!(queries[1], "Cafe du Port, Bordeaux");
        assert_eq!(queries[2], "33000 Bordeaux");
        assert_eq!(queries[3], "Bordeaux");
    }

    #[test]
    fn test_build_queries_skips_noop_transforms() {
        let queries = build_queries("somewhere unusual");
        assert_eq!(queries, vec!["somewhere unusual".to_string()]);
    }

    #[test]
    fn test_relevance_downing_street() {
        let pm = placemark(
            Some("10 Downing Street"),
            None,
            Some("London"),
            Some("United Kingdom"),
        );
        let score = relevance_score("10 Downing Street, London", &pm);
        assert!(score >= RELEVANCE_ACCEPT_THRESHOLD);
        assert!(score <= 1.0);
    }

    #[test]
    fn test_relevance_exact_name_clamps_to_one() {
        let pm = placemark(
            Some("Louvre"),
            Some("Rue de Rivoli"),
            Some("Paris"),
            Some("France"),
        );
        // name exact + completeness alone exceed 1.0 before clamping
        assert_eq!(relevance_score("louvre", &pm), 1.0);
    }

    #[test]
    fn test_relevance_locality_miss_penalty() {
        let matching = placemark(None, None, Some("Lyon"), None);
        let mismatching = placemark(None, None, Some("Marseille"), None);

        let hit = relevance_score("vieux lyon", &matching);
        let miss = relevance_score("vieux lyon", &mismatching);
        assert!(hit > miss);
        // clamp keeps the penalised score at the floor
        assert_eq!(miss, 0.0);
    }

    #[test]
    fn test_relevance_is_deterministic() {
        let pm = placemark(Some("Somewhere"), Some("A Street"), Some("Lille"), None);
        let a = relevance_score("somewhere near lille", &pm);
        let b = relevance_score("somewhere near lille", &pm);
        assert_eq!(a, b);
    }
}
