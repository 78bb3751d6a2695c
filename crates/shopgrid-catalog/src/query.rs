//! Query parameter parsing and validation.

use std::collections::HashSet;

use serde::Deserialize;

const RADIUS_MIN: i64 = 100;
const RADIUS_MAX: i64 = 2000;
const COUNT_MAX: i64 = 100;

/// Raw query parameters exactly as they arrive from the wire, all optional
/// text. Validation turns them into a [`SearchQuery`] or a list of
/// field-level error strings — never both.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
    pub count: Option<String>,
    pub tags: Option<String>,
}

/// A fully validated, range-checked query. Constructed fresh per request and
/// never shared across requests.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub lat: f64,
    pub lng: f64,
    /// Search radius in meters.
    pub radius: u32,
    /// Hard cap on the number of results.
    pub count: usize,
    /// Required tags; empty means "no tag filter". A shop matches when it
    /// carries at least one of these (OR semantics).
    pub tags: HashSet<String>,
}

impl RawQuery {
    /// Validate and convert into a [`SearchQuery`].
    ///
    /// A missing or unparsable numeric field aborts with a single generic
    /// parse error; otherwise range violations accumulate independently, one
    /// message per field.
    ///
    /// # Errors
    ///
    /// Returns the non-empty list of human-readable error strings.
    pub fn validate(&self) -> Result<SearchQuery, Vec<String>> {
        let parsed = (
            self.lat.as_deref().and_then(|s| s.parse::<f64>().ok()),
            self.lng.as_deref().and_then(|s| s.parse::<f64>().ok()),
            self.radius.as_deref().and_then(|s| s.parse::<i64>().ok()),
            self.count.as_deref().and_then(|s| s.parse::<i64>().ok()),
        );
        let (Some(lat), Some(lng), Some(radius), Some(count)) = parsed else {
            return Err(vec!["one or more of the inputs is not a number".to_string()]);
        };

        let mut errors = Vec::new();
        if !(-90.0..=90.0).contains(&lat) {
            errors.push("lat must be between -90 and 90".to_string());
        }
        if !(-180.0..=180.0).contains(&lng) {
            errors.push("lng must be between -180 and 180".to_string());
        }
        if !(RADIUS_MIN..=RADIUS_MAX).contains(&radius) {
            errors.push(format!(
                "radius must be between {RADIUS_MIN} and {RADIUS_MAX}"
            ));
        }
        if !(0..=COUNT_MAX).contains(&count) {
            errors.push(format!("count must be between 0 and {COUNT_MAX}"));
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let tags: HashSet<String> = self
            .tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter(|t| !t.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        // Ranges are verified above, so the narrowing casts cannot lose data.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (radius, count) = (radius as u32, count as usize);
        Ok(SearchQuery {
            lat,
            lng,
            radius,
            count,
            tags,
        })
    }
}
