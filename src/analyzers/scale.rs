use crate::analyzers::types::TimeFilter;
use serde::Serialize;

/// Radius range used when every trip is shown.
pub const UNFILTERED_RANGE: (f64, f64) = (0.0, 25.0);

/// Radius range used when a time filter is active. Fewer trips pass, so
/// circles start larger to stay visible.
pub const FILTERED_RANGE: (f64, f64) = (3.0, 50.0);

/// Square-root scale from station traffic to circle radius, so circle
/// area grows linearly with traffic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiusScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl RadiusScale {
    /// Builds the scale for the current snapshot. A zero maximum falls back
    /// to a `[0, 1]` domain.
    pub fn for_traffic(max_traffic: usize, filter: TimeFilter) -> Self {
        let upper = if max_traffic == 0 { 1.0 } else { max_traffic as f64 };
        let range = if filter.is_active() {
            FILTERED_RANGE
        } else {
            UNFILTERED_RANGE
        };

        RadiusScale {
            domain: (0.0, upper),
            range,
        }
    }

    pub fn radius(&self, traffic: usize) -> f64 {
        let (d0, d1) = (self.domain.0.sqrt(), self.domain.1.sqrt());
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        let t = ((traffic as f64).sqrt() - d0) / (d1 - d0);
        r0 + t * (r1 - r0)
    }
}
