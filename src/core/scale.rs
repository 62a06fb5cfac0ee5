use crate::error::{ChartError, ChartResult};

/// Affine map from a value domain onto a pixel interval.
///
/// `pixel_start` may be greater than `pixel_end`; vertical value scales use
/// that to put the domain maximum at the top of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    pixel_start: f64,
    pixel_end: f64,
}

impl LinearScale {
    pub fn new(
        domain_start: f64,
        domain_end: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale pixel range must be finite".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            pixel_start,
            pixel_end,
        })
    }

    /// Builds a scale over a possibly flat domain by widening it to `min_span`.
    ///
    /// Flat signals are common in telemetry; they are drawn centered instead
    /// of being rejected.
    pub fn widened(
        domain_start: f64,
        domain_end: f64,
        min_span: f64,
        pixel_start: f64,
        pixel_end: f64,
    ) -> ChartResult<Self> {
        let (start, end) = normalize_range(domain_start, domain_end, min_span)?;
        Self::new(start, end, pixel_start, pixel_end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn domain_to_pixel(self, value: f64) -> f64 {
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        self.pixel_start + normalized * (self.pixel_end - self.pixel_start)
    }

    #[must_use]
    pub fn pixel_to_domain(self, pixel: f64) -> f64 {
        let normalized = (pixel - self.pixel_start) / (self.pixel_end - self.pixel_start);
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Moves a coordinate to the center of its pixel so 1px strokes stay crisp.
#[must_use]
pub fn snap_to_pixel_center(value: f64) -> f64 {
    value.floor() + 0.5
}

fn normalize_range(start: f64, end: f64, min_span: f64) -> ChartResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ChartError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }
    if !min_span.is_finite() || min_span <= 0.0 {
        return Err(ChartError::InvalidData(
            "scale min span must be finite and > 0".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}

#[cfg(test)]
mod tests {
    use super::{LinearScale, snap_to_pixel_center};
    use approx::assert_relative_eq;

    #[test]
    fn inverted_pixel_range_puts_max_on_top() {
        let scale = LinearScale::new(0.0, 10.0, 100.0, 0.0).expect("scale");
        assert_relative_eq!(scale.domain_to_pixel(10.0), 0.0);
        assert_relative_eq!(scale.domain_to_pixel(0.0), 100.0);
        assert_relative_eq!(scale.pixel_to_domain(25.0), 7.5);
    }

    #[test]
    fn widened_scale_centers_flat_domain() {
        let scale = LinearScale::widened(3.0, 3.0, 1.0, 0.0, 50.0).expect("scale");
        assert_eq!(scale.domain(), (2.5, 3.5));
        assert_relative_eq!(scale.domain_to_pixel(3.0), 25.0);
    }

    #[test]
    fn zero_span_is_rejected_by_strict_constructor() {
        assert!(LinearScale::new(1.0, 1.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn snap_moves_to_pixel_center() {
        assert_eq!(snap_to_pixel_center(3.9), 3.5);
        assert_eq!(snap_to_pixel_center(4.0), 4.5);
    }
}
