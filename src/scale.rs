use crate::result::MeasurementError;

/// Conversion factor from kilograms to pounds.
pub const KG_TO_LB: f32 = 2.20462;

/// Offset in pounds subtracted from the bottom-right corner to compensate
/// a known bias of that strain gauge.
pub const BOTTOM_RIGHT_OFFSET_LB: f32 = 5.1;

/// A snapshot of the four corner sensors of a balance board, in kilograms.
///
/// The values come pre-calibrated from the device source. Unloaded corners
/// read zero or slightly negative due to sensor noise.
#[derive(Debug, Default, Clone, Copy)]
pub struct SensorFrame {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl SensorFrame {
    #[must_use]
    pub const fn new(top_left: f32, top_right: f32, bottom_left: f32, bottom_right: f32) -> Self {
        Self {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        }
    }

    /// Sum of the four corners in kilograms.
    #[must_use]
    pub fn total_kg(&self) -> f32 {
        self.top_left + self.top_right + self.bottom_left + self.bottom_right
    }
}

/// Normalized coordinate of where the weight is concentrated on the board.
///
/// `x` is positive towards the right edge, `y` towards the top edge.
/// Both are in `[-1, 1]` when all corner readings are non-negative.
#[derive(Debug, Clone, Copy)]
pub struct CenterOfPressure {
    pub x: f32,
    pub y: f32,
}

/// The weight derived from a `SensorFrame`.
///
/// `total`, `left` and `right` are in pounds and `total` always equals
/// `left + right` up to floating-point rounding.
#[derive(Debug, Clone)]
pub struct Measurement {
    pub total: f32,
    pub left: f32,
    pub right: f32,
    /// Only computed by `WeightFormula::CenterOfPressure`.
    pub center: Option<CenterOfPressure>,
}

/// How to derive a `Measurement` from a `SensorFrame`.
///
/// The two formulas match the two historic demo programs and produce
/// different totals for the same frame, so the caller has to pick one.
#[derive(Debug, Clone, Copy)]
pub enum WeightFormula {
    /// Converts each corner to pounds and subtracts
    /// `BOTTOM_RIGHT_OFFSET_LB` from the bottom-right corner.
    /// Does not compute a center of pressure and never fails.
    OffsetCorrected,
    /// Sums the corners in kilograms, derives the normalized center of
    /// pressure from the kilogram values, then converts the totals to
    /// pounds. Fails with `MeasurementError::DivisionByZero` when the
    /// frame's total is zero.
    CenterOfPressure,
}

impl WeightFormula {
    /// Computes the weight measurement for the given frame.
    ///
    /// # Errors
    ///
    /// This function will return an error if the center of pressure is
    /// requested for a frame whose corners sum to zero.
    pub fn measure(self, frame: &SensorFrame) -> Result<Measurement, MeasurementError> {
        match self {
            Self::OffsetCorrected => Ok(offset_corrected(frame)),
            Self::CenterOfPressure => center_of_pressure(frame),
        }
    }
}

fn offset_corrected(frame: &SensorFrame) -> Measurement {
    let tl = frame.top_left * KG_TO_LB;
    let tr = frame.top_right * KG_TO_LB;
    let bl = frame.bottom_left * KG_TO_LB;
    let br = frame.bottom_right * KG_TO_LB - BOTTOM_RIGHT_OFFSET_LB;

    Measurement {
        total: tl + tr + bl + br,
        left: tl + bl,
        right: tr + br,
        center: None,
    }
}

fn center_of_pressure(frame: &SensorFrame) -> Result<Measurement, MeasurementError> {
    let total_kg = frame.total_kg();
    if total_kg == 0.0 {
        return Err(MeasurementError::DivisionByZero);
    }

    let left_kg = frame.top_left + frame.bottom_left;
    let right_kg = frame.top_right + frame.bottom_right;
    let top_kg = frame.top_left + frame.top_right;

    let center = CenterOfPressure {
        x: (right_kg / total_kg).mul_add(2.0, -1.0),
        y: (top_kg / total_kg).mul_add(2.0, -1.0),
    };

    Ok(Measurement {
        total: total_kg * KG_TO_LB,
        left: left_kg * KG_TO_LB,
        right: right_kg * KG_TO_LB,
        center: Some(center),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_offset_corrected_empty_board() {
        let frame = SensorFrame::default();
        let measurement = WeightFormula::OffsetCorrected.measure(&frame).unwrap();

        // Only the bottom-right offset remains when nothing is on the board.
        assert_close(measurement.total, -BOTTOM_RIGHT_OFFSET_LB);
        assert_close(measurement.left, 0.0);
        assert_close(measurement.right, -BOTTOM_RIGHT_OFFSET_LB);
        assert!(measurement.center.is_none());
    }

    #[test]
    fn test_offset_corrected_one_kilogram_per_corner() {
        let frame = SensorFrame::new(1.0, 1.0, 1.0, 1.0);
        let measurement = WeightFormula::OffsetCorrected.measure(&frame).unwrap();

        assert_close(measurement.total, 3.0 * KG_TO_LB + (KG_TO_LB - 5.1));
        assert_close(measurement.left, 2.0 * KG_TO_LB);
        assert_close(measurement.right, 2.0 * KG_TO_LB - 5.1);
    }

    #[test]
    fn test_total_is_left_plus_right() {
        let frames = [
            SensorFrame::new(12.5, 30.0, 17.25, 20.75),
            SensorFrame::new(0.0, 0.01, 80.4, 0.02),
            SensorFrame::new(-0.02, 0.01, 0.0, 0.03),
        ];

        for frame in frames {
            for formula in [WeightFormula::OffsetCorrected, WeightFormula::CenterOfPressure] {
                let measurement = formula.measure(&frame).unwrap();
                assert_close(measurement.total, measurement.left + measurement.right);
            }
        }
    }

    #[test]
    fn test_center_of_pressure_centered_load() {
        let frame = SensorFrame::new(25.0, 25.0, 25.0, 25.0);
        let measurement = WeightFormula::CenterOfPressure.measure(&frame).unwrap();

        assert_close(measurement.total, 100.0 * KG_TO_LB);
        assert_close(measurement.left, 50.0 * KG_TO_LB);
        assert_close(measurement.right, 50.0 * KG_TO_LB);

        let center = measurement.center.unwrap();
        assert_close(center.x, 0.0);
        assert_close(center.y, 0.0);
    }

    #[test]
    fn test_center_of_pressure_single_corner_load() {
        let frame = SensorFrame::new(100.0, 0.0, 0.0, 0.0);
        let measurement = WeightFormula::CenterOfPressure.measure(&frame).unwrap();

        let center = measurement.center.unwrap();
        assert_close(center.x, -1.0);
        assert_close(center.y, 1.0);
    }

    #[test]
    fn test_center_of_pressure_empty_board() {
        let frame = SensorFrame::default();
        let result = WeightFormula::CenterOfPressure.measure(&frame);

        assert!(matches!(result, Err(MeasurementError::DivisionByZero)));
    }

    #[test]
    fn test_sensor_noise_does_not_panic() {
        let frame = SensorFrame::new(-0.02, 0.01, -0.01, 0.03);
        let measurement = WeightFormula::OffsetCorrected.measure(&frame).unwrap();
        assert!(measurement.total < 0.0);

        let measurement = WeightFormula::CenterOfPressure.measure(&frame).unwrap();
        assert!(measurement.center.is_some());
    }
}
