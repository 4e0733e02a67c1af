//! # Riprap Sizing Calculation
//!
//! Stable riprap sizing for open-channel flows per the Maynord method
//! (Maynord 1988, Technical Report HL-88-4; USACE EM 1110-2-1601).
//!
//! ## Equation
//!
//! ```text
//! D30 = SF x Cs x Cv x CT x D x [V / sqrt(g x D x (Ss - 1))]^2.5 / K1
//! ```
//!
//! The pipeline is validate -> resolve Cv/K1 -> size D30 -> gradation ->
//! masses -> thickness and Froude -> status. Each stage is pure; a failure in
//! any stage short-circuits as a typed error and no partial result is ever
//! produced.
//!
//! ## Assumptions
//!
//! - SI units throughout (m, m/s, kg)
//! - Channel slope below 2% (Maynord's validated range)
//! - Double precision end to end; nothing is rounded before presentation
//!
//! ## Example
//!
//! ```rust
//! use riprap_core::calculations::riprap::{calculate, RiprapInput};
//! use riprap_core::coefficients::{ChannelConfig, SlopeConfig};
//! use riprap_core::materials::MaterialCoefficients;
//!
//! let input = RiprapInput {
//!     label: "Reach 1".to_string(),
//!     velocity_ms: 2.5,
//!     depth_m: 2.0,
//!     channel: ChannelConfig::Straight,
//!     slope: SlopeConfig::Bed,
//!     material: MaterialCoefficients::default(),
//! };
//!
//! let result = calculate(&input).unwrap();
//! println!("D30 = {:.0} mm", result.gradation.d30_mm);
//! println!("Layer thickness = {:.2} m", result.thickness_m);
//! println!("Froude = {:.2}", result.froude);
//! println!("Stable: {}", result.passes());
//! ```

use serde::{Deserialize, Serialize};

use crate::coefficients::{self, ChannelConfig, ResolvedCoefficients, SlopeConfig};
use crate::errors::{CalcError, CalcResult};
use crate::gradation::{layer_thickness_m, BlockMasses, Gradation};
use crate::materials::MaterialCoefficients;
use crate::units::{Centimeters, Meters};

/// Gravitational acceleration (m/s2)
pub const GRAVITY_MS2: f64 = 9.81;

/// Froude number above which the method extrapolates beyond its
/// validated domain
pub const MAX_FROUDE: f64 = 1.2;

/// D100 above which blocks are flagged for constructability review (mm)
pub const MAX_D100_MM: f64 = 1500.0;

/// Declared acceptance range for flow velocity (m/s)
pub const VELOCITY_RANGE_MS: (f64, f64) = (0.1, 15.0);

/// Declared acceptance range for water depth (m)
pub const DEPTH_RANGE_M: (f64, f64) = (0.1, 30.0);

/// D30 below which a geotextile filter advisory is attached (mm)
const SMALL_D30_MM: f64 = 50.0;

/// Input parameters for a riprap sizing calculation.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Reach 1",
///   "velocity_ms": 2.5,
///   "depth_m": 2.0,
///   "channel": { "type": "Straight" },
///   "slope": { "type": "Bed" },
///   "material": {
///     "safety_factor": 1.1,
///     "stability_coef": 0.375,
///     "thickness_coef": 1.0,
///     "specific_gravity": 2.65,
///     "repose_angle_deg": 40.0
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiprapInput {
    /// User label for this scenario (e.g., "Reach 1", "Outer bend at PK 12")
    pub label: String,

    /// Depth-averaged flow velocity V (m/s)
    pub velocity_ms: f64,

    /// Local water depth D (m)
    pub depth_m: f64,

    /// Channel planform (selects Cv)
    pub channel: ChannelConfig,

    /// Cross-section position (selects K1)
    pub slope: SlopeConfig,

    /// Material-side coefficients (SF, Cs, CT, Ss, angle of repose)
    pub material: MaterialCoefficients,
}

impl RiprapInput {
    /// Validate input parameters.
    ///
    /// Range violations surface as [`CalcError::InvalidInput`]; physically
    /// degenerate combinations (relative density at or below 1.0) surface as
    /// [`CalcError::OutOfDomain`] via the material check.
    pub fn validate(&self) -> CalcResult<()> {
        if self.velocity_ms <= 0.0 {
            return Err(CalcError::invalid_input(
                "velocity_ms",
                self.velocity_ms.to_string(),
                "Velocity must be positive",
            ));
        }
        let (v_min, v_max) = VELOCITY_RANGE_MS;
        if self.velocity_ms < v_min || self.velocity_ms > v_max {
            return Err(CalcError::invalid_input(
                "velocity_ms",
                self.velocity_ms.to_string(),
                "Velocity must be between 0.1 and 15 m/s",
            ));
        }
        if self.depth_m <= 0.0 {
            return Err(CalcError::invalid_input(
                "depth_m",
                self.depth_m.to_string(),
                "Depth must be positive",
            ));
        }
        let (d_min, d_max) = DEPTH_RANGE_M;
        if self.depth_m < d_min || self.depth_m > d_max {
            return Err(CalcError::invalid_input(
                "depth_m",
                self.depth_m.to_string(),
                "Depth must be between 0.1 and 30 m",
            ));
        }
        self.material.validate()
    }
}

/// Validity classification of a computed result.
///
/// `Limit` is not an error: the numbers are returned in full so the caller
/// can display them with a warning. `Error` is never produced by
/// [`calculate`] (failures are typed `Err` values); it exists for boundary
/// layers that fold a failed scenario into a stored status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityStatus {
    /// Result is inside the method's validated domain
    Stable,

    /// Computed successfully, but outside the confidently-validated regime
    /// (Froude above 1.2 or D100 above 1500 mm)
    Limit,

    /// Recorded by a boundary layer for a scenario whose inputs failed
    /// validation; never returned by the engine itself
    Error,
}

impl StabilityStatus {
    /// True when the result needs no reviewer attention
    pub fn is_stable(&self) -> bool {
        matches!(self, StabilityStatus::Stable)
    }
}

/// Results of a riprap sizing calculation.
///
/// Immutable once constructed; a new calculation produces a new value.
///
/// ## JSON Example
///
/// ```json
/// {
///   "gradation": { "d15_mm": 73.9, "d30_mm": 105.6, "d50_mm": 137.3,
///                  "d85_mm": 179.5, "d100_mm": 221.7 },
///   "masses": { "d15_kg": 0.56, "d30_kg": 1.63, "d50_kg": 3.59,
///               "d85_kg": 8.02, "d100_kg": 15.12 },
///   "thickness_m": 0.22,
///   "froude": 0.56,
///   "velocity_ratio": 0.44,
///   "coefficients": { "cv": 1.0, "k1": 1.0 },
///   "status": "Stable",
///   "warnings": []
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiprapResult {
    /// Full gradation curve extrapolated from D30 (mm)
    pub gradation: Gradation,

    /// Equivalent spherical-block masses (kg)
    pub masses: BlockMasses,

    /// Recommended layer thickness, max(D100, 1.5 x D50) (m)
    pub thickness_m: f64,

    /// Froude number V / sqrt(g x D)
    pub froude: f64,

    /// Dimensionless Maynord parameter V / sqrt(g x D x (Ss - 1))
    pub velocity_ratio: f64,

    /// Coefficients the sizing equation actually used
    pub coefficients: ResolvedCoefficients,

    /// Validity classification
    pub status: StabilityStatus,

    /// Advisory notes (filter layer, block handling, domain extrapolation)
    pub warnings: Vec<String>,
}

impl RiprapResult {
    /// True when the result is inside the validated domain
    pub fn passes(&self) -> bool {
        self.status.is_stable()
    }

    /// Layer thickness as a typed length
    pub fn thickness(&self) -> Meters {
        Meters(self.thickness_m)
    }

    /// Layer thickness in centimeters, the usual drawing annotation
    pub fn thickness_cm(&self) -> Centimeters {
        self.thickness().into()
    }
}

/// Size stable riprap for the given conditions.
///
/// Runs the full pipeline: validation, coefficient resolution, the Maynord
/// equation, gradation and mass derivation, layer thickness, Froude number,
/// and status classification.
///
/// # Arguments
///
/// * `input` - Hydraulic conditions, channel/slope configuration, material
///
/// # Returns
///
/// * `Ok(RiprapResult)` - Complete results
/// * `Err(CalcError)` - Invalid input or physically undefined configuration
pub fn calculate(input: &RiprapInput) -> CalcResult<RiprapResult> {
    input.validate()?;

    let coefficients = coefficients::resolve(
        &input.channel,
        &input.slope,
        input.material.repose_angle_deg,
    )?;

    let froude = input.velocity_ms / (GRAVITY_MS2 * input.depth_m).sqrt();

    // Ss > 1 is guaranteed by material validation
    let velocity_ratio = input.velocity_ms
        / (GRAVITY_MS2 * input.depth_m * (input.material.specific_gravity - 1.0)).sqrt();

    let mat = &input.material;
    let d30_m = mat.safety_factor
        * mat.stability_coef
        * coefficients.cv
        * mat.thickness_coef
        * input.depth_m
        * velocity_ratio.powf(2.5)
        / coefficients.k1;

    if !d30_m.is_finite() || d30_m <= 0.0 {
        return Err(CalcError::calculation_failed(
            "riprap_sizing",
            format!("D30 evaluated to a non-physical value: {d30_m}"),
        ));
    }

    let gradation = Gradation::from_d30(d30_m * 1000.0);
    let masses = BlockMasses::for_gradation(&gradation, mat.specific_gravity);
    let thickness_m = layer_thickness_m(gradation.d50_mm, gradation.d100_mm);

    let status = if froude > MAX_FROUDE || gradation.d100_mm > MAX_D100_MM {
        StabilityStatus::Limit
    } else {
        StabilityStatus::Stable
    };

    let mut warnings = Vec::new();
    if froude > MAX_FROUDE {
        warnings.push(format!(
            "Froude number {froude:.2} exceeds {MAX_FROUDE}: extrapolation beyond the validated domain"
        ));
    }
    if gradation.d30_mm < SMALL_D30_MM {
        warnings.push(format!(
            "D30 below {SMALL_D30_MM:.0} mm: consider a geotextile filter layer"
        ));
    }
    if gradation.d100_mm > MAX_D100_MM {
        warnings.push(format!(
            "D100 above {MAX_D100_MM:.0} mm: very heavy blocks, review placement equipment"
        ));
    }

    Ok(RiprapResult {
        gradation,
        masses,
        thickness_m,
        froude,
        velocity_ratio,
        coefficients,
        status,
        warnings,
    })
}

/// Maximum admissible velocity (m/s) for an available stone size.
///
/// Rearranges the sizing equation for V: the dimensionless parameter is
/// `(D30 x K1 / (SF x Cs x Cv x CT x D))^0.4`, and
/// `V = ratio x sqrt(g x D x (Ss - 1))`.
pub fn max_stable_velocity(
    d30_available_mm: f64,
    depth_m: f64,
    material: &MaterialCoefficients,
    coefficients: &ResolvedCoefficients,
) -> CalcResult<f64> {
    if d30_available_mm <= 0.0 {
        return Err(CalcError::invalid_input(
            "d30_available_mm",
            d30_available_mm.to_string(),
            "Available D30 must be positive",
        ));
    }
    if depth_m <= 0.0 {
        return Err(CalcError::invalid_input(
            "depth_m",
            depth_m.to_string(),
            "Depth must be positive",
        ));
    }
    material.validate()?;

    let denominator = material.safety_factor
        * material.stability_coef
        * coefficients.cv
        * material.thickness_coef
        * depth_m;
    let ratio = (d30_available_mm / 1000.0 * coefficients.k1 / denominator).powf(0.4);

    Ok(ratio * (GRAVITY_MS2 * depth_m * (material.specific_gravity - 1.0)).sqrt())
}

/// Outcome of checking an existing revetment against design conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StabilityCheck {
    /// True when the available stone meets or exceeds the required size
    pub is_stable: bool,

    /// D30 the conditions require (mm)
    pub d30_required_mm: f64,

    /// D30 of the in-place stone (mm)
    pub d30_available_mm: f64,

    /// (available - required) / required, in percent
    pub safety_margin_percent: f64,

    /// Maximum admissible velocity for the available stone (m/s)
    pub max_velocity_ms: f64,
}

/// Check whether an existing revetment is stable under the given conditions.
pub fn check_stability(input: &RiprapInput, d30_available_mm: f64) -> CalcResult<StabilityCheck> {
    let result = calculate(input)?;
    let d30_required_mm = result.gradation.d30_mm;

    let max_velocity_ms = max_stable_velocity(
        d30_available_mm,
        input.depth_m,
        &input.material,
        &result.coefficients,
    )?;

    Ok(StabilityCheck {
        is_stable: d30_available_mm >= d30_required_mm,
        d30_required_mm,
        d30_available_mm,
        safety_margin_percent: (d30_available_mm - d30_required_mm) / d30_required_mm * 100.0,
        max_velocity_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_bed_input() -> RiprapInput {
        RiprapInput {
            label: "Reach 1".to_string(),
            velocity_ms: 2.5,
            depth_m: 2.0,
            channel: ChannelConfig::Straight,
            slope: SlopeConfig::Bed,
            material: MaterialCoefficients::default(),
        }
    }

    #[test]
    fn test_straight_bed_scenario() {
        let result = calculate(&straight_bed_input()).unwrap();

        // D30 = 1.1 x 0.375 x 2.0 x (2.5 / sqrt(9.81 x 2.0 x 1.65))^2.5
        assert!((result.gradation.d30_mm - 105.578).abs() < 0.01);
        assert!((result.gradation.d50_mm - 137.252).abs() < 0.01);
        assert!((result.gradation.d100_mm - 221.715).abs() < 0.01);
        assert!((result.masses.d50_kg - 3.588).abs() < 0.01);
        assert!((result.thickness_m - 0.2217).abs() < 0.001);
        assert!((result.froude - 0.5644).abs() < 0.001);
        assert_eq!(result.status, StabilityStatus::Stable);
        assert!(result.passes());
    }

    #[test]
    fn test_bend_scenario() {
        let input = RiprapInput {
            label: "Outer bend".to_string(),
            velocity_ms: 4.0,
            depth_m: 0.8,
            channel: ChannelConfig::Bend {
                radius_to_width: 8.0,
            },
            slope: SlopeConfig::Bed,
            material: MaterialCoefficients {
                safety_factor: 1.2,
                ..MaterialCoefficients::default()
            },
        };
        let result = calculate(&input).unwrap();

        assert!((result.coefficients.cv - 1.1024).abs() < 0.001);
        assert!((result.gradation.d30_mm - 516.989).abs() < 0.01);
        assert!((result.gradation.d50_mm - 672.085).abs() < 0.01);
        assert!((result.gradation.d100_mm - 1085.676).abs() < 0.01);
        assert!((result.masses.d50_kg - 421.228).abs() < 0.1);

        // Froude 1.43 puts this past the validated domain
        assert!((result.froude - 1.4278).abs() < 0.001);
        assert_eq!(result.status, StabilityStatus::Limit);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_limit_status_from_block_size() {
        // Subcritical flow but D100 past 1500 mm
        let input = RiprapInput {
            velocity_ms: 6.0,
            depth_m: 5.0,
            ..straight_bed_input()
        };
        let result = calculate(&input).unwrap();
        assert!(result.froude < MAX_FROUDE);
        assert!(result.gradation.d100_mm > MAX_D100_MM);
        assert_eq!(result.status, StabilityStatus::Limit);
    }

    #[test]
    fn test_side_slope_increases_stone_size() {
        let bed = calculate(&straight_bed_input()).unwrap();

        let slope_input = RiprapInput {
            slope: SlopeConfig::from_ratio(2.0, 1.0).unwrap(),
            ..straight_bed_input()
        };
        let slope = calculate(&slope_input).unwrap();

        // K1 divides, so a bank needs a larger stone than the bed
        assert!(slope.coefficients.k1 < 1.0);
        assert!(slope.gradation.d30_mm > bed.gradation.d30_mm);
    }

    #[test]
    fn test_gradation_and_mass_ordering() {
        let result = calculate(&straight_bed_input()).unwrap();
        for pair in result.gradation.as_array().windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for pair in result.masses.as_array().windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_idempotence() {
        let input = straight_bed_input();
        let first = calculate(&input).unwrap();
        let second = calculate(&input).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_velocity_rejected() {
        let input = RiprapInput {
            velocity_ms: -1.0,
            ..straight_bed_input()
        };
        match calculate(&input).unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "velocity_ms"),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_declared_ranges_enforced() {
        let too_fast = RiprapInput {
            velocity_ms: 20.0,
            ..straight_bed_input()
        };
        assert!(calculate(&too_fast).unwrap_err().is_validation());

        let too_deep = RiprapInput {
            depth_m: 40.0,
            ..straight_bed_input()
        };
        assert!(calculate(&too_deep).unwrap_err().is_validation());
    }

    #[test]
    fn test_slope_past_repose_is_domain_error() {
        let input = RiprapInput {
            slope: SlopeConfig::SideSlope { angle_deg: 45.0 },
            ..straight_bed_input()
        };
        assert!(calculate(&input).unwrap_err().is_domain());
    }

    #[test]
    fn test_inverse_velocity_roundtrip() {
        let input = straight_bed_input();
        let result = calculate(&input).unwrap();

        let v_max = max_stable_velocity(
            result.gradation.d30_mm,
            input.depth_m,
            &input.material,
            &result.coefficients,
        )
        .unwrap();
        assert!((v_max - input.velocity_ms).abs() < 1e-9);
    }

    #[test]
    fn test_check_stability() {
        let input = straight_bed_input();

        // Oversized stone: stable with positive margin
        let check = check_stability(&input, 150.0).unwrap();
        assert!(check.is_stable);
        assert!(check.safety_margin_percent > 0.0);
        assert!(check.max_velocity_ms > input.velocity_ms);

        // Undersized stone: unstable with negative margin
        let check = check_stability(&input, 80.0).unwrap();
        assert!(!check.is_stable);
        assert!(check.safety_margin_percent < 0.0);
        assert!(check.max_velocity_ms < input.velocity_ms);
    }

    #[test]
    fn test_thickness_accessors() {
        let result = calculate(&straight_bed_input()).unwrap();
        assert!((result.thickness().0 - result.thickness_m).abs() < 1e-12);
        assert!((result.thickness_cm().0 - result.thickness_m * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_serialization() {
        let input = straight_bed_input();
        let json = serde_json::to_string_pretty(&input).unwrap();
        let roundtrip: RiprapInput = serde_json::from_str(&json).unwrap();
        assert_eq!(input, roundtrip);

        let result = calculate(&input).unwrap();
        let json = serde_json::to_string_pretty(&result).unwrap();
        let roundtrip: RiprapResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, roundtrip);
    }
}
