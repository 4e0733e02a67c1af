//! # Rock Material Data
//!
//! Material-side coefficients for the Maynord sizing equation: rock shape
//! and its stability coefficient Cs, safety factor SF, thickness coefficient
//! CT, relative density Ss, and the angle of repose used for side-slope
//! correction.
//!
//! ## Standard Values (USACE EM 1110-2-1601)
//!
//! | Coefficient | Description          | Standard            |
//! |-------------|----------------------|---------------------|
//! | SF          | Safety factor        | 1.1 (range 1.0-2.0) |
//! | Cs          | Stability, angular   | 0.375               |
//! | Cs          | Stability, rounded   | 0.30                |
//! | CT          | Thickness            | 1.0                 |
//! | Ss          | Relative density     | 2.65 (range 2.0-3.5)|
//! | phi         | Angle of repose      | 40 deg (angular)    |
//!
//! Rounded rock needs a roughly 25% larger D30 than angular rock of the same
//! mass; interlock between angular fragments is what the higher Cs buys.
//!
//! ## Example
//!
//! ```rust
//! use riprap_core::materials::{MaterialCoefficients, RockShape};
//!
//! let angular = MaterialCoefficients::for_shape(RockShape::Angular);
//! assert_eq!(angular.stability_coef, 0.375);
//!
//! let custom = MaterialCoefficients {
//!     specific_gravity: 2.9,
//!     ..MaterialCoefficients::default()
//! };
//! assert!(custom.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Stability coefficient Cs for rounded rock (cobbles, river-run stone)
pub const CS_ROUNDED: f64 = 0.30;

/// Stability coefficient Cs for angular rock (quarried, crushed stone)
pub const CS_ANGULAR: f64 = 0.375;

/// Default safety factor SF (USACE standard)
pub const DEFAULT_SAFETY_FACTOR: f64 = 1.1;

/// Default relative rock density Ss (typical quarry stone)
pub const DEFAULT_SPECIFIC_GRAVITY: f64 = 2.65;

/// Default angle of repose for angular riprap (degrees)
pub const DEFAULT_REPOSE_ANGLE_DEG: f64 = 40.0;

/// Water density (kg/m3), reference for relative density
pub const WATER_DENSITY_KG_M3: f64 = 1000.0;

/// Declared acceptance range for the safety factor
pub const SAFETY_FACTOR_RANGE: (f64, f64) = (1.0, 2.0);

/// Declared acceptance range for relative rock density
pub const SPECIFIC_GRAVITY_RANGE: (f64, f64) = (2.0, 3.5);

/// Rock fragment shape, selecting the stability coefficient Cs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RockShape {
    /// Rounded rock (cobbles, river-run): Cs = 0.30
    Rounded,

    /// Angular rock (quarried, crushed): Cs = 0.375
    #[default]
    Angular,
}

impl RockShape {
    /// All rock shape variants for UI selection
    pub const ALL: [RockShape; 2] = [RockShape::Rounded, RockShape::Angular];

    /// Get the stability coefficient Cs for this shape
    pub fn cs_value(&self) -> f64 {
        match self {
            RockShape::Rounded => CS_ROUNDED,
            RockShape::Angular => CS_ANGULAR,
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            RockShape::Rounded => "Rounded rock (cobbles, river-run)",
            RockShape::Angular => "Angular rock (quarried, crushed)",
        }
    }
}

/// Material-side coefficients fed to the sizing equation.
///
/// `Default` gives the USACE standard set for angular quarry stone.
/// Cs may also be set to a custom value outside the two shape presets when a
/// site-specific coefficient has been established.
///
/// ## JSON Example
///
/// ```json
/// {
///   "safety_factor": 1.1,
///   "stability_coef": 0.375,
///   "thickness_coef": 1.0,
///   "specific_gravity": 2.65,
///   "repose_angle_deg": 40.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialCoefficients {
    /// Safety factor SF, range 1.0-2.0
    pub safety_factor: f64,

    /// Stability coefficient Cs (0.30 rounded, 0.375 angular, or custom)
    pub stability_coef: f64,

    /// Thickness coefficient CT (1.0 for the standard layer thickness)
    pub thickness_coef: f64,

    /// Relative rock density Ss, range 2.0-3.5
    pub specific_gravity: f64,

    /// Angle of repose phi in degrees (side-slope stability limit)
    pub repose_angle_deg: f64,
}

impl Default for MaterialCoefficients {
    fn default() -> Self {
        MaterialCoefficients {
            safety_factor: DEFAULT_SAFETY_FACTOR,
            stability_coef: CS_ANGULAR,
            thickness_coef: 1.0,
            specific_gravity: DEFAULT_SPECIFIC_GRAVITY,
            repose_angle_deg: DEFAULT_REPOSE_ANGLE_DEG,
        }
    }
}

impl MaterialCoefficients {
    /// Standard coefficient set for a given rock shape
    pub fn for_shape(shape: RockShape) -> Self {
        MaterialCoefficients {
            stability_coef: shape.cs_value(),
            ..MaterialCoefficients::default()
        }
    }

    /// Saturated rock density rho_s = Ss x 1000 (kg/m3)
    pub fn rock_density_kg_m3(&self) -> f64 {
        self.specific_gravity * WATER_DENSITY_KG_M3
    }

    /// Validate material coefficients.
    ///
    /// A relative density at or below 1.0 would make the sizing exponent
    /// base non-positive (the stone would not sink), so it is reported as
    /// [`CalcError::OutOfDomain`] rather than a plain range violation.
    pub fn validate(&self) -> CalcResult<()> {
        if self.specific_gravity <= 1.0 {
            return Err(CalcError::out_of_domain(
                "specific_gravity",
                "Relative density must exceed 1.0 for submerged stone to be stable",
            ));
        }
        let (ss_min, ss_max) = SPECIFIC_GRAVITY_RANGE;
        if self.specific_gravity < ss_min || self.specific_gravity > ss_max {
            return Err(CalcError::invalid_input(
                "specific_gravity",
                self.specific_gravity.to_string(),
                "Relative density must be between 2.0 and 3.5",
            ));
        }
        let (sf_min, sf_max) = SAFETY_FACTOR_RANGE;
        if self.safety_factor < sf_min || self.safety_factor > sf_max {
            return Err(CalcError::invalid_input(
                "safety_factor",
                self.safety_factor.to_string(),
                "Safety factor must be between 1.0 and 2.0",
            ));
        }
        if self.stability_coef <= 0.0 {
            return Err(CalcError::invalid_input(
                "stability_coef",
                self.stability_coef.to_string(),
                "Stability coefficient must be positive",
            ));
        }
        if self.thickness_coef <= 0.0 {
            return Err(CalcError::invalid_input(
                "thickness_coef",
                self.thickness_coef.to_string(),
                "Thickness coefficient must be positive",
            ));
        }
        if self.repose_angle_deg <= 0.0 || self.repose_angle_deg >= 90.0 {
            return Err(CalcError::invalid_input(
                "repose_angle_deg",
                self.repose_angle_deg.to_string(),
                "Angle of repose must be between 0 and 90 degrees",
            ));
        }
        Ok(())
    }
}
