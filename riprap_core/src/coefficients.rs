//! # Hydraulic Correction Coefficients
//!
//! Resolution of the two configuration-dependent coefficients of the Maynord
//! equation: the velocity-distribution coefficient Cv (channel planform) and
//! the side-slope correction factor K1 (bank geometry vs. angle of repose).
//!
//! ## Overview
//!
//! ```text
//! Cv:  straight channel            1.0
//!      transition zone             1.25
//!      bend, 2 <= R/W <= 25        1.283 - 0.2 x log10(R/W)
//!      bend, 25 < R/W <= 50        1.0 (clamped)
//!
//! K1:  channel bed                 1.0
//!      side slope at angle theta   sqrt(1 - sin^2(theta) / sin^2(phi))
//! ```
//!
//! K1 divides in the sizing equation, so a steeper bank (smaller K1) demands
//! a larger stone. At theta >= phi the radicand goes non-positive: the bank
//! is steeper than the rock can rest and no finite armor size satisfies the
//! model.
//!
//! ## Common Side Slopes
//!
//! | Slope (H:V) | theta    | K1 (phi = 40 deg) |
//! |-------------|----------|-------------------|
//! | 3:1         | 18.43    | 0.87              |
//! | 2.5:1       | 21.80    | 0.82              |
//! | 2:1         | 26.57    | 0.72              |
//! | 1.5:1       | 33.69    | 0.51              |
//!
//! The tabulated values are samples of the continuous closed-form formula,
//! not a lookup table; resolution always evaluates the formula.
//!
//! ## Reference
//!
//! USACE EM 1110-2-1601, Plates 33 and 39; Carter, Carleson & Lane (1953).

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Cv for a straight channel reach
pub const CV_STRAIGHT: f64 = 1.0;

/// Cv for a transition zone (contraction/expansion)
pub const CV_TRANSITION: f64 = 1.25;

/// Minimum accepted bend ratio R/W
pub const BEND_RATIO_MIN: f64 = 2.0;

/// Bend ratio above which Cv is clamped to 1.0
pub const BEND_RATIO_CLAMP: f64 = 25.0;

/// Maximum accepted bend ratio R/W
pub const BEND_RATIO_MAX: f64 = 50.0;

/// Channel planform configuration, selecting the Cv coefficient.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Straight" }
/// { "type": "Transition" }
/// { "type": "Bend", "radius_to_width": 8.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ChannelConfig {
    /// Straight reach: Cv = 1.0
    Straight,

    /// Transition zone: Cv = 1.25
    Transition,

    /// Channel bend with centerline radius R over water-surface width W
    Bend {
        /// R/W ratio; accepted in [2, 50]
        radius_to_width: f64,
    },
}

impl ChannelConfig {
    /// Human-readable description
    pub fn description(&self) -> String {
        match self {
            ChannelConfig::Straight => "Straight reach".to_string(),
            ChannelConfig::Transition => "Transition zone".to_string(),
            ChannelConfig::Bend { radius_to_width } => {
                format!("Bend, R/W = {radius_to_width:.1}")
            }
        }
    }
}

/// Cross-section position configuration, selecting the K1 factor.
///
/// ## JSON Serialization
///
/// ```json
/// { "type": "Bed" }
/// { "type": "SideSlope", "angle_deg": 26.57 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SlopeConfig {
    /// Channel bed: K1 = 1.0
    Bed,

    /// Bank at the given angle from horizontal (degrees)
    SideSlope {
        /// theta, degrees from horizontal; must stay below the repose angle
        angle_deg: f64,
    },
}

impl SlopeConfig {
    /// Build a side-slope configuration from an H:V ratio (e.g. 2:1).
    pub fn from_ratio(horizontal: f64, vertical: f64) -> CalcResult<Self> {
        let angle_deg = slope_ratio_to_angle(horizontal, vertical)?;
        Ok(SlopeConfig::SideSlope { angle_deg })
    }

    /// Human-readable description
    pub fn description(&self) -> String {
        match self {
            SlopeConfig::Bed => "Channel bed".to_string(),
            SlopeConfig::SideSlope { angle_deg } => {
                format!("Side slope, {angle_deg:.1} deg")
            }
        }
    }
}

/// Coefficients resolved from the channel and slope configurations.
///
/// Always derived, never user-supplied: the sizing equation only ever sees
/// values that went through [`resolve`] (a UI override still has to pass
/// through a configuration variant).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedCoefficients {
    /// Velocity-distribution coefficient Cv, in [1.0, 1.30]
    pub cv: f64,

    /// Side-slope correction factor K1, in (0, 1]
    pub k1: f64,
}

/// Resolve the velocity-distribution coefficient Cv.
///
/// Total over every accepted configuration. Bend ratios in (25, 50] clamp to
/// 1.0; the closed form at R/W = 25 already gives 1.003, so the clamp is
/// continuous within rounding. Ratios outside [2, 50] are outside the
/// formula's validated range and are rejected.
pub fn velocity_profile_coefficient(channel: &ChannelConfig) -> CalcResult<f64> {
    match channel {
        ChannelConfig::Straight => Ok(CV_STRAIGHT),
        ChannelConfig::Transition => Ok(CV_TRANSITION),
        ChannelConfig::Bend { radius_to_width } => {
            let r = *radius_to_width;
            if !r.is_finite() || r < BEND_RATIO_MIN {
                return Err(CalcError::invalid_input(
                    "radius_to_width",
                    r.to_string(),
                    "Bend ratio R/W must be at least 2",
                ));
            }
            if r > BEND_RATIO_MAX {
                return Err(CalcError::invalid_input(
                    "radius_to_width",
                    r.to_string(),
                    "Bend ratio R/W must be at most 50",
                ));
            }
            if r > BEND_RATIO_CLAMP {
                return Ok(1.0);
            }
            Ok(1.283 - 0.2 * r.log10())
        }
    }
}

/// Resolve the side-slope correction factor K1.
///
/// `K1 = sqrt(1 - sin^2(theta) / sin^2(phi))` with phi the angle of repose.
/// Fails with [`CalcError::OutOfDomain`] when theta >= phi.
pub fn side_slope_factor(slope: &SlopeConfig, repose_angle_deg: f64) -> CalcResult<f64> {
    match slope {
        SlopeConfig::Bed => Ok(1.0),
        SlopeConfig::SideSlope { angle_deg } => {
            let theta = *angle_deg;
            if !theta.is_finite() || theta <= 0.0 {
                return Err(CalcError::invalid_input(
                    "angle_deg",
                    theta.to_string(),
                    "Slope angle must be positive",
                ));
            }
            if theta >= repose_angle_deg {
                return Err(CalcError::out_of_domain(
                    "angle_deg",
                    format!(
                        "Slope angle {theta:.1} deg is at or above the angle of repose \
                         {repose_angle_deg:.1} deg; no stable stone size exists"
                    ),
                ));
            }
            let sin_theta = theta.to_radians().sin();
            let sin_phi = repose_angle_deg.to_radians().sin();
            let radicand = 1.0 - (sin_theta * sin_theta) / (sin_phi * sin_phi);
            // theta < phi guarantees a positive radicand
            Ok(radicand.sqrt())
        }
    }
}

/// Resolve both coefficients for a channel/slope configuration pair.
pub fn resolve(
    channel: &ChannelConfig,
    slope: &SlopeConfig,
    repose_angle_deg: f64,
) -> CalcResult<ResolvedCoefficients> {
    Ok(ResolvedCoefficients {
        cv: velocity_profile_coefficient(channel)?,
        k1: side_slope_factor(slope, repose_angle_deg)?,
    })
}

/// Convert an H:V slope ratio to an angle in degrees.
///
/// 2:1 -> 26.57 deg, 1.5:1 -> 33.69 deg, 1:1 -> 45 deg.
pub fn slope_ratio_to_angle(horizontal: f64, vertical: f64) -> CalcResult<f64> {
    if horizontal <= 0.0 {
        return Err(CalcError::invalid_input(
            "horizontal",
            horizontal.to_string(),
            "Horizontal run must be positive",
        ));
    }
    if vertical <= 0.0 {
        return Err(CalcError::invalid_input(
            "vertical",
            vertical.to_string(),
            "Vertical rise must be positive",
        ));
    }
    Ok((vertical / horizontal).atan().to_degrees())
}

/// Convert an angle in degrees to the horizontal run of an H:1 slope ratio.
///
/// 26.57 deg -> 2.0, 45 deg -> 1.0.
pub fn angle_to_slope_ratio(angle_deg: f64) -> CalcResult<f64> {
    if angle_deg <= 0.0 || angle_deg >= 90.0 {
        return Err(CalcError::invalid_input(
            "angle_deg",
            angle_deg.to_string(),
            "Angle must be between 0 and 90 degrees",
        ));
    }
    Ok(1.0 / angle_deg.to_radians().tan())
}
