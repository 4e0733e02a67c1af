//! # Gradation and Mass Calculations
//!
//! Extrapolation of a full gradation curve from the characteristic D30,
//! equivalent spherical-block masses, recommended layer thickness, and the
//! standard USACE gradation classes.
//!
//! ## Gradation Ratios
//!
//! The curve is fixed multiples of D30:
//!
//! ```text
//! D15 = 0.70 x D30
//! D50 = 1.30 x D30
//! D85 = 1.70 x D30
//! D100 = 2.10 x D30
//! ```
//!
//! The ratios are strictly increasing, so `D15 < D30 < D50 < D85 < D100`
//! holds by construction for any positive D30; no runtime check is needed.
//!
//! ## Example
//!
//! ```rust
//! use riprap_core::gradation::{Gradation, BlockMasses, layer_thickness_m};
//!
//! let grad = Gradation::from_d30(180.0);
//! assert!(grad.d15_mm < grad.d30_mm && grad.d100_mm > grad.d85_mm);
//!
//! let masses = BlockMasses::for_gradation(&grad, 2.65);
//! assert!(masses.d100_kg > masses.d50_kg);
//!
//! let thickness = layer_thickness_m(grad.d50_mm, grad.d100_mm);
//! assert!(thickness >= grad.d100_mm / 1000.0);
//! ```
//!
//! ## Reference
//!
//! USACE EM 1110-2-1601, Appendix H (gradation classes, layer thickness).

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::materials::WATER_DENSITY_KG_M3;

/// D15/D30 gradation ratio
pub const D15_RATIO: f64 = 0.70;

/// D50/D30 gradation ratio
pub const D50_RATIO: f64 = 1.30;

/// D85/D30 gradation ratio
pub const D85_RATIO: f64 = 1.70;

/// D100/D30 gradation ratio
pub const D100_RATIO: f64 = 2.10;

/// Shape factor for an equivalent sphere (pi/6)
pub const SPHERE_SHAPE_FACTOR: f64 = std::f64::consts::PI / 6.0;

/// Typical placed-riprap porosity for volume/tonnage estimates
pub const DEFAULT_POROSITY: f64 = 0.35;

/// A riprap gradation: characteristic diameters in millimeters.
///
/// Built from D30 via [`Gradation::from_d30`]; the fixed ratios guarantee the
/// strict ordering `d15 < d30 < d50 < d85 < d100`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gradation {
    /// 15th percentile diameter (mm)
    pub d15_mm: f64,
    /// 30th percentile diameter (mm)
    pub d30_mm: f64,
    /// Median diameter (mm)
    pub d50_mm: f64,
    /// 85th percentile diameter (mm)
    pub d85_mm: f64,
    /// Maximum diameter (mm)
    pub d100_mm: f64,
}

impl Gradation {
    /// Extrapolate the full curve from a computed D30 (mm).
    pub fn from_d30(d30_mm: f64) -> Self {
        Gradation {
            d15_mm: d30_mm * D15_RATIO,
            d30_mm,
            d50_mm: d30_mm * D50_RATIO,
            d85_mm: d30_mm * D85_RATIO,
            d100_mm: d30_mm * D100_RATIO,
        }
    }

    /// Diameters in ascending percentile order (mm).
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.d15_mm,
            self.d30_mm,
            self.d50_mm,
            self.d85_mm,
            self.d100_mm,
        ]
    }

    /// Uniformity coefficient Cu = D60/D10.
    ///
    /// D60 and D10 are not on the curve; they are approximated from D30 and
    /// D15 the way the USACE worksheets do (D60 ~ 1.15 x D30,
    /// D10 ~ 0.9 x D15). Cu > 4 indicates a well-graded mix.
    pub fn uniformity_coefficient(&self) -> f64 {
        let d60 = self.d30_mm * 1.15;
        let d10 = self.d15_mm * 0.9;
        d60 / d10
    }

    /// The nearest standard USACE class, if any is within 30% on D50.
    pub fn closest_class(&self) -> Option<GradationClass> {
        GradationClass::closest(self.d50_mm)
    }
}

// ============================================================================
// Standard USACE Gradation Classes
// ============================================================================

/// Nominal diameters and block-mass range for a standard gradation class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradationClassSpec {
    pub d15_mm: f64,
    pub d30_mm: f64,
    pub d50_mm: f64,
    pub d85_mm: f64,
    pub d100_mm: f64,
    /// Typical individual block mass range (kg)
    pub mass_range_kg: (f64, f64),
}

/// Standard USACE gradation classes, by nominal D50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradationClass {
    /// D50 ~ 125 mm
    I,
    /// D50 ~ 175 mm
    II,
    /// D50 ~ 250 mm
    III,
    /// D50 ~ 350 mm
    IV,
    /// D50 ~ 500 mm
    V,
    /// D50 ~ 650 mm
    VI,
}

impl GradationClass {
    /// All classes in ascending D50 order
    pub const ALL: [GradationClass; 6] = [
        GradationClass::I,
        GradationClass::II,
        GradationClass::III,
        GradationClass::IV,
        GradationClass::V,
        GradationClass::VI,
    ];

    /// Nominal diameters and mass range for this class
    pub fn spec(&self) -> GradationClassSpec {
        match self {
            GradationClass::I => GradationClassSpec {
                d15_mm: 70.0,
                d30_mm: 95.0,
                d50_mm: 125.0,
                d85_mm: 180.0,
                d100_mm: 200.0,
                mass_range_kg: (1.0, 15.0),
            },
            GradationClass::II => GradationClassSpec {
                d15_mm: 100.0,
                d30_mm: 135.0,
                d50_mm: 175.0,
                d85_mm: 250.0,
                d100_mm: 300.0,
                mass_range_kg: (5.0, 45.0),
            },
            GradationClass::III => GradationClassSpec {
                d15_mm: 140.0,
                d30_mm: 190.0,
                d50_mm: 250.0,
                d85_mm: 350.0,
                d100_mm: 425.0,
                mass_range_kg: (15.0, 125.0),
            },
            GradationClass::IV => GradationClassSpec {
                d15_mm: 200.0,
                d30_mm: 270.0,
                d50_mm: 350.0,
                d85_mm: 500.0,
                d100_mm: 600.0,
                mass_range_kg: (45.0, 350.0),
            },
            GradationClass::V => GradationClassSpec {
                d15_mm: 280.0,
                d30_mm: 385.0,
                d50_mm: 500.0,
                d85_mm: 700.0,
                d100_mm: 850.0,
                mass_range_kg: (125.0, 1000.0),
            },
            GradationClass::VI => GradationClassSpec {
                d15_mm: 360.0,
                d30_mm: 500.0,
                d50_mm: 650.0,
                d85_mm: 900.0,
                d100_mm: 1100.0,
                mass_range_kg: (350.0, 2000.0),
            },
        }
    }

    /// Display name ("Class III")
    pub fn display_name(&self) -> &'static str {
        match self {
            GradationClass::I => "Class I",
            GradationClass::II => "Class II",
            GradationClass::III => "Class III",
            GradationClass::IV => "Class IV",
            GradationClass::V => "Class V",
            GradationClass::VI => "Class VI",
        }
    }

    /// The nominal gradation for this class.
    pub fn standard_gradation(&self) -> Gradation {
        let spec = self.spec();
        Gradation {
            d15_mm: spec.d15_mm,
            d30_mm: spec.d30_mm,
            d50_mm: spec.d50_mm,
            d85_mm: spec.d85_mm,
            d100_mm: spec.d100_mm,
        }
    }

    /// Find the class whose nominal D50 is closest to the given value.
    ///
    /// Returns `None` when the nearest class is still more than 30% off,
    /// which callers should treat as a custom gradation.
    pub fn closest(d50_mm: f64) -> Option<GradationClass> {
        let mut best: Option<(GradationClass, f64)> = None;
        for class in GradationClass::ALL {
            let diff = (class.spec().d50_mm - d50_mm).abs();
            if best.map_or(true, |(_, d)| diff < d) {
                best = Some((class, diff));
            }
        }
        let (class, _) = best?;
        let ref_d50 = class.spec().d50_mm;
        if (d50_mm - ref_d50).abs() / ref_d50 > 0.30 {
            return None;
        }
        Some(class)
    }
}

// ============================================================================
// Block Masses
// ============================================================================

/// Equivalent spherical-block mass of a stone of diameter `d` (meters).
///
/// `m = (pi/6) x rho_s x d^3` with rho_s in kg/m3.
pub fn sphere_mass_kg(diameter_m: f64, density_kg_m3: f64) -> f64 {
    SPHERE_SHAPE_FACTOR * density_kg_m3 * diameter_m.powi(3)
}

/// Equivalent spherical diameter (mm) of a block of the given mass.
pub fn diameter_from_mass_mm(mass_kg: f64, specific_gravity: f64) -> CalcResult<f64> {
    if mass_kg <= 0.0 {
        return Err(CalcError::invalid_input(
            "mass_kg",
            mass_kg.to_string(),
            "Mass must be positive",
        ));
    }
    let density = specific_gravity * WATER_DENSITY_KG_M3;
    let diameter_m = (mass_kg / (SPHERE_SHAPE_FACTOR * density)).cbrt();
    Ok(diameter_m * 1000.0)
}

/// Equivalent-sphere masses (kg) for every diameter of a gradation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockMasses {
    pub d15_kg: f64,
    pub d30_kg: f64,
    pub d50_kg: f64,
    pub d85_kg: f64,
    pub d100_kg: f64,
}

impl BlockMasses {
    /// Compute masses for a gradation at the given relative density.
    pub fn for_gradation(gradation: &Gradation, specific_gravity: f64) -> Self {
        let density = specific_gravity * WATER_DENSITY_KG_M3;
        let mass = |d_mm: f64| sphere_mass_kg(d_mm / 1000.0, density);
        BlockMasses {
            d15_kg: mass(gradation.d15_mm),
            d30_kg: mass(gradation.d30_mm),
            d50_kg: mass(gradation.d50_mm),
            d85_kg: mass(gradation.d85_mm),
            d100_kg: mass(gradation.d100_mm),
        }
    }

    /// Masses in ascending percentile order (kg).
    pub fn as_array(&self) -> [f64; 5] {
        [
            self.d15_kg,
            self.d30_kg,
            self.d50_kg,
            self.d85_kg,
            self.d100_kg,
        ]
    }
}

// ============================================================================
// Layer Thickness and Quantities
// ============================================================================

/// Recommended layer thickness in meters: `max(D100, 1.5 x D50)`.
///
/// With the fixed gradation ratios `1.5 x D50 = 1.95 x D30 < D100`, so a
/// curve built by [`Gradation::from_d30`] always lands on the D100 branch;
/// the 1.5 x D50 branch governs for flatter user-specified gradations.
pub fn layer_thickness_m(d50_mm: f64, d100_mm: f64) -> f64 {
    (d100_mm.max(1.5 * d50_mm)) / 1000.0
}

/// Solid rock volume per square meter of protected surface (m3/m2).
pub fn volume_per_m2(thickness_m: f64, porosity: f64) -> f64 {
    thickness_m * (1.0 - porosity)
}

/// Placed rock mass per square meter of protected surface (kg/m2).
pub fn mass_per_m2(thickness_m: f64, specific_gravity: f64, porosity: f64) -> f64 {
    volume_per_m2(thickness_m, porosity) * specific_gravity * WATER_DENSITY_KG_M3
}

/// Total rock tonnage for a protected reach (tonnes).
pub fn reach_tonnage_t(
    length_m: f64,
    width_m: f64,
    thickness_m: f64,
    specific_gravity: f64,
    porosity: f64,
) -> f64 {
    length_m * width_m * mass_per_m2(thickness_m, specific_gravity, porosity) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradation_strictly_ordered() {
        for d30 in [10.0, 105.6, 517.0, 2000.0] {
            let grad = Gradation::from_d30(d30);
            let d = grad.as_array();
            for pair in d.windows(2) {
                assert!(pair[0] < pair[1], "gradation must be strictly increasing");
            }
        }
    }

    #[test]
    fn test_gradation_ratios() {
        let grad = Gradation::from_d30(100.0);
        assert!((grad.d15_mm - 70.0).abs() < 1e-9);
        assert!((grad.d50_mm - 130.0).abs() < 1e-9);
        assert!((grad.d85_mm - 170.0).abs() < 1e-9);
        assert!((grad.d100_mm - 210.0).abs() < 1e-9);
    }

    #[test]
    fn test_masses_monotonic() {
        let grad = Gradation::from_d30(180.0);
        let masses = BlockMasses::for_gradation(&grad, 2.65);
        let m = masses.as_array();
        for pair in m.windows(2) {
            assert!(pair[0] < pair[1], "mass must be monotonic in diameter");
        }
    }

    #[test]
    fn test_sphere_mass_spot_value() {
        // 235 mm stone at Ss = 2.65 weighs ~18 kg
        let mass = sphere_mass_kg(0.235, 2650.0);
        assert!((mass - 18.007).abs() < 0.01);
    }

    #[test]
    fn test_diameter_from_mass_roundtrip() {
        let mass = sphere_mass_kg(0.235, 2650.0);
        let d_mm = diameter_from_mass_mm(mass, 2.65).unwrap();
        assert!((d_mm - 235.0).abs() < 1e-6);

        assert!(diameter_from_mass_mm(-1.0, 2.65).is_err());
    }

    #[test]
    fn test_layer_thickness_branches() {
        // Steep curve: D100 governs
        assert!((layer_thickness_m(137.3, 221.7) - 0.2217).abs() < 1e-4);
        // Flat curve: 1.5 x D50 governs
        assert!((layer_thickness_m(200.0, 250.0) - 0.300).abs() < 1e-9);
    }

    #[test]
    fn test_thickness_covers_d100_for_derived_curves() {
        for d30 in [50.0, 105.6, 517.0] {
            let grad = Gradation::from_d30(d30);
            let t = layer_thickness_m(grad.d50_mm, grad.d100_mm);
            assert!(t >= grad.d100_mm / 1000.0);
        }
    }

    #[test]
    fn test_closest_class() {
        assert_eq!(GradationClass::closest(130.0), Some(GradationClass::I));
        assert_eq!(GradationClass::closest(250.0), Some(GradationClass::III));
        assert_eq!(GradationClass::closest(660.0), Some(GradationClass::VI));
        // More than 30% past Class VI: custom
        assert_eq!(GradationClass::closest(900.0), None);
    }

    #[test]
    fn test_standard_gradation_class_values() {
        let grad = GradationClass::III.standard_gradation();
        assert_eq!(grad.d50_mm, 250.0);
        assert_eq!(grad.d100_mm, 425.0);
    }

    #[test]
    fn test_uniformity_coefficient() {
        let grad = Gradation::from_d30(100.0);
        // (1.15 x 100) / (0.9 x 70) = 1.825
        assert!((grad.uniformity_coefficient() - 1.825).abs() < 0.001);
    }

    #[test]
    fn test_quantities() {
        let t = 0.30;
        let vol = volume_per_m2(t, DEFAULT_POROSITY);
        assert!((vol - 0.195).abs() < 1e-9);
        let mass = mass_per_m2(t, 2.65, DEFAULT_POROSITY);
        assert!((mass - 516.75).abs() < 0.01);
        let tonnage = reach_tonnage_t(100.0, 10.0, t, 2.65, DEFAULT_POROSITY);
        assert!((tonnage - 516.75).abs() < 0.01);
    }

    #[test]
    fn test_serialization() {
        let grad = Gradation::from_d30(180.0);
        let json = serde_json::to_string(&grad).unwrap();
        let roundtrip: Gradation = serde_json::from_str(&json).unwrap();
        assert_eq!(grad, roundtrip);
    }
}
