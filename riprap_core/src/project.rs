//! # Project Data Structures
//!
//! The `Project` struct is the root container for a study: named sizing
//! scenarios with their stored results, plus metadata and defaults.
//!
//! The engine neither reads nor writes files; this module only guarantees
//! that a project serializes cleanly to JSON so the surrounding application
//! can persist, reload, and deterministically re-run it.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, engineer, location, timestamps)
//! ├── settings: GlobalSettings (default material, porosity)
//! └── scenarios: HashMap<Uuid, Scenario> (input + stored result)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use riprap_core::project::Project;
//! use riprap_core::calculations::RiprapInput;
//! use riprap_core::coefficients::{ChannelConfig, SlopeConfig};
//! use riprap_core::materials::MaterialCoefficients;
//!
//! let mut project = Project::new("PK 12 revetment", "Jane Engineer", "River Aa");
//!
//! let id = project.add_scenario(RiprapInput {
//!     label: "Design flood".to_string(),
//!     velocity_ms: 2.5,
//!     depth_m: 2.0,
//!     channel: ChannelConfig::Straight,
//!     slope: SlopeConfig::Bed,
//!     material: MaterialCoefficients::default(),
//! });
//!
//! let failures = project.recalculate_all();
//! assert!(failures.is_empty());
//! assert!(project.get_scenario(&id).unwrap().result.is_some());
//!
//! // Serialize for storage by the (out-of-scope) application layer
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::riprap::{calculate, RiprapInput, RiprapResult, StabilityStatus};
use crate::errors::{CalcError, CalcResult};
use crate::gradation::DEFAULT_POROSITY;
use crate::materials::MaterialCoefficients;

/// Current schema version for serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// A named sizing scenario: one input and, once computed, its result.
///
/// Scenarios are independent value objects; no scenario references another,
/// so comparison across scenarios is plain collection work for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Calculation input (carries the user-facing label)
    pub input: RiprapInput,

    /// Stored result; `None` until computed or after a failed recalculation
    pub result: Option<RiprapResult>,
}

impl Scenario {
    /// Create a scenario that has not been computed yet.
    pub fn new(input: RiprapInput) -> Self {
        Scenario {
            input,
            result: None,
        }
    }

    /// Run the engine and store the result.
    ///
    /// A failure clears any previously stored result so a stale result can
    /// never outlive an edit that invalidated the input.
    pub fn recalculate(&mut self) -> CalcResult<()> {
        match calculate(&self.input) {
            Ok(result) => {
                self.result = Some(result);
                Ok(())
            }
            Err(err) => {
                self.result = None;
                Err(err)
            }
        }
    }

    /// Status for display: the computed status, or `Error` when the last
    /// recalculation failed (the stored-status fold for boundary layers).
    pub fn status(&self) -> StabilityStatus {
        self.result
            .as_ref()
            .map(|r| r.status)
            .unwrap_or(StabilityStatus::Error)
    }
}

/// Root project container.
///
/// Scenarios are stored in a flat UUID-keyed map for O(1) lookups and stable
/// references when the caller reorders its own views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, engineer, location, timestamps)
    pub meta: ProjectMetadata,

    /// Global settings (default material, porosity)
    pub settings: GlobalSettings,

    /// All scenarios, keyed by UUID
    pub scenarios: HashMap<Uuid, Scenario>,
}

impl Project {
    /// Create a new empty project.
    ///
    /// # Arguments
    ///
    /// * `name` - Project title
    /// * `engineer` - Name of the responsible engineer
    /// * `location` - Site or reach description
    pub fn new(
        name: impl Into<String>,
        engineer: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                engineer: engineer.into(),
                location: location.into(),
                notes: String::new(),
                created: now,
                modified: now,
            },
            settings: GlobalSettings::default(),
            scenarios: HashMap::new(),
        }
    }

    /// Add a scenario to the project.
    ///
    /// Returns the UUID assigned to the scenario. The result is left empty;
    /// call [`Project::recalculate_all`] or the scenario's own
    /// [`Scenario::recalculate`] to compute it.
    pub fn add_scenario(&mut self, input: RiprapInput) -> Uuid {
        let id = Uuid::new_v4();
        self.scenarios.insert(id, Scenario::new(input));
        self.touch();
        id
    }

    /// Remove a scenario by UUID.
    ///
    /// Returns the removed scenario if it existed.
    pub fn remove_scenario(&mut self, id: &Uuid) -> Option<Scenario> {
        let scenario = self.scenarios.remove(id);
        if scenario.is_some() {
            self.touch();
        }
        scenario
    }

    /// Get a scenario by UUID.
    pub fn get_scenario(&self, id: &Uuid) -> Option<&Scenario> {
        self.scenarios.get(id)
    }

    /// Get a mutable reference to a scenario by UUID.
    ///
    /// Getting a mutable reference marks the project as modified.
    pub fn get_scenario_mut(&mut self, id: &Uuid) -> Option<&mut Scenario> {
        if self.scenarios.contains_key(id) {
            self.meta.modified = Utc::now();
            self.scenarios.get_mut(id)
        } else {
            None
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Number of scenarios in the project.
    pub fn scenario_count(&self) -> usize {
        self.scenarios.len()
    }

    /// Serialize the project to pretty-printed JSON.
    ///
    /// The application layer owns where the string goes (file, clipboard,
    /// network); the engine only guarantees a clean schema.
    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CalcError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// Deserialize a project from JSON, validating the schema version.
    pub fn from_json(json: &str) -> CalcResult<Project> {
        let project: Project =
            serde_json::from_str(json).map_err(|e| CalcError::SerializationError {
                reason: e.to_string(),
            })?;
        validate_version(&project.meta.version)?;
        Ok(project)
    }

    /// Re-run every scenario deterministically.
    ///
    /// Successes are stored on their scenarios; failures are returned so the
    /// caller can surface them per scenario (the failed scenarios report
    /// [`StabilityStatus::Error`] until their inputs are corrected).
    pub fn recalculate_all(&mut self) -> Vec<(Uuid, CalcError)> {
        let mut failures = Vec::new();
        for (id, scenario) in &mut self.scenarios {
            if let Err(err) = scenario.recalculate() {
                failures.push((*id, err));
            }
        }
        if !self.scenarios.is_empty() {
            self.meta.modified = Utc::now();
        }
        failures
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("", "", "")
    }
}

/// Validate that a serialized version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions a newer minor version is also a breaking change
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project title
    pub name: String,

    /// Name of the responsible engineer
    pub engineer: String,

    /// Site or reach description
    pub location: String,

    /// Free-form notes
    pub notes: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Global project settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Default material coefficients for new scenarios
    pub default_material: MaterialCoefficients,

    /// Placed-riprap porosity used for quantity estimates
    pub porosity: f64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        GlobalSettings {
            default_material: MaterialCoefficients::default(),
            porosity: DEFAULT_POROSITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coefficients::{ChannelConfig, SlopeConfig};

    fn sample_input(label: &str, velocity_ms: f64) -> RiprapInput {
        RiprapInput {
            label: label.to_string(),
            velocity_ms,
            depth_m: 2.0,
            channel: ChannelConfig::Straight,
            slope: SlopeConfig::Bed,
            material: MaterialCoefficients::default(),
        }
    }

    #[test]
    fn test_project_creation() {
        let project = Project::new("PK 12 revetment", "Jane Engineer", "River Aa");
        assert_eq!(project.meta.name, "PK 12 revetment");
        assert_eq!(project.meta.engineer, "Jane Engineer");
        assert_eq!(project.meta.location, "River Aa");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.scenario_count(), 0);
    }

    #[test]
    fn test_add_remove_scenario() {
        let mut project = Project::new("Test", "Engineer", "Site");
        let id = project.add_scenario(sample_input("Design flood", 2.5));
        assert_eq!(project.scenario_count(), 1);
        assert!(project.get_scenario(&id).is_some());

        let removed = project.remove_scenario(&id);
        assert!(removed.is_some());
        assert_eq!(project.scenario_count(), 0);
    }

    #[test]
    fn test_recalculate_all_stores_results() {
        let mut project = Project::new("Test", "Engineer", "Site");
        let a = project.add_scenario(sample_input("Low flow", 1.5));
        let b = project.add_scenario(sample_input("Design flood", 3.5));

        let failures = project.recalculate_all();
        assert!(failures.is_empty());
        assert!(project.get_scenario(&a).unwrap().result.is_some());
        assert!(project.get_scenario(&b).unwrap().result.is_some());

        // Higher velocity needs bigger stone
        let d30_low = project.get_scenario(&a).unwrap().result.as_ref().unwrap();
        let d30_high = project.get_scenario(&b).unwrap().result.as_ref().unwrap();
        assert!(d30_high.gradation.d30_mm > d30_low.gradation.d30_mm);
    }

    #[test]
    fn test_failed_scenario_reports_error_status() {
        let mut project = Project::new("Test", "Engineer", "Site");
        let id = project.add_scenario(sample_input("Broken", -1.0));

        let failures = project.recalculate_all();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, id);

        let scenario = project.get_scenario(&id).unwrap();
        assert!(scenario.result.is_none());
        assert_eq!(scenario.status(), StabilityStatus::Error);
    }

    #[test]
    fn test_failure_clears_stale_result() {
        let mut scenario = Scenario::new(sample_input("Edited", 2.5));
        scenario.recalculate().unwrap();
        assert!(scenario.result.is_some());

        scenario.input.velocity_ms = -1.0;
        assert!(scenario.recalculate().is_err());
        assert!(scenario.result.is_none());
    }

    #[test]
    fn test_project_json_roundtrip() {
        let mut project = Project::new("PK 12", "Jane", "River Aa");
        project.add_scenario(sample_input("Design flood", 2.5));
        project.recalculate_all();

        let json = project.to_json().unwrap();
        assert!(json.contains("PK 12"));
        assert!(json.contains("Design flood"));

        let roundtrip = Project::from_json(&json).unwrap();
        assert_eq!(roundtrip.meta.name, "PK 12");
        assert_eq!(roundtrip.scenario_count(), 1);
    }

    #[test]
    fn test_version_validation() {
        let mut project = Project::new("Test", "Engineer", "Site");
        project.meta.version = "1.0.0".to_string();
        let json = project.to_json().unwrap();

        let err = Project::from_json(&json).unwrap_err();
        assert_eq!(err.error_code(), "VERSION_MISMATCH");
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let err = Project::from_json("{ not json").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }
}
