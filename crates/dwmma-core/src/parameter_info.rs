//! Parameter metadata types.
//!
//! - [`ParameterInfo`] - complete parameter description (key, name, default, flags)
//! - [`ParameterFlags`] - behavioral flags (automation, read-only, list)
//!
//! Names are owned strings: plugins with per-slot parameters ("Input 3
//! position x") build them at construction time rather than from literals.

use crate::types::{parameter_id, ParameterId, ParameterValue};

/// Flags controlling parameter behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterFlags {
    /// Parameter can be automated by the host.
    pub can_automate: bool,
    /// Parameter is read-only (display only).
    pub is_readonly: bool,
    /// Parameter should be displayed as a dropdown list of labels.
    pub is_list: bool,
}

impl Default for ParameterFlags {
    fn default() -> Self {
        Self {
            can_automate: true,
            is_readonly: false,
            is_list: false,
        }
    }
}

/// Metadata describing a single parameter.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    /// Unique parameter identifier, derived from `key`.
    pub id: ParameterId,
    /// Stable string key used for IDs and saved state (e.g. "input_2_pos_x").
    pub key: String,
    /// Display name (e.g. "Input 2 position x").
    pub name: String,
    /// Unit label (e.g. "m").
    pub units: &'static str,
    /// Default value in normalized form (0.0 to 1.0).
    pub default_normalized: ParameterValue,
    /// Number of discrete steps. 0 = continuous, 1 = toggle, >1 = discrete.
    pub step_count: i32,
    /// Behavioral flags.
    pub flags: ParameterFlags,
}

impl ParameterInfo {
    /// Create a continuous parameter description; the ID is hashed from `key`.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            id: parameter_id(&key),
            key,
            name: name.into(),
            units: "",
            default_normalized: 0.5,
            step_count: 0,
            flags: ParameterFlags::default(),
        }
    }

    /// Set the unit label.
    pub fn with_units(mut self, units: &'static str) -> Self {
        self.units = units;
        self
    }

    /// Set the default normalized value.
    pub fn with_default(mut self, default_normalized: ParameterValue) -> Self {
        self.default_normalized = default_normalized.clamp(0.0, 1.0);
        self
    }

    /// Set the step count.
    pub fn with_steps(mut self, step_count: i32) -> Self {
        self.step_count = step_count;
        self
    }

    /// Mark as a dropdown list.
    pub fn as_list(mut self) -> Self {
        self.flags.is_list = true;
        self
    }

    /// Returns true if this is a discrete parameter.
    pub fn is_discrete(&self) -> bool {
        self.step_count > 0
    }
}
