//! Parameter types with encapsulated atomic storage.
//!
//! Every parameter stores its current value in an atomic, so a control thread
//! can write while the audio thread reads without locks. Values are kept in
//! normalized form (or as a bool / variant index) and mapped to plain units
//! on read.
//!
//! - [`FloatParameter`] - continuous values with range mapping
//! - [`BoolParameter`] - toggles
//! - [`ChoiceParameter`] - one of a fixed list of variants (use with `#[derive(Choice)]`)
//!
//! Collections implement [`Parameters`], which provides type-erased iteration
//! and a compact binary state format.

use std::marker::PhantomData;
use std::ops::RangeInclusive;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use crate::parameter_format::Formatter;
use crate::parameter_info::{ParameterFlags, ParameterInfo};
use crate::parameter_range::{LinearMapper, RangeMapper};
use crate::types::{ParameterId, ParameterValue};

// =============================================================================
// ParameterRef Trait - Type-erased parameter access
// =============================================================================

/// Type-erased access to a single parameter.
///
/// Implementations must be lock-free: the getters are called from the audio
/// thread, the setters from host and UI threads.
pub trait ParameterRef: Send + Sync {
    /// Full metadata.
    fn info(&self) -> &ParameterInfo;

    /// Current normalized value (0.0-1.0).
    fn get_normalized(&self) -> ParameterValue;

    /// Set the normalized value. Values are clamped to [0.0, 1.0].
    fn set_normalized(&self, value: ParameterValue);

    /// Convert a normalized value to plain units.
    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue;

    /// Convert a plain value to normalized.
    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue;

    /// Format a normalized value for display.
    fn display_normalized(&self, normalized: ParameterValue) -> String;

    /// Parse a display string to a normalized value.
    fn parse(&self, s: &str) -> Option<ParameterValue>;

    /// Unique ID.
    fn id(&self) -> ParameterId {
        self.info().id
    }

    /// Stable string key.
    fn key(&self) -> &str {
        &self.info().key
    }

    /// Display name.
    fn name(&self) -> &str {
        &self.info().name
    }

    /// Behavioral flags.
    fn flags(&self) -> &ParameterFlags {
        &self.info().flags
    }

    /// Current plain value in natural units.
    fn get_plain(&self) -> ParameterValue {
        self.normalized_to_plain(self.get_normalized())
    }

    /// Set the plain value in natural units.
    fn set_plain(&self, value: ParameterValue) {
        self.set_normalized(self.plain_to_normalized(value));
    }

    /// Format the current value for display.
    fn display(&self) -> String {
        self.display_normalized(self.get_normalized())
    }

    /// Restore the default value.
    fn reset_to_default(&self) {
        self.set_normalized(self.info().default_normalized);
    }
}

// =============================================================================
// Parameters Trait - Parameter collection
// =============================================================================

/// A collection of parameters exposed to the host.
///
/// # State format
///
/// [`save_state`](Self::save_state) writes one entry per parameter:
/// `[key_len: u8][key: utf8][normalized: f64 LE]`. Keys rather than numeric
/// IDs are stored so the state stays readable by humans and robust against
/// reordering. [`load_state`](Self::load_state) ignores unknown keys, so
/// sessions saved by newer builds still load.
pub trait Parameters: Send + Sync {
    /// Total number of parameters.
    fn count(&self) -> usize;

    /// Iterate over all parameters (type-erased).
    fn iter(&self) -> Box<dyn Iterator<Item = &dyn ParameterRef> + '_>;

    /// Look up a parameter by ID.
    fn by_id(&self, id: ParameterId) -> Option<&dyn ParameterRef> {
        self.iter().find(|p| p.id() == id)
    }

    /// Look up a parameter by string key.
    fn by_key(&self, key: &str) -> Option<&dyn ParameterRef> {
        self.iter().find(|p| p.key() == key)
    }

    /// Restore every parameter to its default value.
    fn reset_to_defaults(&self) {
        for parameter in self.iter() {
            parameter.reset_to_default();
        }
    }

    /// Serialize all parameters to bytes.
    fn save_state(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.count() * 24);
        for parameter in self.iter() {
            let key = parameter.key().as_bytes();
            let Ok(len) = u8::try_from(key.len()) else {
                continue;
            };
            data.push(len);
            data.extend_from_slice(key);
            data.extend_from_slice(&parameter.get_normalized().to_le_bytes());
        }
        data
    }

    /// Restore parameters from bytes written by [`save_state`](Self::save_state).
    ///
    /// Returns the number of parameters that were restored. Entries with
    /// unknown keys or invalid UTF-8 are skipped; a truncated trailing entry
    /// ends parsing. A non-finite value rejects the whole blob and leaves
    /// every parameter untouched.
    fn load_state(&self, data: &[u8]) -> Result<usize, String> {
        let mut pending: Vec<(&dyn ParameterRef, f64)> = Vec::new();
        let mut cursor = 0;

        while cursor < data.len() {
            let key_len = data[cursor] as usize;
            cursor += 1;

            if cursor + key_len + 8 > data.len() {
                break;
            }

            let key = std::str::from_utf8(&data[cursor..cursor + key_len]).ok();
            cursor += key_len;

            let value_bytes: [u8; 8] = data[cursor..cursor + 8]
                .try_into()
                .map_err(|_| "Invalid state data".to_string())?;
            let value = f64::from_le_bytes(value_bytes);
            cursor += 8;

            if !value.is_finite() {
                return Err(format!("non-finite value for '{}'", key.unwrap_or("?")));
            }

            if let Some(parameter) = key.and_then(|k| self.by_key(k)) {
                pending.push((parameter, value));
            }
        }

        for (parameter, value) in &pending {
            parameter.set_normalized(*value);
        }
        Ok(pending.len())
    }
}

// =============================================================================
// FloatParameter
// =============================================================================

/// Float parameter with atomic storage and linear range mapping.
///
/// ```
/// use dwmma_core::{FloatParameter, ParameterRef};
///
/// let x = FloatParameter::meters("pos_x", "Position x", 1.0, 0.0..=4.0);
/// x.set(9.0);
/// assert_eq!(x.get(), 4.0);
/// assert_eq!(x.display(), "4.00 m");
/// ```
pub struct FloatParameter {
    info: ParameterInfo,
    /// Normalized value (0.0-1.0) stored as f64 bits
    value: AtomicU64,
    range: LinearMapper,
    formatter: Formatter,
}

impl FloatParameter {
    /// Create a float parameter with linear mapping and plain-number display.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        default: f64,
        range: RangeInclusive<f64>,
    ) -> Self {
        Self::with_formatter(key, name, default, range, Formatter::default())
    }

    /// Create a distance parameter in metres.
    pub fn meters(
        key: impl Into<String>,
        name: impl Into<String>,
        default: f64,
        range: RangeInclusive<f64>,
    ) -> Self {
        Self::with_formatter(key, name, default, range, Formatter::Meters { precision: 2 })
    }

    fn with_formatter(
        key: impl Into<String>,
        name: impl Into<String>,
        default: f64,
        range: RangeInclusive<f64>,
        formatter: Formatter,
    ) -> Self {
        let range = LinearMapper::new(range);
        let default_normalized = range.normalize(default);
        Self {
            info: ParameterInfo::new(key, name)
                .with_units(formatter.units())
                .with_default(default_normalized),
            value: AtomicU64::new(default_normalized.to_bits()),
            range,
            formatter,
        }
    }

    /// Current plain value in natural units.
    #[inline]
    pub fn get(&self) -> f64 {
        self.range
            .denormalize(f64::from_bits(self.value.load(Ordering::Relaxed)))
    }

    /// Set the plain value; out-of-range values are clamped.
    #[inline]
    pub fn set(&self, value: f64) {
        let normalized = self.range.normalize(value);
        self.value.store(normalized.to_bits(), Ordering::Relaxed);
    }

    /// Plain value range as (min, max).
    pub fn range(&self) -> (f64, f64) {
        self.range.range()
    }
}

impl ParameterRef for FloatParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }

    fn set_normalized(&self, value: ParameterValue) {
        self.value
            .store(value.clamp(0.0, 1.0).to_bits(), Ordering::Relaxed);
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        self.range.denormalize(normalized)
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        self.range.normalize(plain)
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        self.formatter.format(self.range.denormalize(normalized))
    }

    fn parse(&self, s: &str) -> Option<ParameterValue> {
        let plain = self.formatter.parse(s)?;
        Some(self.range.normalize(plain))
    }
}

// =============================================================================
// BoolParameter
// =============================================================================

/// Toggle parameter with atomic storage.
pub struct BoolParameter {
    info: ParameterInfo,
    value: AtomicBool,
}

impl BoolParameter {
    /// Create a toggle parameter.
    pub fn new(key: impl Into<String>, name: impl Into<String>, default: bool) -> Self {
        Self {
            info: ParameterInfo::new(key, name)
                .with_default(if default { 1.0 } else { 0.0 })
                .with_steps(1),
            value: AtomicBool::new(default),
        }
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> bool {
        self.value.load(Ordering::Relaxed)
    }

    /// Set the value.
    #[inline]
    pub fn set(&self, value: bool) {
        self.value.store(value, Ordering::Relaxed);
    }
}

impl ParameterRef for BoolParameter {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        if self.get() {
            1.0
        } else {
            0.0
        }
    }

    fn set_normalized(&self, value: ParameterValue) {
        self.set(value > 0.5);
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        if normalized > 0.5 {
            1.0
        } else {
            0.0
        }
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        self.normalized_to_plain(plain)
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        Formatter::Boolean.format(normalized)
    }

    fn parse(&self, s: &str) -> Option<ParameterValue> {
        Formatter::Boolean.parse(s)
    }
}

// =============================================================================
// ChoiceValue / ChoiceParameter
// =============================================================================

/// An enum usable as a [`ChoiceParameter`] value.
///
/// Implement with `#[derive(Choice)]` from `dwmma-macros`; the derive
/// reads `#[name = "..."]` labels and an optional `#[default]` variant.
pub trait ChoiceValue: Copy + PartialEq + Send + Sync + 'static {
    /// Number of variants.
    const COUNT: usize;

    /// Index of the default variant.
    const DEFAULT_INDEX: usize;

    /// Variant at `index`, if any.
    fn from_index(index: usize) -> Option<Self>;

    /// Index of this variant.
    fn to_index(self) -> usize;

    /// The default variant.
    fn default_value() -> Self;

    /// Display label of the variant at `index`.
    fn name(index: usize) -> &'static str;

    /// All display labels in order.
    fn names() -> &'static [&'static str];
}

/// Choice parameter holding one variant of `E`.
pub struct ChoiceParameter<E: ChoiceValue> {
    info: ParameterInfo,
    /// Variant index
    value: AtomicUsize,
    _marker: PhantomData<E>,
}

impl<E: ChoiceValue> ChoiceParameter<E> {
    /// Create a choice parameter defaulting to `E::default_value()`.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        let default_index = E::DEFAULT_INDEX.min(E::COUNT.saturating_sub(1));
        Self {
            info: ParameterInfo::new(key, name)
                .with_default(index_to_normalized(default_index, E::COUNT))
                .with_steps(E::COUNT.saturating_sub(1) as i32)
                .as_list(),
            value: AtomicUsize::new(default_index),
            _marker: PhantomData,
        }
    }

    /// Current variant.
    ///
    /// Falls back to the default variant if the stored index is invalid.
    #[inline]
    pub fn get(&self) -> E {
        E::from_index(self.value.load(Ordering::Relaxed)).unwrap_or_else(E::default_value)
    }

    /// Index of the current variant.
    #[inline]
    pub fn index(&self) -> usize {
        self.value.load(Ordering::Relaxed)
    }

    /// Select a variant.
    #[inline]
    pub fn set(&self, value: E) {
        self.value.store(value.to_index(), Ordering::Relaxed);
    }
}

impl<E: ChoiceValue> ParameterRef for ChoiceParameter<E> {
    fn info(&self) -> &ParameterInfo {
        &self.info
    }

    fn get_normalized(&self) -> ParameterValue {
        index_to_normalized(self.index(), E::COUNT)
    }

    fn set_normalized(&self, value: ParameterValue) {
        self.value
            .store(normalized_to_index(value, E::COUNT), Ordering::Relaxed);
    }

    fn normalized_to_plain(&self, normalized: ParameterValue) -> ParameterValue {
        normalized_to_index(normalized, E::COUNT) as f64
    }

    fn plain_to_normalized(&self, plain: ParameterValue) -> ParameterValue {
        let index = plain.round().max(0.0) as usize;
        index_to_normalized(index.min(E::COUNT.saturating_sub(1)), E::COUNT)
    }

    fn display_normalized(&self, normalized: ParameterValue) -> String {
        E::name(normalized_to_index(normalized, E::COUNT)).to_string()
    }

    fn parse(&self, s: &str) -> Option<ParameterValue> {
        let s = s.trim();
        if let Some(i) = E::names().iter().position(|n| n.eq_ignore_ascii_case(s)) {
            return Some(index_to_normalized(i, E::COUNT));
        }
        s.parse::<usize>()
            .ok()
            .filter(|&i| i < E::COUNT)
            .map(|i| index_to_normalized(i, E::COUNT))
    }
}

/// Variant index to normalized value: index 0 → 0.0, last → 1.0.
#[inline]
fn index_to_normalized(index: usize, count: usize) -> f64 {
    if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    }
}

/// Normalized value to the nearest variant index, clamped to the variant count.
#[inline]
fn normalized_to_index(normalized: f64, count: usize) -> usize {
    if count <= 1 {
        0
    } else {
        ((normalized.clamp(0.0, 1.0) * (count - 1) as f64).round() as usize).min(count - 1)
    }
}
