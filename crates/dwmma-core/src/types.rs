//! Common types used throughout the dwmma workspace.

// =============================================================================
// Audio Buffer Limits
// =============================================================================
//
// Upper bound for channel storage in a single bus. The largest microphone
// array preset produces 30 channels; 32 leaves room for the engine's own
// topology list without resizing the fixed storage in `Buffer`.
// =============================================================================

/// Maximum number of audio channels per bus.
///
/// Channels beyond this are ignored when a [`Buffer`](crate::Buffer) is built.
pub const MAX_CHANNELS: usize = 32;

/// Parameter identifier.
pub type ParameterId = u32;

/// Parameter value (normalized 0.0 to 1.0).
pub type ParameterValue = f64;

/// Derive a stable parameter ID from a string key.
///
/// FNV-1a, 32-bit. Deterministic across platforms and usable in `const`
/// context, so IDs survive reordering of the parameter list and stay valid in
/// saved host sessions.
///
/// ```
/// use dwmma_core::parameter_id;
///
/// const TOPOLOGY: u32 = parameter_id("ma_config");
/// assert_eq!(TOPOLOGY, parameter_id("ma_config"));
/// ```
#[inline]
pub const fn parameter_id(key: &str) -> ParameterId {
    const OFFSET_BASIS: u32 = 2_166_136_261;
    const PRIME: u32 = 16_777_619;

    let bytes = key.as_bytes();
    let mut hash = OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }
    hash
}
