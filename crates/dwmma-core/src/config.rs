//! Shared plugin metadata.
//!
//! Declared once as a `static` and read by whatever host binding exposes the
//! plugin, and by log messages that need to name it.
//!
//! ```
//! use dwmma_core::PluginConfig;
//!
//! pub static CONFIG: PluginConfig = PluginConfig::new("Mic Array Simulator")
//!     .with_vendor("Acme Acoustics")
//!     .with_version("0.3.0")
//!     .with_sub_categories("Fx|Spatial");
//!
//! assert_eq!(CONFIG.vendor, "Acme Acoustics");
//! ```

/// Format-agnostic plugin metadata.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Plugin name displayed in the DAW.
    pub name: &'static str,
    /// Vendor/company name.
    pub vendor: &'static str,
    /// Plugin version string.
    pub version: &'static str,
    /// Pipe-separated sub-categories like "Fx|Spatial".
    pub sub_categories: &'static str,
}

impl PluginConfig {
    /// Metadata with placeholder vendor and version.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            vendor: "Unknown Vendor",
            version: "1.0.0",
            sub_categories: "Fx",
        }
    }

    /// Set the vendor name.
    pub const fn with_vendor(mut self, vendor: &'static str) -> Self {
        self.vendor = vendor;
        self
    }

    /// Set the version string.
    pub const fn with_version(mut self, version: &'static str) -> Self {
        self.version = version;
        self
    }

    /// Set the sub-categories.
    pub const fn with_sub_categories(mut self, sub_categories: &'static str) -> Self {
        self.sub_categories = sub_categories;
        self
    }
}
