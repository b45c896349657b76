//! Application-wide constants
//!
//! Single source of truth for the magic numbers and string literals used
//! throughout the engine.

/// Display identifier constants
pub mod ids {
    /// Low bits of a target id that identify the physical output and survive
    /// reboots and driver reloads. The high bits are reassigned by the OS.
    pub const TARGET_ID_STABLE_MASK: u32 = 0xFFFF;
}

/// Configuration file locations
pub mod config {
    /// Directory under the user config dir holding our files
    pub const APP_DIR: &str = "monitor-switcher";

    /// Configuration file name
    pub const FILENAME: &str = "config.toml";

    /// Subdirectory holding saved profiles
    pub const PROFILES_DIR: &str = "profiles";

    /// File extension for saved profiles
    pub const PROFILE_EXTENSION: &str = "json";
}
