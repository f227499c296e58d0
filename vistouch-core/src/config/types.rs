//! Configuration type definitions
//!
//! These types describe the picking surface and editing defaults. A board
//! can keep them in flash as postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration layout version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum page, object and process name length
pub const MAX_NAME_LEN: usize = 32;

/// Maximum text object length
pub const MAX_TEXT_LEN: usize = 64;

/// Maximum image path length
pub const MAX_PATH_LEN: usize = 64;

/// Default picking surface width
pub const DEFAULT_PICK_WIDTH: u16 = 320;

/// Default picking surface height
pub const DEFAULT_PICK_HEIGHT: u16 = 240;

/// Usable pick color range
///
/// Surfaces with fewer bits per pixel can tell fewer objects apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PickDepth {
    /// 8-bit codes, 255 objects per page
    Bits8,
    /// 16-bit codes, 65535 objects per page
    #[default]
    Bits16,
}

impl PickDepth {
    /// Highest code that may be handed out
    pub const fn max_code(self) -> u16 {
        match self {
            PickDepth::Bits8 => u8::MAX as u16,
            PickDepth::Bits16 => u16::MAX,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Layout version, must equal [`CONFIG_VERSION`]
    pub version: u8,
    /// Picking surface width in pixels
    pub pick_width: u16,
    /// Picking surface height in pixels
    pub pick_height: u16,
    /// Pick color range
    pub pick_depth: PickDepth,
    /// Start in batch mode so edits wait for `end_edit`
    pub batch_by_default: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            pick_width: DEFAULT_PICK_WIDTH,
            pick_height: DEFAULT_PICK_HEIGHT,
            pick_depth: PickDepth::Bits16,
            batch_by_default: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Binary data could not be decoded
    Deserialize,
    /// Stored layout version differs from [`CONFIG_VERSION`]
    VersionMismatch,
    /// Picking surface has a zero dimension
    InvalidSurface,
}

impl EngineConfig {
    /// Configuration for a given picking surface size
    pub fn with_surface(width: u16, height: u16) -> Self {
        Self {
            pick_width: width,
            pick_height: height,
            ..Self::default()
        }
    }

    /// Check version and surface size
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch);
        }
        if self.pick_width == 0 || self.pick_height == 0 {
            return Err(ConfigError::InvalidSurface);
        }
        Ok(())
    }

    /// Decode and validate a postcard blob
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.pick_width, 320);
        assert_eq!(config.pick_height, 240);
        assert_eq!(config.pick_depth, PickDepth::Bits16);
        assert!(!config.batch_by_default);
    }

    #[test]
    fn test_zero_surface_rejected() {
        assert_eq!(
            EngineConfig::with_surface(0, 240).validate(),
            Err(ConfigError::InvalidSurface)
        );
        assert_eq!(
            EngineConfig::with_surface(320, 0).validate(),
            Err(ConfigError::InvalidSurface)
        );
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let config = EngineConfig {
            version: CONFIG_VERSION + 1,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::VersionMismatch));
    }

    #[test]
    fn test_depth_limits() {
        assert_eq!(PickDepth::Bits8.max_code(), 255);
        assert_eq!(PickDepth::Bits16.max_code(), 65535);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_decode() {
        let config = EngineConfig {
            pick_depth: PickDepth::Bits8,
            batch_by_default: true,
            ..EngineConfig::with_surface(128, 64)
        };
        let bytes = postcard::to_allocvec(&config).unwrap();
        assert_eq!(EngineConfig::from_postcard(&bytes), Ok(config));

        // Truncated blob
        assert_eq!(
            EngineConfig::from_postcard(&bytes[..1]),
            Err(ConfigError::Deserialize)
        );
    }
}
