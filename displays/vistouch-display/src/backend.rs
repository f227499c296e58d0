//! Surface errors

/// Surface construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Not enough heap for the pixel buffer
    AllocationFailed,
    /// Width or height is zero, or the pixel count overflows
    InvalidDimensions,
}
