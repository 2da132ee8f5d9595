//! Notification device contract and the smart bulb implementation.

pub mod error;
pub mod kasa;

use std::time::Duration;

use futures::future::BoxFuture;

pub use self::error::{DeviceError, DeviceResult};

/// Hue (0–360), saturation (0–100) and value (0–100) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue in degrees.
    pub hue: u16,
    /// Saturation percentage.
    pub saturation: u8,
    /// Value (brightness) percentage.
    pub value: u8,
}

impl Hsv {
    /// Build a triple, clamping each component into its valid range.
    pub const fn new(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            hue: if hue > 360 { 360 } else { hue },
            saturation: if saturation > 100 { 100 } else { saturation },
            value: if value > 100 { 100 } else { value },
        }
    }
}

/// Color mode a device was in when it was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceColorState {
    /// Explicit color.
    Hsv(Hsv),
    /// White light at a color temperature.
    ColorTemp {
        /// Temperature in kelvin.
        kelvin: u16,
    },
}

/// Device state captured at startup and restored after every burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSnapshot {
    /// Whether the light was on.
    pub power: bool,
    /// Brightness percentage (0–100).
    pub brightness: u8,
    /// Color mode and its parameters.
    pub color: DeviceColorState,
}

/// Warm white at full brightness, used when the real state could not be captured.
impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self {
            power: true,
            brightness: 100,
            color: DeviceColorState::ColorTemp { kelvin: 2700 },
        }
    }
}

/// Exclusive, stateful light driven by goal notifications.
///
/// Callers are expected to serialize access; implementations do not guard
/// against interleaved commands.
pub trait NotificationDevice: Send + Sync {
    /// Read the current state so it can be restored later.
    fn capture_state(&self) -> BoxFuture<'static, DeviceResult<DeviceSnapshot>>;
    /// Switch to `color`, fading over `fade`.
    fn set_color(&self, color: Hsv, fade: Duration) -> BoxFuture<'static, DeviceResult<()>>;
    /// Put the device back into a previously captured state.
    fn restore_state(&self, snapshot: DeviceSnapshot) -> BoxFuture<'static, DeviceResult<()>>;
}
