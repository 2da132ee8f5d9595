use serde::{Deserialize, Serialize};

use crate::device::{DeviceColorState, DeviceError, DeviceSnapshot, Hsv};

pub const LIGHTING_SERVICE: &str = "smartlife.iot.smartbulb.lightingservice";

/// Response to `{"system":{"get_sysinfo":{}}}`.
#[derive(Debug, Deserialize)]
pub struct SysInfoResponse {
    pub system: SystemSection,
}

#[derive(Debug, Deserialize)]
pub struct SystemSection {
    pub get_sysinfo: SysInfo,
}

#[derive(Debug, Deserialize)]
pub struct SysInfo {
    #[serde(default)]
    pub err_code: i64,
    #[serde(default)]
    pub err_msg: Option<String>,
    pub light_state: LightState,
}

/// Live light state. While the bulb is off the color values move into
/// `dft_on_state`, which is what the bulb returns to when switched on.
#[derive(Debug, Deserialize)]
pub struct LightState {
    pub on_off: u8,
    #[serde(flatten)]
    pub values: LightValues,
    #[serde(default)]
    pub dft_on_state: Option<LightValues>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LightValues {
    #[serde(default)]
    pub hue: Option<u16>,
    #[serde(default)]
    pub saturation: Option<u8>,
    #[serde(default)]
    pub color_temp: Option<u16>,
    #[serde(default)]
    pub brightness: Option<u8>,
}

impl SysInfo {
    pub fn into_snapshot(self) -> Result<DeviceSnapshot, DeviceError> {
        if self.err_code != 0 {
            return Err(DeviceError::Rejected {
                code: self.err_code,
                message: self.err_msg.unwrap_or_default(),
            });
        }

        let power = self.light_state.on_off == 1;
        let values = match (power, self.light_state.dft_on_state) {
            (false, Some(default_on)) => default_on,
            _ => self.light_state.values,
        };

        let brightness = values.brightness.unwrap_or(100).min(100);
        let color = match values.color_temp {
            Some(kelvin) if kelvin > 0 => DeviceColorState::ColorTemp { kelvin },
            _ => DeviceColorState::Hsv(Hsv::new(
                values.hue.unwrap_or(0),
                values.saturation.unwrap_or(0),
                brightness,
            )),
        };

        Ok(DeviceSnapshot {
            power,
            brightness,
            color,
        })
    }
}

/// Body of a `transition_light_state` command.
#[derive(Debug, Default, Serialize)]
pub struct TransitionLightState {
    pub ignore_default: u8,
    pub on_off: u8,
    pub transition_period: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
}

impl TransitionLightState {
    pub fn color(color: Hsv, transition_ms: u64) -> Self {
        Self {
            ignore_default: 1,
            on_off: 1,
            transition_period: transition_ms,
            hue: Some(color.hue),
            saturation: Some(color.saturation),
            color_temp: Some(0),
            brightness: Some(color.value),
        }
    }

    pub fn restore(snapshot: DeviceSnapshot) -> Self {
        if !snapshot.power {
            return Self {
                ignore_default: 1,
                on_off: 0,
                ..Self::default()
            };
        }

        match snapshot.color {
            DeviceColorState::Hsv(hsv) => Self {
                brightness: Some(snapshot.brightness),
                ..Self::color(hsv, 0)
            },
            DeviceColorState::ColorTemp { kelvin } => Self {
                ignore_default: 1,
                on_off: 1,
                color_temp: Some(kelvin),
                brightness: Some(snapshot.brightness),
                ..Self::default()
            },
        }
    }
}

/// Response to a lighting service command.
#[derive(Debug, Deserialize)]
pub struct LightingServiceResponse {
    #[serde(rename = "smartlife.iot.smartbulb.lightingservice")]
    pub service: LightingServiceSection,
}

#[derive(Debug, Deserialize)]
pub struct LightingServiceSection {
    pub transition_light_state: CommandStatus,
}

#[derive(Debug, Deserialize)]
pub struct CommandStatus {
    #[serde(default)]
    pub err_code: i64,
    #[serde(default)]
    pub err_msg: Option<String>,
}

impl CommandStatus {
    pub fn into_result(self) -> Result<(), DeviceError> {
        if self.err_code == 0 {
            Ok(())
        } else {
            Err(DeviceError::Rejected {
                code: self.err_code,
                message: self.err_msg.unwrap_or_default(),
            })
        }
    }
}
