use crate::DEFAULT_DEVICE_MOCK;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Use the in-memory device instead of real hardware
    pub mock: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mock: DEFAULT_DEVICE_MOCK,
        }
    }
}
