use serde;
use serde::{Deserialize, Serialize};

// Number of samples kept per channel for trend display.
pub const HISTORY_LEN: usize = 30;

// One simulated multi-channel sensor snapshot. A new Reading is produced each
// tick; readings are never mutated in place.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Reading {
    // Temperature in degrees Celsius, one decimal.
    pub temperature: f64,
    // Relative humidity in percent, one decimal.
    pub humidity: f64,
    // Soil moisture in percent, one decimal.
    pub soil_moisture: f64,
    // CO2 concentration in ppm.
    pub co2: i32,
    // Light intensity in lux.
    pub light_intensity: i32,
    // Display time-of-day string, stamped at generation.
    pub timestamp: String,
}

// Fixed-length rolling window of past samples per channel, oldest first.
// Every update drops exactly the oldest sample and appends exactly one new
// one, so the length stays HISTORY_LEN from tick 0 onward.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SensorHistory {
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub soil_moisture: Vec<f64>,
    pub co2: Vec<i32>,
    pub light_intensity: Vec<i32>,
}

impl SensorHistory {
    // The initial fill repeats the seed reading so charts have a full window
    // immediately.
    pub fn new(seed: &Reading) -> Self {
        Self {
            temperature: vec![seed.temperature; HISTORY_LEN],
            humidity: vec![seed.humidity; HISTORY_LEN],
            soil_moisture: vec![seed.soil_moisture; HISTORY_LEN],
            co2: vec![seed.co2; HISTORY_LEN],
            light_intensity: vec![seed.light_intensity; HISTORY_LEN],
        }
    }

    pub fn record(&mut self, reading: &Reading) {
        shift_push(&mut self.temperature, reading.temperature);
        shift_push(&mut self.humidity, reading.humidity);
        shift_push(&mut self.soil_moisture, reading.soil_moisture);
        shift_push(&mut self.co2, reading.co2);
        shift_push(&mut self.light_intensity, reading.light_intensity);
    }
}

// Slice-and-append ring semantics: drop the oldest, append the newest.
fn shift_push<T: Copy>(buf: &mut Vec<T>, value: T) {
    buf.remove(0);
    buf.push(value);
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Hash, Debug, Copy, Clone)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    Irrigation,
    Fan,
    GrowLight,
    Windows,
}

impl Device {
    // Name shown in the control panel and event feed.
    pub fn display_name(&self) -> &'static str {
        match self {
            Device::Irrigation => "관수 시스템",
            Device::Fan => "환기팬",
            Device::GrowLight => "생장 LED",
            Device::Windows => "자동 측창",
        }
    }

    // Short name used for the {{devices}} prompt token.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Device::Irrigation => "관수",
            Device::Fan => "환기팬",
            Device::GrowLight => "LED",
            Device::Windows => "측창",
        }
    }
}

// Boolean on/off status per controllable device. Mutated only by explicit
// toggle commands; there is no automatic device logic.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct ControlState {
    pub irrigation: bool,
    pub fan: bool,
    pub grow_light: bool,
    pub windows: bool,
}

impl Default for ControlState {
    // The fan starts on; everything else starts off.
    fn default() -> Self {
        Self {
            irrigation: false,
            fan: true,
            grow_light: false,
            windows: false,
        }
    }
}

impl ControlState {
    pub fn get(&self, device: Device) -> bool {
        match device {
            Device::Irrigation => self.irrigation,
            Device::Fan => self.fan,
            Device::GrowLight => self.grow_light,
            Device::Windows => self.windows,
        }
    }

    pub fn set(&mut self, device: Device, on: bool) {
        match device {
            Device::Irrigation => self.irrigation = on,
            Device::Fan => self.fan = on,
            Device::GrowLight => self.grow_light = on,
            Device::Windows => self.windows = on,
        }
    }
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct DeviceToggle {
    pub device: Device,
    pub on: bool,
}

#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct DeviceToggleSet {
    pub toggles: Vec<DeviceToggle>,
}

// Wire body for selecting the active crop by display name.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct CropSelect {
    pub name: String,
}

// Wire body for reading or replacing the advisory prompt template.
#[derive(Serialize, Deserialize, PartialEq, Debug)]
pub struct PromptBody {
    pub template: String,
}

// One saved advisory snapshot. The id is the millisecond timestamp at save
// time, so insertion order and id order agree.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SavedInsight {
    pub id: String,
    pub crop: String,
    pub content: String,
    pub timestamp: String,
}

#[cfg(test)]
mod sensor_history {
    use super::*;

    fn reading(v: f64) -> Reading {
        Reading {
            temperature: v,
            humidity: v,
            soil_moisture: v,
            co2: v as i32,
            light_intensity: v as i32,
            timestamp: "00:00:00".to_string(),
        }
    }

    #[test]
    fn initial_fill_is_full_length() {
        let h = SensorHistory::new(&reading(24.5));
        assert_eq!(h.temperature.len(), HISTORY_LEN);
        assert_eq!(h.co2.len(), HISTORY_LEN);
        assert!(h.temperature.iter().all(|v| *v == 24.5));
    }

    #[test]
    fn record_keeps_length_and_order() {
        let mut h = SensorHistory::new(&reading(0.0));
        for i in 1..=100 {
            h.record(&reading(i as f64));
        }
        assert_eq!(h.temperature.len(), HISTORY_LEN);
        // Oldest first: the window is the last 30 recorded values.
        assert_eq!(h.temperature[0], 71.0);
        assert_eq!(*h.temperature.last().unwrap(), 100.0);
        assert_eq!(h.co2[0], 71);
    }
}

#[cfg(test)]
mod control_state {
    use super::*;

    #[test]
    fn default_has_fan_on() {
        let c = ControlState::default();
        assert!(!c.irrigation);
        assert!(c.fan);
        assert!(!c.grow_light);
        assert!(!c.windows);
    }

    #[test]
    fn set_and_get() {
        let mut c = ControlState::default();
        c.set(Device::GrowLight, true);
        assert!(c.get(Device::GrowLight));
        c.set(Device::Fan, false);
        assert!(!c.get(Device::Fan));
    }

}

#[cfg(test)]
mod json_format {
    use super::*;

    #[test]
    fn serialize_toggle_set() {
        let cmd = DeviceToggleSet {
            toggles: vec![
                DeviceToggle {
                    device: Device::Fan,
                    on: false,
                },
                DeviceToggle {
                    device: Device::GrowLight,
                    on: true,
                },
            ],
        };

        assert_eq!(
            serde_json::to_string(&cmd).unwrap(),
            "{\"toggles\":[{\"device\":\"fan\",\"on\":false},{\"device\":\"grow_light\",\"on\":true}]}"
        );
    }
}
