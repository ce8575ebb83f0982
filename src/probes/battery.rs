//! Battery charge from the kernel's power-supply class.

use crate::framework::WidgetError;
use crate::model::{Align, Color, Element};
use crate::probes::{Probe, ProbeResult};
use std::path::{Path, PathBuf};

const BATTERY_PREFIX: &str = "BAT";
const GLYPHS: [&str; 5] = ["▁", "▃", "▅", "▇", "█"];
const LOW: Color = Color::rgb(0xB8, 0x2E, 0x34);
const NORMAL: Color = Color::rgb(0x8A, 0x8B, 0x8C);
const COLORS: [Color; 5] = [LOW, LOW, NORMAL, NORMAL, NORMAL];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryState {
    Unknown,
    Charging,
    Discharging,
    Full,
}

impl BatteryState {
    fn parse(s: &str) -> Result<Self, WidgetError> {
        match s.trim() {
            "Unknown" | "Not charging" => Ok(Self::Unknown),
            "Charging" => Ok(Self::Charging),
            "Discharging" => Ok(Self::Discharging),
            "Full" => Ok(Self::Full),
            other => Err(WidgetError::Probe(format!("unknown battery status: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battery {
    pub name: String,
    pub state: BatteryState,
    /// Percentage of full charge.
    pub charge: u32,
}

impl Battery {
    fn band(&self) -> usize {
        (self.charge.min(100) as usize * (GLYPHS.len() - 1)) / 100
    }

    pub fn color(&self) -> Color {
        COLORS[self.band()]
    }

    pub fn symbol(&self) -> String {
        let prefix = if self.state == BatteryState::Charging { "⚡" } else { "" };
        format!("{prefix}{}", GLYPHS[self.band()])
    }
}

/// Every `BAT*` entry under the power-supply directory, one element each.
#[derive(Debug, Clone)]
pub struct BatteryProbe {
    pub root: PathBuf,
    pub alignment: Option<Align>,
}

impl Default for BatteryProbe {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/sys/class/power_supply"),
            alignment: None,
        }
    }
}

impl BatteryProbe {
    pub fn batteries(&self) -> Result<Vec<Battery>, WidgetError> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.starts_with(BATTERY_PREFIX) {
                names.push(name);
            }
        }
        names.sort();
        names
            .into_iter()
            .map(|name| read_battery(&self.root.join(&name), name))
            .collect()
    }
}

fn read_battery(dir: &Path, name: String) -> Result<Battery, WidgetError> {
    let capacity = std::fs::read_to_string(dir.join("capacity"))?;
    let charge = capacity
        .trim()
        .parse()
        .map_err(|e| WidgetError::Probe(format!("{name}: invalid capacity: {e}")))?;
    let state = BatteryState::parse(&std::fs::read_to_string(dir.join("status"))?)?;
    Ok(Battery {
        name,
        state,
        charge,
    })
}

impl Probe for BatteryProbe {
    fn probe(&self) -> ProbeResult {
        Ok(self
            .batteries()?
            .into_iter()
            .map(|bat| {
                let mut element = Element::new("Battery", format!("{}% {}", bat.charge, bat.symbol()))
                    .with_instance(bat.name.clone())
                    .with_color(bat.color());
                element.alignment = self.alignment;
                element
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_battery(root: &Path, name: &str, capacity: &str, status: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("capacity"), capacity).unwrap();
        std::fs::write(dir.join("status"), status).unwrap();
    }

    #[test]
    fn one_element_per_battery() {
        let root = tempfile::tempdir().unwrap();
        fake_battery(root.path(), "BAT1", "15\n", "Discharging\n");
        fake_battery(root.path(), "BAT0", "100\n", "Charging\n");
        std::fs::create_dir_all(root.path().join("AC")).unwrap();

        let probe = BatteryProbe {
            root: root.path().to_path_buf(),
            alignment: Some(Align::Right),
        };
        let elements = probe.probe().unwrap();
        assert_eq!(elements.len(), 2);

        assert_eq!(elements[0].instance, "BAT0");
        assert_eq!(elements[0].full_text, "100% ⚡█");
        assert_eq!(elements[0].color, Some(NORMAL));

        assert_eq!(elements[1].instance, "BAT1");
        assert_eq!(elements[1].full_text, "15% ▁");
        assert_eq!(elements[1].color, Some(LOW));
    }

    #[test]
    fn unknown_status_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        fake_battery(root.path(), "BAT0", "50\n", "Exploding\n");
        let probe = BatteryProbe {
            root: root.path().to_path_buf(),
            alignment: None,
        };
        assert!(matches!(probe.probe(), Err(WidgetError::Probe(_))));
    }
}
