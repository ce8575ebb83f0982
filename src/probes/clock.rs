use crate::framework::WidgetError;
use crate::model::{Align, Element};
use crate::probes::{Probe, ProbeResult};
use chrono::Local;
use std::fmt::Write;

/// Local time, formatted with a `strftime`-style pattern.
#[derive(Debug, Clone)]
pub struct ClockProbe {
    pub format: String,
    pub alignment: Option<Align>,
}

impl ClockProbe {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            alignment: None,
        }
    }
}

impl Probe for ClockProbe {
    fn probe(&self) -> ProbeResult {
        let mut text = String::new();
        write!(text, "{}", Local::now().format(&self.format))
            .map_err(|_| WidgetError::Probe(format!("invalid clock format {:?}", self.format)))?;
        let mut element = Element::new("Clock", text);
        element.alignment = self.alignment;
        Ok(vec![element])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_current_time() {
        let clock = ClockProbe::new("%Y");
        let year = clock.probe().unwrap().remove(0).full_text;
        assert_eq!(year.len(), 4);
        assert!(year.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn invalid_format_is_an_error() {
        assert!(ClockProbe::new("%Q%").probe().is_err());
    }
}
