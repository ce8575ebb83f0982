//! dzen2 formatting: `^fg(..)`/`^bg(..)` color commands.

use crate::model::Element;
use crate::sinks::{Sink, SinkError};
use std::io::Write;

pub struct Dzen2<W> {
    out: W,
}

impl<W: Write + Send> Dzen2<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn render(elements: &[Element]) -> String {
        let mut line = String::new();
        for e in elements {
            if let Some(color) = e.color {
                line.push_str(&format!("^fg({color})"));
            }
            if let Some(background) = e.background {
                line.push_str(&format!("^bg({background})"));
            }
            line.push_str(&e.full_text.replace('^', "^^"));
        }
        line
    }
}

impl<W: Write + Send> Sink for Dzen2<W> {
    fn write(&mut self, elements: &[Element]) -> Result<(), SinkError> {
        let line = Self::render(elements);
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    #[test]
    fn renders_colors_and_escapes_carets() {
        let mut e = Element::new("a", "x^2").with_color(Color::ALERT);
        e.background = Some(Color::rgb(0, 0, 0));
        assert_eq!(
            Dzen2::<Vec<u8>>::render(&[e, Element::new("b", "y")]),
            "^fg(#ff0000)^bg(#000000)x^^2y"
        );
    }
}
