//! lemonbar formatting: `%{l}`/`%{c}`/`%{r}` blocks with `%{F..}`/`%{B..}` colors.

use crate::model::{Align, Element};
use crate::sinks::{Sink, SinkError};
use std::io::Write;

pub struct Lemonbar<W> {
    out: W,
}

impl<W: Write + Send> Lemonbar<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Renders one status line, without the trailing newline.
    pub fn render(elements: &[Element]) -> String {
        let mut line = String::new();
        let mut current = None;
        for e in elements {
            // Alignment is only emitted on change; lemonbar overlaps blocks otherwise
            if e.alignment != current {
                current = e.alignment;
                match e.alignment {
                    Some(Align::Left) => line.push_str("%{l}"),
                    Some(Align::Center) => line.push_str("%{c}"),
                    Some(Align::Right) => line.push_str("%{r}"),
                    None => {}
                }
            }
            if let Some(color) = e.color {
                line.push_str(&format!("%{{F{color}}}"));
            }
            if let Some(background) = e.background {
                line.push_str(&format!("%{{B{background}}}"));
            }
            line.push_str(&e.full_text.replace('%', "%%"));
        }
        line
    }
}

impl<W: Write + Send> Sink for Lemonbar<W> {
    fn write(&mut self, elements: &[Element]) -> Result<(), SinkError> {
        let line = Self::render(elements);
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }
}
