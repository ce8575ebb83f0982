//! Line-streaming from a long-running process.
//!
//! The process writes one JSON record per line on stdout: either a single element or an
//! array of elements. Every line replaces the widget's slot.

use crate::framework::{Generator, Trigger, WidgetError};
use crate::model::Element;
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::mpsc;
use tracing::{debug, info};

type Line = Result<String, WidgetError>;

/// Owns a child process and turns its output lines into productions.
///
/// The process is launched by the first `produce`, so a missing binary shows up as an
/// error in the bar rather than at configuration time. It is killed when the generator
/// is dropped.
pub struct StreamingGenerator {
    name: String,
    instance: String,
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    lines: Option<mpsc::Receiver<Line>>,
    pending: Option<Line>,
}

impl StreamingGenerator {
    pub fn new(name: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            instance: String::new(),
            program: program.into(),
            args,
            child: None,
            lines: None,
            pending: None,
        }
    }

    /// Instance tag given to decoded elements that do not carry one.
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = instance.into();
        self
    }

    fn launch(&mut self) -> Result<(), WidgetError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| WidgetError::Command(format!("{}: {e}", self.program)))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WidgetError::Io("stdout was not captured".into()))?;

        let (sender, receiver) = mpsc::channel(1);
        tokio::spawn(read_lines(stdout, sender));
        info!(widget = %self.name, program = %self.program, pid = ?child.id(), "Process launched");

        self.child = Some(child);
        self.lines = Some(receiver);
        Ok(())
    }

    fn decode(&self, line: &str) -> Result<Vec<Element>, WidgetError> {
        let mut elements = if line.trim_start().starts_with('[') {
            serde_json::from_str::<Vec<Element>>(line)?
        } else {
            vec![serde_json::from_str::<Element>(line)?]
        };
        for e in &mut elements {
            if e.instance.is_empty() {
                e.instance.clone_from(&self.instance);
            }
        }
        Ok(elements)
    }
}

/// Reads stdout until it fails or ends; both are reported as the last line.
async fn read_lines(stdout: ChildStdout, lines: mpsc::Sender<Line>) {
    let mut reader = BufReader::new(stdout).lines();
    loop {
        let line = match reader.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(WidgetError::StreamEnded),
            Err(e) => Err(WidgetError::from(e)),
        };
        let last = line.is_err();
        if lines.send(line).await.is_err() || last {
            break;
        }
    }
    debug!("Reader finished");
}

#[async_trait]
impl Generator for StreamingGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn produce(&mut self) -> Result<Vec<Element>, WidgetError> {
        if self.child.is_none() {
            self.launch()?;
            // Nothing has been read yet
            return Ok(Vec::new());
        }
        match self.pending.take() {
            Some(Ok(line)) => self.decode(&line),
            Some(Err(e)) => Err(e),
            None => Ok(Vec::new()),
        }
    }

    async fn next_trigger(&mut self) -> Trigger {
        let Some(lines) = self.lines.as_mut() else {
            return Trigger::Closed;
        };
        match lines.recv().await {
            Some(line) => {
                self.pending = Some(line);
                Trigger::Fire
            }
            None => Trigger::Closed,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn shell(script: &str) -> StreamingGenerator {
        StreamingGenerator::new("stream", "sh", vec!["-c".into(), script.into()])
    }

    async fn next(gen: &mut StreamingGenerator) -> Result<Vec<Element>, WidgetError> {
        assert_eq!(timeout(WAIT, gen.next_trigger()).await.unwrap(), Trigger::Fire);
        gen.produce().await
    }

    #[tokio::test]
    async fn each_line_is_one_production() {
        let mut gen = shell(
            r#"echo '{"full_text":"up"}'; echo; echo '[{"full_text":"a","instance":"x"},{"full_text":"b"}]'; sleep 5"#,
        )
        .with_instance("vpn");

        assert_eq!(gen.produce().await, Ok(Vec::new()));

        let first = next(&mut gen).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].full_text, "up");
        assert_eq!(first[0].instance, "vpn");

        let second = next(&mut gen).await.unwrap();
        let instances: Vec<_> = second.iter().map(|e| e.instance.as_str()).collect();
        assert_eq!(instances, vec!["x", "vpn"]);
    }

    #[tokio::test]
    async fn undecodable_line_is_fatal() {
        let mut gen = shell("echo 'not json'; sleep 5");
        gen.produce().await.unwrap();
        assert!(matches!(next(&mut gen).await, Err(WidgetError::Decode(_))));
    }

    #[tokio::test]
    async fn end_of_output_is_fatal() {
        let mut gen = shell("true");
        gen.produce().await.unwrap();
        assert_eq!(next(&mut gen).await, Err(WidgetError::StreamEnded));
    }

    #[tokio::test]
    async fn missing_program_fails_first_production() {
        let mut gen = StreamingGenerator::new("stream", "/nonexistent/program", Vec::new());
        assert!(matches!(gen.produce().await, Err(WidgetError::Command(_))));
        assert_eq!(gen.next_trigger().await, Trigger::Closed);
    }
}
