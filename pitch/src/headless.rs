//! Headless mode.
//!
//! A line-oriented protocol for scripts and automated testing:
//! - Every non-empty line is a topic
//! - Lines starting with `#` are commands (history, help, quit)
//! - Results are printed as `[TITLE]`, `[SCRIPT]` and `[RESEARCH]` sections,
//!   or as one JSON object per line with `--json`

use pitch_core::{Orchestrator, PitchError, Session, Submission};
use std::io::{self, BufRead, Write};
use tracing::warn;

/// How submissions are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

const HELP: &str = "\
Commands:
  #history  - Show title and script history
  #help     - Show this help
  #quit     - Exit
Anything else is a topic to pitch.";

/// Read topics from `input` until EOF or `#quit`.
pub async fn run_headless<R, W>(
    orchestrator: &Orchestrator,
    input: R,
    mut output: W,
    format: OutputFormat,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    let mut session = orchestrator
        .new_session()
        .map_err(|e| io::Error::other(e.to_string()))?;

    if format == OutputFormat::Text {
        writeln!(output, "=== Sales AI Agent ===")?;
        writeln!(
            output,
            "I can help you create sales pitches. What do you want to write about?"
        )?;
        writeln!(output, "{HELP}")?;
        writeln!(output)?;
        output.flush()?;
    }

    for line in input.split(b'\n') {
        let line = match String::from_utf8(line?) {
            Ok(line) => line,
            Err(_) => {
                warn!("Skipping input line that is not UTF-8");
                print_error(&mut output, format, "Input line is not valid UTF-8")?;
                output.flush()?;
                continue;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('#') {
            match command.trim() {
                "quit" | "exit" => break,
                "history" => print_history(&mut output, &session, format)?,
                "help" => writeln!(output, "[HELP]\n{HELP}")?,
                other => print_error(
                    &mut output,
                    format,
                    &format!("Unknown command '#{other}'. Type #help for help."),
                )?,
            }
            output.flush()?;
            continue;
        }

        match orchestrator.handle_submission(&mut session, line).await {
            Ok(submission) => print_submission(&mut output, &submission, format)?,
            Err(e) => {
                warn!(error = %e, topic = line, "Submission failed");
                print_pitch_error(&mut output, format, &e)?;
            }
        }
        output.flush()?;
    }

    Ok(())
}

fn print_submission<W: Write>(
    output: &mut W,
    submission: &Submission,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string(submission).map_err(io::Error::other)?;
            writeln!(output, "{json}")
        }
        OutputFormat::Text => {
            writeln!(output, "[TITLE]\n{}\n", submission.title)?;
            writeln!(output, "[SCRIPT]\n{}\n", submission.script)?;
            writeln!(output, "[RESEARCH]\n{}\n", submission.wiki_research)
        }
    }
}

fn print_history<W: Write>(output: &mut W, session: &Session, format: OutputFormat) -> io::Result<()> {
    let titles = session.title_memory().transcript();
    let scripts = session.script_memory().transcript();
    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "title_history": titles,
                "script_history": scripts,
            });
            writeln!(output, "{json}")
        }
        OutputFormat::Text => {
            writeln!(output, "[TITLE HISTORY]\n{titles}\n")?;
            writeln!(output, "[SCRIPT HISTORY]\n{scripts}\n")
        }
    }
}

fn print_pitch_error<W: Write>(
    output: &mut W,
    format: OutputFormat,
    error: &PitchError,
) -> io::Result<()> {
    print_error(output, format, &error.to_string())
}

fn print_error<W: Write>(output: &mut W, format: OutputFormat, message: &str) -> io::Result<()> {
    match format {
        OutputFormat::Json => writeln!(output, "{}", serde_json::json!({ "error": message })),
        OutputFormat::Text => writeln!(output, "[ERROR] {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitch_core::{CallLog, LookupError, MockEncyclopedia, MockGenerator, ResearchLookup};
    use std::sync::Arc;

    fn orchestrator(generator: MockGenerator, encyclopedia: MockEncyclopedia) -> Orchestrator {
        Orchestrator::new(
            Arc::new(generator),
            ResearchLookup::new(Arc::new(encyclopedia)),
        )
        .unwrap()
    }

    async fn run(orchestrator: &Orchestrator, input: &str, format: OutputFormat) -> String {
        run_bytes(orchestrator, input.as_bytes(), format).await
    }

    async fn run_bytes(orchestrator: &Orchestrator, input: &[u8], format: OutputFormat) -> String {
        let mut output = Vec::new();
        run_headless(orchestrator, input, &mut output, format)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_text_sections() {
        let orchestrator = orchestrator(
            MockGenerator::new(CallLog::new())
                .reply("Brew Better")
                .reply("Dear customer"),
            MockEncyclopedia::returning(CallLog::new(), "Page: Coffee\nSummary: A drink."),
        );

        let output = run(&orchestrator, "coffee\n", OutputFormat::Text).await;

        assert!(output.contains("[TITLE]\nBrew Better\n"));
        assert!(output.contains("[SCRIPT]\nDear customer\n"));
        assert!(output.contains("[RESEARCH]\nPage: Coffee\nSummary: A drink.\n"));
    }

    #[tokio::test]
    async fn test_history_and_quit() {
        let log = CallLog::new();
        let orchestrator = orchestrator(
            MockGenerator::new(log.clone()).reply("T1").reply("S1"),
            MockEncyclopedia::returning(log.clone(), "facts"),
        );

        let output = run(
            &orchestrator,
            "coffee\n#history\n#quit\ntea\n",
            OutputFormat::Text,
        )
        .await;

        assert!(output.contains("[TITLE HISTORY]\nHuman: coffee\nAI: T1\n"));
        assert!(output.contains("[SCRIPT HISTORY]\nHuman: T1\nAI: S1\n"));
        // Nothing after #quit runs
        assert_eq!(log.queries(), vec!["coffee"]);
    }

    #[tokio::test]
    async fn test_errors_do_not_stop_the_loop() {
        let orchestrator = orchestrator(
            MockGenerator::new(CallLog::new()),
            MockEncyclopedia::failing(
                CallLog::new(),
                LookupError::NoResults {
                    query: "qwxz".to_string(),
                },
            ),
        );

        let output = run(&orchestrator, "qwxz\n#bogus\nqwxz\n", OutputFormat::Text).await;

        assert_eq!(output.matches("[ERROR] Research lookup failed").count(), 2);
        assert!(output.contains("[ERROR] Unknown command '#bogus'"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_stop_the_loop() {
        let log = CallLog::new();
        let orchestrator = orchestrator(
            MockGenerator::new(log.clone()),
            MockEncyclopedia::returning(log.clone(), "facts"),
        );

        let output = run_bytes(&orchestrator, b"caf\xe9\r\ntea\r\n", OutputFormat::Text).await;

        assert!(output.contains("[ERROR] Input line is not valid UTF-8"));
        assert_eq!(log.queries().len(), 1);
        assert!(output.contains("[TITLE]"));
    }

    #[tokio::test]
    async fn test_json_output() {
        let orchestrator = orchestrator(
            MockGenerator::new(CallLog::new()).reply("T").reply("S"),
            MockEncyclopedia::returning(CallLog::new(), "R"),
        );

        let output = run(&orchestrator, "coffee\n", OutputFormat::Json).await;
        let value: serde_json::Value = serde_json::from_str(output.trim()).unwrap();

        assert_eq!(value["topic"], "coffee");
        assert_eq!(value["title"], "T");
        assert_eq!(value["script"], "S");
        assert_eq!(value["wiki_research"], "R");
    }
}
