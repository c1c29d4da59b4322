//! Line-oriented order-entry session over any reader and writer.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::domain::services::matching_engine::MatchingEngine;
use crate::inbounds::commands::{Command, CommandOutcome, OrderEntry};
use crate::outbounds::render::render_outcome;

const PROMPT: &str = "> ";

/// Reads commands until `quit` or end of input, writing one response per line.
///
/// Parse errors are reported to `output` and the session continues.
pub fn run_session<R, W>(
    engine: &mut MatchingEngine,
    entry: &OrderEntry,
    input: R,
    mut output: W,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{PROMPT}")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(output, "{PROMPT}")?;
            output.flush()?;
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                debug!(?command, "executing command");
                let outcome = entry.execute(engine, command);
                writeln!(output, "{}", render_outcome(&outcome))?;
                if matches!(outcome, CommandOutcome::Quit) {
                    return Ok(());
                }
            }
            Err(err) => writeln!(output, "error: {err}")?,
        }

        write!(output, "{PROMPT}")?;
        output.flush()?;
    }
    writeln!(output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::io::Cursor;

    fn run(script: &str) -> (MatchingEngine, String) {
        let mut engine = MatchingEngine::new();
        let entry = OrderEntry::new(&Config::default());
        let mut output = Vec::new();
        run_session(&mut engine, &entry, Cursor::new(script), &mut output).unwrap();
        (engine, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_session_places_and_matches() {
        let (engine, output) = run("sell 100 5 alice\nbuy 100 2 bob\nbook\n");

        assert!(output.contains("accepted with 0 trade(s)"));
        assert!(output.contains("accepted with 1 trade(s)"));
        assert!(output.contains("spread n/a"));
        assert_eq!(engine.trade_count(), 1);
        assert_eq!(engine.order_count(), 1);
    }

    #[test]
    fn test_session_reports_errors_and_continues() {
        let (engine, output) = run("frobnicate\nbuy 10\nbuy 10 1\n");

        assert!(output.contains("error: unknown command: frobnicate"));
        assert!(output.contains("error: missing argument: size"));
        assert_eq!(engine.order_count(), 1);
    }

    #[test]
    fn test_session_stops_at_quit() {
        let (engine, output) = run("quit\nbuy 10 1\n");

        assert!(output.contains("bye"));
        assert_eq!(engine.order_count(), 0);
    }
}
