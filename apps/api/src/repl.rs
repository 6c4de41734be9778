//! Command-line chat loop.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::chat::agent::ChatAgent;

pub const EXIT_COMMAND: &str = "/exit";
pub const PROMPT: &str = "Enter your question ('/exit' to quit): ";
const SEPARATOR_WIDTH: usize = 30;

/// Closing line; depends on whether any exchange actually happened.
pub fn farewell(was_used: bool) -> &'static str {
    if was_used {
        "I hope I was helpful!"
    } else {
        "Thanks for visiting!"
    }
}

/// Runs the loop until a line that is exactly `/exit`, or end of input.
/// Blank lines are skipped; anything else goes to the agent as typed.
/// Returns the number of completed exchanges. Agent errors end the loop.
pub async fn run_repl<R: BufRead, W: Write>(
    agent: &dyn ChatAgent,
    session_key: &str,
    input: R,
    output: &mut W,
) -> Result<usize> {
    writeln!(output, "Hi! I'm your resume assistant.")?;
    writeln!(output, "What would you like to discuss today? ")?;

    let mut exchanges = 0;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line.context("Failed to read input")?,
            None => {
                writeln!(output)?;
                break;
            }
        };
        let prompt = line.strip_suffix('\r').unwrap_or(&line);
        if prompt == EXIT_COMMAND {
            break;
        }
        if prompt.trim().is_empty() {
            continue;
        }

        let answer = agent
            .chat(session_key, prompt)
            .await
            .context("Assistant failed to answer")?;
        writeln!(output, "Assistant: {answer}")?;
        writeln!(output, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        exchanges += 1;
    }

    writeln!(output, "{}", farewell(exchanges > 0))?;
    Ok(exchanges)
}
