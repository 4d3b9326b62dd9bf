//! Line-oriented terminal prompts over any reader/writer pair.

use crate::error::{Error, Result};
use std::io::{BufRead, IsTerminal, Write};

/// Print `label`, read one line, return it trimmed. EOF is an error so a
/// closed stdin cannot spin a re-prompt loop.
pub fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .map_err(|e| Error::input(e.to_string()))?;
    if read == 0 {
        return Err(Error::input("input closed"));
    }
    Ok(line.trim().to_string())
}

/// Like [`ask`], repeating until the answer is non-empty.
pub fn ask_non_empty<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
    field: &str,
) -> Result<String> {
    loop {
        let answer = ask(input, output, label)?;
        if !answer.is_empty() {
            return Ok(answer);
        }
        writeln!(output, "{field} cannot be empty, please try again.")?;
    }
}

/// A yes/no question; only `y` or `yes` count as yes.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<bool> {
    let answer = match ask(input, output, label) {
        Ok(answer) => answer,
        Err(Error::Input(_)) => return Ok(false),
        Err(e) => return Err(e),
    };
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

/// Source of secret input. Gets the same reader/writer as the other prompts
/// so piped input is consumed in order.
pub trait SecretReader {
    fn read_secret<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
        label: &str,
    ) -> Result<String>;
}

/// Reads the key without echo when stdin is a terminal, otherwise as a
/// plain line from the given reader.
pub struct TerminalSecret {
    tty: bool,
}

impl TerminalSecret {
    pub fn detect() -> Self {
        Self {
            tty: std::io::stdin().is_terminal(),
        }
    }

    pub fn piped() -> Self {
        Self { tty: false }
    }
}

impl SecretReader for TerminalSecret {
    fn read_secret<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
        label: &str,
    ) -> Result<String> {
        if self.tty {
            output.flush()?;
            return rpassword::prompt_password(label).map_err(|e| Error::input(e.to_string()));
        }
        ask(input, output, label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn ask_trims_answer() {
        let mut input = Cursor::new("  rust developer \n");
        let mut output = Vec::new();
        let answer = ask(&mut input, &mut output, "Keywords: ").unwrap();
        assert_eq!(answer, "rust developer");
        assert_eq!(String::from_utf8(output).unwrap(), "Keywords: ");
    }

    #[test]
    fn ask_non_empty_reprompts_until_answered() {
        let mut input = Cursor::new("\n   \nRemote\n");
        let mut output = Vec::new();
        let answer = ask_non_empty(&mut input, &mut output, "Location: ", "Location").unwrap();
        assert_eq!(answer, "Remote");
        let printed = String::from_utf8(output).unwrap();
        assert_eq!(printed.matches("Location: ").count(), 3);
        assert_eq!(printed.matches("cannot be empty").count(), 2);
    }

    #[test]
    fn ask_non_empty_fails_on_eof() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        let err = ask_non_empty(&mut input, &mut output, "Location: ", "Location").unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }

    #[test]
    fn confirm_accepts_y_and_yes_only() {
        let cases = [
            ("y\n", true),
            ("YES\n", true),
            ("n\n", false),
            ("\n", false),
            ("", false),
        ];
        for (answer, expected) in cases {
            let mut input = Cursor::new(answer);
            let mut output = Vec::new();
            let got = confirm(&mut input, &mut output, "Again? ").unwrap();
            assert_eq!(got, expected, "{answer:?}");
        }
    }

    #[test]
    fn piped_secret_reads_a_line_from_input() {
        let mut input = Cursor::new("  sk-test-123 \nrust\n");
        let mut output = Vec::new();
        let key = TerminalSecret::piped()
            .read_secret(&mut input, &mut output, "API Key: ")
            .unwrap();
        assert_eq!(key, "sk-test-123");
        assert_eq!(ask(&mut input, &mut output, "").unwrap(), "rust");
    }

    #[test]
    fn piped_secret_fails_on_closed_input() {
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        let err = TerminalSecret::piped()
            .read_secret(&mut input, &mut output, "API Key: ")
            .unwrap_err();
        assert!(matches!(err, Error::Input(_)));
    }
}
