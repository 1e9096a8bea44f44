//! Interactive authorization code entry
//!
//! The user opens the consent URL in a browser and pastes back the code the
//! consent page shows. `CodePrompt` abstracts that exchange so the flow can
//! be driven without a terminal.

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::{Error, Result};

const SEPARATOR: &str =
    "----------------------------------------------------------------------------------------------";

/// Source of authorization codes for a given consent URL.
///
/// Uses `Pin<Box<dyn Future>>` so callers can hold a `&dyn CodePrompt`.
pub trait CodePrompt: Send + Sync {
    fn prompt<'a>(
        &'a self,
        authorization_url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}

/// Prints the consent URL to stdout and reads the code from stdin.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl CodePrompt for ConsolePrompt {
    fn prompt<'a>(
        &'a self,
        authorization_url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(async move {
            let mut stdout = tokio::io::stdout();
            stdout
                .write_all(banner(authorization_url).as_bytes())
                .await
                .map_err(|e| Error::Prompt(format!("writing to stdout: {e}")))?;
            stdout
                .flush()
                .await
                .map_err(|e| Error::Prompt(format!("flushing stdout: {e}")))?;

            let mut line = String::new();
            BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await
                .map_err(|e| Error::Prompt(format!("reading authorization code: {e}")))?;
            parse_code(&line)
        })
    }
}

fn banner(authorization_url: &str) -> String {
    format!(
        "Go to the following link in your browser:\n{SEPARATOR}\n\t{authorization_url}\n{SEPARATOR}\n\ntype the authorization code: "
    )
}

/// Trim a pasted code; an empty line (or EOF) is an error.
fn parse_code(line: &str) -> Result<String> {
    let code = line.trim();
    if code.is_empty() {
        return Err(Error::Prompt("no authorization code entered".into()));
    }
    Ok(code.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_shows_url_between_separators() {
        let text = banner("https://accounts.google.com/o/oauth2/auth?x=1");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], SEPARATOR);
        assert_eq!(lines[2].trim(), "https://accounts.google.com/o/oauth2/auth?x=1");
        assert_eq!(lines[3], SEPARATOR);
        assert!(text.ends_with("type the authorization code: "));
    }

    #[test]
    fn parse_code_trims_whitespace() {
        assert_eq!(parse_code("  4/0AbCd-xyz \r\n").unwrap(), "4/0AbCd-xyz");
    }

    #[test]
    fn parse_code_rejects_empty_input() {
        assert!(matches!(parse_code(""), Err(Error::Prompt(_))));
        assert!(matches!(parse_code("   \n"), Err(Error::Prompt(_))));
    }
}
