//! Interactive collection of login credentials.
//!
//! The identifier is read as a plain line, the secret without echo when a
//! terminal is attached. Nothing is validated: empty answers are passed on as
//! they are, and only the trailing line terminator is removed.

use std::io::{self, BufRead, Write};

use console::Term;
use garmin_connect_client::Credentials;

use crate::error::{DownloadError, DownloadResult};

pub const EMAIL_PROMPT: &str = "email: ";
pub const PASSWORD_PROMPT: &str = "password: ";

/// Blocking source of credentials for one run.
pub trait CredentialSource {
    fn collect(&mut self) -> DownloadResult<Credentials>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for Box<T> {
    fn collect(&mut self) -> DownloadResult<Credentials> {
        (**self).collect()
    }
}

/// Prompts on an attended terminal; the password is read with echo disabled.
///
/// A `Term` that is not a tty fails with [`io::ErrorKind::NotConnected`]
/// instead of prompting, since `console` answers reads on it with empty lines.
#[derive(Debug, Clone)]
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new(Term::stderr())
    }
}

impl CredentialSource for TerminalPrompt {
    fn collect(&mut self) -> DownloadResult<Credentials> {
        if !self.term.is_term() {
            return Err(DownloadError::Input(io::Error::new(
                io::ErrorKind::NotConnected,
                "prompt terminal is not attended",
            )));
        }
        tracing::debug!("reading user inputs");
        self.term
            .write_str(EMAIL_PROMPT)
            .map_err(DownloadError::Input)?;
        let identifier = self.term.read_line().map_err(DownloadError::Input)?;
        self.term
            .write_str(PASSWORD_PROMPT)
            .map_err(DownloadError::Input)?;
        let secret = self
            .term
            .read_secure_line()
            .map_err(DownloadError::Input)?;
        Ok(Credentials::new(identifier, secret))
    }
}

/// Line-oriented prompt over arbitrary streams, used when stdin is piped.
///
/// A stream that ends before an answer is read fails with
/// [`io::ErrorKind::UnexpectedEof`].
#[derive(Debug)]
pub struct StreamPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed while waiting for {}", prompt.trim_end()),
            ));
        }
        Ok(strip_line_ending(line))
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> CredentialSource for StreamPrompt<R, W> {
    fn collect(&mut self) -> DownloadResult<Credentials> {
        tracing::debug!("reading user inputs from stream");
        let identifier = self.ask(EMAIL_PROMPT).map_err(DownloadError::Input)?;
        let secret = self.ask(PASSWORD_PROMPT).map_err(DownloadError::Input)?;
        Ok(Credentials::new(identifier, secret))
    }
}

/// Pre-supplied credentials.
#[derive(Debug, Clone)]
pub struct StaticCredentials(Credentials);

impl StaticCredentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self(Credentials::new(identifier, secret))
    }
}

impl CredentialSource for StaticCredentials {
    fn collect(&mut self) -> DownloadResult<Credentials> {
        Ok(self.0.clone())
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
