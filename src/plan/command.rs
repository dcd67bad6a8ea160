use std::fmt;
use std::path::{Path, PathBuf};

/// A single word of a shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Word {
    /// Generated value, quoted for the shell when rendered
    Arg(String),
    /// Fragment written by the user, emitted verbatim
    Raw(String),
}

impl Word {
    fn render(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Word::Arg(arg) => shell_words::quote(arg),
            Word::Raw(raw) => raw.as_str().into(),
        }
    }
}

/// A shell line under construction: words plus an optional appending redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    words: Vec<Word>,
    append_to: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            words: vec![Word::Arg(program.into())],
            append_to: None,
        }
    }

    /// Start from a user supplied fragment, such as a timing harness command
    pub fn from_raw(fragment: impl Into<String>) -> Self {
        Self {
            words: vec![Word::Raw(fragment.into())],
            append_to: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.words.push(Word::Arg(arg.into()));
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(args.into_iter().map(|a| Word::Arg(a.into())));
        self
    }

    pub fn path(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy())
    }

    pub fn raw(mut self, fragment: impl Into<String>) -> Self {
        self.words.push(Word::Raw(fragment.into()));
        self
    }

    pub fn raw_args<I, S>(self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        fragments.into_iter().fold(self, |cmd, fragment| cmd.raw(fragment))
    }

    /// Append stdout and stderr to `log`
    pub fn append_output_to(mut self, log: impl Into<PathBuf>) -> Self {
        self.append_to = Some(log.into());
        self
    }

    /// Put `prefix` in front of this command; the redirect stays outermost
    pub fn wrapped_in(self, prefix: ShellCommand) -> Self {
        let mut words = prefix.words;
        words.extend(self.words);
        Self {
            words,
            append_to: self.append_to,
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn render(&self) -> String {
        let mut line = self
            .words
            .iter()
            .map(Word::render)
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(log) = &self.append_to {
            line.push_str(" >> ");
            line.push_str(&shell_words::quote(&log.to_string_lossy()));
            line.push_str(" 2>&1");
        }
        line
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
