//! Bash scripts rendered in memory and written in one go

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{ErrorExt, Result};

pub const SHEBANG: &str = "#!/usr/bin/env bash";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        let mut content = String::with_capacity(
            SHEBANG.len() + 1 + self.lines.iter().map(|l| l.len() + 1).sum::<usize>(),
        );
        content.push_str(SHEBANG);
        content.push('\n');
        for line in &self.lines {
            content.push_str(line);
            content.push('\n');
        }
        content
    }

    /// Write to `path`, creating parent directories, and mark it executable
    pub fn write_executable(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .to_storage_error(parent, "Failed to create script directory")?;
        }
        fs::write(path, self.render()).to_storage_error(path, "Failed to write script")?;
        make_executable(path).to_storage_error(path, "Failed to make script executable")?;
        debug!("Wrote {} ({} lines)", path.display(), self.len());
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for Script {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            lines: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Copy each read bit to the matching execute bit, like `chmod +x` under the umask
#[cfg(unix)]
pub fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    let mode = permissions.mode();
    permissions.set_mode(mode | ((mode & 0o444) >> 2));
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
pub fn make_executable(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
