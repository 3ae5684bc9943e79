use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::{Context, Result, anyhow};

/// Renders a file through some facility richer than plain text.
pub trait RichPreviewer {
    fn render(
        &mut self,
        path: &Path,
    ) -> Result<String>;
}

/// Runs an external program (`bat`, `glow`, ...) with the path appended and
/// shows its stdout.
#[derive(Debug, Clone)]
pub struct CommandPreviewer {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandPreviewer {
    /// Splits `command_line` with shell quoting rules and resolves the
    /// program to an executable on `PATH`.
    pub fn from_command_line(command_line: &str) -> Result<Self> {
        let words = shlex::split(command_line)
            .ok_or_else(|| anyhow!("unbalanced quotes in previewer {command_line:?}"))?;
        let mut words = words.into_iter();
        let program = words
            .next()
            .ok_or_else(|| anyhow!("empty previewer command"))?;
        let resolved = which::which(&program)
            .with_context(|| format!("previewer {program:?} not found on PATH"))?;
        Ok(CommandPreviewer {
            program: resolved,
            args: words.collect(),
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl RichPreviewer for CommandPreviewer {
    fn render(
        &mut self,
        path: &Path,
    ) -> Result<String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(anyhow!(
                "{} exited with {}",
                self.program.display(),
                output.status
            ));
        }
        Ok(strip_ansi(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Removes CSI and OSC escape sequences so colored output renders as plain text.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                // parameters, then a single final byte in @..~
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\x1b[1;31mred\x1b[0m text"), "red text");
        assert_eq!(strip_ansi("\x1b]8;;http://x\x07link\x1b]8;;\x07"), "link");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn unknown_program_fails_construction() {
        let err = CommandPreviewer::from_command_line("no-such-previewer-xyz --plain").unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
        assert!(CommandPreviewer::from_command_line("   ").is_err());
        assert!(CommandPreviewer::from_command_line("cat 'open").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_program_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let fake = dir.path().join("cat");
        std::fs::write(&fake, "not a program")?;
        let err = CommandPreviewer::from_command_line(&fake.to_string_lossy()).unwrap_err();
        assert!(err.to_string().contains("not found"), "{err}");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn quoted_arguments_stay_whole() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("a.md");
        std::fs::write(&file, "ignored")?;
        let mut previewer = CommandPreviewer::from_command_line("sh -c 'printf \"%s\" hi'")?;
        assert_eq!(previewer.render(&file)?, "hi");
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn cat_renders_file_contents() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("a.md");
        std::fs::write(&file, "# Title\n")?;
        let mut previewer = CommandPreviewer::from_command_line("cat")?;
        assert_eq!(previewer.render(&file)?, "# Title\n");
        Ok(())
    }
}
