use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::error::{ChannelError, Result};
use crate::line::{LineIo, LineStream};

/// Base arguments for a long-lived slave-mode player.
///
/// `-msglevel all=-1:global=4` silences everything except the answer lines
/// the command protocol depends on.
pub const SLAVE_MODE_ARGS: &[&str] = &["-slave", "-quiet", "-idle", "-msglevel", "all=-1:global=4"];

/// Value of one extra startup option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// `-name` when true, omitted entirely when false.
    Flag(bool),
    /// `-name value`.
    Value(String),
}

/// How to launch the player binary: path plus extra startup options.
///
/// Options are passed through verbatim; mplb does not know or validate the
/// player's own option vocabulary.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    binary: PathBuf,
    options: Vec<(String, OptionValue)>,
}

impl LaunchSpec {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            options: Vec::new(),
        }
    }

    /// Add a boolean option (`-name`, or nothing when `enabled` is false).
    pub fn flag(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.options.push((name.into(), OptionValue::Flag(enabled)));
        self
    }

    /// Add a valued option (`-name value`).
    pub fn option(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.options
            .push((name.into(), OptionValue::Value(value.to_string())));
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Assemble the extra-option argument vector.
    pub fn option_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for (name, value) in &self.options {
            match value {
                OptionValue::Flag(false) => {}
                OptionValue::Flag(true) => args.push(format!("-{name}")),
                OptionValue::Value(v) => {
                    args.push(format!("-{name}"));
                    args.push(v.clone());
                }
            }
        }
        args
    }
}

/// A live player child process with line-oriented stdio attached.
///
/// Exclusively owned by one proxy. Terminated explicitly via
/// [`PlayerProcess::terminate`] or implicitly on drop, so a leaked handle
/// never leaks the operating-system process.
#[derive(Debug)]
pub struct PlayerProcess {
    child: Child,
    io: LineStream<ChildStdout, ChildStdin>,
    terminated: bool,
}

impl PlayerProcess {
    /// Launch a long-lived slave-mode player.
    pub fn launch(spec: &LaunchSpec) -> Result<Self> {
        let mut args: Vec<String> = SLAVE_MODE_ARGS.iter().map(|s| s.to_string()).collect();
        args.extend(spec.option_args());
        Self::spawn(spec.binary(), &args)
    }

    /// Launch a short-lived discovery pass (`-input cmdlist` or
    /// `-list-properties`), collect every stdout line, and reap the child.
    pub fn discovery_pass(binary: &Path, flags: &[&str]) -> Result<Vec<String>> {
        let args: Vec<String> = flags.iter().map(|s| s.to_string()).collect();
        let mut process = Self::spawn(binary, &args)?;

        let mut lines = Vec::new();
        while let Some(line) = process.io.read_line()? {
            lines.push(line);
        }
        process.terminated = true; // the pass exits on its own
        process.child.wait()?;
        tracing::debug!(
            binary = %binary.display(),
            ?flags,
            lines = lines.len(),
            "discovery pass complete"
        );
        Ok(lines)
    }

    fn spawn(binary: &Path, args: &[String]) -> Result<Self> {
        tracing::debug!(binary = %binary.display(), ?args, "spawning player");
        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| {
                if source.kind() == ErrorKind::NotFound {
                    ChannelError::PlayerNotFound {
                        path: binary.to_path_buf(),
                    }
                } else {
                    ChannelError::Spawn {
                        path: binary.to_path_buf(),
                        source,
                    }
                }
            })?;

        // Both pipes were requested above, so take() cannot return None.
        let stdin = child.stdin.take().ok_or_else(|| {
            ChannelError::Io(std::io::Error::other("player stdin not captured"))
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ChannelError::Io(std::io::Error::other("player stdout not captured"))
        })?;

        Ok(Self {
            child,
            io: LineStream::new(stdout, stdin),
            terminated: false,
        })
    }

    /// Kill the player and reap it. Idempotent.
    pub fn terminate(&mut self) -> Result<()> {
        if self.terminated {
            return Ok(());
        }
        self.terminated = true;
        match self.child.kill() {
            Ok(()) => {}
            // Already exited on its own.
            Err(err) if err.kind() == ErrorKind::InvalidInput => {}
            Err(err) => return Err(ChannelError::Io(err)),
        }
        self.child.wait()?;
        Ok(())
    }

    /// OS process id of the player.
    pub fn id(&self) -> u32 {
        self.child.id()
    }
}

impl LineIo for PlayerProcess {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.io.write_line(line)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        self.io.read_line()
    }
}

impl Drop for PlayerProcess {
    fn drop(&mut self) {
        if let Err(err) = self.terminate() {
            tracing::warn!(pid = self.child.id(), %err, "failed to terminate player");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_args_assembly() {
        let spec = LaunchSpec::new("/usr/bin/mplayer")
            .flag("fs", true)
            .flag("nosound", false)
            .option("speed", 2.0)
            .option("ao", "alsa");

        assert_eq!(spec.option_args(), vec!["-fs", "-speed", "2", "-ao", "alsa"]);
    }

    #[test]
    fn option_args_empty_spec() {
        let spec = LaunchSpec::new("mplayer");
        assert!(spec.option_args().is_empty());
    }

    #[test]
    fn missing_binary_maps_to_player_not_found() {
        let spec = LaunchSpec::new("/nonexistent/mplayer-test-binary");
        let err = PlayerProcess::launch(&spec).unwrap_err();
        assert!(matches!(err, ChannelError::PlayerNotFound { .. }));
    }

    #[test]
    fn discovery_pass_missing_binary_fails() {
        let err =
            PlayerProcess::discovery_pass(Path::new("/nonexistent/mplayer-test-binary"), &["-input", "cmdlist"])
                .unwrap_err();
        assert!(matches!(err, ChannelError::PlayerNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn discovery_pass_collects_lines() {
        let lines = PlayerProcess::discovery_pass(Path::new("/bin/echo"), &["one two"]).unwrap();
        assert_eq!(lines, vec!["one two".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn launch_and_terminate_roundtrip() {
        // `cat` echoes stdin lines back, which is enough to exercise the
        // line channel against a real child process.
        let mut process = PlayerProcess::spawn(Path::new("/bin/cat"), &[]).unwrap();
        process.write_line("pausing_keep get_property loop").unwrap();
        assert_eq!(
            process.read_line().unwrap().as_deref(),
            Some("pausing_keep get_property loop")
        );
        process.terminate().unwrap();
        // Idempotent.
        process.terminate().unwrap();
    }
}
