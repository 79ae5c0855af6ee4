use std::path::Path;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn passed(self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

/// Judges whether a project is in a runnable state. The pipeline only sees
/// this seam, so tests can substitute a canned verdict.
pub trait Validator {
    fn validate(&self, root: &Path) -> Verdict;
}

/// Liveness-only validation: launch the project's dev server, give it a
/// fixed grace window, then stop it. Surviving the window, or even exiting
/// inside it, counts as a pass; only a failed launch fails. This is a
/// heuristic, not a correctness check, and the fixed window is the only
/// timeout there is.
#[derive(Debug, Clone)]
pub struct ServeValidator {
    command: Vec<String>,
    grace: Duration,
}

impl ServeValidator {
    pub fn new(command: Vec<String>, grace: Duration) -> Self {
        Self { command, grace }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.serve_command.clone(),
            Duration::from_secs(config.grace_secs),
        )
    }
}

impl Validator for ServeValidator {
    fn validate(&self, root: &Path) -> Verdict {
        let Some((program, args)) = self.command.split_first() else {
            return Verdict::Fail;
        };

        let child = Command::new(program)
            .args(args)
            .current_dir(root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn();

        match child {
            Ok(mut child) => {
                thread::sleep(self.grace);
                let _ = child.kill();
                let _ = child.wait();
                Verdict::Pass
            }
            Err(_) => Verdict::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_command_fails() {
        let temp = TempDir::new().unwrap();
        let validator = ServeValidator::new(
            vec!["remend-no-such-binary".to_string()],
            Duration::from_millis(50),
        );
        assert_eq!(validator.validate(temp.path()), Verdict::Fail);
    }

    #[test]
    fn test_empty_command_fails() {
        let temp = TempDir::new().unwrap();
        let validator = ServeValidator::new(Vec::new(), Duration::from_millis(50));
        assert_eq!(validator.validate(temp.path()), Verdict::Fail);
    }

    #[cfg(unix)]
    #[test]
    fn test_long_running_process_passes() {
        let temp = TempDir::new().unwrap();
        let validator = ServeValidator::new(
            vec!["sleep".to_string(), "30".to_string()],
            Duration::from_millis(100),
        );
        assert_eq!(validator.validate(temp.path()), Verdict::Pass);
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_within_grace_still_passes() {
        let temp = TempDir::new().unwrap();
        let validator =
            ServeValidator::new(vec!["true".to_string()], Duration::from_millis(50));
        assert_eq!(validator.validate(temp.path()), Verdict::Pass);
    }

    #[test]
    fn test_from_config_uses_grace_secs() {
        let config = Config::default();
        let validator = ServeValidator::from_config(&config);
        assert_eq!(validator.grace, Duration::from_secs(5));
        assert_eq!(validator.command, vec!["npm", "run", "dev"]);
    }
}
