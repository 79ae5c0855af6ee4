use std::path::Path;

use anyhow::{Context, Result};

use crate::fixer;
use crate::validate::{Validator, Verdict};
use crate::vcs;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixKind {
    UnusedDependency { name: String },
    Other(String),
}

/// One queued fix. Immutable once enqueued; the queue order is the
/// processing order.
#[derive(Debug, Clone)]
pub struct FixDescriptor {
    pub kind: FixKind,
    pub message: String,
}

impl FixDescriptor {
    pub fn unused_dependency(name: &str) -> Self {
        Self {
            kind: FixKind::UnusedDependency {
                name: name.to_string(),
            },
            message: format!("Remove unused dependency: {}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    Committed { branch: String },
    Reverted,
}

/// The pipeline's whole mutable state, threaded through each step as a
/// value. `last_working_branch` always names a branch whose validation
/// passed (or the pristine base) and only advances on a committed fix.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub last_working_branch: String,
    pub index: usize,
}

impl PipelineState {
    pub fn new(base_branch: &str) -> Self {
        Self {
            last_working_branch: base_branch.to_string(),
            index: 0,
        }
    }
}

#[derive(Debug)]
pub struct DescriptorReport {
    pub message: String,
    pub outcome: FixOutcome,
}

#[derive(Debug)]
pub struct PipelineReport {
    pub outcomes: Vec<DescriptorReport>,
    pub final_branch: String,
}

impl PipelineReport {
    pub fn committed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.outcome, FixOutcome::Committed { .. }))
            .count()
    }

    pub fn reverted(&self) -> usize {
        self.outcomes.len() - self.committed()
    }
}

pub struct Pipeline<'a> {
    root: &'a Path,
    branch_prefix: &'a str,
    validator: &'a dyn Validator,
}

impl<'a> Pipeline<'a> {
    pub fn new(root: &'a Path, branch_prefix: &'a str, validator: &'a dyn Validator) -> Self {
        Self {
            root,
            branch_prefix,
            validator,
        }
    }

    /// Process the queue in order, folding the state through each step.
    /// A failed validation reverts that one descriptor and the run goes on;
    /// a failed branch or commit operation aborts the whole run.
    pub fn run(
        &self,
        queue: &[FixDescriptor],
        mut state: PipelineState,
    ) -> Result<PipelineReport> {
        let mut outcomes = Vec::with_capacity(queue.len());

        for descriptor in queue {
            let (next, outcome) = self.step(descriptor, state)?;
            outcomes.push(DescriptorReport {
                message: descriptor.message.clone(),
                outcome,
            });
            state = next;
        }

        Ok(PipelineReport {
            outcomes,
            final_branch: state.last_working_branch,
        })
    }

    /// One descriptor's lifecycle: fork a candidate branch off the last
    /// working one, apply the mechanical remedy, validate, then either
    /// commit (the candidate becomes the new rollback anchor) or check the
    /// anchor back out and delete the candidate.
    fn step(
        &self,
        descriptor: &FixDescriptor,
        state: PipelineState,
    ) -> Result<(PipelineState, FixOutcome)> {
        let branch = format!("{}_{}", self.branch_prefix, state.index + 1);

        vcs::create_branch(self.root, &branch)
            .with_context(|| format!("creating fix branch {}", branch))?;

        self.apply(descriptor)?;

        match self.validator.validate(self.root) {
            Verdict::Pass => {
                vcs::commit_all(self.root, &format!("Fix: {}", descriptor.message))
                    .with_context(|| format!("committing fix on {}", branch))?;
                let next = PipelineState {
                    last_working_branch: branch.clone(),
                    index: state.index + 1,
                };
                Ok((next, FixOutcome::Committed { branch }))
            }
            Verdict::Fail => {
                vcs::checkout(self.root, &state.last_working_branch).with_context(|| {
                    format!("restoring last working branch {}", state.last_working_branch)
                })?;
                vcs::delete_branch(self.root, &branch)
                    .with_context(|| format!("discarding failed fix branch {}", branch))?;
                let next = PipelineState {
                    index: state.index + 1,
                    ..state
                };
                Ok((next, FixOutcome::Reverted))
            }
        }
    }

    fn apply(&self, descriptor: &FixDescriptor) -> Result<()> {
        match &descriptor.kind {
            FixKind::UnusedDependency { name } => {
                fixer::remove_dependency(self.root, name)?;
            }
            // No mechanical remedy; the unmodified tree goes to validation.
            FixKind::Other(_) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    struct StaticValidator(Verdict);

    impl Validator for StaticValidator {
        fn validate(&self, _root: &Path) -> Verdict {
            self.0
        }
    }

    struct SequenceValidator(RefCell<VecDeque<Verdict>>);

    impl SequenceValidator {
        fn new(verdicts: &[Verdict]) -> Self {
            Self(RefCell::new(verdicts.iter().copied().collect()))
        }
    }

    impl Validator for SequenceValidator {
        fn validate(&self, _root: &Path) -> Verdict {
            self.0.borrow_mut().pop_front().unwrap_or(Verdict::Fail)
        }
    }

    fn git_available() -> bool {
        Command::new("git").arg("--version").output().is_ok()
    }

    fn git(root: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(root)
            .output()
            .unwrap();
        assert!(status.status.success(), "git {:?} failed", args);
    }

    fn project_fixture() -> Option<TempDir> {
        if !git_available() {
            return None;
        }
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("package.json"),
            r#"{"dependencies": {"left-pad": "^1.3.0", "lodash": "^4.17.0"}}"#,
        )
        .unwrap();
        fs::write(temp.path().join("index.js"), "import \"lodash\"\n").unwrap();

        git(temp.path(), &["init"]);
        git(temp.path(), &["config", "user.email", "test@remend.dev"]);
        git(temp.path(), &["config", "user.name", "remend-test"]);
        git(temp.path(), &["config", "commit.gpgsign", "false"]);
        vcs::ensure_base(temp.path(), "fix_base").unwrap();
        Some(temp)
    }

    fn manifest(root: &Path) -> String {
        fs::read_to_string(root.join("package.json")).unwrap()
    }

    #[test]
    fn test_validated_fix_advances_branch_and_removes_dependency() {
        let Some(temp) = project_fixture() else { return };
        let validator = StaticValidator(Verdict::Pass);
        let pipeline = Pipeline::new(temp.path(), "fix", &validator);

        let queue = vec![FixDescriptor::unused_dependency("left-pad")];
        let report = pipeline.run(&queue, PipelineState::new("fix_base")).unwrap();

        assert_eq!(report.final_branch, "fix_1");
        assert_eq!(report.committed(), 1);
        assert_eq!(vcs::current_branch(temp.path()).unwrap(), "fix_1");
        assert!(!manifest(temp.path()).contains("left-pad"));
        assert!(manifest(temp.path()).contains("lodash"));

        // The base branch still carries the original manifest.
        vcs::checkout(temp.path(), "fix_base").unwrap();
        assert!(manifest(temp.path()).contains("left-pad"));
    }

    #[test]
    fn test_failed_fix_reverts_and_leaves_no_trace() {
        let Some(temp) = project_fixture() else { return };
        let before = manifest(temp.path());

        let validator = StaticValidator(Verdict::Fail);
        let pipeline = Pipeline::new(temp.path(), "fix", &validator);

        let queue = vec![FixDescriptor::unused_dependency("left-pad")];
        let report = pipeline.run(&queue, PipelineState::new("fix_base")).unwrap();

        assert_eq!(report.final_branch, "fix_base");
        assert_eq!(report.reverted(), 1);
        assert_eq!(vcs::current_branch(temp.path()).unwrap(), "fix_base");
        assert!(!vcs::branch_exists(temp.path(), "fix_1"));
        // Rollback restores the tree byte for byte.
        assert_eq!(manifest(temp.path()), before);
    }

    #[test]
    fn test_failures_do_not_compound() {
        let Some(temp) = project_fixture() else { return };

        let validator =
            SequenceValidator::new(&[Verdict::Pass, Verdict::Fail, Verdict::Pass]);
        let pipeline = Pipeline::new(temp.path(), "fix", &validator);

        let queue = vec![
            FixDescriptor::unused_dependency("left-pad"),
            FixDescriptor::unused_dependency("lodash"),
            FixDescriptor {
                kind: FixKind::Other("large_file".to_string()),
                message: "Large file: App.jsx".to_string(),
            },
        ];
        let report = pipeline.run(&queue, PipelineState::new("fix_base")).unwrap();

        // Branch numbering follows queue position even across failures, and
        // the third fix forks from fix_1, not from the discarded fix_2.
        assert_eq!(report.final_branch, "fix_3");
        assert_eq!(report.committed(), 2);
        assert_eq!(report.reverted(), 1);
        assert!(vcs::branch_exists(temp.path(), "fix_1"));
        assert!(!vcs::branch_exists(temp.path(), "fix_2"));
        assert!(vcs::branch_exists(temp.path(), "fix_3"));

        // lodash survived its reverted descriptor; left-pad did not.
        assert!(manifest(temp.path()).contains("lodash"));
        assert!(!manifest(temp.path()).contains("left-pad"));
    }

    #[test]
    fn test_unrecognized_kind_passes_through_unchanged() {
        let Some(temp) = project_fixture() else { return };
        let before = manifest(temp.path());

        let validator = StaticValidator(Verdict::Pass);
        let pipeline = Pipeline::new(temp.path(), "fix", &validator);

        let queue = vec![FixDescriptor {
            kind: FixKind::Other("mystery".to_string()),
            message: "Unknown issue".to_string(),
        }];
        let report = pipeline.run(&queue, PipelineState::new("fix_base")).unwrap();

        assert_eq!(report.final_branch, "fix_1");
        assert_eq!(manifest(temp.path()), before);
    }

    #[test]
    fn test_empty_queue_is_a_noop() {
        let Some(temp) = project_fixture() else { return };

        let validator = StaticValidator(Verdict::Pass);
        let pipeline = Pipeline::new(temp.path(), "fix", &validator);

        let report = pipeline.run(&[], PipelineState::new("fix_base")).unwrap();
        assert_eq!(report.final_branch, "fix_base");
        assert!(report.outcomes.is_empty());
    }
}
