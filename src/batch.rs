//! Serial best-effort batch deletion

use crate::parser::WorktreeRecord;
use crate::runner::CommandResult;

/// Outcome of a delete-all run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub deleted: usize,
    /// (worktree name, error message)
    pub failed: Vec<(String, String)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// "3 worktrees removed" or "2 deleted, 1 failed"
    pub fn summary(&self) -> String {
        if self.is_success() {
            format!(
                "{} worktree{} removed",
                self.deleted,
                if self.deleted == 1 { "" } else { "s" }
            )
        } else {
            format!("{} deleted, {} failed", self.deleted, self.failed.len())
        }
    }
}

/// Delete every worktree in order, never stopping at a failure
///
/// `progress(done, total)` is called after each attempt.
pub fn delete_all<D, P>(worktrees: &[WorktreeRecord], mut delete: D, mut progress: P) -> BatchReport
where
    D: FnMut(&WorktreeRecord) -> CommandResult,
    P: FnMut(usize, usize),
{
    let total = worktrees.len();
    let mut report = BatchReport {
        total,
        ..BatchReport::default()
    };

    for (i, worktree) in worktrees.iter().enumerate() {
        let result = delete(worktree);
        if result.success {
            report.deleted += 1;
        } else {
            report.failed.push((worktree.name.clone(), result.message));
        }
        progress(i + 1, total);
    }

    report
}
