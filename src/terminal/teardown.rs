//! Closing the tabs and panes of a deleted worktree

use super::bridge::{TerminalBridge, WindowSnapshot};
use super::matcher::SessionMatcher;
use crate::debug;

/// Elements marked for closing, by pane id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownPlan {
    /// Individual panes of multi-pane tabs
    pub panes: Vec<String>,
    /// Single-pane tabs, addressed through their pane
    pub tabs: Vec<String>,
}

impl TeardownPlan {
    pub fn is_empty(&self) -> bool {
        self.panes.is_empty() && self.tabs.is_empty()
    }
}

/// What actually got closed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    pub closed_panes: usize,
    pub closed_tabs: usize,
    /// Close operations that failed and were ignored
    pub failures: usize,
}

/// Mark everything belonging to `worktree_name`
///
/// A pane matches when its own name or its tab's title matches. A match
/// in a single-pane tab marks the tab; in a split tab only the pane.
pub fn plan_teardown<M: SessionMatcher + ?Sized>(
    windows: &[WindowSnapshot],
    matcher: &M,
    worktree_name: &str,
) -> TeardownPlan {
    let mut plan = TeardownPlan::default();

    for tab in windows.iter().flat_map(|w| &w.tabs) {
        let tab_matches = matcher.matches(&tab.title, worktree_name);
        for pane in &tab.panes {
            if !(tab_matches || matcher.matches(&pane.name, worktree_name)) {
                continue;
            }
            if tab.panes.len() == 1 {
                plan.tabs.push(pane.id.clone());
                break;
            }
            plan.panes.push(pane.id.clone());
        }
    }

    plan
}

/// Close every tab/pane whose title matches `worktree_name`
///
/// Never fails: enumeration or close errors (already closed, terminal not
/// running) are logged and skipped. Panes are closed before tabs.
pub fn close_sessions_for_name<B, M>(bridge: &B, matcher: &M, worktree_name: &str) -> TeardownReport
where
    B: TerminalBridge + ?Sized,
    M: SessionMatcher + ?Sized,
{
    let mut report = TeardownReport::default();

    let windows = match bridge.enumerate() {
        Ok(windows) => windows,
        Err(e) => {
            debug::log_terminal("teardown enumerate failed", &format!("{e:#}"));
            return report;
        }
    };

    let plan = plan_teardown(&windows, matcher, worktree_name);
    debug::log_terminal(
        "teardown",
        &format!(
            "{}: {} panes, {} tabs",
            worktree_name,
            plan.panes.len(),
            plan.tabs.len()
        ),
    );

    for pane_id in &plan.panes {
        match bridge.close_pane(pane_id) {
            Ok(()) => report.closed_panes += 1,
            Err(e) => {
                report.failures += 1;
                debug::log_terminal("close pane failed", &format!("{e:#}"));
            }
        }
    }

    for pane_id in &plan.tabs {
        match bridge.close_tab(pane_id) {
            Ok(()) => report.closed_tabs += 1,
            Err(e) => {
                report.failures += 1;
                debug::log_terminal("close tab failed", &format!("{e:#}"));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::super::bridge::{MockTerminalBridge, PaneSnapshot, TabSnapshot};
    use super::super::matcher::SubstringMatcher;
    use super::*;
    use mockall::Sequence;
    use mockall::predicate::*;

    fn tab(index: usize, title: &str, panes: &[(&str, &str)]) -> TabSnapshot {
        TabSnapshot {
            index,
            title: title.to_string(),
            panes: panes
                .iter()
                .map(|(id, name)| PaneSnapshot {
                    id: id.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    fn sample_windows() -> Vec<WindowSnapshot> {
        vec![WindowSnapshot {
            id: "w1".to_string(),
            tabs: vec![
                tab(1, "alpha", &[("p1", "alpha")]),
                tab(2, "gamma", &[("p2", "alpha / beta"), ("p3", "gamma")]),
            ],
        }]
    }

    #[test]
    fn test_plan_single_and_split() {
        let plan = plan_teardown(&sample_windows(), &SubstringMatcher, "alpha");
        assert_eq!(plan.tabs, ["p1"]);
        assert_eq!(plan.panes, ["p2"]);
    }

    #[test]
    fn test_plan_tab_title_marks_all_panes() {
        let windows = vec![WindowSnapshot {
            id: "w1".to_string(),
            tabs: vec![tab(1, "delta", &[("p1", "zsh"), ("p2", "delta")])],
        }];
        let plan = plan_teardown(&windows, &SubstringMatcher, "delta");
        assert_eq!(plan.panes, ["p1", "p2"]);
        assert!(plan.tabs.is_empty());
    }

    #[test]
    fn test_plan_across_windows() {
        let mut windows = sample_windows();
        windows.push(WindowSnapshot {
            id: "w2".to_string(),
            tabs: vec![tab(1, "alpha", &[("p9", "alpha")])],
        });
        let plan = plan_teardown(&windows, &SubstringMatcher, "alpha");
        assert_eq!(plan.tabs, ["p1", "p9"]);
    }

    #[test]
    fn test_plan_no_match() {
        let plan = plan_teardown(&sample_windows(), &SubstringMatcher, "omega");
        assert!(plan.is_empty());
    }

    #[test]
    fn test_close_panes_before_tabs() {
        let mut bridge = MockTerminalBridge::new();
        let mut seq = Sequence::new();
        bridge.expect_enumerate().returning(|| Ok(sample_windows()));
        bridge
            .expect_close_pane()
            .with(eq("p2"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        bridge
            .expect_close_tab()
            .with(eq("p1"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let report = close_sessions_for_name(&bridge, &SubstringMatcher, "alpha");
        assert_eq!(
            report,
            TeardownReport {
                closed_panes: 1,
                closed_tabs: 1,
                failures: 0,
            }
        );
    }

    #[test]
    fn test_close_failures_are_ignored() {
        let mut bridge = MockTerminalBridge::new();
        bridge.expect_enumerate().returning(|| Ok(sample_windows()));
        bridge
            .expect_close_pane()
            .returning(|_| Err(anyhow::anyhow!("already closed")));
        bridge.expect_close_tab().times(1).returning(|_| Ok(()));

        let report = close_sessions_for_name(&bridge, &SubstringMatcher, "alpha");
        assert_eq!(report.failures, 1);
        assert_eq!(report.closed_tabs, 1);
    }

    #[test]
    fn test_enumeration_failure_is_ignored() {
        let mut bridge = MockTerminalBridge::new();
        bridge
            .expect_enumerate()
            .returning(|| Err(anyhow::anyhow!("iTerm is not running")));
        bridge.expect_close_pane().never();
        bridge.expect_close_tab().never();

        let report = close_sessions_for_name(&bridge, &SubstringMatcher, "alpha");
        assert_eq!(report, TeardownReport::default());
    }
}
