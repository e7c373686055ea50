//! Worktree selection UI
//!
//! A type-to-filter list shown by `xlaunch open` when no name is given.

use crate::parser::WorktreeRecord;
use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::io;

/// Result of picker interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    /// User selected a worktree
    Selected(WorktreeRecord),
    /// User cancelled the picker
    Cancel,
}

/// Worktree picker UI component
pub struct WorktreePicker {
    /// All worktrees, in display order
    worktrees: Vec<WorktreeRecord>,

    /// Current filter text
    filter: String,

    /// Indices into `worktrees` matching the filter
    visible: Vec<usize>,

    /// Selected position within `visible`
    selected_index: usize,

    list_state: ListState,
}

impl WorktreePicker {
    pub fn new(worktrees: Vec<WorktreeRecord>) -> Self {
        let mut picker = Self {
            worktrees,
            filter: String::new(),
            visible: Vec::new(),
            selected_index: 0,
            list_state: ListState::default(),
        };
        picker.apply_filter();
        picker
    }

    /// Get current selection
    pub fn selected(&self) -> Option<&WorktreeRecord> {
        self.visible
            .get(self.selected_index)
            .and_then(|&i| self.worktrees.get(i))
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Number of worktrees matching the filter
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Case-insensitive match on name, branch or repository
    fn apply_filter(&mut self) {
        let needle = self.filter.to_lowercase();
        self.visible = self
            .worktrees
            .iter()
            .enumerate()
            .filter(|(_, wt)| {
                needle.is_empty()
                    || [&wt.name, &wt.branch, &wt.repo_name]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect();
        self.selected_index = 0;
        self.list_state
            .select(if self.visible.is_empty() { None } else { Some(0) });
    }

    /// Handle key input
    ///
    /// Returns `Some(result)` if the picker is done, `None` to continue.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<PickerResult> {
        match key {
            KeyCode::Up => {
                self.move_up();
                None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_down();
                None
            }
            KeyCode::Enter => self.selected().cloned().map(PickerResult::Selected),
            KeyCode::Esc => Some(PickerResult::Cancel),
            KeyCode::Backspace => {
                if self.filter.pop().is_some() {
                    self.apply_filter();
                }
                None
            }
            KeyCode::Char(c) => {
                self.filter.push(c);
                self.apply_filter();
                None
            }
            _ => None,
        }
    }

    fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn move_down(&mut self) {
        if self.selected_index + 1 < self.visible.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    /// Render the picker
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let muted = Style::default().fg(Color::DarkGray);
        let key = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);

        f.render_widget(Clear, area);

        let block = Block::default()
            .title(" Open Worktree ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.height < 3 {
            return;
        }

        let filter_area = Rect { height: 1, ..inner };
        let list_area = Rect {
            y: inner.y + 2,
            height: inner.height.saturating_sub(4),
            ..inner
        };
        let help_area = Rect {
            y: inner.y + inner.height - 1,
            height: 1,
            ..inner
        };

        let filter_line = Line::from(vec![
            Span::styled("Filter: ", muted),
            Span::raw(&self.filter),
            Span::styled("_", key),
        ]);
        f.render_widget(Paragraph::new(filter_line), filter_area);

        if self.visible.is_empty() {
            let text = if self.worktrees.is_empty() {
                "No worktrees found"
            } else {
                "No matching worktrees"
            };
            f.render_widget(Paragraph::new(text).style(muted), list_area);
        } else {
            let items: Vec<ListItem> = self
                .visible
                .iter()
                .filter_map(|&i| self.worktrees.get(i))
                .map(|wt| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<24} ", wt.name),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!("{:<12} ", wt.repo_name), muted),
                        Span::styled(wt.session_info(), Style::default().fg(Color::Green)),
                    ]))
                })
                .collect();

            let list = List::new(items)
                .highlight_style(Style::default().bg(Color::DarkGray))
                .highlight_symbol("> ");
            f.render_stateful_widget(list, list_area, &mut self.list_state);
        }

        let help = Line::from(vec![
            Span::styled("[", muted),
            Span::styled("Up/Down", key),
            Span::styled("] Navigate  [", muted),
            Span::styled("Enter", key),
            Span::styled("] Open  [", muted),
            Span::styled("Esc", key),
            Span::styled("] Cancel", muted),
        ]);
        f.render_widget(Paragraph::new(help), help_area);
    }
}

/// Calculate centered popup area
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_width = area.width * percent_x / 100;
    let popup_height = area.height * percent_y / 100;

    Rect {
        x: area.x + (area.width - popup_width) / 2,
        y: area.y + (area.height - popup_height) / 2,
        width: popup_width,
        height: popup_height,
    }
}

/// Show the picker full-screen until the user selects or cancels
pub fn run_picker(worktrees: Vec<WorktreeRecord>) -> Result<PickerResult> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = event_loop(&mut WorktreePicker::new(worktrees), stdout);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    result
}

fn event_loop(picker: &mut WorktreePicker, stdout: io::Stdout) -> Result<PickerResult> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    loop {
        terminal.draw(|f| {
            let area = centered_rect(80, 70, f.area());
            picker.render(f, area);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(result) = picker.handle_key(key.code) {
                return Ok(result);
            }
        }
    }
}
