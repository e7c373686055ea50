//! Shell command composition for terminal sessions

use std::path::Path;

/// Single-quote a string for POSIX shells (`'` becomes `'\''`)
pub fn escape_for_shell(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Quote only when the word contains characters the shell would interpret
pub fn shell_word(s: &str) -> String {
    let safe = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-+~:@%".contains(c));
    if safe {
        s.to_string()
    } else {
        escape_for_shell(s)
    }
}

/// `printf` invocation that sets the tab and window title (OSC 0)
pub fn title_sequence(label: &str) -> String {
    format!(r"printf '\033]0;{}\007'", label.replace('\'', r"\'"))
}

/// `cd <dir>` followed by the optional command
pub fn cd_command(directory: &Path, command: Option<&str>) -> String {
    let cd = format!("cd {}", escape_for_shell(&directory.to_string_lossy()));
    match command {
        Some(cmd) if !cmd.trim().is_empty() => format!("{cd} && {cmd}"),
        _ => cd,
    }
}

/// Full line sent to a new session: title escape, `cd`, command
pub fn titled_command(directory: &Path, command: Option<&str>, label: Option<&str>) -> String {
    let body = cd_command(directory, command);
    match label {
        Some(label) if !label.is_empty() => format!("{} && {}", title_sequence(label), body),
        _ => body,
    }
}

/// Title shown on a tab after a worktree is added as another pane
pub fn combined_title(existing: &str, label: &str) -> String {
    format!("{existing} / {label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_for_shell() {
        assert_eq!(escape_for_shell("/tmp/a b"), "'/tmp/a b'");
        assert_eq!(escape_for_shell("it's"), r"'it'\''s'");
        assert_eq!(escape_for_shell(""), "''");
    }

    #[test]
    fn test_shell_word() {
        assert_eq!(shell_word("/Users/me/.cargo/bin/xlaude"), "/Users/me/.cargo/bin/xlaude");
        assert_eq!(shell_word("/Applications/My Tools/xlaude"), "'/Applications/My Tools/xlaude'");
        assert_eq!(shell_word(""), "''");
    }

    #[test]
    fn test_title_sequence() {
        assert_eq!(title_sequence("alpha"), r"printf '\033]0;alpha\007'");
        assert_eq!(title_sequence("bob's"), r"printf '\033]0;bob\'s\007'");
    }

    #[test]
    fn test_cd_command() {
        assert_eq!(cd_command(Path::new("/w/alpha"), None), "cd '/w/alpha'");
        assert_eq!(
            cd_command(Path::new("/w/alpha"), Some("xlaude open")),
            "cd '/w/alpha' && xlaude open"
        );
        assert_eq!(cd_command(Path::new("/w/alpha"), Some("  ")), "cd '/w/alpha'");
    }

    #[test]
    fn test_titled_command() {
        assert_eq!(
            titled_command(Path::new("/w/alpha"), Some("xlaude open"), Some("alpha")),
            r"printf '\033]0;alpha\007' && cd '/w/alpha' && xlaude open"
        );
        assert_eq!(
            titled_command(Path::new("/w/alpha"), Some("xlaude open"), None),
            "cd '/w/alpha' && xlaude open"
        );
    }

    #[test]
    fn test_combined_title() {
        assert_eq!(combined_title("alpha", "beta"), "alpha / beta");
        assert_eq!(combined_title("alpha / beta", "gamma"), "alpha / beta / gamma");
    }
}
