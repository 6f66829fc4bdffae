use std::fs;

use nix::unistd::Pid;

use crate::error::{CgroupsError, Result};

/// The single-character process state reported by `/proc/<pid>/stat`'s
/// third field. We only ever need to distinguish "stopped/traced" (`T`)
/// from everything else, to decide whether the freezer driver must send
/// `SIGCONT` before it can re-observe `FREEZING`.
pub fn state_char(pid: Pid) -> Result<char> {
    let path = format!("/proc/{pid}/stat");
    let content = fs::read_to_string(&path).map_err(|e| CgroupsError::io(&path, e))?;
    parse_state_char(&content).ok_or_else(|| {
        CgroupsError::Parse(format!("could not find state field in {path:?}: {content:?}"))
    })
}

/// The comm field (2nd field of `/proc/<pid>/stat`) is `(name)` and may
/// itself contain spaces or parentheses, so the state character is found
/// by scanning backwards from the last `)` rather than splitting on
/// whitespace naively.
fn parse_state_char(content: &str) -> Option<char> {
    let close = content.rfind(')')?;
    content[close + 1..].split_whitespace().next()?.chars().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_comm() {
        assert_eq!(parse_state_char("1234 (bash) S 1 1234 ..."), Some('S'));
    }

    #[test]
    fn parses_comm_with_spaces_and_parens() {
        assert_eq!(
            parse_state_char("1234 (my (weird) proc) T 1 1234 ..."),
            Some('T')
        );
    }

    #[test]
    fn none_on_empty() {
        assert_eq!(parse_state_char(""), None);
    }
}
