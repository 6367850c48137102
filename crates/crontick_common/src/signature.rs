//! Command signatures - stable matching keys derived from a shell command.
//!
//! Two keys are derived from a command line:
//! - the *main token*, the basename of the first word, used to fuzzy-match
//!   free-text log lines in the journal/syslog readers;
//! - the *safe identifier*, a filesystem-safe, length-bounded rendering of
//!   the whole command, used to name its custom execution log.
//!
//! Both are best-effort and infallible: a whitespace-only command yields an
//! empty main token, which downstream matching treats as "match nothing".

/// Characters replaced with `_` when building the safe identifier.
const UNSAFE_CHARS: &[char] = &['/', ' ', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Maximum length of the safe identifier before the `.log` suffix.
const MAX_SAFE_LEN: usize = 50;

/// Matching keys for one schedule entry's command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSignature {
    /// Basename of the command's first word. Empty for degenerate input.
    pub main_token: String,
    /// Filesystem-safe log filename derived from the full command,
    /// including the `.log` suffix.
    pub safe_identifier: String,
    /// Explicit user-supplied log identifier (without extension). Takes
    /// precedence over the derived filename for the custom log.
    pub log_id: Option<String>,
}

impl CommandSignature {
    pub fn new(command: &str) -> Self {
        Self {
            main_token: main_token(command),
            safe_identifier: safe_identifier(command),
            log_id: None,
        }
    }

    pub fn with_log_id(command: &str, log_id: Option<&str>) -> Self {
        Self {
            log_id: log_id.map(str::to_string),
            ..Self::new(command)
        }
    }

    /// Custom-log filename: the explicit identifier when present, the
    /// derived safe identifier otherwise.
    pub fn log_filename(&self) -> String {
        match &self.log_id {
            Some(id) => format!("{}.log", id),
            None => self.safe_identifier.clone(),
        }
    }
}

/// Basename of the first whitespace-delimited word of `command`.
pub fn main_token(command: &str) -> String {
    let first = match command.split_whitespace().next() {
        Some(word) => word,
        None => return String::new(),
    };
    match first.rsplit('/').next() {
        Some(base) => base.to_string(),
        None => first.to_string(),
    }
}

/// Filesystem-safe log filename for `command`: unsafe characters replaced
/// with `_`, truncated to a fixed bound, `.log` appended.
pub fn safe_identifier(command: &str) -> String {
    let mut safe: String = command
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect();
    // Truncate on a char boundary; a byte cut inside a multibyte
    // character would panic.
    let mut end = MAX_SAFE_LEN.min(safe.len());
    while !safe.is_char_boundary(end) {
        end -= 1;
    }
    safe.truncate(end);
    format!("{}.log", safe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_token_strips_path() {
        assert_eq!(main_token("/home/user/scripts/backup.sh --full"), "backup.sh");
    }

    #[test]
    fn main_token_plain_command() {
        assert_eq!(main_token("rsync -av /src /dst"), "rsync");
    }

    #[test]
    fn main_token_empty_for_whitespace() {
        assert_eq!(main_token("   "), "");
        assert_eq!(main_token(""), "");
    }

    #[test]
    fn safe_identifier_replaces_metacharacters() {
        let id = safe_identifier("/usr/bin/find /tmp -name \"*.tmp\"");
        let stem = id.strip_suffix(".log").unwrap();
        for c in ['/', ' ', '\\', ':', '*', '?', '"', '<', '>', '|'] {
            assert!(!stem.contains(c), "unsafe char {:?} in {}", c, stem);
        }
    }

    #[test]
    fn safe_identifier_is_idempotent_and_bounded() {
        let long = "a".repeat(200);
        let first = safe_identifier(&long);
        let second = safe_identifier(&long);
        assert_eq!(first, second);
        assert_eq!(first.len(), 50 + ".log".len());
    }

    #[test]
    fn safe_identifier_truncates_on_char_boundary() {
        // A multibyte character straddling the length bound must not
        // abort; the cut falls back to the previous boundary.
        let command = format!("{}é and more text", "a".repeat(49));
        let id = safe_identifier(&command);
        let stem = id.strip_suffix(".log").unwrap();
        assert!(stem.len() <= 50);
        assert!(stem.starts_with(&"a".repeat(49)));

        // Fully multibyte input stays bounded too.
        let id = safe_identifier(&"é".repeat(100));
        assert!(id.strip_suffix(".log").unwrap().len() <= 50);
    }

    #[test]
    fn explicit_log_id_takes_precedence() {
        let sig = CommandSignature::with_log_id("/home/user/backup.sh", Some("backup"));
        assert_eq!(sig.log_filename(), "backup.log");
        let sig = CommandSignature::new("/home/user/backup.sh");
        assert_eq!(sig.log_filename(), "_home_user_backup.sh.log");
    }
}
