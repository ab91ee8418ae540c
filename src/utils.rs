use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

/// Get the configuration directory path for Workflo
/// If profile is Dev, uses "workflo-dev" instead of "workflo"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "workflo-dev",
        Profile::Prod => "workflo",
    };
    ProjectDirs::from("com", "workflo", app_name)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for Workflo (database and logs)
/// If profile is Dev, uses "workflo-dev" instead of "workflo"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    let app_name = match profile {
        Profile::Dev => "workflo-dev",
        Profile::Prod => "workflo",
    };
    ProjectDirs::from("com", "workflo", app_name)
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path.starts_with("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(&path[2..]);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<chrono::NaiveDate, chrono::ParseError> {
    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Current Unix time in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a creation timestamp (Unix milliseconds) as a coarse relative age,
/// e.g. "5 min ago" or "2 days ago".
///
/// Buckets are checked in order against the elapsed whole seconds; the count
/// is the truncated quotient for the bucket's unit. Unit suffixes are
/// literal, so "1 years ago" is expected output for anything past a year.
pub fn time_ago(created_at_millis: i64, now_millis: i64) -> String {
    let elapsed = (now_millis / 1000 - created_at_millis / 1000).max(0);

    if elapsed < 60 {
        format!("{} sec ago", elapsed)
    } else if elapsed < 3600 {
        format!("{} min ago", elapsed / 60)
    } else if elapsed < 86400 {
        format!("{} hr ago", elapsed / 3600)
    } else if elapsed < 604800 {
        format!("{} days ago", elapsed / 86400)
    } else if elapsed < 31536000 {
        format!("{} weeks ago", elapsed / 604800)
    } else {
        format!("{} years ago", elapsed / 31536000)
    }
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports single keys ("q", "n"), special keys ("Enter", "F1"),
/// and a Ctrl modifier ("Ctrl+s")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Check whether a key event matches a configured binding string.
/// Unparseable bindings never match.
pub fn key_matches(event: &crossterm::event::KeyEvent, binding: &str) -> bool {
    let Ok(parsed) = parse_key_binding(binding) else {
        return false;
    };
    let ctrl_held = event
        .modifiers
        .contains(crossterm::event::KeyModifiers::CONTROL);
    event.code == parsed.key_code && ctrl_held == parsed.requires_ctrl
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    match key_str {
        "Enter" => Ok(crossterm::event::KeyCode::Enter),
        "Esc" | "Escape" => Ok(crossterm::event::KeyCode::Esc),
        "Backspace" => Ok(crossterm::event::KeyCode::Backspace),
        "Tab" => Ok(crossterm::event::KeyCode::Tab),
        "Space" | " " => Ok(crossterm::event::KeyCode::Char(' ')),
        "Left" => Ok(crossterm::event::KeyCode::Left),
        "Right" => Ok(crossterm::event::KeyCode::Right),
        "Up" => Ok(crossterm::event::KeyCode::Up),
        "Down" => Ok(crossterm::event::KeyCode::Down),
        "F1" => Ok(crossterm::event::KeyCode::F(1)),
        "F2" => Ok(crossterm::event::KeyCode::F(2)),
        _ => {
            if key_str.chars().count() == 1 {
                match key_str.chars().next() {
                    Some(c) => Ok(crossterm::event::KeyCode::Char(c)),
                    None => Err("Empty key string".to_string()),
                }
            } else {
                Err(format!("Unknown key binding: {}", key_str))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::time_ago;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn zero_elapsed_is_seconds() {
        assert_eq!(time_ago(NOW, NOW), "0 sec ago");
    }

    #[test]
    fn ninety_seconds_is_one_minute() {
        assert_eq!(time_ago(NOW - 90_000, NOW), "1 min ago");
    }

    #[test]
    fn two_hours() {
        assert_eq!(time_ago(NOW - 7_200_000, NOW), "2 hr ago");
    }

    #[test]
    fn two_days() {
        assert_eq!(time_ago(NOW - 2 * 86_400_000, NOW), "2 days ago");
    }

    #[test]
    fn weeks_bucket_before_a_year() {
        assert_eq!(time_ago(NOW - 14 * 86_400_000, NOW), "2 weeks ago");
    }

    #[test]
    fn four_hundred_days_is_one_year_literal() {
        assert_eq!(time_ago(NOW - 400 * 86_400_000, NOW), "1 years ago");
    }

    #[test]
    fn future_timestamps_clamp_to_zero() {
        assert_eq!(time_ago(NOW + 5_000, NOW), "0 sec ago");
    }
}
