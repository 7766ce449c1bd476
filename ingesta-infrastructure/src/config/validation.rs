use anyhow::{anyhow, Result};

/// Base prefix segments may only use characters that need no URL escaping.
pub fn validate_base_path(value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    for segment in value.split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(anyhow!("base_path has an empty or relative segment: '{}'", value));
        }
        if !segment
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | '='))
        {
            return Err(anyhow!("base_path contains unsupported characters: '{}'", value));
        }
    }
    Ok(())
}

/// Azure container naming: 3-63 chars, lowercase letters, digits and
/// single hyphens, starting and ending with a letter or digit.
pub fn validate_container_name(value: &str) -> Result<()> {
    let valid_chars = value
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-');
    if !(3..=63).contains(&value.len())
        || !valid_chars
        || value.starts_with('-')
        || value.ends_with('-')
        || value.contains("--")
    {
        return Err(anyhow!("invalid container name '{}'", value));
    }
    Ok(())
}
