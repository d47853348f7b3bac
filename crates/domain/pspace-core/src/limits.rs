use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpaceNameError {
    #[error("Space name cannot be empty")]
    Empty,
}

/// Whether another space may be created.
pub fn can_create_space(count: usize, limit: usize) -> bool {
    count < limit
}

/// Name prefilled in the new-space dialog. `count` is `None` while the
/// space list is still loading.
pub fn suggested_space_name(base: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{base} {}", n + 1),
        None => base.to_string(),
    }
}

pub fn validate_space_name(name: &str) -> Result<String, SpaceNameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SpaceNameError::Empty);
    }
    Ok(trimmed.to_string())
}
