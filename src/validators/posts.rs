use crate::errors::ValidationError;

const CONTENT_MAX_LENGTH: usize = 10000;

/// Returns trimmed content
pub fn clean_content(
    content: &str,
    empty_error: &'static str,
) -> Result<String, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError(empty_error));
    };
    if content.chars().count() > CONTENT_MAX_LENGTH {
        return Err(ValidationError("content is too long"));
    };
    Ok(content.to_string())
}
