use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {} ID: {}. ID must be a positive integer",
            resource, id
        )));
    }
    Ok(id)
}

pub fn validate_job_id(id: i32) -> Result<i32, ApiError> {
    validate_id("job", id)
}

pub fn validate_application_id(id: i32) -> Result<i32, ApiError> {
    validate_id("application", id)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();

    if trimmed.len() > 200 {
        return Err(ApiError::validation(
            "Search query must be 200 characters or less",
        ));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_job_id() {
        assert!(validate_job_id(1).is_ok());
        assert!(validate_job_id(100).is_ok());
        assert!(validate_job_id(0).is_err());
        assert!(validate_job_id(-1).is_err());
    }

    #[test]
    fn test_validate_application_id() {
        assert_eq!(validate_application_id(42).unwrap(), 42);
        assert!(validate_application_id(0).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  rust ").unwrap(), "rust");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"a".repeat(201)).is_err());
    }
}
