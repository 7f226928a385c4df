use crate::error::ApiError;

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::validation("Email cannot be empty"));
    }

    if email.len() > 254 {
        return Err(ApiError::validation("Email too long"));
    }

    if email.chars().any(|c| c.is_whitespace()) {
        return Err(ApiError::validation("Invalid email format"));
    }

    let (local, domain) = match email.split_once('@') {
        Some(parts) => parts,
        None => return Err(ApiError::validation("Invalid email format")),
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ApiError::validation("Invalid email format"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(ApiError::validation("Invalid email format"));
    }

    Ok(())
}

pub fn validate_org_name(name: &str) -> Result<(), ApiError> {
    validate_length("Organisation name", name, 2, 100)
}

pub fn validate_team_name(name: &str) -> Result<(), ApiError> {
    validate_length("Team name", name, 2, 100)
}

pub fn validate_person_name(field: &str, name: &str) -> Result<(), ApiError> {
    validate_length(field, name, 1, 50)
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters long",
        ));
    }
    Ok(())
}

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min {
        return Err(ApiError::validation(format!(
            "{} must be at least {} characters long",
            field, min
        )));
    }
    if len > max {
        return Err(ApiError::validation(format!(
            "{} cannot exceed {} characters",
            field, max
        )));
    }
    Ok(())
}
