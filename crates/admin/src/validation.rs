//! Form checks shared by the views.

use adminconsole_core::{DomainError, DomainResult, Resource, names_match};

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Reject blank values for a required field.
pub fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} is required")));
    }
    Ok(())
}

pub fn check_password(password: &str) -> DomainResult<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters ({len}/{MIN_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Reject a name already used by another active record.
///
/// `editing` is the record being saved, which may keep its own name.
pub fn check_unique_name<R: Resource>(
    records: &[R],
    name_of: impl Fn(&R) -> &str,
    name: &str,
    editing: Option<R::Id>,
) -> DomainResult<()> {
    let taken = records
        .iter()
        .filter(|r| r.is_active() && Some(r.id()) != editing)
        .any(|r| names_match(name_of(r), name));
    if taken {
        return Err(DomainError::duplicate(format!(
            "a {} named \"{}\" already exists",
            R::KIND,
            name.trim()
        )));
    }
    Ok(())
}
