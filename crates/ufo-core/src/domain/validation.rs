use semver::Version;

use crate::domain::error::DomainError;

/// Centralized domain validation.
///
/// All validation logic for user-entered values lives here, not scattered
/// across entities.
pub struct DomainValidator;

impl DomainValidator {
    /// Project names start with a letter. After that come letters and
    /// digits, or a `-`/`_` separator that must be followed by a letter.
    ///
    /// `my-app`, `my_app2`, `MyApp` pass; `1app`, `my--app`, `my-1app`,
    /// `my-app-` fail.
    pub fn validate_project_name(name: &str) -> Result<(), DomainError> {
        let reject = |reason: &str| {
            Err(DomainError::InvalidProjectName {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };

        let mut chars = name.chars().peekable();
        match chars.next() {
            None => return reject("name cannot be empty"),
            Some(c) if !c.is_ascii_alphabetic() => return reject("name must start with a letter"),
            Some(_) => {}
        }

        while let Some(c) = chars.next() {
            match c {
                '-' | '_' => match chars.peek() {
                    Some(next) if next.is_ascii_alphabetic() => {}
                    Some(_) => return reject("a separator must be followed by a letter"),
                    None => return reject("name cannot end with a separator"),
                },
                c if c.is_ascii_alphanumeric() => {}
                _ => return reject("only letters, digits, '-' and '_' are allowed"),
            }
        }

        Ok(())
    }

    pub fn validate_project_version(version: &str) -> Result<(), DomainError> {
        Version::parse(version).map(|_| ()).map_err(|e| {
            DomainError::InvalidProjectInfo(format!("'{version}' is not a semver version: {e}"))
        })
    }
}
