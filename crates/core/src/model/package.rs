use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::ids::PackageId;

/// A fixed, purchasable set of questions defining one tryout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    id: PackageId,
    name: String,
    time_limit_minutes: u32,
}

impl Package {
    /// # Errors
    ///
    /// Returns `ValidationError::Empty` if the trimmed name is empty.
    pub fn new(
        id: PackageId,
        name: impl Into<String>,
        time_limit_minutes: u32,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(ValidationError::Empty { field: "package name" });
        }
        Ok(Self {
            id,
            name,
            time_limit_minutes,
        })
    }

    #[must_use]
    pub fn id(&self) -> PackageId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let err = Package::new(PackageId::new(1), "   ", 100).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "package name" });

        let pkg = Package::new(PackageId::new(1), " SKD Tryout 1 ", 100).unwrap();
        assert_eq!(pkg.name(), "SKD Tryout 1");
    }
}
