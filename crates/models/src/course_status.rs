use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[cfg(feature = "database")]
use sea_orm::{DeriveActiveEnum, EnumIter};

/// Review state of a course.
///
/// New and edited courses start out as `Submitted`; only approved courses are
/// visible to users who neither own the course nor hold a staff role.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString,
)]
#[cfg_attr(
    feature = "database",
    derive(EnumIter, DeriveActiveEnum),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
pub enum CourseStatus {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(num_value = 0))]
    Submitted,
    #[cfg_attr(feature = "database", sea_orm(num_value = 1))]
    Approved,
    #[cfg_attr(feature = "database", sea_orm(num_value = 2))]
    Rejected,
}

impl CourseStatus {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

#[cfg(test)]
mod tests {
    use super::CourseStatus;
    use std::str::FromStr;

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            CourseStatus::from_str("Approved").unwrap(),
            CourseStatus::Approved
        );
        assert_eq!(
            CourseStatus::from_str("Rejected").unwrap(),
            CourseStatus::Rejected
        );
        assert!(CourseStatus::from_str("Pending").is_err());
    }

    #[test]
    fn test_default_is_submitted() {
        assert_eq!(CourseStatus::default(), CourseStatus::Submitted);
        assert!(!CourseStatus::default().is_approved());
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&CourseStatus::Approved).unwrap();
        assert_eq!(json, "\"Approved\"");
        assert_eq!(CourseStatus::Approved.as_str(), "Approved");
    }
}
