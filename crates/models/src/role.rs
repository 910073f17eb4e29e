use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

/// Staff roles recognised in the `roles` claim of an access token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
pub enum Role {
    #[strum(serialize = "ContosoAdministrators")]
    #[serde(rename = "ContosoAdministrators")]
    Administrator,
    #[strum(serialize = "ContosoManagers")]
    #[serde(rename = "ContosoManagers")]
    Manager,
}

impl Role {
    /// Parses the role names carried by a token, skipping names that are not staff roles
    pub fn parse_all<I, S>(names: I) -> Vec<Role>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|name| name.as_ref().parse().ok())
            .collect()
    }
}
