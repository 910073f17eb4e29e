use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[cfg(feature = "database")]
use sea_orm::{DeriveActiveEnum, EnumIter};

/// Letter grade of an enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[cfg_attr(
    feature = "database",
    derive(EnumIter, DeriveActiveEnum),
    sea_orm(rs_type = "i32", db_type = "Integer")
)]
pub enum Grade {
    #[cfg_attr(feature = "database", sea_orm(num_value = 0))]
    A,
    #[cfg_attr(feature = "database", sea_orm(num_value = 1))]
    B,
    #[cfg_attr(feature = "database", sea_orm(num_value = 2))]
    C,
    #[cfg_attr(feature = "database", sea_orm(num_value = 3))]
    D,
    #[cfg_attr(feature = "database", sea_orm(num_value = 4))]
    F,
}
