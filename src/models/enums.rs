use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(TenderStatus {
    Unprocessed => "unprocessed",
    Processed => "processed",
});

impl TenderStatus {
    /// Integer flag used by the relational `tenders.status` column.
    pub fn as_flag(&self) -> i32 {
        match self {
            Self::Unprocessed => 0,
            Self::Processed => 1,
        }
    }

    pub fn from_flag(flag: i32) -> Result<Self, DatabaseError> {
        match flag {
            0 => Ok(Self::Unprocessed),
            1 => Ok(Self::Processed),
            other => Err(DatabaseError::InvalidEnum {
                field: "TenderStatus".into(),
                value: other.to_string(),
            }),
        }
    }
}
