//! Kind tags for [`Value`](crate::Value).

use serde::Serialize;
use strum::{Display, EnumIter};

/// Field-less tag naming which variant of [`Value`](crate::Value) is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Null,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Text,
    Bytes,
    Timestamp,
    List,
    Map,
    Pairs,
    Boxed,
    Indirect,
    Custom,
}

impl Kind {
    pub fn is_signed_integer(self) -> bool {
        matches!(self, Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64)
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(self, Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64)
    }

    pub fn is_integer(self) -> bool {
        self.is_signed_integer() || self.is_unsigned_integer()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Kinds that hold exactly one primitive datum (text and bytes included).
    pub fn is_scalar(self) -> bool {
        self.is_numeric() || matches!(self, Kind::Bool | Kind::Text | Kind::Bytes | Kind::Timestamp)
    }

    pub fn is_container(self) -> bool {
        matches!(self, Kind::List | Kind::Map | Kind::Pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_is_snake_case() {
        assert_eq!(Kind::I8.to_string(), "i8");
        assert_eq!(Kind::U64.to_string(), "u64");
        assert_eq!(Kind::Timestamp.to_string(), "timestamp");
        assert_eq!(Kind::Null.to_string(), "null");
    }

    #[test]
    fn test_every_kind_has_one_category_at_most() {
        for kind in Kind::iter() {
            let categories = [kind.is_scalar(), kind.is_container()];
            assert!(categories.iter().filter(|c| **c).count() <= 1, "{kind}");
        }
    }

    #[test]
    fn test_numeric_partition() {
        let numeric: Vec<Kind> = Kind::iter().filter(|k| k.is_numeric()).collect();
        assert_eq!(numeric.len(), 10);
        assert!(numeric.iter().all(|k| k.is_integer() ^ k.is_float()));
    }
}
