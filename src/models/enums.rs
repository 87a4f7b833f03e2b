//! Enumerations shared by mapping documents and mocked elements

use serde::{Deserialize, Serialize};

/// Persistent state access strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessType {
    Field,
    Property,
}

impl AccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessType::Field => "FIELD",
            AccessType::Property => "PROPERTY",
        }
    }
}

impl std::str::FromStr for AccessType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FIELD" => Ok(AccessType::Field),
            "PROPERTY" => Ok(AccessType::Property),
            _ => Err(format!("Unknown access type: {}", s)),
        }
    }
}

/// Temporal precision of a date/time attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TemporalType {
    Date,
    Time,
    Timestamp,
}

impl TemporalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemporalType::Date => "DATE",
            TemporalType::Time => "TIME",
            TemporalType::Timestamp => "TIMESTAMP",
        }
    }
}

/// Storage representation of an enum attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnumType {
    Ordinal,
    String,
}

impl EnumType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnumType::Ordinal => "ORDINAL",
            EnumType::String => "STRING",
        }
    }
}

/// Lock mode requested by a named query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockModeType {
    Read,
    Write,
    Optimistic,
    OptimisticForceIncrement,
    PessimisticRead,
    PessimisticWrite,
    PessimisticForceIncrement,
    None,
}

impl LockModeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockModeType::Read => "READ",
            LockModeType::Write => "WRITE",
            LockModeType::Optimistic => "OPTIMISTIC",
            LockModeType::OptimisticForceIncrement => "OPTIMISTIC_FORCE_INCREMENT",
            LockModeType::PessimisticRead => "PESSIMISTIC_READ",
            LockModeType::PessimisticWrite => "PESSIMISTIC_WRITE",
            LockModeType::PessimisticForceIncrement => "PESSIMISTIC_FORCE_INCREMENT",
            LockModeType::None => "NONE",
        }
    }
}

/// Kind of association between two entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssociationType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

/// Operation cascaded from an entity to its associated entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeType {
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

impl CascadeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeType::All => "ALL",
            CascadeType::Persist => "PERSIST",
            CascadeType::Merge => "MERGE",
            CascadeType::Remove => "REMOVE",
            CascadeType::Refresh => "REFRESH",
            CascadeType::Detach => "DETACH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_parse() {
        assert_eq!("field".parse::<AccessType>().unwrap(), AccessType::Field);
        assert_eq!("PROPERTY".parse::<AccessType>().unwrap(), AccessType::Property);
        assert!("both".parse::<AccessType>().is_err());
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&LockModeType::PessimisticWrite).unwrap();
        assert_eq!(json, format!("\"{}\"", LockModeType::PessimisticWrite.as_str()));

        let temporal: TemporalType = serde_json::from_str("\"TIMESTAMP\"").unwrap();
        assert_eq!(temporal, TemporalType::Timestamp);

        let cascade: CascadeType = serde_yaml::from_str("PERSIST").unwrap();
        assert_eq!(cascade.as_str(), "PERSIST");
        let association: AssociationType = serde_yaml::from_str("manyToOne").unwrap();
        assert_eq!(association, AssociationType::ManyToOne);
    }
}
