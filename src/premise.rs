//! Relational premises and the fixed relation vocabulary.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SibylError};

/// All relation names accepted by [`Relation::from_name`].
pub const RELATIONS: &[&str] = &[
    "left",
    "right",
    "behind",
    "front",
    "above",
    "below",
    "north",
    "south",
    "east",
    "west",
    "north-west",
    "north-east",
    "south-west",
    "south-east",
];

/// Spatial relation between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Relation {
    Left,
    Right,
    Behind,
    Front,
    Above,
    Below,
    North,
    South,
    East,
    West,
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
}

impl Relation {
    pub fn name(&self) -> &'static str {
        match self {
            Relation::Left => "left",
            Relation::Right => "right",
            Relation::Behind => "behind",
            Relation::Front => "front",
            Relation::Above => "above",
            Relation::Below => "below",
            Relation::North => "north",
            Relation::South => "south",
            Relation::East => "east",
            Relation::West => "west",
            Relation::NorthWest => "north-west",
            Relation::NorthEast => "north-east",
            Relation::SouthWest => "south-west",
            Relation::SouthEast => "south-east",
        }
    }

    /// Parse a relation name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "left" => Some(Relation::Left),
            "right" => Some(Relation::Right),
            "behind" => Some(Relation::Behind),
            "front" => Some(Relation::Front),
            "above" => Some(Relation::Above),
            "below" => Some(Relation::Below),
            "north" => Some(Relation::North),
            "south" => Some(Relation::South),
            "east" => Some(Relation::East),
            "west" => Some(Relation::West),
            "north-west" => Some(Relation::NorthWest),
            "north-east" => Some(Relation::NorthEast),
            "south-west" => Some(Relation::SouthWest),
            "south-east" => Some(Relation::SouthEast),
            _ => None,
        }
    }

    /// Natural-language phrase used in premise sentences. Compass and
    /// vertical relations read as themselves.
    pub fn phrase(&self) -> &'static str {
        match self {
            Relation::Left => "on the left of",
            Relation::Right => "on the right of",
            Relation::Behind => "behind",
            Relation::Front => "in front of",
            Relation::Above => "above",
            Relation::Below => "below",
            Relation::North => "north",
            Relation::South => "south",
            Relation::East => "east",
            Relation::West => "west",
            Relation::NorthWest => "north-west",
            Relation::NorthEast => "north-east",
            Relation::SouthWest => "south-west",
            Relation::SouthEast => "south-east",
        }
    }
}

/// A relational statement between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premise {
    pub relation: Relation,
    pub subject: String,
    pub object: String,
}

impl Premise {
    pub fn new(relation: Relation, subject: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            relation,
            subject: subject.into(),
            object: object.into(),
        }
    }

    /// Parse a `relation,subject,object` triple as accepted on the CLI.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(SibylError::Config(format!(
                "malformed premise triple: {} (expected relation,subject,object)",
                raw
            )));
        }
        let relation = Relation::from_name(parts[0])
            .ok_or_else(|| SibylError::UnknownRelation(parts[0].to_string()))?;
        Ok(Premise::new(relation, parts[1], parts[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_vocabulary_is_total() {
        for name in RELATIONS {
            assert!(
                Relation::from_name(name).is_some(),
                "relation {} must parse",
                name
            );
        }
        assert_eq!(RELATIONS.len(), 14);
    }

    #[test]
    fn test_relation_case_insensitive() {
        assert_eq!(Relation::from_name("LEFT"), Some(Relation::Left));
        assert_eq!(Relation::from_name("North-West"), Some(Relation::NorthWest));
        assert_eq!(
            Relation::from_name("LEFT").unwrap().phrase(),
            Relation::from_name("left").unwrap().phrase()
        );
    }

    #[test]
    fn test_relation_phrases() {
        assert_eq!(Relation::Left.phrase(), "on the left of");
        assert_eq!(Relation::Front.phrase(), "in front of");
        assert_eq!(Relation::North.phrase(), "north");
    }

    #[test]
    fn test_unknown_relation_rejected() {
        assert_eq!(Relation::from_name("diagonal"), None);
    }

    #[test]
    fn test_premise_parse() {
        let p = Premise::parse("left, A, B").unwrap();
        assert_eq!(p.relation, Relation::Left);
        assert_eq!(p.subject, "A");
        assert_eq!(p.object, "B");

        assert!(Premise::parse("left,A").is_err());
        assert!(Premise::parse("sideways,A,B").is_err());
    }
}
