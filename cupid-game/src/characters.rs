//! Cosmetic avatar catalog players pick from during setup.
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Character {
    pub id: &'static str,
    pub name: &'static str,
}

pub const CHARACTERS: [Character; 5] = [
    Character {
        id: "victim-1",
        name: "Victim",
    },
    Character {
        id: "victim-2",
        name: "Victim 2",
    },
    Character {
        id: "victim-3",
        name: "Victim 3",
    },
    Character {
        id: "victim-4",
        name: "Victim 4",
    },
    Character {
        id: "victim-5",
        name: "Victim 5",
    },
];

#[must_use]
pub fn character_by_id(id: &str) -> Option<&'static Character> {
    CHARACTERS.iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_known_and_rejects_unknown() {
        assert_eq!(character_by_id("victim-3").map(|c| c.name), Some("Victim 3"));
        assert!(character_by_id("victim-9").is_none());
        assert!(character_by_id("").is_none());
    }
}
