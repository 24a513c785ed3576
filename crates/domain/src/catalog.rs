//! Static option catalogs offered by the wizard.
//!
//! Each entry pairs the short `value` token stored in the draft with the
//! display `label` (which is also the key of the matching store lookup table)
//! and an icon. Catalogs carry no behaviour beyond lookups.

use serde::Serialize;

/// Prefix of tokens that open a free-text slot instead of naming an option.
pub const CUSTOM_SLOT_PREFIX: &str = "other";

/// Discovery token meaning "nothing yet"; valid as a choice, never persisted.
pub const NOTHING_TOKEN: &str = "nothing";

/// Toy role meaning "no specific role"; exclusive with every other role.
pub const NO_SPECIFIC_ROLE: &str = "no_specific_role";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl CatalogEntry {
    const fn new(value: &'static str, label: &'static str, icon: &'static str) -> Self {
        Self { value, label, icon }
    }
}

/// A named, ordered list of options.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    pub name: &'static str,
    pub entries: &'static [CatalogEntry],
}

impl Catalog {
    pub fn find(&self, token: &str) -> Option<&'static CatalogEntry> {
        self.entries.iter().find(|e| e.value == token)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.find(token).is_some()
    }

    pub fn label_for(&self, token: &str) -> Option<&'static str> {
        self.find(token).map(|e| e.label)
    }

    pub fn icon_for(&self, token: &str) -> Option<&'static str> {
        self.find(token).map(|e| e.icon)
    }
}

/// True for `other1`, `other2`, ... tokens that stand for user-typed text.
pub fn is_custom_slot(token: &str) -> bool {
    token
        .strip_prefix(CUSTOM_SLOT_PREFIX)
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

/// True for tokens that only exist in the UI and never resolve against the store.
pub fn is_presentation_only(token: &str) -> bool {
    token == NOTHING_TOKEN || is_custom_slot(token)
}

pub const SUPERPOWERS: Catalog = Catalog {
    name: "superpowers",
    entries: &[
        CatalogEntry::new("kindness", "Kindness", "💗"),
        CatalogEntry::new("courage", "Courage", "🦁"),
        CatalogEntry::new("curiosity", "Curiosity", "🔍"),
        CatalogEntry::new("humor", "Humor", "😂"),
        CatalogEntry::new("creativity", "Creativity", "🎨"),
        CatalogEntry::new("patience", "Patience", "🐢"),
        CatalogEntry::new("empathy", "Empathy", "🤝"),
        CatalogEntry::new("determination", "Determination", "⛰️"),
        CatalogEntry::new("imagination", "Imagination", "🌈"),
        CatalogEntry::new("generosity", "Generosity", "🎁"),
    ],
};

pub const PASSIONS: Catalog = Catalog {
    name: "passions",
    entries: &[
        CatalogEntry::new("drawing", "Drawing", "✏️"),
        CatalogEntry::new("music", "Music", "🎵"),
        CatalogEntry::new("dancing", "Dancing", "💃"),
        CatalogEntry::new("sports", "Sports", "⚽"),
        CatalogEntry::new("reading", "Reading", "📚"),
        CatalogEntry::new("animals", "Animals", "🐾"),
        CatalogEntry::new("nature", "Nature", "🌳"),
        CatalogEntry::new("cooking", "Cooking", "🍳"),
        CatalogEntry::new("building", "Building", "🧱"),
        CatalogEntry::new("science", "Science", "🔬"),
    ],
};

pub const CHALLENGES: Catalog = Catalog {
    name: "challenges",
    entries: &[
        CatalogEntry::new("fear_of_dark", "Fear of the dark", "🌙"),
        CatalogEntry::new("shyness", "Shyness", "🙈"),
        CatalogEntry::new("anger", "Managing anger", "🌋"),
        CatalogEntry::new("sharing", "Sharing", "🤲"),
        CatalogEntry::new("new_sibling", "A new sibling", "👶"),
        CatalogEntry::new("moving", "Moving house", "📦"),
        CatalogEntry::new("school_start", "Starting school", "🎒"),
        CatalogEntry::new("sleep", "Falling asleep", "😴"),
        CatalogEntry::new("separation", "Being apart from parents", "👋"),
    ],
};

pub const WORLDS: Catalog = Catalog {
    name: "worlds",
    entries: &[
        CatalogEntry::new("space", "Outer space", "🚀"),
        CatalogEntry::new("ocean", "Under the sea", "🐠"),
        CatalogEntry::new("jungle", "Jungle", "🦜"),
        CatalogEntry::new("castles", "Castles and knights", "🏰"),
        CatalogEntry::new("dinosaurs", "Dinosaurs", "🦕"),
        CatalogEntry::new("fairies", "Fairies and magic", "🧚"),
        CatalogEntry::new("pirates", "Pirates", "🏴‍☠️"),
        CatalogEntry::new("superheroes", "Superheroes", "🦸"),
        CatalogEntry::new("other1", "Another world", "✨"),
        CatalogEntry::new("other2", "Yet another world", "✨"),
    ],
};

pub const DISCOVERIES: Catalog = Catalog {
    name: "discoveries",
    entries: &[
        CatalogEntry::new("nothing", "Nothing in particular", "🙂"),
        CatalogEntry::new("emotions", "Understanding emotions", "🎭"),
        CatalogEntry::new("friendship", "Friendship", "🫶"),
        CatalogEntry::new("ecology", "Caring for the planet", "🌍"),
        CatalogEntry::new("cultures", "Other cultures", "🗺️"),
        CatalogEntry::new("history", "History", "🏛️"),
        CatalogEntry::new("body", "The human body", "🫀"),
        CatalogEntry::new("numbers", "Numbers", "🔢"),
    ],
};

pub const RELATIVE_TYPES: Catalog = Catalog {
    name: "relative_types",
    entries: &[
        CatalogEntry::new("mother", "Mother", "👩"),
        CatalogEntry::new("father", "Father", "👨"),
        CatalogEntry::new("sister", "Sister", "👧"),
        CatalogEntry::new("brother", "Brother", "👦"),
        CatalogEntry::new("grandmother", "Grandmother", "👵"),
        CatalogEntry::new("grandfather", "Grandfather", "👴"),
        CatalogEntry::new("femaleCousin", "Cousin (girl)", "👧"),
        CatalogEntry::new("maleCousin", "Cousin (boy)", "👦"),
        CatalogEntry::new("femaleFriend", "Friend (girl)", "👭"),
        CatalogEntry::new("maleFriend", "Friend (boy)", "👬"),
        CatalogEntry::new("otherParent", "Other parent", "🧑"),
        CatalogEntry::new("other", "Someone else", "⭐"),
    ],
};

pub const CHARACTER_TRAITS: Catalog = Catalog {
    name: "character_traits",
    entries: &[
        CatalogEntry::new("funny", "Funny", "😄"),
        CatalogEntry::new("gentle", "Gentle", "🕊️"),
        CatalogEntry::new("protective", "Protective", "🛡️"),
        CatalogEntry::new("playful", "Playful", "🪁"),
        CatalogEntry::new("wise", "Wise", "🦉"),
        CatalogEntry::new("sporty", "Sporty", "🏃"),
        CatalogEntry::new("creative", "Creative", "🎨"),
        CatalogEntry::new("other1", "Other", "✨"),
        CatalogEntry::new("other2", "Other", "✨"),
    ],
};

pub const PET_TYPES: Catalog = Catalog {
    name: "pet_types",
    entries: &[
        CatalogEntry::new("dog", "Dog", "🐶"),
        CatalogEntry::new("cat", "Cat", "🐱"),
        CatalogEntry::new("rabbit", "Rabbit", "🐰"),
        CatalogEntry::new("hamster", "Hamster", "🐹"),
        CatalogEntry::new("bird", "Bird", "🐦"),
        CatalogEntry::new("fish", "Fish", "🐟"),
        CatalogEntry::new("turtle", "Turtle", "🐢"),
        CatalogEntry::new("horse", "Horse", "🐴"),
        CatalogEntry::new("other", "Other animal", "🐾"),
    ],
};

pub const PET_TRAITS: Catalog = Catalog {
    name: "pet_traits",
    entries: &[
        CatalogEntry::new("cuddly", "Cuddly", "🤗"),
        CatalogEntry::new("playful", "Playful", "🎾"),
        CatalogEntry::new("lazy", "Lazy", "💤"),
        CatalogEntry::new("curious", "Curious", "👀"),
        CatalogEntry::new("greedy", "Greedy", "🍖"),
        CatalogEntry::new("shy", "Shy", "🙈"),
        CatalogEntry::new("other1", "Other", "✨"),
        CatalogEntry::new("other2", "Other", "✨"),
    ],
};

pub const TOY_TYPES: Catalog = Catalog {
    name: "toy_types",
    entries: &[
        CatalogEntry::new("plush", "Plush", "🧸"),
        CatalogEntry::new("doll", "Doll", "🪆"),
        CatalogEntry::new("blanket", "Blanket", "🧣"),
        CatalogEntry::new("figurine", "Figurine", "🦖"),
        CatalogEntry::new("vehicle", "Vehicle", "🚗"),
        CatalogEntry::new("other", "Something else", "🎈"),
    ],
};

pub const TOY_ROLES: Catalog = Catalog {
    name: "toy_roles",
    entries: &[
        CatalogEntry::new("sleep_buddy", "Helps to fall asleep", "🌙"),
        CatalogEntry::new("comforter", "Comforts when sad", "💞"),
        CatalogEntry::new("adventure_partner", "Adventure partner", "🗺️"),
        CatalogEntry::new("confidant", "Keeps secrets", "🤫"),
        CatalogEntry::new("protector", "Protects from monsters", "🛡️"),
        CatalogEntry::new(NO_SPECIFIC_ROLE, "No specific role", "➖"),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const ALL: [Catalog; 11] = [
        SUPERPOWERS,
        PASSIONS,
        CHALLENGES,
        WORLDS,
        DISCOVERIES,
        RELATIVE_TYPES,
        CHARACTER_TRAITS,
        PET_TYPES,
        PET_TRAITS,
        TOY_TYPES,
        TOY_ROLES,
    ];

    #[test]
    fn tokens_are_unique_within_each_catalog() {
        for catalog in ALL {
            let unique: HashSet<_> = catalog.entries.iter().map(|e| e.value).collect();
            assert_eq!(unique.len(), catalog.entries.len(), "{}", catalog.name);
        }
    }

    #[test]
    fn custom_slot_detection() {
        assert!(is_custom_slot("other1"));
        assert!(is_custom_slot("other12"));
        assert!(!is_custom_slot("other"));
        assert!(!is_custom_slot("otherParent"));
        assert!(!is_custom_slot("space"));
    }

    #[test]
    fn presentation_only_tokens() {
        assert!(is_presentation_only(NOTHING_TOKEN));
        assert!(is_presentation_only("other2"));
        assert!(!is_presentation_only("ocean"));
    }

    #[test]
    fn label_lookup() {
        assert_eq!(SUPERPOWERS.label_for("courage"), Some("Courage"));
        assert_eq!(SUPERPOWERS.label_for("flying"), None);
        assert_eq!(TOY_TYPES.icon_for("plush"), Some("🧸"));
    }
}
