//! System monster tiers.
//!
//! System monsters are spawned by the game rather than submitted by players.
//! The battle screen only flags them with a styled portrait frame, so the
//! tier itself comes from this table, keyed by the exact displayed name.

struct WellKnownMonster {
    name: &'static str,
    tier: &'static str,
}

#[rustfmt::skip]
const WELL_KNOWN_MONSTERS: &[WellKnownMonster] = &[
    // Rare
    WellKnownMonster { name: "Manbearpig",                tier: "Rare" },
    WellKnownMonster { name: "White Bunneh",              tier: "Rare" },
    WellKnownMonster { name: "Mithra",                    tier: "Rare" },
    WellKnownMonster { name: "Dalek",                     tier: "Rare" },

    // Legendary (Ring of Blood schoolgirls)
    WellKnownMonster { name: "Konata",                    tier: "Legendary" },
    WellKnownMonster { name: "Mikuru Asahina",            tier: "Legendary" },
    WellKnownMonster { name: "Ryouko Asakura",            tier: "Legendary" },
    WellKnownMonster { name: "Yuki Nagato",               tier: "Legendary" },

    // Ultimate
    WellKnownMonster { name: "Real Life",                 tier: "Ultimate" },
    WellKnownMonster { name: "Invisible Pink Unicorn",    tier: "Ultimate" },
    WellKnownMonster { name: "Flying Spaghetti Monster",  tier: "Ultimate" },
];

/// Look up the tier label of a system monster by its displayed name.
pub fn lookup(name: &str) -> Option<&'static str> {
    WELL_KNOWN_MONSTERS
        .iter()
        .find(|m| m.name == name)
        .map(|m| m.tier)
}

#[cfg(test)]
mod tests {
    use super::lookup;

    #[test]
    fn known_names_resolve_to_tiers() {
        assert_eq!(lookup("Mikuru Asahina"), Some("Legendary"));
        assert_eq!(lookup("Manbearpig"), Some("Rare"));
        assert_eq!(lookup("Flying Spaghetti Monster"), Some("Ultimate"));
    }

    #[test]
    fn lookup_is_exact_match() {
        assert_eq!(lookup("mikuru asahina"), None);
        assert_eq!(lookup("Touch"), None);
    }
}
