//! Field parsers for the battle screen.
//!
//! Every parser reads the shared [`Document`] and returns its own part of the
//! snapshot. None of them depends on another's output; the only shared state
//! is the [`Warnings`] accumulator, which is append-only.

pub mod abilities;
pub mod buffs;
pub mod combat_log;
pub mod fields;
pub mod items;
pub mod monsters;
pub mod vitals;

use tracing::{debug, warn};

use crate::core_api::{ExtractOptions, Snapshot};
use crate::dom::Document;

/// Ordered list of non-fatal extraction problems.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Warnings {
    entries: Vec<String>,
}

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.entries.push(message);
    }

    pub fn append(&mut self, mut other: Warnings) {
        self.entries.append(&mut other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }
}

/// Run every field parser against one document and compose the snapshot.
/// Warnings are merged in a fixed order so output is deterministic.
pub fn parse_snapshot(doc: &Document, options: &ExtractOptions) -> Snapshot {
    let mut vitals_warnings = Warnings::new();
    let mut player = vitals::parse_vitals(doc, options, &mut vitals_warnings);
    player.buffs = buffs::parse_player_buffs(doc);

    let mut ability_warnings = Warnings::new();
    let abilities = abilities::parse_abilities(doc, &mut ability_warnings);

    let monsters = monsters::parse_monsters(doc, options);

    let log = combat_log::parse_log(doc);

    let mut item_warnings = Warnings::new();
    let items = items::parse_items(doc, options, &mut item_warnings);

    let mut warnings = vitals_warnings;
    warnings.append(ability_warnings);
    warnings.append(item_warnings);

    debug!(
        skills = abilities.skills.len(),
        spells = abilities.spells.len(),
        monsters = monsters.len(),
        log_lines = log.lines.len(),
        items = items.items.len(),
        warnings = warnings.len(),
        "parsed battle snapshot"
    );

    Snapshot {
        player,
        abilities,
        monsters,
        log,
        items,
        warnings: warnings.into_vec(),
    }
}
