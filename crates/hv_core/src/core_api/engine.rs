use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use crate::dom::Document;
use crate::parsers;

use super::error::{CoreError, CoreErrorCode};
use super::options::ExtractOptions;
use super::types::{Ability, Item, Monster, QuickSlot, Snapshot};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    options: ExtractOptions,
}

#[derive(Debug, Clone)]
pub struct Session {
    snapshot: Snapshot,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExtractOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    pub fn open_path(&self, path: &Path) -> Result<Session, CoreError> {
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "read capture");
        self.open_bytes(bytes)
    }

    /// Open a capture from raw file bytes. Gzip-compressed captures are
    /// inflated first; the markup itself must be UTF-8.
    pub fn open_bytes<B: AsRef<[u8]>>(&self, bytes: B) -> Result<Session, CoreError> {
        let markup = decode_capture(bytes.as_ref())?;
        self.open_html(&markup)
    }

    pub fn open_html(&self, markup: &str) -> Result<Session, CoreError> {
        if markup.trim().is_empty() {
            return Err(CoreError::new(
                CoreErrorCode::EmptyDocument,
                "capture contains no markup",
            ));
        }
        Ok(Session {
            snapshot: self.parse_html(markup),
        })
    }

    /// Extract a snapshot from markup. Never fails: anything missing or
    /// malformed is reported through `Snapshot::warnings`.
    pub fn parse_html(&self, markup: &str) -> Snapshot {
        let doc = Document::parse(markup);
        parsers::parse_snapshot(&doc, &self.options)
    }
}

impl Session {
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn warnings(&self) -> &[String] {
        &self.snapshot.warnings
    }

    /// True when every designated element was present and well formed.
    pub fn is_complete(&self) -> bool {
        self.snapshot.warnings.is_empty()
    }

    pub fn monster(&self, slot_index: u32) -> Option<&Monster> {
        self.snapshot.monsters.get(&slot_index)
    }

    pub fn living_monsters(&self) -> Vec<&Monster> {
        self.snapshot.monsters.values().filter(|m| m.alive).collect()
    }

    pub fn usable_skills(&self) -> Vec<&Ability> {
        self.snapshot
            .abilities
            .skills
            .values()
            .filter(|a| a.available)
            .collect()
    }

    pub fn usable_spells(&self) -> Vec<&Ability> {
        self.snapshot
            .abilities
            .spells
            .values()
            .filter(|a| a.available)
            .collect()
    }

    pub fn usable_items(&self) -> Vec<&Item> {
        self.snapshot
            .items
            .items
            .values()
            .filter(|i| i.available)
            .collect()
    }

    pub fn bound_quickslots(&self) -> Vec<&QuickSlot> {
        self.snapshot
            .items
            .quickbar
            .iter()
            .filter(|q| q.is_bound())
            .collect()
    }
}

fn decode_capture(bytes: &[u8]) -> Result<String, CoreError> {
    let raw = if bytes.starts_with(&GZIP_MAGIC) {
        let mut inflated = Vec::new();
        GzDecoder::new(bytes)
            .read_to_end(&mut inflated)
            .map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Decompress,
                    format!("failed to inflate gzip capture: {e}"),
                )
            })?;
        debug!(
            compressed = bytes.len(),
            inflated = inflated.len(),
            "inflated gzip capture"
        );
        inflated
    } else {
        bytes.to_vec()
    };

    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(raw.as_slice());
    String::from_utf8(body.to_vec()).map_err(|e| {
        CoreError::new(
            CoreErrorCode::Encoding,
            format!("capture is not valid UTF-8: {e}"),
        )
    })
}
