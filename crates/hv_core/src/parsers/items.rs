use std::collections::BTreeMap;

use tracing::debug;

use super::Warnings;
use super::fields::{is_disabled, tooltip_name};
use crate::core_api::{ExtractOptions, Item, ItemSlot, ItemsState, QuickSlot};
use crate::dom::{Document, Node};

const ITEM_PANE_ID: &str = "pane_item";
const ITEM_ID_PREFIX: &str = "ikey_";
const QUICKBAR_ID: &str = "quickbar";

pub fn parse_items(doc: &Document, options: &ExtractOptions, warnings: &mut Warnings) -> ItemsState {
    ItemsState {
        items: parse_inventory(doc, warnings),
        quickbar: parse_quickbar(doc, options.quickbar_slots, warnings),
    }
}

/// Slot from the id suffix of an inventory cell: digits are numbered slots,
/// anything alphabetic (`p`, `s1`, ...) is a tag for a fixed slot.
pub fn parse_item_slot(suffix: &str) -> Option<ItemSlot> {
    if let Ok(n) = suffix.parse::<u32>() {
        return (n >= 1).then_some(ItemSlot::Number(n));
    }
    let letters_end = suffix
        .find(|c: char| !c.is_ascii_lowercase())
        .unwrap_or(suffix.len());
    let tagged = letters_end > 0 && suffix[letters_end..].chars().all(|c| c.is_ascii_digit());
    tagged.then(|| ItemSlot::Tag(suffix.to_string()))
}

fn parse_inventory(doc: &Document, warnings: &mut Warnings) -> BTreeMap<String, Item> {
    let Some(pane) = doc.by_id(ITEM_PANE_ID) else {
        warnings.push("missing items panel");
        return BTreeMap::new();
    };

    let mut items = BTreeMap::new();
    for cell in pane.select_all(&format!("div[id^=\"{ITEM_ID_PREFIX}\"]")) {
        if let Some(item) = parse_item_cell(cell) {
            items.insert(item.name.clone(), item);
        }
    }
    debug!(count = items.len(), "parsed inventory");
    items
}

fn parse_item_cell(cell: Node<'_>) -> Option<Item> {
    let slot = cell
        .id()
        .and_then(|id| id.strip_prefix(ITEM_ID_PREFIX))
        .and_then(parse_item_slot)?;

    let label = cell.text();
    let name = if label.is_empty() {
        tooltip_name(cell)?
    } else {
        label
    };

    Some(Item {
        name,
        slot,
        available: !is_disabled(cell),
    })
}

/// Every quickbar position is emitted, bound or not, so the result always
/// has `slot_count` entries.
fn parse_quickbar(doc: &Document, slot_count: u32, warnings: &mut Warnings) -> Vec<QuickSlot> {
    let quickbar = doc.by_id(QUICKBAR_ID);
    if quickbar.is_none() {
        warnings.push("missing quickbar");
    }

    (1..=slot_count)
        .map(|slot| {
            let name = quickbar
                .and_then(|bar| bar.select_one(&format!("[id=\"qb{slot}\"]")))
                .and_then(quickslot_binding)
                .unwrap_or_default();
            QuickSlot { slot, name }
        })
        .collect()
}

fn quickslot_binding(node: Node<'_>) -> Option<String> {
    tooltip_name(node).or_else(|| {
        node.attr("title")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}
