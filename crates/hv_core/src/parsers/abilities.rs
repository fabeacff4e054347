use std::collections::BTreeMap;

use tracing::debug;

use super::Warnings;
use super::fields::{infopane_args, is_disabled};
use crate::core_api::{AbilitiesState, Ability, CostType};
use crate::dom::{Document, Node};

const SKILLS_TABLE_ID: &str = "table_skills";
const SPELLS_TABLE_ID: &str = "table_magic";
const SPELL_HANDLER: &str = "set_infopane_spell";

pub fn parse_abilities(doc: &Document, warnings: &mut Warnings) -> AbilitiesState {
    AbilitiesState {
        skills: parse_table(doc, SKILLS_TABLE_ID, "skills", warnings),
        spells: parse_table(doc, SPELLS_TABLE_ID, "spells", warnings),
    }
}

/// Splits a cost annotation such as `25 Overcharge` or `29 MP` into its
/// amount and resource. An empty annotation is a free action. Returns
/// `None` when the amount and resource cannot be told apart.
pub fn parse_cost_annotation(annotation: &str) -> Option<(u32, Option<CostType>)> {
    let annotation = annotation.trim();
    if annotation.is_empty() {
        return Some((0, None));
    }

    let digits_end = annotation
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(annotation.len());
    let amount: u32 = annotation[..digits_end].parse().ok()?;
    let token = annotation[digits_end..].trim();

    if token.is_empty() {
        return (amount == 0).then_some((0, None));
    }
    let cost_type = token.parse::<CostType>().ok()?;
    Some((amount, Some(cost_type)))
}

fn parse_table(
    doc: &Document,
    table_id: &str,
    label: &str,
    warnings: &mut Warnings,
) -> BTreeMap<String, Ability> {
    let Some(table) = doc.by_id(table_id) else {
        warnings.push(format!("missing {label} table"));
        return BTreeMap::new();
    };

    let mut abilities = BTreeMap::new();
    for cell in table.select_all("td > div") {
        if let Some(ability) = parse_cell(cell, warnings) {
            abilities.insert(ability.name.clone(), ability);
        }
    }
    debug!(table = table_id, count = abilities.len(), "parsed abilities");
    abilities
}

fn parse_cell(cell: Node<'_>, warnings: &mut Warnings) -> Option<Ability> {
    let tooltip = infopane_args(cell, SPELL_HANDLER);

    let label = cell.text();
    let name = if label.is_empty() {
        tooltip
            .as_ref()
            .and_then(|args| args.first())
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())?
    } else {
        label
    };

    let available = !is_disabled(cell);

    let Some(args) = tooltip else {
        warnings.push(format!("missing tooltip for {name}"));
        return Some(Ability {
            name,
            available,
            cost: Some(0),
            cost_type: None,
            cooldown_turns: 0,
        });
    };

    let annotation = args.get(2).map(String::as_str).unwrap_or("");
    let (cost, cost_type) = match parse_cost_annotation(annotation) {
        Some((amount, cost_type)) => (Some(amount), cost_type),
        None => {
            warnings.push(format!("malformed cost for {name}: \"{annotation}\""));
            (Some(0), None)
        }
    };

    let cooldown_text = args.get(3).map(|c| c.trim()).unwrap_or("");
    let cooldown_turns = if cooldown_text.is_empty() {
        0
    } else {
        cooldown_text.parse().unwrap_or_else(|_| {
            warnings.push(format!(
                "malformed cooldown for {name}: \"{cooldown_text}\""
            ));
            0
        })
    };

    Some(Ability {
        name,
        available,
        cost,
        cost_type,
        cooldown_turns,
    })
}
