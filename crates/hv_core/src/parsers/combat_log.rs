use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core_api::CombatLog;
use crate::dom::Document;

const TEXT_LOG_ID: &str = "textlog";

static ROUND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Round\s+(\d+)\s*/\s*(\d+)").expect("round pattern is valid")
});

/// Combat log lines in rendered order. Round counters come from the
/// initialization line when it is still visible; otherwise they stay `None`.
pub fn parse_log(doc: &Document) -> CombatLog {
    let Some(panel) = doc.by_id(TEXT_LOG_ID) else {
        debug!("no combat log panel in document");
        return CombatLog::default();
    };

    let lines: Vec<String> = panel
        .select_all("td")
        .into_iter()
        .map(|cell| cell.text())
        .filter(|line| !line.is_empty())
        .collect();

    let rounds = lines.iter().find_map(|line| parse_round_counter(line));
    debug!(lines = lines.len(), ?rounds, "parsed combat log");

    CombatLog {
        lines,
        current_round: rounds.map(|(current, _)| current),
        total_round: rounds.map(|(_, total)| total),
    }
}

/// `(current, total)` from text such as `... (Round 1 / 85) ...`.
pub fn parse_round_counter(line: &str) -> Option<(u32, u32)> {
    let caps = ROUND_RE.captures(line)?;
    let current: u32 = caps.get(1)?.as_str().parse().ok()?;
    let total: u32 = caps.get(2)?.as_str().parse().ok()?;
    (current >= 1 && total >= 1).then_some((current, total))
}
