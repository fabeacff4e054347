//! Decode rules shared by several parsers: bar widths, disabled markers and
//! the arguments of `battle.set_infopane_*` tooltip handlers.

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::Node;

static WIDTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;\s])width\s*:\s*(\d+)px").expect("width pattern is valid")
});

static OPACITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[;\s])opacity\s*:\s*([0-9]*\.?[0-9]+)").expect("opacity pattern is valid")
});

/// Pixel width declared in an inline style, e.g. `width:414px`.
pub fn style_width_px(style: &str) -> Option<u32> {
    WIDTH_RE
        .captures(style)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Bar fill as a percentage of a full bar, clamped to `[0, 100]`.
pub fn width_to_percent(width: u32, full_width: u32) -> f64 {
    if full_width == 0 {
        return 0.0;
    }
    (f64::from(width) / f64::from(full_width) * 100.0).clamp(0.0, 100.0)
}

pub fn bar_percent(bar: Node<'_>, full_width: u32) -> Option<f64> {
    let width = style_width_px(bar.attr("style")?)?;
    Some(width_to_percent(width, full_width))
}

/// True when the element is drawn faded (`opacity` below 1).
pub fn is_faded(node: Node<'_>) -> bool {
    node.attr("style")
        .and_then(|style| OPACITY_RE.captures(style))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .is_some_and(|opacity| opacity < 1.0)
}

/// Abilities and items render greyed out when they cannot be used right now.
pub fn is_disabled(node: Node<'_>) -> bool {
    node.has_class("disabled") || is_faded(node)
}

/// Splits the argument list of a handler such as
/// `battle.set_infopane_effect('Haste', 'Faster.', 12)` into raw strings.
/// Quotes are removed and `\'` escapes resolved. The list ends at the paren
/// matching the first `(`, so trailing statements are ignored. A missing
/// closing paren (truncated capture) keeps whatever arguments are present.
pub fn parse_infopane_args(handler: &str) -> Option<Vec<String>> {
    let open = handler.find('(')?;

    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0_u32;
    let mut chars = handler[open + 1..].chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) => match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                _ if c == q => quote = None,
                _ => current.push(c),
            },
            None => match c {
                '\'' | '"' => quote = Some(c),
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' if depth == 0 => break,
                ')' => {
                    depth -= 1;
                    current.push(c);
                }
                ',' if depth == 0 => {
                    args.push(current.trim().to_string());
                    current.clear();
                }
                _ => current.push(c),
            },
        }
    }
    if !args.is_empty() || !current.trim().is_empty() {
        args.push(current.trim().to_string());
    }

    Some(args)
}

/// Arguments of the node's `onmouseover` handler when it calls `function`.
pub fn infopane_args(node: Node<'_>, function: &str) -> Option<Vec<String>> {
    let handler = node.attr("onmouseover")?;
    if !handler.contains(function) {
        return None;
    }
    parse_infopane_args(handler)
}

/// Name shown by whatever infopane handler the node carries (first argument).
pub fn tooltip_name(node: Node<'_>) -> Option<String> {
    let handler = node.attr("onmouseover")?;
    if !handler.contains("set_infopane") {
        return None;
    }
    parse_infopane_args(handler)?
        .into_iter()
        .next()
        .filter(|name| !name.is_empty())
}
