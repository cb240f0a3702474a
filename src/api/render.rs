//! Plain-text rendering of the session view.

use std::fmt::Write;

use crate::core::catalog;
use crate::shared::types::{Category, ConversionView};

pub fn render_view(view: &ConversionView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {} {} → {}",
        view.category.label(),
        view.input,
        view.from_unit,
        view.to_unit
    );
    let _ = writeln!(out, "  {} {}", view.formatted_result, view.to_unit);

    if let Some(imperial) = &view.imperial {
        let _ = writeln!(out, "  {}", imperial.combined);
        let _ = writeln!(
            out,
            "  {} FT • {} IN",
            imperial.total_feet_label(),
            imperial.total_inches_label()
        );
    }

    if let Some(label) = &view.sync_label {
        let _ = writeln!(out, "  {}", label);
    }
    out
}

/// Units of `category`, marking the current from (`>`) and to (`<`) picks.
pub fn render_units(category: Category, from_unit: &str, to_unit: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", category.label(), category.key());
    for unit in catalog::units_for(category) {
        let marker = match (unit.id == from_unit, unit.id == to_unit) {
            (true, true) => "><",
            (true, false) => "> ",
            (false, true) => " <",
            (false, false) => "  ",
        };
        let _ = writeln!(out, "  {} {:<4} {}", marker, unit.id, unit.display_name);
    }
    out
}

pub fn render_help() -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| c.key())
        .collect::<Vec<_>>()
        .join("|");

    let mut out = String::new();
    let _ = writeln!(out, "  category <{}>", categories);
    let _ = writeln!(out, "  value <number>   (or just type the number)");
    let _ = writeln!(out, "  from <UNIT>      to <UNIT>");
    let _ = writeln!(out, "  swap             refresh");
    let _ = writeln!(out, "  units            show");
    let _ = writeln!(out, "  help             quit");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::types::ImperialBreakdown;

    fn length_view() -> ConversionView {
        ConversionView {
            category: Category::Length,
            input: "1".to_string(),
            from_unit: "M",
            to_unit: "CM",
            to_unit_name: "公分 (CM)",
            result: Some(100.0),
            formatted_result: "100".to_string(),
            sync_label: None,
            imperial: Some(ImperialBreakdown {
                total_feet: 3.280841666,
                total_inches: 39.3701,
                combined: "3'3.4\"".to_string(),
            }),
        }
    }

    #[test]
    fn test_render_length_view() {
        let text = render_view(&length_view());
        assert!(text.contains("[長度] 1 M → CM"));
        assert!(text.contains("  100 CM"));
        assert!(text.contains("  3'3.4\""));
        assert!(text.contains("  3.281 FT • 39.37 IN"));
    }

    #[test]
    fn test_render_currency_sync_label() {
        let view = ConversionView {
            category: Category::Currency,
            input: "100".to_string(),
            from_unit: "TWD",
            to_unit: "USD",
            to_unit_name: "美金 (USD)",
            result: None,
            formatted_result: "...".to_string(),
            sync_label: Some("匯率更新中...".to_string()),
            imperial: None,
        };
        let text = render_view(&view);
        assert!(text.contains("  ... USD"));
        assert!(text.ends_with("  匯率更新中...\n"));
    }

    #[test]
    fn test_render_units_marks_selection() {
        let text = render_units(Category::Weight, "LB", "KG");
        assert!(text.contains(" < KG"));
        assert!(text.contains(">  LB"));
    }
}
