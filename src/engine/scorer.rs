//! Option scoring for open dropdown menus.
//!
//! Ranks visible menu options against a target value on a graduated scale
//! that favours exact semantic equality but tolerates labels with extra
//! decoration (icons, counts, helper text). Scores are in `[-1, 100]`;
//! `-1` means rejected.

use crate::engine::normalize::norm;
use serde::{Deserialize, Serialize};

/// One option node inside an open menu scope, as reported by the menu probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuOption {
    /// Engine-assigned marker (`data-ff-ref` attribute value).
    #[serde(rename = "ref")]
    pub ref_id: u32,
    /// Visible text content, whitespace-collapsed.
    #[serde(default)]
    pub text: String,
    /// `aria-label` fallback for icon-only options.
    #[serde(default)]
    pub aria_label: String,
    /// `title` attribute fallback.
    #[serde(default)]
    pub title: String,
    /// `data-value` or `value` attribute.
    #[serde(default)]
    pub value: String,
}

impl MenuOption {
    /// Display text with `aria-label`/`title` fallback, normalised.
    fn display_text(&self) -> String {
        let raw = if !self.text.trim().is_empty() {
            &self.text
        } else if !self.aria_label.trim().is_empty() {
            &self.aria_label
        } else {
            &self.title
        };
        norm(&raw.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Score an option against a target value.
///
/// Descending specificity: exact text-or-value match → 100; prefix match →
/// 80; substring containment either direction → 60; token overlap →
/// `50 + hits`; nothing → −1.
pub fn score_option(opt: &MenuOption, target: &str) -> i32 {
    let t = norm(target);
    if t.is_empty() {
        return -1;
    }
    let txt = opt.display_text();
    let val = norm(&opt.value);

    if txt == t || (!val.is_empty() && val == t) {
        return 100;
    }
    if txt.starts_with(&t) || (!val.is_empty() && val.starts_with(&t)) {
        return 80;
    }
    if txt.contains(&t) || t.contains(&txt) && !txt.is_empty() {
        return 60;
    }
    if !val.is_empty() && (val.contains(&t) || t.contains(&val)) {
        return 60;
    }
    let hits = t
        .split_whitespace()
        .filter(|tok| txt.contains(tok))
        .count() as i32;
    if hits > 0 {
        50 + hits
    } else {
        -1
    }
}

/// Pick the best-scoring option; ties break by menu document order.
///
/// Returns `None` when every option scores negative.
pub fn pick_best<'a>(options: &'a [MenuOption], target: &str) -> Option<&'a MenuOption> {
    let mut best: Option<(&MenuOption, i32)> = None;
    for opt in options {
        let score = score_option(opt, target);
        if score < 0 {
            continue;
        }
        match best {
            Some((_, s)) if s >= score => {}
            _ => best = Some((opt, score)),
        }
    }
    best.map(|(o, _)| o)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opt(text: &str) -> MenuOption {
        MenuOption {
            text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_graduated_ranking() {
        // Expected ranking for target "India":
        // exact("India")=100 > prefix("Indiana")=80 > no-match("United States")=-1
        assert_eq!(score_option(&opt("India"), "India"), 100);
        assert_eq!(score_option(&opt("Indiana"), "India"), 80);
        assert_eq!(score_option(&opt("United States"), "India"), -1);
    }

    #[test]
    fn test_pick_best_prefers_exact() {
        let options = vec![opt("Indiana"), opt("India"), opt("United States")];
        let best = pick_best(&options, "India").unwrap();
        assert_eq!(best.text, "India");
    }

    #[test]
    fn test_tie_breaks_by_document_order() {
        let mut a = opt("Remote (US)");
        a.ref_id = 1;
        let mut b = opt("Remote (EU)");
        b.ref_id = 2;
        // Both are prefix matches; the first-encountered wins.
        let options = [a, b];
        let best = pick_best(&options, "Remote").unwrap();
        assert_eq!(best.ref_id, 1);
    }

    #[test]
    fn test_containment_and_decoration() {
        assert_eq!(score_option(&opt("🇮🇳 India (+91)"), "india"), 60);
        assert_eq!(score_option(&opt("Bachelor of Science"), "science"), 60);
    }

    #[test]
    fn test_token_overlap() {
        let o = opt("New York City Office");
        let score = score_option(&o, "york office");
        assert_eq!(score, 52);
    }

    #[test]
    fn test_value_attribute_participates() {
        let mut o = opt("🌐");
        o.value = "india".to_string();
        assert_eq!(score_option(&o, "India"), 100);
    }

    #[test]
    fn test_aria_label_fallback() {
        let mut o = opt("  ");
        o.aria_label = "India".to_string();
        assert_eq!(score_option(&o, "india"), 100);
    }

    #[test]
    fn test_empty_target_rejected() {
        assert_eq!(score_option(&opt("India"), ""), -1);
        assert!(pick_best(&[opt("India")], "   ").is_none());
    }
}
