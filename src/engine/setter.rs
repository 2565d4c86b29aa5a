//! Value setters for native controls: text inputs, native selects, radio
//! groups, and checkboxes.
//!
//! Matching decisions are pure functions over probe metadata; only the final
//! write goes back through the driver. All writes announce themselves with
//! `input`/`change`/`blur` so framework state stays in sync, and nothing is
//! dispatched when the control already holds the requested state.

use crate::driver::{is_changed, is_ok, DriverError, PageDriver};
use crate::driver::script;
use crate::engine::classify::{Candidate, SelectOption};
use crate::engine::fields::ValueKind;
use crate::engine::normalize::{
    boolean_marker_match, looks_like_url, normalize_for_matching, parse_boolish, to_date_input,
};

/// Validate and shape a value for a text-like control.
///
/// Returns the string to write, or `None` when the value does not fit the
/// control (an email slot without `@`, an unparseable date) — callers treat
/// that as "leave this control alone", never an error.
pub fn prepare_text_value(input_type: &str, kind: ValueKind, value: &str) -> Option<String> {
    let v = value.trim();
    if v.is_empty() {
        return None;
    }
    let wants_email = input_type == "email" || kind == ValueKind::Email;
    let wants_url = input_type == "url" || kind == ValueKind::Url;
    let wants_date = input_type == "date" || kind == ValueKind::Date;
    let wants_number = input_type == "number" || kind == ValueKind::Numeric;

    if wants_email {
        if !v.contains('@') {
            return None;
        }
        return Some(v.to_string());
    }
    if wants_url {
        if !looks_like_url(v) {
            return None;
        }
        return Some(v.to_string());
    }
    if wants_date {
        return to_date_input(v);
    }
    if wants_number {
        let digits: String = v
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        return digits.parse::<f64>().ok().map(|n| {
            if n.fract() == 0.0 {
                format!("{}", n as i64)
            } else {
                n.to_string()
            }
        });
    }
    Some(v.to_string())
}

/// Write a value into a text-like control. Returns whether a write happened.
pub async fn set_text(
    driver: &dyn PageDriver,
    candidate: &Candidate,
    kind: ValueKind,
    value: &str,
) -> Result<bool, DriverError> {
    if candidate.meta.read_only {
        return Ok(false);
    }
    let Some(prepared) = prepare_text_value(&candidate.meta.input_type, kind, value) else {
        return Ok(false);
    };
    if candidate.meta.value == prepared {
        return Ok(true);
    }
    let result = driver
        .eval(&script::set_text_value(candidate.meta.ref_id, &prepared))
        .await?;
    Ok(is_ok(&result))
}

/// Find the option index matching a target value.
///
/// Exact normalized equality (text or value) wins over containment in either
/// direction; document order breaks ties. Options with no text and no value
/// (placeholders) never match by containment.
pub fn match_select_option(options: &[SelectOption], target: &str) -> Option<usize> {
    let t = normalize_for_matching(target);
    if t.is_empty() {
        return None;
    }
    for (i, opt) in options.iter().enumerate() {
        let text = normalize_for_matching(&opt.text);
        let value = normalize_for_matching(&opt.value);
        if text == t || (!value.is_empty() && value == t) {
            return Some(i);
        }
    }
    for (i, opt) in options.iter().enumerate() {
        let text = normalize_for_matching(&opt.text);
        if !text.is_empty() && (text.contains(&t) || t.contains(&text)) {
            return Some(i);
        }
        let value = normalize_for_matching(&opt.value);
        if !value.is_empty() && (value.contains(&t) || t.contains(&value)) {
            return Some(i);
        }
    }
    None
}

/// Pick and apply an option on a native `<select>`.
///
/// Idempotent: when the matched option is already selected no events fire.
/// Returns whether the select now holds the target (matched at all).
pub async fn set_native_select(
    driver: &dyn PageDriver,
    candidate: &Candidate,
    target: &str,
) -> Result<bool, DriverError> {
    let Some(index) = match_select_option(&candidate.meta.options, target) else {
        return Ok(false);
    };
    if candidate.meta.options[index].selected {
        return Ok(true);
    }
    let result = driver
        .eval(&script::select_option(candidate.meta.ref_id, index))
        .await?;
    tracing::debug!(
        ref_id = candidate.meta.ref_id,
        changed = is_changed(&result),
        "native select updated"
    );
    Ok(is_ok(&result))
}

/// Resolve which radio in a group should be checked for a target value.
///
/// Precedence: exact `value` match → exact `aria-label`/label match →
/// containment against the combined text → boolean yes/no markers when the
/// target itself is boolean-like. Returns the winning radio's ref.
pub fn resolve_radio(group: &[&Candidate], target: &str) -> Option<u32> {
    let t = normalize_for_matching(target);
    if t.is_empty() || group.is_empty() {
        return None;
    }

    for c in group {
        if normalize_for_matching(&c.meta.value) == t {
            return Some(c.meta.ref_id);
        }
    }
    for c in group {
        if normalize_for_matching(&c.meta.aria_label) == t
            || normalize_for_matching(&c.meta.label) == t
        {
            return Some(c.meta.ref_id);
        }
    }
    for c in group {
        let combined = normalize_for_matching(&format!(
            "{} {} {}",
            c.meta.value, c.meta.aria_label, c.meta.label
        ));
        if !combined.is_empty() && (combined.contains(&t) || t.contains(&combined)) {
            return Some(c.meta.ref_id);
        }
    }
    if let Some(want) = parse_boolish(target) {
        for c in group {
            let combined = format!("{} {} {}", c.meta.value, c.meta.aria_label, c.meta.label);
            if boolean_marker_match(&combined, want) {
                return Some(c.meta.ref_id);
            }
        }
    }
    None
}

/// Check the resolved radio of a group. Clicks only when not already checked.
pub async fn select_radio(
    driver: &dyn PageDriver,
    group: &[&Candidate],
    target: &str,
) -> Result<bool, DriverError> {
    let Some(ref_id) = resolve_radio(group, target) else {
        return Ok(false);
    };
    if let Some(chosen) = group.iter().find(|c| c.meta.ref_id == ref_id) {
        if chosen.meta.checked {
            return Ok(true);
        }
    }
    let result = driver.eval(&script::click_and_notify(ref_id)).await?;
    Ok(is_ok(&result))
}

/// Flip a checkbox toward the wanted state. No-op when it already agrees.
pub async fn set_checkbox(
    driver: &dyn PageDriver,
    candidate: &Candidate,
    want: bool,
) -> Result<bool, DriverError> {
    if candidate.meta.checked == want {
        return Ok(true);
    }
    let result = driver
        .eval(&script::click_and_notify(candidate.meta.ref_id))
        .await?;
    Ok(is_ok(&result))
}
