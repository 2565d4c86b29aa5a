//! Control metadata and the closed widget classifier.
//!
//! The scan probe returns one [`ControlMeta`] per control-like element.
//! Classification into a [`ControlKind`] happens exactly once per candidate,
//! through an ordered set of structural predicates, so every later call site
//! dispatches on the tag instead of re-deriving widget-ness ad hoc.

use serde::{Deserialize, Serialize};

/// One `<option>` inside a native select, as reported by the scan probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectOption {
    /// Visible option text (or `label` attribute fallback).
    #[serde(default)]
    pub text: String,
    /// The option's `value` attribute.
    #[serde(default)]
    pub value: String,
    /// Whether this option is currently selected.
    #[serde(default)]
    pub selected: bool,
}

/// Per-element metadata collected by the in-page scan probe.
///
/// Every attribute read in the probe is wrapped in try/catch and degrades to
/// an empty string, so a hostile or exotic element can never abort a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlMeta {
    /// Engine-assigned marker (`data-ff-ref` attribute value).
    #[serde(rename = "ref")]
    pub ref_id: u32,
    /// Lowercase tag name.
    #[serde(default)]
    pub tag: String,
    /// Lowercase `type` attribute (inputs only).
    #[serde(default)]
    pub input_type: String,
    /// `role` attribute.
    #[serde(default)]
    pub role: String,
    /// `aria-haspopup` attribute.
    #[serde(default)]
    pub aria_haspopup: String,
    /// Whether an `aria-expanded` attribute is present at all.
    #[serde(default)]
    pub has_aria_expanded: bool,
    /// `class` attribute.
    #[serde(default)]
    pub class_name: String,
    /// Disabled flag.
    #[serde(default)]
    pub disabled: bool,
    /// Read-only flag.
    #[serde(default)]
    pub read_only: bool,
    /// Checked state (radios/checkboxes).
    #[serde(default)]
    pub checked: bool,
    /// Current value.
    #[serde(default)]
    pub value: String,
    /// `aria-label` attribute.
    #[serde(default)]
    pub aria_label: String,
    /// Associated label text (wrapping label or `label[for]`).
    #[serde(default)]
    pub label: String,
    /// Concatenated searchable attribute text
    /// (name, id, placeholder, title, class, aria-label, label text).
    #[serde(default)]
    pub blob: String,
    /// Options, populated for native selects only.
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

/// Closed classification of a control-like element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    /// Native `<select>`.
    NativeSelect,
    /// ARIA combobox / listbox trigger (`role=combobox`, `aria-haspopup=listbox`).
    AriaCombobox,
    /// Framework dropdown trigger recognised by class/structure hints.
    CustomTrigger,
    /// Plain typeable `<input>`.
    PlainInput,
    /// `<textarea>`.
    TextArea,
    /// `<input type=radio>`.
    Radio,
    /// `<input type=checkbox>`.
    Checkbox,
}

/// A discovered control: metadata plus its one-time classification.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub meta: ControlMeta,
    pub kind: ControlKind,
}

impl Candidate {
    pub fn new(meta: ControlMeta) -> Self {
        let kind = classify(&meta);
        Self { meta, kind }
    }
}

/// Class-name hints that mark an element as a framework dropdown trigger.
fn has_trigger_class_hint(class_name: &str) -> bool {
    let c = class_name.to_lowercase();
    c.contains("select") || c.contains("dropdown") || c.contains("choices__inner")
}

/// Classify a control through ordered structural predicates.
///
/// Order matters: concrete native kinds win first, ARIA semantics next,
/// class-hint triggers before the plain-input fallback so that readonly
/// "display inputs" of custom selects route to the dropdown orchestrator.
pub fn classify(meta: &ControlMeta) -> ControlKind {
    if meta.tag == "select" {
        return ControlKind::NativeSelect;
    }
    if meta.tag == "input" && meta.input_type == "radio" {
        return ControlKind::Radio;
    }
    if meta.tag == "input" && meta.input_type == "checkbox" {
        return ControlKind::Checkbox;
    }
    if meta.role == "combobox" || meta.aria_haspopup == "listbox" {
        return ControlKind::AriaCombobox;
    }
    if meta.tag == "textarea" {
        return ControlKind::TextArea;
    }
    if meta.tag == "input" {
        if has_trigger_class_hint(&meta.class_name) && meta.read_only {
            return ControlKind::CustomTrigger;
        }
        return ControlKind::PlainInput;
    }
    // Buttons, aria-expanded carriers, and class-hinted wrappers all act as
    // menu triggers; the orchestrator's fallback chain covers the rest.
    ControlKind::CustomTrigger
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(tag: &str, input_type: &str) -> ControlMeta {
        ControlMeta {
            tag: tag.to_string(),
            input_type: input_type.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_native_kinds() {
        assert_eq!(classify(&meta("select", "")), ControlKind::NativeSelect);
        assert_eq!(classify(&meta("textarea", "")), ControlKind::TextArea);
        assert_eq!(classify(&meta("input", "text")), ControlKind::PlainInput);
        assert_eq!(classify(&meta("input", "radio")), ControlKind::Radio);
        assert_eq!(classify(&meta("input", "checkbox")), ControlKind::Checkbox);
    }

    #[test]
    fn test_aria_combobox_beats_tag() {
        let mut m = meta("input", "text");
        m.role = "combobox".to_string();
        assert_eq!(classify(&m), ControlKind::AriaCombobox);

        let mut m = meta("div", "");
        m.aria_haspopup = "listbox".to_string();
        assert_eq!(classify(&m), ControlKind::AriaCombobox);
    }

    #[test]
    fn test_readonly_select_input_is_trigger() {
        let mut m = meta("input", "text");
        m.class_name = "vs__selected-options select-display".to_string();
        m.read_only = true;
        assert_eq!(classify(&m), ControlKind::CustomTrigger);

        // A typeable input with the same class stays a plain input.
        m.read_only = false;
        assert_eq!(classify(&m), ControlKind::PlainInput);
    }

    #[test]
    fn test_generic_wrapper_is_trigger() {
        assert_eq!(classify(&meta("button", "")), ControlKind::CustomTrigger);
        assert_eq!(classify(&meta("div", "")), ControlKind::CustomTrigger);
    }

    #[test]
    fn test_meta_deserializes_from_probe_shape() {
        let json = serde_json::json!({
            "ref": 7,
            "tag": "select",
            "blob": "country country-picker",
            "options": [
                {"text": "India", "value": "IN", "selected": false},
                {"text": "United States", "value": "US", "selected": true}
            ]
        });
        let m: ControlMeta = serde_json::from_value(json).unwrap();
        assert_eq!(m.ref_id, 7);
        assert_eq!(m.options.len(), 2);
        assert!(m.options[1].selected);
        assert_eq!(Candidate::new(m).kind, ControlKind::NativeSelect);
    }
}
