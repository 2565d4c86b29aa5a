//! Builders for the JavaScript probes and action snippets evaluated in the
//! page.
//!
//! Every script is a self-contained IIFE: a shared prelude of defensive
//! helpers (attribute reads wrapped in try/catch, element stamping, event
//! dispatch) followed by a body. Probes return JSON arrays of metadata;
//! action scripts return small `{ok: …}` objects.
//!
//! Elements are addressed across evaluations by a stamped `data-ff-ref`
//! attribute. Stamping is idempotent — an element keeps its first ref for
//! the lifetime of the page.
//!
//! ## Security: JS encoding
//!
//! All interpolated values pass through [`js_string`] before injection into
//! JS string literals, so a profile value can never break out of string
//! context (quotes, backticks, `</script>`, null bytes).

/// Defensive helpers shared by every script.
///
/// `A`/`P` are throw-safe attribute/property reads; any failure degrades to
/// an empty string so one hostile element can never abort a scan.
const PRELUDE: &str = r#"
const A = (el, n) => { try { const v = el.getAttribute(n); return v == null ? '' : String(v); } catch (e) { return ''; } };
const P = (el, n) => { try { const v = el[n]; return v == null ? '' : String(v); } catch (e) { return ''; } };
const stamp = (el) => {
  try {
    const cur = el.getAttribute('data-ff-ref');
    if (cur) return Number(cur);
    const n = (window.__ffRef = (window.__ffRef || 0) + 1);
    el.setAttribute('data-ff-ref', String(n));
    return n;
  } catch (e) { return 0; }
};
const byRef = (r) => document.querySelector('[data-ff-ref="' + r + '"]');
const labelText = (el) => {
  try {
    const wrap = el.closest ? el.closest('label') : null;
    if (wrap && wrap.textContent) return wrap.textContent.trim();
    const id = el.id;
    if (!id) return '';
    const esc = (window.CSS && CSS.escape) ? CSS.escape(id) : id;
    const lab = document.querySelector('label[for="' + esc + '"]');
    return (lab && lab.textContent) ? lab.textContent.trim() : '';
  } catch (e) { return ''; }
};
const blobOf = (el) => [P(el, 'name'), P(el, 'id'), A(el, 'placeholder'), A(el, 'title'), P(el, 'className'), A(el, 'aria-label'), labelText(el)].filter(Boolean).join(' ');
const fire = (el, t) => { try { el.dispatchEvent(new Event(t, { bubbles: true })); } catch (e) {} };
const fireAll = (el) => ['input', 'change', 'blur'].forEach((t) => fire(el, t));
const highlight = (el) => { try { el.style.outline = '2px solid #4f46e5'; el.style.outlineOffset = '2px'; } catch (e) {} };
const visible = (el) => {
  try {
    const s = window.getComputedStyle(el);
    return s.display !== 'none' && s.visibility !== 'hidden' && s.opacity !== '0' && el.offsetWidth > 0 && el.offsetHeight > 0;
  } catch (e) { return false; }
};
const metaOf = (el) => {
  const tag = (el.tagName || '').toLowerCase();
  const meta = {
    ref: stamp(el),
    tag: tag,
    inputType: (A(el, 'type') || '').toLowerCase(),
    role: A(el, 'role'),
    ariaHaspopup: A(el, 'aria-haspopup'),
    hasAriaExpanded: (() => { try { return el.hasAttribute('aria-expanded'); } catch (e) { return false; } })(),
    className: P(el, 'className'),
    disabled: !!el.disabled,
    readOnly: !!el.readOnly,
    checked: !!el.checked,
    value: P(el, 'value'),
    ariaLabel: A(el, 'aria-label'),
    label: labelText(el),
    blob: blobOf(el),
    options: []
  };
  if (tag === 'select') {
    try {
      meta.options = Array.from(el.options || []).map((o) => ({
        text: o.text || o.label || '',
        value: o.value || '',
        selected: !!o.selected
      }));
    } catch (e) {}
  }
  return meta;
};
"#;

/// Selector covering every element the locator treats as control-like.
const CONTROL_SELECTOR: &str = "input, textarea, select, [role='combobox'], button, \
[role='button'], [aria-haspopup='listbox'], [aria-expanded], .select2-selection, \
.choices__inner, .vs__selected-options, [data-testid*='select'], [class*='select'], \
[class*='dropdown']";

/// Selector for open dropdown/listbox surfaces across common UI frameworks.
const MENU_SCOPE_SELECTOR: &str = ".ant-select-dropdown, .rc-virtual-list, \
.react-select__menu, .Select-menu-outer, .Select-menu, .MuiAutocomplete-popper, \
.MuiPopover-paper, .MuiMenu-paper, .vs__dropdown-menu, [role='listbox'], \
[data-radix-popper-content], .dropdown-menu, .select2-dropdown, .select2-results, \
.choices__list--dropdown, .select2-results__options, [data-testid*='menu'], \
[class*='menu']:not(html):not(body), [class*='dropdown']:not(html):not(body)";

/// Widget-specific option selectors, tried before the generic descendant scan.
const MENU_OPTION_SELECTOR: &str = "[role='option'], .ant-select-item, \
.react-select__option, .Select-option, .dropdown-item, .vs__dropdown-option, \
.MuiAutocomplete-option, [data-option-index], .select2-results__option, \
.choices__item--choice, [role='menuitem'], [data-value], [data-testid*='option']";

/// Search inputs that appear inside open menu scopes.
const MENU_SEARCH_SELECTOR: &str =
    "input[type='search'], input[type='text'], .react-select__input input, .MuiAutocomplete-input";

/// Escape a string for safe injection into a JS string literal.
///
/// Escapes quote/backtick/backslash breakouts, strips null bytes, and hex-
/// encodes angle brackets so a reflected value cannot smuggle `</script>`.
pub fn js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '`' => out.push_str("\\`"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => {}
            '<' => out.push_str("\\x3c"),
            '>' => out.push_str("\\x3e"),
            _ => out.push(ch),
        }
    }
    out
}

fn wrap(body: String) -> String {
    format!("(() => {{\n{PRELUDE}\n{body}\n}})()")
}

/// Scan probe: enumerate control-like elements, stamp them, and return
/// their metadata in document order. `scope_ref` restricts the scan to a
/// previously stamped subtree (repeatable-section fills).
pub fn scan_controls(scope_ref: Option<u32>) -> String {
    let root = match scope_ref {
        Some(r) => format!("byRef({r}) || document"),
        None => "document".to_string(),
    };
    wrap(format!(
        "const root = {root};\n\
         const nodes = Array.from(root.querySelectorAll(\"{CONTROL_SELECTOR}\"));\n\
         return nodes.map((el) => {{ try {{ return metaOf(el); }} catch (e) {{ return null; }} }}).filter(Boolean);"
    ))
}

/// List currently visible dropdown/listbox scopes, newest usable first left
/// in document order, each stamped and flagged for a nested search input.
pub fn list_menu_scopes() -> String {
    wrap(format!(
        "const all = Array.from(document.querySelectorAll(\"{MENU_SCOPE_SELECTOR}\"));\n\
         return all.filter(visible).map((el) => {{\n\
           let hasSearch = false;\n\
           try {{ hasSearch = !!el.querySelector(\"{MENU_SEARCH_SELECTOR}\") || !!el.querySelector('input'); }} catch (e) {{}}\n\
           return {{ ref: stamp(el), hasSearchInput: hasSearch }};\n\
         }});"
    ))
}

/// Enumerate option nodes inside an open menu scope.
///
/// Tries widget-specific option selectors first; when none match, falls
/// back to a generic scan of clickable/focusable descendants.
pub fn list_menu_options(menu_ref: u32) -> String {
    wrap(format!(
        "const scope = byRef({menu_ref});\n\
         if (!scope) return [];\n\
         let opts = Array.from(scope.querySelectorAll(\"{MENU_OPTION_SELECTOR}\"));\n\
         if (opts.length === 0) {{\n\
           opts = Array.from(scope.querySelectorAll(\"li, div, span, a, button, [tabindex]\")).filter((el) => {{\n\
             try {{\n\
               const tag = el.tagName.toLowerCase();\n\
               const hidden = !el.offsetParent || el.hidden;\n\
               const clickable = !!el.onclick || A(el, 'role') === 'menuitem' || el.getAttribute('tabindex') !== null;\n\
               return !hidden && (clickable || tag === 'li' || tag === 'div');\n\
             }} catch (e) {{ return false; }}\n\
           }});\n\
         }}\n\
         return opts.map((el) => {{\n\
           try {{\n\
             return {{\n\
               ref: stamp(el),\n\
               text: (el.textContent || '').replace(/\\s+/g, ' ').trim(),\n\
               ariaLabel: A(el, 'aria-label'),\n\
               title: A(el, 'title'),\n\
               value: A(el, 'data-value') || A(el, 'value')\n\
             }};\n\
           }} catch (e) {{ return null; }}\n\
         }}).filter(Boolean);"
    ))
}

/// Activate a menu trigger: scroll into view and click.
pub fn open_trigger(ref_id: u32) -> String {
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el) return {{ ok: false }};\n\
         try {{ el.scrollIntoView({{ block: 'center', inline: 'center' }}); }} catch (e) {{}}\n\
         try {{ el.click(); }} catch (e) {{ return {{ ok: false }}; }}\n\
         return {{ ok: true }};"
    ))
}

/// Keyboard-style activation fallback: focus then ArrowDown and Space.
pub fn keyboard_open(ref_id: u32) -> String {
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el) return {{ ok: false }};\n\
         try {{ el.focus(); }} catch (e) {{}}\n\
         for (const key of ['ArrowDown', ' ']) {{\n\
           try {{ el.dispatchEvent(new KeyboardEvent('keydown', {{ key: key, bubbles: true }})); }} catch (e) {{}}\n\
         }}\n\
         return {{ ok: true }};"
    ))
}

/// Click an option/affordance node: scroll to it, click, and notify.
pub fn click_and_notify(ref_id: u32) -> String {
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el) return {{ ok: false }};\n\
         try {{ el.scrollIntoView({{ block: 'nearest', inline: 'nearest' }}); }} catch (e) {{}}\n\
         try {{ el.click(); }} catch (e) {{ return {{ ok: false }}; }}\n\
         highlight(el);\n\
         fireAll(el);\n\
         return {{ ok: true }};"
    ))
}

/// Set a text-like control's value and announce the change.
///
/// Re-checks disabled/readonly at action time (the page may have reacted to
/// earlier fills), mirrors the value into the `value` attribute so
/// serialization tools observe it, highlights, and fires
/// `input`/`change`/`blur`. On refusal the element is left untouched.
pub fn set_text_value(ref_id: u32, value: &str) -> String {
    let v = js_string(value);
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el || el.disabled || el.readOnly) return {{ ok: false }};\n\
         el.value = '{v}';\n\
         try {{ el.setAttribute('value', el.value); }} catch (e) {{}}\n\
         highlight(el);\n\
         fireAll(el);\n\
         return {{ ok: true }};"
    ))
}

/// Select an option of a native `<select>` by index.
///
/// Idempotent: when the index is already selected nothing is dispatched and
/// `changed` comes back false.
pub fn select_option(ref_id: u32, option_index: usize) -> String {
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el || el.disabled) return {{ ok: false, changed: false }};\n\
         if (el.selectedIndex === {option_index}) return {{ ok: true, changed: false }};\n\
         el.selectedIndex = {option_index};\n\
         highlight(el);\n\
         fireAll(el);\n\
         return {{ ok: true, changed: true }};"
    ))
}

/// Type a query into an open menu's search input and fire `input`.
pub fn type_menu_search(menu_ref: u32, value: &str) -> String {
    let v = js_string(value);
    wrap(format!(
        "const scope = byRef({menu_ref});\n\
         if (!scope) return {{ ok: false }};\n\
         let input = null;\n\
         try {{ input = scope.querySelector(\"{MENU_SEARCH_SELECTOR}\") || scope.querySelector('input'); }} catch (e) {{}}\n\
         if (!input) return {{ ok: false }};\n\
         try {{ input.focus(); }} catch (e) {{}}\n\
         input.value = '{v}';\n\
         fire(input, 'input');\n\
         return {{ ok: true }};"
    ))
}

/// Look for a usable native control nested inside a wrapper element
/// (hidden inputs, embedded selects, readonly display inputs).
/// Returns the nested control's metadata, or null.
pub fn find_nested_control(ref_id: u32) -> String {
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el) return null;\n\
         const picks = [\n\
           'select',\n\
           \"[role='combobox']\",\n\
           \"[aria-haspopup='listbox']\",\n\
           '[aria-expanded]',\n\
           'input[readonly]',\n\
           \"input[type='hidden']\",\n\
           '.select2-selection', '.choices__inner', '.vs__selected-options'\n\
         ];\n\
         for (const sel of picks) {{\n\
           try {{\n\
             const found = el.querySelector(sel);\n\
             if (found) return metaOf(found);\n\
           }} catch (e) {{}}\n\
         }}\n\
         return null;"
    ))
}

/// Last-resort direct assignment for controls exposing a settable `value`.
pub fn set_value_prop(ref_id: u32, value: &str) -> String {
    let v = js_string(value);
    wrap(format!(
        "const el = byRef({ref_id});\n\
         if (!el || !('value' in el)) return {{ ok: false }};\n\
         el.value = '{v}';\n\
         fireAll(el);\n\
         return {{ ok: true }};"
    ))
}

/// Enumerate clickable affordances (buttons and button-role elements) with
/// their collapsed text, for add-entry detection.
pub fn list_affordances() -> String {
    wrap(
        "const nodes = Array.from(document.querySelectorAll(\"button, [role='button']\"));\n\
         return nodes.map((el) => {\n\
           try {\n\
             return { ref: stamp(el), text: (el.textContent || '').replace(/\\s+/g, ' ').trim() };\n\
           } catch (e) { return null; }\n\
         }).filter(Boolean);"
            .to_string(),
    )
}

/// List subtrees whose id/class/data-testid hint at a named section
/// (education, experience), stamped, in document order.
///
/// `keyword` is restricted to alphanumerics before injection; section names
/// are engine constants, never user input.
pub fn list_section_scopes(keyword: &str) -> String {
    let kw: String = keyword
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    wrap(format!(
        "const sel = \"[id*='{kw}' i], [class*='{kw}' i], [data-testid*='{kw}' i]\";\n\
         const nodes = Array.from(document.querySelectorAll(sel));\n\
         return nodes.map((el) => stamp(el)).filter((r) => r > 0);"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_basic() {
        assert_eq!(js_string("hello"), "hello");
        assert_eq!(js_string("O'Brien"), "O\\'Brien");
        assert_eq!(js_string("a\"b"), "a\\\"b");
    }

    #[test]
    fn test_js_string_blocks_script_breakout() {
        let malicious = r#"</script><script>alert(1)</script>"#;
        let sanitized = js_string(malicious);
        assert!(!sanitized.contains("</script>"));
        assert!(sanitized.contains("\\x3c/script\\x3e"));
    }

    #[test]
    fn test_js_string_strips_null_bytes() {
        assert_eq!(js_string("ab\0cd"), "abcd");
    }

    #[test]
    fn test_set_text_value_embeds_escaped_value() {
        let script = set_text_value(4, "it's me");
        assert!(script.contains("byRef(4)"));
        assert!(script.contains("it\\'s me"));
        assert!(script.contains("fireAll(el)"));
    }

    #[test]
    fn test_scan_controls_scoping() {
        let unscoped = scan_controls(None);
        assert!(unscoped.contains("const root = document;"));
        let scoped = scan_controls(Some(12));
        assert!(scoped.contains("byRef(12) || document"));
    }

    #[test]
    fn test_select_option_is_index_based() {
        let script = select_option(9, 3);
        assert!(script.contains("el.selectedIndex === 3"));
        assert!(script.contains("changed: false"));
    }

    #[test]
    fn test_section_keyword_sanitized() {
        let script = list_section_scopes("Edu'ca-tion!");
        assert!(script.contains("[id*='education' i]"));
        assert!(script.contains("[data-testid*='education' i]"));
    }

    #[test]
    fn test_scripts_are_iifes_with_prelude() {
        for script in [
            scan_controls(None),
            list_menu_scopes(),
            list_menu_options(1),
            open_trigger(1),
            keyboard_open(1),
            click_and_notify(1),
            type_menu_search(1, "x"),
            find_nested_control(1),
            set_value_prop(1, "x"),
            list_affordances(),
            list_section_scopes("education"),
        ] {
            assert!(script.starts_with("(() => {"));
            assert!(script.ends_with("})()"));
            assert!(script.contains("const stamp"));
        }
    }
}
