//! End-to-end pipeline tests against a scripted page driver.

mod common;

use common::{input_meta, ScriptedDriver};
use formfill::engine::{FillEngine, Timings};
use formfill::profile::ProfileRecord;
use serde_json::json;

fn fast() -> Timings {
    Timings {
        menu_open_ms: 20,
        poll_ms: 5,
        settle_ms: 1,
        retry_ms: 1,
        add_entry_ms: 1,
        field_gap_ms: 1,
    }
}

fn profile(value: serde_json::Value) -> ProfileRecord {
    ProfileRecord::from_value(&value).unwrap()
}

#[tokio::test]
async fn test_plain_inputs_fill_and_email_guard() {
    let driver = ScriptedDriver::new()
        .on(
            "const root = document",
            json!([
                input_meta(1, "text", "first_name given name"),
                input_meta(2, "email", "email address"),
            ]),
        )
        .on("setAttribute('value'", json!({ "ok": true }));

    let p = profile(json!({"firstName": "Asha", "email": "not-an-email"}));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    let first = report.outcomes.iter().find(|o| o.field == "firstName").unwrap();
    assert!(first.filled);
    // The malformed email never reaches the page.
    let email = report.outcomes.iter().find(|o| o.field == "email").unwrap();
    assert!(!email.filled);
    // Written by firstName and again by the broader fullName alias.
    assert_eq!(driver.count_scripts_containing("byRef(1);"), 2);
    assert_eq!(driver.count_scripts_containing("byRef(2);"), 0);
}

#[tokio::test]
async fn test_missing_controls_never_abort_the_pass() {
    let driver = ScriptedDriver::new().on("const root = document", json!([]));

    let p = profile(json!({"firstName": "Asha", "email": "a@b.com", "city": "Pune"}));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    assert!(report.attempted >= 3);
    assert_eq!(report.filled, 0);
    assert!(report.outcomes.iter().all(|o| !o.filled));
}

#[tokio::test]
async fn test_native_select_already_selected_is_left_alone() {
    let driver = ScriptedDriver::new().on(
        "const root = document",
        json!([{
            "ref": 3,
            "tag": "select",
            "blob": "country residence",
            "options": [
                {"text": "Select a country", "value": "", "selected": false},
                {"text": "India", "value": "IN", "selected": true},
            ],
        }]),
    );

    let p = profile(json!({"country": "India"}));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    let country = report.outcomes.iter().find(|o| o.field == "country").unwrap();
    assert!(country.filled);
    // No selection script fired for an already-correct select.
    assert_eq!(driver.count_scripts_containing("selectedIndex"), 0);
}

#[tokio::test]
async fn test_boolean_radio_resolution() {
    let driver = ScriptedDriver::new()
        .on(
            "const root = document",
            json!([
                {"ref": 4, "tag": "input", "inputType": "radio",
                 "blob": "willing to relocate", "label": "Yes", "value": ""},
                {"ref": 5, "tag": "input", "inputType": "radio",
                 "blob": "willing to relocate", "label": "No", "value": ""},
            ]),
        )
        .on("block: 'nearest'", json!({ "ok": true }));

    let p = profile(json!({"willingToRelocate": true}));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    let outcome = report
        .outcomes
        .iter()
        .find(|o| o.field == "willingToRelocate")
        .unwrap();
    assert!(outcome.filled);
    assert_eq!(driver.count_scripts_containing("byRef(4);"), 1);
    assert_eq!(driver.count_scripts_containing("byRef(5);"), 0);
}

#[tokio::test]
async fn test_custom_dropdown_scores_and_clicks_best_option() {
    let driver = ScriptedDriver::new()
        .on(
            "const root = document",
            json!([{
                "ref": 7, "tag": "div", "role": "combobox", "blob": "gender identity",
            }]),
        )
        .on("block: 'center'", json!({ "ok": true }))
        .on("hasSearch", json!([{ "ref": 9, "hasSearchInput": false }]))
        .on(
            "[data-option-index]",
            json!([
                {"ref": 10, "text": "Female"},
                {"ref": 11, "text": "Male"},
                {"ref": 12, "text": "Prefer not to say"},
            ]),
        )
        .on("block: 'nearest'", json!({ "ok": true }));

    let p = profile(json!({"gender": "Female"}));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    let gender = report.outcomes.iter().find(|o| o.field == "gender").unwrap();
    assert!(gender.filled);
    assert_eq!(driver.count_scripts_containing("byRef(10);"), 1);
    assert_eq!(driver.count_scripts_containing("byRef(11);"), 0);
}

#[tokio::test]
async fn test_repeatable_section_clicks_add_once_per_extra_entry() {
    let driver = ScriptedDriver::new()
        .on("const root = document", json!([]))
        .on(
            "querySelectorAll(\"button, [role='button']\")",
            json!([
                {"ref": 20, "text": "Submit application"},
                {"ref": 21, "text": "+ Add Education"},
            ]),
        )
        .on("[data-testid*='education' i]", json!([30]))
        .on(
            "byRef(30) || document",
            json!([input_meta(31, "text", "school university name")]),
        )
        .on("setAttribute('value'", json!({ "ok": true }))
        .on("block: 'nearest'", json!({ "ok": true }));

    let p = profile(json!({
        "education": [
            {"school": "IISc"},
            {"school": "PES University"},
        ]
    }));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    // Two entries, one add click (only for the second entry).
    assert_eq!(driver.count_scripts_containing("byRef(21);"), 1);
    assert_eq!(driver.count_scripts_containing("byRef(20);"), 0);
    let schools: Vec<_> = report
        .outcomes
        .iter()
        .filter(|o| o.field.ends_with(".school"))
        .collect();
    assert_eq!(schools.len(), 2);
    assert!(schools.iter().all(|o| o.filled));
    assert_eq!(schools[0].field, "education[0].school");
    assert_eq!(schools[1].field, "education[1].school");
}

#[tokio::test]
async fn test_hidden_mirror_input_also_written() {
    let driver = ScriptedDriver::new()
        .on(
            "const root = document",
            json!([
                input_meta(1, "text", "city location"),
                input_meta(2, "hidden", "city"),
            ]),
        )
        .on("setAttribute('value'", json!({ "ok": true }));

    let p = profile(json!({"city": "Bengaluru"}));
    let report = FillEngine::with_timings(&driver, fast()).run(&p).await.unwrap();

    let city = report.outcomes.iter().find(|o| o.field == "city").unwrap();
    assert!(city.filled);
    assert_eq!(driver.count_scripts_containing("byRef(1);"), 1);
    assert_eq!(driver.count_scripts_containing("byRef(2);"), 1);
}
