//! The ordered fill pipeline.
//!
//! Runs a fixed declarative plan over a live page: identity first, then
//! demographics, address, social links, work authorization, job
//! preferences, skills, the repeatable education/experience sections, and
//! finally the free-text aggregates. One field failing never aborts the
//! pass; every attempt lands in the [`FillReport`].

use crate::driver::{is_ok, DriverError, PageDriver};
use crate::driver::script;
use crate::engine::classify::{Candidate, ControlKind};
use crate::engine::dropdown::{DropdownOrchestrator, Timings};
use crate::engine::fields::{SemanticField, ValueKind};
use crate::engine::locator;
use crate::engine::normalize::parse_boolish;
use crate::engine::setter;
use crate::profile::ProfileRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// The result of attempting one semantic field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillOutcome {
    /// Semantic field name, suffixed with an entry index for repeatable
    /// sections (`education[1].school`).
    pub field: String,
    /// Whether at least one control accepted the value.
    pub filled: bool,
    /// Failure detail, when the attempt errored rather than merely missed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Summary of one full fill pass over a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillReport {
    /// Page URL at the time of the pass.
    pub url: String,
    /// Fields attempted (a value existed in the profile).
    pub attempted: usize,
    /// Fields where at least one control accepted the value.
    pub filled: usize,
    pub outcomes: Vec<FillOutcome>,
}

impl FillReport {
    /// One-line human summary ("filled 14 of 21 fields").
    pub fn summary(&self) -> String {
        format!("filled {} of {} fields", self.filled, self.attempted)
    }
}

/// Drives a complete fill pass against one page.
pub struct FillEngine<'a> {
    driver: &'a dyn PageDriver,
    timings: Timings,
}

impl<'a> FillEngine<'a> {
    pub fn new(driver: &'a dyn PageDriver) -> Self {
        Self {
            driver,
            timings: Timings::default(),
        }
    }

    pub fn with_timings(driver: &'a dyn PageDriver, timings: Timings) -> Self {
        Self { driver, timings }
    }

    /// Run the whole plan. Field-level failures are recorded and skipped;
    /// only driver-fatal conditions (page gone) surface as `Err`.
    pub async fn run(&self, profile: &ProfileRecord) -> Result<FillReport, DriverError> {
        let url = self.driver.url().await.unwrap_or_default();
        info!(%url, "starting fill pass");

        let mut report = FillReport {
            url,
            attempted: 0,
            filled: 0,
            outcomes: Vec::new(),
        };

        let candidates = locator::scan(self.driver, None).await?;
        debug!(count = candidates.len(), "scanned page controls");

        for (field, value) in scalar_plan(profile) {
            self.attempt(&candidates, field, &value, field.name().to_string(), &mut report)
                .await;
            sleep(Duration::from_millis(self.timings.field_gap_ms)).await;
        }

        self.fill_entries(
            "education",
            r"(?i)(add|new)\s*(education|degree|school)",
            education_entries(profile),
            &mut report,
        )
        .await;
        self.fill_entries(
            "experience",
            r"(?i)(add|new)\s*(experience|work|employment|position|job)",
            experience_entries(profile),
            &mut report,
        )
        .await;

        // Aggregates last: they target large free-text areas and should not
        // steal controls from the structured sections.
        let candidates = locator::scan(self.driver, None).await?;
        for (field, value) in aggregate_plan(profile) {
            self.attempt(&candidates, field, &value, field.name().to_string(), &mut report)
                .await;
        }

        info!(
            filled = report.filled,
            attempted = report.attempted,
            "fill pass complete"
        );
        Ok(report)
    }

    /// Attempt one field and record the outcome. Driver errors downgrade to
    /// an unfilled outcome with detail.
    async fn attempt(
        &self,
        candidates: &[Candidate],
        field: SemanticField,
        value: &str,
        label: String,
        report: &mut FillReport,
    ) {
        report.attempted += 1;
        match self.fill_field(candidates, field, value).await {
            Ok(true) => {
                debug!(field = %label, "filled");
                report.filled += 1;
                report.outcomes.push(FillOutcome {
                    field: label,
                    filled: true,
                    detail: None,
                });
            }
            Ok(false) => {
                debug!(field = %label, "no control accepted the value");
                report.outcomes.push(FillOutcome {
                    field: label,
                    filled: false,
                    detail: None,
                });
            }
            Err(e) => {
                warn!(field = %label, error = %e, "field attempt failed");
                report.outcomes.push(FillOutcome {
                    field: label,
                    filled: false,
                    detail: Some(e.to_string()),
                });
            }
        }
    }

    /// Attempt every candidate matching a field; radios resolve as one group.
    ///
    /// Pages routinely pair a visible widget with a hidden mirror input that
    /// matches the same aliases; writing both is harmless and writing only
    /// one risks missing the one the page serializes.
    async fn fill_field(
        &self,
        candidates: &[Candidate],
        field: SemanticField,
        value: &str,
    ) -> Result<bool, DriverError> {
        let matches = locator::find_candidates(candidates, field);
        let mut filled = false;
        let mut radios = Vec::new();
        for c in matches {
            match c.kind {
                ControlKind::Radio => radios.push(c),
                ControlKind::NativeSelect => {
                    filled |= setter::set_native_select(self.driver, c, value).await?;
                }
                ControlKind::PlainInput | ControlKind::TextArea => {
                    filled |= setter::set_text(self.driver, c, field.value_kind(), value).await?;
                }
                ControlKind::Checkbox => {
                    if let Some(want) = parse_boolish(value) {
                        filled |= setter::set_checkbox(self.driver, c, want).await?;
                    }
                }
                ControlKind::AriaCombobox | ControlKind::CustomTrigger => {
                    let orchestrator = DropdownOrchestrator::new(self.driver, self.timings);
                    filled |= orchestrator.fill(c, value).await?;
                }
            }
        }
        if !radios.is_empty() {
            filled |= setter::select_radio(self.driver, &radios, value).await?;
        } else if !filled && matches!(field.value_kind(), ValueKind::Boolean | ValueKind::Choice) {
            // No alias-matching radio: widen to every radio on the page.
            // The resolution ladder only fires on a real value/label match,
            // so unrelated groups stay untouched.
            let universe: Vec<&Candidate> = candidates
                .iter()
                .filter(|c| c.kind == ControlKind::Radio)
                .collect();
            if !universe.is_empty() {
                filled |= setter::select_radio(self.driver, &universe, value).await?;
            }
        }
        Ok(filled)
    }

    /// Fill a repeatable section (education, experience).
    ///
    /// The first entry fills into the section's existing controls. Each
    /// later entry first clicks an add-affordance whose text matches
    /// `add_pattern`, waits for the new block to mount, then fills into the
    /// last matching section subtree so values land in the fresh block.
    async fn fill_entries(
        &self,
        keyword: &str,
        add_pattern: &str,
        entries: Vec<Vec<(SemanticField, String)>>,
        report: &mut FillReport,
    ) {
        if entries.is_empty() {
            return;
        }
        let add_re = Regex::new(add_pattern).expect("add-affordance regex is valid");

        for (index, entry) in entries.iter().enumerate() {
            if index > 0 {
                match self.click_add_affordance(&add_re).await {
                    Ok(true) => {
                        sleep(Duration::from_millis(self.timings.add_entry_ms)).await;
                    }
                    Ok(false) => {
                        debug!(section = keyword, index, "no add affordance found");
                        break;
                    }
                    Err(e) => {
                        warn!(section = keyword, index, error = %e, "add affordance failed");
                        break;
                    }
                }
            }
            let scope = match self.last_section_scope(keyword).await {
                Ok(scope) => scope,
                Err(e) => {
                    warn!(section = keyword, error = %e, "section scope probe failed");
                    None
                }
            };
            let candidates = match locator::scan(self.driver, scope).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(section = keyword, error = %e, "section scan failed");
                    continue;
                }
            };
            for (field, value) in entry {
                let label = format!("{keyword}[{index}].{field}");
                self.attempt(&candidates, *field, value, label, report).await;
                sleep(Duration::from_millis(self.timings.field_gap_ms)).await;
            }
        }
    }

    /// Click the first button-like element whose text matches the pattern.
    async fn click_add_affordance(&self, pattern: &Regex) -> Result<bool, DriverError> {
        #[derive(Deserialize)]
        struct Affordance {
            #[serde(rename = "ref")]
            ref_id: u32,
            #[serde(default)]
            text: String,
        }
        let raw = self.driver.eval(&script::list_affordances()).await?;
        let affordances: Vec<Affordance> = serde_json::from_value(raw)
            .map_err(|e| DriverError::ProbeShape(format!("affordance probe: {e}")))?;
        let Some(found) = affordances.iter().find(|a| pattern.is_match(&a.text)) else {
            return Ok(false);
        };
        let clicked = self
            .driver
            .eval(&script::click_and_notify(found.ref_id))
            .await?;
        Ok(is_ok(&clicked))
    }

    /// The most recently mounted subtree hinting at the section keyword.
    async fn last_section_scope(&self, keyword: &str) -> Result<Option<u32>, DriverError> {
        let raw = self
            .driver
            .eval(&script::list_section_scopes(keyword))
            .await?;
        let refs: Vec<u32> = match raw {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_u64().map(|n| n as u32))
                .collect(),
            _ => return Err(DriverError::ProbeShape("section scope probe".to_string())),
        };
        Ok(refs.into_iter().last())
    }
}

/// The ordered scalar plan: one `(field, value)` per profile attribute with
/// a value, top-of-page concerns first.
fn scalar_plan(profile: &ProfileRecord) -> Vec<(SemanticField, String)> {
    let mut plan = Vec::new();
    let mut push = |field: SemanticField, value: Option<String>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                plan.push((field, v));
            }
        }
    };
    let yes_no = |b: Option<bool>| b.map(|v| if v { "Yes" } else { "No" }.to_string());

    // Identity
    push(SemanticField::FirstName, profile.first_name.clone());
    push(SemanticField::LastName, profile.last_name.clone());
    push(SemanticField::FullName, profile.full_name());
    push(SemanticField::Email, profile.email.clone());
    push(SemanticField::Phone, profile.phone_full());
    push(
        SemanticField::PhoneCountryCode,
        profile.phone_country_code.clone(),
    );
    push(SemanticField::Pronouns, profile.pronouns.clone());
    // Demographics
    push(SemanticField::Gender, profile.gender.clone());
    push(SemanticField::Ethnicity, profile.ethnicity.clone());
    push(SemanticField::Race, profile.race.clone());
    push(
        SemanticField::DisabilityStatus,
        profile.disability_status.clone(),
    );
    push(SemanticField::VeteranStatus, profile.veteran_status.clone());
    // Address
    push(SemanticField::Street, profile.street.clone());
    push(SemanticField::Address, profile.address_line());
    push(SemanticField::City, profile.city.clone());
    push(SemanticField::State, profile.state.clone());
    push(SemanticField::Country, profile.country.clone());
    push(SemanticField::ZipCode, profile.zip_code.clone());
    // Social links
    push(SemanticField::Portfolio, profile.portfolio.clone());
    push(SemanticField::Linkedin, profile.linkedin.clone());
    push(SemanticField::Github, profile.github.clone());
    push(SemanticField::Twitter, profile.twitter.clone());
    push(
        SemanticField::OtherSocialLink,
        profile.other_social_link.clone(),
    );
    push(SemanticField::ResumeUrl, profile.resume_url.clone());
    // Work authorization
    push(SemanticField::UsAuthorized, yes_no(profile.us_authorized));
    push(
        SemanticField::SponsorshipRequired,
        yes_no(profile.sponsorship_required),
    );
    push(
        SemanticField::CitizenshipStatus,
        profile.citizenship_status.clone(),
    );
    push(SemanticField::Nationality, profile.nationality.clone());
    // Job preferences
    push(SemanticField::JobType, profile.job_type.clone());
    push(
        SemanticField::PreferredLocations,
        profile.preferred_locations_csv(),
    );
    push(
        SemanticField::CurrentCtc,
        profile
            .current_ctc_normalized()
            .map(|n| n.to_string())
            .or_else(|| profile.current_ctc.clone()),
    );
    push(
        SemanticField::ExpectedCtc,
        profile
            .expected_ctc_normalized()
            .map(|n| n.to_string())
            .or_else(|| profile.expected_ctc.clone()),
    );
    push(
        SemanticField::WillingToRelocate,
        yes_no(profile.willing_to_relocate),
    );
    push(
        SemanticField::NoticePeriodAvailable,
        yes_no(profile.notice_period_available),
    );
    push(
        SemanticField::NoticePeriodDays,
        profile.notice_period_duration_in_days.map(|d| d.to_string()),
    );
    // Derive total experience from the entry list when the profile does
    // not state it outright.
    let experience_years = profile.total_experience_in_years.or_else(|| {
        let days = profile.total_experience_days();
        (days > 0).then(|| (days as f64 / 365.25 * 10.0).round() / 10.0)
    });
    push(
        SemanticField::TotalExperienceYears,
        experience_years.map(|y| {
            if y.fract() == 0.0 {
                format!("{}", y as i64)
            } else {
                y.to_string()
            }
        }),
    );
    // Skills
    push(SemanticField::Skills, profile.skills_csv());
    plan
}

/// Free-text aggregate plan, filled after the structured sections.
fn aggregate_plan(profile: &ProfileRecord) -> Vec<(SemanticField, String)> {
    let mut plan = Vec::new();
    let mut push = |field: SemanticField, value: Option<String>| {
        if let Some(v) = value {
            if !v.trim().is_empty() {
                plan.push((field, v));
            }
        }
    };
    push(SemanticField::Achievements, profile.achievements_text());
    push(SemanticField::Certifications, profile.certifications_text());
    push(SemanticField::Languages, profile.languages_text());
    push(SemanticField::Publications, profile.publications_text());
    push(SemanticField::Projects, profile.projects_text());
    plan
}

fn education_entries(profile: &ProfileRecord) -> Vec<Vec<(SemanticField, String)>> {
    profile
        .education
        .iter()
        .map(|e| {
            let mut entry = Vec::new();
            let mut push = |field: SemanticField, value: &Option<String>| {
                if let Some(v) = value {
                    if !v.trim().is_empty() {
                        entry.push((field, v.clone()));
                    }
                }
            };
            push(SemanticField::School, &e.school);
            push(SemanticField::Degree, &e.degree);
            push(SemanticField::FieldOfStudy, &e.field_of_study);
            push(SemanticField::StartDate, &e.start_date);
            if !e.is_current {
                push(SemanticField::EducationEndDate, &e.end_date);
            }
            push(SemanticField::Gpa, &e.grade);
            entry
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn experience_entries(profile: &ProfileRecord) -> Vec<Vec<(SemanticField, String)>> {
    profile
        .experience
        .iter()
        .map(|e| {
            let mut entry = Vec::new();
            let mut push = |field: SemanticField, value: &Option<String>| {
                if let Some(v) = value {
                    if !v.trim().is_empty() {
                        entry.push((field, v.clone()));
                    }
                }
            };
            push(SemanticField::Company, &e.company);
            push(SemanticField::JobTitle, &e.role);
            push(SemanticField::JobDescription, &e.description);
            push(SemanticField::StartDate, &e.start_date);
            if e.is_current {
                entry.push((SemanticField::IsCurrent, "Yes".to_string()));
            } else {
                push(SemanticField::EndDate, &e.end_date);
            }
            entry
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}
