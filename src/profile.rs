//! Candidate profile model and the shape adapter.
//!
//! The engine consumes one [`ProfileRecord`] shape. Two historical wire
//! shapes are accepted and normalised by [`ProfileRecord::from_value`]:
//!
//! - the **flat** shape: fields at the top level, entry lists for
//!   experience/education/etc.;
//! - the **legacy nested** shape: grouped under
//!   `details.{personalInfo, contactInfo, workAuthorization, careerSummary,
//!   jobPreferences}`.
//!
//! The engine only reads the record; list sections are serialised into
//! delimited text blocks here so the pipeline stays declarative.

use crate::engine::normalize::{normalize_ctc, to_date_input};
use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Accept strings, numbers, and booleans where a string is expected.
fn flex_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// Accept either a list of strings or a single delimited string.
fn flex_string_list<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|i| match i {
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect(),
        Some(_) => Vec::new(),
    })
}

/// One work-experience entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub company: Option<String>,
    #[serde(alias = "title")]
    pub role: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_current: bool,
}

/// One education entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field_of_study: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(alias = "gpa", deserialize_with = "flex_string")]
    pub grade: Option<String>,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Certification {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub issue_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageSkill {
    pub language: Option<String>,
    pub proficiency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Publication {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(deserialize_with = "flex_string_list")]
    pub technologies: Vec<String>,
    pub github_link: Option<String>,
}

/// The normalised candidate profile the engine fills from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileRecord {
    // Identity
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "flex_string")]
    pub phone: Option<String>,
    pub phone_country_code: Option<String>,
    pub pronouns: Option<String>,
    // Demographics
    pub gender: Option<String>,
    pub ethnicity: Option<String>,
    pub race: Option<String>,
    pub disability_status: Option<String>,
    pub veteran_status: Option<String>,
    // Address
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    #[serde(deserialize_with = "flex_string")]
    pub zip_code: Option<String>,
    // Social links
    pub portfolio: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    #[serde(alias = "other")]
    pub other_social_link: Option<String>,
    pub resume_url: Option<String>,
    // Work authorization
    pub us_authorized: Option<bool>,
    pub sponsorship_required: Option<bool>,
    pub citizenship_status: Option<String>,
    pub nationality: Option<String>,
    // Job preferences
    pub job_type: Option<String>,
    #[serde(deserialize_with = "flex_string_list")]
    pub preferred_locations: Vec<String>,
    #[serde(rename = "currentCTC", deserialize_with = "flex_string")]
    pub current_ctc: Option<String>,
    #[serde(rename = "expectedCTC", deserialize_with = "flex_string")]
    pub expected_ctc: Option<String>,
    pub willing_to_relocate: Option<bool>,
    pub notice_period_available: Option<bool>,
    pub notice_period_duration_in_days: Option<i64>,
    pub total_experience_in_years: Option<f64>,
    // Skills
    #[serde(deserialize_with = "flex_string_list")]
    pub skills: Vec<String>,
    // Multi-entry sections
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    // Aggregates
    #[serde(deserialize_with = "flex_string_list")]
    pub achievements: Vec<String>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<LanguageSkill>,
    pub publications: Vec<Publication>,
    pub projects: Vec<Project>,
}

impl ProfileRecord {
    /// Normalise either accepted wire shape into a `ProfileRecord`.
    ///
    /// The legacy shape is detected by the presence of a `details` object;
    /// anything else is parsed as the flat shape.
    pub fn from_value(value: &Value) -> Result<Self> {
        if value.get("details").is_some() {
            Ok(Self::from_legacy(value))
        } else {
            Ok(serde_json::from_value(value.clone())?)
        }
    }

    fn from_legacy(value: &Value) -> Self {
        let details = &value["details"];
        let personal = &details["personalInfo"];
        let demographics = &personal["demographics"];
        let contact = &details["contactInfo"];
        let addr = &contact["presentAddress"];
        let socials = &contact["socials"];
        let work_auth = &details["workAuthorization"];
        let career = &details["careerSummary"];
        let job_pref = &details["jobPreferences"];
        let notice = &job_pref["noticePeriod"];

        let s = |v: &Value| v.as_str().map(str::to_string);
        let list = |v: &Value| -> Vec<String> {
            match v {
                Value::Array(items) => items
                    .iter()
                    .filter_map(|i| i.as_str().map(str::to_string))
                    .collect(),
                Value::String(joined) => joined
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
                _ => Vec::new(),
            }
        };
        let entries = |v: &Value| -> Vec<ExperienceEntry> {
            serde_json::from_value(v.clone()).unwrap_or_default()
        };

        Self {
            first_name: s(&personal["firstName"]),
            last_name: s(&personal["lastName"]),
            pronouns: s(&personal["pronouns"]),
            gender: s(&demographics["gender"]),
            ethnicity: s(&demographics["ethnicity"]),
            race: s(&demographics["race"]),
            disability_status: s(&demographics["disabilityStatus"]),
            veteran_status: s(&demographics["veteranStatus"]),
            email: s(&contact["email"]),
            phone_country_code: s(&contact["phoneCountryCode"]).or(Some("+91".to_string())),
            phone: s(&contact["phone"]),
            street: s(&addr["street"]),
            city: s(&addr["city"]),
            state: s(&addr["state"]),
            country: s(&addr["country"]),
            zip_code: s(&addr["zipCode"]),
            linkedin: s(&socials["linkedin"]),
            github: s(&socials["github"]),
            portfolio: s(&socials["portfolio"]),
            twitter: s(&socials["twitter"]),
            other_social_link: s(&socials["other"]),
            resume_url: s(&value["resumeUrl"]),
            nationality: s(&work_auth["nationality"]),
            us_authorized: work_auth["usAuthorized"].as_bool(),
            sponsorship_required: work_auth["sponsorshipRequired"].as_bool(),
            citizenship_status: s(&work_auth["citizenshipStatus"]),
            total_experience_in_years: career["totalExperienceInYears"].as_f64(),
            skills: list(&career["skills"]),
            experience: entries(&career["experience"]),
            education: serde_json::from_value(career["education"].clone()).unwrap_or_default(),
            job_type: s(&job_pref["jobType"]),
            preferred_locations: list(&job_pref["preferredLocations"]),
            current_ctc: s(&job_pref["currentCTC"]),
            expected_ctc: s(&job_pref["expectedCTC"]),
            willing_to_relocate: job_pref["willingToRelocate"].as_bool(),
            notice_period_available: notice["available"].as_bool(),
            notice_period_duration_in_days: notice["durationInDays"].as_i64(),
            ..Default::default()
        }
    }

    /// "First Last", skipping missing parts.
    pub fn full_name(&self) -> Option<String> {
        let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let joined = joined.trim().to_string();
        (!joined.is_empty()).then_some(joined)
    }

    /// Phone with country code prefixed when both are present.
    pub fn phone_full(&self) -> Option<String> {
        match (&self.phone_country_code, &self.phone) {
            (Some(code), Some(num)) => Some(format!("{code}{num}")),
            (None, Some(num)) => Some(num.clone()),
            _ => None,
        }
    }

    /// "street, city, state, country" from available parts.
    pub fn address_line(&self) -> Option<String> {
        self.street.as_deref()?;
        let joined = [
            self.street.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");
        (!joined.is_empty()).then_some(joined)
    }

    pub fn skills_csv(&self) -> Option<String> {
        (!self.skills.is_empty()).then(|| self.skills.join(", "))
    }

    pub fn preferred_locations_csv(&self) -> Option<String> {
        (!self.preferred_locations.is_empty()).then(|| self.preferred_locations.join(", "))
    }

    /// Current CTC scaled to a plain amount (lpa/lakh/k notation resolved).
    pub fn current_ctc_normalized(&self) -> Option<i64> {
        self.current_ctc.as_deref().and_then(normalize_ctc)
    }

    /// Expected CTC scaled to a plain amount.
    pub fn expected_ctc_normalized(&self) -> Option<i64> {
        self.expected_ctc.as_deref().and_then(normalize_ctc)
    }

    /// Total experience in days across all entries; `is_current` entries
    /// run until today. Invalid date ranges contribute nothing.
    pub fn total_experience_days(&self) -> i64 {
        let today = Utc::now().date_naive();
        let parse = |s: &Option<String>| -> Option<NaiveDate> {
            s.as_deref()
                .and_then(to_date_input)
                .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
        };
        self.experience
            .iter()
            .filter_map(|e| {
                let start = parse(&e.start_date)?;
                let end = if e.is_current {
                    today
                } else {
                    parse(&e.end_date)?
                };
                Some((end - start).num_days().max(0))
            })
            .sum()
    }

    /// Achievements joined with bullet separators.
    pub fn achievements_text(&self) -> Option<String> {
        (!self.achievements.is_empty()).then(|| self.achievements.join("\n• "))
    }

    /// `"<name> - <issuer> (<year>)"` per certification, bullet-joined.
    pub fn certifications_text(&self) -> Option<String> {
        if self.certifications.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .certifications
            .iter()
            .map(|c| {
                let mut line = format!(
                    "{} - {}",
                    c.name.as_deref().unwrap_or(""),
                    c.issuer.as_deref().unwrap_or("")
                );
                if let Some(year) = c
                    .issue_date
                    .as_deref()
                    .and_then(to_date_input)
                    .and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok())
                    .map(|d| d.year())
                {
                    line.push_str(&format!(" ({year})"));
                }
                line
            })
            .collect();
        Some(lines.join("\n• "))
    }

    /// `"<language> (<proficiency>)"` comma-joined.
    pub fn languages_text(&self) -> Option<String> {
        if self.languages.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .languages
            .iter()
            .map(|l| {
                let lang = l.language.as_deref().unwrap_or("");
                match l.proficiency.as_deref() {
                    Some(p) if !p.is_empty() => format!("{lang} ({p})"),
                    _ => lang.to_string(),
                }
            })
            .collect();
        Some(parts.join(", "))
    }

    /// `"<title>: <link>"` with optional ` - <description>`, bullet-joined.
    pub fn publications_text(&self) -> Option<String> {
        if self.publications.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .publications
            .iter()
            .map(|p| {
                let mut line = p.title.clone().unwrap_or_default();
                if let Some(link) = p.link.as_deref() {
                    line.push_str(&format!(": {link}"));
                }
                if let Some(desc) = p.description.as_deref() {
                    line.push_str(&format!(" - {desc}"));
                }
                line
            })
            .collect();
        Some(lines.join("\n• "))
    }

    /// `"<title>: <description> (<technologies>) - <link>"` per project.
    pub fn projects_text(&self) -> Option<String> {
        if self.projects.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .projects
            .iter()
            .map(|p| {
                let mut line = format!(
                    "{}: {}",
                    p.title.as_deref().unwrap_or("Project"),
                    p.description.as_deref().unwrap_or("")
                );
                if !p.technologies.is_empty() {
                    line.push_str(&format!(" ({})", p.technologies.join(", ")));
                }
                if let Some(link) = p.github_link.as_deref() {
                    line.push_str(&format!(" - {link}"));
                }
                line
            })
            .collect();
        Some(lines.join("\n• "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_sample() -> Value {
        json!({
            "firstName": "Asha",
            "lastName": "Rao",
            "email": "asha@example.com",
            "phone": "9876543210",
            "phoneCountryCode": "+91",
            "city": "Bengaluru",
            "country": "India",
            "zipCode": 560001,
            "skills": ["Rust", "SQL"],
            "currentCTC": "12 lpa",
            "willingToRelocate": true,
            "experience": [
                {"company": "Acme", "role": "Engineer", "startDate": "2020-01-01",
                 "endDate": "2021-01-01"}
            ],
            "education": [
                {"school": "IISc", "degree": "MTech", "grade": 8.9}
            ],
            "languages": [{"language": "Kannada", "proficiency": "Native"}]
        })
    }

    fn legacy_sample() -> Value {
        json!({
            "details": {
                "personalInfo": {
                    "firstName": "Asha",
                    "lastName": "Rao",
                    "demographics": {"gender": "Female"}
                },
                "contactInfo": {
                    "email": "asha@example.com",
                    "phone": "9876543210",
                    "presentAddress": {"city": "Bengaluru", "country": "India"},
                    "socials": {"linkedin": "https://linkedin.com/in/asha"}
                },
                "workAuthorization": {"usAuthorized": false},
                "careerSummary": {
                    "totalExperienceInYears": 4.0,
                    "skills": ["Rust", "SQL"]
                },
                "jobPreferences": {
                    "currentCTC": "12 lpa",
                    "willingToRelocate": true,
                    "noticePeriod": {"available": true, "durationInDays": 30}
                }
            }
        })
    }

    #[test]
    fn test_flat_shape_parses() {
        let p = ProfileRecord::from_value(&flat_sample()).unwrap();
        assert_eq!(p.full_name().as_deref(), Some("Asha Rao"));
        assert_eq!(p.phone_full().as_deref(), Some("+919876543210"));
        assert_eq!(p.zip_code.as_deref(), Some("560001"));
        assert_eq!(p.skills_csv().as_deref(), Some("Rust, SQL"));
        assert_eq!(p.education[0].grade.as_deref(), Some("8.9"));
        assert_eq!(p.languages_text().as_deref(), Some("Kannada (Native)"));
    }

    #[test]
    fn test_legacy_and_flat_shapes_agree() {
        let flat = ProfileRecord::from_value(&flat_sample()).unwrap();
        let legacy = ProfileRecord::from_value(&legacy_sample()).unwrap();
        assert_eq!(flat.first_name, legacy.first_name);
        assert_eq!(flat.email, legacy.email);
        assert_eq!(flat.city, legacy.city);
        assert_eq!(flat.skills, legacy.skills);
        assert_eq!(flat.current_ctc, legacy.current_ctc);
        assert_eq!(flat.willing_to_relocate, legacy.willing_to_relocate);
    }

    #[test]
    fn test_legacy_extras() {
        let p = ProfileRecord::from_value(&legacy_sample()).unwrap();
        assert_eq!(p.gender.as_deref(), Some("Female"));
        assert_eq!(p.us_authorized, Some(false));
        assert_eq!(p.notice_period_available, Some(true));
        assert_eq!(p.notice_period_duration_in_days, Some(30));
        // Legacy records default the dial code.
        assert_eq!(p.phone_full().as_deref(), Some("+919876543210"));
    }

    #[test]
    fn test_ctc_normalization() {
        let p = ProfileRecord::from_value(&flat_sample()).unwrap();
        assert_eq!(p.current_ctc_normalized(), Some(1_200_000));
        assert_eq!(p.expected_ctc_normalized(), None);
    }

    #[test]
    fn test_total_experience_days() {
        let p = ProfileRecord::from_value(&flat_sample()).unwrap();
        assert_eq!(p.total_experience_days(), 366);
    }

    #[test]
    fn test_aggregate_serialization() {
        let v = json!({
            "certifications": [
                {"name": "CKA", "issuer": "CNCF", "issueDate": "2022-06-01"}
            ],
            "projects": [
                {"title": "Indexer", "description": "search backend",
                 "technologies": ["rust", "tantivy"], "githubLink": "https://github.com/x/y"}
            ],
            "publications": [{"title": "Paper", "link": "https://doi.org/1"}],
            "achievements": ["Won hackathon", "Patent filed"]
        });
        let p = ProfileRecord::from_value(&v).unwrap();
        assert_eq!(p.certifications_text().as_deref(), Some("CKA - CNCF (2022)"));
        assert_eq!(
            p.projects_text().as_deref(),
            Some("Indexer: search backend (rust, tantivy) - https://github.com/x/y")
        );
        assert_eq!(p.publications_text().as_deref(), Some("Paper: https://doi.org/1"));
        assert_eq!(
            p.achievements_text().as_deref(),
            Some("Won hackathon\n• Patent filed")
        );
    }

    #[test]
    fn test_string_skills_accepted() {
        let p = ProfileRecord::from_value(&json!({"skills": "Rust, SQL"})).unwrap();
        assert_eq!(p.skills, vec!["Rust", "SQL"]);
    }
}
