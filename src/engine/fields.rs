//! Semantic field definitions and the alias dictionary.
//!
//! A [`SemanticField`] is a named logical profile attribute (email, city,
//! willingness to relocate, …) independent of any page's concrete markup.
//! Each field owns a fixed set of lowercase alias tokens used to recognise
//! it in arbitrary markup, and a [`ValueKind`] tag describing the value it
//! carries. The dictionary is immutable and defined once per deployment.
//!
//! Alias tokens are written in their natural `snake_case` form here and are
//! squashed (separators stripped) at match time, so they compare equal to
//! `camelCase`, `kebab-case`, and spaced variants in page attributes.

use crate::engine::normalize::squash;
use serde::{Deserialize, Serialize};

/// The kind of value a semantic field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Free text.
    Text,
    /// Email address (must contain `@`).
    Email,
    /// Absolute URL.
    Url,
    /// Parseable number.
    Numeric,
    /// Calendar date, normalised to `YYYY-MM-DD`.
    Date,
    /// Boolean, resolved against yes/no style controls.
    Boolean,
    /// One of an enumerated set of choices (selects, radio groups).
    Choice,
}

/// A named logical profile attribute with a fixed alias set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticField {
    // Identity
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    PhoneCountryCode,
    Pronouns,
    // Demographics
    Gender,
    Ethnicity,
    Race,
    DisabilityStatus,
    VeteranStatus,
    // Address
    Street,
    Address,
    City,
    State,
    Country,
    ZipCode,
    // Social links
    Portfolio,
    Linkedin,
    Github,
    Twitter,
    OtherSocialLink,
    ResumeUrl,
    // Work authorization
    UsAuthorized,
    SponsorshipRequired,
    CitizenshipStatus,
    Nationality,
    // Job preferences
    JobType,
    PreferredLocations,
    CurrentCtc,
    ExpectedCtc,
    WillingToRelocate,
    NoticePeriodAvailable,
    NoticePeriodDays,
    TotalExperienceYears,
    // Skills
    Skills,
    // Experience entry
    Company,
    JobTitle,
    JobDescription,
    StartDate,
    EndDate,
    IsCurrent,
    // Education entry
    School,
    Degree,
    FieldOfStudy,
    EducationEndDate,
    Gpa,
    // Free-text aggregates
    Achievements,
    Certifications,
    Languages,
    Publications,
    Projects,
}

impl SemanticField {
    /// The semantic name used in logs and reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::PhoneCountryCode => "phoneCountryCode",
            Self::Pronouns => "pronouns",
            Self::Gender => "gender",
            Self::Ethnicity => "ethnicity",
            Self::Race => "race",
            Self::DisabilityStatus => "disabilityStatus",
            Self::VeteranStatus => "veteranStatus",
            Self::Street => "street",
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::Country => "country",
            Self::ZipCode => "zipCode",
            Self::Portfolio => "portfolio",
            Self::Linkedin => "linkedin",
            Self::Github => "github",
            Self::Twitter => "twitter",
            Self::OtherSocialLink => "otherSocialLink",
            Self::ResumeUrl => "resumeUrl",
            Self::UsAuthorized => "usAuthorized",
            Self::SponsorshipRequired => "sponsorshipRequired",
            Self::CitizenshipStatus => "citizenshipStatus",
            Self::Nationality => "nationality",
            Self::JobType => "jobType",
            Self::PreferredLocations => "preferredLocations",
            Self::CurrentCtc => "currentCTC",
            Self::ExpectedCtc => "expectedCTC",
            Self::WillingToRelocate => "willingToRelocate",
            Self::NoticePeriodAvailable => "noticePeriodAvailable",
            Self::NoticePeriodDays => "noticePeriodDays",
            Self::TotalExperienceYears => "totalExperienceYears",
            Self::Skills => "skills",
            Self::Company => "company",
            Self::JobTitle => "jobTitle",
            Self::JobDescription => "jobDescription",
            Self::StartDate => "startDate",
            Self::EndDate => "endDate",
            Self::IsCurrent => "isCurrent",
            Self::School => "school",
            Self::Degree => "degree",
            Self::FieldOfStudy => "fieldOfStudy",
            Self::EducationEndDate => "educationEndDate",
            Self::Gpa => "gpa",
            Self::Achievements => "achievements",
            Self::Certifications => "certifications",
            Self::Languages => "languages",
            Self::Publications => "publications",
            Self::Projects => "projects",
        }
    }

    /// The fixed alias set used to recognise this field in markup.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::FullName => &[
                "name",
                "fullname",
                "full_name",
                "candidate_name",
                "applicant_name",
                "your_name",
            ],
            Self::FirstName => &[
                "firstname",
                "first_name",
                "fname",
                "givenname",
                "given_name",
                "first",
            ],
            Self::LastName => &[
                "lastname",
                "last_name",
                "lname",
                "surname",
                "familyname",
                "family_name",
                "last",
            ],
            Self::Email => &[
                "email",
                "emailaddress",
                "email_address",
                "user_email",
                "contact_email",
                "mail",
                "primary_email",
                "e-mail",
                "e_mail",
            ],
            Self::Phone => &[
                "phone",
                "phone_number",
                "mobile",
                "mobile_number",
                "contact_number",
                "telephone",
                "whatsapp",
            ],
            Self::PhoneCountryCode => &[
                "country_code",
                "phonecountrycode",
                "phone_country_code",
                "isd_code",
                "dial_code",
            ],
            Self::Pronouns => &["pronouns", "preferred_pronouns", "gender_pronouns"],
            Self::Gender => &["gender", "sex", "gender_identity"],
            Self::Ethnicity => &["ethnicity", "ethnic_origin", "ethnic_identity"],
            Self::Race => &["race", "racial_identity"],
            Self::DisabilityStatus => &["disability", "disability_status", "have_disability"],
            Self::VeteranStatus => &["veteran", "veteran_status", "military_status"],
            Self::Street => &[
                "street",
                "street_address",
                "address_line_1",
                "address1",
                "address_line1",
                "line1",
            ],
            Self::Address => &[
                "address",
                "home_address",
                "present_address",
                "permanent_address",
                "addressline",
                "streetaddress",
            ],
            Self::City => &["city", "town", "location", "current_city", "municipality"],
            Self::State => &["state", "province", "region", "state_region"],
            Self::Country => &["country", "nation", "country_name", "country_of_residence"],
            Self::ZipCode => &[
                "zip",
                "zipcode",
                "zip_code",
                "postal",
                "postal_code",
                "postcode",
                "pin",
                "pincode",
                "pin_code",
            ],
            Self::Portfolio => &[
                "portfolio",
                "portfolio_url",
                "portfolio_link",
                "website",
                "personal_website",
            ],
            Self::Linkedin => &[
                "linkedin",
                "linkedin_url",
                "linkedin_profile",
                "linkedin_link",
                "linkedinprofile",
            ],
            Self::Github => &[
                "github",
                "github_url",
                "github_profile",
                "github_username",
                "githublink",
                "git_hub",
                "huggingface",
            ],
            Self::Twitter => &["twitter", "x", "twitter_url", "twitter_handle"],
            Self::OtherSocialLink => &[
                "other",
                "other_link",
                "other_social",
                "other_profile",
                "profile_link",
                "additional_link",
                "social",
                "medium",
                "blog",
            ],
            Self::ResumeUrl => &[
                "resume",
                "cv",
                "resume_url",
                "cv_url",
                "resume_link",
                "upload_resume",
                "upload_cv",
            ],
            Self::UsAuthorized => &[
                "us_authorized",
                "us_work_permit",
                "authorized_to_work_us",
                "work_authorization_us",
                "work_auth_us",
            ],
            Self::SponsorshipRequired => &[
                "sponsorship_required",
                "need_visa_sponsorship",
                "require_work_visa",
                "requires_sponsorship",
                "need_sponsorship",
            ],
            Self::CitizenshipStatus => &[
                "citizenship_status",
                "work_status",
                "immigration_status",
                "visa_status",
                "work_authorization_status",
            ],
            Self::Nationality => &[
                "nationality",
                "citizenship",
                "country_of_citizenship",
                "citizenship_country",
            ],
            Self::JobType => &[
                "jobtype",
                "job_type",
                "employment_type",
                "work_type",
                "work_mode",
                "workmode",
                "remote_onsite_hybrid",
            ],
            Self::PreferredLocations => &[
                "preferred_locations",
                "preferred_location",
                "job_locations",
                "desired_locations",
                "location_preferences",
                "location_preference",
            ],
            Self::CurrentCtc => &[
                "current_ctc",
                "current_salary",
                "ctc",
                "current_compensation",
                "present_ctc",
                "current_pay",
                "salary_now",
            ],
            Self::ExpectedCtc => &[
                "expected_ctc",
                "expected_salary",
                "expected_compensation",
                "salary_expectation",
                "salary_expectations",
                "desired_salary",
            ],
            Self::WillingToRelocate => &[
                "willing_to_relocate",
                "open_to_relocation",
                "relocate",
                "relocation",
            ],
            Self::NoticePeriodAvailable => &[
                "notice_period",
                "serving_notice_period",
                "notice_period_required",
                "immediate_joiner",
                "available_now",
                "notice_available",
            ],
            Self::NoticePeriodDays => &[
                "notice_period_days",
                "notice_period_length",
                "notice_days",
                "noticeperiod",
                "notice_in_days",
                "days_notice_required",
            ],
            Self::TotalExperienceYears => &[
                "total_experience",
                "total_experience_years",
                "years_experience",
                "years_of_experience",
                "work_experience_years",
                "yoe",
            ],
            Self::Skills => &[
                "skills",
                "technical_skills",
                "key_skills",
                "skillset",
                "expertise",
                "competencies",
            ],
            Self::Company => &["company", "current_company", "employer", "current_employer"],
            Self::JobTitle => &[
                "job_title",
                "current_title",
                "position",
                "current_position",
            ],
            Self::JobDescription => &[
                "job_description",
                "role_description",
                "responsibilities",
            ],
            Self::StartDate => &["start_date", "employment_start_date", "joining_date"],
            Self::EndDate => &["end_date", "employment_end_date", "to_date", "until"],
            Self::IsCurrent => &[
                "current_job",
                "currently_employed_here",
                "is_current_position",
            ],
            Self::School => &["school", "university", "college", "institution"],
            Self::Degree => &["degree", "qualification", "education_level"],
            Self::FieldOfStudy => &[
                "field_of_study",
                "major",
                "specialization",
                "discipline",
            ],
            Self::EducationEndDate => &[
                "graduation_date",
                "education_end_date",
                "date_completed",
            ],
            Self::Gpa => &["gpa", "grade", "score", "cgpa"],
            Self::Achievements => &["achievements", "awards", "accomplishments", "honors"],
            Self::Certifications => &["certifications", "licenses", "certificates"],
            Self::Languages => &["languages", "language_proficiency", "spoken_languages"],
            Self::Publications => &["publications", "papers", "research_papers"],
            Self::Projects => &["projects", "project_experience", "project_work"],
        }
    }

    /// The kind of value this field carries.
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::Email => ValueKind::Email,
            Self::Portfolio
            | Self::Linkedin
            | Self::Github
            | Self::Twitter
            | Self::OtherSocialLink
            | Self::ResumeUrl => ValueKind::Url,
            Self::CurrentCtc
            | Self::ExpectedCtc
            | Self::NoticePeriodDays
            | Self::TotalExperienceYears
            | Self::Gpa => ValueKind::Numeric,
            Self::StartDate | Self::EndDate | Self::EducationEndDate => ValueKind::Date,
            Self::UsAuthorized
            | Self::SponsorshipRequired
            | Self::WillingToRelocate
            | Self::NoticePeriodAvailable
            | Self::IsCurrent => ValueKind::Boolean,
            Self::Gender
            | Self::Ethnicity
            | Self::Race
            | Self::DisabilityStatus
            | Self::VeteranStatus
            | Self::CitizenshipStatus
            | Self::Country
            | Self::State
            | Self::JobType
            | Self::Degree => ValueKind::Choice,
            _ => ValueKind::Text,
        }
    }

    /// Squashed alias tokens, ready for substring matching against a
    /// squashed attribute blob.
    pub fn squashed_aliases(self) -> Vec<String> {
        self.aliases().iter().map(|a| squash(a)).collect()
    }
}

impl std::fmt::Display for SemanticField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_matching_is_separator_insensitive() {
        // "First Name", "first_name", "firstname" all resolve to FirstName.
        let keys = SemanticField::FirstName.squashed_aliases();
        for variant in ["First Name", "first_name", "firstname"] {
            let squashed = squash(variant);
            assert!(
                keys.iter().any(|k| squashed.contains(k.as_str())),
                "{variant} should match FirstName aliases"
            );
        }
    }

    #[test]
    fn test_aliases_squash_clean() {
        // After squashing, no alias retains separators.
        let fields = [
            SemanticField::Email,
            SemanticField::ZipCode,
            SemanticField::NoticePeriodDays,
        ];
        for f in fields {
            for a in f.squashed_aliases() {
                assert!(!a.contains('_') && !a.contains('-') && !a.contains(' '));
            }
        }
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(SemanticField::Email.value_kind(), ValueKind::Email);
        assert_eq!(SemanticField::Linkedin.value_kind(), ValueKind::Url);
        assert_eq!(SemanticField::StartDate.value_kind(), ValueKind::Date);
        assert_eq!(
            SemanticField::WillingToRelocate.value_kind(),
            ValueKind::Boolean
        );
        assert_eq!(SemanticField::Gender.value_kind(), ValueKind::Choice);
        assert_eq!(SemanticField::City.value_kind(), ValueKind::Text);
    }

    #[test]
    fn test_display_uses_semantic_name() {
        assert_eq!(SemanticField::CurrentCtc.to_string(), "currentCTC");
        assert_eq!(SemanticField::ZipCode.to_string(), "zipCode");
    }
}
