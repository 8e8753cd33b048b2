//! # Profiles
//!
//! Each identity owns at most one profile, created lazily by its first save.
//!
//! | Role | Served model | Draft | Extra sub-collections |
//! |------|--------------|-------|-----------------------|
//! | employer | [`EmployerProfile`] | [`EmployerProfileDraft`] | none |
//! | candidate | [`CandidateProfile`] | [`CandidateProfileDraft`] | [`Education`], [`Experience`] |
//!
//! Profile saves are multipart (they may carry an image and a resume); the
//! education and experience entries are JSON. Links are optional but must be
//! absolute http(s) URLs when given. A `None` end date means "current".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::{FieldErrors, Upload, Validate};
use crate::transport::Multipart;

fn check_link(errors: &mut FieldErrors, field: &str, value: &str) {
    let value = value.trim();
    if !value.is_empty() && !(value.starts_with("http://") || value.starts_with("https://")) {
        errors.insert(field, "Please enter a valid URL");
    }
}

fn check_image(errors: &mut FieldErrors, field: &str, upload: Option<&Upload>) {
    if upload.is_some_and(|u| !u.is_image()) {
        errors.insert(field, "Please upload a valid image file");
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub about_company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub website_link: String,
    #[serde(default)]
    pub linkedin_link: String,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmployerProfileDraft {
    pub company_name: String,
    pub description: String,
    pub about_company: String,
    pub location: String,
    pub website_link: String,
    pub linkedin_link: String,
    pub logo: Option<Upload>,
}

impl From<&EmployerProfile> for EmployerProfileDraft {
    fn from(profile: &EmployerProfile) -> Self {
        Self {
            company_name: profile.company_name.clone(),
            description: profile.description.clone(),
            about_company: profile.about_company.clone(),
            location: profile.location.clone(),
            website_link: profile.website_link.clone(),
            linkedin_link: profile.linkedin_link.clone(),
            logo: None,
        }
    }
}

impl Validate for EmployerProfileDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("company_name", &self.company_name, "Company name is required");
        check_link(&mut errors, "website_link", &self.website_link);
        check_link(&mut errors, "linkedin_link", &self.linkedin_link);
        check_image(&mut errors, "logo", self.logo.as_ref());
        errors.into_result()
    }
}

impl EmployerProfileDraft {
    pub fn to_multipart(&self) -> Multipart {
        Multipart::new()
            .text("company_name", self.company_name.clone())
            .text("description", self.description.clone())
            .text("about_company", self.about_company.clone())
            .text("location", self.location.clone())
            .text("website_link", self.website_link.clone())
            .text("linkedin_link", self.linkedin_link.clone())
            .file_opt("logo", self.logo.as_ref())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub portfolio_link: String,
    #[serde(default)]
    pub linkedin_link: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub resume: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub id: Option<i64>,
    pub institution: String,
    pub degree: String,
    pub start_year: i32,
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl Education {
    pub fn is_current(&self) -> bool {
        self.end_year.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub id: Option<i64>,
    pub company_name: String,
    pub role: String,
    #[serde(default)]
    pub role_description: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_current: bool,
}

/// Education entry as typed into the form. Years stay text until submit.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EducationDraft {
    pub institution: String,
    pub degree: String,
    pub start_year: String,
    pub end_year: String,
    pub is_current: bool,
}

fn parse_year(value: &str) -> Option<i32> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (1900..=2100).contains(y))
}

impl EducationDraft {
    fn check(&self, errors: &mut FieldErrors) {
        errors.require("institution", &self.institution, "Institution is required");
        errors.require("degree", &self.degree, "Degree is required");
        if parse_year(&self.start_year).is_none() {
            errors.insert("start_year", "Enter a valid year");
        }
        if !self.is_current && parse_year(&self.end_year).is_none() {
            errors.insert("end_year", "Enter a valid year");
        }
    }

    /// JSON body of `POST /auth/candidate/education/`, or `None` when the
    /// draft does not validate. `end_year` is null for a current entry.
    pub fn to_entry(&self) -> Option<Education> {
        Some(Education {
            id: None,
            institution: self.institution.trim().to_string(),
            degree: self.degree.trim().to_string(),
            start_year: parse_year(&self.start_year)?,
            end_year: if self.is_current {
                None
            } else {
                Some(parse_year(&self.end_year)?)
            },
        })
    }
}

/// Experience entry as typed into the form. Dates are `YYYY-MM-DD` text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExperienceDraft {
    pub company_name: String,
    pub role: String,
    pub role_description: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

impl ExperienceDraft {
    fn check(&self, errors: &mut FieldErrors) {
        errors.require("experience_company", &self.company_name, "Company is required");
        errors.require("experience_role", &self.role, "Role is required");
        if parse_date(&self.start_date).is_none() {
            errors.insert("experience_start", "Enter a valid date");
        }
        if !self.is_current && parse_date(&self.end_date).is_none() {
            errors.insert("experience_end", "Enter a valid date");
        }
    }

    /// JSON body of `POST /auth/candidate/experience/`. `end_date` is null
    /// for a current position.
    pub fn to_entry(&self) -> Option<Experience> {
        Some(Experience {
            id: None,
            company_name: self.company_name.trim().to_string(),
            role: self.role.trim().to_string(),
            role_description: self.role_description.trim().to_string(),
            start_date: parse_date(&self.start_date)?,
            end_date: if self.is_current {
                None
            } else {
                Some(parse_date(&self.end_date)?)
            },
            is_current: self.is_current,
        })
    }
}

/// The candidate profile form: profile fields plus one education entry and
/// an optional experience entry, saved in that order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateProfileDraft {
    pub full_name: String,
    pub bio: String,
    pub portfolio_link: String,
    pub linkedin_link: String,
    pub skills: Vec<String>,
    pub profile_image: Option<Upload>,
    pub resume: Option<Upload>,
    pub education: EducationDraft,
    pub experience: Option<ExperienceDraft>,
}

impl From<&CandidateProfile> for CandidateProfileDraft {
    fn from(profile: &CandidateProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            bio: profile.bio.clone(),
            portfolio_link: profile.portfolio_link.clone(),
            linkedin_link: profile.linkedin_link.clone(),
            skills: profile.skills.iter().map(|s| s.name.clone()).collect(),
            ..Self::default()
        }
    }
}

impl CandidateProfileDraft {
    /// Add a trimmed, non-empty skill once. Returns whether it was added.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill)) {
            return false;
        }
        self.skills.push(skill.to_string());
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|s| s != skill);
    }

    pub fn to_multipart(&self) -> Multipart {
        let mut form = Multipart::new()
            .text("full_name", self.full_name.clone())
            .text("bio", self.bio.clone())
            .text("portfolio_link", self.portfolio_link.clone())
            .text("linkedin_link", self.linkedin_link.clone());
        for skill in &self.skills {
            form = form.text("skills", skill.clone());
        }
        form.file_opt("profile_image", self.profile_image.as_ref())
            .file_opt("resume", self.resume.as_ref())
    }
}

impl Validate for CandidateProfileDraft {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("full_name", &self.full_name, "Full name is required");
        check_link(&mut errors, "portfolio_link", &self.portfolio_link);
        check_link(&mut errors, "linkedin_link", &self.linkedin_link);
        check_image(&mut errors, "profile_image", self.profile_image.as_ref());
        if self.resume.as_ref().is_some_and(|r| !r.is_pdf()) {
            errors.insert("resume", "Only PDF files are allowed");
        }
        self.education.check(&mut errors);
        if let Some(experience) = &self.experience {
            experience.check(&mut errors);
        }
        errors.into_result()
    }
}
