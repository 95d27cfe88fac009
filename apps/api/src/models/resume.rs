//! Structured resume as supplied by the resume collaborator.
//! The engine never parses raw file bytes; it only validates this shape.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// None = current position.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub graduation_date: Option<NaiveDate>,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructuredResume {
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

/// Where in the resume a piece of text lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "section", content = "index", rename_all = "snake_case")]
pub enum ResumeLocation {
    Summary,
    Skills,
    Experience(usize),
    Education(usize),
    Projects(usize),
    Certifications,
}

impl StructuredResume {
    /// Rejects resumes that carry nothing to analyze or entries missing their identity fields.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.text_blocks().is_empty() {
            return Err(AppError::Validation(
                "resume has no analyzable content".to_string(),
            ));
        }
        if let Some(i) = self
            .experience
            .iter()
            .position(|e| e.company.trim().is_empty() && e.title.trim().is_empty())
        {
            return Err(AppError::Validation(format!(
                "experience entry {i} has neither company nor title"
            )));
        }
        if let Some(i) = self
            .education
            .iter()
            .position(|e| e.institution.trim().is_empty())
        {
            return Err(AppError::Validation(format!(
                "education entry {i} is missing an institution"
            )));
        }
        if let Some(i) = self.projects.iter().position(|p| p.name.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "project entry {i} is missing a name"
            )));
        }
        Ok(())
    }

    /// Every searchable text block, in resume order. Empty blocks are skipped.
    pub fn text_blocks(&self) -> Vec<(ResumeLocation, String)> {
        let mut blocks = Vec::new();

        if let Some(summary) = self.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            blocks.push((ResumeLocation::Summary, summary.to_string()));
        }
        if !self.skills.is_empty() {
            blocks.push((ResumeLocation::Skills, self.skills.join(", ")));
        }
        for (i, e) in self.experience.iter().enumerate() {
            let text = format!("{} {}\n{}", e.title, e.company, e.bullets.join("\n"));
            blocks.push((ResumeLocation::Experience(i), text));
        }
        for (i, e) in self.education.iter().enumerate() {
            let text = format!(
                "{} {} {}\n{}",
                e.degree,
                e.field.as_deref().unwrap_or_default(),
                e.institution,
                e.details.join("\n")
            );
            blocks.push((ResumeLocation::Education(i), text));
        }
        for (i, p) in self.projects.iter().enumerate() {
            let text = format!(
                "{} {}\n{}\n{}",
                p.name,
                p.description.as_deref().unwrap_or_default(),
                p.technologies.join(", "),
                p.bullets.join("\n")
            );
            blocks.push((ResumeLocation::Projects(i), text));
        }
        if !self.certifications.is_empty() {
            blocks.push((ResumeLocation::Certifications, self.certifications.join(", ")));
        }

        blocks
    }

    /// Experience and project bullets: the content the quality checks look at.
    pub fn achievement_bullets(&self) -> Vec<&str> {
        self.experience
            .iter()
            .flat_map(|e| e.bullets.iter())
            .chain(self.projects.iter().flat_map(|p| p.bullets.iter()))
            .map(String::as_str)
            .filter(|b| !b.trim().is_empty())
            .collect()
    }

    /// Years covered by dated experience, with overlapping positions counted once.
    /// None when no entry carries a start date.
    pub fn experience_years(&self, today: NaiveDate) -> Option<f64> {
        let mut spans: Vec<(NaiveDate, NaiveDate)> = self
            .experience
            .iter()
            .filter_map(|e| {
                let start = e.start_date?;
                let end = e.end_date.unwrap_or(today).max(start);
                Some((start, end))
            })
            .collect();

        if spans.is_empty() {
            return None;
        }
        spans.sort();

        let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::with_capacity(spans.len());
        for (start, end) in spans {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        let months: i32 = merged
            .iter()
            .map(|&(start, end)| months_between(start, end))
            .sum();
        Some(months as f64 / 12.0)
    }
}

fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    months.max(0)
}


#[cfg(test)]
mod tests {
    use super::fixtures::backend_resume;
    use super::*;

    #[test]
    fn test_text_blocks_cover_each_populated_section() {
        let blocks = backend_resume().text_blocks();
        let locations: Vec<_> = blocks.iter().map(|(l, _)| *l).collect();
        assert!(locations.contains(&ResumeLocation::Summary));
        assert!(locations.contains(&ResumeLocation::Skills));
        assert!(locations.contains(&ResumeLocation::Experience(0)));
        assert!(locations.contains(&ResumeLocation::Education(0)));
        assert!(!locations.contains(&ResumeLocation::Certifications));
    }

    #[test]
    fn test_empty_resume_fails_validation() {
        let err = StructuredResume::default().validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_project_without_name_fails_validation() {
        let mut resume = backend_resume();
        resume.projects.push(ProjectEntry {
            name: "  ".to_string(),
            description: None,
            technologies: vec![],
            bullets: vec![],
        });
        assert!(resume.validate().is_err());
    }

    #[test]
    fn test_experience_years_sums_dated_entries() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let years = backend_resume().experience_years(today).unwrap();
        assert!((years - 5.0).abs() < 1e-9, "got {years}");
    }

    #[test]
    fn test_overlapping_positions_count_once() {
        let mut resume = backend_resume();
        // 2021-2023 sits inside 2019-03..2024-03; 2024-2025 overlaps its tail: 70 months in all
        for (start, end) in [((2021, 1), (2023, 1)), ((2024, 1), (2025, 1))] {
            let mut job = resume.experience[0].clone();
            job.start_date = NaiveDate::from_ymd_opt(start.0, start.1, 1);
            job.end_date = NaiveDate::from_ymd_opt(end.0, end.1, 1);
            resume.experience.push(job);
        }
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let years = resume.experience_years(today).unwrap();
        assert!((years - 5.833333).abs() < 1e-3, "got {years}");
    }

    #[test]
    fn test_experience_years_none_without_dates() {
        let mut resume = backend_resume();
        resume.experience[0].start_date = None;
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert!(resume.experience_years(today).is_none());
    }

    #[test]
    fn test_resume_location_serde_shape() {
        let json = serde_json::to_value(ResumeLocation::Experience(2)).unwrap();
        assert_eq!(json["section"], "experience");
        assert_eq!(json["index"], 2);
    }
}
