//! The screening application aggregate.

use crate::sections::{Section, SectionKind, SectionStatus};
use crate::{PetsError, PetsResult};
use chrono::{DateTime, Utc};
use pets_uuid::ApplicationId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One applicant's screening, with a state record per section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Application {
    pub id: ApplicationId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    sections: BTreeMap<SectionKind, Section>,
}

impl Application {
    /// A new application with every section not yet started.
    pub fn new(id: ApplicationId, created_at: DateTime<Utc>) -> Self {
        let sections = SectionKind::ALL
            .into_iter()
            .map(|kind| (kind, Section::default()))
            .collect();
        Self {
            id,
            created_at,
            sections,
        }
    }

    /// Stored state for `kind`. Missing sections read as not yet started.
    pub fn section(&self, kind: SectionKind) -> Section {
        self.sections.get(&kind).cloned().unwrap_or_default()
    }

    pub fn section_ref(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.get(&kind)
    }

    pub fn status(&self, kind: SectionKind) -> SectionStatus {
        self.sections
            .get(&kind)
            .map(|section| section.status)
            .unwrap_or_default()
    }

    /// Trimmed text answer from a section, if the field is filled in.
    pub fn text(&self, kind: SectionKind, key: &str) -> Option<&str> {
        self.sections.get(&kind).and_then(|section| section.text(key))
    }

    pub fn set_section(&mut self, kind: SectionKind, section: Section) {
        self.sections.insert(kind, section);
    }

    pub fn set_status(&mut self, kind: SectionKind, status: SectionStatus) {
        self.sections.entry(kind).or_default().status = status;
    }

    /// Parses an application from its YAML file contents.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::YamlDeserialization` if the YAML is malformed or has
    /// unknown keys.
    pub fn from_yaml(yaml: &str) -> PetsResult<Self> {
        serde_yaml::from_str(yaml).map_err(PetsError::YamlDeserialization)
    }

    /// Renders the application as YAML.
    ///
    /// # Errors
    ///
    /// Returns `PetsError::YamlSerialization` if serialisation fails.
    pub fn to_yaml(&self) -> PetsResult<String> {
        serde_yaml::to_string(self).map_err(PetsError::YamlSerialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::FieldValue;

    #[test]
    fn test_new_application_has_every_section_not_started() {
        let app = Application::new(ApplicationId::new(), Utc::now());
        for kind in SectionKind::ALL {
            assert_eq!(app.status(kind), SectionStatus::NotYetStarted);
            assert!(app.section_ref(kind).is_some());
        }
    }

    #[test]
    fn test_yaml_round_trip_keeps_sections() {
        let mut app = Application::new(ApplicationId::new(), Utc::now());
        let mut section = Section {
            status: SectionStatus::Completed,
            version: 3,
            ..Section::default()
        };
        section
            .data
            .insert("visaCategory".into(), FieldValue::from("Study"));
        app.set_section(SectionKind::Travel, section.clone());

        let yaml = app.to_yaml().unwrap();
        assert!(yaml.contains("travel-information"));
        let parsed = Application::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.section(SectionKind::Travel), section);
        assert_eq!(parsed.id, app.id);
    }

    #[test]
    fn test_missing_sections_default_to_not_started() {
        let id = ApplicationId::new();
        let yaml = format!("id: '{id}'\ncreated_at: 2025-01-01T00:00:00Z\n");
        let app = Application::from_yaml(&yaml).unwrap();
        assert_eq!(app.status(SectionKind::TbCertificate), SectionStatus::NotYetStarted);
        assert_eq!(app.text(SectionKind::Medical, "age"), None);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let id = ApplicationId::new();
        let yaml = format!("id: '{id}'\ncreated_at: 2025-01-01T00:00:00Z\nextra: 1\n");
        assert!(matches!(
            Application::from_yaml(&yaml),
            Err(PetsError::YamlDeserialization(_))
        ));
    }
}
