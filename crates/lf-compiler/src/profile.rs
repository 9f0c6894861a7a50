//! Target profiles: everything that makes one consumer's list differ from
//! another's.

use serde::{Deserialize, Serialize};

use lf_core::{Features, PriorityClass};

use crate::error::GeneratorError;
use crate::steps::{FilterStep, RewriteStep};

/// Output rank per rule class. Higher ranks are emitted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    pub comments: i32,
    pub exceptions: i32,
    pub network_filters: i32,
    pub element_hiding: i32,
    pub other: i32,
}

impl PriorityTable {
    pub fn rank(&self, class: PriorityClass) -> i32 {
        match class {
            PriorityClass::Comment => self.comments,
            PriorityClass::Exception => self.exceptions,
            PriorityClass::NetworkFilter => self.network_filters,
            PriorityClass::ElementHiding => self.element_hiding,
            PriorityClass::Other => self.other,
        }
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        Self {
            comments: 1000,
            exceptions: 900,
            network_filters: 800,
            element_hiding: 700,
            other: 600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetProfile {
    pub extension_name: String,
    pub title: String,
    pub description: String,
    /// Appended verbatim to the generated header.
    #[serde(default)]
    pub additional_header: Option<String>,
    #[serde(default)]
    pub rewrite_chain: Vec<RewriteStep>,
    #[serde(default)]
    pub filter_chain: Vec<FilterStep>,
    #[serde(default)]
    pub priority: PriorityTable,
    #[serde(default)]
    pub features: Features,
}

impl TargetProfile {
    /// Profile with identity fields set and empty chains.
    pub fn new(
        extension_name: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            extension_name: extension_name.into(),
            title: title.into(),
            description: description.into(),
            additional_header: None,
            rewrite_chain: Vec::new(),
            filter_chain: Vec::new(),
            priority: PriorityTable::default(),
            features: Features::default(),
        }
    }

    pub fn validate(&self) -> Result<(), GeneratorError> {
        let required = [
            ("extension_name", &self.extension_name),
            ("title", &self.title),
            ("description", &self.description),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GeneratorError::configuration(format!(
                    "profile field '{field}' is required"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_priorities_rank_comments_first() {
        let table = PriorityTable::default();
        let order = [
            PriorityClass::Comment,
            PriorityClass::Exception,
            PriorityClass::NetworkFilter,
            PriorityClass::ElementHiding,
            PriorityClass::Other,
        ];
        for pair in order.windows(2) {
            assert!(table.rank(pair[0]) > table.rank(pair[1]));
        }
    }

    #[test]
    fn validate_requires_identity_fields() {
        let ok = TargetProfile::new("uBlock Origin", "List", "For uBO");
        assert!(ok.validate().is_ok());

        let missing = TargetProfile::new("uBlock Origin", " ", "For uBO");
        let err = missing.validate().expect_err("blank title rejected");
        assert_eq!(err.to_string(), "configuration error: profile field 'title' is required");
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let profile: TargetProfile = serde_json::from_str(
            r#"{"extension_name":"Custom","title":"T","description":"D"}"#,
        )
        .expect("minimal profile parses");
        assert!(profile.rewrite_chain.is_empty());
        assert!(profile.filter_chain.is_empty());
        assert_eq!(profile.priority, PriorityTable::default());
        assert_eq!(profile.features, Features::default());
        assert_eq!(profile.additional_header, None);
    }
}
