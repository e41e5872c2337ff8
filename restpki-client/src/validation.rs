//! Validation results returned by the API
//!
//! A validation result is a tree: every item may carry the results of a
//! nested validation (for instance the validation of the issuer certificate
//! while validating a signer certificate).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::encoding::null_as_default;

/// Outcome of a server-side validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResults {
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<ValidationItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    warnings: Vec<ValidationItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    passed_checks: Vec<ValidationItem>,
}

/// A single check performed by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationItem {
    #[serde(rename = "type", default)]
    item_type: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    inner_validation_results: Option<ValidationResults>,
}

impl ValidationResults {
    /// Build results from already-decoded items.
    pub fn new(
        errors: Vec<ValidationItem>,
        warnings: Vec<ValidationItem>,
        passed_checks: Vec<ValidationItem>,
    ) -> Self {
        Self {
            errors,
            warnings,
            passed_checks,
        }
    }

    pub fn errors(&self) -> &[ValidationItem] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationItem] {
        &self.warnings
    }

    pub fn passed_checks(&self) -> &[ValidationItem] {
        &self.passed_checks
    }

    /// True when no check failed. Warnings do not invalidate.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Total number of checks performed
    pub fn checks_performed(&self) -> usize {
        self.errors.len() + self.warnings.len() + self.passed_checks.len()
    }

    /// One-line summary, e.g. `Validation results: 5 checks performed, 1 errors, 4 passed`
    pub fn summary(&self, indentation_level: usize) -> String {
        let tab = "\t".repeat(indentation_level);
        let mut text = format!("{tab}Validation results: ");
        let checks = self.checks_performed();
        if checks == 0 {
            text.push_str("no checks performed");
            return text;
        }

        text.push_str(&format!("{checks} checks performed"));
        if self.has_errors() {
            text.push_str(&format!(", {} errors", self.errors.len()));
        }
        if self.has_warnings() {
            text.push_str(&format!(", {} warnings", self.warnings.len()));
        }
        if !self.passed_checks.is_empty() {
            if !self.has_errors() && !self.has_warnings() {
                text.push_str(", all passed");
            } else {
                text.push_str(&format!(", {} passed", self.passed_checks.len()));
            }
        }
        text
    }

    /// Full rendering of the tree, nested results indented by one tab per level
    pub fn to_string_indented(&self, indentation_level: usize) -> String {
        let tab = "\t".repeat(indentation_level);
        let mut text = self.summary(indentation_level);
        if self.has_errors() {
            text.push_str(&format!("\n{tab}Errors:\n"));
            text.push_str(&join_items(&self.errors, indentation_level));
        }
        if self.has_warnings() {
            text.push_str(&format!("\n{tab}Warnings:\n"));
            text.push_str(&join_items(&self.warnings, indentation_level));
        }
        if !self.passed_checks.is_empty() {
            text.push_str(&format!("\n{tab}Passed checks:\n"));
            text.push_str(&join_items(&self.passed_checks, indentation_level));
        }
        text
    }
}

impl fmt::Display for ValidationResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_indented(0))
    }
}

fn join_items(items: &[ValidationItem], indentation_level: usize) -> String {
    let tab = "\t".repeat(indentation_level);
    items
        .iter()
        .map(|item| format!("{tab}- {}", item.to_string_indented(indentation_level)))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationItem {
    pub fn new(item_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            item_type: item_type.into(),
            message: message.into(),
            detail: None,
            inner_validation_results: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_inner_results(mut self, inner: ValidationResults) -> Self {
        self.inner_validation_results = Some(inner);
        self
    }

    /// Check identifier as reported by the server (e.g. `CertificateNotRevoked`)
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn inner_validation_results(&self) -> Option<&ValidationResults> {
        self.inner_validation_results.as_ref()
    }

    pub fn to_string_indented(&self, indentation_level: usize) -> String {
        let mut text = self.message.clone();
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            text.push_str(&format!(" ({detail})"));
        }
        if let Some(inner) = &self.inner_validation_results {
            text.push('\n');
            text.push_str(&inner.to_string_indented(indentation_level + 1));
        }
        text
    }
}

impl fmt::Display for ValidationItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_indented(0))
    }
}
