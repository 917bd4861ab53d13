// File: src/config.rs
// Purpose: Controller options (colors, class names, opt-in policy)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Class added to a field that passed validation when no valid class is configured
pub const FALLBACK_VALID_CLASS: &str = "success";

/// Class added to a field that failed validation when no invalid class is configured
pub const FALLBACK_INVALID_CLASS: &str = "error";

/// Class of the generated message element when no feedback class is configured
pub const FALLBACK_FEEDBACK_CLASS: &str = "error-message";

/// Which events are allowed to trigger validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptInPolicy {
    /// Every submit/blur/input event reaching the document is validated
    #[default]
    Always,

    /// Only elements carrying `data-validate="validate"` (on the element,
    /// its form, or one of the form's controls for submissions)
    Attribute,
}

/// Options accepted by [`crate::FormValidation::attach`]
///
/// Field names follow the JavaScript option object (`errorColor`,
/// `validClass`, ...). The older `bootstrap*` names are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOptions {
    /// Text color applied to the label preceding an invalid field
    #[serde(default = "default_error_color")]
    pub error_color: String,

    /// Success text color, kept for callers that style valid labels themselves
    #[serde(default = "default_success_color")]
    pub success_color: String,

    /// Class added to a field once it validates (`None` or empty: "success")
    #[serde(default = "default_valid_class", alias = "bootstrapValidClass")]
    pub valid_class: Option<String>,

    /// Class added to a field that fails (`None` or empty: "error")
    #[serde(default = "default_invalid_class", alias = "bootstrapInvalidClass")]
    pub invalid_class: Option<String>,

    /// Class of the generated message element (`None` or empty: "error-message")
    #[serde(default = "default_feedback_class", alias = "bootstrapInvalidFeedBack")]
    pub feedback_class: Option<String>,

    #[serde(default)]
    pub opt_in: OptInPolicy,

    /// Also run the native `was-validated` submit path on the bound forms
    #[serde(default = "default_false")]
    pub was_validated: bool,

    /// Install the email `pattern` attribute on every email input at attach time
    #[serde(default = "default_true")]
    pub install_email_pattern: bool,
}

fn default_error_color() -> String {
    "#dc3545".to_string()
}

fn default_success_color() -> String {
    "#198754".to_string()
}

fn default_valid_class() -> Option<String> {
    Some("is-valid".to_string())
}

fn default_invalid_class() -> Option<String> {
    Some("is-invalid".to_string())
}

fn default_feedback_class() -> Option<String> {
    Some("invalid-feedback".to_string())
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            error_color: default_error_color(),
            success_color: default_success_color(),
            valid_class: default_valid_class(),
            invalid_class: default_invalid_class(),
            feedback_class: default_feedback_class(),
            opt_in: OptInPolicy::Always,
            was_validated: false,
            install_email_pattern: true,
        }
    }
}

fn class_or<'a>(class: &'a Option<String>, fallback: &'a str) -> &'a str {
    match class.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => fallback,
    }
}

impl ValidationOptions {
    /// Options with every class unset, i.e. the plain `error`/`success` scheme
    pub fn plain() -> Self {
        Self {
            valid_class: None,
            invalid_class: None,
            feedback_class: None,
            ..Self::default()
        }
    }

    pub fn valid_class(&self) -> &str {
        class_or(&self.valid_class, FALLBACK_VALID_CLASS)
    }

    pub fn invalid_class(&self) -> &str {
        class_or(&self.invalid_class, FALLBACK_INVALID_CLASS)
    }

    pub fn feedback_class(&self) -> &str {
        class_or(&self.feedback_class, FALLBACK_FEEDBACK_CLASS)
    }

    /// Parse options from a JSON object (the shape JavaScript callers pass)
    pub fn from_json_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content).context("Failed to parse validation options as JSON")
    }

    /// Parse options from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse validation options as TOML")
    }

    /// Load options from a `.json` or `.toml` file
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read validation options: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let options = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };

        options.with_context(|| format!("Invalid validation options file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ValidationOptions::default();
        assert_eq!(options.error_color, "#dc3545");
        assert_eq!(options.success_color, "#198754");
        assert_eq!(options.valid_class(), "is-valid");
        assert_eq!(options.invalid_class(), "is-invalid");
        assert_eq!(options.feedback_class(), "invalid-feedback");
        assert_eq!(options.opt_in, OptInPolicy::Always);
        assert!(options.install_email_pattern);
        assert!(!options.was_validated);
    }

    #[test]
    fn test_fallback_class_names() {
        let options = ValidationOptions::plain();
        assert_eq!(options.valid_class(), "success");
        assert_eq!(options.invalid_class(), "error");
        assert_eq!(options.feedback_class(), "error-message");

        let options = ValidationOptions {
            invalid_class: Some("  ".to_string()),
            ..ValidationOptions::default()
        };
        assert_eq!(options.invalid_class(), "error");

        let options = ValidationOptions {
            invalid_class: Some(" is-invalid ".to_string()),
            ..ValidationOptions::default()
        };
        assert_eq!(options.invalid_class(), "is-invalid");
    }

    #[test]
    fn test_json_options_with_aliases() {
        let json = r#"{
            "errorColor": "red",
            "bootstrapInvalidClass": "bad",
            "feedbackClass": null,
            "optIn": "attribute"
        }"#;
        let options = ValidationOptions::from_json_str(json).unwrap();
        assert_eq!(options.error_color, "red");
        assert_eq!(options.invalid_class(), "bad");
        assert_eq!(options.feedback_class(), "error-message");
        assert_eq!(options.valid_class(), "is-valid");
        assert_eq!(options.opt_in, OptInPolicy::Attribute);
    }

    #[test]
    fn test_empty_json_is_default() {
        let options = ValidationOptions::from_json_str("  ").unwrap();
        assert_eq!(options, ValidationOptions::default());
    }

    #[test]
    fn test_toml_options() {
        let toml = r##"
            errorColor = "#ff0000"
            validClass = "ok"
            wasValidated = true
        "##;
        let options = ValidationOptions::from_toml_str(toml).unwrap();
        assert_eq!(options.error_color, "#ff0000");
        assert_eq!(options.valid_class(), "ok");
        assert!(options.was_validated);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let options = ValidationOptions::load("does/not/exist.toml").unwrap();
        assert_eq!(options, ValidationOptions::default());
    }

    #[test]
    fn test_invalid_json_reports_error() {
        assert!(ValidationOptions::from_json_str("{ not json").is_err());
    }
}
