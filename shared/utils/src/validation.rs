use crate::config::ValidationConfig;
use crate::error::{MatchwiseError, MatchwiseResult};
use regex::Regex;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> MatchwiseResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(MatchwiseError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, error.code.as_ref()) {
                (Some(message), _) => format!("{}: {}", field, message),
                (None, "length") => format!("Length validation failed for field '{}'", field),
                (None, "range") => format!("Value out of range for field '{}'", field),
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

/// A whole-string identifier pattern.
///
/// The configured pattern is wrapped as `^(?:pattern)$`, so `\d{12}` never
/// matches a 13-digit value.
#[derive(Debug, Clone)]
pub struct Grammar {
    pattern: String,
    regex: Regex,
}

impl Grammar {
    pub fn new(pattern: &str) -> MatchwiseResult<Self> {
        if pattern.trim().is_empty() {
            return Err(MatchwiseError::configuration("validation pattern cannot be empty"));
        }
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// The two identifier grammars applied to normalized CBOM keys.
#[derive(Debug, Clone)]
pub struct IdentifierGrammars {
    pub part: Grammar,
    pub room: Grammar,
}

impl IdentifierGrammars {
    pub fn from_config(config: &ValidationConfig) -> MatchwiseResult<Self> {
        Ok(Self {
            part: Grammar::new(&config.patterns.part_normalized)?,
            room: Grammar::new(&config.patterns.room_normalized)?,
        })
    }

    pub fn is_valid_part(&self, value: &str) -> bool {
        !value.is_empty() && self.part.is_match(value)
    }

    pub fn is_valid_room(&self, value: &str) -> bool {
        !value.is_empty() && self.room.is_match(value)
    }
}

impl Default for IdentifierGrammars {
    fn default() -> Self {
        Self {
            part: Grammar {
                pattern: r"\d{12}".to_string(),
                regex: Regex::new(r"^(?:\d{12})$").expect("static 12NC pattern"),
            },
            room: Grammar {
                pattern: "[A-Za-z0-9]+".to_string(),
                regex: Regex::new("^(?:[A-Za-z0-9]+)$").expect("static room pattern"),
            },
        }
    }
}
