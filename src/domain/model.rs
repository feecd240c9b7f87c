use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// One object as reported by a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub name: String,
    pub time_created: DateTime<Utc>,
    pub size: u64,
    pub content_type: Option<String>,
    pub generation: Option<i64>,
}

impl StoredObject {
    /// The last path segment of the object name; empty for folder placeholders.
    pub fn basename(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or_default()
    }
}

/// A file created on the hosting side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
}

/// Moves everything under `prefix` that is older than `min_age` into `folder_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationRule {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    pub noun: String,
    pub prefix: String,
    pub folder_id: String,
    #[serde(with = "age")]
    pub min_age: Duration,
}

impl RelocationRule {
    pub fn plate_images() -> Self {
        Self {
            name: "plates".to_string(),
            label: "Plate".to_string(),
            icon: "🖼".to_string(),
            noun: "plate image".to_string(),
            prefix: "plates/".to_string(),
            folder_id: "1ExA39KIUe2X6IxS3KwFO5JXhwHMJc_wH".to_string(),
            min_age: Duration::from_secs(24 * 60 * 60),
        }
    }

    pub fn excel_exports() -> Self {
        Self {
            name: "exports".to_string(),
            label: "Excel".to_string(),
            icon: "📊".to_string(),
            noun: "Excel file".to_string(),
            prefix: "exports/".to_string(),
            folder_id: "1rl00BNY_r_pIznT1Vedb-h9bP8kgXgC8".to_string(),
            min_age: Duration::from_secs(60),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::plate_images(), Self::excel_exports()]
    }

    /// True when the object was created strictly before `now - min_age`.
    pub fn is_due(&self, created: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let threshold = TimeDelta::from_std(self.min_age).unwrap_or(TimeDelta::MAX);
        match now.checked_sub_signed(threshold) {
            Some(cutoff) => created < cutoff,
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub rule: RelocationRule,
    pub result: std::result::Result<usize, String>,
}

impl RuleOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(moved) => {
                if !self.rule.icon.is_empty() {
                    write!(f, "{} ", self.rule.icon)?;
                }
                write!(f, "{} {}(s) moved to Drive.", moved, self.rule.noun)
            }
            Err(message) => write!(f, "🚨 {} move error: {}", self.rule.label, message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelocationReport {
    pub outcomes: Vec<RuleOutcome>,
}

impl RelocationReport {
    /// A report where every rule failed with the same message.
    pub fn failed(rules: &[RelocationRule], message: &str) -> Self {
        Self {
            outcomes: rules
                .iter()
                .map(|rule| RuleOutcome {
                    rule: rule.clone(),
                    result: Err(message.to_string()),
                })
                .collect(),
        }
    }

    pub fn total_moved(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(RuleOutcome::is_failure)
    }
}

impl fmt::Display for RelocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", outcome)?;
        }
        Ok(())
    }
}

/// Ages written as `<number><unit>` with unit one of `s`, `m`, `h`, `d`.
pub mod age {
    use super::*;

    pub fn parse(text: &str) -> std::result::Result<Duration, String> {
        let text = text.trim();
        let split = text
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| format!("missing unit in age '{}' (use s, m, h or d)", text))?;
        let (digits, unit) = text.split_at(split);
        let value: u64 = digits
            .parse()
            .map_err(|_| format!("invalid number in age '{}'", text))?;
        let seconds = match unit {
            "s" => Some(value),
            "m" => value.checked_mul(60),
            "h" => value.checked_mul(60 * 60),
            "d" => value.checked_mul(24 * 60 * 60),
            other => return Err(format!("unknown unit '{}' in age '{}'", other, text)),
        };
        seconds
            .map(Duration::from_secs)
            .ok_or_else(|| format!("age '{}' is too large", text))
    }

    pub fn format(duration: &Duration) -> String {
        let secs = duration.as_secs();
        match secs {
            s if s != 0 && s % 86_400 == 0 => format!("{}d", s / 86_400),
            s if s != 0 && s % 3_600 == 0 => format!("{}h", s / 3_600),
            s if s != 0 && s % 60 == 0 => format!("{}m", s / 60),
            s => format!("{}s", s),
        }
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).map_err(serde::de::Error::custom)
    }
}
