//! Configuration Labels
//!
//! A measurement is either the sequential baseline or a parallel run under a
//! scheduling policy with a chunk size. Labels are typed; the `<policy>_<chunk>`
//! string form (e.g. `static_16`) only exists at the input/output boundary.

use crate::DEFAULT_BASELINE_LABEL;
use crate::error::ScaleError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;

/// Work-distribution strategy for a parallel loop
#[derive(Debug, Clone)]
pub enum SchedulePolicy {
    /// Iterations split into chunks assigned round-robin up front
    Static,
    /// Chunks handed out on demand
    Dynamic,
    /// On-demand chunks shrinking towards the given chunk size
    Guided,
    /// Any other policy name (lowercase identifier)
    Custom(String),
}

impl SchedulePolicy {
    /// Lowercase policy name
    pub fn name(&self) -> &str {
        match self {
            SchedulePolicy::Static => "static",
            SchedulePolicy::Dynamic => "dynamic",
            SchedulePolicy::Guided => "guided",
            SchedulePolicy::Custom(name) => name,
        }
    }
}

// Identity is the policy name, so `Custom("static")` and `Static` agree.
impl PartialEq for SchedulePolicy {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for SchedulePolicy {}

impl Hash for SchedulePolicy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialOrd for SchedulePolicy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchedulePolicy {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl std::fmt::Display for SchedulePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SchedulePolicy {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "static" => Ok(SchedulePolicy::Static),
            "dynamic" => Ok(SchedulePolicy::Dynamic),
            "guided" => Ok(SchedulePolicy::Guided),
            "" => Err(ScaleError::schema(s, "empty scheduling policy")),
            _ => {
                let mut chars = name.chars();
                let starts_alpha = chars.next().is_some_and(|c| c.is_ascii_lowercase());
                if starts_alpha && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
                {
                    Ok(SchedulePolicy::Custom(name))
                } else {
                    Err(ScaleError::schema(
                        s,
                        "policy must be a lowercase identifier ([a-z][a-z0-9-]*)",
                    ))
                }
            }
        }
    }
}

/// A scheduling policy paired with its chunk size
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Schedule {
    policy: SchedulePolicy,
    chunk: NonZeroU32,
}

impl Schedule {
    /// Build a schedule, rejecting a zero chunk size
    pub fn new(policy: SchedulePolicy, chunk: u32) -> Result<Self, ScaleError> {
        let chunk = NonZeroU32::new(chunk).ok_or_else(|| {
            ScaleError::schema(format!("{}_{}", policy, chunk), "chunk size must be positive")
        })?;
        Ok(Self { policy, chunk })
    }

    /// Static schedule with the given chunk
    pub fn fixed(chunk: u32) -> Result<Self, ScaleError> {
        Self::new(SchedulePolicy::Static, chunk)
    }

    /// Scheduling policy
    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Chunk size (iterations per scheduling decision)
    pub fn chunk(&self) -> u32 {
        self.chunk.get()
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.policy, self.chunk)
    }
}

/// Configuration a measurement was taken under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConfigLabel {
    /// Unparallelized baseline run
    Sequential,
    /// Parallel run under a schedule
    Parallel(Schedule),
}

impl ConfigLabel {
    /// Parse a label, treating `baseline_label` (case-insensitive) as the sequential marker
    pub fn parse(label: &str, baseline_label: &str) -> Result<Self, ScaleError> {
        let trimmed = label.trim();
        if trimmed.eq_ignore_ascii_case(baseline_label) {
            return Ok(ConfigLabel::Sequential);
        }

        let (policy, chunk) = trimmed
            .rsplit_once('_')
            .ok_or_else(|| ScaleError::schema(label, "expected <policy>_<chunk>"))?;
        let not_positive =
            || ScaleError::schema(label, format!("chunk '{}' is not a positive integer", chunk));
        // Canonical decimal only: no sign, no leading zeros
        if chunk.starts_with('0') || !chunk.bytes().all(|b| b.is_ascii_digit()) {
            return Err(not_positive());
        }
        let chunk: u32 = chunk.parse().map_err(|_| not_positive())?;
        let policy: SchedulePolicy = policy
            .parse()
            .map_err(|_| ScaleError::schema(label, format!("invalid policy '{}'", policy)))?;

        Schedule::new(policy, chunk)
            .map(ConfigLabel::Parallel)
            .map_err(|_| ScaleError::schema(label, "chunk size must be positive"))
    }

    /// Build a label from separate schedule and chunk fields
    ///
    /// `schedule` may be the baseline marker (chunk ignored), a bare policy
    /// name together with `chunk`, or a full `<policy>_<chunk>` label.
    pub fn from_parts(
        schedule: &str,
        chunk: Option<u32>,
        baseline_label: &str,
    ) -> Result<Self, ScaleError> {
        if schedule.trim().eq_ignore_ascii_case(baseline_label) {
            return Ok(ConfigLabel::Sequential);
        }
        match chunk {
            Some(chunk) => {
                let policy: SchedulePolicy = schedule.parse()?;
                Schedule::new(policy, chunk).map(ConfigLabel::Parallel)
            }
            None => Self::parse(schedule, baseline_label),
        }
    }

    /// Shorthand for a parallel label
    pub fn parallel(policy: SchedulePolicy, chunk: u32) -> Result<Self, ScaleError> {
        Schedule::new(policy, chunk).map(ConfigLabel::Parallel)
    }

    /// Whether this is the baseline
    pub fn is_sequential(&self) -> bool {
        matches!(self, ConfigLabel::Sequential)
    }

    /// Schedule of a parallel label
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            ConfigLabel::Sequential => None,
            ConfigLabel::Parallel(schedule) => Some(schedule),
        }
    }

    /// Policy of a parallel label
    pub fn policy(&self) -> Option<&SchedulePolicy> {
        self.schedule().map(Schedule::policy)
    }

    /// Chunk size of a parallel label
    pub fn chunk(&self) -> Option<u32> {
        self.schedule().map(Schedule::chunk)
    }
}

impl std::fmt::Display for ConfigLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLabel::Sequential => f.write_str(DEFAULT_BASELINE_LABEL),
            ConfigLabel::Parallel(schedule) => schedule.fmt(f),
        }
    }
}

impl std::str::FromStr for ConfigLabel {
    type Err = ScaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_BASELINE_LABEL)
    }
}

impl TryFrom<String> for ConfigLabel {
    type Error = ScaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConfigLabel> for String {
    fn from(label: ConfigLabel) -> Self {
        label.to_string()
    }
}

impl From<Schedule> for ConfigLabel {
    fn from(schedule: Schedule) -> Self {
        ConfigLabel::Parallel(schedule)
    }
}
