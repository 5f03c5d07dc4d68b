//! Worker identity newtype

/// The identity of a worker process, as recorded in completion records.
///
/// Typically supplied through configuration (`WORKQ_WORKER_ID`); processes
/// without an explicit identity use the `"unknown"` sentinel.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, sqlx::Type, serde::Serialize,
)]
#[repr(transparent)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct WorkerName(String);

/// The sentinel name recorded for workers that were not given an explicit identity.
pub const UNKNOWN_WORKER_NAME: &str = "unknown";

impl WorkerName {
    /// Returns the worker name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the [`WorkerName`] and returns the inner String
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for WorkerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WorkerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for WorkerName {
    type Err = InvalidWorkerNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_worker_name(s)?;
        Ok(WorkerName(s.to_string()))
    }
}

impl TryFrom<String> for WorkerName {
    type Error = InvalidWorkerNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        validate_worker_name(&value)?;
        Ok(WorkerName(value))
    }
}

impl From<WorkerName> for String {
    fn from(name: WorkerName) -> Self {
        name.0
    }
}

impl<'de> serde::Deserialize<'de> for WorkerName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.try_into().map_err(serde::de::Error::custom)
    }
}

/// Validates that a worker name follows the required format:
/// - Must not be empty
/// - Must start with a letter
/// - Can only contain alphanumeric characters, underscores, hyphens, and dots
fn validate_worker_name(name: &str) -> Result<(), InvalidWorkerNameError> {
    if name.is_empty() {
        return Err(InvalidWorkerNameError {
            name: name.to_string(),
            reason: "empty string".into(),
        });
    }

    if let Some(c) = name.chars().next() {
        if !c.is_alphabetic() {
            return Err(InvalidWorkerNameError {
                name: name.to_string(),
                reason: "must start with a letter".into(),
            });
        }
    }

    if let Some(c) = name
        .chars()
        .find(|c| !c.is_alphanumeric() && *c != '_' && *c != '-' && *c != '.')
    {
        return Err(InvalidWorkerNameError {
            name: name.to_string(),
            reason: format!("invalid character '{c}'").into(),
        });
    }

    Ok(())
}

/// Error returned when a worker name is invalid.
#[derive(Debug, thiserror::Error)]
#[error("Invalid worker name '{name}': {reason}")]
pub struct InvalidWorkerNameError {
    name: String,
    #[source]
    reason: Box<dyn std::error::Error + Send + Sync>,
}

#[cfg(test)]
mod tests {
    use super::WorkerName;

    #[test]
    fn accepts_typical_names() {
        for name in ["w1", "worker-1", "pool_a.worker.2", "Unknown"] {
            assert!(name.parse::<WorkerName>().is_ok(), "rejected: {name}");
        }
    }

    #[test]
    fn rejects_malformed_names() {
        for name in ["", "1worker", "-lead", "worker 1", "w/1"] {
            assert!(name.parse::<WorkerName>().is_err(), "accepted: {name}");
        }
    }
}
