use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Which upstream agent a job is submitted to.
///
/// Parsing is lenient: only the exact string `"interleaved"` selects the
/// interleaved agent, anything else (other strings, numbers, a missing field)
/// falls back to the standard agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AgentType {
    #[default]
    Standard,
    Interleaved,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Standard => "standard",
            AgentType::Interleaved => "interleaved",
        }
    }

    /// Path of the job backend endpoint that starts this kind of job.
    pub fn endpoint(&self) -> &'static str {
        match self {
            AgentType::Standard => "/standard-agent",
            AgentType::Interleaved => "/interleaved-agent",
        }
    }
}

impl From<&str> for AgentType {
    fn from(value: &str) -> Self {
        match value {
            "interleaved" => AgentType::Interleaved,
            _ => AgentType::Standard,
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AgentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AgentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(AgentType::from).unwrap_or_default())
    }
}

// POST /api/submit-job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub query: String,
    #[serde(default)]
    pub agent_type: AgentType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: String,
}

// GET /api/auth/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatusResponse {
    pub user: Option<serde_json::Value>,
}

pub const STATUS_COMPLETE: &str = "COMPLETE";
pub const STATUS_FAILED: &str = "FAILED";

/// Job status as reported by the job backend.
///
/// The gateway relays status bodies verbatim; this type is the client-side
/// reading of such a body. Only `COMPLETE` and `FAILED` are terminal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl JobStatus {
    pub fn failed(result: impl Into<String>) -> Self {
        Self {
            status: STATUS_FAILED.to_string(),
            result: Some(serde_json::Value::String(result.into())),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == STATUS_COMPLETE
    }

    pub fn is_failed(&self) -> bool {
        self.status == STATUS_FAILED
    }

    pub fn is_terminal(&self) -> bool {
        self.is_complete() || self.is_failed()
    }
}
