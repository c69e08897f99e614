mod models;

pub use models::{
    AgentType, AuthStatusResponse, JobStatus, SubmitJobRequest, SubmitJobResponse,
    STATUS_COMPLETE, STATUS_FAILED,
};
