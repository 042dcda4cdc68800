pub mod candidate_service;
pub mod intake_service;
pub mod job_query;
pub mod job_service;
