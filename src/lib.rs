pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::database::{BlobStore, MemoryBlobStore, MemoryStore, Store};
use crate::services::{
    candidate_service::CandidateService, intake_service::IntakeService, job_service::JobService,
};

#[derive(Clone)]
pub struct AppState {
    pub jobs: JobService,
    pub intake: IntakeService,
    pub candidates: CandidateService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, blobs: Arc<dyn BlobStore>) -> Self {
        let jobs = JobService::new(store.clone());
        let intake = IntakeService::new(jobs.clone(), store.clone(), blobs.clone());
        let candidates = CandidateService::new(store, blobs);

        Self {
            jobs,
            intake,
            candidates,
        }
    }

    /// State backed entirely by process memory; nothing survives a restart.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryBlobStore::new()),
        )
    }
}
