#[path = "e2e/full_run.rs"]
mod full_run;

#[path = "e2e/vocabulary_repair.rs"]
mod vocabulary_repair;

#[path = "e2e/emergency_reseed.rs"]
mod emergency_reseed;

#[path = "e2e/test_culling.rs"]
mod test_culling;
