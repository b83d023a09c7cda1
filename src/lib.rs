pub mod app_context;
pub mod config;
pub mod jobs;
pub mod monitor;
pub mod storage;

#[cfg(test)]
mod test_support;
