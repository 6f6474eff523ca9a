//! calibredb Adapter - 进程执行器与启动检查

mod fake_runner;
mod locator;
mod process_runner;

pub use fake_runner::FakeProcessRunner;
#[cfg(test)]
pub(crate) use fake_runner::fake_service;
pub use locator::{check_library, locate_calibredb};
pub use process_runner::TokioProcessRunner;
