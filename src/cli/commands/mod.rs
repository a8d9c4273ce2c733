use anyhow::Result;

pub mod check_config;
pub mod operations;
pub mod run;

pub use check_config::CheckConfigCommand;
pub use operations::OperationsCommand;
pub use run::RunCommand;

#[allow(async_fn_in_trait)]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
