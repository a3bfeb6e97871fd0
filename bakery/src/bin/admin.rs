use std::error::Error;

use bakery::executable_utils::{AdminContext, initialize_executable, initialize_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let (args, config) = initialize_executable()?;
    initialize_tracing(&config.admin.log_level);

    let context = AdminContext::connect(config).await?;
    context.run(args.command).await
}
