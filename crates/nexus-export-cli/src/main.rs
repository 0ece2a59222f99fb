use nexus_export_lib::cli::{parse_args, resolve_command, run_export};
use nexus_export_lib::error::NexusExportError;
use std::process::ExitCode;

async fn export() -> Result<(), NexusExportError> {
    let args = parse_args()?;
    let params = resolve_command(args.command)?;
    run_export(params).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, NexusExportError> {
    color_eyre::install()?;

    match export().await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            tracing::error!("{}", err);
            tracing::error!("Aborting export");
            Ok(ExitCode::from(err.exit_code()))
        }
    }
}
