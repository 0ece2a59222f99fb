use crate::cli::args::ExportCommand;
use crate::cli::params::ExportParams;
use crate::client::{ClientOptions, Credentials, normalize_server_url};
use crate::config::{Config, load_config};
use crate::error::NexusExportError;
use crate::export::ExportOptions;
use std::path::PathBuf;

/// Merges command-line flags over the optional config file and acquires credentials.
pub fn resolve_command(command: ExportCommand) -> Result<ExportParams, NexusExportError> {
    resolve_command_with_prompt(command, |username| {
        rpassword::prompt_password(format!("Password for {username}: "))
    })
}

pub fn resolve_command_with_prompt<F>(
    command: ExportCommand,
    prompt_password: F,
) -> Result<ExportParams, NexusExportError>
where
    F: FnOnce(&str) -> std::io::Result<String>,
{
    let repository = command.repository.trim().to_string();
    if repository.is_empty() || repository.contains('/') {
        return Err(NexusExportError::CliArgumentValidation {
            details: format!("Invalid repository name {:?}.", command.repository),
        });
    }

    // Fail on a bad server URL before prompting for anything.
    normalize_server_url(&command.server)?;

    let app_config = match &command.config_path {
        Some(config_path) => {
            tracing::debug!("Loading configuration from {}", config_path);
            load_config(config_path)?
        }
        None => Config::default(),
    };

    let output_dir = command
        .output_dir
        .map(PathBuf::from)
        .or(app_config.output_dir)
        .unwrap_or_else(|| PathBuf::from(&repository));

    let credentials = match command.username.or(app_config.username) {
        Some(username) => {
            let password = match command.password {
                Some(password) => password,
                None => prompt_password(&username).map_err(|source| {
                    NexusExportError::PasswordPrompt {
                        username: username.clone(),
                        source,
                    }
                })?,
            };
            Some(Credentials { username, password })
        }
        None => None,
    };

    let export_options = ExportOptions {
        verify: !command.no_verify && app_config.verify.unwrap_or(true),
        mirror: command.mirror || app_config.mirror.unwrap_or(false),
        failure_policy: command
            .on_asset_error
            .or(app_config.on_asset_error)
            .unwrap_or_default(),
    };

    let client_options = ClientOptions {
        insecure: command.insecure || app_config.insecure.unwrap_or(false),
    };

    Ok(ExportParams {
        server: command.server,
        repository,
        output_dir,
        credentials,
        client_options,
        export_options,
    })
}
