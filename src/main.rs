//! Main entry point and CLI dispatch.
//!
//! Parses command-line arguments and hands off to the appropriate handler:
//! the daemon loop, or one of the one-shot commands. Errors surface here as a
//! logged message and a non-zero exit code.

use duskr::args::{CliAction, ParsedArgs, display_help, display_version};
use duskr::commands;
use duskr::config;
use duskr::constants::{EXIT_FAILURE, EXIT_SUCCESS};
use duskr::logger::Log;
use duskr::{Duskr, log_end, log_error, log_pipe};

fn main() {
    let parsed = ParsedArgs::parse(std::env::args());
    std::process::exit(dispatch(parsed.action));
}

fn dispatch(action: CliAction) -> i32 {
    let result = match action {
        CliAction::ShowVersion => {
            display_version();
            return EXIT_SUCCESS;
        }
        CliAction::ShowHelp => {
            display_help();
            return EXIT_SUCCESS;
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            return EXIT_FAILURE;
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => set_config_dir(config_dir).and_then(|()| {
            Log::set_debug(debug_enabled);
            Duskr::new(debug_enabled).run()
        }),
        CliAction::ApplyCommand {
            debug_enabled,
            config_dir,
        } => set_config_dir(config_dir).and_then(|()| {
            Log::set_debug(debug_enabled);
            commands::apply::handle_apply_command(debug_enabled)
        }),
        CliAction::StatusCommand { json, config_dir } => set_config_dir(config_dir)
            .and_then(|()| commands::status::handle_status_command(json)),
        CliAction::SetCommand { fields, config_dir } => set_config_dir(config_dir)
            .and_then(|()| commands::set::handle_set_command(&fields)),
    };

    match result {
        Ok(()) => EXIT_SUCCESS,
        Err(err) => {
            log_pipe!();
            log_error!("{err:#}");
            log_end!();
            EXIT_FAILURE
        }
    }
}

fn set_config_dir(dir: Option<String>) -> anyhow::Result<()> {
    config::set_config_dir(dir)
}
