//! Command-line argument parsing and processing.
//!
//! Hand-rolled parser producing a [`CliAction`] for the dispatcher in
//! `main.rs`. Supports the `apply`, `status`, and `set` subcommands plus the
//! standard help, version, debug, and config-dir flags, gracefully reporting
//! unknown options.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the scheduler daemon.
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// One-shot evaluate-and-apply, then exit.
    ApplyCommand {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print the current decision without actuating.
    StatusCommand {
        json: bool,
        config_dir: Option<String>,
    },
    /// Update configuration field(s) and save.
    SetCommand {
        fields: Vec<(String, String)>,
        config_dir: Option<String>,
    },
    /// Display help information and exit.
    ShowHelp,
    /// Display version information and exit.
    ShowVersion,
    /// Show help due to unknown arguments and exit non-zero.
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Version and help take precedence over everything else.
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let debug_enabled = args_vec.iter().any(|arg| arg == "--debug" || arg == "-d");
        let json = args_vec.iter().any(|arg| arg == "--json");
        let config_dir = args_vec
            .iter()
            .position(|arg| arg == "--config-dir" || arg == "-c")
            .and_then(|idx| args_vec.get(idx + 1))
            .cloned();

        // Find the subcommand: first argument that is neither a flag nor a
        // flag's value.
        let mut command_idx = None;
        let mut idx = 0;
        while idx < args_vec.len() {
            let arg = &args_vec[idx];
            if arg.starts_with('-') {
                if matches!(arg.as_str(), "--config-dir" | "-c") {
                    idx += 2; // Skip the flag and its argument
                } else if matches!(arg.as_str(), "--debug" | "-d" | "--json") {
                    idx += 1;
                } else {
                    return ParsedArgs {
                        action: CliAction::ShowHelpDueToError,
                    };
                }
            } else {
                command_idx = Some(idx);
                break;
            }
        }

        let action = match command_idx {
            None => CliAction::Run {
                debug_enabled,
                config_dir,
            },
            Some(cmd_idx) => match args_vec[cmd_idx].as_str() {
                "apply" | "a" => CliAction::ApplyCommand {
                    debug_enabled,
                    config_dir,
                },
                "status" | "st" => CliAction::StatusCommand { json, config_dir },
                "set" | "s" => {
                    match collect_set_fields(&args_vec[cmd_idx + 1..]) {
                        Some(fields) if !fields.is_empty() => CliAction::SetCommand {
                            fields,
                            config_dir,
                        },
                        _ => CliAction::ShowHelpDueToError,
                    }
                }
                _ => CliAction::ShowHelpDueToError,
            },
        };

        ParsedArgs { action }
    }
}

/// Collect `<field> <value>` pairs following the `set` subcommand, skipping
/// over flags. An odd dangling field is a parse error.
fn collect_set_fields(rest: &[String]) -> Option<Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut pending: Option<String> = None;
    let mut idx = 0;
    while idx < rest.len() {
        let arg = &rest[idx];
        if arg.starts_with('-') {
            if matches!(arg.as_str(), "--config-dir" | "-c") {
                idx += 2;
            } else {
                idx += 1;
            }
            continue;
        }
        match pending.take() {
            None => pending = Some(arg.clone()),
            Some(field) => fields.push((field, arg.clone())),
        }
        idx += 1;
    }
    if pending.is_some() {
        return None;
    }
    Some(fields)
}

/// Display version information.
pub fn display_version() {
    println!("duskr v{}", env!("CARGO_PKG_VERSION"));
    println!("Automatic Night Light scheduler driven by sunrise and sunset");
}

/// Display help information.
pub fn display_help() {
    log_version!();
    log_block_start!("Usage: duskr [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-h, --help              Show this help message");
    log_indented!("-V, --version           Show version information");
    log_indented!("-d, --debug             Enable debug output");
    log_indented!("-c, --config-dir <dir>  Use an alternate config directory");
    log_indented!("--json                  Machine-readable output (status)");
    log_block_start!("Commands:");
    log_indented!("apply, a                Evaluate and apply Night Light state once");
    log_indented!("status, st              Print the current decision without applying");
    log_indented!("set, s <field> <value> [...] Update configuration field(s)");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_args_runs_daemon() {
        let parsed = ParsedArgs::parse(vec!["duskr"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: None,
            }
        );
    }

    #[test]
    fn parse_debug_flag() {
        let parsed = ParsedArgs::parse(vec!["duskr", "--debug"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn parse_config_dir() {
        let parsed = ParsedArgs::parse(vec!["duskr", "-c", "/tmp/duskr"]);
        assert_eq!(
            parsed.action,
            CliAction::Run {
                debug_enabled: false,
                config_dir: Some("/tmp/duskr".to_string()),
            }
        );
    }

    #[test]
    fn parse_help_flag() {
        let parsed = ParsedArgs::parse(vec!["duskr", "--help"]);
        assert_eq!(parsed.action, CliAction::ShowHelp);
    }

    #[test]
    fn parse_version_flags() {
        assert_eq!(
            ParsedArgs::parse(vec!["duskr", "-V"]).action,
            CliAction::ShowVersion
        );
        assert_eq!(
            ParsedArgs::parse(vec!["duskr", "--version"]).action,
            CliAction::ShowVersion
        );
    }

    #[test]
    fn version_takes_precedence() {
        let parsed = ParsedArgs::parse(vec!["duskr", "--version", "--help", "--debug"]);
        assert_eq!(parsed.action, CliAction::ShowVersion);
    }

    #[test]
    fn parse_apply_subcommand() {
        let parsed = ParsedArgs::parse(vec!["duskr", "apply", "-d"]);
        assert_eq!(
            parsed.action,
            CliAction::ApplyCommand {
                debug_enabled: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn parse_status_with_json() {
        let parsed = ParsedArgs::parse(vec!["duskr", "status", "--json"]);
        assert_eq!(
            parsed.action,
            CliAction::StatusCommand {
                json: true,
                config_dir: None,
            }
        );
    }

    #[test]
    fn parse_set_pairs() {
        let parsed = ParsedArgs::parse(vec!["duskr", "set", "strength", "70", "override", "on"]);
        assert_eq!(
            parsed.action,
            CliAction::SetCommand {
                fields: vec![
                    ("strength".to_string(), "70".to_string()),
                    ("override".to_string(), "on".to_string()),
                ],
                config_dir: None,
            }
        );
    }

    #[test]
    fn parse_set_with_dangling_field_is_error() {
        let parsed = ParsedArgs::parse(vec!["duskr", "set", "strength"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn parse_unknown_flag_is_error() {
        let parsed = ParsedArgs::parse(vec!["duskr", "--unknown"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }

    #[test]
    fn parse_unknown_command_is_error() {
        let parsed = ParsedArgs::parse(vec!["duskr", "frobnicate"]);
        assert_eq!(parsed.action, CliAction::ShowHelpDueToError);
    }
}
