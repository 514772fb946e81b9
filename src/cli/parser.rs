/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    Sync {
        csv_path: String,
        ledger_path: Option<String>,
    },
    Help,
    Unknown(String),
}

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Help,
        2 => match args[1].as_str() {
            "help" => Command::Help,
            "sync" => Command::Unknown(
                "Missing CSV path. Usage: papertrack sync <csv-file> [ledger-file]".to_string(),
            ),
            cmd => Command::Unknown(cmd.to_string()),
        },
        3 => match args[1].as_str() {
            "sync" => Command::Sync {
                csv_path: args[2].clone(),
                ledger_path: None,
            },
            cmd => Command::Unknown(cmd.to_string()),
        },
        _ => match args[1].as_str() {
            "sync" => Command::Sync {
                csv_path: args[2].clone(),
                ledger_path: Some(args[3].clone()),
            },
            cmd => Command::Unknown(cmd.to_string()),
        },
    }
}
