//! Command-line argument parsing (manual implementation)

use std::env;
use std::process;

use crate::constants::{
    APP_NAME, APP_VERSION, DEFAULT_REFRESH_MS, LOG_FILE_ENV, MAX_REFRESH_MS, MIN_REFRESH_MS,
};

use super::{SessionConfig, SortDirection, SortField};

/// Parsed command-line arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// Refresh interval in milliseconds
    pub refresh: u64,
    /// Initial filter query
    pub filter: Option<String>,
    /// Initial sort column
    pub sort: SortField,
    /// Sort in descending order (default is ascending)
    pub descending: bool,
    /// Start in tree view mode
    pub tree: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            refresh: DEFAULT_REFRESH_MS,
            filter: None,
            sort: SortField::Pid,
            descending: false,
            tree: false,
        }
    }
}

impl From<Args> for SessionConfig {
    fn from(args: Args) -> Self {
        SessionConfig {
            refresh_ms: args.refresh,
            filter: args.filter.unwrap_or_default(),
            sort_field: args.sort,
            sort_direction: if args.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            },
            tree_view: args.tree,
        }
    }
}

/// What the command line asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

/// Print help message
fn print_help() {
    println!(
        "{} {}
An interactive Linux process manager for the terminal, built on /proc.

USAGE:
    {} [OPTIONS]

OPTIONS:
    -r, --refresh <MS>     Refresh interval in milliseconds [default: 2000]
                           Range: 250-10000
    -f, --filter <QUERY>   Initial filter, e.g. \"user:root mem:10000- ssh\"
    -s, --sort <COLUMN>    Initial sort column [default: pid]
                           Values: pid, name, user, cpu, mem, state, ppid
    -d, --descending       Sort in descending order (default is ascending)
    -t, --tree             Start in tree view mode
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT:
    {}           Write logs to this file (RUST_LOG sets the level)

EXAMPLES:
    {}                          Start with default settings
    {} -r 500                   Start with 500ms refresh rate
    {} -f ssh -s mem -d         Filter to ssh, biggest first
    {} --tree                   Start in tree view mode",
        APP_NAME, APP_VERSION, APP_NAME, LOG_FILE_ENV, APP_NAME, APP_NAME, APP_NAME, APP_NAME
    );
}

/// Print error message and exit
fn print_error(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    eprintln!("For more information, try '--help'");
    process::exit(1);
}

/// Parse sort column from string
fn parse_sort(s: &str) -> Result<SortField, String> {
    SortField::parse(s).ok_or_else(|| {
        format!(
            "invalid sort column '{}'. Valid values: pid, name, user, cpu, mem, state, ppid",
            s
        )
    })
}

/// Parse refresh interval from string
fn parse_refresh(s: &str) -> Result<u64, String> {
    match s.parse::<u64>() {
        Ok(ms) if (MIN_REFRESH_MS..=MAX_REFRESH_MS).contains(&ms) => Ok(ms),
        Ok(ms) => Err(format!(
            "refresh interval {} is out of range. Must be between {} and {} ms",
            ms, MIN_REFRESH_MS, MAX_REFRESH_MS
        )),
        Err(_) => Err(format!("invalid refresh interval '{}'. Must be a number", s)),
    }
}

fn take_value(argv: &mut Vec<String>, flag: &str) -> Result<String, String> {
    if argv.is_empty() {
        return Err(format!("{} requires a value", flag));
    }
    Ok(argv.remove(0))
}

/// Parses an argument list (without the program name).
pub fn parse_from<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut argv: Vec<String> = args.into_iter().collect();

    while !argv.is_empty() {
        let arg = argv.remove(0);

        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "-d" | "--descending" => parsed.descending = true,
            "-t" | "--tree" => parsed.tree = true,

            "-r" | "--refresh" => parsed.refresh = parse_refresh(&take_value(&mut argv, "--refresh")?)?,
            "-f" | "--filter" => parsed.filter = Some(take_value(&mut argv, "--filter")?),
            "-s" | "--sort" => parsed.sort = parse_sort(&take_value(&mut argv, "--sort")?)?,

            // Handle combined short flags like -dt; a value flag takes the
            // rest of the cluster as its value (-r500, -tsmem)
            s if s.starts_with('-') && !s.starts_with("--") && s.len() > 2 => {
                let flags = &s[1..];
                let mut expanded = Vec::new();
                for (i, c) in flags.char_indices() {
                    expanded.push(format!("-{}", c));
                    if matches!(c, 'r' | 'f' | 's') {
                        let rest = &flags[i + c.len_utf8()..];
                        if !rest.is_empty() {
                            expanded.push(rest.to_string());
                        }
                        break;
                    }
                }
                argv.splice(0..0, expanded);
            }

            // Handle --key=value syntax
            s if s.starts_with("--") && s.contains('=') => {
                let (key, value) = s.split_once('=').unwrap_or((s, ""));
                match key {
                    "--refresh" => parsed.refresh = parse_refresh(value)?,
                    "--filter" => parsed.filter = Some(value.to_string()),
                    "--sort" => parsed.sort = parse_sort(value)?,
                    _ => return Err(format!("unknown option '{}'", key)),
                }
            }

            s if s.starts_with('-') => return Err(format!("unknown option '{}'", s)),
            s => return Err(format!("unexpected argument '{}'", s)),
        }
    }

    Ok(Command::Run(parsed))
}

/// Parse command-line arguments, printing help/version or errors and
/// exiting where appropriate.
pub fn parse_args() -> Args {
    match parse_from(env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_help();
            process::exit(0);
        }
        Ok(Command::Version) => {
            println!("{} {}", APP_NAME, APP_VERSION);
            process::exit(0);
        }
        Err(msg) => print_error(&msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, String> {
        parse_from(args.iter().map(|s| s.to_string()))
    }

    fn run(args: &[&str]) -> Args {
        match parse(args) {
            Ok(Command::Run(a)) => a,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(run(&[]), Args::default());
        let config = SessionConfig::from(Args::default());
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn test_all_options() {
        let args = run(&["-r", "500", "-f", "user:root", "--sort", "mem", "-dt"]);
        assert_eq!(args.refresh, 500);
        assert_eq!(args.filter.as_deref(), Some("user:root"));
        assert_eq!(args.sort, SortField::Memory);
        assert!(args.descending);
        assert!(args.tree);

        let config = SessionConfig::from(args);
        assert_eq!(config.sort_direction, SortDirection::Descending);
        assert_eq!(config.filter, "user:root");
    }

    #[test]
    fn test_key_value_syntax() {
        let args = run(&["--refresh=1000", "--sort=cpu", "--filter=ssh"]);
        assert_eq!(args.refresh, 1000);
        assert_eq!(args.sort, SortField::Cpu);
        assert_eq!(args.filter.as_deref(), Some("ssh"));
    }

    #[test]
    fn test_combined_flags_keep_order() {
        // -tr takes its value from the next argument
        let args = run(&["-tr", "750"]);
        assert!(args.tree);
        assert_eq!(args.refresh, 750);
    }

    #[test]
    fn test_attached_short_values() {
        let args = run(&["-r500", "-dsmem", "-fssh"]);
        assert_eq!(args.refresh, 500);
        assert!(args.descending);
        assert_eq!(args.sort, SortField::Memory);
        assert_eq!(args.filter.as_deref(), Some("ssh"));

        assert!(parse(&["-r50"]).unwrap_err().contains("out of range"));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["-r", "100"]).unwrap_err().contains("out of range"));
        assert!(parse(&["-r", "fast"]).unwrap_err().contains("Must be a number"));
        assert!(parse(&["-s"]).unwrap_err().contains("requires a value"));
        assert!(parse(&["--sort=bogus"]).unwrap_err().contains("invalid sort column"));
        assert!(parse(&["--nope"]).unwrap_err().contains("unknown option"));
        assert!(parse(&["stray"]).unwrap_err().contains("unexpected argument"));
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["-t", "--help"]), Ok(Command::Help));
        assert_eq!(parse(&["-V"]), Ok(Command::Version));
    }
}
