//! CLI argument parsing and subcommand dispatch.

/// Parse CLI arguments and dispatch to the appropriate subcommand.
///
/// Returns `Ok(true)` if a subcommand was handled, `Ok(false)` if `serve`
/// should be started (handled by the caller).
pub fn dispatch(config: &study_core::Config, args: &[String]) -> anyhow::Result<bool> {
    match args.get(1).map(|s| s.as_str()) {
        None | Some("serve") => Ok(false),
        Some("check-config") => {
            println!("{}", serde_json::to_string_pretty(&config.redacted_summary())?);
            Ok(true)
        }
        Some(other) => {
            if other != "help" && other != "--help" {
                eprintln!("Unknown command: {other}");
            }
            print_usage();
            Ok(true)
        }
    }
}

fn print_usage() {
    println!("study-server v{}", env!("CARGO_PKG_VERSION"));
    println!("Usage: study-server <command>");
    println!("  serve          Start HTTP server (default)");
    println!("  check-config   Print the effective configuration (secrets redacted)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn config() -> study_core::Config {
        study_core::Config::from_lookup(|_| None)
    }

    #[test]
    fn serve_is_default() {
        assert!(!dispatch(&config(), &args(&["study-server"])).unwrap());
        assert!(!dispatch(&config(), &args(&["study-server", "serve"])).unwrap());
    }

    #[test]
    fn other_commands_are_handled() {
        assert!(dispatch(&config(), &args(&["study-server", "check-config"])).unwrap());
        assert!(dispatch(&config(), &args(&["study-server", "bogus"])).unwrap());
    }
}
