use clap::{ArgAction, Parser};
use session_init::report::{self, EXIT_FAULT, EXIT_OK};
use session_init::{AppError, GatherConfig, logging};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Report git identity and branch sync state as JSON
#[derive(Debug, Parser)]
#[command(name = "session-init", version, about)]
struct Cli {
    /// Run git in this directory instead of the current one
    #[arg(short = 'C', long = "dir", value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Seconds allowed for `git fetch --all`
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    fetch_timeout: u64,

    /// Seconds allowed for every other git query
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    query_timeout: u64,

    /// Git executable to run
    #[arg(long = "git", value_name = "BIN", default_value = "git")]
    git: String,

    /// Log more to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> GatherConfig {
        let config = GatherConfig::default()
            .with_git_binary(self.git.clone())
            .with_fetch_timeout(Duration::from_secs(self.fetch_timeout))
            .with_query_timeout(Duration::from_secs(self.query_timeout));

        match &self.dir {
            Some(dir) => config.with_repo_dir(dir.clone()),
            None => config,
        }
    }
}

fn main() -> ExitCode {
    let mut stdout = io::stdout().lock();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(EXIT_OK);
        }
        Err(e) => {
            let _ = e.print();
            let reason = e.kind().as_str().unwrap_or("unrecognized input");
            let fault = AppError::Usage(reason.to_string());
            report::emit_fallback(&mut stdout, &fault);
            return ExitCode::from(EXIT_FAULT);
        }
    };

    logging::init(cli.verbose);

    // Panics are turned into the fallback report; keep stderr to one log line
    panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic while gathering session context");
    }));

    let config = cli.config();
    let code = report::emit(&mut stdout, || report::gather(&config));

    ExitCode::from(code)
}
