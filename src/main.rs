//! AOJ - command line entry point
//!
//! Thin wrapper over the library: argument parsing, exit codes and copying
//! case data to stdout.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncWriteExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aoj::{
    constants::{DEBUG_LOG_FILTER, DEFAULT_LOG_FILTER},
    Checker, Config, TestcaseManager,
};

#[derive(Parser, Debug)]
#[command(name = "aoj", version, about = "Fetch and check Aizu Online Judge test cases")]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the number of test cases, or the raw data of one of them
    Testcase {
        /// Problem id (e.g. ALDS1_1_A)
        problem_id: String,

        /// Show the number of test cases
        #[arg(short, long)]
        length: bool,

        /// Show input of the specified test case
        #[arg(short, long, conflicts_with = "output")]
        input: Option<usize>,

        /// Show output of the specified test case
        #[arg(short, long)]
        output: Option<usize>,
    },

    /// Check an executable against the problem's test cases
    Check {
        /// Problem id (e.g. ALDS1_1_A)
        problem_id: String,

        /// Path to the executable implementing the solution
        path: PathBuf,

        /// Only check this test case
        #[arg(short, long = "case")]
        case: Option<usize>,
    },

    /// Download every test case of a problem into the cache
    Fetch {
        /// Problem id (e.g. ALDS1_1_A)
        problem_id: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let filter = if cli.debug || config.logging.debug {
        EnvFilter::new(DEBUG_LOG_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into())
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let manager = TestcaseManager::new(&config)?;

    match cli.command {
        Command::Testcase {
            problem_id,
            length,
            input,
            output,
        } => show_testcase(&manager, &problem_id, length, input, output).await,
        Command::Check {
            problem_id,
            path,
            case,
        } => {
            let checker = Checker::new(&config);
            check(&manager, &checker, &problem_id, &resolve_executable(&path)?, case).await
        }
        Command::Fetch { problem_id } => {
            let testcase = manager
                .get_testcase_ignoring_cache(&problem_id)
                .await
                .context("failed to get testcases")?;
            testcase
                .fetch_all_cases()
                .await
                .with_context(|| format!("failed to fetch testcases of {}", problem_id))?;
            println!("{}", testcase.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn show_testcase(
    manager: &TestcaseManager,
    problem_id: &str,
    length: bool,
    input: Option<usize>,
    output: Option<usize>,
) -> Result<ExitCode> {
    let testcase = manager
        .get_testcase(problem_id)
        .await
        .context("failed to get testcases")?;

    let mut reader = match (length, input, output) {
        (true, _, _) | (false, None, None) => {
            println!("{}", testcase.len());
            return Ok(ExitCode::SUCCESS);
        }
        (false, Some(index), None) => testcase
            .case_input(index)
            .await
            .with_context(|| format!("failed to get test case {} of {}", index, problem_id))?,
        (false, None, Some(index)) => testcase
            .case_output(index)
            .await
            .with_context(|| format!("failed to get test case {} of {}", index, problem_id))?,
        (false, Some(_), Some(_)) => bail!("--input and --output are mutually exclusive"),
    };

    let mut stdout = tokio::io::stdout();
    tokio::io::copy(&mut reader, &mut stdout).await?;
    stdout.flush().await?;
    Ok(ExitCode::SUCCESS)
}

async fn check(
    manager: &TestcaseManager,
    checker: &Checker,
    problem_id: &str,
    executable: &Path,
    case: Option<usize>,
) -> Result<ExitCode> {
    let testcase = manager
        .get_testcase(problem_id)
        .await
        .context("failed to get testcases")?;

    if let Some(index) = case {
        let passed = checker
            .check_case(&testcase, index, executable)
            .await
            .context("failed to check")?;
        if !passed {
            eprintln!("testcase {} failed", index);
            return Ok(ExitCode::FAILURE);
        }
        return Ok(ExitCode::SUCCESS);
    }

    for index in 0..testcase.len() {
        let passed = checker
            .check_case(&testcase, index, executable)
            .await
            .with_context(|| format!("failed to check testcase {}", index))?;
        if !passed {
            eprintln!("testcase {} failed", index);
            return Ok(ExitCode::FAILURE);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// A bare name is taken relative to the current directory, not looked up in PATH
fn resolve_executable(path: &Path) -> Result<PathBuf> {
    if path.to_string_lossy().contains('/') {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("cannot get cwd")?;
    Ok(cwd.join(path))
}
