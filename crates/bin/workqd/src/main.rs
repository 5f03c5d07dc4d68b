use std::time::Duration;

mod enqueue_cmd;
mod logging;
mod migrate_cmd;
mod shutdown;
mod status_cmd;
mod worker_cmd;

#[derive(Debug, clap::Parser)]
#[command(version)]
struct Args {
    /// Connection URL of the shared queue database.
    ///
    /// All workers and producers must point at the same database; it is the
    /// single source of truth for job ownership.
    #[arg(long, env = "WORKQ_DATABASE_URL")]
    database_url: String,

    /// Connection pool size.
    #[arg(long, env = "WORKQ_POOL_SIZE", default_value_t = queue_db::DEFAULT_POOL_SIZE)]
    pool_size: u32,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// Claiming worker that competes for pending jobs until stopped.
    ///
    /// Claims run one at a time, each in its own database transaction.
    /// SIGINT/SIGTERM trigger a graceful stop: the in-flight claim settles,
    /// then the process exits 0.
    Worker {
        /// Identity of this worker instance, recorded in completion records.
        #[arg(long, env = "WORKQ_WORKER_ID", default_value = queue_db::UNKNOWN_WORKER_NAME)]
        worker_id: String,

        /// Simulated duration of the work body, in milliseconds.
        #[arg(long, env = "WORKQ_WORK_DURATION_MS", default_value_t = 500)]
        work_duration_ms: u64,

        /// Disable the LISTEN wake-up connection and rely on polling only.
        #[arg(long, env = "WORKQ_NO_WAKEUPS")]
        no_wakeups: bool,
    },
    /// Insert pending jobs into the queue and notify idle workers.
    Enqueue {
        /// Number of jobs to insert.
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Print queue and completion-log counters.
    Status,
    /// Apply pending schema migrations to the queue database and exit.
    ///
    /// Safe to run multiple times.
    Migrate,
}

#[tokio::main]
async fn main() {
    if let Err(err) = main_inner().await {
        // Manually print the error so we can control the format.
        let err = error_with_causes(&err);
        eprintln!("Exiting with error: {err}");
        std::process::exit(1);
    }
}

async fn main_inner() -> Result<(), Error> {
    logging::register_logger();

    let Args {
        database_url,
        pool_size,
        command,
    } = clap::Parser::parse();

    match command {
        Command::Worker {
            worker_id,
            work_duration_ms,
            no_wakeups,
        } => {
            let worker_name = worker_id.parse().map_err(Error::ParseWorkerName)?;
            let work_duration = Duration::from_millis(work_duration_ms);
            worker_cmd::run(&database_url, pool_size, worker_name, work_duration, no_wakeups)
                .await
                .map_err(Error::Worker)
        }
        Command::Enqueue { count } => enqueue_cmd::run(&database_url, pool_size, count)
            .await
            .map_err(Error::Enqueue),
        Command::Status => status_cmd::run(&database_url, pool_size)
            .await
            .map_err(Error::Status),
        Command::Migrate => migrate_cmd::run(&database_url, pool_size)
            .await
            .map_err(Error::Migrate),
    }
}

/// Top-level error type for the `workqd` binary.
///
/// Each variant wraps a command-specific error, providing a unified error
/// type for the main entry point while preserving the full error chain.
#[derive(Debug, thiserror::Error)]
enum Error {
    /// The worker identity is malformed.
    #[error("Invalid worker name: {0}")]
    ParseWorkerName(#[source] queue_db::InvalidWorkerNameError),

    /// Worker command failed.
    #[error("Worker command failed: {0}")]
    Worker(#[source] worker_cmd::Error),

    /// Enqueue command failed.
    #[error("Enqueue command failed: {0}")]
    Enqueue(#[source] enqueue_cmd::Error),

    /// Status command failed.
    #[error("Status command failed: {0}")]
    Status(#[source] status_cmd::Error),

    /// Migrate command failed.
    #[error("Migrate command failed: {0}")]
    Migrate(#[source] migrate_cmd::Error),
}

/// Builds an error chain string from an error and its sources.
fn error_with_causes(err: &dyn std::error::Error) -> String {
    let mut error_chain = Vec::new();
    let mut current = err;
    while let Some(source) = current.source() {
        error_chain.push(source.to_string());
        current = source;
    }

    if error_chain.is_empty() {
        err.to_string()
    } else {
        format!("{} | Caused by: {}", err, error_chain.join(" -> "))
    }
}
