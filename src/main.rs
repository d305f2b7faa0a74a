mod cancel;
mod config;
mod coordinator;
mod logging;
mod shared_queue;
mod types;
mod worker;

use config::Config;
use coordinator::Coordinator;
use log::info;

fn main() {
    logging::init();

    let config = Config::default();
    info!("=== Data processing pool starting ===");
    info!(
        "Seeding {} tasks for {} workers ({}ms per task)",
        config.task_count,
        config.worker_count,
        config.processing_delay.as_millis()
    );

    let summary = Coordinator::new(config).run();

    // Machine-readable summary block; progress lines go to stderr via the
    // logger. Partial failures degrade the counts but never the exit code.
    println!("RUN SUMMARY");
    println!("workers_started={}", summary.workers_started);
    println!("tasks_seeded={}", summary.tasks_seeded);
    println!("tasks_processed={}", summary.tasks_processed());
    let per_worker: Vec<usize> = summary
        .reports
        .iter()
        .map(|report| report.processed.len())
        .collect();
    println!("per_worker_done={per_worker:?}");
    println!("cancelled={}", summary.cancelled);
    println!("elapsed_ms={}", summary.elapsed.as_millis());
    println!("All workers completed");
}
