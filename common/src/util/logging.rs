use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter, SetLoggerError};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn initialize_logging(log_level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();
    let max_level = logger.filter();

    let multi = MultiProgress::new();

    LogWrapper::new(multi.clone(), logger).try_init()?;
    log::set_max_level(max_level);

    let _ = MULTI.set(multi);

    Ok(())
}

/// Attach a bar to the shared MultiProgress so log lines are printed above it. Without
/// initialized logging (tests, library use) the bar stays hidden.
fn register(pb: ProgressBar) -> ProgressBar {
    match MULTI.get() {
        Some(multi) => multi.add(pb),
        None => {
            pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
            pb
        }
    }
}

fn unregister(pb: &ProgressBar) {
    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(pb);
    }
}

pub fn run_with_spinner<'a, F, Out>(
    target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = Instant::now();

    let pb = register(ProgressBar::new_spinner())
        .with_message(format!("{}...", task_desc));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));

    let out = function();

    unregister(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}

pub fn run_with_pb<'a, F, Out>(
    target: &'a str, task_desc: &'a str, total: u64, function: F,
) -> Out where
    F: FnOnce(&ProgressBar) -> Out,
{
    let start_time = Instant::now();

    let pb = register(ProgressBar::new(total))
        .with_message(format!("{}...", task_desc));
    if let Ok(style) = ProgressStyle::with_template(
        "[{elapsed:.green}] {msg} [{wide_bar:.cyan/blue}] {human_pos}/{human_len} [{eta}]"
    ) {
        pb.set_style(style.progress_chars("=> "));
    }
    pb.enable_steady_tick(Duration::from_secs(1));

    let out = function(&pb);

    unregister(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}
