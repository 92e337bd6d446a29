use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

pub fn tracing_init() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .with_timer(ClockTime)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}

/// Wall-clock `HH:MM:SS.mmm`, local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}
