//! Training loggers.
//!
//! Loggers render [`DdpgLossInfo`] rows produced by the agent's training
//! loop. Logging is pull-based and opt-in: the agent never logs on its own,
//! callers hand each loss info to whichever logger they built.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::agent::DdpgLossInfo;

/// Logger trait for different logging backends.
pub trait MetricsLogger: Send {
    /// Log one training step's loss info.
    fn log(&mut self, step: usize, info: &DdpgLossInfo);

    /// Flush any buffered output.
    fn flush(&mut self);
}

// ============================================================================
// ConsoleLogger
// ============================================================================

/// Console logger with tabular formatting.
///
/// Prints one row per `every` training steps. The steps/s column measures
/// the rate since the previous printed row, not the lifetime average.
pub struct ConsoleLogger {
    every: usize,
    printed_header: bool,
    last_step: usize,
    last_time: Instant,
}

impl ConsoleLogger {
    /// Create a logger that prints every `every`-th step. 0 behaves as 1.
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            printed_header: false,
            last_step: 0,
            last_time: Instant::now(),
        }
    }

    fn print_header(&self) {
        println!(
            "{:>8} {:>10} {:>10} {:>10} {:>10}",
            "Step", "Total", "Actor", "Critic", "Steps/s"
        );
        println!("{}", "-".repeat(52));
    }
}

impl MetricsLogger for ConsoleLogger {
    fn log(&mut self, step: usize, info: &DdpgLossInfo) {
        if step % self.every != 0 {
            return;
        }

        if !self.printed_header {
            self.print_header();
            self.printed_header = true;
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_time).as_secs_f32();
        let steps_per_sec = if dt > 0.0 {
            step.saturating_sub(self.last_step) as f32 / dt
        } else {
            0.0
        };

        println!(
            "{:>8} {:>10.4} {:>10.4} {:>10.4} {:>10.1}",
            step, info.total_loss, info.actor_loss, info.critic_loss, steps_per_sec
        );

        if let Some(debug) = &info.debug {
            println!("         td_errors  {}", debug.td_errors.format());
            println!("         td_targets {}", debug.td_targets.format());
            println!("         q_values   {}", debug.q_values.format());
        }

        self.last_step = step;
        self.last_time = now;
    }

    fn flush(&mut self) {
        // stdout is typically line-buffered, so nothing to do
    }
}

// ============================================================================
// CSVLogger
// ============================================================================

/// CSV file logger for analysis.
///
/// Every step becomes one row. The four diagnostic columns are filled from
/// the loss info's debug summaries and left empty when the agent runs with
/// `debug_summaries` disabled, so the column layout never changes.
pub struct CSVLogger {
    writer: BufWriter<File>,
}

impl CSVLogger {
    /// Create a logger writing to `path`, truncating any existing file.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "step,total_loss,actor_loss,critic_loss,td_error_mean,td_error_std,q_mean,q_std"
        )?;

        Ok(Self { writer })
    }
}

impl MetricsLogger for CSVLogger {
    fn log(&mut self, step: usize, info: &DdpgLossInfo) {
        let diagnostics = match &info.debug {
            Some(debug) => format!(
                "{:.6},{:.6},{:.6},{:.6}",
                debug.td_errors.mean, debug.td_errors.std, debug.q_values.mean, debug.q_values.std
            ),
            None => ",,,".to_string(),
        };

        let _ = writeln!(
            self.writer,
            "{},{:.6},{:.6},{:.6},{}",
            step, info.total_loss, info.actor_loss, info.critic_loss, diagnostics
        );
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }
}

impl Drop for CSVLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

// ============================================================================
// MultiLogger
// ============================================================================

/// Fans each row out to several loggers.
#[derive(Default)]
pub struct MultiLogger {
    sinks: Vec<Box<dyn MetricsLogger>>,
}

impl MultiLogger {
    /// Create an empty multi-logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a logger.
    pub fn add<L: MetricsLogger + 'static>(mut self, logger: L) -> Self {
        self.sinks.push(Box::new(logger));
        self
    }
}

impl MetricsLogger for MultiLogger {
    fn log(&mut self, step: usize, info: &DdpgLossInfo) {
        for sink in &mut self.sinks {
            sink.log(step, info);
        }
    }

    fn flush(&mut self) {
        for sink in &mut self.sinks {
            sink.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::DebugSummaries;
    use crate::metrics::TensorSummary;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn info(total: f32) -> DdpgLossInfo {
        DdpgLossInfo {
            total_loss: total,
            actor_loss: total / 2.0,
            critic_loss: total / 2.0,
            ..DdpgLossInfo::default()
        }
    }

    struct CountingLogger {
        count: Arc<AtomicUsize>,
    }

    impl MetricsLogger for CountingLogger {
        fn log(&mut self, _step: usize, _info: &DdpgLossInfo) {
            self.count.fetch_add(1, Ordering::Relaxed);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_console_logger_respects_interval() {
        let mut logger = ConsoleLogger::new(10);

        logger.log(5, &info(1.0)); // Skipped (5 % 10 != 0)
        logger.log(10, &info(1.0)); // Prints
        logger.log(15, &info(1.0)); // Skipped
    }

    #[test]
    fn test_csv_logger_writes_rows() {
        let path = std::env::temp_dir().join(format!("ddpg_losses_{}.csv", std::process::id()));

        {
            let mut logger = CSVLogger::new(&path).unwrap();
            logger.log(1, &info(2.0));
            logger.log(2, &info(4.0));
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let mut lines = contents.lines();
        assert_eq!(
            lines.next(),
            Some("step,total_loss,actor_loss,critic_loss,td_error_mean,td_error_std,q_mean,q_std")
        );
        assert_eq!(lines.next(), Some("1,2.000000,1.000000,1.000000,,,,"));
        assert_eq!(lines.next(), Some("2,4.000000,2.000000,2.000000,,,,"));
    }

    #[test]
    fn test_csv_logger_fills_diagnostic_columns() {
        let path = std::env::temp_dir().join(format!("ddpg_debug_{}.csv", std::process::id()));

        let mut row = info(2.0);
        row.debug = Some(DebugSummaries {
            td_errors: TensorSummary::from_values(&[0.5, 0.5]),
            td_targets: TensorSummary::from_values(&[5.5, 5.5]),
            q_values: TensorSummary::from_values(&[5.0, 5.0]),
        });

        {
            let mut logger = CSVLogger::new(&path).unwrap();
            logger.log(7, &row);
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let data_row = contents.lines().nth(1).unwrap();
        assert_eq!(data_row, "7,2.000000,1.000000,1.000000,0.500000,0.000000,5.000000,0.000000");
    }

    #[test]
    fn test_multi_logger_fans_out() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut multi = MultiLogger::new()
            .add(CountingLogger {
                count: count.clone(),
            })
            .add(CountingLogger {
                count: count.clone(),
            });

        multi.log(1, &info(1.0));
        multi.log(2, &info(1.0));
        multi.flush();

        assert_eq!(count.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_loss_info_format() {
        let rendered = info(3.0).format();
        assert!(rendered.contains("total_loss=3.0000"));
        assert!(rendered.contains("actor_loss=1.5000"));
        assert!(rendered.contains("critic_loss=1.5000"));
    }
}
