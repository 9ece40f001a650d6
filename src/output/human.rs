//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::report::{TeardownOutcome, VerificationReport};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the per-check verification report.
    pub fn render_report(&self, report: &VerificationReport) {
        println!();
        self.ctx.header("Verification report");
        println!();
        self.ctx.kv("Resource group:", &report.stack.resource_group_name);
        self.ctx.kv("Virtual machine:", &report.stack.vm_name);
        self.ctx.kv("Network interface:", &report.stack.nic_name);
        println!();

        for check in &report.checks {
            match &check.failure {
                None => self.print_check(true, check.check.label()),
                Some(failure) => {
                    self.print_check(false, check.check.label());
                    println!("      {failure}");
                }
            }
        }
        if let Some(fault) = &report.fault {
            println!();
            self.ctx.error(fault);
        }

        println!();
        match &report.teardown {
            TeardownOutcome::Destroyed => self.ctx.success("stack destroyed"),
            TeardownOutcome::Failed { error } => {
                self.ctx.error(&format!("teardown failed: {error}"));
                self.ctx.warn("the stack may still be running. Run 'stackcheck destroy' to retry.");
            }
        }

        let duration = report.finished_at - report.started_at;
        self.ctx.kv("Duration:", &format_duration(duration));
        println!();
        if report.passed() {
            println!(
                "  {} All checks passed.",
                "✓".style(self.ctx.styles.success)
            );
        } else {
            println!(
                "  {} {} of {} checks failed.",
                "✗".style(self.ctx.styles.error),
                report.failed_checks(),
                report.checks.len(),
            );
        }
        println!();
    }

    fn print_check(&self, ok: bool, msg: &str) {
        if ok {
            println!("    {} {msg}", "\u{2713}".style(self.ctx.styles.success));
        } else {
            println!("    {} {msg}", "\u{2717}".style(self.ctx.styles.error));
        }
    }
}

// ── Display helpers (used by tests and output layer) ─────────────────────────

#[must_use]
pub fn format_duration(duration: chrono::Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    let minutes = seconds / 60;
    if minutes > 0 {
        format!("{minutes}m {}s", seconds % 60)
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_minutes_and_seconds() {
        assert_eq!(format_duration(chrono::Duration::seconds(154)), "2m 34s");
    }

    #[test]
    fn test_format_duration_seconds_only() {
        assert_eq!(format_duration(chrono::Duration::seconds(42)), "42s");
    }

    #[test]
    fn test_format_duration_negative_clamps_to_zero() {
        assert_eq!(format_duration(chrono::Duration::seconds(-5)), "0s");
    }
}
