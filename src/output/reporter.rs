//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::OutputContext;
use crate::output::progress::{finish_ok, spinner};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// On a TTY, `step()` starts a spinner that the next `success()` finishes
/// with a checkmark. Off-TTY (or with `--quiet`), messages degrade to plain
/// lines or silence.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    active: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            active: RefCell::new(None),
        }
    }

    fn clear_active(&self) {
        if let Some(pb) = self.active.borrow_mut().take() {
            pb.finish_and_clear();
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        self.clear_active();
        if self.ctx.show_progress() {
            *self.active.borrow_mut() = Some(spinner(message));
        } else if !self.ctx.quiet {
            println!("  {} {message}", "→".cyan());
        }
    }

    fn success(&self, message: &str) {
        if let Some(pb) = self.active.borrow_mut().take() {
            finish_ok(&pb, message);
            return;
        }
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".green());
        }
    }

    fn warn(&self, message: &str) {
        self.clear_active();
        if !self.ctx.quiet {
            println!("  {} {message}", "!".yellow());
        }
    }
}
