use anyhow::{Context, Result};
use std::sync::atomic::{AtomicUsize, Ordering};

static FOREGROUND_CHILDREN: AtomicUsize = AtomicUsize::new(0);

/// Installs the Ctrl+C handler.
///
/// While a child owns the terminal the interrupt is meant for it, so the shell
/// stays alive. Outside of that (e.g. at the device menu) it ends the shell.
pub fn install() -> Result<()> {
    ctrlc::set_handler(|| {
        if !child_in_foreground() {
            eprintln!();
            std::process::exit(130);
        }
    })
    .context("Failed to install Ctrl+C handler")
}

/// Marks a foreground child as running for as long as the guard lives.
pub struct ForegroundChild(());

impl ForegroundChild {
    pub fn enter() -> Self {
        FOREGROUND_CHILDREN.fetch_add(1, Ordering::SeqCst);
        Self(())
    }
}

impl Drop for ForegroundChild {
    fn drop(&mut self) {
        FOREGROUND_CHILDREN.fetch_sub(1, Ordering::SeqCst);
    }
}

pub fn child_in_foreground() -> bool {
    FOREGROUND_CHILDREN.load(Ordering::SeqCst) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_marks_foreground() {
        let guard = ForegroundChild::enter();
        assert!(child_in_foreground());
        drop(guard);
    }
}
