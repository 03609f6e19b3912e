use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::SIGINT;
use signal_hook::flag;

use crate::manager::CancelToken;

//Exit status for a program stopped by SIGINT
const INTERRUPTED_EXIT: i32 = 130;

/// Routes Ctrl+C: exits the program while idle, cancels the monitor while one runs.
#[derive(Debug, Clone)]
pub struct Interrupts {
    idle: Arc<AtomicBool>,
    cancel: CancelToken,
}

impl Interrupts {
    pub fn install() -> io::Result<Self> {
        let interrupts = Self::detached();
        //Handlers run in registration order: the shutdown check sees `idle` before anything else
        flag::register_conditional_shutdown(SIGINT, INTERRUPTED_EXIT, Arc::clone(&interrupts.idle))?;
        flag::register(SIGINT, interrupts.cancel.flag())?;
        Ok(interrupts)
    }

    /// Same routing state with no signal handlers attached.
    pub fn detached() -> Self {
        Interrupts {
            idle: Arc::new(AtomicBool::new(true)),
            cancel: CancelToken::new(),
        }
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Arms Ctrl+C as "stop monitoring" until the guard is dropped.
    pub fn monitoring(&self) -> MonitorGuard<'_> {
        self.cancel.reset();
        self.idle.store(false, Ordering::SeqCst);
        MonitorGuard { interrupts: self }
    }
}

pub struct MonitorGuard<'a> {
    interrupts: &'a Interrupts,
}

impl Drop for MonitorGuard<'_> {
    fn drop(&mut self) {
        self.interrupts.idle.store(true, Ordering::SeqCst);
        self.interrupts.cancel.reset();
    }
}
