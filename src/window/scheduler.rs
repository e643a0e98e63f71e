/// Coalesces scroll events into at most one window check per frame
///
/// Every scroll input calls [`ScrollScheduler::request`]; the frame loop calls
/// [`ScrollScheduler::take`] once and runs the check only if something was requested since
/// the last frame.
#[derive(Debug, Default, Clone)]
pub struct ScrollScheduler {
    pending: bool,
}

impl ScrollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if this call scheduled a new check
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Returns true (and clears the flag) if a check is due
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
