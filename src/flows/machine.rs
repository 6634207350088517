/// One form-to-result interaction: Idle → Submitting → Success | Failed,
/// back to Idle on reset. Shared by the mealplan and detector flows.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowState<T> {
    Idle,
    Submitting,
    Success(T),
    Failed(String),
}

/// Tag handed out per accepted submission. A reset bumps the counter, so a
/// response from before the reset settles against a stale tag and is dropped
/// instead of overwriting fresh state.
pub type Epoch = u64;

#[derive(Debug)]
pub struct RequestFlow<T> {
    state: FlowState<T>,
    epoch: Epoch,
}

impl<T> Default for RequestFlow<T> {
    fn default() -> Self {
        Self {
            state: FlowState::Idle,
            epoch: 0,
        }
    }
}

impl<T> RequestFlow<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FlowState<T> {
        &self.state
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.state, FlowState::Submitting)
    }

    /// Accepts a submission from Idle or Failed (resubmission is the retry
    /// path). Returns the epoch the caller must settle with, or None while a
    /// request is already in flight or a result is still displayed.
    pub fn begin_submit(&mut self) -> Option<Epoch> {
        match self.state {
            FlowState::Idle | FlowState::Failed(_) => {
                self.state = FlowState::Submitting;
                Some(self.epoch)
            }
            FlowState::Submitting => {
                log::warn!("Submit ignored: request already in flight");
                None
            }
            FlowState::Success(_) => {
                log::warn!("Submit ignored: previous result not yet dismissed");
                None
            }
        }
    }

    /// Settles the in-flight request. A completion tagged with a stale epoch
    /// means reset ran while the request was pending; it is discarded.
    pub fn complete(&mut self, epoch: Epoch, outcome: Result<T, String>) {
        if epoch != self.epoch {
            log::warn!(
                "Discarding stale response (epoch {} != current {})",
                epoch,
                self.epoch
            );
            return;
        }
        self.state = match outcome {
            Ok(value) => FlowState::Success(value),
            Err(message) => FlowState::Failed(message),
        };
    }

    /// Local failure before any request was issued (missing endpoint,
    /// missing input). Only meaningful where begin_submit would be accepted.
    pub fn fail_now(&mut self, message: impl Into<String>) {
        self.state = FlowState::Failed(message.into());
    }

    /// Back action: discards the held result or error and re-arms the flow.
    /// Bumps the epoch so any still-pending response lands stale.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = FlowState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut flow: RequestFlow<String> = RequestFlow::new();
        assert_eq!(*flow.state(), FlowState::Idle);

        let epoch = flow.begin_submit().unwrap();
        assert!(flow.is_submitting());

        flow.complete(epoch, Ok("Rawon".to_string()));
        assert_eq!(*flow.state(), FlowState::Success("Rawon".to_string()));

        flow.reset();
        assert_eq!(*flow.state(), FlowState::Idle);
    }

    #[test]
    fn test_submit_guard_while_in_flight() {
        let mut flow: RequestFlow<u32> = RequestFlow::new();
        let epoch = flow.begin_submit().unwrap();
        assert_eq!(flow.begin_submit(), None);
        assert!(flow.is_submitting());

        flow.complete(epoch, Err("HTTP error! status: 500".to_string()));
        // Failed allows resubmission.
        assert!(flow.begin_submit().is_some());
    }

    #[test]
    fn test_submit_blocked_on_success_until_reset() {
        let mut flow: RequestFlow<u32> = RequestFlow::new();
        let epoch = flow.begin_submit().unwrap();
        flow.complete(epoch, Ok(7));
        assert_eq!(flow.begin_submit(), None);

        flow.reset();
        assert!(flow.begin_submit().is_some());
    }

    #[test]
    fn test_stale_epoch_discarded_after_reset() {
        let mut flow: RequestFlow<u32> = RequestFlow::new();
        let epoch = flow.begin_submit().unwrap();

        // User backs out while the request is still pending.
        flow.reset();
        assert_eq!(*flow.state(), FlowState::Idle);

        flow.complete(epoch, Ok(42));
        assert_eq!(*flow.state(), FlowState::Idle, "late response must not resurface");
    }

    #[test]
    fn test_fail_now_short_circuit() {
        let mut flow: RequestFlow<u32> = RequestFlow::new();
        flow.fail_now("Pilih gambar makanan terlebih dahulu.");
        assert_eq!(
            *flow.state(),
            FlowState::Failed("Pilih gambar makanan terlebih dahulu.".to_string())
        );
    }
}
