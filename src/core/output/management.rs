//! Output configuration requests.
//!
//! An *apply* request is validated head by head and written to the devices in
//! one go. A *test* request is applied live as a preview: the previous state is
//! kept in an [`OutputConfigTransaction`] until the requester confirms it,
//! cancels it, or the test timer fires. At most one test is live at a time.

use super::*;
use crate::core::errors::{CoreError, Result};
use crate::core::runtime::{TimerId, TimerKind, TimerQueue};
use crate::platform::api::Host;

/// A live test configuration and what to restore if it is not confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfigTransaction {
    pub request: ConfigRequestId,
    pub old_config: OutputConfiguration,
    pub new_config: OutputConfiguration,
    pub timer: TimerId,
}

impl OutputManager {
    // =========================================================================
    // Requests
    // =========================================================================

    /// Validate and permanently apply `config`, reporting the result to
    /// `request`.
    pub fn apply_configuration(
        &mut self,
        request: ConfigRequestId,
        config: &OutputConfiguration,
        host: &mut dyn Host,
    ) -> Result<()> {
        let result = self
            .validate(config, &*host)
            .and_then(|()| self.apply_heads(config, host));
        self.report(request, &result);
        result
    }

    /// Validate and apply `config` as a preview that reverts on its own unless
    /// confirmed in time.
    pub fn test_configuration(
        &mut self,
        request: ConfigRequestId,
        config: &OutputConfiguration,
        host: &mut dyn Host,
        timers: &mut TimerQueue,
    ) -> Result<()> {
        if let Some(pending) = &self.pending_test {
            tracing::warn!(
                "Rejecting output test {:?}: test {:?} is still pending",
                request, pending.request
            );
            let result = Err(CoreError::OutputTestPending);
            self.report(request, &result);
            return result;
        }

        if let Err(err) = self.validate(config, &*host) {
            let result = Err(err);
            self.report(request, &result);
            return result;
        }

        let old_config = self.current_configuration();
        if let Err(err) = self.apply_heads(config, host) {
            let result = Err(err);
            self.report(request, &result);
            return result;
        }

        let timer = timers.arm(self.test_timeout, TimerKind::OutputTestTimeout);
        tracing::info!(
            "Output test {:?} applied, reverting in {:?} unless confirmed",
            request, self.test_timeout
        );
        self.pending_test = Some(OutputConfigTransaction {
            request,
            old_config,
            new_config: config.clone(),
            timer,
        });
        Ok(())
    }

    /// Keep the tested configuration.
    pub fn confirm_test(&mut self, timers: &mut TimerQueue) -> Result<()> {
        let transaction = self.pending_test.take().ok_or(CoreError::NoPendingTest)?;
        timers.cancel(transaction.timer);
        tracing::info!("Output test {:?} confirmed", transaction.request);
        self.report(transaction.request, &Ok(()));
        Ok(())
    }

    /// Drop the tested configuration and restore the previous one.
    pub fn cancel_test(&mut self, host: &mut dyn Host, timers: &mut TimerQueue) -> Result<()> {
        let transaction = self.pending_test.take().ok_or(CoreError::NoPendingTest)?;
        tracing::info!("Output test {:?} cancelled", transaction.request);
        self.revert(transaction, host, timers);
        Ok(())
    }

    /// Called when an output test timer expires.
    ///
    /// Timers that no longer belong to the pending test are ignored.
    pub fn handle_test_timeout(
        &mut self,
        timer: TimerId,
        host: &mut dyn Host,
        timers: &mut TimerQueue,
    ) {
        match &self.pending_test {
            Some(pending) if pending.timer == timer => {}
            _ => {
                tracing::debug!("Ignoring stale output test timer {:?}", timer);
                return;
            }
        }
        if let Some(transaction) = self.pending_test.take() {
            tracing::warn!(
                "Output test {:?} was not confirmed in time, reverting",
                transaction.request
            );
            self.revert(transaction, host, timers);
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn revert(
        &mut self,
        transaction: OutputConfigTransaction,
        host: &mut dyn Host,
        timers: &mut TimerQueue,
    ) {
        timers.cancel(transaction.timer);
        self.restore_heads(&transaction.old_config, host);
        self.events.push(CompositorEvent::OutputConfigurationFailed {
            request: transaction.request,
        });
    }

    /// Put back every head of `config` whose output is still connected.
    ///
    /// Unlike [`apply_heads`](Self::apply_heads) this never rolls back: a head
    /// that fails to commit is logged and the others are still restored.
    fn restore_heads(&mut self, config: &OutputConfiguration, host: &mut dyn Host) {
        self.applying = true;
        for head in &config.heads {
            if self.find(Some(head.output)).is_none() {
                tracing::debug!("Output {:?} is gone, not restoring it", head.output);
                continue;
            }
            if let Err(err) = self.apply_head(head, host) {
                tracing::error!("Could not restore output {:?}: {}", head.output, err);
            }
        }
        self.applying = false;
        self.layout_changed();
    }

    fn report(&mut self, request: ConfigRequestId, result: &Result<()>) {
        let event = match result {
            Ok(()) => CompositorEvent::OutputConfigurationSucceeded { request },
            Err(_) => CompositorEvent::OutputConfigurationFailed { request },
        };
        self.events.push(event);
    }

    /// Check every head against its device. All heads are checked even after
    /// a failure so that each rejection gets logged.
    fn validate(&self, config: &OutputConfiguration, host: &dyn Host) -> Result<()> {
        let mut first_error = None;
        for head in &config.heads {
            let ok = match self.find(Some(head.output)) {
                Some(output) => {
                    let accepted = host.test_output(output, head);
                    if !accepted {
                        tracing::warn!("Output {} rejected {:?}", output.name, head);
                    }
                    accepted.then_some(()).ok_or(CoreError::OutputHeadRejected(head.output))
                }
                None => {
                    tracing::warn!("Configuration names unknown output {:?}", head.output);
                    Err(CoreError::UnknownOutput(head.output))
                }
            };
            if let Err(err) = ok {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Write every head to its device. On a failed commit the heads already
    /// written are put back as they were.
    ///
    /// Layout notifications are held back for the duration and a single one
    /// is published afterwards.
    fn apply_heads(&mut self, config: &OutputConfiguration, host: &mut dyn Host) -> Result<()> {
        let snapshot = self.current_configuration();
        self.applying = true;

        let mut written = Vec::new();
        let mut result = Ok(());
        for head in &config.heads {
            match self.apply_head(head, host) {
                Ok(()) => written.push(head.output),
                Err(err) => {
                    result = Err(err);
                    break;
                }
            }
        }

        if result.is_err() {
            for id in written.iter().rev() {
                if let Some(previous) = snapshot.head(*id) {
                    if let Err(err) = self.apply_head(previous, host) {
                        tracing::error!("Could not restore output {:?}: {}", id, err);
                    }
                }
            }
        }

        self.applying = false;
        self.layout_changed();
        result
    }

    fn apply_head(&mut self, head: &HeadState, host: &mut dyn Host) -> Result<()> {
        let output = self
            .find(Some(head.output))
            .ok_or(CoreError::UnknownOutput(head.output))?;
        if !host.commit_output(output, head) {
            tracing::warn!("Output {} failed to commit {:?}", output.name, head);
            return Err(CoreError::OutputCommitFailed(head.output));
        }

        let was_in_layout = output.position.is_some();
        if let Some(output) = self.find_mut(head.output) {
            output.enabled = head.enabled;
            if head.enabled {
                if head.mode.is_some() {
                    output.current_mode = head.mode;
                }
                output.scale = head.scale;
                output.transform = head.transform;
            }
        }

        match (head.enabled, was_in_layout) {
            (true, _) => self.layout_move(head.output, head.x, head.y),
            (false, true) => self.layout_remove(head.output),
            (false, false) => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessHost;
    use std::time::Duration;

    fn setup() -> (OutputManager, HeadlessHost, TimerQueue) {
        let mut host = HeadlessHost::new();
        let mut outputs = OutputManager::default();
        for (id, width) in [(1, 1920), (2, 1280)] {
            let info = OutputInfo {
                id: OutputId(id),
                name: format!("OUT-{}", id),
                description: String::new(),
                modes: vec![
                    Mode::new(width, 1080, 60_000).preferred(),
                    Mode::new(800, 600, 60_000),
                ],
            };
            outputs.add_output(info, &mut host).unwrap();
        }
        outputs.take_events();
        (outputs, host, TimerQueue::new())
    }

    fn small_config() -> OutputConfiguration {
        OutputConfiguration::new(vec![
            HeadState::enabled(OutputId(1), ModeSetting::Preset(Mode::new(800, 600, 60_000)), 0, 0),
            HeadState::enabled(OutputId(2), ModeSetting::Preset(Mode::new(800, 600, 60_000)), 800, 0),
        ])
    }

    #[test]
    fn test_apply_reports_success_once() {
        let (mut outputs, mut host, _) = setup();
        outputs
            .apply_configuration(ConfigRequestId(1), &small_config(), &mut host)
            .unwrap();

        assert_eq!(outputs.find(Some(OutputId(2))).unwrap().position, Some((800, 0)));
        let events = outputs.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CompositorEvent::OutputConfigurationChanged { .. }));
        assert_eq!(
            events[1],
            CompositorEvent::OutputConfigurationSucceeded { request: ConfigRequestId(1) }
        );
        assert!(!outputs.applying);
    }

    #[test]
    fn test_apply_with_rejected_head_commits_nothing() {
        let (mut outputs, mut host, _) = setup();
        let before = outputs.current_configuration();
        host.reject_output(OutputId(2));

        let result = outputs.apply_configuration(ConfigRequestId(4), &small_config(), &mut host);
        assert_eq!(result, Err(CoreError::OutputHeadRejected(OutputId(2))));
        assert_eq!(outputs.current_configuration(), before);
        assert_eq!(
            outputs.take_events(),
            vec![CompositorEvent::OutputConfigurationFailed { request: ConfigRequestId(4) }]
        );
    }

    #[test]
    fn test_commit_failure_restores_written_heads() {
        let (mut outputs, mut host, _) = setup();
        let before = outputs.current_configuration();
        host.fail_commits_for(OutputId(2));

        assert!(outputs
            .apply_configuration(ConfigRequestId(5), &small_config(), &mut host)
            .is_err());
        assert_eq!(outputs.current_configuration(), before);
    }

    #[test]
    fn test_second_test_is_rejected() {
        let (mut outputs, mut host, mut timers) = setup();
        outputs
            .test_configuration(ConfigRequestId(1), &small_config(), &mut host, &mut timers)
            .unwrap();
        let pending = outputs.pending_test.clone();
        outputs.take_events();

        let result =
            outputs.test_configuration(ConfigRequestId(2), &small_config(), &mut host, &mut timers);
        assert_eq!(result, Err(CoreError::OutputTestPending));
        assert_eq!(outputs.pending_test, pending);
        assert_eq!(
            outputs.take_events(),
            vec![CompositorEvent::OutputConfigurationFailed { request: ConfigRequestId(2) }]
        );
    }

    #[test]
    fn test_confirm_keeps_new_state() {
        let (mut outputs, mut host, mut timers) = setup();
        outputs
            .test_configuration(ConfigRequestId(1), &small_config(), &mut host, &mut timers)
            .unwrap();
        outputs.confirm_test(&mut timers).unwrap();

        assert!(outputs.pending_test.is_none());
        assert!(timers.next_deadline().is_none());
        assert_eq!(outputs.find(Some(OutputId(1))).unwrap().resolution(), (800, 600));
        assert_eq!(outputs.confirm_test(&mut timers), Err(CoreError::NoPendingTest));
    }

    #[test]
    fn test_cancel_restores_snapshot() {
        let (mut outputs, mut host, mut timers) = setup();
        let before = outputs.current_configuration();
        outputs
            .test_configuration(ConfigRequestId(9), &small_config(), &mut host, &mut timers)
            .unwrap();
        outputs.take_events();

        outputs.cancel_test(&mut host, &mut timers).unwrap();
        assert_eq!(outputs.current_configuration(), before);
        assert!(outputs
            .take_events()
            .contains(&CompositorEvent::OutputConfigurationFailed { request: ConfigRequestId(9) }));
    }

    #[test]
    fn test_timeout_reverts_and_stale_timer_is_ignored() {
        let (mut outputs, mut host, mut timers) = setup();
        let before = outputs.current_configuration();
        outputs
            .test_configuration(ConfigRequestId(3), &small_config(), &mut host, &mut timers)
            .unwrap();
        let timer = outputs.pending_test.as_ref().unwrap().timer;

        outputs.handle_test_timeout(TimerId(timer.0 + 100), &mut host, &mut timers);
        assert!(outputs.pending_test.is_some());

        let deadline = timers.next_deadline().unwrap();
        let fired = timers.take_expired(deadline + Duration::from_millis(1));
        assert_eq!(fired, vec![(timer, TimerKind::OutputTestTimeout)]);
        outputs.handle_test_timeout(timer, &mut host, &mut timers);

        assert!(outputs.pending_test.is_none());
        assert_eq!(outputs.current_configuration(), before);
        // Firing again after the revert does nothing.
        outputs.take_events();
        outputs.handle_test_timeout(timer, &mut host, &mut timers);
        assert!(outputs.take_events().is_empty());
    }

    #[test]
    fn test_cancel_after_unplug_restores_remaining_outputs() {
        let (mut outputs, mut host, mut timers) = setup();
        let before = outputs.find(Some(OutputId(2))).unwrap().clone();
        outputs
            .test_configuration(ConfigRequestId(6), &small_config(), &mut host, &mut timers)
            .unwrap();
        outputs.remove_output(OutputId(1)).unwrap();

        outputs.cancel_test(&mut host, &mut timers).unwrap();
        let after = outputs.find(Some(OutputId(2))).unwrap();
        assert_eq!(after.resolution(), before.resolution());
        assert_eq!(after.position, before.position);
        assert_eq!(after.head_state(), before.head_state());
    }

    #[test]
    fn test_timeout_after_unplug_restores_remaining_outputs() {
        let (mut outputs, mut host, mut timers) = setup();
        let before = outputs.find(Some(OutputId(1))).unwrap().head_state();
        outputs
            .test_configuration(ConfigRequestId(7), &small_config(), &mut host, &mut timers)
            .unwrap();
        outputs.remove_output(OutputId(2)).unwrap();
        outputs.take_events();

        let timer = outputs.pending_test.as_ref().unwrap().timer;
        outputs.handle_test_timeout(timer, &mut host, &mut timers);
        assert_eq!(outputs.find(Some(OutputId(1))).unwrap().head_state(), before);
        assert!(outputs
            .take_events()
            .contains(&CompositorEvent::OutputConfigurationFailed { request: ConfigRequestId(7) }));
    }

    #[test]
    fn test_revert_keeps_going_past_a_failed_commit() {
        let (mut outputs, mut host, mut timers) = setup();
        let before = outputs.find(Some(OutputId(2))).unwrap().head_state();
        outputs
            .test_configuration(ConfigRequestId(8), &small_config(), &mut host, &mut timers)
            .unwrap();
        host.fail_commits_for(OutputId(1));

        outputs.cancel_test(&mut host, &mut timers).unwrap();
        assert_eq!(outputs.find(Some(OutputId(2))).unwrap().head_state(), before);
        assert_eq!(outputs.find(Some(OutputId(1))).unwrap().resolution(), (800, 600));
    }
}
