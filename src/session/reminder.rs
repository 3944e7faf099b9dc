use crate::config::Config;
use crate::session::{Notice, NoticeManager};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Returns `true` if any server has at least one environment variable.
pub fn has_env_entries(config: &Config) -> bool {
    config
        .mcp_servers
        .values()
        .filter_map(|server| server.env_vars())
        .any(|env| !env.is_empty())
}

/// One-shot reminder to clear sensitive data after it has sat in the document.
///
/// An episode starts when [`observe`](Self::observe) first sees the
/// condition hold and ends when it sees it go away. The reminder fires at
/// most once per episode; ending the episode cancels a reminder that has not
/// fired yet. Like the clipboard clear, this is a hint to the user and
/// nothing more.
#[derive(Debug)]
pub struct SecretsReminder {
    /// Dwell time before the reminder fires
    after: Duration,
    /// Whether the condition currently holds
    episode: bool,
    /// Pending reminder task
    task: Option<JoinHandle<()>>,
}

impl SecretsReminder {
    /// Create a reminder firing `after` the condition starts to hold.
    pub fn new(after: Duration) -> Self {
        Self {
            after,
            episode: false,
            task: None,
        }
    }

    /// Feeds the current condition after each document change.
    pub fn observe(&mut self, sensitive: bool, notices: &NoticeManager) {
        match (self.episode, sensitive) {
            (false, true) => {
                // Without a runtime the episode stays closed so a later call can arm it.
                self.episode = self.arm(notices.clone());
            }
            (true, false) => {
                tracing::debug!("Sensitive data gone, cancelling reminder");
                self.episode = false;
                self.cancel();
            }
            _ => {}
        }
    }

    /// Spawns the reminder task; returns `false` when there is no runtime to spawn on.
    fn arm(&mut self, notices: NoticeManager) -> bool {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!("No tokio runtime, sensitive data reminder disabled");
                return false;
            }
        };

        tracing::debug!(delay_secs = self.after.as_secs(), "Arming sensitive data reminder");
        let after = self.after;
        self.task = Some(handle.spawn(async move {
            tokio::time::sleep(after).await;
            notices.send(Notice::ClearSensitiveData);
        }));
        true
    }

    /// Returns `true` while a reminder is waiting to fire.
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Cancels the pending reminder without ending the episode.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for SecretsReminder {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const DWELL: Duration = Duration::from_secs(30 * 60);

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_episode() {
        let notices = NoticeManager::new(4);
        let mut rx = notices.subscribe();
        let mut reminder = SecretsReminder::new(DWELL);

        reminder.observe(true, &notices);
        assert!(reminder.is_armed());

        // Nothing before the dwell time has passed.
        assert!(timeout(DWELL - Duration::from_secs(60), rx.recv()).await.is_err());
        assert_eq!(rx.recv().await.unwrap(), Notice::ClearSensitiveData);

        // Still the same episode: no second reminder.
        reminder.observe(true, &notices);
        assert!(timeout(DWELL * 2, rx.recv()).await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_when_condition_clears() {
        let notices = NoticeManager::new(4);
        let mut rx = notices.subscribe();
        let mut reminder = SecretsReminder::new(DWELL);

        reminder.observe(true, &notices);
        reminder.observe(false, &notices);
        assert!(!reminder.is_armed());
        assert!(timeout(DWELL * 2, rx.recv()).await.is_err());

        // A new episode arms again.
        reminder.observe(true, &notices);
        assert_eq!(rx.recv().await.unwrap(), Notice::ClearSensitiveData);
    }

    #[test]
    fn test_without_runtime_is_inert() {
        let notices = NoticeManager::new(1);
        let mut reminder = SecretsReminder::new(DWELL);
        reminder.observe(true, &notices);
        assert!(!reminder.is_armed());
    }

    #[test]
    fn test_arms_once_a_runtime_is_available() {
        let notices = NoticeManager::new(1);
        let mut reminder = SecretsReminder::new(DWELL);
        reminder.observe(true, &notices);
        assert!(!reminder.is_armed());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        runtime.block_on(async {
            reminder.observe(true, &notices);
            assert!(reminder.is_armed());
        });
    }
}
