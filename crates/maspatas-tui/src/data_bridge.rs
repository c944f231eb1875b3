//! Data bridge: forwards [`Dashboard`] watch channels to TUI actions.
//!
//! Runs as a background task. Sends the current value of every channel
//! once, then one action per change until cancelled.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use maspatas_core::Dashboard;

use crate::action::Action;

pub async fn spawn_data_bridge(
    dashboard: Dashboard,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut snapshot = dashboard.subscribe_snapshot();
    let mut totals = dashboard.subscribe_totals();
    let mut busy = dashboard.subscribe_busy();
    let mut session = dashboard.subscribe_session();
    let mut feedback = dashboard.subscribe_feedback();
    let mut drafts = dashboard.subscribe_drafts();

    // Initial values so every screen has something to draw
    let initial = [
        Action::SnapshotUpdated(snapshot.borrow_and_update().clone()),
        Action::TotalsUpdated(*totals.borrow_and_update()),
        Action::BusyChanged(*busy.borrow_and_update()),
        Action::SessionChanged(*session.borrow_and_update()),
        Action::FeedbackChanged(feedback.borrow_and_update().clone()),
        Action::DraftsUpdated(drafts.borrow_and_update().clone()),
    ];
    for action in initial {
        if action_tx.send(action).is_err() {
            return;
        }
    }

    loop {
        let action = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = snapshot.changed() => {
                Action::SnapshotUpdated(snapshot.borrow_and_update().clone())
            }
            Ok(()) = totals.changed() => Action::TotalsUpdated(*totals.borrow_and_update()),
            Ok(()) = busy.changed() => Action::BusyChanged(*busy.borrow_and_update()),
            Ok(()) = session.changed() => Action::SessionChanged(*session.borrow_and_update()),
            Ok(()) = feedback.changed() => {
                Action::FeedbackChanged(feedback.borrow_and_update().clone())
            }
            Ok(()) = drafts.changed() => Action::DraftsUpdated(drafts.borrow_and_update().clone()),
            else => break,
        };

        if action_tx.send(action).is_err() {
            break;
        }
    }

    debug!("data bridge shut down");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use maspatas_core::{DashboardConfig, Feedback, MemoryCredentialStore};

    use super::*;

    fn dashboard() -> Dashboard {
        let config = DashboardConfig::new("http://127.0.0.1:9/api/".parse().unwrap());
        Dashboard::new(&config, Arc::new(MemoryCredentialStore::new())).unwrap()
    }

    async fn next(rx: &mut mpsc::UnboundedReceiver<Action>) -> Action {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn sends_initial_state_then_changes() {
        let dashboard = dashboard();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(spawn_data_bridge(dashboard.clone(), tx, cancel.clone()));

        for _ in 0..6 {
            let action = next(&mut rx).await;
            assert!(action.is_state_update(), "{action:?}");
        }

        dashboard.edit_client(|c| c.email = "ana@example.com".into());
        match next(&mut rx).await {
            Action::DraftsUpdated(d) => assert_eq!(d.client.email, "ana@example.com"),
            other => panic!("unexpected {other:?}"),
        }

        dashboard.logout().unwrap();
        let mut saw_feedback = false;
        while !saw_feedback {
            if let Action::FeedbackChanged(Feedback::Success(_)) = next(&mut rx).await {
                saw_feedback = true;
            }
        }

        cancel.cancel();
        task.await.unwrap();
    }
}
