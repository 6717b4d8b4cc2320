//! Host input events that count as user activity.
//!
//! Every pointer move, key press, or click restarts the idle countdown. The
//! hooks forward them unconditionally; the controller throttles bursts.

use serde::{Deserialize, Serialize};

use crate::runtime::MascotHandle;

/// An input event observed by the host page or window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// Pointer moved.
    PointerMove { x: f32, y: f32 },
    /// A key went down.
    KeyDown { key: String },
    /// Primary button clicked.
    Click { x: f32, y: f32 },
}

/// Forward a host event to the mascot.
pub fn on_host_event(mascot: &MascotHandle, event: &HostEvent) {
    match event {
        HostEvent::PointerMove { .. } | HostEvent::KeyDown { .. } | HostEvent::Click { .. } => {
            mascot.notify_user_activity();
        }
    }
}

/// Pointer moved.
pub fn on_pointer_move(mascot: &MascotHandle, x: f32, y: f32) {
    on_host_event(mascot, &HostEvent::PointerMove { x, y });
}

/// A key went down.
pub fn on_key_down(mascot: &MascotHandle, key: impl Into<String>) {
    on_host_event(mascot, &HostEvent::KeyDown { key: key.into() });
}

/// Primary button clicked.
pub fn on_click(mascot: &MascotHandle, x: f32, y: f32) {
    on_host_event(mascot, &HostEvent::Click { x, y });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use mascot_core::catalog::EmotionCatalog;
    use mascot_core::config::MascotConfig;
    use mascot_core::types::Timestamp;

    use super::*;

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: HostEvent =
            serde_json::from_str(r#"{"type":"key_down","key":"Enter"}"#).expect("parse");
        assert_eq!(event, HostEvent::KeyDown { key: "Enter".into() });
    }

    #[tokio::test(start_paused = true)]
    async fn bursts_are_throttled_by_the_controller() {
        let mascot = MascotHandle::spawn(&MascotConfig::default(), Arc::new(EmotionCatalog::default()));

        tokio::time::sleep(Duration::from_millis(2_000)).await;
        on_pointer_move(&mascot, 10.0, 20.0);
        tokio::time::sleep(Duration::from_millis(500)).await;
        on_click(&mascot, 10.0, 20.0);
        on_key_down(&mascot, "a");

        let snapshot = mascot.snapshot().await.expect("running");
        // only the first signal re-armed the countdown
        assert_eq!(snapshot.idle_deadline, Some(Timestamp::from_millis(12_000)));
    }
}
