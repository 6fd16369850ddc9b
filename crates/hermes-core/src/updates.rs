//! Update-lifecycle notifications pushed from the privileged side to the
//! presentation side.
//!
//! Delivery is fire-and-forget: [`UpdateHub::publish`] calls every listener
//! subscribed to the event's channel and expects nothing back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{HermesResult, LockResultExt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressInfo {
    pub percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_per_second: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateChannel {
    CheckStarted,
    Available,
    Progress,
    Downloaded,
    Error,
}

impl UpdateChannel {
    pub const ALL: [UpdateChannel; 5] = [
        UpdateChannel::CheckStarted,
        UpdateChannel::Available,
        UpdateChannel::Progress,
        UpdateChannel::Downloaded,
        UpdateChannel::Error,
    ];

    /// Event name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateChannel::CheckStarted => "update-checking",
            UpdateChannel::Available => "update-available",
            UpdateChannel::Progress => "update-progress",
            UpdateChannel::Downloaded => "update-downloaded",
            UpdateChannel::Error => "update-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateEvent {
    CheckStarted,
    Available(UpdateInfo),
    Progress(ProgressInfo),
    Downloaded(UpdateInfo),
    Error(String),
}

impl UpdateEvent {
    pub fn channel(&self) -> UpdateChannel {
        match self {
            UpdateEvent::CheckStarted => UpdateChannel::CheckStarted,
            UpdateEvent::Available(_) => UpdateChannel::Available,
            UpdateEvent::Progress(_) => UpdateChannel::Progress,
            UpdateEvent::Downloaded(_) => UpdateChannel::Downloaded,
            UpdateEvent::Error(_) => UpdateChannel::Error,
        }
    }

    /// JSON payload sent alongside the channel name.
    pub fn payload(&self) -> Value {
        let payload = match self {
            UpdateEvent::CheckStarted => Ok(Value::Null),
            UpdateEvent::Available(info) | UpdateEvent::Downloaded(info) => {
                serde_json::to_value(info)
            }
            UpdateEvent::Progress(progress) => serde_json::to_value(progress),
            UpdateEvent::Error(message) => Ok(Value::String(message.clone())),
        };
        payload.unwrap_or(Value::Null)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(&UpdateEvent) + Send + Sync>;

#[derive(Default)]
pub struct UpdateHub {
    next_id: AtomicU64,
    listeners: Mutex<HashMap<UpdateChannel, Vec<(ListenerId, Listener)>>>,
}

impl std::fmt::Debug for UpdateHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateHub").finish_non_exhaustive()
    }
}

impl UpdateHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, channel: UpdateChannel, listener: F) -> HermesResult<ListenerId>
    where
        F: Fn(&UpdateEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .lock()
            .map_lock_err("update listeners")?
            .entry(channel)
            .or_default()
            .push((id, Arc::new(listener)));
        Ok(id)
    }

    /// Removes exactly the listener registered under `id`. Returns whether it
    /// was still subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> HermesResult<bool> {
        let mut listeners = self.listeners.lock().map_lock_err("update listeners")?;
        for entries in listeners.values_mut() {
            if let Some(pos) = entries.iter().position(|(lid, _)| *lid == id) {
                entries.remove(pos);
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn unsubscribe_all(&self, channel: UpdateChannel) -> HermesResult<()> {
        self.listeners
            .lock()
            .map_lock_err("update listeners")?
            .remove(&channel);
        Ok(())
    }

    /// Drops every listener on every update channel.
    pub fn clear_update_listeners(&self) -> HermesResult<()> {
        self.listeners.lock().map_lock_err("update listeners")?.clear();
        Ok(())
    }

    pub fn listener_count(&self, channel: UpdateChannel) -> HermesResult<usize> {
        let listeners = self.listeners.lock().map_lock_err("update listeners")?;
        Ok(listeners.get(&channel).map_or(0, Vec::len))
    }

    /// Delivers `event` to the listeners of its channel. Listeners run after
    /// the registry lock is released, so they may subscribe or unsubscribe.
    pub fn publish(&self, event: &UpdateEvent) -> HermesResult<usize> {
        let targets: Vec<Listener> = {
            let listeners = self.listeners.lock().map_lock_err("update listeners")?;
            listeners
                .get(&event.channel())
                .map(|entries| entries.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default()
        };
        log::debug!("{} -> {} listener(s)", event.channel().as_str(), targets.len());
        for listener in &targets {
            listener(event);
        }
        Ok(targets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_names() {
        let names: Vec<&str> = UpdateChannel::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            [
                "update-checking",
                "update-available",
                "update-progress",
                "update-downloaded",
                "update-error"
            ]
        );
    }

    #[test]
    fn test_payloads_use_camel_case() {
        let progress = UpdateEvent::Progress(ProgressInfo {
            percent: 42.5,
            bytes_per_second: Some(1024),
            total: Some(2048),
            transferred: None,
        });
        assert_eq!(
            progress.payload(),
            json!({"percent": 42.5, "bytesPerSecond": 1024, "total": 2048})
        );

        let info: UpdateInfo =
            serde_json::from_value(json!({"version": "1.2.0", "releaseDate": "2024-05-01", "notes": "fixes"}))
                .unwrap();
        assert_eq!(info.release_date.as_deref(), Some("2024-05-01"));
        assert_eq!(
            UpdateEvent::Downloaded(info).payload(),
            json!({"version": "1.2.0", "releaseDate": "2024-05-01", "notes": "fixes"})
        );
        assert_eq!(UpdateEvent::CheckStarted.payload(), Value::Null);
        assert_eq!(UpdateEvent::Error("offline".into()).payload(), json!("offline"));
    }
}
