use std::sync::{Arc, Mutex};

use hermes_core::{ProgressInfo, UpdateChannel, UpdateEvent, UpdateHub, UpdateInfo};
use serde_json::Map;

fn info(version: &str) -> UpdateInfo {
    UpdateInfo {
        version: version.to_string(),
        release_date: None,
        extra: Map::new(),
    }
}

fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> impl Fn(&UpdateEvent) + Send + Sync {
    let log = Arc::clone(log);
    move |event: &UpdateEvent| {
        log.lock()
            .unwrap()
            .push(format!("{tag}:{}", event.channel().as_str()));
    }
}

#[test]
fn events_reach_only_their_channel() {
    let hub = UpdateHub::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    hub.subscribe(UpdateChannel::Available, recorder(&log, "a")).unwrap();
    hub.subscribe(UpdateChannel::Progress, recorder(&log, "p")).unwrap();

    assert_eq!(hub.publish(&UpdateEvent::Available(info("2.0.0"))).unwrap(), 1);
    assert_eq!(
        hub.publish(&UpdateEvent::Progress(ProgressInfo {
            percent: 10.0,
            bytes_per_second: None,
            total: None,
            transferred: None,
        }))
        .unwrap(),
        1
    );
    assert_eq!(hub.publish(&UpdateEvent::CheckStarted).unwrap(), 0);

    assert_eq!(
        *log.lock().unwrap(),
        vec!["a:update-available", "p:update-progress"]
    );
}

#[test]
fn unsubscribe_removes_exactly_one_listener() {
    let hub = UpdateHub::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let first = hub.subscribe(UpdateChannel::Downloaded, recorder(&log, "first")).unwrap();
    hub.subscribe(UpdateChannel::Downloaded, recorder(&log, "second")).unwrap();
    hub.subscribe(UpdateChannel::Error, recorder(&log, "other")).unwrap();

    assert!(hub.unsubscribe(first).unwrap());
    assert!(!hub.unsubscribe(first).unwrap());

    hub.publish(&UpdateEvent::Downloaded(info("2.0.0"))).unwrap();
    hub.publish(&UpdateEvent::Error("checksum mismatch".to_string())).unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["second:update-downloaded", "other:update-error"]
    );
    assert_eq!(hub.listener_count(UpdateChannel::Downloaded).unwrap(), 1);
}

#[test]
fn clearing_one_channel_leaves_the_others() {
    let hub = UpdateHub::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    hub.subscribe(UpdateChannel::Available, recorder(&log, "a")).unwrap();
    hub.subscribe(UpdateChannel::Available, recorder(&log, "b")).unwrap();
    hub.subscribe(UpdateChannel::CheckStarted, recorder(&log, "c")).unwrap();

    hub.unsubscribe_all(UpdateChannel::Available).unwrap();

    assert_eq!(hub.listener_count(UpdateChannel::Available).unwrap(), 0);
    assert_eq!(hub.listener_count(UpdateChannel::CheckStarted).unwrap(), 1);

    hub.clear_update_listeners().unwrap();
    for channel in UpdateChannel::ALL {
        assert_eq!(hub.listener_count(channel).unwrap(), 0);
    }
}

#[test]
fn listener_may_unsubscribe_itself_while_handling() {
    let hub = Arc::new(UpdateHub::new());
    let calls = Arc::new(Mutex::new(0));
    let own_id = Arc::new(Mutex::new(None));

    let id = {
        let hub_in_listener = Arc::clone(&hub);
        let calls = Arc::clone(&calls);
        let own_id = Arc::clone(&own_id);
        hub.subscribe(UpdateChannel::Available, move |_| {
            *calls.lock().unwrap() += 1;
            if let Some(id) = *own_id.lock().unwrap() {
                hub_in_listener.unsubscribe(id).unwrap();
            }
        })
        .unwrap()
    };
    *own_id.lock().unwrap() = Some(id);

    hub.publish(&UpdateEvent::Available(info("3.0.0"))).unwrap();
    hub.publish(&UpdateEvent::Available(info("3.0.1"))).unwrap();

    assert_eq!(*calls.lock().unwrap(), 1);
}
