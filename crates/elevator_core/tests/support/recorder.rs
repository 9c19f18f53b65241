#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use elevator_core::events::{EventSink, SystemEvent};

/// Collects every event pushed to the sinks it hands out.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<SystemEvent>>>,
}

impl Recorder {
    pub fn sink(&self) -> Box<dyn EventSink> {
        let events = Arc::clone(&self.events);
        Box::new(move |event: &SystemEvent| {
            events.lock().expect("recorder lock").push(event.clone());
        })
    }

    pub fn events(&self) -> Vec<SystemEvent> {
        self.events.lock().expect("recorder lock").clone()
    }

    pub fn take(&self) -> Vec<SystemEvent> {
        std::mem::take(&mut *self.events.lock().expect("recorder lock"))
    }
}
