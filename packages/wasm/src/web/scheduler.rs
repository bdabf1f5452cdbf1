//! Browser [`Scheduler`]: microtask spawning, timers, animation frames.

use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Performance, Window};

use crate::lifecycle::Scheduler;

/// Scheduler backed by the page's event loop.
#[derive(Debug, Clone, Default)]
pub struct WebScheduler {
    performance: Option<Performance>,
}

impl WebScheduler {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|window| window.performance()),
        }
    }
}

/// Cancels a pending animation frame when dropped.
struct FrameRequest {
    window: Window,
    handle: i32,
    _callback: Closure<dyn FnMut(f64)>,
}

impl Drop for FrameRequest {
    fn drop(&mut self) {
        // No-op once the frame has fired.
        let _ = self.window.cancel_animation_frame(self.handle);
    }
}

impl Scheduler for WebScheduler {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        // Dropping a gloo TimeoutFuture clears the timeout.
        Box::pin(gloo_timers::future::sleep(duration))
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, f64> {
        let now = self.now_ms();
        let Some(window) = web_sys::window() else {
            return Box::pin(future::ready(now));
        };

        let (fired, frame) = oneshot::channel();
        let callback: Closure<dyn FnMut(f64)> = Closure::once(move |timestamp: f64| {
            let _ = fired.send(timestamp);
        });
        let handle = match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => handle,
            Err(_) => return Box::pin(future::ready(now)),
        };
        let request = FrameRequest {
            window,
            handle,
            _callback: callback,
        };

        Box::pin(async move {
            let timestamp = frame.await.unwrap_or(now);
            drop(request);
            timestamp
        })
    }

    fn now_ms(&self) -> f64 {
        self.performance
            .as_ref()
            .map_or_else(js_sys::Date::now, Performance::now)
    }
}
