//! Test support: a manual clock scheduler, a channel-backed transport, and
//! sample issues.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::error::LayoutError;
use crate::issue::{Comments, Issue, IssueId, Label};
use crate::layout::remote::{LayoutTransport, RemoteLayoutRequest, RemoteLayoutResponse};
use crate::lifecycle::Scheduler;

/// Interval between animation frames on the manual clock.
pub const FRAME_MS: f64 = 16.0;

struct Timer {
    due: f64,
    seq: u64,
    fire: oneshot::Sender<()>,
}

/// A scheduler whose clock only moves when the test advances it.
pub struct ManualScheduler {
    spawner: LocalSpawner,
    now: Rc<Cell<f64>>,
    timers: RefCell<Vec<Timer>>,
    next_seq: Cell<u64>,
}

impl ManualScheduler {
    /// Remove and return the earliest timer due at or before `limit`.
    fn pop_due(&self, limit: f64) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        let slot = timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= limit)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(timers.remove(slot))
    }
}

impl Scheduler for ManualScheduler {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawner
            .spawn_local(task)
            .expect("local pool accepts tasks");
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let (fire, wait) = oneshot::channel();
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now.get() + duration.as_millis() as f64,
            seq,
            fire,
        });
        Box::pin(async move {
            let _ = wait.await;
        })
    }

    fn next_frame(&self) -> LocalBoxFuture<'static, f64> {
        let sleep = self.sleep(Duration::from_millis(FRAME_MS as u64));
        let now = self.now.clone();
        Box::pin(async move {
            sleep.await;
            now.get()
        })
    }

    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// A local executor plus the manual scheduler feeding it.
pub struct TestRuntime {
    pool: LocalPool,
    scheduler: Rc<ManualScheduler>,
}

impl TestRuntime {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let scheduler = Rc::new(ManualScheduler {
            spawner: pool.spawner(),
            now: Rc::new(Cell::new(0.0)),
            timers: RefCell::new(Vec::new()),
            next_seq: Cell::new(0),
        });
        Self { pool, scheduler }
    }

    pub fn scheduler(&self) -> Rc<dyn Scheduler> {
        self.scheduler.clone()
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now.get()
    }

    pub fn spawn(&self, task: impl Future<Output = ()> + 'static) {
        self.scheduler.spawn(Box::pin(task));
    }

    /// Poll every task until none can make progress.
    pub fn run(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Move the clock forward, firing timers in deadline order.
    pub fn advance(&mut self, ms: f64) {
        let target = self.now() + ms;
        loop {
            self.pool.run_until_stalled();
            let Some(timer) = self.scheduler.pop_due(target) else {
                break;
            };
            self.scheduler.now.set(timer.due.max(self.now()));
            let _ = timer.fire.send(());
        }
        self.scheduler.now.set(target);
        self.pool.run_until_stalled();
    }
}

struct Pending {
    request: RemoteLayoutRequest,
    reply: Option<oneshot::Sender<Result<RemoteLayoutResponse, LayoutError>>>,
}

/// A transport whose requests stay pending until the test answers them.
#[derive(Default)]
pub struct ChannelTransport {
    pending: RefCell<Vec<Pending>>,
}

impl ChannelTransport {
    pub fn request_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn request(&self, index: usize) -> RemoteLayoutRequest {
        self.pending.borrow()[index].request.clone()
    }

    /// Answer request `index`. Returns false if the request was cancelled.
    pub fn respond(
        &self,
        index: usize,
        result: Result<RemoteLayoutResponse, LayoutError>,
    ) -> bool {
        let reply = self.pending.borrow_mut()[index].reply.take();
        match reply {
            Some(reply) => reply.send(result).is_ok(),
            None => false,
        }
    }

    /// True once the future for request `index` has been dropped unanswered.
    pub fn is_cancelled(&self, index: usize) -> bool {
        self.pending.borrow()[index]
            .reply
            .as_ref()
            .is_none_or(|reply| reply.is_canceled())
    }
}

impl LayoutTransport for ChannelTransport {
    fn send(
        &self,
        request: &RemoteLayoutRequest,
    ) -> LocalBoxFuture<'static, Result<RemoteLayoutResponse, LayoutError>> {
        let (reply, answer) = oneshot::channel();
        self.pending.borrow_mut().push(Pending {
            request: request.clone(),
            reply: Some(reply),
        });
        Box::pin(async move {
            answer
                .await
                .unwrap_or_else(|_| Err(LayoutError::Transport("reply dropped".into())))
        })
    }
}

pub fn issue(number: u64, label: Option<(&str, &str)>) -> Issue {
    Issue {
        number: IssueId(number),
        title: format!("Issue {number}"),
        url: format!("https://example.test/issues/{number}"),
        labels: label
            .map(|(name, color)| Label {
                name: name.into(),
                color: color.into(),
            })
            .into_iter()
            .collect(),
        comments: Comments::default(),
    }
}

/// Three `bug` issues, two `docs` issues, one unlabeled.
pub fn example_issues() -> Vec<Issue> {
    vec![
        issue(1, Some(("bug", "#ff0000"))),
        issue(2, Some(("bug", "#ff0000"))),
        issue(3, Some(("bug", "#ff0000"))),
        issue(4, Some(("docs", "#00ff00"))),
        issue(5, Some(("docs", "#00ff00"))),
        issue(6, None),
    ]
}

/// A well-formed response: five of the example issues across two clusters.
pub fn remote_response_json() -> String {
    r##"{
        "clusters": [
            {"name": "bug", "color": "#ff0000", "count": 3, "x": 200, "y": 300},
            {"name": "docs", "color": "#00ff00", "count": 2, "x": 500, "y": 300}
        ],
        "nodes": [
            {"id": "issue-1", "cluster": "bug", "color": "#ff0000", "x": 180, "y": 290, "radius": 6,
             "issue": {"number": 1, "title": "Issue 1", "url": "https://example.test/issues/1", "commentCount": 0}},
            {"id": "issue-2", "cluster": "bug", "color": "#ff0000", "x": 220, "y": 290, "radius": 6,
             "issue": {"number": 2, "title": "Issue 2", "url": "https://example.test/issues/2", "commentCount": 0}},
            {"id": "issue-3", "cluster": "bug", "color": "#ff0000", "x": 200, "y": 330, "radius": 6,
             "issue": {"number": 3, "title": "Issue 3", "url": "https://example.test/issues/3", "commentCount": 0}},
            {"id": "issue-4", "cluster": "docs", "color": "#00ff00", "x": 480, "y": 300, "radius": 6,
             "issue": {"number": 4, "title": "Issue 4", "url": "https://example.test/issues/4", "commentCount": 0}},
            {"id": "issue-5", "cluster": "docs", "color": "#00ff00", "x": 520, "y": 300, "radius": 6,
             "issue": {"number": 5, "title": "Issue 5", "url": "https://example.test/issues/5", "commentCount": 0}}
        ],
        "meta": {"totalIssues": 6, "processedIssues": 5, "computeTimeMs": 12.5}
    }"##
    .to_string()
}
