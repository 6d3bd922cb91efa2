//! `proctor live`: drive a manager from a live detection feed.
//!
//! Frames arrive on stdin as JSON lines, are stamped with a monotonic clock
//! and summarized through the perception policy. A separate tokio task calls
//! `tick` on a fixed interval so resumes fire even while frames are dropped.
//! Both paths share the manager behind one mutex.

use std::io::Write;
use std::sync::Arc;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant, interval};

use proctor_core::perception::{Detection, PerceptionPolicy};
use proctor_core::{DetectionManager, ManagerConfig, ViolationCounts};

use crate::controller::{InterviewController, TerminationRecord};

/// One frame from the webcam detector.
#[derive(Debug, Deserialize)]
pub struct LiveFrame {
    #[serde(default = "default_started")]
    pub started: bool,
    #[serde(default)]
    pub detections: Vec<Detection>,
}

fn default_started() -> bool {
    true
}

struct LiveState<W: Write> {
    manager: DetectionManager<InterviewController<W>>,
    clock_start: Instant,
}

impl<W: Write> LiveState<W> {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.clock_start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug)]
pub struct LiveSummary<W> {
    pub counts: ViolationCounts,
    pub termination: Option<TerminationRecord>,
    pub frames: usize,
    pub output: W,
}

pub async fn run_live<R, W>(
    reader: R,
    out: W,
    config: ManagerConfig,
    policy: PerceptionPolicy,
    tick_ms: u64,
) -> anyhow::Result<LiveSummary<W>>
where
    R: AsyncBufRead + Unpin,
    W: Write + Send + 'static,
{
    config.validate()?;
    anyhow::ensure!(tick_ms > 0, "tick interval must be greater than zero");

    let state = Arc::new(Mutex::new(LiveState {
        manager: DetectionManager::new(InterviewController::new(out), config),
        clock_start: Instant::now(),
    }));

    let tick_state = Arc::clone(&state);
    let tick_handle = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(tick_ms));
        loop {
            ticker.tick().await;
            let mut st = tick_state.lock().await;
            let now = st.now_ms();
            st.manager.tick(now);
        }
    });

    let result = read_frames(reader, &state, &policy).await;

    tick_handle.abort();
    let _ = tick_handle.await;

    let frames = result?;
    let state = Arc::try_unwrap(state)
        .map_err(|_| anyhow::anyhow!("live state still shared after shutdown"))?
        .into_inner();

    let counts = state.manager.get_counts();
    let mut controller = state.manager.into_sink();
    controller.finalize_counts(counts);
    if let Some(e) = controller.take_error() {
        return Err(e.into());
    }
    let termination = controller.termination().cloned();

    Ok(LiveSummary {
        counts,
        termination,
        frames,
        output: controller.into_output(),
    })
}

/// Feed frames until EOF, termination, or ctrl-c. Returns frames processed.
async fn read_frames<R, W>(
    reader: R,
    state: &Arc<Mutex<LiveState<W>>>,
    policy: &PerceptionPolicy,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = reader.lines();
    let mut frames = 0;

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("received ctrl-c, stopping");
                break;
            }
        };
        let Some(line) = line else {
            tracing::debug!("detection feed closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let frame: LiveFrame = match serde_json::from_str(&line) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("skipping malformed frame: {e}");
                continue;
            }
        };
        frames += 1;

        let mut st = state.lock().await;
        let now = st.now_ms();
        let snapshot = policy.summarize(&frame.detections, now, frame.started);
        st.manager.tick(now);
        st.manager.process(&snapshot);

        if let Some(e) = st.manager.sink_mut().take_error() {
            return Err(e.into());
        }
        if st.manager.sink().is_ended() {
            tracing::info!("interview terminated, closing detection feed");
            break;
        }
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    fn events(output: &[u8]) -> Vec<serde_json::Value> {
        String::from_utf8(output.to_vec())
            .expect("utf8")
            .lines()
            .map(|l| serde_json::from_str(l).expect("json"))
            .collect()
    }

    #[tokio::test]
    async fn burst_of_phone_frames_warns_once() {
        let input = concat!(
            r#"{"detections":[{"class":"person","score":0.9},{"class":"cell phone","score":0.8}]}"#,
            "\n",
            r#"{"detections":[{"class":"cell phone","score":0.9}]}"#,
            "\n",
            "garbage\n",
            r#"{"detections":[{"class":"cell phone","score":0.9}]}"#,
            "\n",
        );
        let summary = run_live(
            input.as_bytes(),
            Vec::new(),
            ManagerConfig::default(),
            PerceptionPolicy::default(),
            10,
        )
        .await
        .expect("live run");

        assert_eq!(summary.frames, 3);
        assert_eq!(summary.counts.phone, 1);
        assert!(summary.termination.is_none());
        let out = events(&summary.output);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["kind"], "phone");
    }

    #[tokio::test]
    async fn frames_before_start_are_ignored() {
        let input = concat!(
            r#"{"started":false,"detections":[{"class":"person","score":0.9},{"class":"person","score":0.9}]}"#,
            "\n",
        );
        let summary = run_live(
            input.as_bytes(),
            Vec::new(),
            ManagerConfig::default(),
            PerceptionPolicy::default(),
            10,
        )
        .await
        .expect("live run");

        assert_eq!(summary.frames, 1);
        assert_eq!(summary.counts, ViolationCounts::default());
        assert!(summary.output.is_empty());
    }

    #[tokio::test]
    async fn interval_tick_resumes_while_feed_is_idle() {
        let (mut feed, reader) = tokio::io::duplex(1024);
        feed.write_all(b"{\"detections\":[{\"class\":\"cell phone\",\"score\":0.9}]}\n")
            .await
            .expect("write frame");

        // Keep the feed open past the pause so only the tick task can resume.
        let close_feed = async move {
            tokio::time::sleep(Duration::from_millis(60)).await;
            drop(feed);
        };
        let (summary, ()) = tokio::join!(
            run_live(
                tokio::io::BufReader::new(reader),
                Vec::new(),
                ManagerConfig::with_pause_ms(20),
                PerceptionPolicy::default(),
                5,
            ),
            close_feed,
        );
        let summary = summary.expect("live run");

        assert_eq!(summary.frames, 1);
        let kinds: Vec<String> = events(&summary.output)
            .iter()
            .filter_map(|e| e["event"].as_str().map(str::to_string))
            .collect();
        assert_eq!(kinds, vec!["warning", "resume"]);
    }

    #[tokio::test]
    async fn zero_tick_interval_rejected() {
        let result = run_live(
            "".as_bytes(),
            Vec::new(),
            ManagerConfig::default(),
            PerceptionPolicy::default(),
            0,
        )
        .await;
        assert!(result.is_err());
    }
}
