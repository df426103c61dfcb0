use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::{
    Algorithm, AppConfig, BarValue, EventStream, Lane, LaneStatus, Pacing, Palette, Renderer,
    Result, VisualChannel,
};

/// Outcome of one lane run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub len: usize,
    pub events: usize,
    pub elapsed: Duration,
}

/// Drives one engine to completion, holding each event's pacing before the
/// next one is produced.
#[derive(Debug, Clone)]
pub struct Scheduler {
    pacing: Pacing,
    palette: Palette,
    seed: Option<u64>,
}

impl Scheduler {
    pub fn new(pacing: Pacing) -> Self {
        Self {
            pacing,
            palette: Palette::default(),
            seed: None,
        }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            pacing: config.playback.pacing()?,
            palette: config.palette.clone(),
            seed: config.playback.seed,
        })
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Looks `name` up in the registry, then runs it on `lane`. An unknown
    /// name leaves the lane untouched.
    pub async fn run_named<R, V>(&self, lane: &mut Lane<R, V>, name: &str) -> Result<RunReport>
    where
        R: Renderer,
        V: BarValue,
    {
        let algorithm = name.parse::<Algorithm>()?;
        lane.set_algorithm(algorithm);
        self.run(lane).await
    }

    /// Runs the lane's algorithm to completion.
    ///
    /// Events within the lane are strictly ordered: the engine only produces
    /// step `k + 1` after step `k` was applied and its pacing elapsed. On
    /// error the lane returns to [`LaneStatus::Idle`].
    pub async fn run<R, V>(&self, lane: &mut Lane<R, V>) -> Result<RunReport>
    where
        R: Renderer,
        V: BarValue,
    {
        let algorithm = lane.algorithm();
        let len = lane.container().len();

        // Reject the palette up front so no slot is touched with a colour
        // the renderer cannot show.
        {
            let (_, renderer) = lane.parts_mut();
            let channel = VisualChannel::new(renderer);
            for color in self.palette.colors() {
                if let Err(err) = channel.ensure_supported(color) {
                    tracing::warn!(%algorithm, %color, "renderer rejected palette");
                    return Err(err);
                }
            }
        }

        lane.set_status(LaneStatus::Running);
        tracing::debug!(%algorithm, len, pacing_ms = self.pacing.millis(), "lane started");

        let started = Instant::now();
        let engine = algorithm.engine(len, self.seed);
        let mut stream = EventStream::new(engine, self.palette.clone(), self.pacing);
        let mut events = 0;

        let outcome = {
            let (container, renderer) = lane.parts_mut();
            container.reset_visual_state();
            let mut channel = VisualChannel::new(renderer);
            loop {
                let Some(event) = stream.next_event(container) else {
                    break Ok(());
                };
                tracing::trace!(%algorithm, ?event.kind, targets = ?event.targets, "applying event");
                if let Err(err) = channel.apply(&event).await {
                    break Err(err);
                }
                events += 1;
            }
        };

        if let Err(err) = outcome {
            tracing::warn!(%algorithm, error = %err, "lane aborted");
            lane.set_status(LaneStatus::Idle);
            return Err(err);
        }

        lane.set_status(LaneStatus::Done);
        let report = RunReport {
            algorithm,
            len,
            events,
            elapsed: started.elapsed(),
        };
        tracing::debug!(%algorithm, events, elapsed = ?report.elapsed, "lane finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Container, RenderLog, RenderOp, SortVizError, VisualState};

    fn lane(values: Vec<i64>, algorithm: Algorithm) -> Lane<RenderLog> {
        Lane::new(Container::from_values(values), algorithm, RenderLog::new())
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(Pacing::from_millis(80.0)).with_seed(Some(3))
    }

    #[tokio::test(start_paused = true)]
    async fn runs_insertion_example_to_done() {
        let mut lane = lane(vec![5, 3, 8, 1], Algorithm::Insertion);

        let report = scheduler().run(&mut lane).await.unwrap();

        assert_eq!(lane.status(), LaneStatus::Done);
        assert_eq!(lane.container().to_sequence(), vec![1, 3, 5, 8]);
        assert_eq!(lane.renderer().heights(), &[1, 3, 5, 8]);
        assert_eq!(report.algorithm, Algorithm::Insertion);
        assert!(report.events > 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_name_mutates_nothing() {
        let mut lane = lane(vec![4, 2, 9], Algorithm::Merge);

        let err = scheduler().run_named(&mut lane, "bubble sort").await.unwrap_err();

        assert!(matches!(err, SortVizError::UnknownAlgorithm(ref name) if name == "bubble sort"));
        assert_eq!(lane.status(), LaneStatus::Idle);
        assert_eq!(lane.algorithm(), Algorithm::Merge);
        assert_eq!(lane.container().to_sequence(), vec![4, 2, 9]);
        assert_eq!(lane.renderer().records().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_named_switches_algorithm() {
        let mut lane = lane(vec![2, 1], Algorithm::Selection);
        let report = scheduler().run_named(&mut lane, "merge sort").await.unwrap();
        assert_eq!(report.algorithm, Algorithm::Merge);
        assert_eq!(lane.container().to_sequence(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_lane_finishes_without_time_passing() {
        let mut lane = lane(vec![], Algorithm::Quick);

        let report = scheduler().run(&mut lane).await.unwrap();

        assert_eq!(report.events, 0);
        assert_eq!(report.elapsed, Duration::ZERO);
        assert_eq!(lane.status(), LaneStatus::Done);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_time_equals_the_sum_of_holds() {
        let input = vec![6, 2, 9, 1, 5];
        let expected: Duration = {
            let mut container = Container::from_values(input.clone());
            let engine = Algorithm::Insertion.engine(container.len(), None);
            EventStream::new(engine, Palette::default(), Pacing::from_millis(80.0))
                .drain(&mut container)
                .iter()
                .map(|event| event.hold())
                .sum()
        };
        let mut lane = lane(input, Algorithm::Insertion);

        let report = scheduler().run(&mut lane).await.unwrap();

        assert_eq!(report.elapsed, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn compare_highlights_are_separated_by_their_pacing() {
        let mut lane = lane(vec![7, 6, 5, 4, 3, 2, 1], Algorithm::Gnome);
        let compare = Palette::default().compare;

        scheduler().run(&mut lane).await.unwrap();

        let stamps: Vec<Instant> = lane
            .renderer()
            .records()
            .iter()
            .filter(|record| {
                matches!(&record.op, RenderOp::Highlight { color, .. } if *color == compare)
            })
            .map(|record| record.at)
            .collect();
        assert!(stamps.len() > 1);
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(80));
        }

        let all: Vec<Instant> = lane.renderer().records().iter().map(|r| r.at).collect();
        assert!(all.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn unsupported_palette_is_rejected_before_running() {
        let renderer = RenderLog::with_supported_colors(["#61AFEF", "#E06C75"]);
        let mut lane = Lane::new(
            Container::from_values(vec![3_i64, 2, 1]),
            Algorithm::Selection,
            renderer,
        );

        let err = scheduler().run(&mut lane).await.unwrap_err();

        assert!(matches!(err, SortVizError::UnsupportedColor(_)));
        assert_eq!(lane.status(), LaneStatus::Idle);
        assert_eq!(lane.container().to_sequence(), vec![3, 2, 1]);
        assert_eq!(lane.renderer().records().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_palette_reaches_the_renderer() {
        let mut palette = Palette::default();
        palette.sorted = Color::new("gold");
        let mut lane = lane(vec![2, 1, 3], Algorithm::Heap);

        scheduler()
            .with_palette(palette)
            .run(&mut lane)
            .await
            .unwrap();

        for index in 0..3 {
            assert_eq!(lane.renderer().color_at(index), Some(&Color::new("gold")));
            assert_eq!(lane.container().visual_state(index), VisualState::Sorted);
        }
    }
}
