//! Tokio driver for the motion stepper.
//!
//! The driver task owns the stepper outright. Other tasks steer it through a
//! cloneable [`AnimationHandle`]; control messages are applied between
//! steps, never during one.

use crate::core::stepper::{MotionStepper, StepReport, TickStatus};
use crate::domain::model::Direction;
use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Pause,
    Resume,
    Stop,
    SetSpeed(f64),
}

#[derive(Debug, Clone)]
pub struct AnimationHandle {
    tx: mpsc::UnboundedSender<Control>,
}

impl AnimationHandle {
    /// Returns false once the driver has finished.
    pub fn send(&self, control: Control) -> bool {
        self.tx.send(control).is_ok()
    }

    pub fn pause(&self) -> bool {
        self.send(Control::Pause)
    }

    pub fn resume(&self) -> bool {
        self.send(Control::Resume)
    }

    pub fn stop(&self) -> bool {
        self.send(Control::Stop)
    }

    pub fn set_speed(&self, multiplier: f64) -> bool {
        self.send(Control::SetSpeed(multiplier))
    }
}

pub struct AnimationDriver<R: Rng> {
    stepper: MotionStepper<R>,
    rx: mpsc::UnboundedReceiver<Control>,
    controls_open: bool,
    max_ticks: Option<u64>,
}

impl<R: Rng> AnimationDriver<R> {
    pub fn new(stepper: MotionStepper<R>) -> (Self, AnimationHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = Self {
            stepper,
            rx,
            controls_open: true,
            max_ticks: None,
        };
        (driver, AnimationHandle { tx })
    }

    /// Stop on its own after `ticks` advanced steps. A limit of 0 never steps.
    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    fn tick_limit_reached(&self) -> bool {
        self.max_ticks
            .is_some_and(|limit| self.stepper.ticks() >= limit)
    }

    fn apply(&mut self, control: Control) {
        tracing::debug!(?control, "animation control");
        match control {
            Control::Pause => self.stepper.pause(),
            Control::Resume => self.stepper.resume(),
            Control::Stop => self.stepper.stop(),
            Control::SetSpeed(multiplier) => {
                if let Err(e) = self.stepper.set_speed(multiplier) {
                    tracing::warn!("Ignoring speed change: {}", e);
                }
            }
        }
    }

    fn drain_controls(&mut self) {
        while let Ok(control) = self.rx.try_recv() {
            self.apply(control);
        }
    }

    /// Blocks until a control message arrives. With every handle gone
    /// nothing can resume the stepper, so it is stopped.
    async fn wait_while_paused(&mut self) {
        match self.rx.recv().await {
            Some(control) => self.apply(control),
            None => {
                self.controls_open = false;
                self.stepper.stop();
            }
        }
    }

    async fn wait_for_next_tick(&mut self) {
        let deadline = Instant::now() + self.stepper.tick_delay();
        while self.stepper.is_active() {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return,
                control = self.rx.recv(), if self.controls_open => match control {
                    Some(control) => self.apply(control),
                    None => self.controls_open = false,
                },
            }
        }
    }

    /// Steps until stopped or the tick limit is hit, handing every advanced
    /// frame to `on_frame`. Returns the stepper in its final state.
    pub async fn run<F>(mut self, mut on_frame: F) -> MotionStepper<R>
    where
        F: FnMut(&MotionStepper<R>, &StepReport),
    {
        loop {
            if self.tick_limit_reached() {
                tracing::debug!("Tick limit reached");
                break;
            }
            self.drain_controls();
            match self.stepper.step() {
                TickStatus::Stopped => break,
                TickStatus::Paused => {
                    if self.controls_open {
                        self.wait_while_paused().await;
                    } else {
                        self.stepper.stop();
                    }
                    continue;
                }
                TickStatus::Advanced(report) => on_frame(&self.stepper, &report),
            }

            if !self.tick_limit_reached() {
                self.wait_for_next_tick().await;
            }
        }
        self.stepper
    }
}

/// Draws the region as a `cols` x `rows` character grid: `.` for the two
/// roads, an arrow per vehicle.
pub fn render_frame<R: Rng>(stepper: &MotionStepper<R>, cols: usize, rows: usize) -> String {
    if cols == 0 || rows == 0 {
        return String::new();
    }
    let region = stepper.region();
    let mut grid = vec![vec![' '; cols]; rows];

    let (mid_row, mid_col) = (rows / 2, cols / 2);
    grid[mid_row].fill('.');
    for row in grid.iter_mut() {
        row[mid_col] = '.';
    }

    for vehicle in stepper.vehicles() {
        let col = (vehicle.position.x / region.width * cols as f64).floor();
        let row = (vehicle.position.y / region.height * rows as f64).floor();
        if col < 0.0 || row < 0.0 || col >= cols as f64 || row >= rows as f64 {
            continue;
        }
        grid[row as usize][col as usize] = match vehicle.direction {
            Direction::Right => '>',
            Direction::Left => '<',
            Direction::Up => '^',
            Direction::Down => 'v',
        };
    }

    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
