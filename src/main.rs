//! 3×3×3 twisty puzzle simulator with iced UI.
//!
//! Nine slices can be turned by quarter turns with an animation; the puzzle is
//! drawn through a CPU projection onto an iced canvas and viewed through an
//! orbit camera.

use std::time::{SystemTime, UNIX_EPOCH};

use iced::time::Instant;
use iced::widget::{Canvas, Column, Row, button, container, text};
use iced::{Element, Length, Settings, Size, Subscription, Task, window};

mod animation;
mod camera;
mod config;
mod cube;
mod error;
mod math;
mod puzzle;
mod renderer;
mod rotation;
mod scene_widget;
mod slice;
mod stopwatch;

use animation::Phase;
use camera::ViewCamera;
use config::Config;
use puzzle::PuzzleState;
use renderer::SceneRenderer;
use rotation::Direction;
use scene_widget::CubeScene;
use slice::SliceId;
use stopwatch::{Stopwatch, format_clock};

/// Main application state
#[derive(Debug)]
pub(crate) struct CubeApp {
    config: Config,
    puzzle: PuzzleState,
    renderer: SceneRenderer,
    stopwatch: Stopwatch,
    last_frame: Option<Instant>,
    status: String,
}

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Turn { slice: usize, direction: i32 },
    Scramble,
    Reset,
    ToggleStopwatch,
    Frame(Instant),
    Orbit { dx: f32, dy: f32 },
    Zoom(f32),
    ViewportResized(Size),
}

impl CubeApp {
    pub(crate) fn new(config: Config) -> Self {
        let puzzle = PuzzleState::new(&config);
        let mut renderer = SceneRenderer::new();
        puzzle.upload_all(&mut renderer);

        let mut app = Self {
            config,
            puzzle,
            renderer,
            stopwatch: Stopwatch::default(),
            last_frame: None,
            status: String::new(),
        };
        app.redraw();
        app
    }

    pub(crate) fn title(&self) -> String {
        if self.puzzle.is_solved() {
            "Cube Simulator - solved".to_string()
        } else {
            "Cube Simulator".to_string()
        }
    }

    /// Re-projects the puzzle into the renderer's facet list.
    fn redraw(&mut self) {
        self.renderer.begin_frame();
        self.puzzle.render_frame(&mut self.renderer);
        self.renderer.end_frame();
    }

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Turn { slice, direction } => match self.puzzle.rotate(slice, direction) {
                Ok(turn) => {
                    self.status = format!("Turning {turn}");
                    self.last_frame = None;
                }
                Err(err) => {
                    log::warn!("turn of slice {slice} rejected: {err}");
                    self.status = err.to_string();
                }
            },
            Message::Scramble => {
                let seed = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|elapsed| elapsed.as_nanos() as u64)
                    .unwrap_or_default();
                match self
                    .puzzle
                    .scramble(self.config.scramble_moves, seed, &mut self.renderer)
                {
                    Ok(moves) => {
                        self.stopwatch.reset();
                        self.status = format!("Scrambled with {} turns", moves.len());
                    }
                    Err(err) => {
                        log::warn!("scramble rejected: {err}");
                        self.status = err.to_string();
                    }
                }
            }
            Message::Reset => match self.puzzle.reset(&mut self.renderer) {
                Ok(()) => {
                    self.stopwatch.reset();
                    self.status = "Reset".to_string();
                }
                Err(err) => {
                    log::warn!("reset rejected: {err}");
                    self.status = err.to_string();
                }
            },
            Message::ToggleStopwatch => {
                self.stopwatch.toggle(Instant::now());
            }
            Message::Frame(now) => {
                if self.puzzle.is_animating() {
                    let dt = self
                        .last_frame
                        .map(|last| now.saturating_duration_since(last))
                        .unwrap_or_default();
                    match self.puzzle.tick(dt, &mut self.renderer) {
                        Ok(_) if !self.puzzle.is_animating() => self.status.clear(),
                        Ok(_) => {}
                        Err(err) => self.status = err.to_string(),
                    }
                }
                self.last_frame = Some(now);
            }
            Message::Orbit { dx, dy } => {
                self.puzzle.camera.on_orbit(dx, dy);
            }
            Message::Zoom(delta) => {
                self.puzzle.camera.on_zoom(delta);
            }
            Message::ViewportResized(size) => {
                self.puzzle.camera.set_aspect(size.width / size.height);
            }
        }

        self.redraw();
        Task::none()
    }

    pub(crate) fn view(&self) -> Element<Message> {
        let turns = SliceId::all().fold(Column::new().spacing(5), |column, slice| {
            let index = slice.index();
            column.push(
                Row::new()
                    .spacing(5)
                    .push(text(slice.to_string()).width(50))
                    .push(turn_button("cw", index, Direction::Clockwise))
                    .push(turn_button("ccw", index, Direction::CounterClockwise)),
            )
        });

        let phase = match self.puzzle.phase() {
            Phase::Idle if self.puzzle.is_solved() => "Solved",
            Phase::Idle => "Ready",
            Phase::Animating => "Turning",
            Phase::Committing => "Committing",
        };

        let stopwatch_label = if self.stopwatch.is_running() {
            "Stop"
        } else {
            "Start"
        };

        let controls = Column::new()
            .spacing(20)
            .width(200)
            .push(turns)
            .push(
                Row::new()
                    .spacing(5)
                    .push(button("Scramble").on_press(Message::Scramble))
                    .push(button("Reset").on_press(Message::Reset)),
            )
            .push(
                Row::new()
                    .spacing(10)
                    .push(button(stopwatch_label).on_press(Message::ToggleStopwatch))
                    .push(text(format_clock(self.stopwatch.elapsed(Instant::now()))).size(24.0)),
            )
            .push(text(phase))
            .push(text(self.status.as_str()));

        let viewport = Canvas::new(CubeScene::new(self.renderer.facets().to_vec()))
            .width(Length::Fill)
            .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(container(controls).width(Length::Shrink).height(Length::Fill))
            .push(viewport)
            .into()
    }

    /// Frames are only requested while something on screen is changing.
    pub(crate) fn subscription(&self) -> Subscription<Message> {
        if self.puzzle.is_animating() || self.stopwatch.is_running() {
            window::frames().map(Message::Frame)
        } else {
            Subscription::none()
        }
    }
}

fn turn_button(
    label: &'static str,
    slice: usize,
    direction: Direction,
) -> iced::widget::Button<'static, Message> {
    button(text(label)).on_press(Message::Turn {
        slice,
        direction: direction.sign(),
    })
}

fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    let config = Config::from_env();
    log::info!("starting with {config:?}");

    iced::application(CubeApp::title, CubeApp::update, CubeApp::view)
        .subscription(CubeApp::subscription)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .window_size(Size::new(1024.0, 720.0))
        .run_with(move || (CubeApp::new(config), Task::none()))
}
