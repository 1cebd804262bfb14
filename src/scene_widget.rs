//! Canvas widget that paints the projected puzzle.
//!
//! The widget draws whatever facets it is given and turns pointer input into
//! camera messages. Dragging with either mouse button orbits, the wheel
//! zooms.

use iced::widget::canvas::{self, Frame, Path, Stroke, event};
use iced::{Color, Point, Rectangle, Size, Theme, mouse};
use nalgebra::Point2;

use crate::Message;
use crate::renderer::Facet;

const BACKGROUND: Color = Color::from_rgb(0.7, 0.7, 0.7);
const EDGE_WIDTH: f32 = 1.5;

/// Pointer state kept by iced between events
#[derive(Debug, Default)]
pub(crate) struct SceneState {
    dragging: bool,
    last_cursor: Option<Point>,
    size: Option<Size>,
}

/// Canvas program for one frame of the puzzle.
pub(crate) struct CubeScene {
    facets: Vec<Facet>,
}

impl CubeScene {
    /// `facets` must already be ordered back to front.
    pub(crate) fn new(facets: Vec<Facet>) -> Self {
        Self { facets }
    }
}

impl canvas::Program<Message> for CubeScene {
    type State = SceneState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        let (status, message) = match event {
            canvas::Event::Mouse(mouse_event) => handle_mouse_event(state, mouse_event, bounds, cursor),
            _ => (event::Status::Ignored, None),
        };

        // one message per event: pointer input wins, a pending resize goes out
        // with the next quiet event
        if message.is_none()
            && state.size != Some(bounds.size())
            && bounds.width > 0.0
            && bounds.height > 0.0
        {
            state.size = Some(bounds.size());
            return (status, Some(Message::ViewportResized(bounds.size())));
        }
        (status, message)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let size = bounds.size();
        let mut frame = Frame::new(renderer, size);
        frame.fill_rectangle(Point::ORIGIN, size, BACKGROUND);

        for facet in &self.facets {
            let [first, rest @ ..] = facet.corners.map(|c| to_screen(c, size));
            let path = Path::new(|builder| {
                builder.move_to(first);
                for point in rest {
                    builder.line_to(point);
                }
                builder.close();
            });
            let [r, g, b, a] = [facet.color.x, facet.color.y, facet.color.z, facet.color.w];
            frame.fill(&path, Color::from_rgba(r, g, b, a));
            frame.stroke(
                &path,
                Stroke::default()
                    .with_color(Color::BLACK)
                    .with_width(EDGE_WIDTH),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.dragging {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Grab
        } else {
            mouse::Interaction::default()
        }
    }
}

fn handle_mouse_event(
    state: &mut SceneState,
    mouse_event: mouse::Event,
    bounds: Rectangle,
    cursor: mouse::Cursor,
) -> (event::Status, Option<Message>) {
    match mouse_event {
        mouse::Event::CursorMoved { .. } => {
            let Some(position) = cursor.position_in(bounds) else {
                return (event::Status::Ignored, None);
            };
            let message = match (state.dragging, state.last_cursor) {
                (true, Some(last)) => Some(Message::Orbit {
                    dx: position.x - last.x,
                    dy: position.y - last.y,
                }),
                _ => None,
            };
            state.last_cursor = Some(position);
            (event::Status::Captured, message)
        }
        mouse::Event::ButtonPressed(mouse::Button::Left | mouse::Button::Right) => {
            if cursor.position_in(bounds).is_some() {
                state.dragging = true;
                state.last_cursor = cursor.position_in(bounds);
                return (event::Status::Captured, None);
            }
            (event::Status::Ignored, None)
        }
        mouse::Event::ButtonReleased(mouse::Button::Left | mouse::Button::Right) => {
            state.dragging = false;
            (event::Status::Captured, None)
        }
        mouse::Event::WheelScrolled { delta } => {
            if cursor.position_in(bounds).is_none() {
                return (event::Status::Ignored, None);
            }
            let scroll = match delta {
                mouse::ScrollDelta::Lines { y, .. } => y,
                mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
            };
            (event::Status::Captured, Some(Message::Zoom(scroll)))
        }
        mouse::Event::CursorLeft => {
            state.dragging = false;
            state.last_cursor = None;
            (event::Status::Ignored, None)
        }
        _ => (event::Status::Ignored, None),
    }
}

/// Maps normalised device coordinates onto a canvas of `size`, y pointing down.
fn to_screen(ndc: Point2<f32>, size: Size) -> Point {
    Point::new(
        (ndc.x + 1.0) * 0.5 * size.width,
        (1.0 - ndc.y) * 0.5 * size.height,
    )
}
