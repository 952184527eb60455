use piston_window::{PistonWindow,WindowSettings,Button,Key,PressEvent,Rectangle,clear,ellipse};

use crate::canvas::{Style,Viewport};
use crate::interrupt::Interrupt;
use crate::plot::PlotError;
use crate::points::*;
use crate::render::{DrawList,Shape};

const SIDE : u32 = 800;
// roughly what a desktop screen shows per inch
const SCREEN_DPI : u32 = 100;

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum Closed {
    ByUser,
    Interrupted,
}

#[inline]
fn rgba(c : ::image::Rgb<u8>) -> [f32; 4] {
    [c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0, 1.0]
}

/*
NOTE consumes caller thread until the window goes away.
Closing the window is a normal end. Escape or ctrl-c count as an interruption.
*/
pub fn show(drawing : &DrawList, limit : f64, interrupt : &Interrupt) -> Result<Closed, PlotError> {
    let mut window : PistonWindow = WindowSettings::new("quadtree", [SIDE, SIDE])
        .exit_on_esc(false)
        .build()
        .map_err(|e| PlotError::Window(e.to_string()))?;
    let vp = Viewport::new(limit, SIDE);
    let style = Style::for_dpi(SCREEN_DPI);
    let border = Rectangle::new_border(rgba(style.stroke), style.stroke_px / 2.0);
    info!("showing {} shapes, close the window to finish", drawing.shapes().len());

    while let Some(e) = window.next() {
        if let Some(Button::Keyboard(Key::Escape)) = e.press_args() {
            interrupt.trigger();
        }
        if interrupt.is_triggered() {
            return Ok(Closed::Interrupted);
        }
        window.draw_2d(&e, |c, g, _| {
            clear(rgba(style.background), g);
            for shape in drawing.shapes() {
                match *shape {
                    Shape::Outline(rect) => {
                        let tl = vp.to_screen(CPoint2::new(rect.corner.x, rect.corner.y + rect.height));
                        let size = CPoint2::new(rect.width, rect.height).scale(vp.px_per_unit());
                        border.draw([tl.x, tl.y, size.x, size.y], &c.draw_state, c.transform, g);
                    },
                    Shape::Marker(at) => {
                        let r = style.marker_radius_px;
                        let mid = vp.to_screen(at);
                        ellipse(rgba(style.marker), [mid.x - r, mid.y - r, 2.0 * r, 2.0 * r], c.transform, g);
                    },
                }
            }
        });
    }
    Ok(Closed::ByUser)
}
