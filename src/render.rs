use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::interrupt::Interrupt;
use crate::points::*;
use crate::quadtree::{Node,Quadrant,ShapeError};

// axis aligned, `corner` is the bottom-left in world coordinates
#[derive(Copy,Clone,Debug,PartialEq)]
pub struct Rect {
    pub corner: CPoint2,
    pub width: f64,
    pub height: f64,
}

#[derive(Copy,Clone,Debug,PartialEq)]
pub enum Shape {
    Outline(Rect),
    Marker(CPoint2),
}

/// Anything the tree walk can draw onto.
pub trait Surface {
    fn outline(&mut self, rect: Rect);
    fn marker(&mut self, at: CPoint2);
}

/// Surface that only remembers what was drawn, in order.
/// Replayed onto the raster canvas and the window.
#[derive(Clone,Debug,Default,PartialEq)]
pub struct DrawList {
    shapes: Vec<Shape>,
}

impl DrawList {
    pub fn new() -> DrawList {
        DrawList { shapes: vec![] }
    }

    #[inline]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn outlines(&self) -> usize {
        self.shapes.iter().filter(|s| matches!(s, Shape::Outline(_))).count()
    }

    pub fn markers(&self) -> usize {
        self.shapes.iter().filter(|s| matches!(s, Shape::Marker(_))).count()
    }
}

impl Surface for DrawList {
    fn outline(&mut self, rect: Rect) {
        self.shapes.push(Shape::Outline(rect));
    }
    fn marker(&mut self, at: CPoint2) {
        self.shapes.push(Shape::Marker(at));
    }
}

#[derive(Copy,Clone,Debug,Default,PartialEq,Eq)]
pub struct Tally {
    pub nodes: usize,
    pub points: usize,
    pub depth: usize,
}

// quadrants taken from the root down to some node
#[derive(Clone,Debug,Default,PartialEq,Eq)]
pub struct NodePath(pub Vec<Quadrant>);

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("root")?;
        for q in self.0.iter() {
            write!(f, "/{}", q)?;
        }
        Ok(())
    }
}

#[derive(Error,Debug,Clone,PartialEq)]
pub enum RenderError {
    #[error("malformed node at {path}: {cause}")]
    Malformed {
        visited: usize,
        path: NodePath,
        #[source]
        cause: ShapeError,
    },
    #[error("interrupted after {visited} points")]
    Interrupted { visited: usize },
}

impl RenderError {
    // points visited before the walk stopped
    pub fn visited(&self) -> usize {
        match *self {
            RenderError::Malformed { visited, .. } => visited,
            RenderError::Interrupted { visited } => visited,
        }
    }
}

enum Stop {
    Shape(ShapeError),
    Interrupted,
}

impl From<ShapeError> for Stop {
    fn from(e: ShapeError) -> Stop {
        Stop::Shape(e)
    }
}

/*
Draws `node` and everything below it onto `surface`, pre-order, children
in the order ne, nw, se, sw. Null or otherwise empty nodes draw nothing.
On a malformed node, or once `interrupt` is raised, the walk stops; what was
drawn so far stays drawn and the error remembers how many points were visited.
*/
pub fn render<S: Surface>(node: &Value, surface: &mut S, interrupt: &Interrupt) -> Result<Tally, RenderError> {
    let mut tally = Tally::default();
    let mut path = vec![];
    match walk(node, surface, &mut path, &mut tally, interrupt) {
        Ok(()) => Ok(tally),
        Err(Stop::Interrupted) => Err(RenderError::Interrupted { visited: tally.points }),
        Err(Stop::Shape(cause)) => Err(RenderError::Malformed {
            visited: tally.points,
            path: NodePath(path),
            cause,
        }),
    }
}

// on error `path` is left pointing at the offending node
fn walk<S: Surface>(value: &Value,
                    surface: &mut S,
                    path: &mut Vec<Quadrant>,
                    tally: &mut Tally,
                    interrupt: &Interrupt,
) -> Result<(), Stop> {
    if interrupt.is_triggered() {
        return Err(Stop::Interrupted);
    }
    let node = match Node::from_value(value)? {
        Some(node) => node,
        None => return Ok(()),
    };
    let boundary = node.boundary()?;
    surface.outline(Rect {
        corner: boundary.bottom_left(),
        width: boundary.side(),
        height: boundary.side(),
    });
    tally.nodes += 1;
    tally.depth = tally.depth.max(path.len());

    for point in node.points()? {
        let point = point?;
        if !boundary.contains(&point) {
            debug!("point {:?} lies outside node {}", point, NodePath(path.clone()));
        }
        tally.points += 1;
        surface.marker(point);
    }

    if node.is_divided()? {
        for &quadrant in Quadrant::DRAW_ORDER.iter() {
            let child = node.child(quadrant)?;
            path.push(quadrant);
            walk(child, surface, path, tally, interrupt)?;
            path.pop();
        }
    }
    Ok(())
}
