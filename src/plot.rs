use std::io;
use std::path::PathBuf;

use image::ImageError;
use serde_json;
use thiserror::Error;

use crate::canvas::{Canvas,Style,Viewport};
use crate::interrupt::Interrupt;
use crate::quadtree::Node;
use crate::render::{render,DrawList,RenderError};
use crate::saving;
use crate::setup::Config;

#[derive(Error,Debug)]
pub enum PlotError {
    #[error("bad arguments: {0}")]
    Args(String),
    #[error("couldn't access {path:?}: {source}")]
    Io { path : PathBuf, #[source] source : io::Error },
    #[error("{path:?} isn't a readable quadtree: {source}")]
    Json { path : PathBuf, #[source] source : serde_json::Error },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("couldn't write the png: {0}")]
    Image(#[from] ImageError),
    #[error("couldn't open a window: {0}")]
    Window(String),
}

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum Ending {
    Saved,
    Shown,
    Interrupted,
}

/*
read json -> walk the tree -> rasterize -> save png -> maybe show it.
`points` is kept up to date with how many points were visited, even when
this returns an error halfway through. An interrupt ends the run early with
`Ending::Interrupted`.
*/
pub fn plot_quadtree_from_json(config : &Config,
                               interrupt : &Interrupt,
                               points : &mut usize,
) -> Result<Ending, PlotError> {
    let root = saving::load_tree(config.input())?;
    if interrupt.is_triggered() {
        return Ok(Ending::Interrupted);
    }
    if let Some(capacity) = Node::from_value(&root).ok().and_then(|n| n).and_then(|n| n.capacity()) {
        debug!("tree was built with node capacity {}", capacity);
    }

    let mut drawing = DrawList::new();
    let tally = match render(&root, &mut drawing, interrupt) {
        Ok(tally) => tally,
        Err(RenderError::Interrupted { visited }) => {
            *points = visited;
            return Ok(Ending::Interrupted);
        },
        Err(e) => {
            *points = e.visited();
            return Err(e.into());
        },
    };
    *points = tally.points;
    info!("walked {} nodes ({} deep) holding {} points", tally.nodes, tally.depth, tally.points);
    debug!("{} outlines, {} markers", drawing.outlines(), drawing.markers());

    let mut canvas = Canvas::new(
        Viewport::new(config.limit(), config.pixels()),
        Style::for_dpi(config.dpi()),
    );
    if !canvas.paint(&drawing, interrupt) {
        return Ok(Ending::Interrupted);
    }
    saving::save_image(&canvas, config.output())?;
    if interrupt.is_triggered() {
        return Ok(Ending::Interrupted);
    }

    if config.show() {
        show(config, &drawing, interrupt)
    } else {
        Ok(Ending::Saved)
    }
}

#[cfg(feature = "window")]
fn show(config : &Config, drawing : &DrawList, interrupt : &Interrupt) -> Result<Ending, PlotError> {
    use crate::view::{self,Closed};
    match view::show(drawing, config.limit(), interrupt)? {
        Closed::ByUser => Ok(Ending::Shown),
        Closed::Interrupted => Ok(Ending::Interrupted),
    }
}

#[cfg(not(feature = "window"))]
fn show(_config : &Config, _drawing : &DrawList, _interrupt : &Interrupt) -> Result<Ending, PlotError> {
    warn!("built without the `window` feature, not showing the plot");
    Ok(Ending::Saved)
}
