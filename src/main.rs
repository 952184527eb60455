#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

mod interrupt;
mod points;
mod quadtree;
mod render;
mod canvas;
mod saving;
mod setup;
mod plot;
#[cfg(feature = "window")]
mod view;

use interrupt::Interrupt;
use plot::{Ending,PlotError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let interrupt = Interrupt::new();
    if let Err(e) = interrupt.install() {
        warn!("ctrl-c will kill the process outright: {}", e);
    }

    let mut points = 0;
    let outcome = setup::configure()
        .and_then(|config| plot::plot_quadtree_from_json(&config, &interrupt, &mut points));

    match outcome {
        Ok(Ending::Interrupted) => println!("Interrupted by user"),
        Ok(ending) => debug!("finished: {:?}", ending),
        Err(e) => {
            if let PlotError::Render(ref r) = e {
                warn!("gave up after {} points", r.visited());
            }
            println!("Error: {}", e);
        },
    }
    println!("Number of points: {}", points);
}
