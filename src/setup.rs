use std::ffi::OsString;
use std::path::{Path,PathBuf};

use clap::{self,ArgMatches};

use crate::plot::PlotError;

pub const DEFAULT_OUTPUT : &str = "quadtree_plot.png";
pub const DEFAULT_DPI : u32 = 1200;
pub const DEFAULT_INCHES : f64 = 4.8;
// side of the raster, an rgb image this big is already ~800MB
pub const MAX_PIXELS : u32 = 16384;

pub struct Config {
    input : PathBuf,
    limit : f64,
    output : PathBuf,
    dpi : u32,
    inches : f64,
    show : bool,
}

impl Config {
    pub fn new(input : PathBuf, limit : f64) -> Config {
        Config {
            input,
            limit,
            output : PathBuf::from(DEFAULT_OUTPUT),
            dpi : DEFAULT_DPI,
            inches : DEFAULT_INCHES,
            show : true,
        }
    }

    pub fn input(&self) -> &Path {&self.input}
    pub fn limit(&self) -> f64 {self.limit}
    pub fn output(&self) -> &Path {&self.output}
    pub fn dpi(&self) -> u32 {self.dpi}
    pub fn show(&self) -> bool {self.show}

    // side of the square raster
    pub fn pixels(&self) -> u32 {
        ((self.inches * self.dpi as f64).round() as u32).max(1).min(MAX_PIXELS)
    }

    pub fn with_output(mut self, output : PathBuf) -> Config {
        self.output = output;
        self
    }

    pub fn with_resolution(mut self, inches : f64, dpi : u32) -> Config {
        self.inches = inches;
        self.dpi = dpi;
        self
    }

    pub fn with_window(mut self, show : bool) -> Config {
        self.show = show;
        self
    }
}

pub fn configure() -> Result<Config, PlotError> {
    configure_from(::std::env::args_os())
}

pub fn configure_from<I, T>(args : I) -> Result<Config, PlotError>
where I : IntoIterator<Item = T>, T : Into<OsString> + Clone {
    let matches = clap_app!(quadtree_plot =>
            (version: crate_version!())
            (about: "Draws a serialized quadtree and its points to a png.")

            (@arg INPUT: +required "json file holding the root node")
            (@arg LIMIT: +required "axes run from -LIMIT to LIMIT")
            (@arg OUTPUT: -o --output +takes_value "where to write the png (default quadtree_plot.png)")
            (@arg DPI: -d --dpi +takes_value "dots per inch of the png (default 1200)")
            (@arg SIZE: -s --size +takes_value "side of the figure in inches (default 4.8)")
            (@arg NO_WINDOW: -n --no_window "only write the png, don't open a window")
        ).get_matches_from_safe(args);

    let matches = match matches {
        Ok(m) => m,
        Err(ref e) if e.kind == clap::ErrorKind::HelpDisplayed
                   || e.kind == clap::ErrorKind::VersionDisplayed => e.exit(),
        Err(e) => return Err(PlotError::Args(e.message)),
    };

    let input = PathBuf::from(matches.value_of_os("INPUT").ok_or_else(|| missing("INPUT"))?);
    let limit : f64 = parse(&matches, "LIMIT")?.ok_or_else(|| missing("LIMIT"))?;
    if !(limit.is_finite() && limit > 0.0) {
        return Err(PlotError::Args(format!("LIMIT must be a positive number, got {}", limit)));
    }
    let inches : f64 = parse(&matches, "SIZE")?.unwrap_or(DEFAULT_INCHES);
    if !(inches.is_finite() && inches > 0.0) {
        return Err(PlotError::Args(format!("SIZE must be a positive number, got {}", inches)));
    }
    let dpi : u32 = parse(&matches, "DPI")?.unwrap_or(DEFAULT_DPI);
    if dpi == 0 {
        return Err(PlotError::Args("DPI must be at least 1".to_owned()));
    }
    let side = (inches * dpi as f64).round();
    if side > MAX_PIXELS as f64 {
        return Err(PlotError::Args(format!(
            "a {} inch figure at {} dpi is {} pixels wide, at most {} are supported", inches, dpi, side, MAX_PIXELS)));
    }

    let mut config = Config::new(input, limit)
        .with_resolution(inches, dpi)
        .with_window(!matches.is_present("NO_WINDOW"));
    if let Some(output) = matches.value_of_os("OUTPUT") {
        config = config.with_output(PathBuf::from(output));
    }
    Ok(config)
}

fn missing(arg : &str) -> PlotError {
    PlotError::Args(format!("missing {}", arg))
}

fn parse<T : ::std::str::FromStr>(matches : &ArgMatches, arg : &str) -> Result<Option<T>, PlotError> {
    match matches.value_of(arg) {
        Some(s) => s.parse()
            .map(Some)
            .map_err(|_| PlotError::Args(format!("couldn't read {} from {:?}", arg, s))),
        None => Ok(None),
    }
}
