use std::fs::{File,create_dir_all};
use std::io::BufReader;
use std::path::Path;

use serde_json::{self,Value};

use crate::canvas::Canvas;
use crate::plot::PlotError;

// only checks that the file is json; nodes are checked as they are drawn
pub fn load_tree(path : &Path) -> Result<Value, PlotError> {
    let f = File::open(path).map_err(|source| PlotError::Io {
        path : path.to_path_buf(),
        source,
    })?;
    let root = serde_json::from_reader(BufReader::new(f)).map_err(|source| PlotError::Json {
        path : path.to_path_buf(),
        source,
    })?;
    debug!("loaded tree from {:?}", path);
    Ok(root)
}

pub fn save_image(canvas : &Canvas, path : &Path) -> Result<(), PlotError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            info!("creating output dir {:?}", dir);
            create_dir_all(dir).map_err(|source| PlotError::Io {
                path : dir.to_path_buf(),
                source,
            })?;
        }
    }
    canvas.save(path)?;
    let (w, h) = canvas.image().dimensions();
    info!("saved {}x{} plot to {:?}", w, h, path);
    Ok(())
}
