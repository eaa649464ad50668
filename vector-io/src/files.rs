use log::{debug, info};
use std::fs;
use std::io;
use std::path::Path;

const SIDECARS: [&str; 4] = ["shx", "dbf", "prj", "cpg"];

/// Move every shapefile in `source` into `dest` (created if needed), each with its sidecar
/// files. Returns how many shapefiles were moved.
pub fn move_shapefiles(source: &Path, dest: &Path) -> io::Result<usize> {
    fs::create_dir_all(dest)?;

    let mut moved = 0;
    for entry in fs::read_dir(source)? {
        let path = entry?.path();
        let is_shp = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("shp"));
        if !path.is_file() || !is_shp {
            continue;
        }

        for ext in std::iter::once("shp").chain(SIDECARS) {
            let from = path.with_extension(ext);
            if !from.exists() {
                continue;
            }
            if let Some(name) = from.file_name() {
                let to = dest.join(name);
                debug!(target: "vector-io", "Moving {} to {}", from.display(), to.display());
                move_file(&from, &to)?;
            }
        }
        moved += 1;
    }

    info!(target: "vector-io", "Moved {moved} shapefiles to {}", dest.display());
    Ok(moved)
}

/// Rename, falling back to copy and delete across file systems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}
