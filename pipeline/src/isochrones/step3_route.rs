use crate::errors::PipelineError;
use crate::isochrones::step1_validate::ValidateStepOutput;
use crate::isochrones::step2_extract::IsochroneRow;
use crate::isochrones::RowOutcome;
use common::types::Location;
use log::{debug, info};
use routing::assemble::assemble;
use routing::fetch::fetch_routes;
use std::path::{Path, PathBuf};
use vector_io::writer::{route_features, write_features};
use vector_io::Schema;

pub(crate) fn route_row(
    validated: &ValidateStepOutput,
    row: &IsochroneRow,
    total_rows: usize,
) -> Result<RowOutcome, PipelineError> {
    let options = validated.options;
    info!(target: "pipeline", "Generating routes for {}", row.label);
    debug!(target: "pipeline", "Origins: {:?}", row.origins);
    debug!(target: "pipeline", "Destination: {}", row.destination);

    let destination = Location::Coordinate(row.destination);
    let route_set = fetch_routes(validated.provider, &row.origins, &destination, &options.route)?;
    let multi_path = assemble(&route_set)?;

    let routes_file = match &validated.output {
        Some((dir, crs)) => {
            let path = dir.join(format!("{}{}", row.label, options.driver.extension()));
            info!(target: "pipeline", "Saving routes to {}", path.display());
            write_features(&path, &Schema::ROUTES, options.driver, crs, &route_features(&multi_path))?;
            Some(path)
        }
        None => None,
    };

    let map_file = if options.plot_routes {
        let path = map_path(&options.map_output, &row.label, total_rows);
        visualization::render(&route_set, options.route.mode, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(RowOutcome {
        row: row.index,
        label: row.label.clone(),
        routes: route_set.len(),
        routes_file,
        map_file,
        error: None,
    })
}

/// The configured map path for a single row, `<stem>_<label>.html` next to it otherwise
pub(crate) fn map_path(map_output: &Path, label: &str, total_rows: usize) -> PathBuf {
    if total_rows <= 1 {
        return map_output.to_path_buf();
    }
    let stem = map_output
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "routes".to_string());
    map_output.with_file_name(format!("{stem}_{label}.html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_path() {
        let map = Path::new("out/routes.html");
        assert_eq!(PathBuf::from("out/routes.html"), map_path(map, "North", 1));
        assert_eq!(PathBuf::from("out/routes_North.html"), map_path(map, "North", 3));
    }
}
