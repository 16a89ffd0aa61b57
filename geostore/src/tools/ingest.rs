use anyhow::{Context, Result};
use geostore_core::{FeatureKind, FeatureStore, candidates_from_feature_collection, ingest};
use std::{fs::File, io::BufReader, path::PathBuf};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Kind of the features: "dutch_municipality" or "park"
	pub kind: FeatureKind,

	/// GeoJSON file containing a FeatureCollection
	#[arg(value_name = "GEOJSON_FILE")]
	pub file: PathBuf,

	/// SQLite database to import into; created if missing
	#[arg(long, value_name = "FILE")]
	pub database: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let file = File::open(&arguments.file).with_context(|| format!("opening {:?}", arguments.file))?;
	let collection: serde_json::Value =
		serde_json::from_reader(BufReader::new(file)).with_context(|| format!("parsing {:?}", arguments.file))?;
	let candidates = candidates_from_feature_collection(&collection)?;

	let store = FeatureStore::open_sqlite(&arguments.database)?;
	let report = ingest(&**store.repository(arguments.kind), candidates)?;

	for rejection in &report.rejections {
		eprintln!(
			"rejected #{} ({}): {}",
			rejection.index,
			rejection.name.as_deref().unwrap_or("-"),
			rejection.reason
		);
	}
	println!(
		"accepted {}, rejected {} {} features",
		report.accepted_count(),
		report.rejected_count(),
		arguments.kind
	);
	Ok(())
}
