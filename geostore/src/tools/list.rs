use anyhow::Result;
use geostore_core::{FeatureKind, FeatureStore, query_bounding_box};
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Kind of the features: "dutch_municipality" or "park"
	pub kind: FeatureKind,

	/// Only list features intersecting "minX,minY,maxX,maxY"
	#[arg(long, value_name = "BOX", allow_hyphen_values = true)]
	pub bbox: Option<String>,

	/// SQLite database to read from
	#[arg(long, value_name = "FILE")]
	pub database: PathBuf,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let store = FeatureStore::open_sqlite(&arguments.database)?;
	let repository = store.repository(arguments.kind);
	let features = match &arguments.bbox {
		Some(raw) => query_bounding_box(&**repository, raw)?,
		None => repository.list_all()?,
	};
	for feature in &features {
		println!("{}\t{}\t{}", feature.id, feature.name, feature.bounding_box());
	}
	log::info!("listed {} {} features", features.len(), arguments.kind);
	Ok(())
}
