use predicates::{prelude::*, str};
use rstest::rstest;
use test_utilities::*;

#[test]
fn command() -> Result<(), Box<dyn std::error::Error>> {
	geostore_cmd()
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} [OPTIONS] <COMMAND>")));
	Ok(())
}

#[rstest]
#[case("ingest", "[OPTIONS] --database <FILE> <KIND> <GEOJSON_FILE>")]
#[case("list", "[OPTIONS] --database <FILE> <KIND>")]
fn subcommand(#[case] sub_command: &str, #[case] usage: &str) -> Result<(), Box<dyn std::error::Error>> {
	geostore_cmd()
		.args(sub_command.split(' '))
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains(format!("Usage: {BINARY_NAME} {sub_command} {usage}")));
	Ok(())
}

#[test]
fn ingest_and_list() {
	let (_geojson_dir, geojson) = write_collection(&[("Appingedam", 6.8, 53.3), ("Delfzijl", 6.9, 53.3)]);
	let (_db_dir, database) = get_temp_output("features.sqlite");
	let geojson = geojson.to_str().unwrap();
	let database = database.to_str().unwrap();

	geostore_cmd()
		.args(["ingest", "dutch_municipality", geojson, "--database", database])
		.assert()
		.success()
		.stdout(str::contains("accepted 2, rejected 0 dutch_municipality features"));

	geostore_cmd()
		.args(["ingest", "dutch_municipality", geojson, "--database", database])
		.assert()
		.success()
		.stdout(str::contains("accepted 0, rejected 2"))
		.stderr(str::contains("rejected #0 (Appingedam): a feature named 'Appingedam' already exists"));

	geostore_cmd()
		.args(["list", "dutch_municipality", "--database", database])
		.assert()
		.success()
		.stdout(str::contains("\tAppingedam\t").and(str::contains("\tDelfzijl\t")));

	geostore_cmd()
		.args(["list", "dutch_municipality", "--bbox", "6.85,53.25,6.88,53.5", "--database", database])
		.assert()
		.success()
		.stdout(str::contains("Appingedam").and(str::contains("Delfzijl").not()));

	geostore_cmd()
		.args(["list", "park", "--database", database])
		.assert()
		.success()
		.stdout(str::is_empty());
}

#[rstest]
#[case(&["list", "castle", "--database", "x.sqlite"], "unknown feature kind 'castle'")]
#[case(&["list", "park", "--bbox", "1,2,3", "--database", "DB"], "invalid bounding box")]
#[case(&["ingest", "park", "/does/not/exist.geojson", "--database", "DB"], "opening")]
fn errors(#[case] args: &[&str], #[case] message: &str) {
	let (_db_dir, database) = get_temp_output("features.sqlite");
	let args: Vec<&str> = args
		.iter()
		.map(|arg| if *arg == "DB" { database.to_str().unwrap() } else { *arg })
		.collect();
	geostore_cmd().args(args).assert().failure().stderr(str::contains(message));
}
