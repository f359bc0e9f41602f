use astro_sign::domain::model::OutputFormat;
use astro_sign::utils::validation::Validate;
use astro_sign::{CliConfig, JobConfig, JobEngine, LocalStorage, SignPipeline, UNKNOWN_SIGN};
use clap::Parser;
use std::io::Read;
use tempfile::TempDir;

const PEOPLE_CSV: &str = "id,name,dob\n\
1,Ada,1815-12-10\n\
2,Grace,1906-12-09\n\
3,Alan,1912-06-23\n\
4,Unknown,\\N\n\
5,Typo,12/10/1815\n\
6,Barbara,1939-11-03\n";

fn write_input(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_end_to_end_csv_job() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "people.csv", PEOPLE_CSV);
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = CliConfig::parse_from([
        "astro-sign",
        "--input",
        input.as_str(),
        "--output-path",
        output_path.as_str(),
        "--formats",
        "csv,json",
    ]);
    assert!(config.validate().is_ok());

    let pipeline = SignPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );
    let engine = JobEngine::new(pipeline);

    let result = engine.run().await.unwrap();
    assert_eq!(result, output_path);

    let csv = std::fs::read_to_string(temp_dir.path().join("out/output.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "id,name,dob,astro_sign");
    assert_eq!(lines[1], "1,Ada,1815-12-10,Sagittarius");
    assert_eq!(lines[2], "2,Grace,1906-12-09,Sagittarius");
    assert_eq!(lines[3], "3,Alan,1912-06-23,Cancer");
    assert_eq!(lines[4], "4,Unknown,\\N,");
    assert_eq!(lines[5], format!("5,Typo,12/10/1815,{}", UNKNOWN_SIGN));
    assert_eq!(lines[6], "6,Barbara,1939-11-03,Scorpio");

    let summary: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join("out/summary.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(summary["function"], "astro_sign");
    assert_eq!(summary["total_rows"], 6);
    assert_eq!(summary["null_rows"], 1);
    assert_eq!(summary["unresolved_rows"], 1);
    assert_eq!(summary["value_counts"]["Sagittarius"], 2);
}

#[tokio::test]
async fn test_end_to_end_toml_job_with_zip() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(
        &temp_dir,
        "export.tsv",
        "7\tKatherine\t1918-08-26\n8\tMargaret\tNULL\n",
    );
    let output_path = temp_dir.path().join("zipped");
    let normalized_input = input.replace('\\', "/");
    let normalized_output = output_path.to_str().unwrap().replace('\\', "/");

    let config_content = format!(
        r#"
[job]
name = "headerless-export"

[input]
path = "{}"
delimiter = "\t"
has_headers = false
null_marker = "NULL"

[transform]
dob_column = "_c2"
output_column = "sign"

[output]
path = "{}"
formats = ["tsv", "json"]

[output.compression]
enabled = true
filename = "signs.zip"
"#,
        normalized_input, normalized_output
    );

    let config = JobConfig::from_toml_str(&config_content).unwrap();
    assert!(config.validate().is_ok());

    let pipeline = SignPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );
    let result = JobEngine::new_with_monitoring(pipeline, false)
        .run()
        .await
        .unwrap();
    assert!(result.ends_with("signs.zip"));

    let zip_data = std::fs::read(output_path.join("signs.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["output.tsv", "summary.json"]);

    let mut tsv = String::new();
    archive
        .by_name("output.tsv")
        .unwrap()
        .read_to_string(&mut tsv)
        .unwrap();
    assert_eq!(
        tsv,
        "_c0\t_c1\t_c2\tsign\n7\tKatherine\t1918-08-26\tVirgo\n8\tMargaret\tNULL\t\n"
    );
}

#[tokio::test]
async fn test_missing_dob_column_fails_job() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "people.csv", PEOPLE_CSV);
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = CliConfig::parse_from([
        "astro-sign",
        "--input",
        input.as_str(),
        "--output-path",
        output_path.as_str(),
        "--dob-column",
        "birthday",
    ]);

    let pipeline = SignPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );
    let err = JobEngine::new(pipeline).run().await.unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("birthday"));
    assert!(!temp_dir.path().join("out/output.csv").exists());
}

#[tokio::test]
async fn test_month_day_function_over_cli_config() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "people.csv", "dob\n2001-11-11\nbad\n");
    let output_path = temp_dir.path().join("out").to_str().unwrap().to_string();

    let config = CliConfig::parse_from([
        "astro-sign",
        "--input",
        input.as_str(),
        "--output-path",
        output_path.as_str(),
        "--function",
        "astro-month-day",
        "--output-column",
        "md",
    ]);
    assert_eq!(
        astro_sign::core::ConfigProvider::output_formats(&config),
        &[OutputFormat::Csv]
    );

    let pipeline = SignPipeline::new(
        LocalStorage::new("."),
        LocalStorage::new(output_path.clone()),
        config,
    );
    JobEngine::new(pipeline).run().await.unwrap();

    let csv = std::fs::read_to_string(temp_dir.path().join("out/output.csv")).unwrap();
    assert_eq!(csv, format!("dob,md\n2001-11-11,11-11\nbad,{}\n", UNKNOWN_SIGN));
}
