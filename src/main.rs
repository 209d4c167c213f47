// Entry point and CLI flow.
//
// One-shot mode loads the three tables, applies the `--year`/`--county`
// selection and writes every report. `--interactive` keeps the prepared
// dataset in memory and lets the user change the selection and regenerate
// reports without reloading.
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use wildfire_report::util::{format_int, format_number, parse_i32_safe};
use wildfire_report::{output, reports, Config, Dataset, FilterSelection, PipelineError};

#[derive(Parser)]
#[command(name = "wildfire_report", about = "Wildfire incident reporting pipeline")]
struct Cli {
    /// Property assessment table (default: assess_value.csv)
    #[arg(long)]
    assessments: Option<PathBuf>,
    /// Aggregate fire statistics table (default: fire.csv)
    #[arg(long)]
    fires: Option<PathBuf>,
    /// Per-incident fire table (default: singleFire.csv)
    #[arg(long)]
    incidents: Option<PathBuf>,
    /// Keep only incidents started in this year (repeatable)
    #[arg(long = "year")]
    years: Vec<i32>,
    /// Keep only incidents touching this county (repeatable)
    #[arg(long = "county")]
    counties: Vec<String>,
    /// Number of incidents in the top-N loss rankings
    #[arg(long)]
    top: Option<usize>,
    /// Directory report files are written into
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// Rows shown in each console preview
    #[arg(long)]
    preview_rows: Option<usize>,
    /// Print the available years and counties and exit
    #[arg(long)]
    list_options: bool,
    /// Menu-driven session that keeps the dataset loaded between reports
    #[arg(long)]
    interactive: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let defaults = Config::default();
        Config {
            assessments_path: self.assessments.clone().unwrap_or(defaults.assessments_path),
            fire_summary_path: self.fires.clone().unwrap_or(defaults.fire_summary_path),
            incidents_path: self.incidents.clone().unwrap_or(defaults.incidents_path),
            out_dir: self.out_dir.clone().unwrap_or(defaults.out_dir),
            top_n: self.top.unwrap_or(defaults.top_n),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
        }
    }
}

/// Read a single line of input after printing `prompt`.
fn read_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    // Stdin closed: nothing more can be asked.
    if matches!(io::stdin().read_line(&mut buf), Ok(0) | Err(_)) {
        println!();
        std::process::exit(0);
    }
    buf.trim().to_string()
}

/// Ask the user whether to go back to the menu after generating reports.
fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn load(config: &Config) -> Result<Dataset, PipelineError> {
    let dataset = Dataset::prepare(config)?;
    let r = &dataset.report;
    log::info!(
        "Loaded {} incidents, {} assessment rows ({} skipped), {} fire summary rows",
        format_int(r.incident_rows),
        format_int(r.assessment_rows),
        format_int(r.skipped_assessments),
        format_int(r.fire_summary_rows)
    );
    println!(
        "Processing dataset... ({} incidents, {} counties with assessment data)",
        format_int(r.incident_rows),
        format_int(dataset.index.len())
    );
    if r.undated_incidents > 0 {
        println!(
            "Note: {} incidents have no usable start date.",
            format_int(r.undated_incidents)
        );
    }
    if r.unmatched_county_refs > 0 {
        println!(
            "Note: {} county references had no assessment data (left out of exposure averages).",
            format_int(r.unmatched_county_refs)
        );
    }
    println!();
    Ok(dataset)
}

fn list_options(dataset: &Dataset) {
    let years: Vec<String> = dataset.available_years().iter().map(i32::to_string).collect();
    println!("Years: {}", years.join(", "));
    println!("Counties: {}", dataset.available_counties().join(", "));
}

fn export<T: serde::Serialize>(config: &Config, file: &str, rows: &[T]) {
    let path = config.out_dir.join(file);
    if let Err(e) = output::write_csv(&path, rows) {
        log::error!("Write error for {}: {e}", path.display());
    }
}

/// Write every report for `selection` and print short previews.
fn generate_reports(dataset: &Dataset, selection: &FilterSelection, config: &Config) {
    if let Err(e) = std::fs::create_dir_all(&config.out_dir) {
        log::error!("Cannot create {}: {e}", config.out_dir.display());
    }
    let view = dataset.view(selection);
    println!("Generating reports for {} incidents...\n", format_int(view.len()));

    let kpi = reports::kpi_summary(&view);
    let kpi_path = config.out_dir.join("kpi_summary.json");
    if let Err(e) = output::write_json(&kpi_path, &kpi) {
        log::error!("Write error for {}: {e}", kpi_path.display());
    }
    println!("California Wildfire Dashboard\n");
    println!("Total Fires: {}", format_int(kpi.total_fires));
    println!("Total Acres Burned: {}", format_number(kpi.total_acres_burned, 0));
    println!(
        "Total Structures Destroyed: {}\n",
        format_number(kpi.total_structures_destroyed, 0)
    );

    let annual = reports::annual_trend(&view);
    export(config, "annual_trend.csv", &annual);
    println!("Annual Trend\n");
    output::preview_table_rows(&annual, config.preview_rows);

    let monthly = reports::monthly_seasonality(&view);
    export(config, "monthly_seasonality.csv", &monthly);
    println!("Seasonality (Monthly Fires)\n");
    output::preview_table_rows(&monthly, 12);

    match reports::map_points(&view, dataset.report.has_coordinates) {
        Some(points) => {
            export(config, "map_points.csv", &points);
            println!(
                "Fire Map: {} plotted incidents (map_points.csv)\n",
                format_int(points.len())
            );
        }
        None => log::warn!("Incident table has no Latitude/Longitude columns; skipping map"),
    }

    let by_score = reports::top_by_loss_score(&view, config.top_n);
    export(config, "top_loss_score.csv", &by_score);
    println!("Top {} Fires by Property Loss\n", config.top_n);
    output::preview_table_rows(&by_score, config.preview_rows);

    let by_value = reports::top_by_loss_value(&view, config.top_n);
    export(config, "top_loss_value.csv", &by_value);
    println!("Top {} Fires by Estimated Loss Value\n", config.top_n);
    output::preview_table_rows(&by_value, config.preview_rows);

    println!("(Full tables exported to {})\n", config.out_dir.display());
}

/// Parse a comma-separated year list; unparseable entries are reported and ignored.
fn parse_years(input: &str) -> Vec<i32> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let year = parse_i32_safe(Some(s));
            if year.is_none() {
                println!("Ignoring invalid year {s:?}");
            }
            year
        })
        .collect()
}

fn prompt_selection() -> FilterSelection {
    let years = parse_years(&read_line("Years (comma-separated, blank for all): "));
    let counties: Vec<String> = read_line("Counties (comma-separated, blank for all): ")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    FilterSelection::new(years, counties)
}

fn run_interactive(config: &Config, initial: FilterSelection) {
    let mut dataset: Option<Dataset> = None;
    let mut selection = initial;
    loop {
        println!("Select an option:");
        println!("[1] Load the files");
        println!("[2] Set filters");
        println!("[3] Generate Reports\n");
        match read_line("Enter choice: ").as_str() {
            "1" => match load(config) {
                Ok(d) => dataset = Some(d),
                Err(e) => eprintln!("Failed to load files: {e}\n"),
            },
            "2" => {
                if let Some(d) = &dataset {
                    list_options(d);
                }
                selection = prompt_selection();
                println!();
            }
            "3" => {
                let Some(d) = &dataset else {
                    println!("Error: No data loaded. Please load the files first (option 1).\n");
                    continue;
                };
                println!();
                generate_reports(d, &selection, config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let config = cli.config();
    let selection = FilterSelection::new(cli.years.iter().copied(), cli.counties.iter().cloned());

    if cli.interactive {
        run_interactive(&config, selection);
        return Ok(());
    }

    let dataset = load(&config)?;
    if cli.list_options {
        list_options(&dataset);
        return Ok(());
    }
    generate_reports(&dataset, &selection, &config);
    Ok(())
}
