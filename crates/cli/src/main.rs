use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use triage_core::{
    catalog::parse_tags,
    config::{resolve_facility_data_file, triage_rules_from_env_value},
    constants::DEFAULT_DRAFT_FILE,
    Condition, Department, DraftStore, Duration, Facility, FacilityStore, FileDraftStore,
    InMemoryFacilityStore, Location, LumpSize, Medicine, Questionnaire, SearchCriteria, Symptom,
    TriageError, TriageService,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Symptom intake and facility triage CLI")]
struct Cli {
    /// File holding the in-progress questionnaire
    #[arg(long, global = true, default_value = DEFAULT_DRAFT_FILE)]
    draft_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every closed tag catalog
    Catalog,
    /// Recommend departments for locations and symptoms
    Recommend {
        /// Body location (repeatable)
        #[arg(long = "location")]
        locations: Vec<String>,
        /// Symptom (repeatable)
        #[arg(long = "symptom")]
        symptoms: Vec<String>,
    },
    /// Render the clinician summary for a questionnaire file (JSON or YAML)
    Describe {
        file: PathBuf,
    },
    /// Search facilities
    Search {
        /// Facility data file (default: data/facilities.yaml)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Requested department, highest priority first (repeatable)
        #[arg(long = "department")]
        departments: Vec<String>,
        /// City filter (repeatable)
        #[arg(long = "city")]
        cities: Vec<String>,
        /// Case-insensitive name keyword
        #[arg(long)]
        keyword: Option<String>,
    },
    /// Validate, recommend, describe and search for a questionnaire file
    Assess {
        file: PathBuf,
        /// Facility data file (default: data/facilities.yaml)
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Manage the in-progress questionnaire
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Save a questionnaire file as the draft
    Save { file: PathBuf },
    /// Print the saved draft
    Show,
    /// Delete the saved draft
    Clear,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Catalog) => {
            print_catalog();
            Ok(())
        }
        Some(Commands::Recommend {
            locations,
            symptoms,
        }) => recommend(&locations, &symptoms),
        Some(Commands::Describe { file }) => describe(&file),
        Some(Commands::Search {
            data,
            departments,
            cities,
            keyword,
        }) => search(data, &departments, cities, keyword),
        Some(Commands::Assess { file, data }) => assess(&file, data),
        Some(Commands::Draft { action }) => draft(&cli.draft_file, action),
        None => {
            println!("Use --help to see available commands");
            Ok(())
        }
    };

    match result {
        Err(TriageError::Validation(errors)) => {
            eprintln!("Questionnaire is incomplete:");
            for error in errors {
                eprintln!("  - {error}");
            }
            std::process::exit(2);
        }
        other => Ok(other?),
    }
}

fn print_catalog() {
    fn section<T: std::fmt::Display>(title: &str, items: &[T]) {
        println!("{title}:");
        for item in items {
            println!("  {item}");
        }
    }

    section("Locations", Location::ALL);
    section("Durations", Duration::ALL);
    section("Symptoms", Symptom::ALL);
    section("Lump sizes", LumpSize::ALL);
    section("Conditions", Condition::ALL);
    section("Medicine", Medicine::ALL);
    section("Departments", Department::ALL);
}

fn recommend(locations: &[String], symptoms: &[String]) -> Result<(), TriageError> {
    let rules = triage_rules_from_env_value(std::env::var("TRIAGE_RULES_FILE").ok())?;
    let locations: Vec<Location> = parse_tags(locations)?;
    let symptoms: Vec<Symptom> = parse_tags(symptoms)?;

    for department in rules.recommend(&locations, &symptoms) {
        println!("{department}");
    }
    Ok(())
}

/// Read a questionnaire, choosing YAML for `.yaml`/`.yml` and JSON otherwise.
fn read_questionnaire(path: &Path) -> Result<Questionnaire, TriageError> {
    let text = std::fs::read_to_string(path).map_err(TriageError::FileRead)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let questionnaire = if is_yaml {
        Questionnaire::from_yaml(&text)?
    } else {
        Questionnaire::from_json(&text)?
    };
    Ok(questionnaire)
}

fn describe(file: &Path) -> Result<(), TriageError> {
    let validated = read_questionnaire(file)?
        .into_validated()
        .map_err(TriageError::Validation)?;
    println!("{}", triage_core::describe(&validated));
    Ok(())
}

fn service(data: Option<PathBuf>) -> Result<TriageService<dyn FacilityStore>, TriageError> {
    let path = resolve_facility_data_file(data)?;
    let rules = triage_rules_from_env_value(std::env::var("TRIAGE_RULES_FILE").ok())?;
    let store: Arc<dyn FacilityStore> = Arc::new(InMemoryFacilityStore::from_yaml_file(&path)?);
    Ok(TriageService::new(store, Arc::new(rules)))
}

fn print_facilities(facilities: &[Facility]) {
    if facilities.is_empty() {
        println!("No facilities found.");
        return;
    }
    for facility in facilities {
        let departments: Vec<&str> = facility.departments.iter().map(|d| d.as_str()).collect();
        println!(
            "{} ({}) - {} | {} | {}",
            facility.name,
            facility.city,
            departments.join(", "),
            facility.address,
            facility.phone
        );
    }
}

fn search(
    data: Option<PathBuf>,
    departments: &[String],
    cities: Vec<String>,
    keyword: Option<String>,
) -> Result<(), TriageError> {
    let criteria = SearchCriteria {
        departments: parse_tags(departments)?,
        cities,
        keyword,
    };
    let facilities = service(data)?.search(&criteria)?;
    print_facilities(&facilities);
    println!("{} found", facilities.len());
    Ok(())
}

fn assess(file: &Path, data: Option<PathBuf>) -> Result<(), TriageError> {
    let questionnaire = read_questionnaire(file)?;
    let assessment = service(data)?.assess(&questionnaire)?;

    let departments: Vec<&str> = assessment.departments.iter().map(|d| d.as_str()).collect();
    println!("Recommended departments: {}", departments.join(", "));
    println!();
    println!("{}", assessment.description);
    println!();
    print_facilities(&assessment.facilities);
    Ok(())
}

fn draft(draft_file: &Path, action: DraftAction) -> Result<(), TriageError> {
    let store = FileDraftStore::new(draft_file);
    match action {
        DraftAction::Save { file } => {
            let questionnaire = read_questionnaire(&file)?;
            store.save(&questionnaire)?;
            let missing = questionnaire.validate();
            if missing.is_empty() {
                println!("Draft saved; questionnaire is complete.");
            } else {
                println!("Draft saved; {} answer(s) still missing.", missing.len());
            }
        }
        DraftAction::Show => match store.load()? {
            Some(questionnaire) => {
                let json = serde_json::to_string_pretty(&questionnaire).map_err(|e| {
                    TriageError::InvalidInput(format!("failed to render draft: {e}"))
                })?;
                println!("{json}");
            }
            None => println!("No draft saved."),
        },
        DraftAction::Clear => {
            store.clear()?;
            println!("Draft cleared.");
        }
    }
    Ok(())
}
