use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use pets_core::{
    apply_branches, apply_save,
    validation::word_count_message,
    Application, ApplicationId, DateParts, FieldMap, FieldValue, SaveAction, SectionKind, Tracker,
};
use pets_files::{UploadKind, UploadService};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pets")]
#[command(about = "PETS pre-entry TB screening CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a new, empty application YAML file
    New {
        /// File to create
        file: PathBuf,
    },
    /// Print the task list for an application file
    Tracker {
        /// Application YAML file
        file: PathBuf,
    },
    /// Save a section form into an application file
    ///
    /// Fields are `key=value` for text, `key.day=1 key.month=2 key.year=2025` for
    /// dates and `key[]=value` (repeated) for checkbox groups.
    Save {
        /// Application YAML file
        file: PathBuf,
        /// Section slug, e.g. travel-information
        section: String,
        /// save-progress or save-and-continue
        action: String,
        /// Field values
        fields: Vec<String>,
    },
    /// Check a file before upload and print its metadata
    CheckUpload {
        /// What the file is being uploaded as
        kind: UploadKindArg,
        /// File to check
        path: PathBuf,
    },
    /// Print the word count hint for a limited free-text field
    Words {
        /// Word limit
        limit: usize,
        /// Text typed so far
        text: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum UploadKindArg {
    ApplicantPhoto,
    ChestXray,
}

impl From<UploadKindArg> for UploadKind {
    fn from(arg: UploadKindArg) -> Self {
        match arg {
            UploadKindArg::ApplicantPhoto => UploadKind::ApplicantPhoto,
            UploadKindArg::ChestXray => UploadKind::ChestXray,
        }
    }
}

/// Parses `key=value`, `key.day=..` and `key[]=..` arguments into form values.
fn parse_fields(args: &[String]) -> Result<FieldMap, String> {
    let mut fields = FieldMap::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got '{arg}'"))?;

        if let Some(key) = key.strip_suffix("[]") {
            match fields
                .entry(key.to_owned())
                .or_insert_with(|| FieldValue::List(Vec::new()))
            {
                FieldValue::List(items) => items.push(value.to_owned()),
                _ => return Err(format!("'{key}' is used as more than one kind of field")),
            }
            continue;
        }

        if let Some((key, part)) = key.rsplit_once('.') {
            let entry = fields
                .entry(key.to_owned())
                .or_insert_with(|| FieldValue::Date(DateParts::default()));
            let FieldValue::Date(date) = entry else {
                return Err(format!("'{key}' is used as more than one kind of field"));
            };
            match part {
                "day" => date.day = value.to_owned(),
                "month" => date.month = value.to_owned(),
                "year" => date.year = value.to_owned(),
                other => return Err(format!("unknown date part '{other}' for '{key}'")),
            }
            continue;
        }

        fields.insert(key.to_owned(), FieldValue::Text(value.to_owned()));
    }
    Ok(fields)
}

fn read_application(file: &Path) -> Result<Application, Box<dyn std::error::Error>> {
    let yaml = fs::read_to_string(file)?;
    Ok(Application::from_yaml(&yaml)?)
}

fn print_tracker(application: &Application) {
    let tracker = Tracker::for_application(application);
    println!("Application {}: {}", application.id, tracker.overall_status);
    for group in &tracker.groups {
        println!("{}", group.heading);
        for task in &group.tasks {
            let marker = if task.clickable { ' ' } else { 'x' };
            println!("  [{}] {:<28} {}", marker, task.name, task.status);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::New { file }) => {
            if file.exists() {
                return Err(format!("{} already exists", file.display()).into());
            }
            let application = Application::new(ApplicationId::new(), Utc::now());
            fs::write(&file, application.to_yaml()?)?;
            println!("Created application {} in {}", application.id, file.display());
        }
        Some(Commands::Tracker { file }) => {
            let application = read_application(&file)?;
            print_tracker(&application);
        }
        Some(Commands::Save {
            file,
            section,
            action,
            fields,
        }) => {
            let mut application = read_application(&file)?;
            let kind: SectionKind = section.parse()?;
            let action: SaveAction = action.parse()?;
            let fields = parse_fields(&fields)?;

            let current = application.section(kind);
            match apply_save(kind, &current, action, fields, Utc::now().date_naive()) {
                Ok(saved) => {
                    application.set_section(kind, saved.section);
                    apply_branches(&mut application);
                    fs::write(&file, application.to_yaml()?)?;
                    println!(
                        "Saved {} ({}), next page: {}",
                        kind,
                        application.status(kind).as_str(),
                        saved.next_page
                    );
                }
                Err(errors) => {
                    eprintln!("There is a problem");
                    for error in &errors.errors {
                        eprintln!("  {}: {}", error.field, error.message);
                    }
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::CheckUpload { kind, path }) => {
            match UploadService::default().check_file(kind.into(), &path) {
                Ok(metadata) => {
                    println!("File: {}", metadata.file_name);
                    println!("Size: {} bytes", metadata.size_bytes);
                    if let Some(media_type) = metadata.media_type {
                        println!("Media type: {}", media_type);
                    }
                    println!("SHA-256: {}", metadata.checksum);
                }
                Err(e) => {
                    eprintln!("Upload rejected: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Words { limit, text }) => {
            println!("{}", word_count_message(&text, limit));
        }
        None => {
            println!("Use 'pets --help' for commands");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_fields_builds_text_date_and_list_values() {
        let fields = parse_fields(&args(&[
            "visaCategory=Work",
            "dateXrayTaken.day=1",
            "dateXrayTaken.month=2",
            "dateXrayTaken.year=2025",
            "symptoms[]=Cough",
            "symptoms[]=Night sweats",
        ]))
        .unwrap();

        assert_eq!(fields["visaCategory"], FieldValue::Text("Work".into()));
        assert_eq!(
            fields["dateXrayTaken"],
            FieldValue::Date(DateParts::new("1", "2", "2025"))
        );
        assert_eq!(
            fields["symptoms"],
            FieldValue::List(vec!["Cough".into(), "Night sweats".into()])
        );
    }

    #[test]
    fn test_parse_fields_rejects_bad_arguments() {
        assert!(parse_fields(&args(&["noequals"])).is_err());
        assert!(parse_fields(&args(&["d.week=1"])).is_err());
        assert!(parse_fields(&args(&["x[]=a", "x.day=1"])).is_err());
    }

    #[test]
    fn test_new_application_round_trips_through_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("application.yaml");
        let application = Application::new(ApplicationId::new(), Utc::now());
        fs::write(&file, application.to_yaml().unwrap()).unwrap();

        let read = read_application(&file).unwrap();
        assert_eq!(read.id, application.id);
        assert!(Tracker::for_application(&read)
            .tasks()
            .skip(1)
            .all(|task| !task.clickable));
    }
}
