use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use patient_core::{constants::DEFAULT_SEED_COUNT, seed, CoreConfig, PatientDto, PatientService};

#[derive(Parser)]
#[command(name = "patient")]
#[command(about = "Patient record service CLI")]
struct Cli {
    /// SQLite database file (overrides PATIENT_DB_PATH)
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient as JSON
    Get {
        /// Patient id
        id: i64,
    },
    /// Search patients by last or first name
    Search {
        /// Case-insensitive substring
        query: String,
    },
    /// Find a patient by national id
    Nss {
        /// 15-digit national id
        national_id: String,
    },
    /// Find a patient by last name, first name and birth date
    Find {
        /// Last name (exact)
        last_name: String,
        /// First name (exact)
        first_name: String,
        /// Birth date (YYYY-MM-DD)
        birth_date: NaiveDate,
    },
    /// List patients with a blood group
    Blood {
        /// Blood group, e.g. A+
        group: String,
    },
    /// List patients born between two dates (inclusive)
    Born {
        /// Lower bound (YYYY-MM-DD)
        from: NaiveDate,
        /// Upper bound (YYYY-MM-DD)
        to: NaiveDate,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        id: i64,
    },
    /// Fill an empty database with synthetic patients (development only)
    Seed {
        /// Number of patients to generate
        #[arg(long, default_value_t = DEFAULT_SEED_COUNT)]
        count: usize,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("patient=warn".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'patient --help' for commands");
        return Ok(());
    };

    let db = cli.db.or_else(|| std::env::var("PATIENT_DB_PATH").ok());
    let cfg = CoreConfig::from_env_values(db, None)?;
    tracing::info!(db = %cfg.db_path().display(), "opening patient store");
    let service = PatientService::open(&cfg)
        .with_context(|| format!("failed to open {}", cfg.db_path().display()))?;

    run(&service, command)
}

fn run(service: &PatientService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => print_patients(&service.get_all()?),
        Commands::Get { id } => print_json(&service.get_by_id(id)?)?,
        Commands::Search { query } => {
            print_patients(&service.search_by_name_or_firstname(&query)?)
        }
        Commands::Nss { national_id } => print_json(&service.find_by_national_id(&national_id)?)?,
        Commands::Find {
            last_name,
            first_name,
            birth_date,
        } => print_json(&service.find_by_identity(&last_name, &first_name, birth_date)?)?,
        Commands::Blood { group } => print_patients(&service.find_by_blood_group(&group)?),
        Commands::Born { from, to } => {
            print_patients(&service.find_by_birth_date_range(from, to)?)
        }
        Commands::Delete { id } => {
            service.delete(id)?;
            tracing::info!(id, "patient deleted from CLI");
            println!("Deleted patient {id}");
        }
        Commands::Seed { count } => {
            let inserted = seed::seed_if_empty(service, count, &mut rand::thread_rng())?;
            if inserted == 0 {
                println!("Database already holds patients; nothing seeded.");
            } else {
                println!("Seeded {inserted} patients.");
            }
        }
    }

    Ok(())
}

fn print_patients(patients: &[PatientDto]) {
    if patients.is_empty() {
        println!("No patients found.");
        return;
    }

    for patient in patients {
        println!(
            "ID: {}, Name: {} {}, Born: {}, National id: {}",
            patient.id.unwrap_or_default(),
            patient.first_name,
            patient.last_name,
            patient.birth_date,
            patient.national_id.as_deref().unwrap_or("-"),
        );
    }
}

fn print_json(patient: &PatientDto) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(patient)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_core::Gender;

    fn alaoui() -> PatientDto {
        PatientDto {
            id: None,
            last_name: "Alaoui".into(),
            first_name: "Ahmed".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
            phone: None,
            address: "123 Rue Mohammed V".into(),
            email: None,
            gender: Gender::Male,
            medical_history: None,
            national_id: Some("123456789012345".into()),
            blood_group: Some("A+".into()),
            created_at: None,
            updated_at: None,
        }
    }

    fn parse(args: &[&str]) -> Commands {
        Cli::try_parse_from(args).unwrap().command.unwrap()
    }

    #[test]
    fn find_command_parses_identity() {
        match parse(&["patient", "find", "Alaoui", "Ahmed", "1985-06-15"]) {
            Commands::Find {
                last_name,
                first_name,
                birth_date,
            } => {
                assert_eq!(last_name, "Alaoui");
                assert_eq!(first_name, "Ahmed");
                assert_eq!(birth_date, NaiveDate::from_ymd_opt(1985, 6, 15).unwrap());
            }
            _ => panic!("expected find command"),
        }

        assert!(Cli::try_parse_from(["patient", "find", "Alaoui", "Ahmed", "yesterday"]).is_err());
    }

    #[test]
    fn blood_and_seed_commands_parse() {
        assert!(matches!(
            parse(&["patient", "blood", "O-"]),
            Commands::Blood { group } if group == "O-"
        ));
        assert!(matches!(
            parse(&["patient", "seed"]),
            Commands::Seed { count } if count == DEFAULT_SEED_COUNT
        ));
        let cli = Cli::try_parse_from(["patient", "list", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/x.db"));
    }

    #[test]
    fn find_reports_missing_identity_as_error() {
        let service = PatientService::in_memory().unwrap();
        service.create(&alaoui()).unwrap();

        let found = Commands::Find {
            last_name: "Alaoui".into(),
            first_name: "Ahmed".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 6, 15).unwrap(),
        };
        assert!(run(&service, found).is_ok());

        let missing = Commands::Find {
            last_name: "Alaoui".into(),
            first_name: "Ahmed".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        };
        let err = run(&service, missing).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn blood_and_delete_run_against_the_store() {
        let service = PatientService::in_memory().unwrap();
        let id = service.create(&alaoui()).unwrap().id.unwrap();

        assert!(run(&service, Commands::Blood { group: "A+".into() }).is_ok());
        assert!(run(&service, Commands::Delete { id }).is_ok());
        assert_eq!(service.count().unwrap(), 0);
        assert!(run(&service, Commands::Delete { id }).is_err());
    }
}
