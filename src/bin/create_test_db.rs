use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::str::FromStr;

use clap::Parser;
use email_address::EmailAddress;
use rusqlite::Connection;

use cashcontrol::{NewUser, PasswordHash, ValidatedPassword, count_users, create_user, initialize_db};

/// A utility for creating a test database for the CashControl REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user test@example.com with the password 'test'...");

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;

    create_user(
        NewUser {
            name: "Test User".to_owned(),
            email: EmailAddress::from_str("test@example.com")?,
            password_hash,
            monthly_income: 3000.0,
        },
        &conn,
    )?;

    println!("Success! The database has {} user(s).", count_users(&conn)?);

    Ok(())
}
