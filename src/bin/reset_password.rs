use std::{error::Error, io, path::Path, process::exit};

use clap::Parser;
use rusqlite::Connection;

use cashcontrol::{PasswordHash, User, ValidatedPassword, get_user_by_email, update_password};

/// A utility for changing the password for a registered user.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The email of the user whose password should be reset.
    #[arg(long)]
    email: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let db_path = Path::new(&args.db_path);
    validate_db_path(db_path);

    println!("Loading user from {db_path:#?}");
    let conn = Connection::open(db_path)?;
    let user = match get_user_by_email(&args.email, &conn) {
        Ok(user) => user,
        Err(error) => {
            print_error(format!("Could not find the user {}: {error}", args.email));
            exit(1);
        }
    };
    println!("Resetting password for {}", user.email);

    let password_hash = match get_new_password_hash(&user) {
        Some(password_hash) => password_hash,
        None => return Ok(()),
    };

    update_password(user.id, &password_hash, &conn)?;
    println!("Password updated successfully!");

    Ok(())
}

fn validate_db_path(db_path: &Path) {
    match db_path.extension() {
        None => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            print_error("Database path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if !db_path.is_file() {
        print_error(format!("File does not exist at {db_path:#?}!"));
        exit(1);
    }
}

/// Prompt until the user enters a strong password twice, or stdin closes.
fn get_new_password_hash(user: &User) -> Option<PasswordHash> {
    let email = user.email.to_string();

    loop {
        println!();

        let first_password = prompt("Enter a new password: ")?;

        if let Err(error) = ValidatedPassword::new(&first_password, &[&user.name, &email]) {
            print_error(error);
            continue;
        }

        let second_password = prompt("Enter the same password again: ")?;

        if first_password != second_password {
            print_error("Passwords must match, try again.");
            continue;
        }

        match PasswordHash::from_raw_password(&first_password, PasswordHash::DEFAULT_COST) {
            Ok(password_hash) => return Some(password_hash),
            Err(error) => {
                print_error(format!("Could not hash password: {error}. Try again."));
            }
        }
    }
}

fn prompt(message: &str) -> Option<String> {
    match rpassword::prompt_password(message) {
        Ok(string) => Some(string),
        Err(error) if error.kind() == io::ErrorKind::UnexpectedEof => None,
        Err(error) => {
            print_error(format!("Could not read password from stdin: {error}"));
            None
        }
    }
}

fn print_error(error: impl ToString) {
    eprintln!(
        "\x1b[31;1m{}\x1b[0m",
        capitalise_first_char(&error.to_string())
    )
}

fn capitalise_first_char(string: &str) -> String {
    let mut chars = string.chars();
    let Some(first) = chars.next() else {
        return String::with_capacity(0);
    };
    first.to_uppercase().chain(chars).collect()
}
