use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use tally_rs::{
    Amount, ConnectionName, Direction, Note, create_connection, create_transaction, initialize_db,
};

/// A utility for creating a test database for the Tally web server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// A connection and the transactions to record against it, as (amount, direction, note).
const DEMO_DATA: &[(&str, &[(f64, Direction, &str)])] = &[
    (
        "Alice",
        &[
            (50.0, Direction::Give, "Concert tickets"),
            (20.0, Direction::Take, "Taxi home"),
        ],
    ),
    (
        "Bob",
        &[
            (12.5, Direction::Take, "Coffee"),
            (1250.0, Direction::Give, "Rent share"),
            (1250.0, Direction::Take, ""),
        ],
    ),
    ("Carol", &[]),
];

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

    for (name, transactions) in DEMO_DATA {
        println!("Creating connection {name:?}...");
        let connection = create_connection(ConnectionName::new(name)?, None, &conn)?;

        for (amount, direction, note) in transactions.iter() {
            create_transaction(
                connection.id,
                Amount::new(*amount)?,
                *direction,
                Note::parse(note)?,
                &conn,
            )?;
        }
    }

    println!("Success!");

    Ok(())
}
