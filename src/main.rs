use quarry::cli::{parse_args, version, Command, USAGE};
use quarry::dump::dump_to_stdout;
use quarry::{log, LogSeverity};
use std::env;
use std::process;

fn main() {
    match parse_args(env::args().skip(1)) {
        Command::Version => println!("{}", version()),
        Command::Usage => {
            println!("{}", USAGE);
            process::exit(1);
        }
        Command::Dump { path, format } => {
            log(format!("dumping {}", path), LogSeverity::Debug);
            if let Err(err) = dump_to_stdout(&path, format) {
                log(format!("{}: {}", path, err), LogSeverity::Error);
                process::exit(1);
            }
        }
    }
}
