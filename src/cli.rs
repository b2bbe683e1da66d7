use crate::dump::Format;

pub const USAGE: &str = "usage: quarry [--json] [--version] <file>

Prints the tag tree of a gzip-compressed tag file (level.dat, player data),
or of every chunk in a .mca region file.

  --json     print one JSON object per root tag
  --version  display version information";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dump { path: String, format: Format },
    Version,
    Usage,
}

/// Parses the arguments following the program name.
pub fn parse_args<I, S>(args: I) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut format = Format::Text;
    let mut path = None;

    for arg in args {
        match arg.as_ref() {
            "--version" | "-version" => return Command::Version,
            "--json" | "-json" => format = Format::Json,
            "--help" | "-h" | "-help" => return Command::Usage,
            flag if flag.starts_with('-') => return Command::Usage,
            file => {
                if path.is_none() {
                    path = Some(file.to_string());
                }
            }
        }
    }

    match path {
        Some(path) => Command::Dump { path, format },
        None => Command::Usage,
    }
}

pub fn version() -> String {
    format!("quarry {}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        assert_eq!(
            parse_args(["level.dat"]),
            Command::Dump {
                path: "level.dat".to_string(),
                format: Format::Text
            }
        );
        assert_eq!(
            parse_args(["--json", "r.0.0.mca"]),
            Command::Dump {
                path: "r.0.0.mca".to_string(),
                format: Format::Json
            }
        );
        assert_eq!(parse_args(["level.dat", "--version"]), Command::Version);
    }

    #[test]
    fn test_usage() {
        assert_eq!(parse_args(Vec::<String>::new()), Command::Usage);
        assert_eq!(parse_args(["--json"]), Command::Usage);
        assert_eq!(parse_args(["--verbose", "level.dat"]), Command::Usage);
    }

    #[test]
    fn test_version() {
        assert!(version().starts_with("quarry "));
    }
}
