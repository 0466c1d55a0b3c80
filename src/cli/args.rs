//! Command-line argument parsing.
//!
//! This module handles parsing command-line arguments and determining
//! which command to execute.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Print the upload history
    ListUploads,
    /// Clear the upload history and settings
    ClearUploads,
    /// Copy a stored upload's object reference to the clipboard
    CopyReference {
        /// Object reference token, e.g. `F123`
        object_name: String,
    },
    /// Save endpoint and API token
    Configure {
        /// Base URL of the Phabricator instance
        endpoint: String,
        /// Conduit API token
        token: String,
    },
    /// Upload the given image files (default)
    Upload {
        /// Files to upload
        paths: Vec<PathBuf>,
        /// Treat the files as detected screenshots, applying the
        /// screenshot-only policies
        screenshot: bool,
    },
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut paths = Vec::new();
    let mut screenshot = false;

    let mut args = args.skip(1); // Skip the program name
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--list" => return CliCommand::ListUploads,
            "--clear" => return CliCommand::ClearUploads,
            "--copy" => {
                let object_name = args.next().unwrap_or_default();
                return CliCommand::CopyReference { object_name };
            }
            "--configure" => {
                let endpoint = args.next().unwrap_or_default();
                let token = args.next().unwrap_or_default();
                return CliCommand::Configure { endpoint, token };
            }
            "--screenshot" => screenshot = true,
            path => paths.push(PathBuf::from(path)),
        }
    }

    CliCommand::Upload { paths, screenshot }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let mut full = vec!["phabshot".to_string()];
        full.extend(args.iter().map(|s| s.to_string()));
        parse_args(full.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_list_flag() {
        assert_eq!(parse(&["--list"]), CliCommand::ListUploads);
    }

    #[test]
    fn test_parse_clear_flag() {
        assert_eq!(parse(&["--clear"]), CliCommand::ClearUploads);
    }

    #[test]
    fn test_parse_copy() {
        assert_eq!(
            parse(&["--copy", "F123"]),
            CliCommand::CopyReference {
                object_name: "F123".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_configure() {
        assert_eq!(
            parse(&["--configure", "https://phab.example.com", "api-abc"]),
            CliCommand::Configure {
                endpoint: "https://phab.example.com".to_string(),
                token: "api-abc".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_upload_paths() {
        assert_eq!(
            parse(&["a.png", "b.png"]),
            CliCommand::Upload {
                paths: vec![PathBuf::from("a.png"), PathBuf::from("b.png")],
                screenshot: false,
            }
        );
    }

    #[test]
    fn test_parse_screenshot_flag() {
        assert_eq!(
            parse(&["--screenshot", "shot.png"]),
            CliCommand::Upload {
                paths: vec![PathBuf::from("shot.png")],
                screenshot: true,
            }
        );
    }

    #[test]
    fn test_parse_no_args_is_empty_upload() {
        assert_eq!(
            parse(&[]),
            CliCommand::Upload {
                paths: Vec::new(),
                screenshot: false,
            }
        );
    }
}
