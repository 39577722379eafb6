//! Tests for the download subcommand.

use super::parse;
use crate::cli::CliCommand;
use std::path::Path;

#[test]
fn cli_parse_download() {
    match parse(&["edb", "download", "https://example.com/ep.mp4"]) {
        CliCommand::Download {
            url,
            path,
            livestreams,
            no_livestreams,
        } => {
            assert_eq!(url, "https://example.com/ep.mp4");
            assert!(path.is_none());
            assert!(!livestreams);
            assert!(!no_livestreams);
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_parse_download_path() {
    match parse(&[
        "edb",
        "download",
        "https://example.com/ep.mp4",
        "--path",
        "/media",
    ]) {
        CliCommand::Download { path, .. } => {
            assert_eq!(path.as_deref(), Some(Path::new("/media")));
        }
        _ => panic!("expected Download with --path"),
    }
}

#[test]
fn cli_parse_download_no_livestreams() {
    match parse(&[
        "edb",
        "download",
        "https://example.com/ep.mp4",
        "--no-livestreams",
    ]) {
        CliCommand::Download {
            livestreams,
            no_livestreams,
            ..
        } => {
            assert!(!livestreams);
            assert!(no_livestreams);
        }
        _ => panic!("expected Download with --no-livestreams"),
    }
}

#[test]
fn cli_parse_download_livestreams_override() {
    // The later flag wins.
    match parse(&[
        "edb",
        "download",
        "https://example.com/ep.mp4",
        "--no-livestreams",
        "--livestreams",
    ]) {
        CliCommand::Download {
            livestreams,
            no_livestreams,
            ..
        } => {
            assert!(livestreams);
            assert!(!no_livestreams);
        }
        _ => panic!("expected Download"),
    }
}
