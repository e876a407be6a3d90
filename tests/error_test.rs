use std::io;

use kiln::error::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::FolderNotFound { key: "docs".to_string() };
    assert_eq!(err.to_string(), "Folder not found, this folder key not found: docs");

    let err = Error::ContentNotFound { reference: "a.txt".to_string() };
    assert_eq!(err.to_string(), "content not found: a.txt");

    let err = Error::TemplateNotFound { reference: "a.txt".to_string() };
    assert_eq!(err.to_string(), "template not found: a.txt");

    let err = Error::ConfigError("invalid config".to_string());
    assert_eq!(err.to_string(), "Configuration error: invalid config");
}
