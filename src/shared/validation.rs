use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Regex for document display names
    /// Display names become part of the storage key, so path separators and
    /// control characters are rejected.
    /// - Valid: "report.pdf", "Week 3 - notes.docx", "bài giảng.pptx"
    /// - Invalid: "a/b.pdf", "..\\x.txt", "tab\there.txt"
    pub static ref DISPLAY_NAME_REGEX: Regex = Regex::new(r"^[^/\\\x00-\x1F\x7F]+$").unwrap();
}
