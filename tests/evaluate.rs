use std::collections::HashMap;

use condlang::{evaluate, parse_condition, EvaluateError, FileProbe, NoFiles, ParsedCondition};

/// In-memory filesystem: files with content and mtime, directories with names.
#[derive(Default)]
struct MemFs {
    files: HashMap<String, (String, i64)>,
    dirs: HashMap<String, Vec<String>>,
}

impl MemFs {
    fn file(mut self, path: &str, content: &str, mtime: i64) -> Self {
        self.files
            .insert(path.to_owned(), (content.to_owned(), mtime));
        self
    }

    fn dir(mut self, path: &str, names: &[&str]) -> Self {
        self.dirs.insert(
            path.to_owned(),
            names.iter().map(|n| (*n).to_owned()).collect(),
        );
        self
    }
}

impl FileProbe for MemFs {
    fn is_readable_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn is_readable_dir(&self, path: &str) -> bool {
        self.dirs.contains_key(path)
    }

    fn is_empty_dir(&self, path: &str) -> bool {
        self.dirs.get(path).is_some_and(Vec::is_empty)
    }

    fn file_size(&self, path: &str) -> Option<u64> {
        self.files.get(path).map(|(content, _)| content.len() as u64)
    }

    fn file_content(&self, path: &str) -> Option<String> {
        self.files.get(path).map(|(content, _)| content.clone())
    }

    fn last_modified(&self, path: &str) -> Option<i64> {
        self.files.get(path).map(|(_, mtime)| *mtime)
    }

    fn list_files(&self, dir: &str) -> Vec<String> {
        self.dirs.get(dir).cloned().unwrap_or_default()
    }
}

fn fs() -> MemFs {
    MemFs::default()
        .file("/data/report.csv", "id,total\n1,42\n", 1_700_000_000_000)
        .file("/data/empty.txt", "", 1_600_000_000_000)
        .dir("/data", &["report.csv", "empty.txt"])
        .dir("/tmp/out", &[])
}

fn check(condition: &str, subject: &str) -> bool {
    let cond = parse_condition(condition).unwrap();
    evaluate(&cond, Some(subject), &fs()).unwrap()
}

#[test]
fn readable_file_and_path() {
    assert!(check("p is readable-file", "/data/report.csv"));
    assert!(!check("p is readable-file", "/data"));
    assert!(check("p is not readable-file", "/nope"));
    assert!(check("p is readable-path", "/data"));
    assert!(check("p is not readable-path", "/data/report.csv"));
}

#[test]
fn empty_path() {
    assert!(check("p is empty-path", "/tmp/out"));
    assert!(!check("p is empty-path", "/data"));
    assert!(check("p is not empty-path", "/data"));
}

#[test]
fn file_size_is_a_minimum() {
    assert!(check("p has file-size 10", "/data/report.csv"));
    assert!(!check("p has file-size 1000", "/data/report.csv"));
    assert!(check("p has file-size 0", "/data/empty.txt"));
    assert!(!check("p has file-size 0", "/missing"));
}

#[test]
fn file_content() {
    assert!(check("p has file content total", "/data/report.csv"));
    assert!(!check("p has file content grand", "/data/report.csv"));
    assert!(check("p has file content pattern \\d+,\\d+", "/data/report.csv"));
}

#[test]
fn last_modified() {
    assert!(check("p has lastmod > 1650000000000", "/data/report.csv"));
    assert!(check("p has lastmod < 1650000000000", "/data/empty.txt"));
    assert!(check("p has lastmod = 1600000000000", "/data/empty.txt"));
    assert!(!check("p has lastmod > 0", "/missing"));
}

#[test]
fn contain_file() {
    assert!(check("d contain file report.csv", "/data"));
    assert!(!check("d contain file report", "/data"));
    assert!(check("d contain file pattern .*\\.txt", "/data"));
    assert!(!check("d contain file pattern .*\\.json", "/data"));
}

#[test]
fn undefined_subject() {
    let undefined = parse_condition("x is undefined").unwrap();
    assert!(evaluate(&undefined, None, &NoFiles).unwrap());
    assert!(!evaluate(&undefined, Some("v"), &NoFiles).unwrap());

    let not_empty = parse_condition("x is not empty").unwrap();
    assert!(!evaluate(&not_empty, None, &NoFiles).unwrap());
}

#[test]
fn numeric_control_checked_at_evaluation_when_deferred() {
    let cond = condlang::ConditionParser::new()
        .parse_deferred("x > ${limit}")
        .unwrap();
    assert!(matches!(
        evaluate(&cond, Some("5"), &NoFiles),
        Err(EvaluateError::NotNumeric { ref value, .. }) if value == "${limit}"
    ));
}

#[test]
fn any_is_always_true() {
    let cond = ParsedCondition::untyped("whatever");
    assert!(evaluate(&cond, Some(""), &NoFiles).unwrap());
    assert!(evaluate(&cond, None, &NoFiles).unwrap());
}
