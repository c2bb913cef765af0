// seating-chart: student roster

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::AppError;
use crate::layout::{self, Coord};

/// One row of the roster file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StudentRecord {
    pub number: Option<u32>,
    pub name: String,
    pub kana: String,
    pub group: String,
}

/// A roster record after seat assignment. Empty desks carry group `e` and
/// blank text fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatedRecord {
    pub number: Option<u32>,
    pub name: String,
    pub kana: String,
    pub group: String,
    pub group_shuffle: u32,
    pub x_idx: u32,
    pub y_idx: u32,
}

impl SeatedRecord {
    pub fn seat(student: StudentRecord, group_shuffle: u32, coord: Coord) -> Self {
        Self {
            number: student.number,
            name: student.name,
            kana: student.kana,
            group: student.group,
            group_shuffle,
            x_idx: coord.x,
            y_idx: coord.y,
        }
    }

    pub fn empty_desk(group_shuffle: u32, coord: Coord) -> Self {
        Self {
            number: None,
            name: String::new(),
            kana: String::new(),
            group: layout::EMPTY_DESK.to_string(),
            group_shuffle,
            x_idx: coord.x,
            y_idx: coord.y,
        }
    }

    pub fn is_empty_desk(&self) -> bool {
        self.group == layout::EMPTY_DESK
    }

    pub fn coord(&self) -> Coord {
        Coord {
            x: self.x_idx,
            y: self.y_idx,
        }
    }
}

/// Validated list of students
#[derive(Debug, Clone)]
pub struct Roster {
    students: Vec<StudentRecord>,
}

impl Roster {
    pub fn new(students: Vec<StudentRecord>) -> Result<Self, AppError> {
        if let Some(student) = students.iter().find(|s| layout::is_reserved(&s.group)) {
            return Err(AppError::ReservedGroupUsed {
                group: student.group.clone(),
            });
        }
        Ok(Self { students })
    }

    /// Load a roster from CSV, or from a JSON array when the extension is `.json`.
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            let content = std::fs::read_to_string(path)
                .map_err(|e| AppError::RosterError(format!("{}: {}", path.display(), e)))?;
            Self::from_json(&content)
        } else {
            let file = std::fs::File::open(path)
                .map_err(|e| AppError::RosterError(format!("{}: {}", path.display(), e)))?;
            Self::from_csv_reader(file)
        }
    }

    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, AppError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let students = csv_reader
            .deserialize()
            .collect::<Result<Vec<StudentRecord>, _>>()
            .map_err(|e| AppError::RosterError(e.to_string()))?;
        Self::new(students)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        let students: Vec<StudentRecord> = serde_json::from_str(content)
            .map_err(|e| AppError::RosterError(format!("Invalid JSON: {}", e)))?;
        Self::new(students)
    }

    pub fn into_students(self) -> Vec<StudentRecord> {
        self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn groups(&self) -> BTreeSet<String> {
        self.students.iter().map(|s| s.group.clone()).collect()
    }
}
