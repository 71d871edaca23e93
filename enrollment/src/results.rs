use anyhow::{Context, Result};
use pulse::Room;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const FAILED_CODE: &str = "FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Success,
    Failed,
}

/// Outcome of regenerating the enrollment code for one room. Field names and
/// order are the csv header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrollmentResult {
    pub room_name: String,
    pub room_id: String,
    #[serde(rename = "device_enrollment_code")]
    pub code: String,
    pub status: Status,
}

impl EnrollmentResult {
    pub fn success(room: &Room, code: String) -> EnrollmentResult {
        EnrollmentResult {
            room_name: room.name.clone(),
            room_id: room.id.clone(),
            code: code,
            status: Status::Success,
        }
    }

    pub fn failed(room: &Room) -> EnrollmentResult {
        EnrollmentResult {
            room_name: room.name.clone(),
            room_id: room.id.clone(),
            code: FAILED_CODE.to_string(),
            status: Status::Failed,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.status == Status::Success
    }
}

pub fn write_csv<W: Write>(writer: W, results: &[EnrollmentResult]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;

    Ok(())
}

pub fn export_to_csv(path: &Path, results: &[EnrollmentResult]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("unable to create csv file {}", path.display()))?;
    write_csv(file, results)
        .with_context(|| format!("unable to write csv file {}", path.display()))
}

pub fn success_count(results: &[EnrollmentResult]) -> usize {
    results.iter().filter(|result| result.succeeded()).count()
}

pub fn summary(results: &[EnrollmentResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    for result in results {
        let mark = if result.succeeded() { "✓" } else { "✗" };
        lines.push(format!(
            "{} {} (ID: {})  DEC: {}",
            mark, result.room_name, result.room_id, result.code
        ));
    }
    lines.push(format!(
        "{}/{} succeeded.",
        success_count(results),
        results.len()
    ));

    return lines.join("\n");
}
