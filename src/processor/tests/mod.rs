//! Pipeline tests for the batch processor
//!
//! Builds SDD export folders in temporary directories and runs the
//! processor end to end with conversion disabled.


use crate::constants::SDD_HEADER;
use chrono::{Duration, Local};
use std::fs;
use std::path::{Path, PathBuf};

pub const NAME_KE5538: &str = "Line1.24-05-10.KE5538 01.Defects.csv";
pub const NAME_AB0001: &str = "Line1.24-05-11.AB0001 02.Defects.csv";

/// Export with two Top rows (one unclassified) and one Bottom row
pub fn two_section_export() -> String {
    [
        "SDD Defect Report",
        "Top",
        SDD_HEADER,
        "1,Scratch-A1-x-Long Scratch,10.5,100,900,-400,2.0,1.0,0.10,0",
        "2,,11.0,110,890,-390,NULL,1.0,0.10,0",
        "",
        "Bottom",
        "Inspection Side,Bottom",
        SDD_HEADER,
        "3,Dent-B2-y-Deep Dent,20.0,200,800,-300,3.0,2.0,0.20,90",
    ]
    .join("\r\n")
}

/// Export without a Bottom section
pub fn top_only_export() -> String {
    [
        "SDD Defect Report",
        "Top",
        SDD_HEADER,
        "1,Hole-C-z-Pin Hole,5.0,50,950,-450,1.0,1.0,0.05,180",
    ]
    .join("\n")
}

pub fn write_export(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Date-only window that covers files written now
pub fn open_window() -> (String, String) {
    let today = Local::now().date_naive();
    (
        (today - Duration::days(1)).format("%Y-%m-%d").to_string(),
        (today + Duration::days(1)).format("%Y-%m-%d").to_string(),
    )
}
