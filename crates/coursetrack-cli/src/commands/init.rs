//! The `coursetrack init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    if Path::new("coursetrack.toml").exists() {
        println!("coursetrack.toml already exists, skipping.");
    } else {
        std::fs::write("coursetrack.toml", SAMPLE_CONFIG)?;
        println!("Created coursetrack.toml");
    }

    std::fs::create_dir_all("courses")?;
    let course_path = Path::new("courses/installer.toml");
    if course_path.exists() {
        println!("courses/installer.toml already exists, skipping.");
    } else {
        std::fs::write(course_path, SAMPLE_COURSE)?;
        println!("Created courses/installer.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: coursetrack validate");
    println!("  2. Run: coursetrack lessons");
    println!("  3. Run: coursetrack status");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# coursetrack configuration

catalog = "courses/installer.toml"
data_dir = ".coursetrack"

# Append a JSON line here whenever a certificate is issued
# completion_log = "completions.jsonl"
"#;

const SAMPLE_COURSE: &str = include_str!("../../../../courses/installer.toml");
