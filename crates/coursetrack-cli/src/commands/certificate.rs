//! The `coursetrack details` and `coursetrack certificate` commands.

use std::path::PathBuf;

use anyhow::Result;

use super::open_session;

pub fn save_details(
    config_path: Option<PathBuf>,
    name: String,
    company: Option<String>,
) -> Result<()> {
    let mut session = open_session(config_path)?;
    let record = session.save_holder_details(&name, company.as_deref());

    let name = record.holder_name.unwrap_or_default();
    match record.holder_company {
        Some(company) if !company.is_empty() => println!("Saved details: {name} ({company})"),
        _ => println!("Saved details: {name}"),
    }
    Ok(())
}

pub fn issue(
    config_path: Option<PathBuf>,
    name: Option<String>,
    company: Option<String>,
    format: String,
) -> Result<()> {
    if !matches!(format.as_str(), "text" | "markdown" | "json") {
        anyhow::bail!("unknown format: {format} (expected text, markdown or json)");
    }

    let mut session = open_session(config_path)?;
    let name = name
        .or_else(|| session.record().holder_name.clone())
        .unwrap_or_default();
    // Without --company the saved company is used
    let payload = session.issue_certificate(&name, company.as_deref())?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&payload)?),
        "markdown" => print!("{}", payload.to_markdown()),
        _ => print!("{}", payload.to_text()),
    }
    Ok(())
}
