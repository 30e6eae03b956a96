use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Validation types
    types.push(clean_type(ValidationRequest::export_to_string()?));
    types.push(clean_type(LineType::export_to_string()?));
    types.push(clean_type(WhatsappStatus::export_to_string()?));
    types.push(clean_type(ValidationOutcome::export_to_string()?));
    types.push(clean_type(ValidationResponse::export_to_string()?));
    types.push(clean_type(ValidationErrorResponse::export_to_string()?));

    // Agent log types
    types.push(clean_type(AgentType::export_to_string()?));
    types.push(clean_type(LogStatus::export_to_string()?));
    types.push(clean_type(AgentLog::export_to_string()?));
    types.push(clean_type(AgentState::export_to_string()?));
    types.push(clean_type(AgentStatus::export_to_string()?));

    // Stats and country types
    types.push(clean_type(StatsSnapshot::export_to_string()?));
    types.push(clean_type(Country::export_to_string()?));

    // Settings types
    types.push(clean_type(ApiKeyConfig::export_to_string()?));
    types.push(clean_type(SettingsResponse::export_to_string()?));
    types.push(clean_type(UpdateApiKeysRequest::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strips the generated-file banner and the per-type imports, since every
/// type lands in the same output file.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
