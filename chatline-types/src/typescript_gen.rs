use std::path::Path;

/// Every type exported to the front-end, in output order
pub const API_TYPE_NAMES: &[&str] = &[
    "MessageRole",
    "ImageContent",
    "MessageContent",
    "Message",
    "SimulationEvent",
    "UseSimulationRequest",
    "UseSimulationResponse",
    "TelemetryPingRequest",
    "TelemetryPingResponse",
    "ConversationResponse",
    "RewindRequest",
    "RewindResponse",
    "SimulationDecisionRequest",
    "SimulationDecisionResponse",
    "PreviewResponse",
    "SimulationEventsResponse",
    "ErrorResponse",
];

pub fn generate_typescript_definitions(
    type_names: &[&str],
) -> Result<String, Box<dyn std::error::Error>> {
    if type_names.is_empty() {
        return Err("No type names provided".into());
    }

    let mut definitions = Vec::new();

    for name in type_names {
        let type_def = export_type(name)?;
        let cleaned = clean_type(type_def);

        if !cleaned.trim().is_empty() {
            definitions.push(cleaned);
        }
    }

    Ok(definitions.join("\n\n"))
}

/// Write all API types into `<output_dir>/types.ts`
pub fn write_typescript_definitions(
    output_dir: &Path,
) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
    let output = generate_typescript_definitions(API_TYPE_NAMES)?;

    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("types.ts");
    std::fs::write(&output_path, format!("{}\n", output))?;

    Ok(output_path)
}

fn export_type(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    use crate::*;
    use ts_rs::TS;

    let result = match name {
        "MessageRole" => MessageRole::export_to_string()?,
        "ImageContent" => ImageContent::export_to_string()?,
        "MessageContent" => MessageContent::export_to_string()?,
        "Message" => Message::export_to_string()?,

        "SimulationEvent" => SimulationEvent::export_to_string()?,
        "UseSimulationRequest" => UseSimulationRequest::export_to_string()?,
        "UseSimulationResponse" => UseSimulationResponse::export_to_string()?,
        "TelemetryPingRequest" => TelemetryPingRequest::export_to_string()?,
        "TelemetryPingResponse" => TelemetryPingResponse::export_to_string()?,

        "ConversationResponse" => ConversationResponse::export_to_string()?,
        "RewindRequest" => RewindRequest::export_to_string()?,
        "RewindResponse" => RewindResponse::export_to_string()?,
        "SimulationDecisionRequest" => SimulationDecisionRequest::export_to_string()?,
        "SimulationDecisionResponse" => SimulationDecisionResponse::export_to_string()?,
        "PreviewResponse" => PreviewResponse::export_to_string()?,
        "SimulationEventsResponse" => SimulationEventsResponse::export_to_string()?,

        "ErrorResponse" => ErrorResponse::export_to_string()?,

        _ => {
            return Err(format!(
                "Unknown type: '{}'. Available types can be found in chatline-types/src/",
                name
            )
            .into());
        }
    };

    Ok(result)
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
        })
        .cloned()
        .collect();

    filtered.join("\n").trim().to_string()
}
