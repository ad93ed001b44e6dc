use chatline_types::write_typescript_definitions;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "web/api-types".to_string());

    let output_path = write_typescript_definitions(Path::new(&output_dir))?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}
