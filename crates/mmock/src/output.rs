//! Output formatting for CLI

use mapping_mocker::MockedMetadata;

/// Format a short per-class summary of mocked metadata
pub fn format_summary(metadata: &MockedMetadata) -> String {
    let mut output = String::new();

    output.push_str(&format!("Mocked {} class(es):\n", metadata.classes.len()));
    for (class, annotations) in &metadata.classes {
        let count = annotations.elements().count();
        let complete = if annotations.metadata_complete {
            " (metadata complete)"
        } else {
            ""
        };
        output.push_str(&format!("  {}: {} element(s){}\n", class, count, complete));
    }

    if metadata.globals.is_empty() {
        output.push_str("No global declarations\n");
    } else {
        output.push_str(&format!(
            "Global declarations: {}\n",
            metadata.globals.len()
        ));
        for global in &metadata.globals {
            let members = global.members().len();
            match global.name() {
                Some(name) => output.push_str(&format!("  {} {}\n", global.kind, name)),
                None => output.push_str(&format!("  {} ({} members)\n", global.kind, members)),
            }
        }
    }

    output
}
