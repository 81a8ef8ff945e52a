//! Describe command
//!
//! Usage: eav describe <CONFIG> <FAMILY> [--json] [--translations <FILE>]

use clap::Args;
use eav_core::{FamilySummary, FamilyLookup};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Model configuration file
    pub config: PathBuf,

    /// Family code
    pub family: String,

    /// Print the resolved family as JSON
    #[arg(long)]
    pub json: bool,

    /// Translation catalogue used for labels (flat key: message map)
    #[arg(short, long)]
    pub translations: Option<PathBuf>,
}

/// Execute describe command
pub fn execute(args: DescribeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let model = super::load_model("describe", &args.config, args.translations.as_deref())?;

    let start = Instant::now();
    let family = model
        .families
        .get_family(&args.family)
        .map_err(|err| super::fail("describe", start, err))?;
    let summary = family.summary();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_text(&summary));
    }
    Ok(())
}

fn render_text(summary: &FamilySummary) -> String {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    let or_dash = |value: Option<&str>| value.unwrap_or("-").to_string();

    let mut out = String::new();
    out.push_str(&format!("Family: {} ({})\n", summary.code, summary.label));
    out.push_str(&format!("Parent: {}\n", or_dash(summary.parent.as_deref())));
    out.push_str(&format!("Instantiable: {}\n", yes_no(summary.instantiable)));
    out.push_str(&format!("Singleton: {}\n", yes_no(summary.singleton)));
    out.push_str(&format!("Data class: {}\n", summary.data_class));
    out.push_str(&format!("Value class: {}\n", summary.value_class));
    out.push_str(&format!(
        "Label attributes: {}\n",
        if summary.attribute_as_label.is_empty() {
            "-".to_string()
        } else {
            summary.attribute_as_label.join(", ")
        }
    ));
    out.push_str(&format!(
        "Identifier: {}\n",
        or_dash(summary.attribute_as_identifier.as_deref())
    ));
    out.push_str(&format!(
        "Matching codes: {}\n",
        summary.matching_codes.join(", ")
    ));

    out.push_str("Attributes:\n");
    for attribute in &summary.attributes {
        let mut flags = Vec::new();
        if attribute.required {
            flags.push("required".to_string());
        }
        if attribute.unique {
            flags.push("unique".to_string());
        }
        if attribute.collection {
            flags.push("collection".to_string());
        }
        if !attribute.context_mask.is_empty() {
            flags.push(format!("context={}", attribute.context_mask.join(",")));
        }
        out.push_str(&format!(
            "  - {} [{}] \"{}\"",
            attribute.code, attribute.attribute_type, attribute.label
        ));
        if !flags.is_empty() {
            out.push_str(&format!(" {}", flags.join(" ")));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use eav_core::model::AttributeSummary;

    #[test]
    fn test_render_text_lists_attributes() {
        let summary = FamilySummary {
            code: "Post".to_string(),
            label: "Blog post".to_string(),
            parent: None,
            attributes: vec![AttributeSummary {
                code: "title".to_string(),
                label: "Title".to_string(),
                attribute_type: "string".to_string(),
                group: None,
                required: true,
                unique: false,
                collection: false,
                context_mask: vec!["locale".to_string()],
            }],
            attribute_as_label: vec!["title".to_string()],
            attribute_as_identifier: None,
            instantiable: true,
            singleton: false,
            data_class: "contextual_data".to_string(),
            value_class: "contextual_value".to_string(),
            matching_codes: vec!["Post".to_string()],
        };

        let text = render_text(&summary);
        assert!(text.starts_with("Family: Post (Blog post)\n"));
        assert!(text.contains("Parent: -\n"));
        assert!(text.contains("  - title [string] \"Title\" required context=locale\n"));
    }
}
