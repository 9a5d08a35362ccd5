use colored::*;
use rulegen_rules::{LintWarning, RuleTag, Severity};

pub fn print_lint(warnings: &[LintWarning]) {
    for warning in warnings {
        let label = match warning.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".cyan(),
        };
        eprintln!("{}[{}]: {}", label, warning.rule, warning.message);
        eprintln!("    {} {}", "-->".blue(), warning.path);
    }

    if !warnings.is_empty() {
        let errors = warnings.iter().filter(|w| w.is_error()).count();
        eprintln!(
            "{} finding(s), {} error(s)",
            warnings.len().to_string().bold(),
            errors.to_string().bold()
        );
    }
}

pub fn print_tags() {
    for tag in RuleTag::selectable() {
        let attributes = tag
            .legal_attributes()
            .iter()
            .map(|key| match key.allowed_values() {
                Some(values) => format!("{}={}", key, values.join("|")),
                None => format!("{}=<text>", key),
            })
            .collect::<Vec<_>>();

        if tag.is_content_only() || attributes.is_empty() {
            println!("{}", tag.to_string().bold());
        } else {
            println!("{}  [{}]", tag.to_string().bold(), attributes.join(", "));
        }
    }
}
