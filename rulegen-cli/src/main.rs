use clap::{Args, Parser, Subcommand, ValueEnum};
use rulegen_core::config::load_config;
use rulegen_core::logging::init_tracing;
use rulegen_core::serde_utils::{to_json_value, to_pretty_json};
use rulegen_core::RulegenConfig;
use rulegen_rules::{lint_with, Escape, RuleDraft, RuleHeader, SerializeOptions};
use tracing::{debug, warn};

mod condition_arg;
mod error;
mod output;

use condition_arg::ConditionArg;
use error::CliError;

#[derive(Parser)]
#[command(name = "rulegen")]
#[command(about = "Assemble detection rules and render them as engine XML", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a rule from the given header and conditions and print it
    Generate(GenerateArgs),
    /// List the condition tags and the attributes each one accepts
    Tags,
    /// Show version information
    Version,
}

#[derive(Args)]
struct GenerateArgs {
    /// Rule id (defaults to RULEGEN_DEFAULT_ID or 100100)
    #[arg(long, allow_negative_numbers = true)]
    id: Option<i64>,
    /// Rule level, documented range 0-16 (defaults to RULEGEN_DEFAULT_LEVEL or 5)
    #[arg(long, allow_negative_numbers = true)]
    level: Option<i64>,
    /// Number of matching events before the rule fires
    #[arg(long)]
    frequency: Option<u64>,
    /// Correlation window in seconds
    #[arg(long)]
    timeframe: Option<u64>,
    /// Condition as `tag[key=value,...]=text`; repeat for more conditions
    #[arg(short = 'c', long = "condition")]
    conditions: Vec<ConditionArg>,
    /// Escape markup characters in values
    #[arg(long)]
    escape: bool,
    /// Print lint findings to stderr
    #[arg(long)]
    lint: bool,
    /// Fail when the rule has lint errors
    #[arg(long)]
    strict: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Xml,
    Json,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let config = load_config()?;
    init_tracing(Some(config.log_level().unwrap_or("warn")))?;

    match cli.command {
        Commands::Generate(args) => generate(args, &config),
        Commands::Tags => {
            output::print_tags();
            Ok(())
        }
        Commands::Version => {
            println!("rulegen v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn generate(args: GenerateArgs, config: &RulegenConfig) -> Result<(), CliError> {
    let mut header = RuleHeader::new(
        args.id.unwrap_or(config.default_rule_id),
        args.level.unwrap_or(config.default_level),
    );
    header.frequency = args.frequency;
    header.timeframe = args.timeframe;

    let mut draft = RuleDraft::with_header(header);
    for condition in &args.conditions {
        condition.apply(&mut draft.conditions);
    }

    let options = if args.escape || config.escape_output {
        SerializeOptions::escaped()
    } else {
        SerializeOptions::default()
    };

    let findings = lint_with(
        &draft.header,
        draft.conditions.conditions(),
        options.escape,
    );
    for finding in &findings {
        debug!(rule = %finding.rule, path = %finding.path, "{}", finding.message);
    }
    if args.lint {
        output::print_lint(&findings);
    } else {
        let errors = findings.iter().filter(|f| f.is_error()).count();
        if errors > 0 && !args.strict {
            warn!(errors, "rule has lint errors; rerun with --lint for details");
        }
    }
    if args.strict {
        draft.validate()?;
    }

    let xml = draft.generate_with(options);
    debug!(bytes = xml.len(), "rule generated");

    match args.format {
        OutputFormat::Xml => println!("{xml}"),
        OutputFormat::Json => {
            let mut document = to_json_value(&draft)?;
            document["xml"] = serde_json::Value::String(xml);
            document["escape"] = serde_json::Value::Bool(options.escape == Escape::Xml);
            if args.lint {
                document["lint"] = to_json_value(&findings)?;
            }
            println!("{}", to_pretty_json(&document)?);
        }
    }

    Ok(())
}
