//! Build automation tasks
//!
//! - Generating the provisioning CLI reference from its clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for the Personalize example", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the personalize-train CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<personalize_train::TrainArgs>();

    let content = format!(
        r#"# personalize-train CLI Reference

Provisions the Personalize dataset group, imports the MovieLens ratings,
trains a solution version and deploys the campaign for one stage. Every step
is get-or-create, so re-running against a provisioned stage creates nothing.

## Quick Start

```bash
# Deploy the stack for the stage first; its outputs supply the bucket and role
personalize-train --stage dev

# Train a fresh solution version and move the campaign to it
personalize-train --stage dev --force-retrain

# Skip the stack lookup
personalize-train --stage dev --bucket my-bucket --role-arn arn:aws:iam::123456789012:role/personalize
```

The campaign ARN is printed on success; set it as `CAMPAIGN_ARN` on the
`get-recommendations` function.

## Options

{}

## Environment Variables

- `STAGE` - Deployment stage (default: `dev`)
- `AWS_REGION`, `AWS_ENDPOINT_URL` - AWS region and custom endpoint
- `LOG_LEVEL`, `LOG_FORMAT`, `LOG_OUTPUT`, `LOG_DIR`, `LOG_FILTER` - Logging

---

*Generated from the CLI source code. To update, run `cargo xtask generate-cli-docs`.*
"#,
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli-reference.md");
    fs::write(&file_path, content)?;

    println!("Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
