use anyhow::Context;
use clap::Parser;
use patch_updater::utils::{logger, validation::Validate};
use patch_updater::{CliConfig, UpdateError};
use std::io::Write;

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        fail(e);
    }

    let updater = config.updater();

    if config.dry_run {
        let planned = if config.promote {
            updater.plan_promotion(&config.environment, &config.app, &config.version)
        } else {
            updater
                .plan(&config.environment, &config.app, &config.version)
                .map(|plan| vec![plan])
        };
        let plans = match planned {
            Ok(plans) => plans,
            Err(e) => fail(e),
        };

        let mut stdout = std::io::stdout().lock();
        for plan in plans {
            tracing::info!(
                "Dry run for {}: {} -> {}",
                plan.path.display(),
                plan.previous_image,
                plan.new_image
            );
            writeln!(stdout, "--- # {}", plan.path.display())
                .and_then(|_| stdout.write_all(plan.document.as_bytes()))
                .context("Failed to write document to stdout")?;
        }
        return Ok(());
    }

    let applied = if config.promote {
        updater.promote(&config.environment, &config.app, &config.version)
    } else {
        updater
            .update(&config.environment, &config.app, &config.version)
            .map(|outcome| vec![outcome])
    };

    match applied {
        Ok(outcomes) => {
            for outcome in outcomes {
                let status = if outcome.changed { "updated" } else { "unchanged" };
                println!("{}: {} ({})", outcome.path.display(), outcome.new_image, status);
            }
            Ok(())
        }
        Err(e) => fail(e),
    }
}

fn fail(e: UpdateError) -> ! {
    tracing::error!("❌ Update failed: {} (Category: {:?})", e, e.category());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
