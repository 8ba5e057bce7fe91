use anyhow::Result;
use clap::Parser;
use std::env;

use mono_release::config;
use mono_release::git::Git2Repository;
use mono_release::github::GithubClient;
use mono_release::identity::{GithubActorIdentity, IdentityResolver, StaticIdentity};
use mono_release::manifest::NpmVersionMutator;
use mono_release::orchestrator::{run_release, ReleaseArgs, ReleaseOutcome};
use mono_release::ui;

#[derive(clap::Parser)]
#[command(
    name = "mono-release",
    about = "Release one app of a monorepo from its conventional commits"
)]
struct Args {
    #[arg(short, long, help = "Application to release")]
    app: Option<String>,

    #[arg(short, long = "ref", help = "Reference to return to after the release")]
    r#ref: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Git remote to push to")]
    remote: Option<String>,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("mono-release {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration
    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    // Required identifiers and credentials; missing any of them is a
    // configuration error reported before any work is attempted
    let app = match args.app {
        Some(app) if !app.is_empty() => app,
        _ => {
            ui::display_error("Missing required --app <name>");
            std::process::exit(1);
        }
    };

    let return_ref = match args.r#ref {
        Some(r) if !r.is_empty() => r,
        _ => {
            ui::display_error("Missing required --ref <reference>");
            std::process::exit(1);
        }
    };

    let token = match env::var("GITHUB_TOKEN") {
        Ok(token) if !token.is_empty() => token,
        _ => {
            ui::display_error("GITHUB_TOKEN is not set");
            std::process::exit(1);
        }
    };

    let repository = match GithubClient::resolve_repository(&config.github) {
        Ok(slug) => slug,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let client = match GithubClient::new(&config.github.api_url, &token, &repository) {
        Ok(client) => client,
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    // In CI the acting user comes from the platform; otherwise commits are
    // attributed to the tool itself
    let identity: Box<dyn IdentityResolver> = match env::var("GITHUB_ACTOR") {
        Ok(actor) if !actor.is_empty() => {
            Box::new(GithubActorIdentity::new(client.clone(), actor))
        }
        _ => Box::new(StaticIdentity::new(
            "mono-release",
            "mono-release@users.noreply.github.com",
        )),
    };

    let repo = match Git2Repository::open(".") {
        Ok(repo) => repo,
        Err(e) => {
            ui::display_error(&format!("Git repository error: {}", e));
            std::process::exit(1);
        }
    };

    let mutator = NpmVersionMutator;

    ui::display_status(&format!("Computing release for '{}'...", app));

    let release_args = ReleaseArgs {
        app,
        return_ref,
        remote: args.remote,
        dry_run: args.dry_run,
    };

    match run_release(
        &repo,
        &mutator,
        &client,
        identity.as_ref(),
        &config,
        &release_args,
    ) {
        Ok(ReleaseOutcome::Skipped(warning)) => {
            ui::display_warning(&warning);
            Ok(())
        }
        Ok(ReleaseOutcome::Planned(plan)) => {
            ui::display_status("Dry run - no changes were made");
            ui::display_plan(&plan);
            Ok(())
        }
        Ok(ReleaseOutcome::Released {
            plan,
            release,
            warnings,
            ..
        }) => {
            ui::display_plan(&plan);
            ui::display_success(&format!(
                "Pushed tag {} and branch {} to {}",
                plan.next_tag, plan.trunk_branch, plan.remote
            ));

            for warning in &warnings {
                ui::display_warning(warning);
            }
            if let Some(release) = release {
                ui::display_release(&release);
            }

            Ok(())
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    }
}
