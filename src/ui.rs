//! Terminal output helpers.
//!
//! All user-facing output of the binary goes through this module; the core
//! components never print.

use console::style;

use crate::boundary::BoundaryWarning;
use crate::domain::CommitRecord;
use crate::github::PublishedRelease;
use crate::sequencer::ReleasePlan;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

pub fn display_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Show the commit window a bump decision was derived from.
///
/// Displays up to 10 commits; anything beyond that is summarized as a count.
pub fn display_commit_window(commits: &[CommitRecord], app: &str) {
    println!(
        "\n{}",
        style(format!("Commits considered for '{}'", app)).bold()
    );

    for commit in commits.iter().take(10) {
        let short_hash = if commit.hash.len() > 7 {
            &commit.hash[..7]
        } else {
            commit.hash.as_str()
        };
        println!("  {} {}", style(short_hash).cyan(), commit.header);
    }

    if commits.len() > 10 {
        println!("  ... and {} more commits", commits.len() - 10);
    }
}

/// Show what a release run is about to do (or, in a dry run, would do).
pub fn display_plan(plan: &ReleasePlan) {
    println!("\n{}", style("Release plan:").bold());
    println!(
        "  Tag:            {} -> {}",
        style(&plan.previous_tag).red(),
        style(&plan.next_tag).green()
    );
    println!("  Release branch: {}", plan.release_branch);
    println!("  Trunk branch:   {}", plan.trunk_branch);
    println!("  Cherry-pick:    {}", plan.cherry_hash);
    println!("  Remote:         {}", plan.remote);
}

pub fn display_release(release: &PublishedRelease) {
    println!(
        "{} Release published: {}",
        style("✓").green(),
        style(&release.html_url).cyan()
    );
}
