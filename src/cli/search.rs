//! Search the organization directory.

use crate::cli::output;
use crate::core::directory::Directory;
use crate::error::Result;

pub fn run(directory: &Directory, terms: &[String]) -> Result<()> {
    let query = if terms.is_empty() {
        "*".to_string()
    } else {
        terms.join(" ")
    };
    let matches = directory.matches(&query);

    if matches.members.is_empty() && matches.teams.is_empty() {
        output::dimmed("no matches");
        return Ok(());
    }

    if !matches.members.is_empty() {
        output::header("Members:");
        for member in &matches.members {
            if member.name.is_empty() {
                output::list_item(&member.login);
            } else {
                output::list_item(&format!("{} ({})", member.login, member.name));
            }
        }
    }
    if !matches.members.is_empty() && !matches.teams.is_empty() {
        println!();
    }
    if !matches.teams.is_empty() {
        output::header("Teams:");
        for team in &matches.teams {
            output::list_item(&team.name);
        }
    }
    Ok(())
}
