// user_experience.rs
use crate::config::{edit_config, BroConfig};
use crate::user_interaction::{print_insight, print_list};
use std::path::Path;

pub const FLAGS: [&str; 4] = [
    "@b          : While changing filters => Back to the main menu",
    "@config     : Anywhere => Edit config in vim",
    "@f / @flags : Anywhere => View all flags",
    "@q          : Anywhere => Quit bikebro",
];

/// Handles the flags that work at every prompt. Returns true if `flag`
/// was one of them, so the caller can ask again.
pub fn handle_special_flag(flag: &str, config_path: &Path, config: &mut BroConfig) -> bool {
    match flag.trim() {
        "@f" | "@flags" => {
            print_insight("Serving your flags ...");
            print_list(&FLAGS);
            println!();
            true
        }
        "@config" => {
            match edit_config(config_path) {
                Ok(edited) => *config = edited,
                Err(e) => print_insight(&format!("Could not edit the config: {}", e)),
            }
            true
        }
        _ => false,
    }
}

pub fn handle_back_flag(flag: &str) -> bool {
    flag.trim() == "@b"
}

pub fn handle_quit_flag(flag: &str) {
    if flag.trim() == "@q" {
        print_insight("Catch you later, bro.");
        std::process::exit(0);
    }
}
