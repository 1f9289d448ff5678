// user_interaction.rs
use fuzzywuzzy::fuzz;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use vim_edit::vim_edit;

const BOLD_ORANGE: &str = "\x1b[1;38;5;208m";
const ORANGE: &str = "\x1b[0;38;5;208m";
const BOLD_YELLOW: &str = "\x1b[1;33m";
const RESET: &str = "\x1b[0m";

// Below this fuzz ratio a guess is more confusing than helpful.
const MIN_SUGGESTION_SCORE: u8 = 60;

/// `None` once input is over: end of file, Ctrl-C, or a broken terminal.
fn read_line(custom_prompt: &str) -> Option<String> {
    let mut rl = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(err) => {
            println!("Failed to initialize editor: {:?}", err);
            return None;
        }
    };

    match rl.readline(custom_prompt) {
        Ok(line) => {
            let _ = rl.add_history_entry(line.as_str());
            Some(line)
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            println!("Input interrupted or end of file reached.");
            None
        }
        Err(err) => {
            println!("Error reading line: {:?}", err);
            None
        }
    }
}

pub fn get_user_input(prompt: &str) -> Option<String> {
    read_line(&format!("{}@BIGbro: {}{}", BOLD_ORANGE, prompt, RESET))
}

pub fn get_user_input_level_2(prompt: &str) -> Option<String> {
    read_line(&format!("  {}@LILbro: {}{}", ORANGE, prompt, RESET))
}

pub fn get_edited_user_config_input(current_config: String) -> String {
    let edited = vim_edit(current_config);
    println!();
    edited
}

pub fn print_list(options: &[&str]) {
    print_list_indented(options, "  ");
}

pub fn print_list_level_2(options: &[&str]) {
    print_list_indented(options, "    ");
}

fn print_list_indented(options: &[&str], indent: &str) {
    // Pad indices so the options line up past 9
    let max_digits = options.len().to_string().len();

    for (index, option) in options.iter().enumerate() {
        let padded_index = format!("{:width$}:", index + 1, width = max_digits);
        println!("{}{}{} {}{}", indent, BOLD_YELLOW, padded_index, option, RESET);
    }
}

pub fn print_insight(message: &str) {
    println!("{}@BIGbro: {}{}", BOLD_ORANGE, message, RESET);
}

pub fn print_insight_level_2(message: &str) {
    println!("  {}@LILbro: {}{}", ORANGE, message, RESET);
}

/// A "did you mean" candidate for a mistyped value.
pub fn closest_match<'a>(value: &str, options: &[&'a str]) -> Option<&'a str> {
    let value = value.trim().to_lowercase();
    options
        .iter()
        .map(|option| (*option, fuzz::ratio(&value, option)))
        .filter(|&(_, score)| score >= MIN_SUGGESTION_SCORE)
        .max_by_key(|&(_, score)| score)
        .map(|(option, _)| option)
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}
