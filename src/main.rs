use colored::Colorize;

fn main() {
    if let Err(e) = story_resolver::run() {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(1);
    }
}
