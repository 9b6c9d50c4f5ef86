use crate::ui::messages::warning;
use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stdin. Anything but `y`/`yes` means no.
pub fn ask_confirmation(prompt: &str) -> bool {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    ask_confirmation_from(prompt, &mut lock)
}

pub fn ask_confirmation_from<R: BufRead>(prompt: &str, input: &mut R) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if input.read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
