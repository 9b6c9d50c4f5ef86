//! rParticipation main entrypoint.

use rparticipation::run;
use rparticipation::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
