//! timereg main entrypoint.

use timereg::errors::AppError;
use timereg::run;

fn main() {
    println!();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        if let AppError::Overlap(conflict) = &e {
            eprintln!(
                "Conflicting registration: #{} on {} from {} to {} ({})",
                conflict.id,
                conflict.date_str(),
                conflict.clock_in_str(),
                conflict.clock_out_str(),
                conflict.status.to_db_str()
            );
        }
        std::process::exit(1);
    }
}
