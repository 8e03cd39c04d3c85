//! Line-oriented console commands.

use std::str::FromStr;

use autodiag_errors::ValidationError;

use crate::service::Command;

/// One parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A service command
    Command(Command),
    /// Print the current snapshot
    Snapshot,
    /// Print the prediction status
    Status,
    /// Print the command list
    Help,
    /// Stop the daemon
    Quit,
    /// Blank line
    Empty,
}

/// Shown for `help`.
pub const HELP: &str = "\
Commands:
  predict   run a fault prediction on the current snapshot
  fault     inject the synthetic fault profile
  snapshot  print the current gauges
  status    print the prediction status
  help      show this list
  quit      stop the daemon";

impl FromStr for Input {
    type Err = ValidationError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let word = line.trim().to_ascii_lowercase();
        let input = match word.as_str() {
            "" => Input::Empty,
            "predict" | "p" => Input::Command(Command::RunPrediction),
            "fault" | "f" => Input::Command(Command::InjectFault),
            "snapshot" | "s" => Input::Snapshot,
            "status" => Input::Status,
            "help" | "h" | "?" => Input::Help,
            "quit" | "exit" | "q" => Input::Quit,
            _ => {
                return Err(ValidationError::invalid_enum(
                    "command",
                    line.trim(),
                    "predict, fault, snapshot, status, help, quit",
                ));
            }
        };
        Ok(input)
    }
}
