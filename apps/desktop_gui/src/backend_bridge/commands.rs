//! Backend commands queued from UI to backend worker.

use shared::protocol::RunRequest;

pub enum BackendCommand {
    Run { run_id: u64, request: RunRequest },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Run { .. } => "run",
        }
    }
}
